// 목적:
// - 관계형 객체 그래프를 검색 문서로 비정규화한다.
//
// 설명:
// - 엔터티당 문서 하나를 만들고, 연결된 상대 엔터티는 {id, 표시 필드} 참조로만 담는다.
// - 태그 목록은 순서와 중복을 그대로 복사한다.
// - I/O가 없는 순수 함수다. 연관 관계는 호출자가 미리 로딩해야 한다.
//
// 디자인 패턴:
// - 프로젝션(Projection).
//
// 참조:
// - src_rs/core/models.rs
// - src_rs/core/reindex_pipeline.rs

use crate::core::models::{
    ContributorAggregate, ContributorDocument, ContributorRef, WorkAggregate, WorkDocument, WorkRef,
};

pub fn project_work(aggregate: &WorkAggregate) -> WorkDocument {
    WorkDocument {
        id: aggregate.work.id,
        title: aggregate.work.title.clone(),
        description: aggregate.work.description.clone(),
        tags: aggregate.work.tags.clone(),
        contributors: aggregate
            .contributors
            .iter()
            .map(ContributorRef::from)
            .collect(),
    }
}

pub fn project_contributor(aggregate: &ContributorAggregate) -> ContributorDocument {
    ContributorDocument {
        id: aggregate.contributor.id,
        name: aggregate.contributor.name.clone(),
        tags: aggregate.contributor.tags.clone(),
        works: aggregate.works.iter().map(WorkRef::from).collect(),
    }
}

pub fn project_works(aggregates: &[WorkAggregate]) -> Vec<WorkDocument> {
    aggregates.iter().map(project_work).collect()
}

pub fn project_contributors(aggregates: &[ContributorAggregate]) -> Vec<ContributorDocument> {
    aggregates.iter().map(project_contributor).collect()
}

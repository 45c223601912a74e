// 목적:
// - 카탈로그 작품/기여자 등록과 캐시를 거치지 않는 목록 조회를 처리한다.
//
// 설명:
// - 등록 시 새 UUID를 발급하고 저장소에 트랜잭션 단위로 삽입한다.
// - 등록은 검색 인덱스와 목록 캐시를 건드리지 않는다. 반영은 재색인과 TTL 만료에 맡긴다.
//
// 디자인 패턴:
// - 명령 패턴(Command) + 실패 빠르게(Fail Fast).
//
// 참조:
// - src_rs/index/catalog_store.rs
// - src_rs/core/listing_pipeline.rs

use std::sync::Arc;
use uuid::Uuid;

use crate::core::errors::{CoreError, CoreResult};
use crate::core::models::{
    Contributor, ContributorResult, NewContributor, NewWork, Work, WorkRef, WorkResult,
};
use crate::index::catalog_store::{CatalogStore, WorkInsertRecord};

pub struct CatalogPipeline {
    catalog: Arc<dyn CatalogStore>,
}

impl CatalogPipeline {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    pub async fn create_work(&self, payload: NewWork) -> CoreResult<WorkResult> {
        let mut created = self.create_works(vec![payload]).await?;
        created
            .pop()
            .ok_or_else(|| CoreError::Runtime("생성된 작품을 찾을 수 없습니다".to_string()))
    }

    pub async fn create_works(&self, payloads: Vec<NewWork>) -> CoreResult<Vec<WorkResult>> {
        if payloads.is_empty() {
            return Err(CoreError::InvalidInput(
                "작품 목록은 비어 있을 수 없습니다".to_string(),
            ));
        }

        let records = payloads
            .into_iter()
            .map(to_work_record)
            .collect::<CoreResult<Vec<_>>>()?;

        let inserted = self.catalog.insert_works(&records).await?;
        tracing::info!(inserted, "작품을 등록했습니다");

        Ok(records
            .into_iter()
            .map(|record| WorkResult {
                id: record.work.id,
                title: record.work.title,
                description: record.work.description,
                tags: record.work.tags,
                contributors: Vec::new(),
            })
            .collect())
    }

    pub async fn create_contributor(&self, payload: NewContributor) -> CoreResult<ContributorResult> {
        let mut created = self.create_contributors(vec![payload]).await?;
        created
            .pop()
            .ok_or_else(|| CoreError::Runtime("생성된 기여자를 찾을 수 없습니다".to_string()))
    }

    pub async fn create_contributors(
        &self,
        payloads: Vec<NewContributor>,
    ) -> CoreResult<Vec<ContributorResult>> {
        if payloads.is_empty() {
            return Err(CoreError::InvalidInput(
                "기여자 목록은 비어 있을 수 없습니다".to_string(),
            ));
        }

        let contributors = payloads
            .into_iter()
            .map(to_contributor)
            .collect::<CoreResult<Vec<_>>>()?;

        let inserted = self.catalog.insert_contributors(&contributors).await?;
        tracing::info!(inserted, "기여자를 등록했습니다");

        Ok(contributors
            .into_iter()
            .map(|contributor| ContributorResult {
                id: contributor.id,
                name: contributor.name,
                tags: contributor.tags,
                works: Vec::new(),
            })
            .collect())
    }

    /// 기여자 정보 없이 작품 목록을 반환한다. 캐시를 거치지 않는다.
    pub async fn list_works_without_contributors(&self) -> CoreResult<Vec<WorkResult>> {
        let works = self.catalog.load_works().await?;
        Ok(works
            .into_iter()
            .map(|aggregate| WorkResult {
                id: aggregate.work.id,
                title: aggregate.work.title,
                description: aggregate.work.description,
                tags: aggregate.work.tags,
                contributors: Vec::new(),
            })
            .collect())
    }

    pub async fn list_contributors(&self, with_works: bool) -> CoreResult<Vec<ContributorResult>> {
        let contributors = self.catalog.load_contributors().await?;
        Ok(contributors
            .into_iter()
            .map(|aggregate| ContributorResult {
                works: if with_works {
                    aggregate.works.iter().map(WorkRef::from).collect()
                } else {
                    Vec::new()
                },
                id: aggregate.contributor.id,
                name: aggregate.contributor.name,
                tags: aggregate.contributor.tags,
            })
            .collect())
    }
}

fn to_work_record(payload: NewWork) -> CoreResult<WorkInsertRecord> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(CoreError::InvalidInput(
            "title은 비어 있을 수 없습니다".to_string(),
        ));
    }

    let mut contributor_ids = Vec::with_capacity(payload.contributor_ids.len());
    for contributor_id in payload.contributor_ids {
        if !contributor_ids.contains(&contributor_id) {
            contributor_ids.push(contributor_id);
        }
    }

    Ok(WorkInsertRecord {
        work: Work {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: payload.description,
            tags: payload.tags,
        },
        contributor_ids,
    })
}

fn to_contributor(payload: NewContributor) -> CoreResult<Contributor> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(CoreError::InvalidInput(
            "name은 비어 있을 수 없습니다".to_string(),
        ));
    }

    Ok(Contributor {
        id: Uuid::new_v4(),
        name: name.to_string(),
        tags: payload.tags,
    })
}

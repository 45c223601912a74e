// 목적:
// - 관계형 카탈로그 저장소 경계(trait)를 정의한다.
//
// 설명:
// - 조회는 항상 상대편 연관 관계를 즉시 로딩한 전체 집합을 반환한다.
// - 코어 파이프라인은 조회만 사용하고, 쓰기는 카탈로그 파이프라인만 사용한다.
//
// 디자인 패턴:
// - 저장소 패턴(Repository Pattern).
//
// 참조:
// - src_rs/index/postgres_repo.rs
// - src_rs/core/reindex_pipeline.rs
// - src_rs/core/listing_pipeline.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::errors::CoreResult;
use crate::core::models::{Contributor, ContributorAggregate, Work, WorkAggregate};

/// 저장할 작품과 연결할 기여자 id 목록이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkInsertRecord {
    pub work: Work,
    pub contributor_ids: Vec<Uuid>,
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn load_works(&self) -> CoreResult<Vec<WorkAggregate>>;

    async fn load_contributors(&self) -> CoreResult<Vec<ContributorAggregate>>;

    async fn insert_works(&self, records: &[WorkInsertRecord]) -> CoreResult<u64>;

    async fn insert_contributors(&self, contributors: &[Contributor]) -> CoreResult<u64>;
}

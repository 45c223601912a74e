// 목적:
// - 관계형 저장소 전체를 검색 인덱스로 다시 색인한다.
//
// 설명:
// - 전체 조회 -> 인덱스 존재 확인/생성 -> 존재 재확인 -> contributors bulk -> works bulk 순서로 처리한다.
// - 작품이 하나도 없으면 인덱스를 건드리지 않고 EmptySource로 실패한다.
// - 두 bulk 호출 사이에는 원자성이 없다. contributors만 갱신된 채 works가 실패할 수 있으며,
//   id 기준 upsert라 전체 재시도로 같은 최종 상태에 도달한다.
// - 취소는 bulk 단계 진입 전까지만 반영한다. 첫 bulk 요청을 보낸 뒤에는 끝까지 진행한다.
//
// 디자인 패턴:
// - 파이프라인(Pipeline) + 멱등 재시도(Idempotent Retry).
//
// 참조:
// - src_rs/core/projection.rs
// - src_rs/index/search_backend.rs
// - src_rs/index/names.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::core::cancellation::{ensure_not_cancelled, run_cancellable};
use crate::core::errors::{CoreError, CoreResult};
use crate::core::projection::{project_contributors, project_works};
use crate::index::catalog_store::CatalogStore;
use crate::index::mappings::{contributor_index_schema, work_index_schema};
use crate::index::names::{CONTRIBUTOR_INDEX, WORK_INDEX};
use crate::index::search_backend::{IndexDocument, SearchBackend};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReindexReport {
    pub indexed_works: usize,
    pub indexed_contributors: usize,
    pub created_indices: Vec<String>,
    pub elapsed_ms: u64,
}

pub struct ReindexPipeline {
    catalog: Arc<dyn CatalogStore>,
    backend: Arc<dyn SearchBackend>,
}

impl ReindexPipeline {
    pub fn new(catalog: Arc<dyn CatalogStore>, backend: Arc<dyn SearchBackend>) -> Self {
        Self { catalog, backend }
    }

    /// 재색인 파이프라인을 실행한다.
    pub async fn reindex(&self, cancel: &CancellationToken) -> CoreResult<ReindexReport> {
        let started = Instant::now();

        let works = run_cancellable(cancel, "works 조회", self.catalog.load_works()).await?;
        let contributors =
            run_cancellable(cancel, "contributors 조회", self.catalog.load_contributors()).await?;

        if works.is_empty() {
            tracing::warn!("작품이 없어 재색인을 중단합니다");
            return Err(CoreError::EmptySource);
        }

        let work_documents = project_works(&works)
            .iter()
            .map(|document| IndexDocument::from_serializable(document.id.to_string(), document))
            .collect::<CoreResult<Vec<_>>>()?;
        let contributor_documents = project_contributors(&contributors)
            .iter()
            .map(|document| IndexDocument::from_serializable(document.id.to_string(), document))
            .collect::<CoreResult<Vec<_>>>()?;

        let mut created_indices = Vec::new();
        for (index, schema) in [
            (WORK_INDEX, work_index_schema()),
            (CONTRIBUTOR_INDEX, contributor_index_schema()),
        ] {
            if run_cancellable(cancel, "인덱스 준비", self.ensure_index(index, &schema)).await? {
                created_indices.push(index.to_string());
            }
        }

        for index in [WORK_INDEX, CONTRIBUTOR_INDEX] {
            let exists = run_cancellable(cancel, "인덱스 재확인", self.backend.index_exists(index)).await?;
            if !exists {
                return Err(CoreError::IndexCreation {
                    index: index.to_string(),
                    message: "생성 후에도 인덱스가 존재하지 않습니다".to_string(),
                });
            }
        }

        ensure_not_cancelled(cancel, "bulk 색인 시작 전")?;

        let contributor_summary = self
            .backend
            .bulk_upsert(CONTRIBUTOR_INDEX, contributor_documents)
            .await?;
        tracing::info!(
            index = CONTRIBUTOR_INDEX,
            indexed = contributor_summary.indexed,
            "contributors bulk 색인을 완료했습니다"
        );

        let work_summary = self
            .backend
            .bulk_upsert(WORK_INDEX, work_documents)
            .await
            .inspect_err(|error| {
                tracing::error!(
                    index = WORK_INDEX,
                    %error,
                    "works bulk 색인에 실패했습니다. contributors 인덱스만 갱신된 상태이므로 전체 재시도가 필요합니다"
                );
            })?;
        tracing::info!(
            index = WORK_INDEX,
            indexed = work_summary.indexed,
            "works bulk 색인을 완료했습니다"
        );

        Ok(ReindexReport {
            indexed_works: work_summary.indexed,
            indexed_contributors: contributor_summary.indexed,
            created_indices,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        })
    }

    /// 인덱스가 없으면 생성한다. 새로 생성을 요청했으면 true를 반환한다.
    async fn ensure_index(&self, index: &str, schema: &Value) -> CoreResult<bool> {
        if self.backend.index_exists(index).await? {
            return Ok(false);
        }

        tracing::info!(index, "검색 인덱스가 없어 생성합니다");
        self.backend.create_index(index, schema).await?;
        Ok(true)
    }
}

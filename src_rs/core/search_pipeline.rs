// 목적:
// - 작품 전문 검색 질의를 구성하고 결과를 응답 형태로 변환한다.
//
// 설명:
// - 검색어를 소문자로 바꾸고 `*term*` 부분 일치 패턴으로 감싼다.
// - title(boost 3), tags(boost 2), description(기본 1) 세 절을 should(OR, 점수 합산)로 묶는다.
// - 기여자 이름은 검색 대상 필드가 아니다. 이름만 일치하는 작품은 결과에 나오지 않는다.
// - 빈 검색어는 백엔드를 호출하지 않고 빈 결과를 반환한다.
// - 백엔드 실패는 내부에서 재시도하지 않는다.
//
// 디자인 패턴:
// - 파이프라인(Pipeline).
//
// 참조:
// - src_rs/index/search_backend.rs
// - src_rs/index/names.rs

use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::core::cancellation::run_cancellable;
use crate::core::errors::{CoreError, CoreResult};
use crate::core::models::{ContributorRef, WorkResult};
use crate::index::names::WORK_INDEX;
use crate::index::search_backend::{BoolQuery, SearchBackend, SearchHit, WildcardClause};

pub const TITLE_BOOST: f32 = 3.0;
pub const TAGS_BOOST: f32 = 2.0;

/// 검색 히트의 `_source`다. 누락된 필드는 기본값으로 채운다.
#[derive(Debug, Default, Deserialize)]
struct WorkHitSource {
    id: Option<Uuid>,
    title: Option<String>,
    description: Option<String>,
    tags: Option<Vec<String>>,
    contributors: Option<Vec<ContributorRef>>,
}

pub struct SearchPipeline {
    backend: Arc<dyn SearchBackend>,
    max_hits: usize,
}

impl SearchPipeline {
    pub fn new(backend: Arc<dyn SearchBackend>, max_hits: usize) -> Self {
        Self {
            backend,
            max_hits: max_hits.max(1),
        }
    }

    /// 검색 파이프라인을 실행한다.
    pub async fn search(&self, term: &str, cancel: &CancellationToken) -> CoreResult<Vec<WorkResult>> {
        let Some(query) = build_work_query(term, self.max_hits) else {
            tracing::debug!("빈 검색어이므로 검색 백엔드를 호출하지 않습니다");
            return Ok(Vec::new());
        };

        let hits = run_cancellable(cancel, "작품 검색", self.backend.search(WORK_INDEX, &query))
            .await
            .inspect_err(|error| tracing::warn!(%error, "작품 검색에 실패했습니다"))?;

        let results = hits.into_iter().map(map_hit).collect::<CoreResult<Vec<_>>>()?;
        tracing::debug!(term, hits = results.len(), "작품 검색을 완료했습니다");
        Ok(results)
    }
}

/// 검색어로 boolean 질의를 만든다. 공백뿐인 검색어면 None이다.
pub fn build_work_query(term: &str, max_hits: usize) -> Option<BoolQuery> {
    let normalized = term.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    let pattern = format!("*{}*", normalized);
    let clause = |field: &str, boost: Option<f32>| WildcardClause {
        field: field.to_string(),
        pattern: pattern.clone(),
        boost,
    };

    Some(BoolQuery {
        should: vec![
            clause("title", Some(TITLE_BOOST)),
            clause("tags", Some(TAGS_BOOST)),
            clause("description", None),
        ],
        size: max_hits,
        source_fields: ["id", "title", "description", "tags", "contributors"]
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

fn map_hit(hit: SearchHit) -> CoreResult<WorkResult> {
    let source = if hit.source.is_null() {
        WorkHitSource::default()
    } else {
        serde_json::from_value::<WorkHitSource>(hit.source).map_err(|error| {
            CoreError::Search(format!("검색 히트 파싱 실패: id={}, {}", hit.id, error))
        })?
    };

    let id = match source.id {
        Some(id) => id,
        None => Uuid::parse_str(&hit.id).map_err(|error| {
            CoreError::Search(format!("검색 히트 id 파싱 실패: id={}, {}", hit.id, error))
        })?,
    };

    Ok(WorkResult {
        id,
        title: source.title.unwrap_or_default(),
        description: source.description,
        tags: source.tags.unwrap_or_default(),
        contributors: source.contributors.unwrap_or_default(),
    })
}

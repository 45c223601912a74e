// 목적:
// - 카탈로그 검색 런타임의 HTTP 경계를 제공한다.
//
// 설명:
// - 파이프라인 핸들을 묶은 AppState를 Extension으로 주입한다.
// - CoreError -> HTTP 상태 코드 변환은 error_response 한 곳에서만 한다.
// - 재색인은 별도 태스크에서 실행한다. 요청이 끊기면 토큰을 취소하지만, bulk 단계에 들어간 뒤에는 끝까지 진행한다.
//
// 디자인 패턴:
// - 파사드(Facade).
//
// 참조:
// - src_rs/core/reindex_pipeline.rs
// - src_rs/core/search_pipeline.rs
// - src_rs/core/listing_pipeline.rs
// - src_rs/core/catalog_pipeline.rs

use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::core::catalog_pipeline::CatalogPipeline;
use crate::core::errors::CoreError;
use crate::core::listing_pipeline::ListingPipeline;
use crate::core::models::{ContributorResult, NewContributor, NewWork, WorkResult};
use crate::core::reindex_pipeline::{ReindexPipeline, ReindexReport};
use crate::core::search_pipeline::SearchPipeline;
use crate::index::cache::CacheStore;
use crate::index::catalog_store::CatalogStore;
use crate::index::search_backend::SearchBackend;

type ApiError = (StatusCode, String);
type ApiResult<T> = Result<T, ApiError>;

pub struct AppState {
    pub catalog: CatalogPipeline,
    pub reindex: Arc<ReindexPipeline>,
    pub search: SearchPipeline,
    pub listing: ListingPipeline,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        backend: Arc<dyn SearchBackend>,
        cache: Arc<dyn CacheStore>,
        max_hits: usize,
    ) -> Self {
        Self {
            catalog: CatalogPipeline::new(catalog.clone()),
            reindex: Arc::new(ReindexPipeline::new(catalog.clone(), backend.clone())),
            search: SearchPipeline::new(backend, max_hits),
            listing: ListingPipeline::new(catalog, cache),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub term: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReindexResponse {
    pub message: String,
    pub report: ReindexReport,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/works", get(handle_list_works).post(handle_create_work))
        .route("/works/bulk", post(handle_create_works_bulk))
        .route("/works/search", get(handle_search_works))
        .route(
            "/works/without-contributors",
            get(handle_list_works_without_contributors),
        )
        .route(
            "/contributors",
            get(handle_list_contributors).post(handle_create_contributor),
        )
        .route("/contributors/bulk", post(handle_create_contributors_bulk))
        .route("/contributors/with-works", get(handle_list_contributors_with_works))
        .route("/indexing/reindex", post(handle_reindex))
        .layer(Extension(state))
}

pub async fn handle_list_works(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Json<Vec<WorkResult>>> {
    let cancel = CancellationToken::new();
    state
        .listing
        .work_listing(&cancel)
        .await
        .map(Json)
        .map_err(|error| error_response(&error))
}

pub async fn handle_list_works_without_contributors(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Json<Vec<WorkResult>>> {
    state
        .catalog
        .list_works_without_contributors()
        .await
        .map(Json)
        .map_err(|error| error_response(&error))
}

pub async fn handle_search_works(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<WorkResult>>> {
    let term = params.term.unwrap_or_default();
    if term.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "term 파라미터는 비어 있을 수 없습니다".to_string(),
        ));
    }

    let cancel = CancellationToken::new();
    state
        .search
        .search(&term, &cancel)
        .await
        .map(Json)
        .map_err(|error| error_response(&error))
}

pub async fn handle_create_work(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<NewWork>,
) -> ApiResult<(StatusCode, Json<WorkResult>)> {
    state
        .catalog
        .create_work(payload)
        .await
        .map(|created| (StatusCode::CREATED, Json(created)))
        .map_err(|error| error_response(&error))
}

pub async fn handle_create_works_bulk(
    Extension(state): Extension<Arc<AppState>>,
    Json(payloads): Json<Vec<NewWork>>,
) -> ApiResult<(StatusCode, Json<Vec<WorkResult>>)> {
    state
        .catalog
        .create_works(payloads)
        .await
        .map(|created| (StatusCode::CREATED, Json(created)))
        .map_err(|error| error_response(&error))
}

pub async fn handle_list_contributors(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Json<Vec<ContributorResult>>> {
    state
        .catalog
        .list_contributors(false)
        .await
        .map(Json)
        .map_err(|error| error_response(&error))
}

pub async fn handle_list_contributors_with_works(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Json<Vec<ContributorResult>>> {
    state
        .catalog
        .list_contributors(true)
        .await
        .map(Json)
        .map_err(|error| error_response(&error))
}

pub async fn handle_create_contributor(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<NewContributor>,
) -> ApiResult<(StatusCode, Json<ContributorResult>)> {
    state
        .catalog
        .create_contributor(payload)
        .await
        .map(|created| (StatusCode::CREATED, Json(created)))
        .map_err(|error| error_response(&error))
}

pub async fn handle_create_contributors_bulk(
    Extension(state): Extension<Arc<AppState>>,
    Json(payloads): Json<Vec<NewContributor>>,
) -> ApiResult<(StatusCode, Json<Vec<ContributorResult>>)> {
    state
        .catalog
        .create_contributors(payloads)
        .await
        .map(|created| (StatusCode::CREATED, Json(created)))
        .map_err(|error| error_response(&error))
}

pub async fn handle_reindex(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Json<ReindexResponse>> {
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    let pipeline = state.reindex.clone();

    let joined = tokio::spawn(async move { pipeline.reindex(&cancel).await }).await;
    guard.disarm();

    let result = joined
        .map_err(|error| CoreError::Runtime(format!("재색인 태스크 조인 실패: {}", error)))
        .and_then(|result| result);

    match result {
        Ok(report) => {
            tracing::info!(
                works = report.indexed_works,
                contributors = report.indexed_contributors,
                elapsed_ms = report.elapsed_ms,
                "재색인을 완료했습니다"
            );
            Ok(Json(ReindexResponse {
                message: "재색인을 완료했습니다".to_string(),
                report,
            }))
        }
        Err(error) => {
            tracing::error!(%error, "재색인에 실패했습니다");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("재색인 중 오류가 발생했습니다: {}", error),
            ))
        }
    }
}

/// CoreError를 HTTP 상태 코드와 메시지로 변환한다.
pub fn error_response(error: &CoreError) -> ApiError {
    match error {
        CoreError::InvalidInput(_) => (StatusCode::BAD_REQUEST, error.to_string()),
        CoreError::NotFound(_) => (StatusCode::NOT_FOUND, error.to_string()),
        CoreError::Cancelled(_) => (StatusCode::SERVICE_UNAVAILABLE, error.to_string()),
        error if error.is_reindex_failure() => {
            (StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
        }
        error => {
            tracing::error!(%error, "요청 처리에 실패했습니다");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "요청을 처리하지 못했습니다".to_string(),
            )
        }
    }
}

// 목적:
// - 작품 목록 조회를 캐시 우선(cache-aside)으로 처리한다.
//
// 설명:
// - 고정 키로 캐시를 조회하고, 적중하면 원본 재검증 없이 그대로 반환한다.
// - 미적중이면 저장소에서 작품+기여자를 읽어 응답 형태로 바꾸고 15초 TTL로 저장한다.
// - 작품이 없으면 NotFound를 반환하고 캐시에 쓰지 않는다.
// - 저장소 쓰기는 캐시를 무효화하지 않는다. TTL 동안의 지연 반영은 허용된 동작이다.
// - 캐시 조회 실패는 저장소 조회로 대체하고, 캐시 쓰기 실패는 기록만 하고 결과를 반환한다.
// - 동시 미적중은 각자 저장소를 조회하고 같은 키를 덮어쓴다(single-flight 없음).
//
// 디자인 패턴:
// - 캐시 우선 조회(Cache-Aside).
//
// 참조:
// - src_rs/index/cache.rs
// - src_rs/index/catalog_store.rs

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::core::cancellation::run_cancellable;
use crate::core::errors::{CoreError, CoreResult};
use crate::core::models::WorkResult;
use crate::index::cache::CacheStore;
use crate::index::catalog_store::CatalogStore;
use crate::index::names::WORK_LISTING_CACHE_KEY;

pub const WORK_LISTING_TTL: Duration = Duration::from_secs(15);

pub struct ListingPipeline {
    catalog: Arc<dyn CatalogStore>,
    cache: Arc<dyn CacheStore>,
}

impl ListingPipeline {
    pub fn new(catalog: Arc<dyn CatalogStore>, cache: Arc<dyn CacheStore>) -> Self {
        Self { catalog, cache }
    }

    /// 작품 목록(기여자 포함)을 반환한다.
    pub async fn work_listing(&self, cancel: &CancellationToken) -> CoreResult<Vec<WorkResult>> {
        if let Some(cached) = self.read_cached(cancel).await? {
            return Ok(cached);
        }

        let works = run_cancellable(cancel, "작품 목록 조회", self.catalog.load_works()).await?;
        if works.is_empty() {
            return Err(CoreError::NotFound("등록된 작품이 없습니다".to_string()));
        }

        let results = works.iter().map(WorkResult::from).collect::<Vec<_>>();
        let payload = serde_json::to_string(&results).map_err(|error| {
            CoreError::Serialization(format!("작품 목록 직렬화 실패: {}", error))
        })?;

        let stored = run_cancellable(
            cancel,
            "작품 목록 캐시 저장",
            self.cache
                .set_string(WORK_LISTING_CACHE_KEY, payload, WORK_LISTING_TTL),
        )
        .await;
        match stored {
            Ok(()) => tracing::debug!(
                key = WORK_LISTING_CACHE_KEY,
                works = results.len(),
                "작품 목록을 캐시에 저장했습니다"
            ),
            Err(error @ CoreError::Cancelled(_)) => return Err(error),
            Err(error) => tracing::warn!(
                key = WORK_LISTING_CACHE_KEY,
                %error,
                "작품 목록 캐시 저장에 실패했습니다. 저장소 결과를 그대로 반환합니다"
            ),
        }

        Ok(results)
    }

    async fn read_cached(&self, cancel: &CancellationToken) -> CoreResult<Option<Vec<WorkResult>>> {
        let cached = run_cancellable(
            cancel,
            "작품 목록 캐시 조회",
            self.cache.get_string(WORK_LISTING_CACHE_KEY),
        )
        .await;

        let payload = match cached {
            Ok(Some(payload)) => payload,
            Ok(None) => return Ok(None),
            Err(error @ CoreError::Cancelled(_)) => return Err(error),
            Err(error) => {
                tracing::warn!(
                    key = WORK_LISTING_CACHE_KEY,
                    %error,
                    "작품 목록 캐시 조회에 실패했습니다. 저장소에서 다시 읽습니다"
                );
                return Ok(None);
            }
        };

        match serde_json::from_str::<Vec<WorkResult>>(&payload) {
            Ok(results) => {
                tracing::debug!(key = WORK_LISTING_CACHE_KEY, "작품 목록 캐시 적중");
                Ok(Some(results))
            }
            Err(error) => {
                tracing::warn!(
                    key = WORK_LISTING_CACHE_KEY,
                    %error,
                    "캐시된 작품 목록을 해석할 수 없습니다. 저장소에서 다시 읽습니다"
                );
                Ok(None)
            }
        }
    }
}

// 목적:
// - 문자열 캐시 경계(trait)와 프로세스 내부 TTL 캐시를 제공한다.
//
// 설명:
// - 캐시 항목은 참고용이다. 원본은 항상 관계형 저장소다.
// - 만료는 수동적이다. 조회 시점에 TTL이 지난 항목은 없는 것으로 취급하고 제거한다.
// - 별도의 정리 스레드는 두지 않는다.
//
// 디자인 패턴:
// - 어댑터(Adapter).
//
// 참조:
// - src_rs/core/listing_pipeline.rs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

use crate::core::errors::{CoreError, CoreResult};

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get_string(&self, key: &str) -> CoreResult<Option<String>>;

    async fn set_string(&self, key: &str, value: String, ttl: Duration) -> CoreResult<()>;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= self.ttl
    }
}

#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CoreResult<MutexGuard<'_, HashMap<String, CacheEntry>>> {
        self.entries
            .lock()
            .map_err(|_| CoreError::Cache("캐시 잠금을 획득할 수 없습니다".to_string()))
    }

    /// 만료 여부와 관계없이 저장된 항목 수를 반환한다.
    pub fn len(&self) -> CoreResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.lock()?.is_empty())
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get_string(&self, key: &str) -> CoreResult<Option<String>> {
        let mut entries = self.lock()?;
        let now = Instant::now();

        let expired = match entries.get(key) {
            Some(entry) => entry.is_expired(now),
            None => return Ok(None),
        };

        if expired {
            entries.remove(key);
            return Ok(None);
        }

        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn set_string(&self, key: &str, value: String, ttl: Duration) -> CoreResult<()> {
        if ttl.is_zero() {
            return Err(CoreError::Cache(format!(
                "TTL은 0보다 커야 합니다: key={}",
                key
            )));
        }

        let mut entries = self.lock()?;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                created_at: Instant::now(),
                ttl,
            },
        );
        Ok(())
    }
}

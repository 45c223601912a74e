// 목적:
// - 통합 테스트에서 공유하는 인메모리 대역과 샘플 데이터를 제공한다.
//
// 설명:
// - MemoryCatalogStore는 조회 호출 수를 기록한다.
// - CountingCache/FailingCache는 캐시 호출 수와 실패 경로를 검증하는 데 사용한다.
// - FlakySearchBackend는 지정한 인덱스의 bulk 호출을 실패시킨다.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use catalog_search::core::errors::{BulkFailure, CoreError, CoreResult};
use catalog_search::core::models::{
    Contributor, ContributorAggregate, Work, WorkAggregate,
};
use catalog_search::index::cache::{CacheStore, MemoryCacheStore};
use catalog_search::index::catalog_store::{CatalogStore, WorkInsertRecord};
use catalog_search::index::memory_search::MemorySearchBackend;
use catalog_search::index::search_backend::{
    BoolQuery, BulkSummary, IndexDocument, SearchBackend, SearchHit,
};

#[derive(Default)]
struct CatalogState {
    works: Vec<Work>,
    contributors: Vec<Contributor>,
    links: Vec<(Uuid, Uuid)>,
}

#[derive(Default)]
pub struct MemoryCatalogStore {
    state: Mutex<CatalogState>,
    work_loads: AtomicUsize,
    contributor_loads: AtomicUsize,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_work(&self, title: &str, description: Option<&str>, tags: &[&str]) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().works.push(Work {
            id,
            title: title.to_string(),
            description: description.map(str::to_string),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        });
        id
    }

    pub fn add_contributor(&self, name: &str, tags: &[&str]) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().contributors.push(Contributor {
            id,
            name: name.to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        });
        id
    }

    pub fn link(&self, work_id: Uuid, contributor_id: Uuid) {
        self.state.lock().unwrap().links.push((work_id, contributor_id));
    }

    pub fn links(&self) -> Vec<(Uuid, Uuid)> {
        self.state.lock().unwrap().links.clone()
    }

    pub fn work_loads(&self) -> usize {
        self.work_loads.load(Ordering::SeqCst)
    }

    pub fn contributor_loads(&self) -> usize {
        self.contributor_loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn load_works(&self) -> CoreResult<Vec<WorkAggregate>> {
        self.work_loads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        Ok(state
            .works
            .iter()
            .map(|work| WorkAggregate {
                work: work.clone(),
                contributors: state
                    .links
                    .iter()
                    .filter(|(work_id, _)| *work_id == work.id)
                    .filter_map(|(_, contributor_id)| {
                        state.contributors.iter().find(|c| c.id == *contributor_id).cloned()
                    })
                    .collect(),
            })
            .collect())
    }

    async fn load_contributors(&self) -> CoreResult<Vec<ContributorAggregate>> {
        self.contributor_loads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        Ok(state
            .contributors
            .iter()
            .map(|contributor| ContributorAggregate {
                contributor: contributor.clone(),
                works: state
                    .links
                    .iter()
                    .filter(|(_, contributor_id)| *contributor_id == contributor.id)
                    .filter_map(|(work_id, _)| state.works.iter().find(|w| w.id == *work_id).cloned())
                    .collect(),
            })
            .collect())
    }

    async fn insert_works(&self, records: &[WorkInsertRecord]) -> CoreResult<u64> {
        let mut state = self.state.lock().unwrap();
        let known = state.contributors.iter().map(|c| c.id).collect::<HashSet<_>>();
        if records
            .iter()
            .flat_map(|record| record.contributor_ids.iter())
            .any(|id| !known.contains(id))
        {
            return Err(CoreError::InvalidInput("unknown contributor id".to_string()));
        }

        for record in records {
            state.works.push(record.work.clone());
            for contributor_id in &record.contributor_ids {
                state.links.push((record.work.id, *contributor_id));
            }
        }
        Ok(records.len() as u64)
    }

    async fn insert_contributors(&self, contributors: &[Contributor]) -> CoreResult<u64> {
        let mut state = self.state.lock().unwrap();
        state.contributors.extend(contributors.iter().cloned());
        Ok(contributors.len() as u64)
    }
}

#[derive(Default)]
pub struct CountingCache {
    inner: MemoryCacheStore,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

impl CountingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn stored_entries(&self) -> usize {
        self.inner.len().unwrap()
    }
}

#[async_trait]
impl CacheStore for CountingCache {
    async fn get_string(&self, key: &str) -> CoreResult<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get_string(key).await
    }

    async fn set_string(&self, key: &str, value: String, ttl: Duration) -> CoreResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set_string(key, value, ttl).await
    }
}

pub struct FailingCache;

#[async_trait]
impl CacheStore for FailingCache {
    async fn get_string(&self, _key: &str) -> CoreResult<Option<String>> {
        Err(CoreError::Cache("connection refused".to_string()))
    }

    async fn set_string(&self, _key: &str, _value: String, _ttl: Duration) -> CoreResult<()> {
        Err(CoreError::Cache("connection refused".to_string()))
    }
}

#[derive(Default)]
pub struct FlakySearchBackend {
    pub inner: MemorySearchBackend,
    failing_index: Mutex<Option<String>>,
    bulk_calls: Mutex<Vec<String>>,
    search_calls: AtomicUsize,
}

impl FlakySearchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_bulk_for(&self, index: Option<&str>) {
        *self.failing_index.lock().unwrap() = index.map(str::to_string);
    }

    pub fn bulk_calls(&self) -> Vec<String> {
        self.bulk_calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchBackend for FlakySearchBackend {
    async fn index_exists(&self, index: &str) -> CoreResult<bool> {
        self.inner.index_exists(index).await
    }

    async fn create_index(&self, index: &str, schema: &Value) -> CoreResult<()> {
        self.inner.create_index(index, schema).await
    }

    async fn bulk_upsert(&self, index: &str, documents: Vec<IndexDocument>) -> CoreResult<BulkSummary> {
        self.bulk_calls.lock().unwrap().push(index.to_string());
        if self.failing_index.lock().unwrap().as_deref() == Some(index) {
            return Err(CoreError::BulkIndex {
                index: index.to_string(),
                failures: vec![BulkFailure {
                    document_id: "*".to_string(),
                    reason: "es_rejected_execution_exception".to_string(),
                }],
            });
        }
        self.inner.bulk_upsert(index, documents).await
    }

    async fn search(&self, index: &str, query: &BoolQuery) -> CoreResult<Vec<SearchHit>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.search(index, query).await
    }
}

/// 기여자 2명, 작품 3개로 이루어진 샘플 카탈로그다.
pub struct SampleCatalog {
    pub store: Arc<MemoryCatalogStore>,
    pub atlas: Uuid,
    pub shadow: Uuid,
    pub orphan: Uuid,
    pub mitchell: Uuid,
    pub ellison: Uuid,
}

pub fn sample_catalog() -> SampleCatalog {
    let store = Arc::new(MemoryCatalogStore::new());
    let mitchell = store.add_contributor("David Mitchell", &["novelist"]);
    let ellison = store.add_contributor("Harlan Ellison", &["sci-fi", "sci-fi"]);

    let atlas = store.add_work(
        "Cloud Atlas",
        Some("Six nested stories"),
        &["novel", "literary", "novel"],
    );
    let shadow = store.add_work("Shadow", None, &[]);
    let orphan = store.add_work("Untitled Draft", Some("No contributors yet"), &["draft"]);

    store.link(atlas, mitchell);
    store.link(shadow, ellison);
    store.link(atlas, ellison);

    SampleCatalog {
        store,
        atlas,
        shadow,
        orphan,
        mitchell,
        ellison,
    }
}

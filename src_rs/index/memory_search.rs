// 목적:
// - 프로세스 내부 검색 백엔드를 제공한다.
//
// 설명:
// - 검색 URL이 설정되지 않은 로컬 실행과 테스트에서 사용한다.
// - 문서는 인덱스별로 id를 키로 저장하므로 같은 id의 upsert는 덮어쓰기다.
// - wildcard 절은 분석된 토큰(소문자, 영숫자 단위) 중 하나라도 패턴과 맞으면 일치로 본다.
// - 점수는 일치한 절의 boost 합이다.
//
// 디자인 패턴:
// - 어댑터(Adapter) + 인메모리 대역(In-memory Double).
//
// 참조:
// - src_rs/index/search_backend.rs
// - src_rs/index/opensearch.rs

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::core::errors::{BulkFailure, CoreError, CoreResult};
use crate::index::search_backend::{BoolQuery, BulkSummary, IndexDocument, SearchBackend, SearchHit};

#[derive(Debug, Default)]
struct MemoryIndex {
    schema: Value,
    documents: BTreeMap<String, Value>,
}

#[derive(Debug, Default)]
pub struct MemorySearchBackend {
    indices: Mutex<HashMap<String, MemoryIndex>>,
}

impl MemorySearchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CoreResult<MutexGuard<'_, HashMap<String, MemoryIndex>>> {
        self.indices
            .lock()
            .map_err(|_| CoreError::Runtime("검색 인덱스 잠금을 획득할 수 없습니다".to_string()))
    }

    /// 인덱스에 저장된 문서를 id 순서로 반환한다. 인덱스가 없으면 None이다.
    pub fn documents(&self, index: &str) -> CoreResult<Option<Vec<(String, Value)>>> {
        let indices = self.lock()?;
        Ok(indices.get(index).map(|stored| {
            stored
                .documents
                .iter()
                .map(|(id, body)| (id.clone(), body.clone()))
                .collect()
        }))
    }

    pub fn schema(&self, index: &str) -> CoreResult<Option<Value>> {
        let indices = self.lock()?;
        Ok(indices.get(index).map(|stored| stored.schema.clone()))
    }
}

#[async_trait]
impl SearchBackend for MemorySearchBackend {
    async fn index_exists(&self, index: &str) -> CoreResult<bool> {
        Ok(self.lock()?.contains_key(index))
    }

    async fn create_index(&self, index: &str, schema: &Value) -> CoreResult<()> {
        let mut indices = self.lock()?;
        indices.entry(index.to_string()).or_insert_with(|| MemoryIndex {
            schema: schema.clone(),
            documents: BTreeMap::new(),
        });
        Ok(())
    }

    async fn bulk_upsert(&self, index: &str, documents: Vec<IndexDocument>) -> CoreResult<BulkSummary> {
        let mut indices = self.lock()?;
        let stored = indices.get_mut(index).ok_or_else(|| CoreError::BulkIndex {
            index: index.to_string(),
            failures: vec![BulkFailure {
                document_id: "*".to_string(),
                reason: "index_not_found_exception".to_string(),
            }],
        })?;

        let indexed = documents.len();
        for document in documents {
            stored.documents.insert(document.id, document.body);
        }

        Ok(BulkSummary { indexed })
    }

    async fn search(&self, index: &str, query: &BoolQuery) -> CoreResult<Vec<SearchHit>> {
        let indices = self.lock()?;
        let stored = indices
            .get(index)
            .ok_or_else(|| CoreError::Search(format!("index_not_found_exception: {}", index)))?;

        let mut hits = stored
            .documents
            .iter()
            .filter_map(|(id, body)| {
                let score = query
                    .should
                    .iter()
                    .filter(|clause| field_matches(body.get(&clause.field), &clause.pattern))
                    .map(|clause| clause.boost.unwrap_or(1.0))
                    .sum::<f32>();

                (score > 0.0).then(|| SearchHit {
                    id: id.clone(),
                    score,
                    source: project_source(body, &query.source_fields),
                })
            })
            .collect::<Vec<_>>();

        hits.sort_by(|left, right| {
            right
                .score
                .partial_cmp(&left.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(query.size);
        Ok(hits)
    }
}

fn project_source(body: &Value, fields: &[String]) -> Value {
    if fields.is_empty() {
        return body.clone();
    }

    match body {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| fields.iter().any(|field| field == *key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn field_matches(value: Option<&Value>, pattern: &str) -> bool {
    match value {
        Some(Value::String(text)) => analyze(text).iter().any(|token| glob_match(pattern, token)),
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| field_matches(Some(item), pattern)),
        _ => false,
    }
}

/// 표준 분석기처럼 영숫자 단위로 자르고 소문자로 만든다.
fn analyze(text: &str) -> Vec<String> {
    text.split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// `*`(0개 이상), `?`(정확히 1개)를 지원하는 glob 비교다.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.chars().collect::<Vec<_>>();
    let text = text.chars().collect::<Vec<_>>();

    let (mut p, mut t) = (0usize, 0usize);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|ch| *ch == '*')
}

// 목적:
// - 검색 백엔드 경계(trait)와 질의/문서 타입을 정의한다.
//
// 설명:
// - 존재 확인, 인덱스 생성, id 기준 bulk upsert, boolean 질의를 추상화한다.
// - create_index는 "이미 존재함"을 성공으로 처리해야 한다. 동시 재색인 경합에서 진 쪽이 실패하면 안 된다.
// - 오류는 CoreError 분류(IndexCreation/BulkIndex/Search)로 반환한다.
//
// 디자인 패턴:
// - 어댑터(Adapter).
//
// 참조:
// - src_rs/index/opensearch.rs
// - src_rs/index/memory_search.rs

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::core::errors::{CoreError, CoreResult};

/// id를 키로 저장되는 색인 대상 문서다.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDocument {
    pub id: String,
    pub body: Value,
}

impl IndexDocument {
    pub fn from_serializable<T: Serialize>(id: impl Into<String>, document: &T) -> CoreResult<Self> {
        let body = serde_json::to_value(document).map_err(|error| {
            CoreError::Serialization(format!("검색 문서 직렬화 실패: {}", error))
        })?;

        Ok(Self {
            id: id.into(),
            body,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WildcardClause {
    pub field: String,
    pub pattern: String,
    pub boost: Option<f32>,
}

/// should 절(OR, 점수 합산)만 사용하는 boolean 질의다.
#[derive(Debug, Clone, PartialEq)]
pub struct BoolQuery {
    pub should: Vec<WildcardClause>,
    pub size: usize,
    pub source_fields: Vec<String>,
}

impl BoolQuery {
    /// OpenSearch `_search` 요청 본문으로 변환한다.
    pub fn to_request_body(&self) -> Value {
        let should = self
            .should
            .iter()
            .map(|clause| {
                let mut options = Map::new();
                options.insert("value".to_string(), Value::String(clause.pattern.clone()));
                if let Some(boost) = clause.boost {
                    options.insert("boost".to_string(), json!(boost));
                }
                let mut field = Map::new();
                field.insert(clause.field.clone(), Value::Object(options));
                json!({ "wildcard": Value::Object(field) })
            })
            .collect::<Vec<_>>();

        json!({
            "size": self.size,
            "_source": { "includes": self.source_fields },
            "query": {
                "bool": {
                    "should": should,
                    "minimum_should_match": 1
                }
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub source: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkSummary {
    pub indexed: usize,
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn index_exists(&self, index: &str) -> CoreResult<bool>;

    async fn create_index(&self, index: &str, schema: &Value) -> CoreResult<()>;

    async fn bulk_upsert(&self, index: &str, documents: Vec<IndexDocument>) -> CoreResult<BulkSummary>;

    /// 점수 내림차순으로 정렬된 히트를 반환한다. 동점 순서는 보장하지 않는다.
    async fn search(&self, index: &str, query: &BoolQuery) -> CoreResult<Vec<SearchHit>>;
}

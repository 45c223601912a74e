// 목적:
// - OpenSearch REST API에 대한 검색 백엔드 어댑터를 제공한다.
//
// 설명:
// - HEAD/PUT 인덱스, `_bulk`(NDJSON), `_search` 호출을 담당한다.
// - 인덱스 생성 시 resource_already_exists_exception은 성공으로 처리한다.
// - bulk 응답의 항목별 오류를 모아 BulkIndex 오류로 반환한다.
//
// 디자인 패턴:
// - 어댑터(Adapter).
//
// 참조:
// - src_rs/index/search_backend.rs
// - src_rs/core/reindex_pipeline.rs

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::config::SearchBackendConfigPayload;
use crate::core::errors::{BulkFailure, CoreError, CoreResult};
use crate::index::search_backend::{BoolQuery, BulkSummary, IndexDocument, SearchBackend, SearchHit};

const ALREADY_EXISTS: &str = "resource_already_exists_exception";

#[derive(Clone)]
pub struct OpenSearchClient {
    client: Client,
    base_url: String,
    config: SearchBackendConfigPayload,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed {
        #[serde(rename = "type")]
        kind: Option<String>,
        reason: Option<String>,
    },
    Plain(String),
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    #[serde(rename = "_id")]
    id: Option<String>,
    status: Option<u16>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score")]
    score: Option<f32>,
    #[serde(rename = "_source", default)]
    source: Value,
}

impl OpenSearchClient {
    pub fn new(config: SearchBackendConfigPayload) -> CoreResult<Self> {
        config.validate()?;

        let base_url = config
            .url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .ok_or_else(|| {
                CoreError::InvalidConfig("search.url이 필요합니다".to_string())
            })?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|error| CoreError::Http(format!("HTTP 클라이언트 생성 실패: {}", error)))?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match (self.config.username.as_ref(), self.config.password.as_ref()) {
            (Some(username), password) => builder.basic_auth(username, password),
            _ => builder,
        }
    }
}

#[async_trait]
impl SearchBackend for OpenSearchClient {
    async fn index_exists(&self, index: &str) -> CoreResult<bool> {
        let response = self
            .request(Method::HEAD, index)
            .send()
            .await
            .map_err(|error| CoreError::Http(format!("인덱스 존재 확인 실패: index={}, {}", index, error)))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(CoreError::Http(format!(
                "인덱스 존재 확인 상태 오류: index={}, status={}",
                index, status
            ))),
        }
    }

    async fn create_index(&self, index: &str, schema: &Value) -> CoreResult<()> {
        let response = self
            .request(Method::PUT, index)
            .json(&json!({ "mappings": schema }))
            .send()
            .await
            .map_err(|error| CoreError::IndexCreation {
                index: index.to_string(),
                message: format!("요청 실패: {}", error),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|error| CoreError::IndexCreation {
            index: index.to_string(),
            message: format!("응답 본문 읽기 실패: {}", error),
        })?;

        if status.is_success() {
            tracing::info!(index, "검색 인덱스를 생성했습니다");
            return Ok(());
        }

        if error_kind(&body).as_deref() == Some(ALREADY_EXISTS) {
            tracing::debug!(index, "인덱스가 이미 존재합니다. 생성 경합을 성공으로 처리합니다");
            return Ok(());
        }

        Err(CoreError::IndexCreation {
            index: index.to_string(),
            message: format!("status={}, body={}", status, body),
        })
    }

    async fn bulk_upsert(&self, index: &str, documents: Vec<IndexDocument>) -> CoreResult<BulkSummary> {
        if documents.is_empty() {
            return Ok(BulkSummary::default());
        }

        let payload = to_ndjson(&documents)?;
        let bulk_failure = |reason: String| CoreError::BulkIndex {
            index: index.to_string(),
            failures: vec![BulkFailure {
                document_id: "*".to_string(),
                reason,
            }],
        };

        let response = self
            .request(Method::POST, &format!("{}/_bulk?refresh=wait_for", index))
            .header(CONTENT_TYPE, "application/x-ndjson")
            .body(payload)
            .send()
            .await
            .map_err(|error| bulk_failure(format!("요청 실패: {}", error)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| bulk_failure(format!("응답 본문 읽기 실패: {}", error)))?;

        if !status.is_success() {
            let reason = error_reason(&body).unwrap_or_else(|| format!("status={}, body={}", status, body));
            return Err(bulk_failure(reason));
        }

        let parsed: BulkResponse = serde_json::from_str(&body)
            .map_err(|error| bulk_failure(format!("응답 파싱 실패: {}, body={}", error, body)))?;

        let failures = collect_bulk_failures(&parsed.items);
        if parsed.errors || !failures.is_empty() {
            return Err(CoreError::BulkIndex {
                index: index.to_string(),
                failures,
            });
        }

        Ok(BulkSummary {
            indexed: documents.len(),
        })
    }

    async fn search(&self, index: &str, query: &BoolQuery) -> CoreResult<Vec<SearchHit>> {
        let response = self
            .request(Method::POST, &format!("{}/_search", index))
            .json(&query.to_request_body())
            .send()
            .await
            .map_err(|error| CoreError::Search(format!("검색 요청 실패: {}", error)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| CoreError::Search(format!("검색 응답 본문 읽기 실패: {}", error)))?;

        if !status.is_success() {
            return Err(CoreError::Search(format!(
                "검색 상태 오류: status={}, body={}",
                status, body
            )));
        }

        let parsed: SearchResponse = serde_json::from_str(&body).map_err(|error| {
            CoreError::Search(format!("검색 응답 파싱 실패: {}, body={}", error, body))
        })?;

        Ok(parsed
            .hits
            .hits
            .into_iter()
            .map(|hit| SearchHit {
                id: hit.id,
                score: hit.score.unwrap_or(0.0),
                source: hit.source,
            })
            .collect())
    }
}

fn to_ndjson(documents: &[IndexDocument]) -> CoreResult<String> {
    let mut payload = String::new();
    for document in documents {
        let action = json!({ "index": { "_id": document.id } });
        for line in [&action, &document.body] {
            let encoded = serde_json::to_string(line).map_err(|error| {
                CoreError::Serialization(format!("bulk 본문 직렬화 실패: {}", error))
            })?;
            payload.push_str(&encoded);
            payload.push('\n');
        }
    }
    Ok(payload)
}

fn collect_bulk_failures(items: &[Value]) -> Vec<BulkFailure> {
    items
        .iter()
        .filter_map(|item| item.as_object()?.values().next().cloned())
        .filter_map(|operation| serde_json::from_value::<BulkItem>(operation).ok())
        .filter(|item| item.error.is_some() || item.status.is_some_and(|status| status >= 300))
        .map(|item| BulkFailure {
            document_id: item.id.unwrap_or_else(|| "unknown".to_string()),
            reason: match item.error {
                Some(ErrorBody::Detailed { kind, reason }) => match (kind, reason) {
                    (Some(kind), Some(reason)) => format!("{}: {}", kind, reason),
                    (kind, reason) => reason.or(kind).unwrap_or_else(|| "unknown".to_string()),
                },
                Some(ErrorBody::Plain(reason)) => reason,
                None => format!("status={}", item.status.unwrap_or_default()),
            },
        })
        .collect()
}

fn parse_error(body: &str) -> Option<ErrorBody> {
    serde_json::from_str::<ErrorEnvelope>(body).ok()?.error
}

fn error_kind(body: &str) -> Option<String> {
    match parse_error(body)? {
        ErrorBody::Detailed { kind, .. } => kind,
        ErrorBody::Plain(_) => None,
    }
}

fn error_reason(body: &str) -> Option<String> {
    match parse_error(body)? {
        ErrorBody::Detailed { reason, kind } => reason.or(kind),
        ErrorBody::Plain(reason) => Some(reason),
    }
}

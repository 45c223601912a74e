// 목적:
// - 카탈로그 검색 런타임의 표준 오류 타입을 정의한다.
//
// 설명:
// - 재색인/검색/목록 조회 실패를 명시적인 분류로 구분해 호출자에게 전달한다.
// - 백엔드가 돌려준 진단 메시지는 문자열로 보존한다.
//
// 디자인 패턴:
// - 도메인 오류 열거형(Domain Error Enum).
//
// 참조:
// - src_rs/core/reindex_pipeline.rs
// - src_rs/core/search_pipeline.rs
// - src_rs/core/listing_pipeline.rs
// - src_rs/api/http.rs

use thiserror::Error;

/// bulk 요청에서 개별 문서 단위로 실패한 항목이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    pub document_id: String,
    pub reason: String,
}

/// 코어 계층에서 공통으로 사용하는 오류 열거형이다.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("재색인할 작품 데이터가 없습니다")]
    EmptySource,
    #[error("인덱스 생성에 실패했습니다: index={index}, {message}")]
    IndexCreation { index: String, message: String },
    #[error("bulk 색인에 실패했습니다: index={index}, {}", describe_failures(.failures))]
    BulkIndex {
        index: String,
        failures: Vec<BulkFailure>,
    },
    #[error("검색 실행에 실패했습니다: {0}")]
    Search(String),
    #[error("조회 결과가 없습니다: {0}")]
    NotFound(String),
    #[error("캐시 작업에 실패했습니다: {0}")]
    Cache(String),
    #[error("입력값이 유효하지 않습니다: {0}")]
    InvalidInput(String),
    #[error("설정값이 유효하지 않습니다: {0}")]
    InvalidConfig(String),
    #[error("데이터베이스 작업에 실패했습니다: {0}")]
    Db(String),
    #[error("검색 백엔드 HTTP 호출에 실패했습니다: {0}")]
    Http(String),
    #[error("직렬화/역직렬화에 실패했습니다: {0}")]
    Serialization(String),
    #[error("작업이 취소되었습니다: {0}")]
    Cancelled(String),
    #[error("런타임 처리 중 오류가 발생했습니다: {0}")]
    Runtime(String),
}

impl CoreError {
    /// 재색인 경로에서 발생하는 오류인지 판단한다.
    pub fn is_reindex_failure(&self) -> bool {
        matches!(
            self,
            CoreError::EmptySource | CoreError::IndexCreation { .. } | CoreError::BulkIndex { .. }
        )
    }
}

fn describe_failures(failures: &[BulkFailure]) -> String {
    if failures.is_empty() {
        return "reason=unknown".to_string();
    }

    failures
        .iter()
        .map(|failure| format!("id={} reason={}", failure.document_id, failure.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type CoreResult<T> = Result<T, CoreError>;

// 목적:
// - 런타임 설정 페이로드를 정의하고 검증한다.
//
// 설명:
// - Postgres/검색 백엔드/HTTP 서버 설정을 분리해 각 어댑터에 그대로 전달한다.
// - 검증 실패는 기동 시점에 InvalidConfig로 드러낸다.
//
// 디자인 패턴:
// - 설정 페이로드(Config Payload) + 실패 빠르게(Fail Fast).
//
// 참조:
// - src_rs/index/postgres_repo.rs
// - src_rs/index/opensearch.rs
// - src_rs/main.rs

use serde::{Deserialize, Serialize};

use crate::core::errors::{CoreError, CoreResult};
use crate::index::sql::validate_identifier;

pub const DEFAULT_MAX_HITS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfigPayload {
    pub dsn: String,
    pub works_table: String,
    pub contributors_table: String,
    pub links_table: String,
    pub pool_min: u32,
    pub pool_max: u32,
    pub connect_timeout_ms: u64,
    pub statement_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchBackendConfigPayload {
    /// 비어 있으면 프로세스 내부 검색 백엔드를 사용한다.
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_ms: u64,
    pub max_hits: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfigPayload {
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfigPayload,
    pub postgres: PostgresConfigPayload,
    pub search: SearchBackendConfigPayload,
}

impl Default for PostgresConfigPayload {
    fn default() -> Self {
        Self {
            dsn: String::new(),
            works_table: "works".to_string(),
            contributors_table: "contributors".to_string(),
            links_table: "work_contributors".to_string(),
            pool_min: 1,
            pool_max: 8,
            connect_timeout_ms: 5_000,
            statement_timeout_ms: 10_000,
        }
    }
}

impl Default for SearchBackendConfigPayload {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            password: None,
            timeout_ms: 10_000,
            max_hits: DEFAULT_MAX_HITS,
        }
    }
}

impl PostgresConfigPayload {
    pub fn validate(&self) -> CoreResult<()> {
        if self.dsn.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "postgres.dsn은 비어 있을 수 없습니다".to_string(),
            ));
        }

        validate_identifier(&self.works_table, "postgres.works_table")?;
        validate_identifier(&self.contributors_table, "postgres.contributors_table")?;
        validate_identifier(&self.links_table, "postgres.links_table")?;

        if self.pool_max < self.pool_min {
            return Err(CoreError::InvalidConfig(format!(
                "postgres.pool_max({})는 pool_min({}) 이상이어야 합니다",
                self.pool_max, self.pool_min
            )));
        }

        if self.connect_timeout_ms == 0 || self.statement_timeout_ms == 0 {
            return Err(CoreError::InvalidConfig(
                "postgres 타임아웃은 1 이상이어야 합니다".to_string(),
            ));
        }

        Ok(())
    }
}

impl SearchBackendConfigPayload {
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(url) = self.url.as_deref() {
            if url.trim().is_empty() {
                return Err(CoreError::InvalidConfig(
                    "search.url은 비어 있을 수 없습니다".to_string(),
                ));
            }
        }

        if self.username.is_some() != self.password.is_some() {
            return Err(CoreError::InvalidConfig(
                "search.username과 search.password는 함께 지정해야 합니다".to_string(),
            ));
        }

        if self.timeout_ms == 0 {
            return Err(CoreError::InvalidConfig(
                "search.timeout_ms는 1 이상이어야 합니다".to_string(),
            ));
        }

        if self.max_hits == 0 {
            return Err(CoreError::InvalidConfig(
                "search.max_hits는 1 이상이어야 합니다".to_string(),
            ));
        }

        Ok(())
    }
}

impl AppConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.server.bind.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "server.bind는 비어 있을 수 없습니다".to_string(),
            ));
        }

        self.postgres.validate()?;
        self.search.validate()
    }
}

// 목적:
// - 카탈로그 검색 HTTP 서버를 기동한다.
//
// 설명:
// - 설정 파싱 -> 인덱스 이름 검증 -> Postgres 연결/스키마 확인 -> 어댑터/파이프라인 조립 -> HTTP 서비스 순서로 처리한다.
// - 검색 URL이 없으면 프로세스 내부 검색 백엔드로 실행한다.
// - 잘못된 설정은 기동 시점에 종료 사유가 된다.
//
// 참조:
// - src_rs/core/config.rs
// - src_rs/api/http.rs

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use catalog_search::api::http::{router, AppState};
use catalog_search::core::config::{
    AppConfig, PostgresConfigPayload, SearchBackendConfigPayload, ServerConfigPayload,
    DEFAULT_MAX_HITS,
};
use catalog_search::index::cache::{CacheStore, MemoryCacheStore};
use catalog_search::index::catalog_store::CatalogStore;
use catalog_search::index::memory_search::MemorySearchBackend;
use catalog_search::index::names::validate_index_names;
use catalog_search::index::opensearch::OpenSearchClient;
use catalog_search::index::postgres_repo::PostgresCatalogRepository;
use catalog_search::index::search_backend::SearchBackend;

#[derive(Debug, Parser)]
#[command(name = "catalog-search", version, about = "Catalog search and cache-aside listing service")]
struct Cli {
    #[arg(long, env = "CATALOG_BIND", default_value = "0.0.0.0:8080")]
    bind: String,

    #[arg(long, env = "CATALOG_POSTGRES_DSN")]
    postgres_dsn: String,

    #[arg(long, env = "CATALOG_POSTGRES_POOL_MAX", default_value_t = 8)]
    postgres_pool_max: u32,

    #[arg(long, env = "CATALOG_POSTGRES_STATEMENT_TIMEOUT_MS", default_value_t = 10_000)]
    postgres_statement_timeout_ms: u64,

    /// 비워 두면 프로세스 내부 검색 백엔드를 사용한다.
    #[arg(long, env = "CATALOG_SEARCH_URL")]
    search_url: Option<String>,

    #[arg(long, env = "CATALOG_SEARCH_USERNAME")]
    search_username: Option<String>,

    #[arg(long, env = "CATALOG_SEARCH_PASSWORD", hide_env_values = true)]
    search_password: Option<String>,

    #[arg(long, env = "CATALOG_SEARCH_TIMEOUT_MS", default_value_t = 10_000)]
    search_timeout_ms: u64,

    #[arg(long, env = "CATALOG_SEARCH_MAX_HITS", default_value_t = DEFAULT_MAX_HITS)]
    search_max_hits: usize,
}

impl Cli {
    fn into_config(self) -> AppConfig {
        AppConfig {
            server: ServerConfigPayload { bind: self.bind },
            postgres: PostgresConfigPayload {
                dsn: self.postgres_dsn,
                pool_max: self.postgres_pool_max,
                statement_timeout_ms: self.postgres_statement_timeout_ms,
                ..PostgresConfigPayload::default()
            },
            search: SearchBackendConfigPayload {
                url: self.search_url,
                username: self.search_username,
                password: self.search_password,
                timeout_ms: self.search_timeout_ms,
                max_hits: self.search_max_hits,
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Cli::parse().into_config();
    config.validate().context("설정 검증 실패")?;
    validate_index_names().context("검색 인덱스 이름 검증 실패")?;

    let repository = PostgresCatalogRepository::new(&config.postgres)
        .await
        .context("Postgres 저장소 초기화 실패")?;
    repository.ensure_schema().await.context("카탈로그 스키마 생성 실패")?;
    let catalog: Arc<dyn CatalogStore> = Arc::new(repository);

    let backend: Arc<dyn SearchBackend> = match config.search.url.as_deref() {
        Some(url) => {
            tracing::info!(url, "OpenSearch 백엔드를 사용합니다");
            Arc::new(OpenSearchClient::new(config.search.clone()).context("검색 백엔드 초기화 실패")?)
        }
        None => {
            tracing::warn!("search url이 없어 프로세스 내부 검색 백엔드를 사용합니다");
            Arc::new(MemorySearchBackend::new())
        }
    };
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());

    let state = Arc::new(AppState::new(catalog, backend, cache, config.search.max_hits));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("HTTP 바인드 실패: {}", config.server.bind))?;
    tracing::info!(bind = %config.server.bind, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 서버 실행 실패")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "종료 신호를 기다릴 수 없습니다");
    }
}

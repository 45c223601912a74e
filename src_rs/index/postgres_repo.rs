// 목적:
// - PostgreSQL 기반 카탈로그 저장소 접근을 담당한다.
//
// 설명:
// - 작품/기여자 전체 조회(연관 관계 즉시 로딩)와 트랜잭션 단위 삽입을 제공한다.
// - 연관 관계는 본 테이블 조회 1회 + 연결 테이블 조인 1회로 읽어 메모리에서 묶는다.
// - 테이블명은 실행 시 검증해 SQL 주입 위험을 줄인다.
//
// 디자인 패턴:
// - 저장소 패턴(Repository Pattern).
//
// 참조:
// - src_rs/index/sql.rs
// - src_rs/index/catalog_store.rs

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Executor, PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

use crate::core::config::PostgresConfigPayload;
use crate::core::errors::{CoreError, CoreResult};
use crate::core::models::{Contributor, ContributorAggregate, Work, WorkAggregate};
use crate::index::catalog_store::{CatalogStore, WorkInsertRecord};
use crate::index::sql::schema_statements;

pub struct PostgresCatalogRepository {
    pool: PgPool,
    works_table: String,
    contributors_table: String,
    links_table: String,
}

impl PostgresCatalogRepository {
    pub async fn new(config: &PostgresConfigPayload) -> CoreResult<Self> {
        config.validate()?;

        let timeout_statement = format!("SET statement_timeout = {}", config.statement_timeout_ms);
        let pool = PgPoolOptions::new()
            .min_connections(config.pool_min)
            .max_connections(config.pool_max.max(config.pool_min))
            .acquire_timeout(std::time::Duration::from_millis(config.connect_timeout_ms))
            .after_connect(move |connection, _meta| {
                let statement = timeout_statement.clone();
                Box::pin(async move {
                    connection.execute(statement.as_str()).await?;
                    Ok(())
                })
            })
            .connect(&config.dsn)
            .await
            .map_err(|error| CoreError::Db(format!("Postgres 연결 실패: {}", error)))?;

        Ok(Self {
            pool,
            works_table: config.works_table.clone(),
            contributors_table: config.contributors_table.clone(),
            links_table: config.links_table.clone(),
        })
    }

    /// 카탈로그 테이블이 없으면 생성한다.
    pub async fn ensure_schema(&self) -> CoreResult<()> {
        for statement in schema_statements(&self.works_table, &self.contributors_table, &self.links_table) {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|error| CoreError::Db(format!("스키마 생성 실패: {}", error)))?;
        }

        tracing::info!(
            works_table = %self.works_table,
            contributors_table = %self.contributors_table,
            links_table = %self.links_table,
            "카탈로그 스키마를 확인했습니다"
        );
        Ok(())
    }

    async fn fetch_works(&self) -> CoreResult<Vec<Work>> {
        let sql = format!(
            "SELECT id, title, description, tags FROM {} ORDER BY title, id",
            self.works_table
        );

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| CoreError::Db(format!("work 조회 실패: {}", error)))?;

        rows.into_iter().map(map_work_row).collect::<CoreResult<Vec<_>>>()
    }

    async fn fetch_contributors(&self) -> CoreResult<Vec<Contributor>> {
        let sql = format!(
            "SELECT id, name, tags FROM {} ORDER BY name, id",
            self.contributors_table
        );

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| CoreError::Db(format!("contributor 조회 실패: {}", error)))?;

        rows.into_iter()
            .map(map_contributor_row)
            .collect::<CoreResult<Vec<_>>>()
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalogRepository {
    async fn load_works(&self) -> CoreResult<Vec<WorkAggregate>> {
        let works = self.fetch_works().await?;

        let sql = format!(
            "SELECT l.work_id AS owner_id, c.id, c.name, c.tags \
             FROM {} l JOIN {} c ON c.id = l.contributor_id \
             ORDER BY c.name, c.id",
            self.links_table, self.contributors_table
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| CoreError::Db(format!("work 연관 관계 조회 실패: {}", error)))?;

        let mut by_work = HashMap::<Uuid, Vec<Contributor>>::new();
        for row in rows {
            let owner_id = map_owner_id(&row)?;
            by_work.entry(owner_id).or_default().push(map_contributor_row(row)?);
        }

        Ok(works
            .into_iter()
            .map(|work| WorkAggregate {
                contributors: by_work.remove(&work.id).unwrap_or_default(),
                work,
            })
            .collect())
    }

    async fn load_contributors(&self) -> CoreResult<Vec<ContributorAggregate>> {
        let contributors = self.fetch_contributors().await?;

        let sql = format!(
            "SELECT l.contributor_id AS owner_id, w.id, w.title, w.description, w.tags \
             FROM {} l JOIN {} w ON w.id = l.work_id \
             ORDER BY w.title, w.id",
            self.links_table, self.works_table
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| CoreError::Db(format!("contributor 연관 관계 조회 실패: {}", error)))?;

        let mut by_contributor = HashMap::<Uuid, Vec<Work>>::new();
        for row in rows {
            let owner_id = map_owner_id(&row)?;
            by_contributor.entry(owner_id).or_default().push(map_work_row(row)?);
        }

        Ok(contributors
            .into_iter()
            .map(|contributor| ContributorAggregate {
                works: by_contributor.remove(&contributor.id).unwrap_or_default(),
                contributor,
            })
            .collect())
    }

    async fn insert_works(&self, records: &[WorkInsertRecord]) -> CoreResult<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let work_sql = format!(
            "INSERT INTO {} (id, title, description, tags) VALUES ($1, $2, $3, $4)",
            self.works_table
        );
        let link_sql = format!(
            "INSERT INTO {} (work_id, contributor_id) VALUES ($1, $2)",
            self.links_table
        );

        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| CoreError::Db(format!("트랜잭션 시작 실패: {}", error)))?;

        let mut affected = 0u64;
        for record in records {
            let result = sqlx::query(&work_sql)
                .bind(record.work.id)
                .bind(&record.work.title)
                .bind(&record.work.description)
                .bind(&record.work.tags)
                .execute(&mut *transaction)
                .await
                .map_err(|error| map_write_error("work 삽입 실패", error))?;
            affected = affected.saturating_add(result.rows_affected());

            for contributor_id in &record.contributor_ids {
                sqlx::query(&link_sql)
                    .bind(record.work.id)
                    .bind(contributor_id)
                    .execute(&mut *transaction)
                    .await
                    .map_err(|error| map_write_error("work 연결 삽입 실패", error))?;
            }
        }

        transaction
            .commit()
            .await
            .map_err(|error| CoreError::Db(format!("트랜잭션 커밋 실패: {}", error)))?;

        Ok(affected)
    }

    async fn insert_contributors(&self, contributors: &[Contributor]) -> CoreResult<u64> {
        if contributors.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "INSERT INTO {} (id, name, tags) VALUES ($1, $2, $3)",
            self.contributors_table
        );

        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| CoreError::Db(format!("트랜잭션 시작 실패: {}", error)))?;

        let mut affected = 0u64;
        for contributor in contributors {
            let result = sqlx::query(&sql)
                .bind(contributor.id)
                .bind(&contributor.name)
                .bind(&contributor.tags)
                .execute(&mut *transaction)
                .await
                .map_err(|error| map_write_error("contributor 삽입 실패", error))?;
            affected = affected.saturating_add(result.rows_affected());
        }

        transaction
            .commit()
            .await
            .map_err(|error| CoreError::Db(format!("트랜잭션 커밋 실패: {}", error)))?;

        Ok(affected)
    }
}

fn map_write_error(context: &str, error: sqlx::Error) -> CoreError {
    let foreign_key_violation = error
        .as_database_error()
        .is_some_and(|database_error| database_error.is_foreign_key_violation());

    if foreign_key_violation {
        return CoreError::InvalidInput(format!(
            "{}: 존재하지 않는 기여자 id가 포함되어 있습니다",
            context
        ));
    }

    CoreError::Db(format!("{}: {}", context, error))
}

fn map_owner_id(row: &PgRow) -> CoreResult<Uuid> {
    row.try_get::<Uuid, _>("owner_id")
        .map_err(|error| CoreError::Db(format!("link.owner_id 파싱 실패: {}", error)))
}

fn map_work_row(row: PgRow) -> CoreResult<Work> {
    let id = row
        .try_get::<Uuid, _>("id")
        .map_err(|error| CoreError::Db(format!("work.id 파싱 실패: {}", error)))?;
    let title = row
        .try_get::<String, _>("title")
        .map_err(|error| CoreError::Db(format!("work.title 파싱 실패: {}", error)))?;
    let description = row
        .try_get::<Option<String>, _>("description")
        .map_err(|error| CoreError::Db(format!("work.description 파싱 실패: {}", error)))?;
    let tags = row
        .try_get::<Vec<String>, _>("tags")
        .map_err(|error| CoreError::Db(format!("work.tags 파싱 실패: {}", error)))?;

    Ok(Work {
        id,
        title,
        description,
        tags,
    })
}

fn map_contributor_row(row: PgRow) -> CoreResult<Contributor> {
    let id = row
        .try_get::<Uuid, _>("id")
        .map_err(|error| CoreError::Db(format!("contributor.id 파싱 실패: {}", error)))?;
    let name = row
        .try_get::<String, _>("name")
        .map_err(|error| CoreError::Db(format!("contributor.name 파싱 실패: {}", error)))?;
    let tags = row
        .try_get::<Vec<String>, _>("tags")
        .map_err(|error| CoreError::Db(format!("contributor.tags 파싱 실패: {}", error)))?;

    Ok(Contributor { id, name, tags })
}

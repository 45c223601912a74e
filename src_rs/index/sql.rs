// 목적:
// - SQL 관련 공통 유틸리티를 제공한다.
//
// 설명:
// - 동적 테이블명 검증과 카탈로그 스키마 DDL 생성을 담당한다.
// - 테이블명은 검증을 통과한 값만 SQL 문자열에 포함한다.
//
// 디자인 패턴:
// - 가드 함수(Guard Function).
//
// 참조:
// - src_rs/index/postgres_repo.rs

use crate::core::errors::{CoreError, CoreResult};

/// 테이블 식별자의 허용 문자를 검증한다.
pub fn validate_identifier(value: &str, field_name: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidConfig(format!(
            "{}는 비어 있을 수 없습니다",
            field_name
        )));
    }

    let valid = value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');

    if !valid {
        return Err(CoreError::InvalidConfig(format!(
            "{}에는 영문/숫자/밑줄만 사용할 수 있습니다: {}",
            field_name, value
        )));
    }

    if value.starts_with(|ch: char| ch.is_ascii_digit()) {
        return Err(CoreError::InvalidConfig(format!(
            "{}는 숫자로 시작할 수 없습니다: {}",
            field_name, value
        )));
    }

    Ok(())
}

/// 작품/기여자/연결 테이블 생성 DDL을 순서대로 반환한다.
pub fn schema_statements(
    works_table: &str,
    contributors_table: &str,
    links_table: &str,
) -> Vec<String> {
    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             id UUID PRIMARY KEY, \
             title TEXT NOT NULL, \
             description TEXT NULL, \
             tags TEXT[] NOT NULL DEFAULT '{{}}')",
            works_table
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             id UUID PRIMARY KEY, \
             name TEXT NOT NULL, \
             tags TEXT[] NOT NULL DEFAULT '{{}}')",
            contributors_table
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {links} (\
             work_id UUID NOT NULL REFERENCES {works}(id) ON DELETE CASCADE, \
             contributor_id UUID NOT NULL REFERENCES {contributors}(id) ON DELETE CASCADE, \
             PRIMARY KEY (work_id, contributor_id))",
            links = links_table,
            works = works_table,
            contributors = contributors_table
        ),
    ]
}

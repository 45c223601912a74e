// 목적:
// - 검색 인덱스 이름을 한 곳에서 정의한다.
//
// 설명:
// - 재색인과 검색이 같은 상수를 사용해야 한다. 이름이 어긋나면 검색은 오류 없이 빈 결과를 돌려준다.
// - 기동 시 validate_index_names로 OpenSearch 명명 규칙과 중복 여부를 확인한다.
//
// 디자인 패턴:
// - 공유 상수(Shared Constant) + 가드 함수(Guard Function).
//
// 참조:
// - src_rs/core/reindex_pipeline.rs
// - src_rs/core/search_pipeline.rs

use crate::core::errors::{CoreError, CoreResult};

pub const WORK_INDEX: &str = "works_items";
pub const CONTRIBUTOR_INDEX: &str = "contributors_items";

/// 목록 캐시는 파티션 없이 단일 키를 사용한다.
pub const WORK_LISTING_CACHE_KEY: &str = "catalog:works:listing";

pub fn validate_index_name(name: &str) -> CoreResult<()> {
    if name.is_empty() || name.len() > 255 {
        return Err(CoreError::InvalidConfig(format!(
            "인덱스 이름 길이가 올바르지 않습니다: {:?}",
            name
        )));
    }

    if name.starts_with(|ch: char| matches!(ch, '_' | '-' | '+')) || name == "." || name == ".." {
        return Err(CoreError::InvalidConfig(format!(
            "인덱스 이름의 시작 문자가 올바르지 않습니다: {}",
            name
        )));
    }

    let valid = name
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '-' | '.'));
    if !valid {
        return Err(CoreError::InvalidConfig(format!(
            "인덱스 이름에는 소문자/숫자/'_'/'-'/'.'만 사용할 수 있습니다: {}",
            name
        )));
    }

    Ok(())
}

/// 색인/검색 인덱스 이름의 일관성을 검증한다.
pub fn validate_index_names() -> CoreResult<()> {
    validate_index_name(WORK_INDEX)?;
    validate_index_name(CONTRIBUTOR_INDEX)?;

    if WORK_INDEX == CONTRIBUTOR_INDEX {
        return Err(CoreError::InvalidConfig(format!(
            "works/contributors 인덱스 이름이 같습니다: {}",
            WORK_INDEX
        )));
    }

    Ok(())
}

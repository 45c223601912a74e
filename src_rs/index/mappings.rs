// 목적:
// - 검색 문서 형태에서 인덱스 매핑을 만든다.
//
// 설명:
// - 문자열 필드는 text(소문자 분석) + keyword 하위 필드로 매핑한다.
// - 식별자는 keyword, 참조 목록은 object로 매핑한다.
//
// 참조:
// - src_rs/core/models.rs
// - src_rs/core/reindex_pipeline.rs

use serde_json::{json, Value};

fn text_field() -> Value {
    json!({
        "type": "text",
        "fields": { "keyword": { "type": "keyword", "ignore_above": 256 } }
    })
}

fn keyword_field() -> Value {
    json!({ "type": "keyword" })
}

pub fn work_index_schema() -> Value {
    json!({
        "properties": {
            "id": keyword_field(),
            "title": text_field(),
            "description": text_field(),
            "tags": text_field(),
            "contributors": {
                "type": "object",
                "properties": {
                    "id": keyword_field(),
                    "name": text_field()
                }
            }
        }
    })
}

pub fn contributor_index_schema() -> Value {
    json!({
        "properties": {
            "id": keyword_field(),
            "name": text_field(),
            "tags": text_field(),
            "works": {
                "type": "object",
                "properties": {
                    "id": keyword_field(),
                    "title": text_field()
                }
            }
        }
    })
}

// 목적:
// - 핵심 런타임 계층 모듈을 선언한다.
//
// 설명:
// - 비정규화, 재색인, 검색, 캐시 우선 목록 조회 파이프라인과 공통 오류/설정 모델을 분리한다.
// - 각 파이프라인은 외부 클라이언트 핸들을 생성 시점에 주입받는다.
//
// 디자인 패턴:
// - 명시적 오류 모델(Explicit Error Model) + 의존성 주입(Dependency Injection).
//
// 참조:
// - src_rs/core/errors.rs
// - src_rs/core/reindex_pipeline.rs
// - src_rs/core/search_pipeline.rs
// - src_rs/core/listing_pipeline.rs

pub mod cancellation;
pub mod catalog_pipeline;
pub mod config;
pub mod errors;
pub mod listing_pipeline;
pub mod models;
pub mod projection;
pub mod reindex_pipeline;
pub mod search_pipeline;

// 목적:
// - 카탈로그 검색 런타임 라이브러리의 진입점을 제공한다.
//
// 설명:
// - 관계형 저장소를 원본으로 두고, 검색 인덱스 동기화(재색인)와 캐시 우선 목록 조회를 제공한다.
// - 바이너리(src_rs/main.rs)는 이 라이브러리의 파이프라인을 조립해 HTTP로 노출한다.
//
// 디자인 패턴:
// - 계층형 모듈 구조(api/core/index).
//
// 참조:
// - src_rs/api/http.rs
// - src_rs/core/mod.rs
// - src_rs/index/mod.rs

pub mod api;
pub mod core;
pub mod index;

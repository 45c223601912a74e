// 목적:
// - 외부 저장소 어댑터 계층 모듈을 선언한다.
//
// 설명:
// - 관계형 저장소(PostgreSQL), 검색 백엔드(OpenSearch/인메모리), 캐시를 trait 경계 뒤에 둔다.
// - 인덱스 이름과 매핑은 재색인/검색이 함께 쓰도록 이 계층에서 한 번만 정의한다.
//
// 디자인 패턴:
// - 저장소 패턴(Repository Pattern) + 어댑터(Adapter).
//
// 참조:
// - src_rs/index/catalog_store.rs
// - src_rs/index/search_backend.rs
// - src_rs/index/cache.rs

pub mod cache;
pub mod catalog_store;
pub mod mappings;
pub mod memory_search;
pub mod names;
pub mod opensearch;
pub mod postgres_repo;
pub mod search_backend;
pub mod sql;

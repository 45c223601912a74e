// 목적:
// - 외부 호출 경계 모듈을 선언한다.
//
// 설명:
// - HTTP 라우터와 핸들러를 한 모듈에 둔다.
//
// 참조:
// - src_rs/api/http.rs

pub mod http;

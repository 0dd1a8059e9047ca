// Grinders API library
// 바이너리(main.rs)와 통합 테스트(tests/)가 같은 모듈을 사용
pub mod domains;
pub mod routes;
pub mod shared;

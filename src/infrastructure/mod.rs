//! Infrastructure layer
//! 파일시스템/로그 출력/서비스 등록부 등 구체 구현 집합.

pub mod config;
pub mod logging;
pub mod registry;

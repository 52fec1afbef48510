//! Application layer
//! 설정 스키마와 포트(추상 인터페이스), 이를 사용하는 서비스 구현을 정의한다.

pub mod config;
pub mod ports;
pub mod usecases;

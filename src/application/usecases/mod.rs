//! 애플리케이션 유스케이스(서비스 구현) 모음.

pub mod report_config_value;

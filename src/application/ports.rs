//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use crate::application::config::ConfigurationTree;
use crate::error::StartupError;

/// 설정 트리를 한 번 로딩하는 소스 포트.
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> Result<ConfigurationTree, StartupError>;
}

/// 설정값을 로그로 보고하는 capability.
pub trait ReportingService: Send + Sync {
    fn write_to_log(&self);
}

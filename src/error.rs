//! 기동(startup) 단계에서 발생하는 오류 타입.
//! 모든 오류는 치명적이며 프로세스는 non-zero 코드로 종료한다.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    /// 설정 파일 누락/읽기 실패/JSON 형식 오류
    #[error("failed to load configuration from {}: {reason}", path.display())]
    ConfigLoad { path: PathBuf, reason: String },

    /// 설정 섹션을 타입 구조체로 역직렬화하지 못함
    #[error("failed to bind configuration section '{section}': {reason}")]
    ConfigBind { section: String, reason: String },

    /// 등록되지 않은 capability 요청 또는 의존성 해석 실패
    #[error("cannot resolve '{capability}': {reason}")]
    Resolution { capability: String, reason: String },

    /// 로그 출력 대상 초기화 실패
    #[error("failed to initialise logging: {0}")]
    LoggingInit(String),
}

impl StartupError {
    pub(crate) fn resolution(capability: &str, reason: impl Into<String>) -> Self {
        Self::Resolution {
            capability: capability.to_string(),
            reason: reason.into(),
        }
    }
}

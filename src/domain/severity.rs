//! 로그 심각도(severity) 값 객체.

use std::fmt;

/// 로그 최소 출력 수준. 낮은 순서부터 정의한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Severity {
    Verbose,
    Debug,
    #[default]
    Information,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    /// 로그 필터 지시어 문자열. Fatal은 error로 취급한다.
    pub fn directive(self) -> &'static str {
        match self {
            Severity::Verbose => "trace",
            Severity::Debug => "debug",
            Severity::Information => "info",
            Severity::Warning => "warn",
            Severity::Error | Severity::Fatal => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Verbose => "Verbose",
            Severity::Debug => "Debug",
            Severity::Information => "Information",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Fatal => "Fatal",
        };
        f.write_str(name)
    }
}

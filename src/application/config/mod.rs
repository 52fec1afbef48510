//! 애플리케이션이 사용하는 설정 스키마(순수 데이터).
//!
//! 주의: 파일 접근은 `infrastructure`에서만 수행한다.

mod binder;
mod tree;

use serde::{Deserialize, Serialize};

pub use tree::{ConfigurationSection, ConfigurationTree, KEY_DELIMITER};

/// 보고 서비스 설정이 바인딩되는 섹션 이름.
pub const REPORTING_SECTION: &str = "MyService";

/// `MyService` 섹션에 바인딩되는 보고 서비스 설정.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportingServiceConfiguration {
    /// 로그로 출력할 설정값(없으면 빈 문자열)
    #[serde(rename = "ConfigValue")]
    pub config_value: String,
}

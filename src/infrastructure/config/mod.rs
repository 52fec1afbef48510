//! 설정 소스(JSON 파일) 로딩 모듈.

mod loader;

use std::path::PathBuf;

use crate::application::config::ConfigurationTree;
use crate::application::ports::ConfigSource;
use crate::error::StartupError;

pub use loader::{ConfigurationBuilder, DEFAULT_SETTINGS_FILE, load};

/// 기준 디렉터리의 JSON 파일 하나를 읽는 설정 소스 어댑터.
#[derive(Debug, Clone)]
pub struct JsonFileConfigSource {
    pub base_path: PathBuf,
    pub file_name: String,
}

impl JsonFileConfigSource {
    pub fn new(base_path: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            file_name: file_name.into(),
        }
    }
}

impl ConfigSource for JsonFileConfigSource {
    fn load(&self) -> Result<ConfigurationTree, StartupError> {
        load(&self.base_path, &self.file_name)
    }
}

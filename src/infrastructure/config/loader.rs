//! JSON 설정 파일 로더.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::application::config::ConfigurationTree;
use crate::error::StartupError;

/// 기본 설정 파일 이름.
pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";

#[derive(Debug, Clone, PartialEq, Eq)]
struct JsonFile {
    name: String,
    optional: bool,
}

/// 여러 JSON 파일을 등록 순서대로 병합하는 빌더.
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    base_path: PathBuf,
    files: Vec<JsonFile>,
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationBuilder {
    pub fn new() -> Self {
        Self {
            base_path: PathBuf::new(),
            files: Vec::new(),
        }
    }

    /// 상대 파일 이름을 해석할 기준 디렉터리.
    pub fn set_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// JSON 파일을 추가한다. 나중에 추가한 파일이 우선한다.
    pub fn add_json_file(mut self, name: impl Into<String>, optional: bool) -> Self {
        self.files.push(JsonFile {
            name: name.into(),
            optional,
        });
        self
    }

    pub fn build(&self) -> Result<ConfigurationTree, StartupError> {
        // 낮은 우선순위에서 높은 우선순위 순서로 병합한다.
        let mut merged = ConfigurationTree::new();

        for file in &self.files {
            let path = self.base_path.join(&file.name);
            match read_json_file(&path) {
                Ok(tree) => {
                    debug!(path = %path.display(), keys = tree.len(), "configuration file loaded");
                    merged.merge_from(tree);
                }
                Err(ReadError::Missing) if file.optional => {
                    debug!(path = %path.display(), "optional configuration file not found");
                }
                Err(err) => return Err(err.into_startup(&path)),
            }
        }

        Ok(merged)
    }
}

/// `base_path/file_name`의 JSON 파일 하나를 읽어 설정 트리로 만든다.
pub fn load(base_path: &Path, file_name: &str) -> Result<ConfigurationTree, StartupError> {
    ConfigurationBuilder::new()
        .set_base_path(base_path)
        .add_json_file(file_name, false)
        .build()
}

enum ReadError {
    Missing,
    Other(String),
}

impl ReadError {
    fn into_startup(self, path: &Path) -> StartupError {
        let reason = match self {
            ReadError::Missing => "file not found".to_string(),
            ReadError::Other(reason) => reason,
        };
        StartupError::ConfigLoad {
            path: path.to_path_buf(),
            reason,
        }
    }
}

fn read_json_file(path: &Path) -> Result<ConfigurationTree, ReadError> {
    let raw = fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ReadError::Missing,
        _ => ReadError::Other(format!("failed to read file: {err}")),
    })?;
    let parsed: Value = serde_json::from_str(&raw)
        .map_err(|err| ReadError::Other(format!("failed to parse JSON: {err}")))?;
    ConfigurationTree::from_json(&parsed).map_err(ReadError::Other)
}

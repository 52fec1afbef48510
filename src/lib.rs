//! optwire library root.
//! 설정 바인딩 → 의존성 조립 → 로그 출력 흐름을 계층별로 노출한다.

use std::path::PathBuf;

use anyhow::{Context, Result};

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interface;

pub use error::StartupError;

use interface::composition::AppComposition;

/// `base_path/appsettings.json`을 읽어 설정값을 stdout 로그로 남긴다.
pub fn run(base_path: impl Into<PathBuf>) -> Result<()> {
    let base_path = base_path.into();
    AppComposition::console(base_path.clone())
        .run()
        .with_context(|| format!("startup failed in {}", base_path.display()))
}

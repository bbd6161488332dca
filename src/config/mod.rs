#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use std::path::Path;
use std::time::Duration;
use toml_config::TomlConfig;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_SESSION_PATH: &str = ".caminhar/session";

/// 命令列覆寫值，優先於設定檔
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub session_path: Option<String>,
}

/// 預設值 ← 設定檔 ← 命令列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub session_path: String,
    pub log_level: Option<String>,
    pub json_logs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            session_path: DEFAULT_SESSION_PATH.to_string(),
            log_level: None,
            json_logs: false,
        }
    }
}

impl Settings {
    pub fn resolve(file: Option<TomlConfig>, overrides: Overrides) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Settings::default();

        Self {
            base_url: overrides
                .base_url
                .or(file.api.base_url)
                .unwrap_or(defaults.base_url),
            timeout_seconds: overrides
                .timeout_seconds
                .or(file.api.timeout_seconds)
                .unwrap_or(defaults.timeout_seconds),
            session_path: overrides
                .session_path
                .or(file.session.path)
                .unwrap_or(defaults.session_path),
            log_level: file.logging.level,
            json_logs: file.logging.json.unwrap_or(false),
        }
    }

    /// 讀取設定檔 (若有) 並套用覆寫值
    pub fn load(config_path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let file = match config_path {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None => None,
        };
        Ok(Self::resolve(file, overrides))
    }
}

impl ConfigProvider for Settings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn session_path(&self) -> &str {
        &self.session_path
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.base_url)?;
        validate_range("api.timeout_seconds", self.timeout_seconds, 1, 300)?;
        validate_path("session.path", &self.session_path)?;
        Ok(())
    }
}

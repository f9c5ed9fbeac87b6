//! 运行时配置
//!
//! 优先级：命令行参数 > 环境变量 > 默认值。

use crate::DEFAULT_API_URL;
use crate::poll::SERVICES_POLL_PERIOD;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SESSION_FILE: &str = ".portal-session.json";

pub const ENV_API_URL: &str = "PORTAL_API_URL";
pub const ENV_POLL_SECS: &str = "PORTAL_POLL_SECS";
pub const ENV_SESSION_FILE: &str = "PORTAL_SESSION_FILE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API URL must not be empty")]
    EmptyApiUrl,

    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("PORTAL_POLL_SECS must be a whole number of seconds, got {0:?}")]
    InvalidPollSecs(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 后端地址
    pub api_url: String,
    /// 服务状态刷新周期
    pub poll_interval: Duration,
    /// 会话文件路径
    pub session_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval: SERVICES_POLL_PERIOD,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

/// 命令行参数覆盖项，优先级高于环境变量
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub poll_secs: Option<u64>,
    pub session_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// 从任意键值来源读取，再叠加覆盖项，最后统一校验
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        overrides: Overrides,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.api_url = url;
        }
        // 命令行已指定周期时不解析环境变量
        if let Some(secs) = overrides.poll_secs {
            config.poll_interval = Duration::from_secs(secs);
        } else if let Some(secs) = lookup(ENV_POLL_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPollSecs(secs.clone()))?;
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(path) = lookup(ENV_SESSION_FILE) {
            config.session_file = PathBuf::from(path);
        }

        if let Some(url) = overrides.api_url {
            config.api_url = url;
        }
        if let Some(path) = overrides.session_file {
            config.session_file = path;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::EmptyApiUrl);
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }
}

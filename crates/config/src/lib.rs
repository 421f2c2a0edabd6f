//! plugin-config - 连接器配置加载库
//!
//! 数据源和动作配置由宿主在调用时传入；这里只负责进程级的连接器参数。

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// SMTP 传输配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpSettings {
    /// 传输层读写超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 是否信任数据源主机的证书
    #[serde(default = "default_trust_endpoint_certificate")]
    pub trust_endpoint_certificate: bool,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_trust_endpoint_certificate() -> bool {
    true
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            trust_endpoint_certificate: default_trust_endpoint_certificate(),
        }
    }
}

/// 遥测配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

/// 连接器配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default)]
    pub smtp: SmtpSettings,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl PluginConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 依次合并默认值、`default.toml`、`<APP_ENV>.toml` 和 `SMTP_PLUGIN_` 前缀的环境变量，
    /// 配置文件不存在时跳过。
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("SMTP_PLUGIN_").split("__"))
            .extract()?;

        Ok(config)
    }
}

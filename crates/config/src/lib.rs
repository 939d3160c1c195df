//! 统一配置中心
//!
//! 网关配置的加载顺序：
//! - 内置默认值
//! - `GATEWAY_CONFIG_FILE` 指定的文件（YAML / JSON / TOML）
//! - `GATEWAY_` 前缀的环境变量，嵌套字段用 `__` 分隔

use std::time::Duration;

use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 指定配置文件路径的环境变量
pub const CONFIG_FILE_ENV: &str = "GATEWAY_CONFIG_FILE";
/// 环境变量覆盖前缀
pub const ENV_PREFIX: &str = "GATEWAY_";

/// 全局网关配置
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GatewayConfig {
    /// 监听配置
    #[validate(nested)]
    pub server: ServerConfig,
    /// 请求处理配置
    #[validate(nested)]
    pub ingest: IngestConfig,
}

/// 监听配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    /// 停止时等待进行中请求完成的秒数
    pub shutdown_grace_secs: u64,
}

/// 请求处理配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IngestConfig {
    #[validate(range(min = 1))]
    pub max_body_bytes: usize,
    /// 读取请求体时两次数据到达之间允许的最长间隔（秒），不限制转发耗时
    #[validate(range(min = 1))]
    pub body_read_timeout_secs: u64,
    /// 500 响应是否带上具体错误信息
    pub expose_error_detail: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8888,
            shutdown_grace_secs: 5,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024,
            body_read_timeout_secs: 30,
            expose_error_detail: true,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl IngestConfig {
    pub fn body_read_timeout(&self) -> Duration {
        Duration::from_secs(self.body_read_timeout_secs)
    }
}

impl GatewayConfig {
    /// 按 默认值 -> 配置文件 -> 环境变量 的顺序合并配置源
    pub fn figment() -> Figment {
        let mut fig = Figment::new().merge(Serialized::defaults(GatewayConfig::default()));
        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            if path.ends_with(".yml") || path.ends_with(".yaml") {
                fig = fig.merge(Yaml::file(path));
            } else if path.ends_with(".json") {
                fig = fig.merge(Json::file(path));
            } else {
                fig = fig.merge(Toml::file(path));
            }
        }
        fig.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(fig: Figment) -> Result<Self, ConfigError> {
        let cfg: GatewayConfig = fig.extract().map_err(Box::new)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

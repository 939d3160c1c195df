use std::io;

use application::SinkError;
use domain::ParseError;
use thiserror::Error;

/// 单个 POST 请求的失败原因，全部映射为 500
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read request body: {0}")]
    Body(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl IngestError {
    pub fn body(message: impl Into<String>) -> Self {
        Self::Body(message.into())
    }
}

/// 监听器构造失败。调用方应记录日志并跳过该子系统，而不是终止整个进程
#[derive(Debug, Error)]
pub enum BindError {
    #[error("forwarding sink is required")]
    MissingSink,
    #[error("invalid listen address {address}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to bind {address}: {source}")]
    Io {
        address: String,
        #[source]
        source: io::Error,
    },
}

/// 监听器生命周期错误
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server already started")]
    AlreadyStarted,
    #[error("server is not running")]
    NotRunning,
    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

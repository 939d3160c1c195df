use async_trait::async_trait;
use domain::{EventMetadata, MessageType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("viewer unavailable: {0}")]
    Unavailable(String),
    #[error("viewer rejected event: {0}")]
    Rejected(String),
}

impl SinkError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

/// 下游查看器的接收端。
///
/// 多个请求会并发调用同一个实例，实现方自行保证线程安全；
/// 如果实现阻塞，调用它的请求也会随之阻塞。
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait ForwardingSink: Send + Sync {
    async fn send_message_to_chat(
        &self,
        message_type: MessageType,
        text: String,
        metadata: EventMetadata,
    ) -> Result<(), SinkError>;
}

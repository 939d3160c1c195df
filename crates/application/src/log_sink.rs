use async_trait::async_trait;
use domain::{EventMetadata, MessageType};

use crate::sink::{ForwardingSink, SinkError};

/// 把事件写入日志的查看器，独立运行网关时使用
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl ForwardingSink for LogSink {
    async fn send_message_to_chat(
        &self,
        message_type: MessageType,
        text: String,
        metadata: EventMetadata,
    ) -> Result<(), SinkError> {
        let color = metadata.color.map(|rgb| rgb.to_hex());
        tracing::info!(
            message_type = message_type.as_str(),
            author = %metadata.author,
            color = color.as_deref().unwrap_or("-"),
            "{}",
            text
        );
        Ok(())
    }
}

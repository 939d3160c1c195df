// 简单的本地广播实现，查看器通过 subscribe 接收事件
use crate::sink::{ForwardingSink, SinkError};
use async_trait::async_trait;
use domain::{ChatEvent, EventMetadata, MessageType};
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct LocalEventBroadcaster {
    sender: broadcast::Sender<ChatEvent>,
}

impl LocalEventBroadcaster {
    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for LocalEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ForwardingSink for LocalEventBroadcaster {
    async fn send_message_to_chat(
        &self,
        message_type: MessageType,
        text: String,
        metadata: EventMetadata,
    ) -> Result<(), SinkError> {
        // 没有订阅者时 send 返回错误，事件不会被任何查看器看到
        self.sender
            .send(ChatEvent::from_parts(message_type, text, metadata))
            .map_err(|_| SinkError::unavailable("no viewer is subscribed"))?;
        Ok(())
    }
}

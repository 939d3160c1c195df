#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use application::{ForwardingSink, SinkError};
use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use config::{IngestConfig, ServerConfig};
use domain::{ChatEvent, EventMetadata, MessageType};
use tower::ServiceExt;
use web_api::{router, IngestServer, MessageHandler};

// 记录收到的所有事件，用于断言转发结果
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ChatEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<ChatEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ForwardingSink for RecordingSink {
    async fn send_message_to_chat(
        &self,
        message_type: MessageType,
        text: String,
        metadata: EventMetadata,
    ) -> Result<(), SinkError> {
        self.events
            .lock()
            .unwrap()
            .push(ChatEvent::from_parts(message_type, text, metadata));
        Ok(())
    }
}

// 处理前先等待一段时间，模拟阻塞的查看器
pub struct SlowSink {
    pub delay: Duration,
    pub inner: RecordingSink,
}

impl SlowSink {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: RecordingSink::default(),
        }
    }
}

#[async_trait::async_trait]
impl ForwardingSink for SlowSink {
    async fn send_message_to_chat(
        &self,
        message_type: MessageType,
        text: String,
        metadata: EventMetadata,
    ) -> Result<(), SinkError> {
        tokio::time::sleep(self.delay).await;
        self.inner
            .send_message_to_chat(message_type, text, metadata)
            .await
    }
}

pub struct PanickingSink;

#[async_trait::async_trait]
impl ForwardingSink for PanickingSink {
    async fn send_message_to_chat(
        &self,
        _message_type: MessageType,
        _text: String,
        _metadata: EventMetadata,
    ) -> Result<(), SinkError> {
        panic!("viewer exploded")
    }
}

pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("access-control-allow-headers", "Content-Type, Authorization"),
    ("access-control-max-age", "3600"),
];

pub fn assert_cors(headers: &HeaderMap) {
    for (name, value) in CORS_HEADERS {
        assert_eq!(
            headers.get(name).and_then(|v| v.to_str().ok()),
            Some(value),
            "missing or wrong {name}"
        );
    }
}

pub fn test_router(sink: Arc<dyn ForwardingSink>) -> Router {
    test_router_with(sink, &IngestConfig::default())
}

pub fn test_router_with(sink: Arc<dyn ForwardingSink>, ingest: &IngestConfig) -> Router {
    let handler = MessageHandler::new(sink).with_error_detail(ingest.expose_error_detail);
    router(handler, ingest)
}

pub fn request(method: &str, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, headers, String::from_utf8_lossy(&body_bytes).into_owned())
}

pub fn local_server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        shutdown_grace_secs: 1,
    }
}

pub async fn start_server(sink: Arc<dyn ForwardingSink>) -> IngestServer {
    let mut server = IngestServer::builder(&local_server_config())
        .sink(sink)
        .bind()
        .await
        .expect("bind");
    server.start().expect("start");
    server
}

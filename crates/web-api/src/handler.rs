use std::sync::Arc;

use application::{normalize, ForwardingSink};
use axum::{
    body::Bytes,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::IngestError;

pub const SUCCESS_BODY: &str = "Message received";
pub const HEALTH_BODY: &str = "SocialStreamHttpServer is running";
pub const METHOD_NOT_ALLOWED_BODY: &str = "Method not allowed";
pub const ERROR_PREFIX: &str = "Error processing message: ";

/// 单个请求的处理逻辑，持有下游查看器的引用，可脱离监听器单独使用
#[derive(Clone)]
pub struct MessageHandler {
    sink: Arc<dyn ForwardingSink>,
    expose_error_detail: bool,
}

impl MessageHandler {
    pub fn new(sink: Arc<dyn ForwardingSink>) -> Self {
        Self {
            sink,
            expose_error_detail: true,
        }
    }

    pub fn with_error_detail(mut self, expose: bool) -> Self {
        self.expose_error_detail = expose;
        self
    }

    /// 按请求方法分发。请求体读取失败时以 `Err` 传入，由 POST 分支统一报告
    pub async fn handle(&self, method: &Method, body: Result<Bytes, IngestError>) -> Response {
        match *method {
            Method::OPTIONS => StatusCode::NO_CONTENT.into_response(),
            Method::POST => match self.ingest(body).await {
                Ok(()) => (StatusCode::OK, SUCCESS_BODY).into_response(),
                Err(err) => self.error_response(&err),
            },
            Method::GET => (StatusCode::OK, HEALTH_BODY).into_response(),
            _ => (StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_BODY).into_response(),
        }
    }

    /// POST 路径：读取请求体、规范化、转发
    pub async fn ingest(&self, body: Result<Bytes, IngestError>) -> Result<(), IngestError> {
        let body =
            body.inspect_err(|err| tracing::error!(error = %err, "error reading message body"))?;
        let text =
            std::str::from_utf8(&body).map_err(|err| IngestError::body(err.to_string()))?;
        tracing::debug!(body = %text, "received message payload");

        let event = normalize(text).inspect_err(|err| {
            tracing::error!(error = %err, body = %text, "error processing message");
        })?;

        let (message_type, message, metadata) = event.into_parts();
        self.sink
            .send_message_to_chat(message_type, message, metadata)
            .await
            .inspect_err(|err| tracing::error!(error = %err, "failed to forward message"))?;
        Ok(())
    }

    fn error_response(&self, err: &IngestError) -> Response {
        let body = if self.expose_error_detail {
            format!("{ERROR_PREFIX}{err}")
        } else {
            format!("{ERROR_PREFIX}internal error")
        };
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

use std::{any::Any, sync::Arc};

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use config::IngestConfig;
use tower_http::{
    catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer,
    timeout::RequestBodyTimeoutLayer, trace::TraceLayer,
};

use crate::{
    error::IngestError,
    handler::{MessageHandler, ERROR_PREFIX},
};

/// 每个响应都附带的 CORS 头，允许任意来源的浏览器调用
const CORS_HEADERS: [(HeaderName, &str); 4] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
    (header::ACCESS_CONTROL_MAX_AGE, "3600"),
];

/// `/message` 与 `/` 以及其余所有路径都交给同一个处理器
///
/// 超时只作用于读取请求体：请求体停滞会变成读取失败并按 500 报告，
/// 下游查看器的转发调用不设超时，也不会被中途取消。
pub fn router(handler: MessageHandler, ingest: &IngestConfig) -> Router {
    let mut router = Router::new()
        .route("/message", any(dispatch))
        .route("/", any(dispatch))
        .fallback(dispatch)
        .with_state(Arc::new(handler))
        .layer(DefaultBodyLimit::max(ingest.max_body_bytes))
        .layer(RequestBodyTimeoutLayer::new(ingest.body_read_timeout()))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http());

    for (name, value) in CORS_HEADERS {
        router = router.layer(SetResponseHeaderLayer::overriding(
            name,
            HeaderValue::from_static(value),
        ));
    }
    router
}

async fn dispatch(
    State(handler): State<Arc<MessageHandler>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = body.map_err(|rejection| IngestError::body(rejection.body_text()));
    handler.handle(&method, body).await
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unexpected error".to_string()
    };
    tracing::error!(detail = %detail, "panic while handling request");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("{ERROR_PREFIX}{detail}"),
    )
        .into_response()
}

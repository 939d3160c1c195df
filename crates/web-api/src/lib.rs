//! Web API 层。
//!
//! 提供接收聚合器推送的 HTTP 监听器，把请求交给 [`MessageHandler`]
//! 规范化后转发到下游查看器。

mod error;
mod handler;
mod routes;
mod server;

pub use error::{BindError, IngestError, ServerError};
pub use handler::{
    MessageHandler, ERROR_PREFIX, HEALTH_BODY, METHOD_NOT_ALLOWED_BODY, SUCCESS_BODY,
};
pub use routes::router;
pub use server::{spawn_gateway, IngestServer, IngestServerBuilder};

//! 应用层实现。
//!
//! 负责把外部聚合器推送的请求体规范化为领域事件，
//! 并通过 [`ForwardingSink`] 抽象交给下游查看器。

pub mod local_broadcast;
pub mod log_sink;
pub mod normalizer;
pub mod sink;

pub use local_broadcast::LocalEventBroadcaster;
pub use log_sink::LogSink;
pub use normalizer::normalize;
pub use sink::{ForwardingSink, SinkError};

#[cfg(feature = "testing")]
pub use sink::MockForwardingSink;

//! 领域事件定义
//!
//! 包含从外部聚合器接入的聊天事件。

pub mod chat_event;

// 重新导出事件类型
pub use chat_event::*;

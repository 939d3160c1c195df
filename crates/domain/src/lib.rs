//! 消息接入网关的核心领域模型
//!
//! 包含规范化后的聊天事件、颜色值与颜色解析规则，以及相关的错误类型。

pub mod color;
pub mod errors;
pub mod events;

// 重新导出常用类型
pub use color::*;
pub use errors::*;
pub use events::*;

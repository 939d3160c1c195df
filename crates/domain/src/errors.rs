//! 领域模型错误定义
//!
//! 请求体解析失败与颜色解析失败分开建模：前者会返回给调用方，
//! 后者只在接入层记录日志并替换为回退颜色。

use thiserror::Error;

/// 请求体无法解析为 JSON 对象
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// 不是合法的 JSON
    #[error("{0}")]
    InvalidJson(String),

    /// 合法 JSON，但顶层不是对象
    #[error("expected a JSON object but found {found}")]
    NotAnObject { found: &'static str },
}

impl ParseError {
    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::InvalidJson(message.into())
    }

    pub fn not_an_object(found: &'static str) -> Self {
        Self::NotAnObject { found }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_json(err.to_string())
    }
}

/// 颜色字段解析失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("color value is empty")]
    Empty,

    #[error("invalid hex color: {value}")]
    InvalidHex { value: String },

    #[error("unknown color name: {name}")]
    UnknownName { name: String },
}

/// 解析结果类型
pub type ParseResult<T> = Result<T, ParseError>;

//! 请求体规范化
//!
//! 字段提取是宽松的：缺失、`null` 或类型不符的字段都回退到默认值，
//! 只有整个请求体不是 JSON 对象时才返回 [`ParseError`]。

use domain::{resolve_color, ChatEvent, MessageType, ParseError, ParseResult, Rgb};
use serde_json::{Map, Value};

const AUTHOR_FIELD: &str = "chatname";
const TEXT_FIELD: &str = "chatmessage";
const TYPE_FIELD: &str = "type";
const NAME_COLOR_FIELD: &str = "nameColor";
const COLOR_FIELD: &str = "color";

/// 把聚合器推送的 JSON 请求体转换为 [`ChatEvent`]
pub fn normalize(body: &str) -> ParseResult<ChatEvent> {
    let fields = match serde_json::from_str::<Value>(body)? {
        Value::Object(fields) => fields,
        other => return Err(ParseError::not_an_object(json_kind(&other))),
    };

    let message_type = text_field(&fields, TYPE_FIELD)
        .map(|label| MessageType::from_label(&label))
        .unwrap_or_default();
    let author = text_field(&fields, AUTHOR_FIELD);
    let text = text_field(&fields, TEXT_FIELD).unwrap_or_default();
    let color = color_field(&fields);

    Ok(ChatEvent::new(message_type, author, text, color))
}

/// 字符串原样返回，数字、布尔值等取其文本形式，`null` 视为缺失
fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(value) => Some(value.clone()),
        other => Some(other.to_string()),
    }
}

/// `nameColor` 存在时优先，即使它为空
fn color_field(fields: &Map<String, Value>) -> Option<Rgb> {
    let (key, value) = [NAME_COLOR_FIELD, COLOR_FIELD]
        .into_iter()
        .find_map(|key| fields.get(key).map(|value| (key, value)))?;

    let raw = match value {
        Value::String(raw) if raw.trim().is_empty() => return None,
        Value::String(raw) => raw,
        Value::Null => return None,
        other => {
            tracing::warn!(field = key, value = %other, "color field is not a string, ignoring");
            return None;
        }
    };

    match resolve_color(raw) {
        Ok(rgb) => Some(rgb),
        Err(err) => {
            tracing::warn!(field = key, error = %err, fallback = %Rgb::FALLBACK, "error parsing color");
            Some(Rgb::FALLBACK)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

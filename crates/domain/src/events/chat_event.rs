//! 聊天事件
//!
//! 外部聚合器推送的消息经规范化后得到的内部事件。每个请求新建一个，
//! 转发后所有权交给下游查看器。

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// 未提供作者时使用的默认名
pub const DEFAULT_AUTHOR: &str = "Guest";

/// 消息类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    /// 普通聊天消息
    #[default]
    Normal,
    /// 动作消息（/me）
    Action,
    /// 加入频道
    Join,
}

impl MessageType {
    /// 大小写不敏感地解析类型标签，不去除空白，无法识别的值一律视为 `Normal`
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("ACTION") {
            Self::Action
        } else if label.eq_ignore_ascii_case("JOIN") {
            Self::Join
        } else {
            Self::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Action => "ACTION",
            Self::Join => "JOIN",
        }
    }
}

/// 随事件一起转发的元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub author: String,
    pub color: Option<Rgb>,
}

/// 规范化后的聊天事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEvent {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub author: String,
    pub text: String,
    pub color: Option<Rgb>,
}

impl ChatEvent {
    /// 作者为空白时回退为 [`DEFAULT_AUTHOR`]
    pub fn new(
        message_type: MessageType,
        author: Option<String>,
        text: impl Into<String>,
        color: Option<Rgb>,
    ) -> Self {
        let author = author
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());

        Self {
            message_type,
            author,
            text: text.into(),
            color,
        }
    }

    pub fn metadata(&self) -> EventMetadata {
        EventMetadata {
            author: self.author.clone(),
            color: self.color,
        }
    }

    /// 拆分为转发接口需要的 `(类型, 文本, 元数据)`
    pub fn into_parts(self) -> (MessageType, String, EventMetadata) {
        (
            self.message_type,
            self.text,
            EventMetadata {
                author: self.author,
                color: self.color,
            },
        )
    }

    pub fn from_parts(message_type: MessageType, text: String, metadata: EventMetadata) -> Self {
        Self {
            message_type,
            author: metadata.author,
            text,
            color: metadata.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_labels() {
        for label in ["action", "Action", "ACTION"] {
            assert_eq!(MessageType::from_label(label), MessageType::Action);
        }
        assert_eq!(MessageType::from_label("join"), MessageType::Join);
        assert_eq!(MessageType::from_label("normal"), MessageType::Normal);
        assert_eq!(MessageType::from_label("whisper"), MessageType::Normal);
        assert_eq!(MessageType::from_label(""), MessageType::Normal);
    }

    #[test]
    fn test_padded_labels_are_not_recognized() {
        for label in [" action ", "join\n", "\tACTION"] {
            assert_eq!(MessageType::from_label(label), MessageType::Normal, "{label:?}");
        }
    }

    #[test]
    fn test_blank_author_falls_back_to_guest() {
        let event = ChatEvent::new(MessageType::Normal, Some("  ".into()), "hi", None);
        assert_eq!(event.author, DEFAULT_AUTHOR);

        let event = ChatEvent::new(MessageType::Normal, None, "hi", None);
        assert_eq!(event.author, DEFAULT_AUTHOR);
    }

    #[test]
    fn test_parts_roundtrip() {
        let event = ChatEvent::new(
            MessageType::Join,
            Some("alice".into()),
            "joined",
            Some(Rgb::new(1, 2, 3)),
        );
        let (message_type, text, metadata) = event.clone().into_parts();
        assert_eq!(metadata, event.metadata());
        assert_eq!(ChatEvent::from_parts(message_type, text, metadata), event);
    }

    #[test]
    fn test_serialized_shape() {
        let event = ChatEvent::new(MessageType::Action, Some("bob".into()), "waves", None);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ACTION");
        assert_eq!(json["author"], "bob");
        assert!(json["color"].is_null());
    }
}

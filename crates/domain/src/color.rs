//! 颜色值与颜色解析
//!
//! 支持两种编码：`#` 开头的十六进制整数，以及大小写不敏感的标准颜色名。
//! 解析失败时返回 [`ColorError`]，由调用方决定是否替换为 [`Rgb::FALLBACK`]。

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::ColorError;

/// RGB 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// 解析失败时使用的浅蓝色
    pub const FALLBACK: Rgb = Rgb::new(173, 216, 230);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// 取低 24 位作为 `0xRRGGBB`
    pub const fn from_u32(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// 标准颜色名表，键为小写规范名
static NAMED_COLORS: Lazy<HashMap<&'static str, Rgb>> = Lazy::new(|| {
    HashMap::from([
        ("white", Rgb::new(255, 255, 255)),
        ("lightgray", Rgb::new(192, 192, 192)),
        ("light_gray", Rgb::new(192, 192, 192)),
        ("gray", Rgb::new(128, 128, 128)),
        ("darkgray", Rgb::new(64, 64, 64)),
        ("dark_gray", Rgb::new(64, 64, 64)),
        ("black", Rgb::new(0, 0, 0)),
        ("red", Rgb::new(255, 0, 0)),
        ("pink", Rgb::new(255, 175, 175)),
        ("orange", Rgb::new(255, 200, 0)),
        ("yellow", Rgb::new(255, 255, 0)),
        ("green", Rgb::new(0, 255, 0)),
        ("magenta", Rgb::new(255, 0, 255)),
        ("cyan", Rgb::new(0, 255, 255)),
        ("blue", Rgb::new(0, 0, 255)),
    ])
});

/// 按名称查找标准颜色（大小写不敏感）
pub fn named_color(name: &str) -> Option<Rgb> {
    NAMED_COLORS.get(name.to_ascii_lowercase().as_str()).copied()
}

/// 解析颜色字段
///
/// `#RRGGBB` 按十六进制整数解析，取低 24 位；其余输入按颜色名查表。
pub fn resolve_color(raw: &str) -> Result<Rgb, ColorError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ColorError::Empty);
    }

    match value.strip_prefix('#') {
        Some(hex) => parse_hex(hex).ok_or_else(|| ColorError::InvalidHex {
            value: value.to_string(),
        }),
        None => named_color(value).ok_or_else(|| ColorError::UnknownName {
            name: value.to_string(),
        }),
    }
}

fn parse_hex(digits: &str) -> Option<Rgb> {
    // from_str_radix 接受前导 '+'，这里只允许纯十六进制数字
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    // 长度不设上限，前导零不影响取值，超出 32 位才算非法
    u32::from_str_radix(digits, 16).ok().map(Rgb::from_u32)
}

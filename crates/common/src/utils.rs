//! 通用工具函数

/// 字符串是否包含非空白字符
pub fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}

/// 仅在包含非空白字符时返回原字符串
pub fn text_or_none(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

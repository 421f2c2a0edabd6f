//! 数据源校验问题记录

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 出问题的数据源字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
pub enum DatasourceField {
    #[display("host")]
    Host,
    #[display("port")]
    Port,
    #[display("authentication")]
    Authentication,
    /// 连接层面的问题（协议、网络）
    #[display("connection")]
    Connection,
}

/// 单条校验问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[display("{message}")]
pub struct ValidationIssue {
    pub field: DatasourceField,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: DatasourceField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// 转换为宿主需要的消息列表，保持顺序并去重
pub fn issue_messages(issues: &[ValidationIssue]) -> Vec<String> {
    let mut messages: Vec<String> = Vec::with_capacity(issues.len());
    for issue in issues {
        if !messages.contains(&issue.message) {
            messages.push(issue.message.clone());
        }
    }
    messages
}

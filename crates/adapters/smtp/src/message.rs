//! 邮件构建
//!
//! 把动作配置转换为 MIME 邮件：单个 `text/html` 正文包在 `multipart/mixed` 容器里，
//! 为以后添加附件预留位置。

use std::str::FromStr;

use lettre::Message;
use lettre::address::AddressError;
use lettre::message::header::{self, ContentType};
use lettre::message::{Mailbox, Mailboxes, MultiPart, SinglePart};
use plugin_common::{ActionConfiguration, has_text, text_or_none};
use plugin_errors::{PluginError, PluginResult};
use thiserror::Error;

use crate::{fields, messages};

/// 地址解析失败
///
/// `Display` 输出以动词开头，拼在 "Unable to " 之后作为用户消息。
#[derive(Debug, Error)]
#[error("parse {field} address '{input}': {source}")]
pub struct AddressParseError {
    pub field: &'static str,
    pub input: String,
    #[source]
    pub source: AddressError,
}

impl From<AddressParseError> for PluginError {
    fn from(err: AddressParseError) -> Self {
        PluginError::address(format!("Unable to {}", err))
    }
}

/// 一次发送请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub from: String,
    pub to: String,
    pub cc: Option<String>,
    pub bcc: Option<String>,
    pub reply_to: Option<String>,
    pub subject: Option<String>,
    pub body: String,
}

impl SendRequest {
    /// 从动作配置读取发送字段
    ///
    /// 收件人先于发件人检查；`send.isReplyTo` 不为 true 时忽略 `send.replyTo`。
    pub fn from_action(action: &ActionConfiguration) -> PluginResult<Self> {
        let to = action.form_str(fields::TO);
        let from = action.form_str(fields::FROM);

        if !has_text(to) {
            return Err(PluginError::execute_argument(messages::MISSING_RECIPIENT));
        }
        if !has_text(from) {
            return Err(PluginError::execute_argument(messages::MISSING_SENDER));
        }

        let is_reply_to = action.form_bool(fields::IS_REPLY_TO).unwrap_or(false);
        let reply_to = if is_reply_to {
            text_or_none(action.form_str(fields::REPLY_TO)).map(str::to_string)
        } else {
            None
        };

        Ok(Self {
            from: from.unwrap_or_default().to_string(),
            to: to.unwrap_or_default().to_string(),
            cc: text_or_none(action.form_str(fields::CC)).map(str::to_string),
            bcc: text_or_none(action.form_str(fields::BCC)).map(str::to_string),
            reply_to,
            subject: action.form_str(fields::SUBJECT).map(str::to_string),
            body: text_or_none(action.body.as_deref())
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// 去掉地址列表里的空元素（连续逗号、首尾逗号），引号内的逗号保持不变
fn compact_address_list(input: &str) -> String {
    let mut elements = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for ch in input.chars() {
        if escaped {
            escaped = false;
        } else if in_quotes && ch == '\\' {
            escaped = true;
        } else if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == ',' && !in_quotes {
            elements.push(std::mem::take(&mut current));
            continue;
        }
        current.push(ch);
    }
    elements.push(current);

    elements
        .iter()
        .map(|element| element.trim())
        .filter(|element| !element.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_list(field: &'static str, input: &str) -> Result<Mailboxes, AddressParseError> {
    let compacted = compact_address_list(input);
    // 全部为空元素时交给 lettre 解析原始输入，沿用其错误信息
    let candidate = if compacted.is_empty() {
        input.trim()
    } else {
        compacted.as_str()
    };

    Mailboxes::from_str(candidate).map_err(|source| AddressParseError {
        field,
        input: input.to_string(),
        source,
    })
}

fn parse_single(field: &'static str, input: &str) -> Result<Mailbox, AddressParseError> {
    Mailbox::from_str(input.trim()).map_err(|source| AddressParseError {
        field,
        input: input.to_string(),
        source,
    })
}

/// 构建 MIME 邮件
pub fn build_message(request: &SendRequest) -> PluginResult<Message> {
    let to = parse_list("to", &request.to)?;
    let from = parse_single("from", &request.from)?;

    let mut builder = Message::builder()
        .from(from)
        .mailbox(header::To::from(to));

    if let Some(cc) = &request.cc {
        builder = builder.mailbox(header::Cc::from(parse_list("cc", cc)?));
    }
    if let Some(bcc) = &request.bcc {
        builder = builder.mailbox(header::Bcc::from(parse_list("bcc", bcc)?));
    }
    if let Some(reply_to) = &request.reply_to {
        builder = builder.mailbox(header::ReplyTo::from(parse_list("reply-to", reply_to)?));
    }
    if let Some(subject) = &request.subject {
        builder = builder.subject(subject.as_str());
    }

    let body = MultiPart::mixed().singlepart(
        SinglePart::builder()
            .header(ContentType::TEXT_HTML)
            .body(request.body.clone()),
    );

    builder.multipart(body).map_err(|e| {
        PluginError::transport(format!("Unable to send email because of error: {}", e))
    })
}

//! plugin-errors - 插件统一错误处理
//!
//! 将连接器内部错误映射到宿主平台的插件错误分类

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 插件错误类型
///
/// 每个变体只携带面向用户的消息，`Display` 即原样输出该消息。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// 执行参数缺失
    #[error("{0}")]
    ExecuteArgument(String),

    /// 数据源参数不可用
    #[error("{0}")]
    DatasourceArgument(String),

    #[error("{0}")]
    Authentication(String),

    /// 邮件地址格式错误
    #[error("{0}")]
    Address(String),

    /// 发送或连接失败
    #[error("{0}")]
    Transport(String),

    /// 结果序列化失败
    #[error("{0}")]
    Serialization(String),
}

/// 宿主平台的默认认证错误消息
pub const AUTHENTICATION_ERROR_MESSAGE: &str =
    "Invalid authentication credentials. Please check datasource configuration.";

impl PluginError {
    pub fn execute_argument(msg: impl Into<String>) -> Self {
        Self::ExecuteArgument(msg.into())
    }

    pub fn datasource_argument(msg: impl Into<String>) -> Self {
        Self::DatasourceArgument(msg.into())
    }

    pub fn address(msg: impl Into<String>) -> Self {
        Self::Address(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// 使用宿主默认消息的认证错误
    pub fn invalid_credentials() -> Self {
        Self::Authentication(AUTHENTICATION_ERROR_MESSAGE.to_string())
    }

    /// 面向用户的消息
    pub fn message(&self) -> &str {
        match self {
            Self::ExecuteArgument(msg)
            | Self::DatasourceArgument(msg)
            | Self::Authentication(msg)
            | Self::Address(msg)
            | Self::Transport(msg)
            | Self::Serialization(msg) => msg,
        }
    }

    /// 转换为宿主错误码
    pub fn code(&self) -> PluginErrorCode {
        match self {
            Self::ExecuteArgument(_) => PluginErrorCode::ExecuteArgumentError,
            Self::DatasourceArgument(_) => PluginErrorCode::DatasourceArgumentError,
            Self::Authentication(_) => PluginErrorCode::AuthenticationError,
            Self::Address(_) | Self::Transport(_) | Self::Serialization(_) => {
                PluginErrorCode::PluginError
            }
        }
    }

    /// 是否为参数类错误（在任何 I/O 之前即可判定）
    pub fn is_argument(&self) -> bool {
        matches!(self, Self::ExecuteArgument(_) | Self::DatasourceArgument(_))
    }

    /// 转换为宿主错误报告
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            title: self.report_title().to_string(),
            message: self.to_string(),
        }
    }

    fn report_title(&self) -> &'static str {
        match self {
            Self::ExecuteArgument(_) => "Invalid Action Configuration",
            Self::DatasourceArgument(_) => "Invalid Datasource Configuration",
            Self::Authentication(_) => "Authentication Error",
            Self::Address(_) => "Invalid Email Address",
            Self::Transport(_) => "Email Delivery Error",
            Self::Serialization(_) => "Response Serialization Error",
        }
    }
}

/// 宿主平台插件错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PluginErrorCode {
    #[serde(rename = "PLUGIN_EXECUTE_ARGUMENT_ERROR")]
    ExecuteArgumentError,
    #[serde(rename = "PLUGIN_DATASOURCE_ARGUMENT_ERROR")]
    DatasourceArgumentError,
    #[serde(rename = "PLUGIN_AUTHENTICATION_ERROR")]
    AuthenticationError,
    PluginError,
}

impl PluginErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExecuteArgumentError => "PLUGIN_EXECUTE_ARGUMENT_ERROR",
            Self::DatasourceArgumentError => "PLUGIN_DATASOURCE_ARGUMENT_ERROR",
            Self::AuthenticationError => "PLUGIN_AUTHENTICATION_ERROR",
            Self::PluginError => "PLUGIN_ERROR",
        }
    }
}

/// 返回给宿主的错误报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: PluginErrorCode,
    pub title: String,
    pub message: String,
}

/// Result 类型别名
pub type PluginResult<T> = Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_user_message() {
        let err = PluginError::transport("Unable to send email because of error: boom");
        assert_eq!(err.to_string(), "Unable to send email because of error: boom");
        assert_eq!(err.message(), err.to_string());
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            PluginError::execute_argument("x").code(),
            PluginErrorCode::ExecuteArgumentError
        );
        assert_eq!(
            PluginError::invalid_credentials().code(),
            PluginErrorCode::AuthenticationError
        );
        assert_eq!(PluginError::address("x").code(), PluginErrorCode::PluginError);
        assert_eq!(PluginError::serialization("x").code(), PluginErrorCode::PluginError);
        assert!(PluginError::execute_argument("x").is_argument());
        assert!(!PluginError::transport("x").is_argument());
    }

    #[test]
    fn test_report_serialization() {
        let report = PluginError::execute_argument("missing").to_report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["code"], "PLUGIN_EXECUTE_ARGUMENT_ERROR");
        assert_eq!(json["message"], "missing");
        assert_eq!(PluginErrorCode::PluginError.as_str(), "PLUGIN_ERROR");
        assert_eq!(
            serde_json::to_value(PluginErrorCode::PluginError).unwrap(),
            "PLUGIN_ERROR"
        );
    }
}

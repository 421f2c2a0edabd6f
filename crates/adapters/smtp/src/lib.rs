//! SMTP 连接器
//!
//! 把宿主平台的数据源/动作配置映射为 lettre 调用：
//! - 根据端点和凭证创建会话
//! - 校验数据源配置、测试连通性
//! - 构建 MIME 邮件并同步发送

mod executor;
mod message;
mod observability;
mod session;
mod transport;
mod validation;

pub use executor::SmtpPluginExecutor;
pub use message::{AddressParseError, SendRequest, build_message};
pub use session::{Authenticator, SessionProperties, SmtpSession};
pub use transport::{LettreTransport, MailTransport, TransportError};
pub use validation::{connectivity_issues, datasource_issues};

/// 动作表单字段路径
pub mod fields {
    pub const FROM: &str = "send.from";
    pub const TO: &str = "send.to";
    pub const CC: &str = "send.cc";
    pub const BCC: &str = "send.bcc";
    pub const SUBJECT: &str = "send.subject";
    pub const IS_REPLY_TO: &str = "send.isReplyTo";
    pub const REPLY_TO: &str = "send.replyTo";
}

/// 面向用户的固定消息
pub mod messages {
    pub const SEND_SUCCESS: &str = "Sent the email successfully";

    pub const MISSING_RECIPIENT: &str =
        "Couldn't find a valid recipient address. Please check your action configuration.";
    pub const MISSING_SENDER: &str =
        "Couldn't find a valid sender address. Please check your action configuration.";

    pub const MISSING_HOST: &str = "Could not find host address. Please edit the 'Hostname' field to provide the desired endpoint.";
    pub const MISSING_PORT: &str =
        "Could not find port. Please edit the 'Port' field to provide the desired endpoint.";

    pub const PROVIDER_UNAVAILABLE: &str =
        "Unable to create underlying SMTP protocol. Please contact support";
    pub const AUTHENTICATION_FAILED: &str = "Authentication failed with the SMTP server. Please check your username/password settings.";
    pub const CONNECTION_FAILED: &str =
        "Unable to connect to SMTP server. Please check your host/port settings.";
}

//! 邮件传输层
//!
//! `MailTransport` 是连接器与邮件库之间的接缝，生产实现基于 lettre 的同步 `SmtpTransport`。

use std::sync::Mutex;

use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::transport::smtp::Error as SmtpError;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;
use tracing::debug;

use crate::session::{Authenticator, SessionProperties};

/// 传输层错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// 无法构建底层协议实现
    #[error("{0}")]
    NoSuchProvider(String),

    /// 服务器拒绝凭证
    #[error("{0}")]
    AuthenticationFailed(String),

    #[error("{0}")]
    Messaging(String),
}

impl From<SmtpError> for TransportError {
    fn from(err: SmtpError) -> Self {
        let status = err.status().map(|code| code.to_string());
        let description = err.to_string();

        if is_authentication_rejection(status.as_deref(), err.is_client(), &description) {
            Self::AuthenticationFailed(description)
        } else {
            Self::Messaging(description)
        }
    }
}

/// 判断是否为认证被拒
///
/// 530/534/535/538 是 AUTH 相关的回复码；客户端侧找不到可用的 AUTH 机制同样视为认证失败。
pub(crate) fn is_authentication_rejection(
    status: Option<&str>,
    is_client: bool,
    description: &str,
) -> bool {
    match status {
        Some(code) => matches!(code, "530" | "534" | "535" | "538"),
        None => {
            is_client
                && description
                    .to_ascii_lowercase()
                    .contains("authentication mechanism")
        }
    }
}

/// 邮件传输接口
#[cfg_attr(test, mockall::automock)]
pub trait MailTransport: Send + Sync {
    /// 发送一封邮件，阻塞直到服务器应答
    fn send(&self, message: &Message) -> Result<(), TransportError>;

    /// 建立连接、完成 STARTTLS 和认证后退出
    fn test_connection(&self) -> Result<(), TransportError>;

    /// 释放底层连接对象，没有时直接返回
    fn close(&self) -> Result<(), TransportError>;
}

/// 基于 lettre 的传输实现
///
/// 底层 `SmtpTransport` 在第一次使用时才构建，此时才调用凭证回调。
pub struct LettreTransport {
    properties: SessionProperties,
    authenticator: Authenticator,
    inner: Mutex<Option<SmtpTransport>>,
}

impl LettreTransport {
    pub fn new(properties: SessionProperties, authenticator: Authenticator) -> Self {
        Self {
            properties,
            authenticator,
            inner: Mutex::new(None),
        }
    }

    /// 是否已经构建了底层传输
    pub fn is_open(&self) -> bool {
        self.inner.lock().map(|inner| inner.is_some()).unwrap_or(false)
    }

    fn build_transport(&self) -> Result<SmtpTransport, TransportError> {
        let props = &self.properties;

        let tls_parameters = TlsParameters::builder(props.host.clone())
            .dangerous_accept_invalid_certs(props.trusts(&props.host))
            .build()
            .map_err(|e| TransportError::NoSuchProvider(e.to_string()))?;

        let tls = if props.starttls_required {
            Tls::Required(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let mut builder = SmtpTransport::builder_dangerous(props.host.as_str())
            .port(props.port)
            .tls(tls)
            .timeout(props.timeout);

        if props.auth {
            builder = builder.credentials(self.authenticator.credentials());
        }

        debug!(host = %props.host, port = props.port, "SMTP transport built");
        Ok(builder.build())
    }

    fn transport(&self) -> Result<SmtpTransport, TransportError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| TransportError::Messaging("SMTP transport lock poisoned".to_string()))?;

        if let Some(transport) = inner.as_ref() {
            return Ok(transport.clone());
        }

        let transport = self.build_transport()?;
        *inner = Some(transport.clone());
        Ok(transport)
    }
}

impl MailTransport for LettreTransport {
    fn send(&self, message: &Message) -> Result<(), TransportError> {
        let transport = self.transport()?;
        transport.send(message)?;
        Ok(())
    }

    fn test_connection(&self) -> Result<(), TransportError> {
        let transport = self.transport()?;
        if transport.test_connection()? {
            Ok(())
        } else {
            Err(TransportError::Messaging(
                "SMTP server did not accept the connection".to_string(),
            ))
        }
    }

    fn close(&self) -> Result<(), TransportError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| TransportError::Messaging("SMTP transport lock poisoned".to_string()))?;

        match inner.take() {
            Some(transport) => {
                drop(transport);
                debug!(host = %self.properties.host, "SMTP transport closed");
            }
            None => debug!(host = %self.properties.host, "No open SMTP transport to close"),
        }
        Ok(())
    }
}

//! 邮件会话
//!
//! 会话只保存传输属性和凭证回调，创建时不做任何网络 I/O。

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use lettre::transport::smtp::SUBMISSION_PORT;
use lettre::transport::smtp::authentication::Credentials;
use plugin_common::DatasourceConfiguration;
use plugin_config::SmtpSettings;
use plugin_errors::{PluginError, PluginResult};
use secrecy::{ExposeSecret, Secret};

use crate::messages;
use crate::transport::{LettreTransport, MailTransport};

/// 凭证回调，在传输层建立连接时调用
#[derive(Clone)]
pub struct Authenticator(Arc<dyn Fn() -> Credentials + Send + Sync>);

impl Authenticator {
    pub fn new(supplier: impl Fn() -> Credentials + Send + Sync + 'static) -> Self {
        Self(Arc::new(supplier))
    }

    /// 用户名/密码认证
    pub fn password(username: impl Into<String>, password: Secret<String>) -> Self {
        let username = username.into();
        Self::new(move || Credentials::new(username.clone(), password.expose_secret().clone()))
    }

    pub fn credentials(&self) -> Credentials {
        (self.0)()
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Authenticator(..)")
    }
}

/// 传输属性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProperties {
    pub host: String,
    pub port: u16,
    /// 必须认证
    pub auth: bool,
    /// 必须先 STARTTLS
    pub starttls_required: bool,
    /// 信任其证书的主机
    pub ssl_trust: Option<String>,
    pub timeout: Option<Duration>,
}

impl SessionProperties {
    pub fn new(host: impl Into<String>, port: u16, settings: &SmtpSettings) -> Self {
        let host = host.into();
        let ssl_trust = settings
            .trust_endpoint_certificate
            .then(|| host.clone());

        Self {
            host,
            port,
            auth: true,
            starttls_required: true,
            ssl_trust,
            timeout: Some(Duration::from_secs(settings.timeout_secs)),
        }
    }

    /// 是否信任 `host` 的证书而不做校验
    pub fn trusts(&self, host: &str) -> bool {
        self.ssl_trust.as_deref() == Some(host)
    }
}

/// 会话句柄
///
/// 由宿主连接池持有，克隆开销很小。
#[derive(Clone)]
pub struct SmtpSession {
    properties: Arc<SessionProperties>,
    transport: Arc<dyn MailTransport>,
}

impl SmtpSession {
    /// 创建使用 lettre 传输的会话
    pub fn new(properties: SessionProperties, authenticator: Authenticator) -> Self {
        let transport = LettreTransport::new(properties.clone(), authenticator);
        Self::with_transport(properties, Arc::new(transport))
    }

    /// 使用自定义传输创建会话
    pub fn with_transport(properties: SessionProperties, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            properties: Arc::new(properties),
            transport,
        }
    }

    /// 根据数据源配置创建会话
    ///
    /// 只读取第一个端点；缺失凭证按空字符串处理，由校验环节报告。
    pub fn from_datasource(
        datasource: &DatasourceConfiguration,
        settings: &SmtpSettings,
    ) -> PluginResult<Self> {
        let endpoint = datasource
            .primary_endpoint()
            .ok_or_else(|| PluginError::datasource_argument(messages::MISSING_HOST))?;

        let host = endpoint.host.clone().unwrap_or_default();
        let port = endpoint.port.unwrap_or(SUBMISSION_PORT);

        let (username, password) = match &datasource.authentication {
            Some(auth) => (
                auth.username.clone().unwrap_or_default(),
                auth.password
                    .clone()
                    .unwrap_or_else(|| Secret::new(String::new())),
            ),
            None => (String::new(), Secret::new(String::new())),
        };

        let properties = SessionProperties::new(host, port, settings);
        Ok(Self::new(properties, Authenticator::password(username, password)))
    }

    pub fn properties(&self) -> &SessionProperties {
        &self.properties
    }

    pub fn transport(&self) -> Arc<dyn MailTransport> {
        Arc::clone(&self.transport)
    }
}

impl fmt::Debug for SmtpSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSession")
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

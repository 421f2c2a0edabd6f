//! 数据源校验与连通性测试

use plugin_common::{DatasourceConfiguration, DatasourceField, ValidationIssue, has_text};
use plugin_errors::PluginError;
use secrecy::ExposeSecret;
use tracing::warn;

use crate::messages;
use crate::session::SmtpSession;
use crate::transport::TransportError;

/// 校验数据源配置，不做任何网络连接
pub fn datasource_issues(datasource: &DatasourceConfiguration) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    match datasource.primary_endpoint() {
        None => issues.push(ValidationIssue::new(
            DatasourceField::Host,
            messages::MISSING_HOST,
        )),
        Some(endpoint) => {
            if !has_text(endpoint.host.as_deref()) {
                issues.push(ValidationIssue::new(
                    DatasourceField::Host,
                    messages::MISSING_HOST,
                ));
            }
            if endpoint.port.is_none() {
                issues.push(ValidationIssue::new(
                    DatasourceField::Port,
                    messages::MISSING_PORT,
                ));
            }
        }
    }

    let has_credentials = datasource.authentication.as_ref().is_some_and(|auth| {
        has_text(auth.username.as_deref())
            && auth
                .password
                .as_ref()
                .is_some_and(|password| has_text(Some(password.expose_secret().as_str())))
    });
    if !has_credentials {
        issues.push(ValidationIssue::new(
            DatasourceField::Authentication,
            PluginError::invalid_credentials().message(),
        ));
    }

    issues
}

/// 打开一次传输连接并对结果分类
///
/// 阻塞调用，异步上下文中应放到 blocking 线程池执行。
pub fn connectivity_issues(session: &SmtpSession) -> Vec<ValidationIssue> {
    let props = session.properties();

    match session.transport().test_connection() {
        Ok(()) => Vec::new(),
        Err(TransportError::NoSuchProvider(cause)) => {
            warn!(host = %props.host, port = props.port, error = %cause, "SMTP provider unavailable");
            vec![ValidationIssue::new(
                DatasourceField::Connection,
                messages::PROVIDER_UNAVAILABLE,
            )]
        }
        Err(TransportError::AuthenticationFailed(cause)) => {
            warn!(host = %props.host, port = props.port, error = %cause, "SMTP authentication rejected");
            vec![ValidationIssue::new(
                DatasourceField::Authentication,
                messages::AUTHENTICATION_FAILED,
            )]
        }
        Err(TransportError::Messaging(cause)) => {
            warn!(host = %props.host, port = props.port, error = %cause, "SMTP connection failed");
            vec![ValidationIssue::new(
                DatasourceField::Connection,
                messages::CONNECTION_FAILED,
            )]
        }
    }
}

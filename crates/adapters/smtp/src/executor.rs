//! SMTP 插件执行器

use async_trait::async_trait;
use plugin_common::{
    ActionConfiguration, ActionExecutionResult, DatasourceConfiguration, DatasourceField,
    DatasourceTestResult, ValidationIssue, issue_messages,
};
use plugin_config::{PluginConfig, SmtpSettings};
use plugin_errors::{PluginError, PluginResult};
use plugin_ports::PluginExecutor;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::message::{SendRequest, build_message};
use crate::messages;
use crate::observability;
use crate::session::SmtpSession;
use crate::validation::{connectivity_issues, datasource_issues};

/// 发送成功的响应正文
#[derive(Debug, Serialize)]
struct SendResponse<'a> {
    message: &'a str,
}

/// SMTP 插件执行器
#[derive(Debug, Clone, Default)]
pub struct SmtpPluginExecutor {
    settings: SmtpSettings,
}

impl SmtpPluginExecutor {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(config.smtp.clone())
    }

    pub fn settings(&self) -> &SmtpSettings {
        &self.settings
    }

    fn send_error(cause: impl std::fmt::Display) -> PluginError {
        PluginError::transport(format!("Unable to send email because of error: {}", cause))
    }

    fn failure_reason(err: &PluginError) -> &'static str {
        if err.is_argument() {
            return "argument";
        }

        match err {
            PluginError::Authentication(_) => "authentication",
            PluginError::Address(_) => "address",
            PluginError::Serialization(_) => "serialization",
            _ => "transport",
        }
    }

    async fn send(
        &self,
        connection: &SmtpSession,
        action: &ActionConfiguration,
    ) -> PluginResult<ActionExecutionResult> {
        let request = SendRequest::from_action(action)?;
        let message = build_message(&request)?;

        debug!(
            host = %connection.properties().host,
            to = %request.to,
            subject = request.subject.as_deref().unwrap_or_default(),
            "Going to send the email"
        );

        let transport = connection.transport();
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(Self::send_error)?
            .map_err(Self::send_error)?;

        info!(to = %request.to, "Sent the email successfully");
        observability::record_email_sent();

        let body = serde_json::to_string(&SendResponse {
            message: messages::SEND_SUCCESS,
        })
        .map_err(|e| {
            PluginError::serialization(format!(
                "Unable to send response for email plugin because of error: {}",
                e
            ))
        })?;

        Ok(ActionExecutionResult::success(body))
    }
}

#[async_trait]
impl PluginExecutor<SmtpSession> for SmtpPluginExecutor {
    async fn datasource_create(
        &self,
        datasource: &DatasourceConfiguration,
    ) -> PluginResult<SmtpSession> {
        let session = SmtpSession::from_datasource(datasource, &self.settings)?;
        debug!(
            host = %session.properties().host,
            port = session.properties().port,
            "Email datasource session created"
        );
        Ok(session)
    }

    fn datasource_destroy(&self, connection: &SmtpSession) {
        debug!(host = %connection.properties().host, "Going to destroy an email datasource");

        if let Err(e) = connection.transport().close() {
            error!(
                host = %connection.properties().host,
                error = %e,
                "Failed to close SMTP transport"
            );
        }
    }

    fn datasource_issues(&self, datasource: &DatasourceConfiguration) -> Vec<ValidationIssue> {
        debug!("Going to validate an email datasource");
        datasource_issues(datasource)
    }

    async fn test_datasource(&self, datasource: &DatasourceConfiguration) -> DatasourceTestResult {
        debug!("Going to test an email datasource");

        let issues = match self.datasource_create(datasource).await {
            Ok(session) => {
                match tokio::task::spawn_blocking(move || connectivity_issues(&session)).await {
                    Ok(issues) => issues,
                    Err(e) => {
                        warn!(error = %e, "Email datasource test task failed");
                        vec![ValidationIssue::new(
                            DatasourceField::Connection,
                            messages::CONNECTION_FAILED,
                        )]
                    }
                }
            }
            Err(e) => vec![ValidationIssue::new(DatasourceField::Host, e.to_string())],
        };

        observability::record_datasource_test(issues.is_empty());
        if issues.is_empty() {
            info!("Email datasource test succeeded");
        }

        DatasourceTestResult::new(issue_messages(&issues))
    }

    async fn execute(
        &self,
        connection: &SmtpSession,
        action: &ActionConfiguration,
    ) -> PluginResult<ActionExecutionResult> {
        let result = self.send(connection, action).await;

        if let Err(e) = &result {
            warn!(error = %e, "Email action failed");
            observability::record_email_failure(Self::failure_reason(e));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionProperties;
    use crate::transport::{MockMailTransport, TransportError};
    use crate::fields;
    use std::sync::Arc;

    fn session_with(transport: MockMailTransport) -> SmtpSession {
        let props = SessionProperties::new("smtp.example.com", 587, &SmtpSettings::default());
        SmtpSession::with_transport(props, Arc::new(transport))
    }

    fn minimal_action() -> ActionConfiguration {
        ActionConfiguration::new()
            .with_form_value(fields::FROM, "sender@example.com")
            .with_form_value(fields::TO, "rcpt@example.com")
            .with_form_value(fields::SUBJECT, "Hello")
            .with_body("<b>Hi</b>")
    }

    #[tokio::test]
    async fn test_missing_recipient_does_not_touch_transport() {
        let mut transport = MockMailTransport::new();
        transport.expect_send().times(0);
        let session = session_with(transport);

        let action = ActionConfiguration::new().with_form_value(fields::FROM, "sender@example.com");
        let err = SmtpPluginExecutor::default()
            .execute(&session, &action)
            .await
            .unwrap_err();

        assert!(matches!(err, PluginError::ExecuteArgument(_)));
        assert!(err.to_string().contains("recipient"));
    }

    #[tokio::test]
    async fn test_send_success() {
        let mut transport = MockMailTransport::new();
        transport.expect_send().times(1).returning(|_| Ok(()));
        let session = session_with(transport);

        let result = SmtpPluginExecutor::default()
            .execute(&session, &minimal_action())
            .await
            .unwrap();

        assert!(result.is_execution_success);
        let body: serde_json::Value = serde_json::from_str(result.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"message": "Sent the email successfully"}));
    }

    #[tokio::test]
    async fn test_transport_failure_is_wrapped() {
        let mut transport = MockMailTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(TransportError::Messaging("connection reset".to_string())));
        let session = session_with(transport);

        let err = SmtpPluginExecutor::default()
            .execute(&session, &minimal_action())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PluginError::transport("Unable to send email because of error: connection reset")
        );
    }

    #[test]
    fn test_destroy_swallows_close_failure() {
        let mut transport = MockMailTransport::new();
        transport
            .expect_close()
            .times(1)
            .returning(|| Err(TransportError::Messaging("already closed".to_string())));
        let session = session_with(transport);

        SmtpPluginExecutor::default().datasource_destroy(&session);
    }

    #[test]
    fn test_connectivity_classification() {
        let cases = [
            (
                TransportError::AuthenticationFailed("535 rejected".to_string()),
                messages::AUTHENTICATION_FAILED,
            ),
            (
                TransportError::Messaging("connection refused".to_string()),
                messages::CONNECTION_FAILED,
            ),
            (
                TransportError::NoSuchProvider("invalid dns name".to_string()),
                messages::PROVIDER_UNAVAILABLE,
            ),
        ];

        for (failure, expected) in cases {
            let mut transport = MockMailTransport::new();
            transport
                .expect_test_connection()
                .times(1)
                .returning(move || Err(failure.clone()));
            let issues = connectivity_issues(&session_with(transport));

            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].message, expected);
        }
    }

    #[test]
    fn test_connectivity_success() {
        let mut transport = MockMailTransport::new();
        transport.expect_test_connection().times(1).returning(|| Ok(()));
        assert!(connectivity_issues(&session_with(transport)).is_empty());
    }

    #[test]
    fn test_failure_reason() {
        let cases = [
            (PluginError::execute_argument("x"), "argument"),
            (PluginError::datasource_argument("x"), "argument"),
            (PluginError::invalid_credentials(), "authentication"),
            (PluginError::address("x"), "address"),
            (PluginError::transport("x"), "transport"),
            (PluginError::serialization("x"), "serialization"),
        ];

        for (err, expected) in cases {
            assert_eq!(SmtpPluginExecutor::failure_reason(&err), expected);
        }
    }

    #[test]
    fn test_from_config() {
        let mut config = PluginConfig::default();
        config.smtp.timeout_secs = 7;
        let executor = SmtpPluginExecutor::from_config(&config);
        assert_eq!(executor.settings().timeout_secs, 7);
    }
}

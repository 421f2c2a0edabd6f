//! 测试用的内存传输

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use lettre::Message;
use plugin_adapter_smtp::{MailTransport, SessionProperties, SmtpSession, TransportError};
use plugin_config::SmtpSettings;

/// 记录所有调用的传输替身
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Message>>,
    calls: Mutex<Vec<&'static str>>,
    send_failure: Option<TransportError>,
    connect_failure: Option<TransportError>,
    closed: Mutex<bool>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_send(failure: TransportError) -> Self {
        Self {
            send_failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn failing_connect(failure: TransportError) -> Self {
        Self {
            connect_failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

impl MailTransport for RecordingTransport {
    fn send(&self, message: &Message) -> Result<(), TransportError> {
        self.record("send");
        if let Some(failure) = &self.send_failure {
            return Err(failure.clone());
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn test_connection(&self) -> Result<(), TransportError> {
        self.record("test_connection");
        match &self.connect_failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }

    fn close(&self) -> Result<(), TransportError> {
        self.record("close");
        let mut closed = self.closed.lock().unwrap();
        if *closed {
            return Err(TransportError::Messaging("transport already closed".to_string()));
        }
        *closed = true;
        Ok(())
    }
}

/// 使用替身传输创建会话
pub fn session_with(transport: Arc<RecordingTransport>) -> SmtpSession {
    let props = SessionProperties::new("smtp.example.com", 587, &SmtpSettings::default());
    SmtpSession::with_transport(props, transport)
}

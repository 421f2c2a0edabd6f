//! SMTP 连接器指标

use metrics::counter;

/// 记录一次成功发送
pub fn record_email_sent() {
    counter!("smtp_plugin_emails_sent_total").increment(1);
}

/// 记录一次发送失败
pub fn record_email_failure(reason: &'static str) {
    counter!("smtp_plugin_email_failures_total", "reason" => reason).increment(1);
}

/// 记录一次数据源测试
pub fn record_datasource_test(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("smtp_plugin_datasource_tests_total", "outcome" => outcome).increment(1);
}

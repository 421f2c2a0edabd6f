//! PluginExecutor trait 定义

use async_trait::async_trait;
use plugin_common::{
    ActionConfiguration, ActionExecutionResult, DatasourceConfiguration, DatasourceTestResult,
    ValidationIssue, issue_messages,
};
use plugin_errors::PluginResult;

/// 插件执行器 trait
///
/// `C` 是连接器创建的会话句柄，由宿主的连接池持有。
#[async_trait]
pub trait PluginExecutor<C>: Send + Sync
where
    C: Send + Sync,
{
    /// 根据数据源配置创建会话
    async fn datasource_create(&self, datasource: &DatasourceConfiguration) -> PluginResult<C>;

    /// 销毁会话，失败只记录日志
    fn datasource_destroy(&self, connection: &C);

    /// 结构化的数据源校验结果
    fn datasource_issues(&self, datasource: &DatasourceConfiguration) -> Vec<ValidationIssue>;

    /// 数据源校验，返回面向用户的消息
    fn validate_datasource(&self, datasource: &DatasourceConfiguration) -> Vec<String> {
        issue_messages(&self.datasource_issues(datasource))
    }

    /// 测试数据源连通性
    async fn test_datasource(&self, datasource: &DatasourceConfiguration) -> DatasourceTestResult;

    /// 执行动作
    async fn execute(
        &self,
        connection: &C,
        action: &ActionConfiguration,
    ) -> PluginResult<ActionExecutionResult>;
}

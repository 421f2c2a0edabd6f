//! 宿主平台模型定义
//!
//! 数据源配置、动作配置和执行结果均由宿主拥有，连接器只读。

use secrecy::Secret;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 主机端点
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: Some(host.into()),
            port: Some(port),
        }
    }
}

/// 基础认证信息
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DbAuth {
    pub username: Option<String>,
    pub password: Option<Secret<String>>,
}

impl DbAuth {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(Secret::new(password.into())),
        }
    }
}

/// 数据源配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasourceConfiguration {
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    pub authentication: Option<DbAuth>,
}

impl DatasourceConfiguration {
    pub fn new(endpoint: Endpoint, authentication: DbAuth) -> Self {
        Self {
            endpoints: vec![endpoint],
            authentication: Some(authentication),
        }
    }

    /// 第一个端点
    pub fn primary_endpoint(&self) -> Option<&Endpoint> {
        self.endpoints.first()
    }
}

/// 动作配置
///
/// 表单字段保存在嵌套的 JSON 文档中，通过点分路径访问，
/// 例如 `send.from` 对应 `form_data["send"]["from"]`。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfiguration {
    pub body: Option<String>,
    #[serde(default)]
    pub form_data: Value,
}

impl ActionConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置正文
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// 按点分路径写入表单字段，缺失的中间层级自动创建
    pub fn with_form_value(mut self, path: &str, value: impl Into<Value>) -> Self {
        let mut current = &mut self.form_data;
        for segment in path.split('.') {
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            current = &mut current[segment];
        }
        *current = value.into();
        self
    }

    /// 按点分路径读取表单字段
    ///
    /// 嵌套路径优先，找不到时回退到以完整路径为键的顶层字段。
    pub fn form_value(&self, path: &str) -> Option<&Value> {
        let nested = path
            .split('.')
            .try_fold(&self.form_data, |node, segment| node.get(segment));

        nested
            .or_else(|| self.form_data.get(path))
            .filter(|value| !value.is_null())
    }

    /// 读取字符串字段
    pub fn form_str(&self, path: &str) -> Option<&str> {
        self.form_value(path).and_then(Value::as_str)
    }

    /// 读取布尔字段，兼容 `"true"` / `"false"` 字符串
    pub fn form_bool(&self, path: &str) -> Option<bool> {
        match self.form_value(path)? {
            Value::Bool(flag) => Some(*flag),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// 动作执行结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionExecutionResult {
    pub is_execution_success: bool,
    pub body: Option<String>,
}

impl ActionExecutionResult {
    /// 成功结果，正文为已序列化的 JSON
    pub fn success(body: impl Into<String>) -> Self {
        Self {
            is_execution_success: true,
            body: Some(body.into()),
        }
    }
}

/// 数据源连通性测试结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasourceTestResult {
    pub invalids: Vec<String>,
}

impl DatasourceTestResult {
    pub fn new(invalids: Vec<String>) -> Self {
        Self { invalids }
    }

    pub fn success() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.invalids.is_empty()
    }
}

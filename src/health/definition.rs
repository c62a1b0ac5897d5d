//! 健康检查定义
//!
//! 存储层保存调用方提交的原始定义；启动调度前由 [`ProbeTarget::from_definition`]
//! 校验并转换为可直接发起请求的探测目标。

use crate::error::EngineError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// 已存储的健康检查定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckDefinition {
    /// 健康检查ID
    pub id: i64,
    /// 探测间隔（秒）
    pub interval_seconds: i64,
    /// 目标URL
    pub url: String,
    /// HTTP方法
    pub http_method: String,
    /// 请求头，JSON对象文本
    #[serde(rename = "headers")]
    pub headers_json: String,
    /// 请求体
    #[serde(default)]
    pub body: String,
}

/// 新建健康检查时提交的字段，ID由存储分配
#[derive(Debug, Clone, PartialEq)]
pub struct NewHealthCheck {
    pub interval_seconds: i64,
    pub url: String,
    pub http_method: String,
    pub headers_json: String,
    pub body: String,
}

impl NewHealthCheck {
    /// 附加存储分配的ID
    pub fn with_id(self, id: i64) -> HealthCheckDefinition {
        HealthCheckDefinition {
            id,
            interval_seconds: self.interval_seconds,
            url: self.url,
            http_method: self.http_method,
            headers_json: self.headers_json,
            body: self.body,
        }
    }
}

/// 经过校验的探测目标，在一次调度运行期间不可变
#[derive(Debug, Clone)]
pub struct ProbeTarget {
    /// 健康检查ID
    pub health_check_id: i64,
    /// 探测间隔
    pub interval: Duration,
    /// HTTP方法
    pub method: Method,
    /// 目标URL
    pub url: Url,
    /// 请求头
    pub headers: HeaderMap,
    /// 请求体，空字符串表示不发送请求体
    pub body: String,
}

impl ProbeTarget {
    /// 校验定义并转换为探测目标
    ///
    /// # 参数
    /// * `definition` - 已存储的定义
    ///
    /// # 返回
    /// * `Result<Self, EngineError>` - 校验失败时返回 `EngineError::Validation`
    pub fn from_definition(definition: &HealthCheckDefinition) -> Result<Self, EngineError> {
        if definition.interval_seconds <= 0 {
            return Err(EngineError::Validation(format!(
                "探测间隔必须大于0，当前为 {}",
                definition.interval_seconds
            )));
        }

        let url = Url::parse(&definition.url)
            .map_err(|e| EngineError::Validation(format!("无效的URL {}: {}", definition.url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(EngineError::Validation(format!(
                "不支持的URL协议: {}",
                url.scheme()
            )));
        }

        let method = Method::from_bytes(definition.http_method.to_uppercase().as_bytes())
            .map_err(|_| {
                EngineError::Validation(format!("无效的HTTP方法: {}", definition.http_method))
            })?;

        let headers = parse_headers(&definition.headers_json)?;

        Ok(Self {
            health_check_id: definition.id,
            interval: Duration::from_secs(definition.interval_seconds as u64),
            method,
            url,
            headers,
            body: definition.body.clone(),
        })
    }
}

/// 解析请求头JSON文本
///
/// 空字符串与 `null` 视为没有请求头；其他内容必须是值全为字符串的JSON对象。
fn parse_headers(headers_json: &str) -> Result<HeaderMap, EngineError> {
    let trimmed = headers_json.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(HeaderMap::new());
    }

    let raw: HashMap<String, String> = serde_json::from_str(trimmed)
        .map_err(|e| EngineError::Validation(format!("请求头格式无效: {}", e)))?;

    let mut headers = HeaderMap::with_capacity(raw.len());
    for (key, value) in raw {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| EngineError::Validation(format!("无效的请求头名称: {}", key)))?;
        let value = HeaderValue::from_str(&value)
            .map_err(|_| EngineError::Validation(format!("请求头 {} 的值无效", key)))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

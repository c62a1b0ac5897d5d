//! 探测结果数据结构
//!
//! 定义单次探测的结果归约以及持久化的探测事件

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 探测失败分类
///
/// 失败状态只取这些固定文本，保证同一种故障多次出现时状态字符串一致，
/// 不会因为错误细节不同而误判为状态变化。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFailure {
    /// 请求超时
    Timeout,
    /// 连接失败（包括DNS解析失败）
    Connect,
    /// 请求构建失败
    Request,
    /// 重定向失败
    Redirect,
    /// 读取响应体失败
    Body,
    /// 响应解码失败
    Decode,
    /// 其他传输错误
    Other,
}

impl ProbeFailure {
    /// 根据 reqwest 错误归类
    pub fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            ProbeFailure::Timeout
        } else if error.is_connect() {
            ProbeFailure::Connect
        } else if error.is_redirect() {
            ProbeFailure::Redirect
        } else if error.is_builder() || error.is_request() {
            ProbeFailure::Request
        } else if error.is_body() {
            ProbeFailure::Body
        } else if error.is_decode() {
            ProbeFailure::Decode
        } else {
            ProbeFailure::Other
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ProbeFailure::Timeout => "Request timeout",
            ProbeFailure::Connect => "Connection refused",
            ProbeFailure::Request => "Invalid request",
            ProbeFailure::Redirect => "Redirect error",
            ProbeFailure::Body => "Response body error",
            ProbeFailure::Decode => "Response decode error",
            ProbeFailure::Other => "Request failed",
        }
    }
}

/// 单次探测的结果
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// 完成了一次HTTP交换，无论状态码是多少
    Response { status: StatusCode, elapsed: Duration },
    /// 传输层失败或超时
    Failed { failure: ProbeFailure, elapsed: Duration },
}

impl ProbeOutcome {
    /// 归约为事件状态字符串
    ///
    /// 成功交换为 `"<状态码> <原因短语>"`，例如 `"200 OK"`；
    /// 失败为 `"healthcheck failed: <分类>"`。
    pub fn status(&self) -> String {
        match self {
            ProbeOutcome::Response { status, .. } => format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ),
            ProbeOutcome::Failed { failure, .. } => {
                format!("healthcheck failed: {}", failure.description())
            }
        }
    }

    /// 探测耗时
    pub fn elapsed(&self) -> Duration {
        match self {
            ProbeOutcome::Response { elapsed, .. } | ProbeOutcome::Failed { elapsed, .. } => {
                *elapsed
            }
        }
    }

    /// 是否为传输层失败
    pub fn is_failure(&self) -> bool {
        matches!(self, ProbeOutcome::Failed { .. })
    }
}

/// 已持久化的探测事件，只追加不修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeEvent {
    /// 事件ID
    pub id: i64,
    /// 所属健康检查ID
    #[serde(skip_serializing, default)]
    pub health_check_id: i64,
    /// 状态字符串
    pub status: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

/// 待追加的探测事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProbeEvent {
    pub health_check_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl NewProbeEvent {
    /// 以当前时间创建事件
    pub fn now(health_check_id: i64, status: impl Into<String>) -> Self {
        Self {
            health_check_id,
            status: status.into(),
            created_at: Utc::now(),
        }
    }

    /// 附加存储分配的ID
    pub fn with_id(self, id: i64) -> ProbeEvent {
        ProbeEvent {
            id,
            health_check_id: self.health_check_id,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

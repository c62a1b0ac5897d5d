//! 单元测试共用的执行器和通知发送器

use crate::error::NotificationError;
use crate::health::definition::{HealthCheckDefinition, ProbeTarget};
use crate::health::detector::Transition;
use crate::health::executor::ProbeExecutor;
use crate::health::result::ProbeOutcome;
use crate::notification::NotificationSender;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// 按顺序返回预设状态码的执行器，用完后一直返回 200
#[derive(Default)]
pub struct ScriptedExecutor {
    statuses: Mutex<VecDeque<u16>>,
    delay: Duration,
    started: AtomicUsize,
}

impl ScriptedExecutor {
    pub fn new(codes: &[u16]) -> Self {
        Self {
            statuses: Mutex::new(codes.iter().copied().collect()),
            ..Default::default()
        }
    }

    /// 每次探测前等待 `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// 已开始的探测次数
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProbeExecutor for ScriptedExecutor {
    async fn execute(&self, _target: &ProbeTarget) -> ProbeOutcome {
        self.started.fetch_add(1, Ordering::SeqCst);
        let code = self.statuses.lock().unwrap().pop_front().unwrap_or(200);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        ProbeOutcome::Response {
            status: StatusCode::from_u16(code).unwrap(),
            elapsed: self.delay,
        }
    }
}

/// 记录所有通知的发送器
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<Transition>>,
    fail: bool,
}

impl RecordingSender {
    /// 记录通知后返回失败
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Transition> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send_transition(&self, transition: &Transition) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(transition.clone());
        if self.fail {
            Err(NotificationError::UnexpectedStatus(500))
        } else {
            Ok(())
        }
    }
}

pub fn definition(id: i64, interval_seconds: i64) -> HealthCheckDefinition {
    HealthCheckDefinition {
        id,
        interval_seconds,
        url: "http://example.com/health".to_string(),
        http_method: "GET".to_string(),
        headers_json: "{}".to_string(),
        body: String::new(),
    }
}

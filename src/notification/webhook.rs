//! Webhook 通知发送器
//!
//! 以 `{"<字段名>": "<消息>"}` 的JSON格式POST状态变化通知

use crate::config::WebhookConfig;
use crate::error::NotificationError;
use crate::health::Transition;
use crate::notification::sender::NotificationSender;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};

/// Webhook 通知发送器
pub struct WebhookSender {
    /// HTTP客户端
    client: Client,
    /// webhook URL
    url: String,
    /// 消息字段名
    message_field_name: String,
}

impl WebhookSender {
    /// 创建新的webhook发送器
    ///
    /// # 参数
    /// * `url` - webhook URL
    /// * `message_field_name` - 消息字段名
    /// * `timeout` - 发送超时
    pub fn new(
        url: impl Into<String>,
        message_field_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotificationError> {
        let message_field_name = message_field_name.into();
        if message_field_name.trim().is_empty() {
            return Err(NotificationError::ConfigError(
                "消息字段名不能为空".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotificationError::ConfigError(format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            message_field_name,
        })
    }

    /// 根据配置创建发送器，未配置URL时返回 `None`
    pub fn from_config(config: &WebhookConfig) -> Result<Option<Self>, NotificationError> {
        config
            .effective_url()
            .map(|url| Self::new(url, config.message_field_name.clone(), config.timeout()))
            .transpose()
    }

    /// 构建消息体
    fn build_message_body(&self, transition: &Transition) -> Value {
        let mut body = Map::new();
        body.insert(
            self.message_field_name.clone(),
            Value::String(transition.message()),
        );
        Value::Object(body)
    }
}

#[async_trait]
impl NotificationSender for WebhookSender {
    async fn send_transition(&self, transition: &Transition) -> Result<(), NotificationError> {
        let body = self.build_message_body(transition);
        debug!("发送状态变化通知到webhook: {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotificationError::SendError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            info!(
                health_check_id = transition.health_check_id,
                "状态变化通知发送成功"
            );
            Ok(())
        } else {
            Err(NotificationError::UnexpectedStatus(status.as_u16()))
        }
    }
}

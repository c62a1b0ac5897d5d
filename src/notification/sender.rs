//! 通知发送器模块
//!
//! 定义通知发送的trait和基础实现

use crate::error::NotificationError;
use crate::health::Transition;
use async_trait::async_trait;

/// 通知发送器trait
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 发送状态变化通知
    ///
    /// # 参数
    /// * `transition` - 检测到的状态变化
    ///
    /// # 返回
    /// * `Result<(), NotificationError>` - 发送结果，调用方只记录不重试
    async fn send_transition(&self, transition: &Transition) -> Result<(), NotificationError>;
}

/// 空的通知发送器实现（用于未配置webhook的场景）
pub struct NoOpSender;

#[async_trait]
impl NotificationSender for NoOpSender {
    async fn send_transition(&self, transition: &Transition) -> Result<(), NotificationError> {
        tracing::debug!(
            health_check_id = transition.health_check_id,
            "未配置webhook，跳过状态变化通知"
        );
        Ok(())
    }
}

//! 通知模块
//!
//! 提供状态变化的webhook通知功能

pub mod sender;
pub mod webhook;

// 重新导出主要类型
pub use sender::{NoOpSender, NotificationSender};
pub use webhook::WebhookSender;

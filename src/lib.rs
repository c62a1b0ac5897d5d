//! API Vitals
//!
//! HTTP接口健康检测调度服务：按固定间隔探测已注册的接口，保存每次探测的状态，
//! 在状态发生变化时发送webhook通知。

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod notification;
pub mod store;
pub mod web;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{ApiVitalsError, EngineError, NotificationError, Result, StoreError};
pub use health::{HealthCheckEngine, Scheduler};

/// 应用程序版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

//! 健康检测模块
//!
//! 提供HTTP健康探测、状态变化检测和按间隔调度的功能

pub mod cycle;
pub mod definition;
pub mod detector;
pub mod executor;
pub mod registry;
pub mod result;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

// 重新导出主要类型
pub use cycle::ProbeCycle;
pub use definition::{HealthCheckDefinition, NewHealthCheck, ProbeTarget};
pub use detector::{Transition, TransitionDetector};
pub use executor::{HttpProbeExecutor, ProbeExecutor};
pub use registry::{CancelToken, ProbeRegistry, ScheduleHandle};
pub use result::{NewProbeEvent, ProbeEvent, ProbeFailure, ProbeOutcome};
pub use scheduler::{HealthCheckEngine, Scheduler};

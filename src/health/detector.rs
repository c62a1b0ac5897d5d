//! 状态变化检测
//!
//! 比较同一健康检查相邻两条事件的状态字符串

use crate::error::StoreError;
use crate::health::result::ProbeEvent;
use serde::Serialize;

/// 一次状态变化
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    /// 健康检查ID
    pub health_check_id: i64,
    /// 变化前的状态
    pub previous_status: String,
    /// 变化后的状态
    pub current_status: String,
}

impl Transition {
    /// 通知消息文本
    pub fn message(&self) -> String {
        format!(
            "health status changed, was {} and is {}",
            self.previous_status, self.current_status
        )
    }
}

/// 状态变化检测器
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionDetector;

impl TransitionDetector {
    pub fn new() -> Self {
        Self
    }

    /// 判断新事件相对上一条事件是否构成需要通知的状态变化
    ///
    /// # 参数
    /// * `previous` - 追加新事件之前读取的最近事件
    /// * `current` - 新追加的事件
    ///
    /// # 返回
    /// * `Option<Transition>` - 状态字符串不同时返回变化；首次探测、读取失败或状态相同时返回 `None`
    pub fn detect(
        &self,
        previous: &Result<ProbeEvent, StoreError>,
        current: &ProbeEvent,
    ) -> Option<Transition> {
        match previous {
            Ok(previous) if previous.status != current.status => Some(Transition {
                health_check_id: current.health_check_id,
                previous_status: previous.status.clone(),
                current_status: current.status.clone(),
            }),
            Ok(_) => None,
            Err(StoreError::NotFound) => None,
            Err(e) => {
                tracing::error!(
                    health_check_id = current.health_check_id,
                    error = %e,
                    "读取上一条探测事件失败，跳过状态比较"
                );
                None
            }
        }
    }
}

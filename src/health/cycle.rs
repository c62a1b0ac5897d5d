//! 单次探测周期
//!
//! 每次定时器触发执行一轮：探测、读取上一条事件、追加新事件、检测状态变化、发送通知。
//! 周期内的任何失败都只记录日志，不影响调度循环。

use crate::health::definition::ProbeTarget;
use crate::health::detector::TransitionDetector;
use crate::health::executor::ProbeExecutor;
use crate::health::result::{NewProbeEvent, ProbeEvent, ProbeOutcome};
use crate::notification::NotificationSender;
use crate::store::EventStore;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// 探测周期，被同一引擎下的所有调度循环共享
pub struct ProbeCycle {
    /// 探测执行器
    executor: Arc<dyn ProbeExecutor>,
    /// 事件存储
    events: Arc<dyn EventStore>,
    /// 状态变化检测器
    detector: TransitionDetector,
    /// 通知发送器
    notifier: Arc<dyn NotificationSender>,
}

impl ProbeCycle {
    pub fn new(
        executor: Arc<dyn ProbeExecutor>,
        events: Arc<dyn EventStore>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            executor,
            events,
            detector: TransitionDetector::new(),
            notifier,
        }
    }

    /// 执行一轮探测
    ///
    /// # 返回
    /// * `Option<ProbeEvent>` - 成功追加的事件；追加失败时为 `None`
    pub async fn run(&self, target: &ProbeTarget) -> Option<ProbeEvent> {
        let outcome = self.probe(target).await;
        self.record(target, outcome).await
    }

    /// 只发起探测请求，不读写存储
    pub async fn probe(&self, target: &ProbeTarget) -> ProbeOutcome {
        self.executor.execute(target).await
    }

    /// 保存探测结果并在状态变化时发送通知
    ///
    /// 读取上一条事件到追加新事件之间不能与同一健康检查的其他记录交错，
    /// 否则两轮会读到同一条旧事件，同一次变化会被通知两次。调用方负责串行化。
    pub async fn record(&self, target: &ProbeTarget, outcome: ProbeOutcome) -> Option<ProbeEvent> {
        let id = target.health_check_id;
        let status = outcome.status();

        if outcome.is_failure() {
            warn!(health_check_id = id, status = %status, "健康检查请求失败");
        } else {
            debug!(
                health_check_id = id,
                status = %status,
                elapsed_ms = outcome.elapsed().as_millis() as u64,
                "健康检查完成"
            );
        }

        // 在追加之前读取，得到的就是新事件的上一条
        let previous = self.events.most_recent_event(id).await;

        let event = match self.events.append_event(NewProbeEvent::now(id, status)).await {
            Ok(event) => event,
            Err(e) => {
                // 新事件没有落库，下一轮仍会和同一条旧事件比较，此时通知会重复
                error!(health_check_id = id, error = %e, "保存探测事件失败");
                return None;
            }
        };

        if let Some(transition) = self.detector.detect(&previous, &event) {
            if let Err(e) = self.notifier.send_transition(&transition).await {
                error!(health_check_id = id, error = %e, "发送状态变化通知失败");
            }
        }

        Some(event)
    }
}

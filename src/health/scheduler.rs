//! 任务调度器模块
//!
//! 每个已启动的健康检查对应一个独立的调度循环。循环按固定间隔触发探测周期，
//! 收到取消信号后退出整个循环，并等待已经开始的探测完成。

use crate::error::{EngineError, StoreError};
use crate::health::cycle::ProbeCycle;
use crate::health::definition::ProbeTarget;
use crate::health::executor::ProbeExecutor;
use crate::health::registry::{ProbeRegistry, ScheduleHandle};
use crate::notification::NotificationSender;
use crate::store::{DefinitionStore, EventStore};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinSet;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info, warn};

/// 调度器trait，定义对外的启停接口
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// 启动健康检查
    ///
    /// # 参数
    /// * `id` - 健康检查ID
    ///
    /// # 返回
    /// * `Result<(), EngineError>` - 失败时不会留下任何注册项或任务
    async fn start(&self, id: i64) -> Result<(), EngineError>;

    /// 停止健康检查，返回时该调度的所有探测都已结束
    ///
    /// # 参数
    /// * `id` - 健康检查ID
    ///
    /// # 返回
    /// * `Result<(), EngineError>` - `NotFound` 或 `NotRunning`
    async fn stop(&self, id: i64) -> Result<(), EngineError>;

    /// 健康检查是否在运行
    async fn is_running(&self, id: i64) -> bool;

    /// 运行中的健康检查ID，升序
    async fn running_ids(&self) -> Vec<i64>;

    /// 停止全部调度
    async fn shutdown(&self);
}

/// 健康检查调度引擎
pub struct HealthCheckEngine {
    /// 定义存储
    definitions: Arc<dyn DefinitionStore>,
    /// 探测周期
    cycle: Arc<ProbeCycle>,
    /// 调度注册表
    registry: Arc<ProbeRegistry>,
}

impl HealthCheckEngine {
    /// 创建新的调度引擎
    ///
    /// # 参数
    /// * `definitions` - 定义存储
    /// * `events` - 事件存储
    /// * `executor` - 探测执行器
    /// * `notifier` - 通知发送器
    /// * `registry` - 调度注册表，由调用方持有所有权
    pub fn new(
        definitions: Arc<dyn DefinitionStore>,
        events: Arc<dyn EventStore>,
        executor: Arc<dyn ProbeExecutor>,
        notifier: Arc<dyn NotificationSender>,
        registry: Arc<ProbeRegistry>,
    ) -> Self {
        Self {
            definitions,
            cycle: Arc::new(ProbeCycle::new(executor, events, notifier)),
            registry,
        }
    }
}

#[async_trait]
impl Scheduler for HealthCheckEngine {
    async fn start(&self, id: i64) -> Result<(), EngineError> {
        let definition = self
            .definitions
            .get_definition(id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => EngineError::NotFound(id),
                other => EngineError::Store(other),
            })?;

        let target = Arc::new(ProbeTarget::from_definition(&definition)?);
        let interval = target.interval;
        let cycle = Arc::clone(&self.cycle);

        self.registry
            .register_with(id, move || {
                ScheduleHandle::spawn(move |cancelled| run_schedule(target, cycle, cancelled))
            })
            .await?;

        info!(
            health_check_id = id,
            interval_secs = interval.as_secs(),
            url = %definition.url,
            "启动健康检查"
        );
        Ok(())
    }

    async fn stop(&self, id: i64) -> Result<(), EngineError> {
        if let Some(handle) = self.registry.remove(id).await {
            handle.cancel();
            handle.join().await;
            info!(health_check_id = id, "停止健康检查");
            return Ok(());
        }

        match self.definitions.get_definition(id).await {
            Err(StoreError::NotFound) => Err(EngineError::NotFound(id)),
            Ok(_) => Err(EngineError::NotRunning(id)),
            Err(e) => {
                warn!(health_check_id = id, error = %e, "读取健康检查失败");
                Err(EngineError::NotRunning(id))
            }
        }
    }

    async fn is_running(&self, id: i64) -> bool {
        self.registry.lookup(id).await.is_some()
    }

    async fn running_ids(&self) -> Vec<i64> {
        self.registry.ids().await
    }

    async fn shutdown(&self) {
        let schedules = self.registry.drain().await;
        if schedules.is_empty() {
            return;
        }

        info!("停止全部健康检查，数量: {}", schedules.len());
        for (_, handle) in &schedules {
            handle.cancel();
        }
        futures::future::join_all(schedules.into_iter().map(|(_, handle)| handle.join())).await;
    }
}

/// 单个健康检查的调度循环
///
/// 首次探测在启动一个完整间隔之后。每次触发的探测周期作为独立任务运行，
/// 耗时超过间隔的探测不会推迟或跳过下一次触发，同一健康检查的探测可能重叠。
/// 探测结果的保存和状态比较按获得锁的顺序逐个执行。
async fn run_schedule(
    target: Arc<ProbeTarget>,
    cycle: Arc<ProbeCycle>,
    mut cancelled: watch::Receiver<bool>,
) {
    let id = target.health_check_id;
    let mut ticker = interval_at(Instant::now() + target.interval, target.interval);
    let mut in_flight = JoinSet::new();
    // 探测可以重叠，记录必须逐轮进行
    let record_lock = Arc::new(Mutex::new(()));

    loop {
        tokio::select! {
            biased;

            // 发送端被丢弃同样视为取消，否则 changed() 会立即返回导致空转
            _ = cancelled.changed() => break,

            _ = ticker.tick() => {
                debug!(health_check_id = id, "检查API健康状态");
                let target = Arc::clone(&target);
                let cycle = Arc::clone(&cycle);
                let record_lock = Arc::clone(&record_lock);
                in_flight.spawn(async move {
                    let outcome = cycle.probe(&target).await;
                    let _guard = record_lock.lock().await;
                    cycle.record(&target, outcome).await;
                });
            }

            Some(result) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = result {
                    error!(health_check_id = id, "探测任务异常结束: {}", e);
                }
            }
        }
    }

    debug!(
        health_check_id = id,
        in_flight = in_flight.len(),
        "调度循环已退出，等待进行中的探测完成"
    );
    while let Some(result) = in_flight.join_next().await {
        if let Err(e) = result {
            error!(health_check_id = id, "探测任务异常结束: {}", e);
        }
    }
}

//! 调度注册表
//!
//! 记录当前正在运行的调度循环，是"某个健康检查是否在运行"的唯一依据。
//! 所有操作都在同一把互斥锁下完成。

use crate::error::EngineError;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// 取消令牌，可克隆，任意一份调用 [`CancelToken::cancel`] 即通知调度循环退出
#[derive(Debug, Clone)]
pub struct CancelToken {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    /// 创建令牌和对应的接收端
    pub fn channel() -> (Self, watch::Receiver<bool>) {
        let (sender, receiver) = watch::channel(false);
        (
            Self {
                sender: Arc::new(sender),
            },
            receiver,
        )
    }

    /// 发出取消信号
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

/// 一个运行中的调度：取消令牌加任务句柄
#[derive(Debug)]
pub struct ScheduleHandle {
    token: CancelToken,
    task: JoinHandle<()>,
}

impl ScheduleHandle {
    /// 启动调度任务
    ///
    /// # 参数
    /// * `run` - 接收取消信号并返回调度循环 future 的函数
    pub fn spawn<F, Fut>(run: F) -> Self
    where
        F: FnOnce(watch::Receiver<bool>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (token, receiver) = CancelToken::channel();
        let task = tokio::spawn(run(receiver));
        Self { token, task }
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// 发出取消信号，不等待任务结束
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// 等待调度任务完全结束
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            tracing::error!("调度任务异常结束: {}", e);
        }
    }
}

/// 调度注册表
#[derive(Debug, Default)]
pub struct ProbeRegistry {
    schedules: Mutex<HashMap<i64, ScheduleHandle>>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册调度，已存在时返回 `AlreadyRunning`，绝不覆盖
    ///
    /// 被拒绝的句柄会被取消，并在释放锁之后等待其任务结束。
    pub async fn register(&self, id: i64, handle: ScheduleHandle) -> Result<(), EngineError> {
        let rejected = match self.schedules.lock().await.entry(id) {
            Entry::Occupied(_) => handle,
            Entry::Vacant(slot) => {
                slot.insert(handle);
                return Ok(());
            }
        };

        rejected.cancel();
        rejected.join().await;
        Err(EngineError::AlreadyRunning(id))
    }

    /// 仅当 `id` 未注册时调用 `launch` 并注册其返回的句柄
    ///
    /// `launch` 在锁内执行，保证注册失败时不会启动任何任务。
    pub async fn register_with<F>(&self, id: i64, launch: F) -> Result<(), EngineError>
    where
        F: FnOnce() -> ScheduleHandle,
    {
        match self.schedules.lock().await.entry(id) {
            Entry::Occupied(_) => Err(EngineError::AlreadyRunning(id)),
            Entry::Vacant(slot) => {
                slot.insert(launch());
                Ok(())
            }
        }
    }

    /// 查询运行中调度的取消令牌
    pub async fn lookup(&self, id: i64) -> Option<CancelToken> {
        self.schedules.lock().await.get(&id).map(ScheduleHandle::token)
    }

    /// 移除调度并返回其句柄，不存在时为空操作
    pub async fn remove(&self, id: i64) -> Option<ScheduleHandle> {
        self.schedules.lock().await.remove(&id)
    }

    /// 当前运行中的健康检查ID，升序
    pub async fn ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.schedules.lock().await.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub async fn len(&self) -> usize {
        self.schedules.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// 取出全部调度
    pub async fn drain(&self) -> Vec<(i64, ScheduleHandle)> {
        self.schedules.lock().await.drain().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// 一直等到被取消的调度
    fn idle_schedule() -> ScheduleHandle {
        ScheduleHandle::spawn(|mut cancelled| async move {
            let _ = cancelled.changed().await;
        })
    }

    #[tokio::test]
    async fn test_register_and_lookup() {
        let registry = ProbeRegistry::new();
        registry.register(1, idle_schedule()).await.unwrap();

        let token = registry.lookup(1).await.unwrap();
        assert!(!token.is_cancelled());
        assert!(registry.lookup(2).await.is_none());
        assert_eq!(registry.ids().await, vec![1]);
    }

    #[tokio::test]
    async fn test_register_twice_keeps_original() {
        let registry = ProbeRegistry::new();
        registry.register(1, idle_schedule()).await.unwrap();
        let original = registry.lookup(1).await.unwrap();

        let second = idle_schedule();
        let second_token = second.token();
        let result = registry.register(1, second).await;

        assert!(matches!(result, Err(EngineError::AlreadyRunning(1))));
        assert!(second_token.is_cancelled());
        assert!(!original.is_cancelled());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_rejected_schedule_has_exited_when_register_returns() {
        let registry = ProbeRegistry::new();
        registry.register(2, idle_schedule()).await.unwrap();

        let exited = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&exited);
        let rejected = ScheduleHandle::spawn(move |mut cancelled| async move {
            let _ = cancelled.changed().await;
            tokio::task::yield_now().await;
            flag.store(true, Ordering::SeqCst);
        });

        let result = registry.register(2, rejected).await;

        assert!(matches!(result, Err(EngineError::AlreadyRunning(2))));
        assert!(exited.load(Ordering::SeqCst));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_register_with_skips_launch_when_occupied() {
        let registry = ProbeRegistry::new();
        registry.register(3, idle_schedule()).await.unwrap();

        let mut launched = false;
        let result = registry
            .register_with(3, || {
                launched = true;
                idle_schedule()
            })
            .await;

        assert!(result.is_err());
        assert!(!launched);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let registry = ProbeRegistry::new();
        registry.register(5, idle_schedule()).await.unwrap();

        let handle = registry.remove(5).await.unwrap();
        handle.cancel();
        handle.join().await;

        assert!(registry.remove(5).await.is_none());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_drain() {
        let registry = ProbeRegistry::new();
        registry.register(1, idle_schedule()).await.unwrap();
        registry.register(2, idle_schedule()).await.unwrap();

        let drained = registry.drain().await;
        assert_eq!(drained.len(), 2);
        assert!(registry.is_empty().await);

        for (_, handle) in drained {
            handle.cancel();
            handle.join().await;
        }
    }
}

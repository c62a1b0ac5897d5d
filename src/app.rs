//! 应用程序组装
//!
//! 根据配置创建存储、探测执行器、通知发送器和调度引擎，并运行 REST 服务。

use crate::config::Config;
use crate::error::Result;
use crate::health::{HealthCheckEngine, HttpProbeExecutor, ProbeRegistry, Scheduler};
use crate::notification::{NoOpSender, NotificationSender, WebhookSender};
use crate::store::MemoryStore;
use crate::web::{self, AppState};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// 组装好的应用程序
pub struct App {
    store: Arc<MemoryStore>,
    engine: Arc<HealthCheckEngine>,
}

impl App {
    /// 根据配置创建应用程序
    pub fn build(config: &Config) -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let executor = Arc::new(HttpProbeExecutor::new(config.probe.request_timeout())?);

        let notifier: Arc<dyn NotificationSender> = match WebhookSender::from_config(&config.webhook)? {
            Some(sender) => {
                info!(
                    url = config.webhook.effective_url().unwrap_or_default(),
                    field = %config.webhook.message_field_name,
                    "已启用状态变化webhook通知"
                );
                Arc::new(sender)
            }
            None => {
                info!("未配置webhook URL，状态变化只记录日志");
                Arc::new(NoOpSender)
            }
        };

        let engine = Arc::new(HealthCheckEngine::new(
            store.clone(),
            store.clone(),
            executor,
            notifier,
            Arc::new(ProbeRegistry::new()),
        ));

        Ok(Self { store, engine })
    }

    pub fn engine(&self) -> Arc<HealthCheckEngine> {
        Arc::clone(&self.engine)
    }

    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.store)
    }

    /// 构建路由
    pub fn router(&self) -> Router {
        web::build_router(AppState::new(
            self.store.clone(),
            self.store.clone(),
            self.engine.clone(),
        ))
    }

    /// 运行 REST 服务直到 `shutdown` 完成，随后停止全部调度
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        let served = web::serve(listener, router, shutdown).await;

        self.engine.shutdown().await;
        info!("全部健康检查已停止");

        served.map_err(Into::into)
    }
}

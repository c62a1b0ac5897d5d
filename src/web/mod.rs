//! Web API 模块
//!
//! 提供健康检查管理的 REST 接口

pub mod error;
pub mod handlers;
pub mod server;

use crate::health::Scheduler;
use crate::store::{DefinitionStore, EventStore};
use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use handlers::{CreateHealthCheckRequest, HealthCheckView, ScheduleStatus};
pub use server::{serve, shutdown_signal};

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub definitions: Arc<dyn DefinitionStore>,
    pub events: Arc<dyn EventStore>,
    pub scheduler: Arc<dyn Scheduler>,
}

impl AppState {
    pub fn new(
        definitions: Arc<dyn DefinitionStore>,
        events: Arc<dyn EventStore>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            definitions,
            events,
            scheduler,
        }
    }
}

/// 构建路由
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/healthchecks",
            get(handlers::list_health_checks).post(handlers::create_health_check),
        )
        .route("/healthchecks/{id}", delete(handlers::delete_health_check))
        .route("/healthchecks/{id}/start", get(handlers::start_health_check))
        .route("/healthchecks/{id}/stop", get(handlers::stop_health_check))
        .route("/healthchecks/{id}/events", get(handlers::list_events))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

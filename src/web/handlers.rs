//! Web 路由处理函数
//!
//! 健康检查定义的增删查，以及调度的启动和停止

use super::error::ApiError;
use super::AppState;
use crate::error::EngineError;
use crate::health::{HealthCheckDefinition, NewHealthCheck, ProbeEvent};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 创建健康检查的请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHealthCheckRequest {
    pub interval_seconds: i64,
    pub url: String,
    #[serde(default = "default_http_method")]
    pub http_method: String,
    /// 任意JSON，原样保存，启动时再校验
    #[serde(default)]
    pub headers: serde_json::Value,
    #[serde(default)]
    pub body: String,
}

fn default_http_method() -> String {
    "GET".to_string()
}

impl From<CreateHealthCheckRequest> for NewHealthCheck {
    fn from(request: CreateHealthCheckRequest) -> Self {
        let headers_json = match request.headers {
            serde_json::Value::Null => String::new(),
            headers => headers.to_string(),
        };
        NewHealthCheck {
            interval_seconds: request.interval_seconds,
            url: request.url,
            http_method: request.http_method,
            headers_json,
            body: request.body,
        }
    }
}

/// 带运行状态的健康检查
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckView {
    #[serde(flatten)]
    pub definition: HealthCheckDefinition,
    pub running: bool,
}

/// 启停操作的响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleStatus {
    pub id: i64,
    pub running: bool,
}

/// 列出全部健康检查
pub async fn list_health_checks(
    State(state): State<AppState>,
) -> Result<Json<Vec<HealthCheckView>>, ApiError> {
    let definitions = state.definitions.list_definitions().await?;
    let running = state.scheduler.running_ids().await;

    let views = definitions
        .into_iter()
        .map(|definition| HealthCheckView {
            running: running.binary_search(&definition.id).is_ok(),
            definition,
        })
        .collect();
    Ok(Json(views))
}

/// 创建健康检查，不会自动启动
pub async fn create_health_check(
    State(state): State<AppState>,
    payload: Result<Json<CreateHealthCheckRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let definition = state.definitions.create_definition(request.into()).await?;

    info!(
        health_check_id = definition.id,
        url = %definition.url,
        "创建健康检查"
    );
    Ok((StatusCode::CREATED, Json(definition)))
}

/// 启动健康检查
pub async fn start_health_check(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ScheduleStatus>, ApiError> {
    state.scheduler.start(id).await?;
    Ok(Json(ScheduleStatus { id, running: true }))
}

/// 停止健康检查
pub async fn stop_health_check(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ScheduleStatus>, ApiError> {
    state.scheduler.stop(id).await?;
    Ok(Json(ScheduleStatus { id, running: false }))
}

/// 列出某个健康检查的探测事件
pub async fn list_events(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ProbeEvent>>, ApiError> {
    state.definitions.get_definition(id).await?;
    let events = state.events.list_events(id).await?;
    Ok(Json(events))
}

/// 删除健康检查，运行中的调度先停止
pub async fn delete_health_check(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    match state.scheduler.stop(id).await {
        Ok(()) | Err(EngineError::NotRunning(_)) => {}
        Err(e) => return Err(e.into()),
    }

    state.definitions.delete_definition(id).await?;
    info!(health_check_id = id, "删除健康检查");
    Ok(StatusCode::NO_CONTENT)
}

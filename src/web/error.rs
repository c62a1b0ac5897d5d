//! API 错误响应
//!
//! 把引擎和存储错误映射为 HTTP 状态码，响应体统一为 `{ "error": "<message>" }`。

use crate::error::{EngineError, StoreError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::error;

/// 处理函数返回的错误
#[derive(Debug)]
pub enum ApiError {
    Engine(EngineError),
    Store(StoreError),
    BadRequest(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Engine(EngineError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Engine(EngineError::AlreadyRunning(_))
            | ApiError::Engine(EngineError::NotRunning(_)) => StatusCode::CONFLICT,
            ApiError::Engine(EngineError::Validation(_)) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Engine(EngineError::Store(StoreError::NotFound))
            | ApiError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Engine(EngineError::Store(_)) | ApiError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Engine(e) => e.to_string(),
            ApiError::Store(e) => e.to_string(),
            ApiError::BadRequest(message) => message.clone(),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        ApiError::Engine(error)
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        ApiError::Store(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();
        if status.is_server_error() {
            error!(status = status.as_u16(), "请求处理失败: {}", message);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(EngineError::NotFound(1)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(EngineError::AlreadyRunning(1)).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(EngineError::NotRunning(1)).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(EngineError::Validation("bad".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StoreError::Backend("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(StoreError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_error_body() {
        let response = ApiError::from(EngineError::AlreadyRunning(7)).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "健康检查 7 已在运行");
    }
}

//! REST 接口测试
//!
//! 通过 tower::ServiceExt::oneshot 直接驱动路由，不监听端口

use api_vitals::config::Config;
use api_vitals::{App, Scheduler};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> App {
    let mut config = Config::default();
    config.webhook.url = None;
    App::build(&config).unwrap()
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&body).unwrap())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(router: &Router, headers: Value) -> i64 {
    let (status, body) = send(
        router,
        "POST",
        "/healthchecks",
        Some(json!({
            "intervalSeconds": 3600,
            "url": "http://127.0.0.1:9/health",
            "httpMethod": "GET",
            "headers": headers,
            "body": ""
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_list_empty() {
    let app = test_app();
    let router = app.router();

    let (status, body) = send(&router, "GET", "/healthchecks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_and_list() {
    let app = test_app();
    let router = app.router();

    let id = create(&router, json!({"Accept": "application/json"})).await;

    let (status, body) = send(&router, "GET", "/healthchecks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], id);
    assert_eq!(body[0]["intervalSeconds"], 3600);
    assert_eq!(body[0]["headers"], r#"{"Accept":"application/json"}"#);
    assert_eq!(body[0]["running"], false);
}

#[tokio::test]
async fn test_create_rejects_malformed_body() {
    let app = test_app();
    let router = app.router();

    let (status, body) = send(
        &router,
        "POST",
        "/healthchecks",
        Some(json!({"url": "http://example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_start_stop_lifecycle() {
    let app = test_app();
    let router = app.router();
    let id = create(&router, json!({})).await;

    let (status, body) = send(&router, "GET", &format!("/healthchecks/{id}/start"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": id, "running": true}));

    let (status, body) = send(&router, "GET", &format!("/healthchecks/{id}/start"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains(&id.to_string()));

    let (_, body) = send(&router, "GET", "/healthchecks", None).await;
    assert_eq!(body[0]["running"], true);

    let (status, body) = send(&router, "GET", &format!("/healthchecks/{id}/stop"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": id, "running": false}));

    let (status, _) = send(&router, "GET", &format!("/healthchecks/{id}/stop"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let app = test_app();
    let router = app.router();

    for uri in [
        "/healthchecks/99/start",
        "/healthchecks/99/stop",
        "/healthchecks/99/events",
    ] {
        let (status, body) = send(&router, "GET", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body["error"].is_string());
    }

    let (status, _) = send(&router, "DELETE", "/healthchecks/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_start_with_malformed_headers() {
    let app = test_app();
    let router = app.router();
    let id = create(&router, json!(["Authorization: Bearer x"])).await;

    let (status, body) = send(&router, "GET", &format!("/healthchecks/{id}/start"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, body) = send(&router, "GET", "/healthchecks", None).await;
    assert_eq!(body[0]["running"], false);
}

#[tokio::test]
async fn test_delete_stops_running_schedule() {
    let app = test_app();
    let router = app.router();
    let id = create(&router, json!({})).await;

    let (status, _) = send(&router, "GET", &format!("/healthchecks/{id}/start"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, "DELETE", &format!("/healthchecks/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    assert!(!app.engine().is_running(id).await);

    let (_, body) = send(&router, "GET", "/healthchecks", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_events_empty_for_new_definition() {
    let app = test_app();
    let router = app.router();
    let id = create(&router, json!({})).await;

    let (status, body) = send(&router, "GET", &format!("/healthchecks/{id}/events"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

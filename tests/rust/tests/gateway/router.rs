//! HTTP status API tests

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use svcprobe_core::{DescriptorStore, DisabledMarkers, SecretResolver};
use svcprobe_gateway::server::{build_router, DASHBOARD_PATH};
use svcprobe_gateway::StatusService;
use tests::{descriptor_for, mount_health, mount_token, test_registry, write_services_file};
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn router(services_file: PathBuf, markers: DisabledMarkers) -> Router {
    let service = StatusService::new(
        Arc::new(DescriptorStore::new(services_file)),
        markers,
        Arc::new(test_registry(SecretResolver::new())),
    );
    build_router(Arc::new(service))
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(router, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

// =============================================================================
// /health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let router = router(PathBuf::from("unused.json"), DisabledMarkers::none());

    let (status, body) = get_json(&router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

// =============================================================================
// Dashboard
// =============================================================================

#[tokio::test]
async fn test_root_redirects_to_dashboard() {
    let router = router(PathBuf::from("unused.json"), DisabledMarkers::none());

    let response = router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(response.headers()["location"], DASHBOARD_PATH);
}

#[tokio::test]
async fn test_dashboard_page() {
    let router = router(PathBuf::from("unused.json"), DisabledMarkers::none());

    let (status, body) = get(&router, DASHBOARD_PATH).await;
    let page = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("fetch('/all')"));
    assert!(page.contains("fetch('/reload')"));
}

// =============================================================================
// /status/{name}
// =============================================================================

#[tokio::test]
async fn test_status_ok() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 3600).await;
    mount_health(&server, "tok-1", 200, "ok").await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_services_file(dir.path(), &[descriptor_for(&server, "orders")]);
    let router = router(file, DisabledMarkers::none());

    let (status, body) = get_json(&router, "/status/orders").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"serviceName": "orders", "serviceStatus": "ok", "statusMessage": "ok"})
    );
}

#[tokio::test]
async fn test_status_http_error_is_500() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 3600).await;
    mount_health(&server, "tok-1", 403, "forbidden").await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_services_file(dir.path(), &[descriptor_for(&server, "orders")]);
    let router = router(file, DisabledMarkers::none());

    let (status, body) = get_json(&router, "/status/orders").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"serviceName": "orders", "serviceStatus": "error-403", "statusMessage": "forbidden"})
    );
}

#[tokio::test]
async fn test_status_disabled_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let marker_dir = tempfile::tempdir().unwrap();
    std::fs::write(marker_dir.path().join("orders"), "").unwrap();

    let file = write_services_file(dir.path(), &[]);
    let router = router(file, DisabledMarkers::new(Some(marker_dir.path().to_path_buf())));

    let (status, body) = get_json(&router, "/status/orders").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["serviceStatus"], "disabled");
    assert_eq!(body["statusMessage"], "Disabled by status file");
}

#[tokio::test]
async fn test_status_unknown_service_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_services_file(dir.path(), &[]);
    let router = router(file, DisabledMarkers::none());

    let (status, body) = get_json(&router, "/status/shipping").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"errorMessage": "ServiceNotFound: Service 'shipping' not found"})
    );
}

#[tokio::test]
async fn test_status_token_error_is_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid_client"}"#))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_services_file(dir.path(), &[descriptor_for(&server, "orders")]);
    let router = router(file, DisabledMarkers::none());

    let (status, body) = get_json(&router, "/status/orders").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"errorMessage": "TokenError: invalid_client"}));
}

// =============================================================================
// /all and /reload
// =============================================================================

#[tokio::test]
async fn test_all_lists_sorted_statuses() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 3600).await;
    mount_health(&server, "tok-1", 200, "ok").await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_services_file(
        dir.path(),
        &[descriptor_for(&server, "orders"), descriptor_for(&server, "billing")],
    );
    let router = router(file, DisabledMarkers::none());

    let (status, body) = get_json(&router, "/all").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["serviceName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["billing", "orders"]);
}

#[tokio::test]
async fn test_all_without_services_file() {
    let router = router(PathBuf::from("missing/services.json"), DisabledMarkers::none());

    let (status, body) = get_json(&router, "/all").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"errorMessage": "HealthCheckError: Services file 'missing/services.json' not found"})
    );
}

#[tokio::test]
async fn test_reload_picks_up_new_services() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 3600).await;
    mount_health(&server, "tok-1", 200, "ok").await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_services_file(dir.path(), &[descriptor_for(&server, "orders")]);
    let router = router(file, DisabledMarkers::none());

    let (status, _) = get(&router, "/status/billing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    write_services_file(
        dir.path(),
        &[descriptor_for(&server, "orders"), descriptor_for(&server, "billing")],
    );

    let (status, body) = get(&router, "/reload").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");

    let (status, _) = get(&router, "/status/billing").await;
    assert_eq!(status, StatusCode::OK);
}

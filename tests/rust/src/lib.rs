//! Shared test utilities and fixtures for svcprobe integration tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;
use svcprobe_core::{SecretResolver, ServiceDescriptor};
use svcprobe_gateway::{ConnectionRegistry, HttpSettings, ServiceConnection};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/oauth/token";
pub const HEALTH_PATH: &str = "/health";
pub const CLIENT_ID: &str = "status-client";
pub const CLIENT_SECRET: &str = "s3cret";

/// Generous timeouts so slow CI hosts don't turn into `error-connect`.
pub fn test_http_settings() -> HttpSettings {
    HttpSettings::from_millis(2_000, 5_000)
}

pub fn test_http_client() -> reqwest::Client {
    test_http_settings()
        .build_client()
        .expect("test HTTP client")
}

/// Token endpoint response body.
pub fn token_json(access_token: &str, expires_in: i64) -> serde_json::Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": expires_in,
    })
}

/// Descriptor whose token endpoint and health endpoint both live on `server`.
pub fn descriptor_for(server: &MockServer, name: &str) -> ServiceDescriptor {
    ServiceDescriptor::new(
        name,
        "http",
        "127.0.0.1",
        server.address().port().to_string(),
        HEALTH_PATH.trim_start_matches('/'),
    )
    .with_token_endpoint(format!("{}{}", server.uri(), TOKEN_PATH), CLIENT_ID, CLIENT_SECRET)
}

pub fn connection_for(server: &MockServer, name: &str) -> ServiceConnection {
    ServiceConnection::new(
        descriptor_for(server, name),
        Arc::new(SecretResolver::new()),
        test_http_client(),
    )
}

pub fn test_registry(secrets: SecretResolver) -> ConnectionRegistry {
    ConnectionRegistry::new(Arc::new(secrets), test_http_client())
}

/// Token endpoint that always issues `access_token`.
pub async fn mount_token(server: &MockServer, access_token: &str, expires_in: i64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json(access_token, expires_in)))
        .mount(server)
        .await;
}

/// Health endpoint answering `status`/`body` to requests carrying `access_token`.
pub async fn mount_health(server: &MockServer, access_token: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(HEALTH_PATH))
        .and(header("Authorization", format!("Bearer {}", access_token).as_str()))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Number of requests `server` received for `request_path`.
pub async fn request_count(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == request_path)
        .count()
}

/// A local port with nothing listening on it.
pub fn unused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}

/// Write `descriptors` as a services file in `dir`.
pub fn write_services_file(dir: &Path, descriptors: &[ServiceDescriptor]) -> PathBuf {
    let file = dir.join("services.json");
    let content = serde_json::to_string_pretty(descriptors).expect("serialize descriptors");
    std::fs::write(&file, content).expect("write services file");
    file
}

//! Concurrent checks against one connection and across the registry

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use svcprobe_core::{SecretResolver, ServiceStatus};
use tests::{
    descriptor_for, mount_health, request_count, test_registry, token_json, HEALTH_PATH,
    TOKEN_PATH,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_concurrent_checks_share_one_token_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_json("tok-1", 3600))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    mount_health(&server, "tok-1", 200, "ok").await;

    let conn = Arc::new(tests::connection_for(&server, "orders"));

    let checks = (0..8).map(|_| {
        let conn = conn.clone();
        tokio::spawn(async move { conn.check_status().await })
    });
    let results = join_all(checks).await;

    for result in results {
        assert_eq!(result.unwrap().unwrap(), ServiceStatus::ok("orders"));
    }
    assert_eq!(request_count(&server, TOKEN_PATH).await, 1);
    assert_eq!(request_count(&server, HEALTH_PATH).await, 8);
}

#[tokio::test]
async fn test_registry_hands_out_one_connection_under_contention() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_json("tok-1", 3600))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;
    mount_health(&server, "tok-1", 200, "ok").await;

    let source: Arc<HashMap<_, _>> = Arc::new(HashMap::from([(
        "orders".to_string(),
        descriptor_for(&server, "orders"),
    )]));
    let registry = Arc::new(test_registry(SecretResolver::new()));

    let checks = (0..6).map(|_| {
        let registry = registry.clone();
        let source = source.clone();
        tokio::spawn(async move {
            let conn = registry.get_or_create("orders", &*source)?;
            conn.check_status().await
        })
    });
    for result in join_all(checks).await {
        assert!(result.unwrap().unwrap().is_ok());
    }

    assert_eq!(registry.len(), 1);
    assert_eq!(request_count(&server, TOKEN_PATH).await, 1);
}

#[tokio::test]
async fn test_services_do_not_block_each_other() {
    let slow = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_json("slow", 3600))
                .set_delay(Duration::from_millis(1_500)),
        )
        .mount(&slow)
        .await;
    mount_health(&slow, "slow", 200, "ok").await;

    let fast = MockServer::start().await;
    tests::mount_token(&fast, "fast", 3600).await;
    mount_health(&fast, "fast", 200, "ok").await;

    let source: Arc<HashMap<_, _>> = Arc::new(HashMap::from([
        ("slow".to_string(), descriptor_for(&slow, "slow")),
        ("fast".to_string(), descriptor_for(&fast, "fast")),
    ]));
    let registry = Arc::new(test_registry(SecretResolver::new()));

    let slow_check = {
        let registry = registry.clone();
        let source = source.clone();
        tokio::spawn(async move { registry.get_or_create("slow", &*source)?.check_status().await })
    };
    // Let the slow check take its connection lock first
    tokio::time::sleep(Duration::from_millis(100)).await;

    let started = std::time::Instant::now();
    let fast_status = registry
        .get_or_create("fast", &*source)
        .unwrap()
        .check_status()
        .await
        .unwrap();

    assert!(fast_status.is_ok());
    assert!(started.elapsed() < Duration::from_millis(1_000));
    assert!(slow_check.await.unwrap().unwrap().is_ok());
}

//! Runs the load generator against the bundled test server.

use std::sync::Arc;

use http_loadgen::client::{build_client, ClientConfig};
use http_loadgen::config::Config;
use http_loadgen::dispatcher::run_load_test;
use http_loadgen::test_server::{bind_test_server, TestServerState};

async fn start_server() -> (String, Arc<TestServerState>) {
    let state = Arc::new(TestServerState::new());
    let (addr, server) = bind_test_server(([127, 0, 0, 1], 0).into(), Arc::clone(&state))
        .expect("Failed to bind test server");
    tokio::spawn(server);
    (format!("http://{}", addr), state)
}

fn test_client() -> reqwest::Client {
    build_client(&ClientConfig::default()).expect("Failed to create HTTP client")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn root_endpoint_sees_every_request() {
    let (base_url, state) = start_server().await;

    let config = Config::new(format!("{}/", base_url), 25, 4);
    let final_metrics = run_load_test(test_client(), &config).await.unwrap();

    assert_eq!(final_metrics.total_requests, 25);
    assert_eq!(final_metrics.successful_requests(), 25);
    assert_eq!(state.request_count(), 25);

    let body = test_client()
        .get(format!("{}/count", base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "Total requests processed: 25");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn status_endpoint_codes_are_recorded() {
    let (base_url, state) = start_server().await;

    for (suffix, expected) in [("404", 404u16), ("500", 500), ("503", 503), ("999", 200)] {
        let config = Config::new(format!("{}/status/{}", base_url, suffix), 4, 2);
        let final_metrics = run_load_test(test_client(), &config).await.unwrap();

        assert_eq!(final_metrics.count_for(expected), 4, "suffix {}", suffix);
        assert_eq!(final_metrics.status_counts.len(), 1);
    }

    assert_eq!(state.request_count(), 16);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn slow_endpoint_is_spread_across_workers() {
    let (base_url, _state) = start_server().await;

    // 2 sequential requests per worker at ~100ms each.
    let config = Config::new(format!("{}/slow", base_url), 8, 4);
    let final_metrics = run_load_test(test_client(), &config).await.unwrap();

    assert_eq!(final_metrics.successful_requests(), 8);
    assert!(final_metrics.elapsed() >= std::time::Duration::from_millis(200));
}

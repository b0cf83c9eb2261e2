//! Live Server Tests
//!
//! Runs the router on a real socket and talks to it over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bucket_cache::{api::create_router, AppState, CacheEngine, EngineSettings};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct TestServer {
    addr: SocketAddr,
    engine: Arc<CacheEngine>,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start(settings: EngineSettings) -> Self {
        let state = AppState::new(CacheEngine::new(settings), "__root__");
        let engine = state.engine.clone();
        let app = create_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            engine,
            shutdown,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn stop(self) {
        let _ = self.shutdown.send(());
        self.handle.await.unwrap();
        self.engine.stop().await;
    }
}

#[tokio::test]
async fn test_live_server_round_trip() {
    let server = TestServer::start(EngineSettings::default()).await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(server.url("/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");

    let response = client
        .put(server.url("/buckets/users/alice"))
        .json(&json!({ "value": "{\"age\":30}" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = client
        .get(server.url("/buckets/users/alice"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    // Values are opaque strings, returned exactly as stored
    assert_eq!(body["value"], "{\"age\":30}");

    let count: Value = client
        .get(server.url("/buckets/users"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(count["count"], 1);

    let response = client
        .delete(server.url("/buckets"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(server.url("/buckets/users/alice"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    server.stop().await;
}

#[tokio::test]
async fn test_live_server_rejects_oversized_put() {
    let server = TestServer::start(EngineSettings::new(
        Some(4),
        Some(100),
        Duration::from_secs(60),
        Duration::from_secs(3600),
    ))
    .await;
    let client = reqwest::Client::new();

    let response = client
        .put(server.url("/keys/k"))
        .json(&json!({ "value": "12345" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let error: Value = response.json().await.unwrap();
    assert!(error["error"].as_str().unwrap().contains("maximum entry size"));

    server.stop().await;
}

#[tokio::test]
async fn test_live_server_sweeps_in_background() {
    let server = TestServer::start(EngineSettings::new(
        None,
        None,
        Duration::from_millis(100),
        Duration::from_millis(50),
    ))
    .await;
    let client = reqwest::Client::new();

    client
        .put(server.url("/buckets/tmp/k"))
        .json(&json!({ "value": "v" }))
        .send()
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(400)).await;

    let stats: Value = client
        .get(server.url("/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["total_entries"], 0);
    assert_eq!(stats["expirations"], 1);

    server.stop().await;
}

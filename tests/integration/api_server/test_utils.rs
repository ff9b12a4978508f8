//! Test utilities for API server integration tests

use axum_test::TestServer;
use ragboard::core::http::{create_router, AppState, HealthStatus};
use ragboard::metrics::Metrics;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Test helper running the router without a database, the way the server
/// starts when Postgres is unreachable
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
}

impl TestApiServer {
    pub async fn new() -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let state = AppState {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
            database: None,
        };

        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self { server, metrics }
    }
}

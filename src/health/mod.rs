/*!
 * # Health Check Module
 *
 * Probes for process supervisors and load balancers:
 *
 * - Basic health check (`/health`) - status, version and database state
 * - Readiness check (`/health/ready`) - whether the database answers a ping
 * - Liveness check (`/health/live`) - whether the process is serving at all
 */

use crate::db::Database;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Basic health status
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

impl HealthStatus {
    fn status_code(self) -> StatusCode {
        match self {
            HealthStatus::Up => StatusCode::OK,
            HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Overall health information
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub database: HealthStatus,
}

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    db: Database,
    started: Instant,
}

impl HealthState {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            started: Instant::now(),
        }
    }

    pub fn uptime(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    async fn database_status(&self) -> HealthStatus {
        match self.db.ping().await {
            Ok(()) => HealthStatus::Up,
            Err(e) => {
                error!("Database health check failed: {}", e);
                HealthStatus::Down
            }
        }
    }

    pub async fn check(&self) -> HealthInfo {
        let database = self.database_status().await;
        HealthInfo {
            status: database,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            uptime_seconds: self.uptime(),
            database,
        }
    }
}

/// Basic health check endpoint
pub async fn health_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    debug!("Health check endpoint called");

    let health = state.check().await;
    (health.status.status_code(), Json(health))
}

/// Readiness check endpoint
pub async fn readiness_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    debug!("Readiness check endpoint called");

    let status = state.database_status().await;
    (
        status.status_code(),
        Json(json!({
            "ready": status == HealthStatus::Up,
            "timestamp": Utc::now(),
        })),
    )
}

/// Liveness check endpoint
pub async fn liveness_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "alive": true,
            "uptime_seconds": state.uptime(),
            "timestamp": Utc::now(),
        })),
    )
}

/// Health routes, ready to nest under `/health`
pub fn health_routes<S>(db: Database) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
        .with_state(Arc::new(HealthState::new(db)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn healthy_database_reports_up() {
        let state = HealthState::new(Database::open_in_memory().await.unwrap());
        let health = state.check().await;

        assert_eq!(health.status, HealthStatus::Up);
        assert_eq!(health.database, HealthStatus::Up);
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn down_maps_to_service_unavailable() {
        assert_eq!(
            HealthStatus::Down.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(HealthStatus::Up.status_code(), StatusCode::OK);
    }
}

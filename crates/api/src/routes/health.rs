//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseHealth,
}

/// Database health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseHealth {
    /// `postgres`, or `in_memory` when the app runs without a pool.
    pub backend: String,
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

async fn probe_database(state: &AppState) -> DatabaseHealth {
    let Some(pool) = &state.pool else {
        return DatabaseHealth {
            backend: "in_memory".to_string(),
            connected: true,
            latency_ms: None,
        };
    };

    let start = std::time::Instant::now();
    let connected = sqlx::query("SELECT 1").execute(pool).await.is_ok();
    let latency_ms = start.elapsed().as_millis() as u64;
    persistence::metrics::record_pool_metrics(pool);

    DatabaseHealth {
        backend: "postgres".to_string(),
        connected,
        latency_ms: connected.then_some(latency_ms),
    }
}

/// Full health check.
///
/// GET /api/health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let database = probe_database(&state).await;

    if !database.connected {
        tracing::warn!("Health check failed: database unreachable");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    }))
}

/// Liveness probe.
///
/// GET /api/health/live
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe; fails while the database is unreachable.
///
/// GET /api/health/ready
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    if probe_database(&state).await.connected {
        Ok(Json(StatusResponse {
            status: "ready".to_string(),
        }))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.3.0".to_string(),
            database: DatabaseHealth {
                backend: "postgres".to_string(),
                connected: true,
                latency_ms: Some(5),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["database"]["backend"], "postgres");
        assert_eq!(json["database"]["latency_ms"], 5);
    }

    #[tokio::test]
    async fn test_live() {
        assert_eq!(live().await.0.status, "alive");
    }
}

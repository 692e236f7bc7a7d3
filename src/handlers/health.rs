//! Health check handlers

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::{error::AppError, state::AppState};

/// Readiness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /health/live
///
/// Liveness probe: the process is up.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Readiness probe: the session store answers PING.
pub async fn readiness(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let check = async {
        let mut conn = state.redis().get().await?;
        let pong = redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok::<_, AppError>(pong)
    };

    match check.await.map_err(|e| e.to_string()) {
        Ok(_) => Ok(Json(HealthResponse {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
            error: None,
        })),
        Err(error) => {
            tracing::warn!(error = %error, "Session store not ready");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy",
                    version: env!("CARGO_PKG_VERSION"),
                    error: Some(error),
                }),
            ))
        }
    }
}

/// Health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}

//! Availability and health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use dealdesk_core::models::AvailabilityResponse;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; returns status string "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    /// Omitted in production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offers_root: Option<String>,
    pub storage: String,
}

/// Liveness check used by the deal system before it sends work.
#[utoipa::path(
    get,
    path = "/is_available",
    responses(
        (status = 200, description = "Service is available", body = AvailabilityResponse),
        (status = 500, description = "Service is not available", body = AvailabilityResponse)
    ),
    tag = "health"
)]
pub async fn is_available(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match tokio::time::timeout(TIMEOUT, state.store.health_check()).await {
        Ok(Ok(())) => (
            StatusCode::OK,
            Json(AvailabilityResponse {
                available: true,
                error: None,
            }),
        ),
        outcome => {
            let error = match outcome {
                Ok(Err(e)) => e.to_string(),
                _ => "timeout".to_string(),
            };
            tracing::error!(error = %error, "Availability check failed");
            let error = if state.is_production {
                "Storage is not reachable".to_string()
            } else {
                error
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AvailabilityResponse {
                    available: false,
                    error: Some(error),
                }),
            )
        }
    }
}

/// Full health check: both roots must be reachable directories.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.clone();
    let storage = run_check(
        TIMEOUT,
        async move { store.health_check().await },
        "unhealthy",
    )
    .await;

    let healthy = storage == "healthy";
    let root = |path: &std::path::Path| {
        (!state.is_production).then(|| path.display().to_string())
    };
    let response = HealthCheckResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        base_path: root(state.config.base_path()),
        offers_root: root(state.config.offers_root()),
        storage: if healthy || !state.is_production {
            storage
        } else {
            "unhealthy".to_string()
        },
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

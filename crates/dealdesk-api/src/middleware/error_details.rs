use crate::error::ErrorResponse;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Error details middleware
///
/// Error responses are rendered without `details`/`error_type`. Outside
/// production this swaps in the detailed body that `HttpAppError` attached.
pub async fn error_details_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(detailed) = response.extensions_mut().remove::<ErrorResponse>() else {
        return response;
    };
    if state.is_production {
        return response;
    }

    let body = match serde_json::to_vec(&detailed) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize detailed error response");
            return response;
        }
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(body))
}

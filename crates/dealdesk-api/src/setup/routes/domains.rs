//! Domain route groups (company folders, commercial offers).

use crate::handlers;
use crate::state::AppState;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;

pub fn folder_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::folders::create_folder))
        .route("/delete/{company_id}", delete(handlers::folders::delete_folder))
        .route("/archive/{company_id}", put(handlers::folders::archive_folder))
        .route("/activate/{company_id}", put(handlers::folders::activate_folder))
        .route("/folders/{company_id}", get(handlers::folders::get_folder))
        .with_state(state)
}

pub fn offer_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/commercial-offer/upload",
            post(handlers::offers::upload_offer),
        )
        .route(
            "/commercial-offer/create",
            post(handlers::offers::create_offer),
        )
        .route(
            "/commercial-offer/download",
            post(handlers::offers::download_offer),
        )
        .with_state(state)
}

//! OpenAPI documentation, served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::setup::routes::health;
use dealdesk_core::models;

/// Returns the OpenAPI spec served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dealdesk API",
        version = "0.1.0",
        description = "Company deal folders on a shared filesystem: creation, deletion, archive/activate renames and commercial offer placement."
    ),
    paths(
        // Folders
        handlers::folders::create_folder,
        handlers::folders::delete_folder,
        handlers::folders::archive_folder,
        handlers::folders::activate_folder,
        handlers::folders::get_folder,
        // Commercial offers
        handlers::offers::upload_offer,
        handlers::offers::create_offer,
        handlers::offers::download_offer,
        // Health
        health::is_available,
    ),
    components(
        schemas(
            models::CreateFolderRequest,
            models::DealNumberRequest,
            models::FolderInfo,
            models::MessageResponse,
            models::AvailabilityResponse,
            models::DownloadOfferRequest,
            models::OfferResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "folders", description = "Company folder lifecycle"),
        (name = "commercial-offer", description = "Commercial offer placement and download"),
        (name = "health", description = "Service availability")
    )
)]
pub struct ApiDoc;

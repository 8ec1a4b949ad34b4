use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, Response, StatusCode},
    response::{IntoResponse, Json},
};
use futures::StreamExt;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::Path;
use std::sync::Arc;

use crate::constants::{OFFER_CREATED, OFFER_UPLOADED};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::upload::extract_offer_form;
use dealdesk_core::models::{DownloadOfferRequest, OfferResponse};
use dealdesk_core::AppError;

/// Characters left as-is in an RFC 5987 `filename*` value.
const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// `Content-Disposition` value carrying an ASCII fallback and the UTF-8 name.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        utf8_percent_encode(file_name, FILENAME_ENCODE_SET)
    )
}

/// Place a commercial offer into the company folder
///
/// Accepts either the document itself as a `file` part or a `file_path`
/// field naming a file already present in a staging directory.
#[utoipa::path(
    post,
    path = "/commercial-offer/upload",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "company_id plus a file part or a file_path field"),
    responses(
        (status = 200, description = "Offer placed in the company folder", body = OfferResponse),
        (status = 400, description = "Invalid form", body = ErrorResponse),
        (status = 403, description = "file_path outside the allowed directories", body = ErrorResponse),
        (status = 404, description = "Folder or source file not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "commercial-offer"
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_offer"))]
pub async fn upload_offer(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut form = extract_offer_form(multipart, state.config.max_upload_size_bytes()).await?;
    let company_id = form.required_field("company_id")?.to_string();

    let path = match (form.file.take(), form.field("file_path")) {
        (Some(_), Some(_)) => {
            return Err(AppError::InvalidInput(
                "Send either a 'file' part or a 'file_path' field, not both".to_string(),
            )
            .into());
        }
        (Some(file), None) => {
            tracing::info!(
                company_id = %company_id,
                file_name = %file.file_name,
                content_type = %file.content_type,
                size_bytes = file.data.len(),
                "Receiving commercial offer upload"
            );
            state
                .store
                .attach_offer_bytes(&company_id, &file.file_name, file.data)
                .await?
        }
        (None, Some(file_path)) => {
            tracing::info!(
                company_id = %company_id,
                file_path = %file_path,
                "Copying commercial offer from staging"
            );
            state
                .store
                .attach_offer(&company_id, Path::new(file_path))
                .await?
        }
        (None, None) => {
            return Err(AppError::InvalidInput(
                "Either a 'file' part or a 'file_path' field is required".to_string(),
            )
            .into());
        }
    };

    Ok(Json(OfferResponse {
        message: OFFER_UPLOADED.to_string(),
        path_to_file: path.display().to_string(),
    }))
}

/// Create a commercial offer in the user's staging directory
#[utoipa::path(
    post,
    path = "/commercial-offer/create",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "file part plus user_login field"),
    responses(
        (status = 200, description = "Offer written to the staging directory", body = OfferResponse),
        (status = 400, description = "Invalid form", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "commercial-offer"
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "create_offer"))]
pub async fn create_offer(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut form = extract_offer_form(multipart, state.config.max_upload_size_bytes()).await?;
    let file = form.take_file()?;
    let user_login = form.required_field("user_login")?;

    let path = state
        .store
        .create_offer(file.data, &file.file_name, user_login)
        .await?;

    Ok(Json(OfferResponse {
        message: OFFER_CREATED.to_string(),
        path_to_file: path.display().to_string(),
    }))
}

/// Download an offer file by its path
#[utoipa::path(
    post,
    path = "/commercial-offer/download",
    request_body = DownloadOfferRequest,
    responses(
        (status = 200, description = "Offer file", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Path outside the allowed directories", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "commercial-offer"
)]
#[tracing::instrument(skip(state, request), fields(file_path = %request.file_path, operation = "download_offer"))]
pub async fn download_offer(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DownloadOfferRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let offer = state.store.open_offer(Path::new(&request.file_path)).await?;

    tracing::debug!(
        path = %offer.path.display(),
        size_bytes = offer.size,
        "Streaming commercial offer"
    );

    let body_stream = offer.stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Offer stream error: {}", e)))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, offer.size)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&offer.file_name),
        )
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

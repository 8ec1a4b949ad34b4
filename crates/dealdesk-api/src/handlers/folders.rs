use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::constants::{FOLDER_ACTIVATED, FOLDER_ARCHIVED, FOLDER_CREATED, FOLDER_DELETED};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use dealdesk_core::models::{CreateFolderRequest, DealNumberRequest, FolderInfo, MessageResponse};

/// Create a company folder with its subdirectory tree
#[utoipa::path(
    post,
    path = "/create",
    request_body = CreateFolderRequest,
    responses(
        (status = 200, description = "Folder created", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Company id already used by another folder", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "folders"
)]
#[tracing::instrument(
    skip(state, request),
    fields(company_id = %request.company_id, operation = "create_folder")
)]
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateFolderRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let path = state
        .store
        .create(&request.company_name, &request.company_id, &request.dl_number)
        .await?;

    Ok(Json(MessageResponse::with_path(
        FOLDER_CREATED,
        path.display().to_string(),
    )))
}

/// Delete a company folder and everything inside it
#[utoipa::path(
    delete,
    path = "/delete/{company_id}",
    params(
        ("company_id" = String, Path, description = "Company identifier")
    ),
    responses(
        (status = 200, description = "Folder deleted", body = MessageResponse),
        (status = 404, description = "Folder not found", body = ErrorResponse),
        (status = 409, description = "Company id is ambiguous", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "folders"
)]
#[tracing::instrument(skip(state), fields(operation = "delete_folder"))]
pub async fn delete_folder(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.store.delete(&company_id).await?;
    Ok(Json(MessageResponse::new(FOLDER_DELETED)))
}

/// Move a company folder to the archive naming
#[utoipa::path(
    put,
    path = "/archive/{company_id}",
    params(
        ("company_id" = String, Path, description = "Company identifier")
    ),
    request_body = DealNumberRequest,
    responses(
        (status = 200, description = "Folder archived", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Folder not found", body = ErrorResponse),
        (status = 409, description = "Destination name already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "folders"
)]
#[tracing::instrument(skip(state, request), fields(dl_number = %request.dl_number, operation = "archive_folder"))]
pub async fn archive_folder(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<String>,
    ValidatedJson(request): ValidatedJson<DealNumberRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let path = state.store.archive(&company_id, &request.dl_number).await?;
    Ok(Json(MessageResponse::with_path(
        FOLDER_ARCHIVED,
        path.display().to_string(),
    )))
}

/// Bring an archived company folder back to the active naming
#[utoipa::path(
    put,
    path = "/activate/{company_id}",
    params(
        ("company_id" = String, Path, description = "Company identifier")
    ),
    request_body = DealNumberRequest,
    responses(
        (status = 200, description = "Folder activated", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Folder not found", body = ErrorResponse),
        (status = 409, description = "Destination name already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "folders"
)]
#[tracing::instrument(skip(state, request), fields(dl_number = %request.dl_number, operation = "activate_folder"))]
pub async fn activate_folder(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<String>,
    ValidatedJson(request): ValidatedJson<DealNumberRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let path = state.store.activate(&company_id, &request.dl_number).await?;
    Ok(Json(MessageResponse::with_path(
        FOLDER_ACTIVATED,
        path.display().to_string(),
    )))
}

/// Describe the folder of a company
#[utoipa::path(
    get,
    path = "/folders/{company_id}",
    params(
        ("company_id" = String, Path, description = "Company identifier")
    ),
    responses(
        (status = 200, description = "Folder found", body = FolderInfo),
        (status = 404, description = "Folder not found", body = ErrorResponse),
        (status = 409, description = "Company id is ambiguous", body = ErrorResponse)
    ),
    tag = "folders"
)]
#[tracing::instrument(skip(state), fields(operation = "get_folder"))]
pub async fn get_folder(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<String>,
) -> Result<Json<FolderInfo>, HttpAppError> {
    let info = state.store.info(&company_id).await?;
    Ok(Json(info))
}

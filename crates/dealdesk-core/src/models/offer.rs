use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request DTO for downloading an offer file by path
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DownloadOfferRequest {
    #[validate(length(min = 1, message = "file_path must not be empty"))]
    pub file_path: String,
}

/// Response for offer upload/create
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OfferResponse {
    pub message: String,
    pub path_to_file: String,
}

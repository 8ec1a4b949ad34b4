use serde::{Deserialize, Serialize};
use std::path::Path;
use utoipa::ToSchema;
use validator::Validate;

use crate::naming;

/// A company folder as found on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FolderInfo {
    pub company_id: String,
    pub name: String,
    pub path: String,
    pub archived: bool,
}

impl FolderInfo {
    pub fn from_path(company_id: &str, path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        FolderInfo {
            company_id: company_id.to_string(),
            archived: naming::is_archived(&name),
            name,
            path: path.display().to_string(),
        }
    }
}

/// Request DTO for creating a company folder
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateFolderRequest {
    #[validate(length(min = 1, max = 200, message = "company_name must be 1-200 characters"))]
    pub company_name: String,
    #[validate(length(min = 1, max = 64, message = "company_id must be 1-64 characters"))]
    pub company_id: String,
    #[validate(length(max = 64, message = "dl_number must be at most 64 characters"))]
    pub dl_number: String,
}

/// Request DTO carrying the deal number for archive/activate
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DealNumberRequest {
    #[validate(length(max = 64, message = "dl_number must be at most 64 characters"))]
    pub dl_number: String,
}

/// Liveness check payload
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

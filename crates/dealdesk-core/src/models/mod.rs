//! Data models for the application
//!
//! Request and response DTOs for the HTTP surface, plus the folder view shared
//! with the storage crate.

mod folder;
mod offer;

// Re-export all models for convenient imports
pub use folder::*;
pub use offer::*;

use serde::Serialize;
use utoipa::ToSchema;

/// Plain acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

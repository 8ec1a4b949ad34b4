//! Dealdesk Core Library
//!
//! This crate provides the domain models, folder naming rules, error types and
//! configuration shared by the storage and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod naming;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, Config, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::FolderInfo;

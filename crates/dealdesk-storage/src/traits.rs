//! Folder store abstraction trait
//!
//! This module defines the FolderStore trait that the HTTP layer programs
//! against, along with the storage error taxonomy.

use async_trait::async_trait;
use bytes::Bytes;
use dealdesk_core::FolderInfo;
use futures::Stream;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Path outside allowed roots: {0}")]
    Forbidden(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Create failed: {0}")]
    CreateFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Rename failed: {0}")]
    RenameFailed(String),

    #[error("Copy failed: {0}")]
    CopyFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Byte stream of an offer file.
pub type OfferStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// An offer file opened for streaming.
pub struct OfferFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
    pub stream: OfferStream,
}

/// Folder store abstraction trait
///
/// Covers the three concerns of the service: identity matching (`resolve`),
/// the folder lifecycle (`create`, `delete`, `archive`, `activate`) and
/// document placement (`attach_offer*`, `create_offer`, `read_offer`,
/// `open_offer`). Every call goes straight to the filesystem; implementations
/// keep no state between calls apart from their configured roots.
#[async_trait]
pub trait FolderStore: Send + Sync {
    /// Find every directory directly under the base path whose name embeds
    /// `(id_<company_id>)`, sorted by name.
    async fn resolve_all(&self, company_id: &str) -> StorageResult<Vec<PathBuf>>;

    /// Find the single folder for `company_id`.
    ///
    /// Fails with `NotFound` when nothing matches and with `Conflict` when more
    /// than one folder embeds the id.
    async fn resolve(&self, company_id: &str) -> StorageResult<PathBuf>;

    /// Create the company folder and its subdirectory tree. Idempotent for an
    /// identical name; returns the folder path.
    async fn create(
        &self,
        company_name: &str,
        company_id: &str,
        deal_number: &str,
    ) -> StorageResult<PathBuf>;

    /// Recursively remove the company folder. Returns the removed path.
    async fn delete(&self, company_id: &str) -> StorageResult<PathBuf>;

    /// Strip `deal_number` from the folder name and prepend the archive marker.
    async fn archive(&self, company_id: &str, deal_number: &str) -> StorageResult<PathBuf>;

    /// Strip the archive marker and prepend `deal_number`.
    async fn activate(&self, company_id: &str, deal_number: &str) -> StorageResult<PathBuf>;

    /// Copy an existing file into the folder's offer subdirectory.
    async fn attach_offer(&self, company_id: &str, source: &Path) -> StorageResult<PathBuf>;

    /// Write uploaded bytes into the folder's offer subdirectory.
    async fn attach_offer_bytes(
        &self,
        company_id: &str,
        file_name: &str,
        data: Vec<u8>,
    ) -> StorageResult<PathBuf>;

    /// Write a new offer into the user's staging directory.
    async fn create_offer(
        &self,
        data: Vec<u8>,
        file_name: &str,
        user_login: &str,
    ) -> StorageResult<PathBuf>;

    /// Read a whole offer file.
    async fn read_offer(&self, path: &Path) -> StorageResult<Vec<u8>>;

    /// Open an offer file for streaming.
    async fn open_offer(&self, path: &Path) -> StorageResult<OfferFile>;

    /// Check that both roots are reachable directories.
    async fn health_check(&self) -> StorageResult<()>;

    /// Describe the folder for `company_id`.
    async fn info(&self, company_id: &str) -> StorageResult<FolderInfo> {
        let path = self.resolve(company_id).await?;
        Ok(FolderInfo::from_path(company_id, &path))
    }
}

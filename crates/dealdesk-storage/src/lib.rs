//! Dealdesk Storage Library
//!
//! This crate provides the `FolderStore` abstraction over the shared deals
//! filesystem and its local implementation.
//!
//! # On-disk layout
//!
//! - **Company folders**: `<base_path>/<deal_number> <company_name> (id_<company_id>)`,
//!   each holding the fixed subdirectory set from `dealdesk_core::constants`.
//! - **Staging**: `<offers_root>/<user_login>/<file_name>`.
//!
//! Caller-supplied paths (offer sources and downloads) must resolve inside one
//! of these two roots. Path handling is centralized in the `paths` module.

pub mod factory;
pub mod local;
pub(crate) mod paths;
pub mod traits;

// Re-export commonly used types
pub use factory::create_folder_store;
pub use local::LocalFolderStore;
pub use traits::{FolderStore, OfferFile, OfferStream, StorageError, StorageResult};

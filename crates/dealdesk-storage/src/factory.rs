use crate::{FolderStore, LocalFolderStore, StorageResult};
use dealdesk_core::Config;
use std::sync::Arc;

/// Create the folder store based on configuration
pub async fn create_folder_store(config: &Config) -> StorageResult<Arc<dyn FolderStore>> {
    let store = LocalFolderStore::new(
        config.base_path(),
        config.offers_root(),
        config.create_missing_roots(),
    )
    .await?
    .with_source_roots(config.offer_source_roots().iter().cloned())
    .await?;
    Ok(Arc::new(store))
}

//! Application state shared by all handlers.

use dealdesk_core::Config;
use dealdesk_storage::FolderStore;
use std::sync::Arc;

/// Main application state: configuration plus the folder store every handler
/// talks to.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn FolderStore>,
    pub is_production: bool,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn FolderStore>) -> Self {
        let is_production = config.is_production();
        Self {
            config,
            store,
            is_production,
        }
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}

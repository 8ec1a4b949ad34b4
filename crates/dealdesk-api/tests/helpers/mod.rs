//! Test helpers: build the app over temporary directories for integration tests.
//!
//! Run from workspace root: `cargo test -p dealdesk-api`.

#![allow(dead_code)]

use axum_test::TestServer;
use dealdesk_api::setup;
use dealdesk_core::Config;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test application: server plus the temporary roots it works on.
pub struct TestApp {
    pub server: TestServer,
    pub base_path: PathBuf,
    pub offers_root: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Names of the entries directly under the base path, sorted.
    pub fn folder_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.base_path)
            .expect("read base path")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Write a file into `<offers_root>/<user>/<name>` and return its path.
    pub fn stage_file(&self, user: &str, name: &str, data: &[u8]) -> PathBuf {
        let dir = self.offers_root.join(user);
        std::fs::create_dir_all(&dir).expect("create staging dir");
        let path = dir.join(name);
        std::fs::write(&path, data).expect("write staged file");
        path
    }
}

/// Setup test app with fresh deals and offers roots.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// Setup test app with extra configuration entries on top of the test defaults.
pub async fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_test_app_in(temp_dir, overrides).await
}

/// Setup test app inside an existing temporary directory, so tests can prepare
/// extra directories (e.g. offer source roots) before the app starts.
pub async fn setup_test_app_in(temp_dir: TempDir, overrides: &[(&str, &str)]) -> TestApp {
    let deals = temp_dir.path().join("deals");
    let offers = temp_dir.path().join("offers");

    let config = test_config(&deals, &offers, overrides);
    let (_state, router) = setup::build_app(config)
        .await
        .expect("Failed to build app");

    let server = TestServer::new(router.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        base_path: deals.canonicalize().expect("canonical deals"),
        offers_root: offers.canonicalize().expect("canonical offers"),
        _temp_dir: temp_dir,
    }
}

fn test_config(deals: &Path, offers: &Path, overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("DEALS_BASE_PATH".to_string(), deals.display().to_string()),
        ("OFFERS_ROOT".to_string(), offers.display().to_string()),
        ("MAX_UPLOAD_SIZE_MB".to_string(), "1".to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(move |key| vars.get(key).cloned()).expect("Failed to build test config")
}

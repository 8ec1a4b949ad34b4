//! Configuration module
//!
//! This module provides the process-wide configuration: server settings and the
//! two filesystem roots (company folders and commercial-offer staging). It is
//! loaded once at startup and injected into every component.

use std::env;
use std::path::{Path, PathBuf};

const SERVER_PORT: u16 = 8000;
const MAX_UPLOAD_SIZE_MB: usize = 50;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Server settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub max_upload_size_bytes: usize,
    pub request_timeout_secs: u64,
    pub http_concurrency_limit: usize,
}

/// Filesystem roots
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Directory whose immediate children are the company folders.
    pub base_path: PathBuf,
    /// Directory holding one staging directory per user login.
    pub offers_root: PathBuf,
    /// Create both roots at startup when they are missing.
    pub create_missing_roots: bool,
    /// Directories an offer may be attached from: both roots plus any listed
    /// in `OFFER_SOURCE_ROOTS`.
    pub offer_source_roots: Vec<PathBuf>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let max_upload_size_mb = lookup("MAX_UPLOAD_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let request_timeout_secs = lookup("REQUEST_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(REQUEST_TIMEOUT_SECS);

        let base_path = lookup("DEALS_BASE_PATH")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("DEALS_BASE_PATH must be set"))?;
        let offers_root = lookup("OFFERS_ROOT")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("OFFERS_ROOT must be set"))?;

        let http_concurrency_limit = lookup("HTTP_CONCURRENCY_LIMIT")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(HTTP_CONCURRENCY_LIMIT);

        let base_path = PathBuf::from(base_path);
        let offers_root = PathBuf::from(offers_root);

        let mut offer_source_roots = vec![base_path.clone(), offers_root.clone()];
        for root in lookup("OFFER_SOURCE_ROOTS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
        {
            if !offer_source_roots.contains(&root) {
                offer_source_roots.push(root);
            }
        }

        let create_missing_roots = lookup("CREATE_MISSING_ROOTS")
            .unwrap_or_else(|| "true".to_string())
            .to_lowercase()
            .parse()
            .unwrap_or(true);

        let config = Config {
            base: BaseConfig {
                server_port,
                cors_origins,
                environment,
                max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
                request_timeout_secs,
                http_concurrency_limit,
            },
            storage: StorageConfig {
                base_path,
                offers_root,
                create_missing_roots,
                offer_source_roots,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.storage.base_path == self.storage.offers_root {
            return Err(anyhow::anyhow!(
                "DEALS_BASE_PATH and OFFERS_ROOT must point to different directories"
            ));
        }

        if self.base.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.base.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be greater than 0"));
        }

        if self.base.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT must be greater than 0"));
        }

        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.base.max_upload_size_bytes
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.base.request_timeout_secs
    }

    pub fn base_path(&self) -> &Path {
        &self.storage.base_path
    }

    pub fn offers_root(&self) -> &Path {
        &self.storage.offers_root
    }

    pub fn create_missing_roots(&self) -> bool {
        self.storage.create_missing_roots
    }

    pub fn offer_source_roots(&self) -> &[PathBuf] {
        &self.storage.offer_source_roots
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.base.http_concurrency_limit
    }
}

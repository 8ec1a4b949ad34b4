use crate::paths::{id_pattern, io_failure, is_temp_file, is_within, temp_sibling};
use crate::traits::{FolderStore, OfferFile, StorageError, StorageResult};
use async_trait::async_trait;
use dealdesk_core::constants::{OFFER_SUBDIRECTORY, SUBDIRECTORIES};
use dealdesk_core::validation::{
    sanitize_file_name, validate_company_id, validate_name_component,
    validate_required_component,
};
use dealdesk_core::{naming, AppError, ErrorMetadata};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem folder store
///
/// Company folders are the immediate children of `base_path`; lookup never
/// descends into them. Staging directories live under `offers_root`.
/// Offers may be attached from any of `source_roots`; downloads stay within
/// the two roots.
#[derive(Clone)]
pub struct LocalFolderStore {
    base_path: PathBuf,
    offers_root: PathBuf,
    source_roots: Vec<PathBuf>,
}

fn invalid(err: AppError) -> StorageError {
    StorageError::InvalidName(err.client_message())
}

fn not_found_message(company_id: &str) -> String {
    format!("Папка с id_{} не найдена.", company_id)
}

impl LocalFolderStore {
    /// Create a new LocalFolderStore instance
    ///
    /// # Arguments
    /// * `base_path` - Directory holding the company folders (e.g., "/srv/deals")
    /// * `offers_root` - Directory holding per-user staging directories (e.g., "/srv/offers")
    /// * `create_missing` - Create the roots when they do not exist yet
    pub async fn new(
        base_path: impl Into<PathBuf>,
        offers_root: impl Into<PathBuf>,
        create_missing: bool,
    ) -> StorageResult<Self> {
        let base_path = Self::prepare_root(base_path.into(), create_missing).await?;
        let offers_root = Self::prepare_root(offers_root.into(), create_missing).await?;

        if base_path.starts_with(&offers_root) || offers_root.starts_with(&base_path) {
            return Err(StorageError::ConfigError(format!(
                "Base path {} and offers root {} must not be nested",
                base_path.display(),
                offers_root.display()
            )));
        }

        tracing::info!(
            base_path = %base_path.display(),
            offers_root = %offers_root.display(),
            "Local folder store ready"
        );

        Ok(LocalFolderStore {
            source_roots: vec![base_path.clone(), offers_root.clone()],
            base_path,
            offers_root,
        })
    }

    /// Allow `attach_offer` to copy from additional directories.
    ///
    /// Each root must already exist; both store roots stay allowed.
    pub async fn with_source_roots<I, P>(mut self, roots: I) -> StorageResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for root in roots {
            let root = Self::prepare_root(root.into(), false).await?;
            if !self.source_roots.contains(&root) {
                tracing::info!(source_root = %root.display(), "Offer source root allowed");
                self.source_roots.push(root);
            }
        }
        Ok(self)
    }

    async fn prepare_root(root: PathBuf, create_missing: bool) -> StorageResult<PathBuf> {
        if create_missing {
            fs::create_dir_all(&root).await.map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create directory {}: {}",
                    root.display(),
                    e
                ))
            })?;
        }

        let canonical = fs::canonicalize(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to open directory {}: {}",
                root.display(),
                e
            ))
        })?;

        if !fs::metadata(&canonical).await?.is_dir() {
            return Err(StorageError::ConfigError(format!(
                "{} is not a directory",
                canonical.display()
            )));
        }

        Ok(canonical)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn offers_root(&self) -> &Path {
        &self.offers_root
    }

    pub fn source_roots(&self) -> &[PathBuf] {
        &self.source_roots
    }

    fn download_roots(&self) -> [PathBuf; 2] {
        [self.base_path.clone(), self.offers_root.clone()]
    }

    /// Canonicalize a caller-supplied path and require it to stay inside one
    /// of `roots`.
    async fn confine(path: &Path, roots: &[PathBuf]) -> StorageResult<PathBuf> {
        let canonical = match fs::canonicalize(path).await {
            Ok(canonical) => canonical,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(format!(
                    "File {} not found",
                    path.display()
                )));
            }
            Err(e) => return Err(io_failure(StorageError::ReadFailed, path.display(), e)),
        };

        if !is_within(&canonical, roots) {
            tracing::warn!(
                path = %path.display(),
                resolved = %canonical.display(),
                "Rejected path outside allowed roots"
            );
            return Err(StorageError::Forbidden(path.display().to_string()));
        }

        Ok(canonical)
    }

    /// Confine `path` and require a regular file there.
    async fn confine_file(path: &Path, roots: &[PathBuf]) -> StorageResult<(PathBuf, u64)> {
        let canonical = Self::confine(path, roots).await?;
        let meta = fs::metadata(&canonical)
            .await
            .map_err(|e| io_failure(StorageError::ReadFailed, canonical.display(), e))?;
        if !meta.is_file() {
            return Err(StorageError::NotFound(format!(
                "File {} not found",
                path.display()
            )));
        }
        Ok((canonical, meta.len()))
    }

    /// Offer subdirectory of a resolved folder, created when missing.
    async fn offer_dir(&self, company_id: &str) -> StorageResult<PathBuf> {
        let folder = self.resolve(company_id).await?;
        let dir = folder.join(OFFER_SUBDIRECTORY);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_failure(StorageError::CreateFailed, dir.display(), e))?;
        Ok(dir)
    }

    /// Rename a resolved folder within the base path.
    async fn rename_folder(&self, from: &Path, new_name: &str) -> StorageResult<PathBuf> {
        validate_name_component("folder name", new_name).map_err(invalid)?;
        let parent = from.parent().unwrap_or(&self.base_path);
        let to = parent.join(new_name);

        let exists = fs::try_exists(&to)
            .await
            .map_err(|e| io_failure(StorageError::RenameFailed, to.display(), e))?;
        if to != from && exists {
            return Err(StorageError::Conflict(format!(
                "Folder {} already exists",
                to.display()
            )));
        }

        fs::rename(from, &to).await.map_err(|e| {
            io_failure(
                StorageError::RenameFailed,
                format!("{} -> {}", from.display(), to.display()),
                e,
            )
        })?;

        Ok(to)
    }

    /// Write `data` to `dir/file_name` through a temporary sibling and a rename,
    /// so the destination is either the old file or the complete new one.
    async fn write_atomic(dir: &Path, file_name: &str, data: &[u8]) -> StorageResult<PathBuf> {
        let dest = dir.join(file_name);
        let tmp = temp_sibling(dir);

        let result = async {
            let mut file = fs::File::create(&tmp)
                .await
                .map_err(|e| io_failure(StorageError::WriteFailed, tmp.display(), e))?;
            file.write_all(data)
                .await
                .map_err(|e| io_failure(StorageError::WriteFailed, tmp.display(), e))?;
            file.sync_all()
                .await
                .map_err(|e| io_failure(StorageError::WriteFailed, tmp.display(), e))?;
            drop(file);
            fs::rename(&tmp, &dest)
                .await
                .map_err(|e| io_failure(StorageError::WriteFailed, dest.display(), e))
        }
        .await;

        if let Err(e) = result {
            if let Err(cleanup_err) = fs::remove_file(&tmp).await {
                tracing::debug!(
                    error = %cleanup_err,
                    path = %tmp.display(),
                    "Failed to remove temporary file after write error"
                );
            }
            return Err(e);
        }

        Ok(dest)
    }

    /// Copy `source` to `dir/file_name` through a temporary sibling and a rename.
    async fn copy_atomic(source: &Path, dir: &Path, file_name: &str) -> StorageResult<(PathBuf, u64)> {
        let dest = dir.join(file_name);
        let tmp = temp_sibling(dir);

        let result = async {
            let copied = fs::copy(source, &tmp).await.map_err(|e| {
                io_failure(
                    StorageError::CopyFailed,
                    format!("{} -> {}", source.display(), tmp.display()),
                    e,
                )
            })?;
            fs::rename(&tmp, &dest)
                .await
                .map_err(|e| io_failure(StorageError::CopyFailed, dest.display(), e))?;
            Ok::<u64, StorageError>(copied)
        }
        .await;

        match result {
            Ok(copied) => Ok((dest, copied)),
            Err(e) => {
                if let Err(cleanup_err) = fs::remove_file(&tmp).await {
                    tracing::debug!(
                        error = %cleanup_err,
                        path = %tmp.display(),
                        "Failed to remove temporary file after copy error"
                    );
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl FolderStore for LocalFolderStore {
    async fn resolve_all(&self, company_id: &str) -> StorageResult<Vec<PathBuf>> {
        validate_company_id(company_id).map_err(invalid)?;
        let pattern = id_pattern(company_id)?;

        let mut entries = fs::read_dir(&self.base_path)
            .await
            .map_err(|e| io_failure(StorageError::ReadFailed, self.base_path.display(), e))?;

        let mut matches = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_failure(StorageError::ReadFailed, self.base_path.display(), e))?
        {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !pattern.matches(name) {
                continue;
            }
            // Follows symlinks, so a linked directory counts as a folder.
            let is_dir = fs::metadata(entry.path())
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);
            if is_dir {
                matches.push(entry.path());
            } else {
                tracing::debug!(path = %entry.path().display(), "Skipping non-directory match");
            }
        }

        matches.sort();
        Ok(matches)
    }

    async fn resolve(&self, company_id: &str) -> StorageResult<PathBuf> {
        let mut matches = self.resolve_all(company_id).await?;
        match matches.len() {
            0 => {
                tracing::info!(company_id = %company_id, "Company folder not found");
                Err(StorageError::NotFound(not_found_message(company_id)))
            }
            1 => Ok(matches.remove(0)),
            n => {
                let names: Vec<String> = matches
                    .iter()
                    .filter_map(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .collect();
                tracing::warn!(
                    company_id = %company_id,
                    candidates = ?names,
                    "Company id is embedded in more than one folder"
                );
                Err(StorageError::Conflict(format!(
                    "{} folders embed {}: {}",
                    n,
                    naming::id_marker(company_id),
                    names.join(", ")
                )))
            }
        }
    }

    async fn create(
        &self,
        company_name: &str,
        company_id: &str,
        deal_number: &str,
    ) -> StorageResult<PathBuf> {
        validate_company_id(company_id).map_err(invalid)?;
        validate_required_component("company_name", company_name).map_err(invalid)?;
        validate_name_component("dl_number", deal_number).map_err(invalid)?;

        let name = naming::canonical_name(company_name, company_id, deal_number);
        let folder = self.base_path.join(&name);
        let start = std::time::Instant::now();

        let existing = self.resolve_all(company_id).await?;
        if let Some(other) = existing.iter().find(|p| **p != folder) {
            return Err(StorageError::Conflict(format!(
                "{} is already used by {}",
                naming::id_marker(company_id),
                other
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            )));
        }

        fs::create_dir_all(&folder)
            .await
            .map_err(|e| io_failure(StorageError::CreateFailed, folder.display(), e))?;

        for subdirectory in SUBDIRECTORIES {
            let dir = folder.join(subdirectory);
            fs::create_dir_all(&dir)
                .await
                .map_err(|e| io_failure(StorageError::CreateFailed, dir.display(), e))?;
        }

        tracing::info!(
            company_id = %company_id,
            path = %folder.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Company folder created"
        );

        Ok(folder)
    }

    async fn delete(&self, company_id: &str) -> StorageResult<PathBuf> {
        let folder = self.resolve(company_id).await?;
        let start = std::time::Instant::now();

        fs::remove_dir_all(&folder)
            .await
            .map_err(|e| io_failure(StorageError::DeleteFailed, folder.display(), e))?;

        tracing::info!(
            company_id = %company_id,
            path = %folder.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Company folder deleted"
        );

        Ok(folder)
    }

    async fn archive(&self, company_id: &str, deal_number: &str) -> StorageResult<PathBuf> {
        validate_name_component("dl_number", deal_number).map_err(invalid)?;
        let folder = self.resolve(company_id).await?;
        let current = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let new_name = naming::archived_name(&current, deal_number);
        if !naming::embeds_id(&new_name, company_id) {
            tracing::warn!(
                company_id = %company_id,
                dl_number = %deal_number,
                new_name = %new_name,
                "Archived name no longer embeds the company id"
            );
        }

        let renamed = self.rename_folder(&folder, &new_name).await?;

        tracing::info!(
            company_id = %company_id,
            from = %folder.display(),
            to = %renamed.display(),
            "Company folder archived"
        );

        Ok(renamed)
    }

    async fn activate(&self, company_id: &str, deal_number: &str) -> StorageResult<PathBuf> {
        validate_name_component("dl_number", deal_number).map_err(invalid)?;
        let folder = self.resolve(company_id).await?;
        let current = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let new_name = naming::activated_name(&current, deal_number);
        let renamed = self.rename_folder(&folder, &new_name).await?;

        tracing::info!(
            company_id = %company_id,
            from = %folder.display(),
            to = %renamed.display(),
            "Company folder activated"
        );

        Ok(renamed)
    }

    async fn attach_offer(&self, company_id: &str, source: &Path) -> StorageResult<PathBuf> {
        let (source, _) = Self::confine_file(source, &self.source_roots).await?;
        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                StorageError::InvalidName(format!("Invalid source file name: {}", source.display()))
            })
            .and_then(|n| sanitize_file_name(n).map_err(invalid))?;

        let dir = self.offer_dir(company_id).await?;
        let dest = dir.join(&file_name);

        // Copying a file onto itself would go through a temporary copy anyway,
        // but there is nothing to do.
        if fs::canonicalize(&dest).await.ok().as_deref() == Some(source.as_path()) {
            return Ok(dest);
        }

        let start = std::time::Instant::now();
        let (dest, size) = Self::copy_atomic(&source, &dir, &file_name).await?;

        tracing::info!(
            company_id = %company_id,
            from = %source.display(),
            to = %dest.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Commercial offer attached"
        );

        Ok(dest)
    }

    async fn attach_offer_bytes(
        &self,
        company_id: &str,
        file_name: &str,
        data: Vec<u8>,
    ) -> StorageResult<PathBuf> {
        let file_name = sanitize_file_name(file_name).map_err(invalid)?;
        let dir = self.offer_dir(company_id).await?;
        let start = std::time::Instant::now();

        let dest = Self::write_atomic(&dir, &file_name, &data).await?;

        tracing::info!(
            company_id = %company_id,
            path = %dest.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Commercial offer uploaded into company folder"
        );

        Ok(dest)
    }

    async fn create_offer(
        &self,
        data: Vec<u8>,
        file_name: &str,
        user_login: &str,
    ) -> StorageResult<PathBuf> {
        validate_required_component("user_login", user_login).map_err(invalid)?;
        let file_name = sanitize_file_name(file_name).map_err(invalid)?;

        let staging = self.offers_root.join(user_login);
        fs::create_dir_all(&staging)
            .await
            .map_err(|e| io_failure(StorageError::CreateFailed, staging.display(), e))?;

        let start = std::time::Instant::now();
        let dest = Self::write_atomic(&staging, &file_name, &data).await?;

        tracing::info!(
            user_login = %user_login,
            path = %dest.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Commercial offer created"
        );

        Ok(dest)
    }

    async fn read_offer(&self, path: &Path) -> StorageResult<Vec<u8>> {
        let (canonical, _) = Self::confine_file(path, &self.download_roots()).await?;
        if canonical
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(is_temp_file)
        {
            return Err(StorageError::NotFound(format!(
                "File {} not found",
                path.display()
            )));
        }

        fs::read(&canonical)
            .await
            .map_err(|e| io_failure(StorageError::ReadFailed, canonical.display(), e))
    }

    async fn open_offer(&self, path: &Path) -> StorageResult<OfferFile> {
        let (canonical, size) = Self::confine_file(path, &self.download_roots()).await?;
        let file_name = canonical
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if is_temp_file(&file_name) {
            return Err(StorageError::NotFound(format!(
                "File {} not found",
                path.display()
            )));
        }

        let file = fs::File::open(&canonical)
            .await
            .map_err(|e| io_failure(StorageError::ReadFailed, canonical.display(), e))?;

        let path_display = canonical.display().to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(path = %path_display, error = %e, "Offer stream read error");
                StorageError::ReadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        tracing::debug!(path = %canonical.display(), size_bytes = size, "Streaming offer file");

        Ok(OfferFile {
            path: canonical,
            file_name,
            size,
            stream: Box::pin(stream),
        })
    }

    async fn health_check(&self) -> StorageResult<()> {
        for root in [&self.base_path, &self.offers_root] {
            let meta = fs::metadata(root)
                .await
                .map_err(|e| io_failure(StorageError::ReadFailed, root.display(), e))?;
            if !meta.is_dir() {
                return Err(StorageError::ConfigError(format!(
                    "{} is not a directory",
                    root.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        _dir: TempDir,
        store: LocalFolderStore,
    }

    async fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let store = LocalFolderStore::new(dir.path().join("deals"), dir.path().join("offers"), true)
            .await
            .unwrap();
        Fixture { _dir: dir, store }
    }

    fn folder_name(path: &Path) -> String {
        path.file_name().unwrap().to_string_lossy().into_owned()
    }

    async fn subdirectories(path: &Path) -> Vec<String> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(path).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            assert!(entry.file_type().await.unwrap().is_dir());
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        names
    }

    fn expected_subdirectories() -> Vec<String> {
        let mut names: Vec<String> = SUBDIRECTORIES.iter().map(|s| s.to_string()).collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_create_then_resolve() {
        let f = fixture().await;

        let created = f.store.create("Acme", "42", "DL-1").await.unwrap();
        assert_eq!(folder_name(&created), "DL-1 Acme (id_42)");

        let resolved = f.store.resolve("42").await.unwrap();
        assert_eq!(resolved, created);
        assert!(folder_name(&resolved).contains("id_42"));
        assert_eq!(subdirectories(&resolved).await, expected_subdirectories());
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let f = fixture().await;

        let first = f.store.create("Acme", "42", "DL-1").await.unwrap();
        let second = f.store.create("Acme", "42", "DL-1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(f.store.resolve_all("42").await.unwrap().len(), 1);
        assert_eq!(subdirectories(&first).await, expected_subdirectories());
    }

    #[tokio::test]
    async fn test_create_rejects_second_folder_for_same_id() {
        let f = fixture().await;
        f.store.create("Acme", "42", "DL-1").await.unwrap();

        let result = f.store.create("Acme Renamed", "42", "DL-2").await;
        assert!(matches!(result, Err(StorageError::Conflict(_))));
        assert_eq!(f.store.resolve_all("42").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_path_separators() {
        let f = fixture().await;
        let result = f.store.create("../escape", "1", "DL").await;
        assert!(matches!(result, Err(StorageError::InvalidName(_))));
    }

    #[tokio::test]
    async fn test_resolve_unknown_id() {
        let f = fixture().await;
        let result = f.store.resolve("404").await;
        match result {
            Err(StorageError::NotFound(msg)) => assert_eq!(msg, "Папка с id_404 не найдена."),
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_resolve_skips_non_directory_matches() {
        let f = fixture().await;
        fs::write(f.store.base_path().join("notes (id_7).txt"), b"x")
            .await
            .unwrap();
        assert!(matches!(
            f.store.resolve("7").await,
            Err(StorageError::NotFound(_))
        ));

        let created = f.store.create("Beta", "7", "DL-7").await.unwrap();
        assert_eq!(f.store.resolve("7").await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_resolve_is_not_recursive() {
        let f = fixture().await;
        let nested = f.store.base_path().join("group").join("DL Nested (id_9)");
        fs::create_dir_all(&nested).await.unwrap();

        assert!(matches!(
            f.store.resolve("9").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_reports_ambiguity() {
        let f = fixture().await;
        fs::create_dir(f.store.base_path().join("A One (id_5)")).await.unwrap();
        fs::create_dir(f.store.base_path().join("B Two (id_5)")).await.unwrap();

        assert_eq!(f.store.resolve_all("5").await.unwrap().len(), 2);
        assert!(matches!(
            f.store.resolve("5").await,
            Err(StorageError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_does_not_confuse_prefix_ids() {
        let f = fixture().await;
        f.store.create("Acme", "42", "DL-1").await.unwrap();
        f.store.create("Other", "420", "DL-2").await.unwrap();

        let resolved = f.store.resolve("42").await.unwrap();
        assert_eq!(folder_name(&resolved), "DL-1 Acme (id_42)");
    }

    #[tokio::test]
    async fn test_delete() {
        let f = fixture().await;

        assert!(matches!(
            f.store.delete("42").await,
            Err(StorageError::NotFound(_))
        ));

        let created = f.store.create("Acme", "42", "DL-1").await.unwrap();
        fs::write(created.join(OFFER_SUBDIRECTORY).join("offer.pdf"), b"pdf")
            .await
            .unwrap();

        let removed = f.store.delete("42").await.unwrap();
        assert_eq!(removed, created);
        assert!(!fs::try_exists(&created).await.unwrap());
        assert!(matches!(
            f.store.resolve("42").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_archive_activate_scenario() {
        let f = fixture().await;
        let created = f.store.create("Acme", "42", "DL-1").await.unwrap();
        assert_eq!(subdirectories(&created).await.len(), 6);

        let archived = f.store.archive("42", "DL-1").await.unwrap();
        assert_eq!(folder_name(&archived), "(Архив) Acme (id_42)");
        assert!(!fs::try_exists(&created).await.unwrap());

        let info = f.store.info("42").await.unwrap();
        assert!(info.archived);

        let active = f.store.activate("42", "DL-1").await.unwrap();
        assert_eq!(folder_name(&active), "DL-1 Acme (id_42)");
        assert_eq!(active, created);
        assert_eq!(subdirectories(&active).await, expected_subdirectories());
    }

    #[tokio::test]
    async fn test_archive_unknown_id() {
        let f = fixture().await;
        assert!(matches!(
            f.store.archive("1", "DL").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            f.store.activate("1", "DL").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_refuses_to_overwrite() {
        let f = fixture().await;
        f.store.create("Acme", "1", "1").await.unwrap();
        // Archiving with deal number "1" also strips it from the id marker, so
        // the target name no longer embeds the id and can collide with a stray
        // directory.
        let stray = f.store.base_path().join("(Архив) Acme (id_)");
        fs::create_dir(&stray).await.unwrap();

        let result = f.store.archive("1", "1").await;
        assert!(matches!(result, Err(StorageError::Conflict(_))));
        assert_eq!(f.store.resolve_all("1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_reports_unreadable_target() {
        let f = fixture().await;
        let created = f.store.create("Acme", "5", "DL-5").await.unwrap();

        // Longer than any filesystem allows, so stat fails with something other
        // than NotFound.
        let too_long = "x".repeat(300);
        let result = f.store.rename_folder(&created, &too_long).await;
        assert!(matches!(result, Err(StorageError::RenameFailed(_))));
        assert!(fs::try_exists(&created).await.unwrap());
    }

    #[tokio::test]
    async fn test_attach_offer_copies_bytes() {
        let f = fixture().await;
        f.store.create("Acme", "42", "DL-1").await.unwrap();

        let staged = f
            .store
            .create_offer(b"%PDF-1.7 offer".to_vec(), "foo.pdf", "ivanov")
            .await
            .unwrap();

        let attached = f.store.attach_offer("42", &staged).await.unwrap();
        assert_eq!(folder_name(&attached), "foo.pdf");
        assert_eq!(
            folder_name(attached.parent().unwrap()),
            OFFER_SUBDIRECTORY
        );
        assert_eq!(fs::read(&attached).await.unwrap(), b"%PDF-1.7 offer");
        // The staging copy stays in place.
        assert!(fs::try_exists(&staged).await.unwrap());
    }

    #[tokio::test]
    async fn test_attach_offer_overwrites_and_recreates_subdirectory() {
        let f = fixture().await;
        let folder = f.store.create("Acme", "42", "DL-1").await.unwrap();
        fs::remove_dir_all(folder.join(OFFER_SUBDIRECTORY)).await.unwrap();

        let v1 = f.store.create_offer(b"v1".to_vec(), "kp.docx", "a").await.unwrap();
        f.store.attach_offer("42", &v1).await.unwrap();
        let v2 = f.store.create_offer(b"v2".to_vec(), "kp.docx", "b").await.unwrap();
        let attached = f.store.attach_offer("42", &v2).await.unwrap();

        assert_eq!(fs::read(&attached).await.unwrap(), b"v2");
    }

    #[tokio::test]
    async fn test_attach_offer_errors() {
        let f = fixture().await;
        let staged = f.store.create_offer(b"x".to_vec(), "a.pdf", "u").await.unwrap();

        assert!(matches!(
            f.store.attach_offer("42", &staged).await,
            Err(StorageError::NotFound(_))
        ));

        f.store.create("Acme", "42", "DL-1").await.unwrap();
        let missing = f.store.offers_root().join("u").join("missing.pdf");
        assert!(matches!(
            f.store.attach_offer("42", &missing).await,
            Err(StorageError::NotFound(_))
        ));

        let outside = tempdir().unwrap();
        let foreign = outside.path().join("foo.pdf");
        fs::write(&foreign, b"secret").await.unwrap();
        assert!(matches!(
            f.store.attach_offer("42", &foreign).await,
            Err(StorageError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_attach_offer_from_extra_source_root() {
        let dir = tempdir().unwrap();
        let inbox = dir.path().join("inbox");
        fs::create_dir(&inbox).await.unwrap();
        let source = inbox.join("foo.pdf");
        fs::write(&source, b"scanned offer").await.unwrap();

        let store = LocalFolderStore::new(dir.path().join("deals"), dir.path().join("offers"), true)
            .await
            .unwrap()
            .with_source_roots([inbox.clone()])
            .await
            .unwrap();
        store.create("Acme", "42", "DL-1").await.unwrap();

        let attached = store.attach_offer("42", &source).await.unwrap();
        assert_eq!(folder_name(&attached), "foo.pdf");
        assert_eq!(
            attached.parent().and_then(Path::file_name),
            Some(std::ffi::OsStr::new(OFFER_SUBDIRECTORY))
        );
        assert_eq!(fs::read(&attached).await.unwrap(), b"scanned offer");

        // The extra root widens attaching only, not downloads.
        assert!(matches!(
            store.read_offer(&source).await,
            Err(StorageError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_with_source_roots_requires_existing_directory() {
        let f = fixture().await;
        let missing = f.store.base_path().with_file_name("missing");
        let result = f.store.clone().with_source_roots([missing]).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));

        let store = f
            .store
            .clone()
            .with_source_roots([f.store.base_path().to_path_buf()])
            .await
            .unwrap();
        assert_eq!(store.source_roots().len(), 2);
    }

    #[tokio::test]
    async fn test_attach_offer_onto_itself_keeps_content() {
        let f = fixture().await;
        f.store.create("Acme", "42", "DL-1").await.unwrap();
        let uploaded = f
            .store
            .attach_offer_bytes("42", "same.pdf", b"keep me".to_vec())
            .await
            .unwrap();

        let again = f.store.attach_offer("42", &uploaded).await.unwrap();
        assert_eq!(again, uploaded);
        assert_eq!(fs::read(&again).await.unwrap(), b"keep me");
    }

    #[tokio::test]
    async fn test_attach_offer_bytes_uses_final_component() {
        let f = fixture().await;
        f.store.create("Acme", "42", "DL-1").await.unwrap();

        let path = f
            .store
            .attach_offer_bytes("42", "../../etc/offer.pdf", b"data".to_vec())
            .await
            .unwrap();
        assert_eq!(folder_name(&path), "offer.pdf");
        assert!(path.starts_with(f.store.base_path()));
    }

    #[tokio::test]
    async fn test_create_offer_writes_staging_file() {
        let f = fixture().await;

        let first = f
            .store
            .create_offer(b"first".to_vec(), "КП.pdf", "petrov")
            .await
            .unwrap();
        assert_eq!(first, f.store.offers_root().join("petrov").join("КП.pdf"));

        let second = f
            .store
            .create_offer(b"second".to_vec(), "КП.pdf", "petrov")
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read(&second).await.unwrap(), b"second");

        let mut entries = fs::read_dir(f.store.offers_root().join("petrov")).await.unwrap();
        let mut count = 0;
        while let Some(entry) = entries.next_entry().await.unwrap() {
            assert!(!is_temp_file(&entry.file_name().to_string_lossy()));
            count += 1;
        }
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_create_offer_rejects_bad_login() {
        let f = fixture().await;
        for login in ["", "..", "a/b"] {
            let result = f.store.create_offer(b"x".to_vec(), "a.pdf", login).await;
            assert!(matches!(result, Err(StorageError::InvalidName(_))), "{login}");
        }
    }

    #[tokio::test]
    async fn test_read_offer() {
        let f = fixture().await;
        let path = f
            .store
            .create_offer(b"offer body".to_vec(), "a.pdf", "u")
            .await
            .unwrap();

        assert_eq!(f.store.read_offer(&path).await.unwrap(), b"offer body");

        let missing = f.store.offers_root().join("u").join("b.pdf");
        assert!(matches!(
            f.store.read_offer(&missing).await,
            Err(StorageError::NotFound(_))
        ));

        // Directories are not offers.
        assert!(matches!(
            f.store.read_offer(&f.store.offers_root().join("u")).await,
            Err(StorageError::NotFound(_))
        ));

        let traversal = f.store.offers_root().join("u").join("..").join("..");
        assert!(matches!(
            f.store.read_offer(&traversal.join("outside.txt")).await,
            Err(StorageError::NotFound(_)) | Err(StorageError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_read_offer_outside_roots_is_forbidden() {
        let f = fixture().await;
        let outside = tempdir().unwrap();
        let foreign = outside.path().join("x.pdf");
        fs::write(&foreign, b"x").await.unwrap();

        assert!(matches!(
            f.store.read_offer(&foreign).await,
            Err(StorageError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_open_offer_streams_content() {
        let f = fixture().await;
        let folder = f.store.create("Acme", "42", "DL-1").await.unwrap();
        let data = vec![7u8; 200_000];
        let path = f
            .store
            .attach_offer_bytes("42", "big.bin", data.clone())
            .await
            .unwrap();
        assert!(path.starts_with(&folder));

        let mut offer = f.store.open_offer(&path).await.unwrap();
        assert_eq!(offer.file_name, "big.bin");
        assert_eq!(offer.size, data.len() as u64);

        let mut downloaded = Vec::new();
        while let Some(chunk) = offer.stream.next().await {
            downloaded.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(downloaded, data);
    }

    #[tokio::test]
    async fn test_new_without_creating_missing_roots() {
        let dir = tempdir().unwrap();
        let result =
            LocalFolderStore::new(dir.path().join("nope"), dir.path().join("offers"), false).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_new_rejects_nested_roots() {
        let dir = tempdir().unwrap();
        let deals = dir.path().join("deals");

        // Only equal once `..` is resolved.
        let offers = deals.join("..").join("deals").join("offers");
        let result = LocalFolderStore::new(&deals, &offers, true).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));

        let result = LocalFolderStore::new(deals.join("offers"), &deals, true).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_health_check() {
        let f = fixture().await;
        assert!(f.store.health_check().await.is_ok());
    }
}

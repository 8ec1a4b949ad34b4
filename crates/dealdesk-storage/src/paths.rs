//! Path helpers shared by the folder store.

use crate::traits::StorageError;
use dealdesk_core::constants::{TEMP_FILE_PREFIX, TEMP_FILE_SUFFIX};
use dealdesk_core::naming;
use glob::Pattern;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Glob matching any entry name that embeds `(id_<company_id>)`.
///
/// The marker is escaped, so `*`, `?` and `[` inside an id match literally.
pub fn id_pattern(company_id: &str) -> Result<Pattern, StorageError> {
    let marker = Pattern::escape(&naming::id_marker(company_id));
    Pattern::new(&format!("*{}*", marker))
        .map_err(|e| StorageError::InvalidName(format!("Invalid company id pattern: {}", e)))
}

/// Hidden, unique sibling used as the write target before the final rename.
pub fn temp_sibling(dir: &Path) -> PathBuf {
    dir.join(format!(
        "{}{}{}",
        TEMP_FILE_PREFIX,
        Uuid::new_v4(),
        TEMP_FILE_SUFFIX
    ))
}

/// Whether `path` is one of our in-flight temporary files.
pub fn is_temp_file(name: &str) -> bool {
    name.starts_with(TEMP_FILE_PREFIX) && name.ends_with(TEMP_FILE_SUFFIX)
}

/// Whether an already canonicalized path lies inside one of the canonical roots.
pub fn is_within(path: &Path, roots: &[PathBuf]) -> bool {
    roots.iter().any(|root| path.starts_with(root))
}

/// Map an I/O failure, keeping permission problems distinguishable.
pub fn io_failure(
    wrap: fn(String) -> StorageError,
    context: impl std::fmt::Display,
    err: io::Error,
) -> StorageError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => {
            StorageError::PermissionDenied(format!("{}: {}", context, err))
        }
        _ => wrap(format!("{}: {}", context, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_pattern_matches_embedded_marker() {
        let pattern = id_pattern("42").unwrap();
        assert!(pattern.matches("DL-1 Acme (id_42)"));
        assert!(pattern.matches("(Архив) Acme (id_42)"));
        assert!(pattern.matches("DL-1 Acme (id_42) copy"));
        assert!(!pattern.matches("DL-1 Acme (id_420)"));
        assert!(!pattern.matches("DL-1 Acme id_42"));
    }

    #[test]
    fn test_id_pattern_escapes_metacharacters() {
        let pattern = id_pattern("4*").unwrap();
        assert!(pattern.matches("X (id_4*)"));
        assert!(!pattern.matches("X (id_42)"));

        let pattern = id_pattern("[a]").unwrap();
        assert!(pattern.matches("X (id_[a])"));
        assert!(!pattern.matches("X (id_a)"));
    }

    #[test]
    fn test_temp_sibling_is_hidden_and_unique() {
        let dir = Path::new("/srv/offers/ivanov");
        let a = temp_sibling(dir);
        let b = temp_sibling(dir);
        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(dir));
        let name = a.file_name().unwrap().to_str().unwrap();
        assert!(is_temp_file(name));
    }

    #[test]
    fn test_is_within() {
        let roots = vec![PathBuf::from("/srv/deals"), PathBuf::from("/srv/offers")];
        assert!(is_within(Path::new("/srv/offers/u/a.pdf"), &roots));
        assert!(!is_within(Path::new("/srv/offers-evil/a.pdf"), &roots));
        assert!(!is_within(Path::new("/etc/passwd"), &roots));
    }

    #[test]
    fn test_io_failure_keeps_permission_denied() {
        let err = io_failure(
            StorageError::DeleteFailed,
            "remove",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, StorageError::PermissionDenied(_)));

        let err = io_failure(StorageError::DeleteFailed, "remove", io::Error::other("x"));
        assert!(matches!(err, StorageError::DeleteFailed(_)));
    }
}

//! Validation of caller-supplied name components
//!
//! Company ids, company names, deal numbers, user logins and file names all end
//! up as (parts of) single path components. Anything that could split or escape
//! a component is rejected before it reaches the filesystem.

use crate::error::AppError;
use std::path::Path;

/// Characters that may never appear in a path component.
const FORBIDDEN_CHARS: [char; 3] = ['/', '\\', '\0'];

/// Validate text that becomes part of a folder or file name.
///
/// Empty values are allowed here; callers that need a value use
/// [`validate_required_component`].
pub fn validate_name_component(field: &str, value: &str) -> Result<(), AppError> {
    if let Some(c) = value.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(AppError::InvalidInput(format!(
            "{} must not contain {:?}",
            field, c
        )));
    }
    if value == "." || value == ".." {
        return Err(AppError::InvalidInput(format!(
            "{} must not be '{}'",
            field, value
        )));
    }
    Ok(())
}

/// Like [`validate_name_component`], but the trimmed value must be non-empty.
pub fn validate_required_component(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{} must not be empty", field)));
    }
    validate_name_component(field, value)
}

/// Company ids are embedded as `(id_<company_id>)`, so they cannot carry
/// parentheses of their own.
pub fn validate_company_id(company_id: &str) -> Result<(), AppError> {
    validate_required_component("company_id", company_id)?;
    if company_id.contains('(') || company_id.contains(')') {
        return Err(AppError::InvalidInput(
            "company_id must not contain parentheses".to_string(),
        ));
    }
    Ok(())
}

/// Reduce an uploaded file name to its final path component.
///
/// Directory portions are discarded; names that reduce to nothing (or to `.`
/// / `..`) are rejected.
pub fn sanitize_file_name(file_name: &str) -> Result<String, AppError> {
    // Treat backslashes as separators too; browsers on Windows send full paths.
    let normalized = file_name.replace('\\', "/");
    let base = Path::new(&normalized)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.trim().is_empty() && *s != "." && *s != "..")
        .ok_or_else(|| {
            AppError::InvalidInput(format!("Invalid file name: '{}'", file_name))
        })?;
    validate_name_component("file_name", base)?;
    Ok(base.to_string())
}

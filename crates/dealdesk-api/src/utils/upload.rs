//! Common utilities for the commercial offer upload handlers

use axum::extract::Multipart;
use dealdesk_core::AppError;
use std::collections::HashMap;

/// A file part received in a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

/// A parsed multipart form: at most one `file` part plus plain text fields.
#[derive(Debug, Default)]
pub struct OfferForm {
    pub file: Option<UploadedFile>,
    fields: HashMap<String, String>,
}

impl OfferForm {
    /// Trimmed value of a text field, `None` when absent or blank.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Like [`field`](Self::field) but a missing value is a 400.
    pub fn required_field(&self, name: &str) -> Result<&str, AppError> {
        self.field(name)
            .ok_or_else(|| AppError::InvalidInput(format!("Missing form field '{}'", name)))
    }

    /// The `file` part; a missing part is a 400.
    pub fn take_file(&mut self) -> Result<UploadedFile, AppError> {
        self.file
            .take()
            .ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))
    }
}

/// Read the whole multipart form.
/// Only one field named "file" is accepted; multiple file fields are rejected.
pub async fn extract_offer_form(
    mut multipart: Multipart,
    max_size: usize,
) -> Result<OfferForm, AppError> {
    let mut form = OfferForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == "file" {
            if form.file.is_some() {
                return Err(AppError::InvalidInput(
                    "Multiple file fields are not allowed; send exactly one field named 'file'"
                        .to_string(),
                ));
            }
            let file_name = field
                .file_name()
                .map(|s: &str| s.to_string())
                .ok_or_else(|| {
                    AppError::InvalidInput("The 'file' part has no file name".to_string())
                })?;
            let content_type = field
                .content_type()
                .map(|s: &str| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;
            validate_file_size(data.len(), max_size)?;

            form.file = Some(UploadedFile {
                data: data.to_vec(),
                file_name,
                content_type,
            });
        } else if !field_name.is_empty() {
            let value = field.text().await.map_err(|e| {
                AppError::InvalidInput(format!("Failed to read field '{}': {}", field_name, e))
            })?;
            form.fields.insert(field_name, value);
        }
    }

    Ok(form)
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_size() {
        assert!(validate_file_size(10, 10).is_ok());
        assert!(matches!(
            validate_file_size(11, 10),
            Err(AppError::PayloadTooLarge(_))
        ));
    }

    #[test]
    fn test_form_fields_are_trimmed() {
        let mut form = OfferForm::default();
        form.fields.insert("company_id".to_string(), " 42 ".to_string());
        form.fields.insert("user_login".to_string(), "   ".to_string());

        assert_eq!(form.field("company_id"), Some("42"));
        assert_eq!(form.field("user_login"), None);
        assert!(form.required_field("user_login").is_err());
        assert!(form.take_file().is_err());
    }
}

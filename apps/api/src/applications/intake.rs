//! Multipart intake for the application form: field collection and the
//! validation the browser form applies, re-checked server-side.

use std::collections::BTreeMap;

use axum::extract::multipart::{Field, Multipart};
use bytes::Bytes;

use crate::errors::AppError;
use crate::sanitize;

pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// The application form as received.
#[derive(Debug, Default)]
pub struct ApplyForm {
    pub job_id: String,
    pub job_title: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub why: String,
    pub resume: Option<ResumeUpload>,
}

#[derive(Debug)]
pub struct ResumeUpload {
    pub original_name: String,
    pub data: Bytes,
}

/// Drains the multipart stream into an `ApplyForm`. Unknown fields are
/// ignored.
pub async fn read_form(mut multipart: Multipart) -> Result<ApplyForm, AppError> {
    let mut form = ApplyForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "jobId" => form.job_id = text(field).await?,
            "jobTitle" => form.job_title = text(field).await?,
            "fullName" => form.full_name = text(field).await?,
            "email" => form.email = text(field).await?,
            "phone" => form.phone = text(field).await?,
            "why" => form.why = text(field).await?,
            // older revisions of the form posted the message as `comments`
            "comments" => {
                let value = text(field).await?;
                if form.why.is_empty() {
                    form.why = value;
                }
            }
            "resume" => {
                let original_name = field.file_name().map(String::from).unwrap_or_default();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Read error: {e}")))?;
                form.resume = Some(ResumeUpload {
                    original_name,
                    data,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn text(field: Field<'_>) -> Result<String, AppError> {
    let raw = field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Read error: {e}")))?;
    Ok(sanitize::strip(&raw))
}

/// Validates the form, collecting every failure into one field map.
pub fn validate(form: &ApplyForm) -> Result<(), AppError> {
    let mut errors = BTreeMap::new();

    if form.full_name.is_empty() {
        errors.insert("fullName".to_string(), "Full name is required".to_string());
    }
    if form.email.is_empty() || !is_email(&form.email) {
        errors.insert("email".to_string(), "Valid email is required".to_string());
    }
    if form.phone.is_empty() || !is_ten_digit_phone(&form.phone) {
        errors.insert("phone".to_string(), "Phone must be 10 digits".to_string());
    }
    if form.why.is_empty() {
        errors.insert("why".to_string(), "Comments are required".to_string());
    }
    match &form.resume {
        None => {
            errors.insert("resume".to_string(), "Resume file is required".to_string());
        }
        Some(upload) => {
            if !has_allowed_extension(&upload.original_name) {
                errors.insert(
                    "resume".to_string(),
                    "Only PDF, DOC, or DOCX files are allowed.".to_string(),
                );
            } else if upload.data.len() > MAX_RESUME_BYTES {
                errors.insert("resume".to_string(), "File too large. Max 5 MB.".to_string());
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationFields(errors))
    }
}

/// The form's check: one `@`, no whitespace, a dot inside the domain.
fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn is_ten_digit_phone(value: &str) -> bool {
    value.chars().count() == 10 && value.chars().all(|c| c.is_ascii_digit())
}

fn has_allowed_extension(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

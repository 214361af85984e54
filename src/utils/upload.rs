// src/utils/upload.rs

use std::path::Path;

use axum::extract::Multipart;

use crate::{config::ALLOWED_IMAGE_EXTENSIONS, error::AppError};

/// An image read from a multipart request.
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// True when the filename has one of the allowed image extensions.
pub fn is_allowed_image(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            ALLOWED_IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Keeps ASCII alphanumerics, `.`, `_` and `-`; never returns a path.
pub fn sanitized_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '_' || *c == '-')
        .collect();
    let sanitized = sanitized.trim_start_matches('.');

    if sanitized.is_empty() {
        "upload".to_string()
    } else {
        sanitized.to_string()
    }
}

/// Reads the named file field, enforcing the size cap and the extension list.
pub async fn read_image_field(
    multipart: &mut Multipart,
    field_name: &str,
    max_bytes: usize,
) -> Result<ImageUpload, AppError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Invalid multipart data".to_string()))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("File name is required".to_string()))?;
        if !is_allowed_image(&filename) {
            return Err(AppError::BadRequest(format!(
                "Only {} images are allowed",
                ALLOWED_IMAGE_EXTENSIONS.join(", ")
            )));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|_| AppError::BadRequest("Failed to read file".to_string()))?
        {
            if bytes.len() + chunk.len() > max_bytes {
                return Err(AppError::BadRequest(format!(
                    "File size exceeds {} bytes",
                    max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        return Ok(ImageUpload { filename, bytes });
    }

    Err(AppError::BadRequest(format!("Field '{}' is required", field_name)))
}

/// Writes the upload under `dir` and returns the stored filename.
pub async fn store(dir: &Path, stored_name: &str, bytes: &[u8]) -> Result<String, AppError> {
    let stored_name = sanitized_filename(stored_name);

    tokio::fs::write(dir.join(&stored_name), bytes)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store upload {}: {:?}", stored_name, e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(stored_name)
}

/// Deletes a previously stored upload. Failures are only logged.
pub async fn remove_upload(dir: &Path, stored_name: &str) {
    let path = dir.join(sanitized_filename(stored_name));
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!("Failed to remove old upload {}: {:?}", path.display(), e);
    }
}

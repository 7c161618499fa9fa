use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::extract::Multipart;
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;

/// Hard cap on the image payload; the route's body limit sits slightly
/// above this to leave room for multipart framing.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const FILE_FIELD: &str = "foodImage";

/// A spooled upload that owns its on-disk temp file.
///
/// The file is removed when the guard drops, whichever way the request
/// ends. A failed removal is logged and never surfaces to the caller.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub(crate) fn from_path(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to remove temp upload")
            }
        }
    }
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        _ => None,
    }
}

/// Pull the `foodImage` field out of a multipart body and spool it to
/// `dir`. Returns `None` when the request carried no file field.
pub async fn store_food_image(
    mut multipart: Multipart,
    dir: &Path,
) -> Result<Option<TempUpload>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart form data: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or("").to_string();
        let Some(ext) = ext_from_mime(&content_type) else {
            return Err(ApiError::Validation(
                "Only .jpeg, .jpg and .png formats are allowed".into(),
            ));
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Invalid multipart form data: {e}")))?;
        if data.len() > MAX_IMAGE_BYTES {
            return Err(ApiError::Validation(
                "Image exceeds the 5MB size limit".into(),
            ));
        }

        tokio::fs::create_dir_all(dir)
            .await
            .context("create upload dir")?;

        let path = dir.join(format!("{}.{}", Uuid::new_v4(), ext));
        tokio::fs::write(&path, &data)
            .await
            .with_context(|| format!("spool upload to {}", path.display()))?;

        return Ok(Some(TempUpload { path }));
    }

    Ok(None)
}

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::CloudinaryConfig;

/// Turns a local image file into a durable public URL.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload_image(&self, path: &Path) -> anyhow::Result<String>;
}

/// Unsigned-preset uploads against the Cloudinary HTTP API.
pub struct CloudinaryHost {
    http: reqwest::Client,
    upload_url: String,
    upload_preset: String,
    folder: String,
}

#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: String,
}

impl CloudinaryHost {
    pub fn new(config: &CloudinaryConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build cloudinary http client")?;
        Ok(Self {
            http,
            upload_url: format!(
                "https://api.cloudinary.com/v1_1/{}/image/upload",
                config.cloud_name
            ),
            upload_preset: config.upload_preset.clone(),
            folder: config.folder.clone(),
        })
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload_image(&self, path: &Path) -> anyhow::Result<String> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("read upload {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".into());

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            )
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", self.folder.clone());

        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .context("cloudinary upload request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("cloudinary upload failed with {status}: {body}");
        }

        let parsed: CloudinaryUploadResponse = response
            .json()
            .await
            .context("decode cloudinary upload response")?;
        Ok(parsed.secure_url)
    }
}

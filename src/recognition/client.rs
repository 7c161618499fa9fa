use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;

use super::{FoodRecognizer, RecognitionFailure};
use crate::config::RecognitionConfig;

/// Spoonacular's image-analysis endpoint, called once per request with the
/// spooled upload's bytes. No retries.
pub struct SpoonacularClient {
    http: reqwest::Client,
    analyze_url: String,
    api_key: String,
}

impl SpoonacularClient {
    pub fn new(config: &RecognitionConfig) -> anyhow::Result<Self> {
        anyhow::ensure!(!config.api_key.is_empty(), "recognition api key is empty");
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build spoonacular http client")?;
        Ok(Self {
            http,
            analyze_url: format!(
                "{}/food/images/analyze",
                config.base_url.trim_end_matches('/')
            ),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl FoodRecognizer for SpoonacularClient {
    async fn analyze_image(&self, path: &Path) -> Result<Value, RecognitionFailure> {
        let transport = |detail: String| RecognitionFailure {
            status: None,
            detail,
        };

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| transport(format!("read upload {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".into());

        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(bytes).file_name(file_name),
        );

        let response = self
            .http
            .post(&self.analyze_url)
            .query(&[("apiKey", self.api_key.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RecognitionFailure {
                status: Some(status.as_u16()),
                detail,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| transport(format!("decode response: {e}")))
    }
}

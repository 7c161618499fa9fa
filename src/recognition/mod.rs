mod client;
pub mod parse;

pub use client::SpoonacularClient;

use std::fmt;
use std::path::Path;

use async_trait::async_trait;

/// Failure talking to the recognition service. `status` carries the
/// upstream HTTP status when one was received.
#[derive(Debug, Clone)]
pub struct RecognitionFailure {
    pub status: Option<u16>,
    pub detail: String,
}

impl fmt::Display for RecognitionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "recognition service returned {}: {}", status, self.detail),
            None => write!(f, "recognition service unreachable: {}", self.detail),
        }
    }
}

impl std::error::Error for RecognitionFailure {}

/// Classifies a food image and returns the service's raw JSON verdict.
/// The verdict's shape varies; see [`parse`] for the decoding rules.
#[async_trait]
pub trait FoodRecognizer: Send + Sync {
    async fn analyze_image(&self, path: &Path) -> Result<serde_json::Value, RecognitionFailure>;
}

use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    pub folder: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub cloudinary: CloudinaryConfig,
    pub recognition: RecognitionConfig,
    /// Directory uploaded food images are spooled to before the external
    /// calls run. Created on demand.
    pub upload_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "nutrilog".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "nutrilog-users".into()),
        };
        let cloudinary = CloudinaryConfig {
            cloud_name: std::env::var("CLOUDINARY_CLOUD_NAME")
                .context("CLOUDINARY_CLOUD_NAME must be set")?,
            upload_preset: std::env::var("CLOUDINARY_UPLOAD_PRESET")
                .context("CLOUDINARY_UPLOAD_PRESET must be set")?,
            folder: std::env::var("CLOUDINARY_FOLDER").unwrap_or_else(|_| "food_logs".into()),
        };
        // A missing recognition credential is a startup failure, never a
        // per-request one.
        let recognition = RecognitionConfig {
            api_key: std::env::var("SPOONACULAR_API_KEY")
                .context("SPOONACULAR_API_KEY must be set")?,
            base_url: std::env::var("SPOONACULAR_BASE_URL")
                .unwrap_or_else(|_| "https://api.spoonacular.com".into()),
        };
        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("temp_food_uploads"));

        Ok(Self {
            database_url,
            jwt,
            cloudinary,
            recognition,
            upload_dir,
        })
    }
}

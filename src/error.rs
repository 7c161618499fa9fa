use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::recognition::parse::ExtractError;

/// Every user-visible failure maps to exactly one of these kinds; each kind
/// carries one HTTP status and a stable message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No image file uploaded. Please upload an image.")]
    NoFile,

    #[error("Failed to upload image to Cloudinary.")]
    ImageHost(#[source] anyhow::Error),

    /// `status` is the upstream HTTP status when the recognition service
    /// answered with one; otherwise the response is a 502.
    #[error("Failed to analyze image with Spoonacular.")]
    Recognition { status: Option<u16>, detail: String },

    #[error("Could not extract food data from Spoonacular response. Unexpected format.")]
    UnrecognizedFood,

    #[error("Spoonacular API did not return essential food name or calorie data.")]
    MissingFoodData,

    #[error("{0}")]
    Validation(String),

    #[error("Food log not found")]
    NotFound,

    #[error("User not authorized to delete this log")]
    Forbidden,

    #[error("Invalid date format provided for filtering.")]
    InvalidDate,

    #[error("Server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoFile
            | ApiError::MissingFoodData
            | ApiError::Validation(_)
            | ApiError::InvalidDate => StatusCode::BAD_REQUEST,
            ApiError::ImageHost(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Recognition { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            ApiError::UnrecognizedFood => StatusCode::BAD_GATEWAY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl From<ExtractError> for ApiError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::UnrecognizedShape => ApiError::UnrecognizedFood,
            ExtractError::MissingEssentials => ApiError::MissingFoodData,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::ImageHost(source) => json!({
                "message": self.to_string(),
                "details": source.to_string(),
            }),
            ApiError::Recognition { detail, .. } => json!({
                "message": self.to_string(),
                "details": detail,
            }),
            // Detail is logged, never leaked.
            ApiError::Internal(source) => {
                error!(error = %source, "unhandled server error");
                json!({ "message": self.to_string() })
            }
            _ => json!({ "message": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognition_error_uses_upstream_status_when_present() {
        let err = ApiError::Recognition {
            status: Some(502),
            detail: "rate limited".into(),
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);

        let err = ApiError::Recognition {
            status: Some(429),
            detail: "rate limited".into(),
        };
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn recognition_error_falls_back_to_bad_gateway() {
        let err = ApiError::Recognition {
            status: None,
            detail: "connection refused".into(),
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);

        // An out-of-range upstream code also falls back.
        let err = ApiError::Recognition {
            status: Some(99),
            detail: "garbage".into(),
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn status_mapping_is_stable() {
        assert_eq!(ApiError::NoFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::ImageHost(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::UnrecognizedFood.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ApiError::MissingFoodData.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Validation("Food name and calories are required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::InvalidDate.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn user_facing_messages_are_contract_preserving() {
        assert_eq!(
            ApiError::ImageHost(anyhow::anyhow!("401")).to_string(),
            "Failed to upload image to Cloudinary."
        );
        assert_eq!(
            ApiError::NoFile.to_string(),
            "No image file uploaded. Please upload an image."
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("secret detail")).to_string(),
            "Server error"
        );
    }

    #[test]
    fn extract_errors_map_to_their_kinds() {
        assert!(matches!(
            ApiError::from(ExtractError::UnrecognizedShape),
            ApiError::UnrecognizedFood
        ));
        assert!(matches!(
            ApiError::from(ExtractError::MissingEssentials),
            ApiError::MissingFoodData
        ));
    }
}

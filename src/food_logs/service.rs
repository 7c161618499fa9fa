use tracing::{info, instrument};
use uuid::Uuid;

use super::model::{FoodLog, MealType, NewFoodLog};
use super::repo;
use crate::error::ApiError;
use crate::recognition::parse;
use crate::state::AppState;
use crate::uploads::TempUpload;

/// One uploaded image in, one persisted food log out.
///
/// Coordinates the image host, the recognition service, and the store,
/// sequentially and each at most once. The temp file travels as a guard
/// owned by this function; whichever way it returns, dropping the guard
/// removes the file exactly once, with no per-branch deletion.
#[instrument(skip(state, upload))]
pub async fn detect_and_log(
    state: &AppState,
    user_id: Uuid,
    upload: Option<TempUpload>,
) -> Result<FoodLog, ApiError> {
    let upload = upload.ok_or(ApiError::NoFile)?;

    // Host upload runs first so the durable URL exists before recognition
    // can fail.
    let image_url = state
        .image_host
        .upload_image(upload.path())
        .await
        .map_err(ApiError::ImageHost)?;

    let verdict = state
        .recognizer
        .analyze_image(upload.path())
        .await
        .map_err(|e| ApiError::Recognition {
            status: e.status,
            detail: e.detail,
        })?;

    let food = parse::extract_detected_food(&verdict)?;

    let entry = NewFoodLog {
        user_id,
        food_name: food.food_name,
        calories: food.calories,
        protein: food.protein.unwrap_or(0.0),
        carbs: food.carbs.unwrap_or(0.0),
        fats: food.fats.unwrap_or(0.0),
        image_url: Some(image_url),
        meal_type: MealType::default(),
        eaten_at: None,
    };
    entry.validate().map_err(ApiError::Validation)?;

    let saved = repo::insert(&state.db, entry).await?;
    info!(food_log_id = %saved.id, food_name = %saved.food_name, "food detected and logged");
    Ok(saved)
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::model::{FoodLog, MealType};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodLogRequest {
    pub food_name: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
    pub meal_type: Option<MealType>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub eaten_at: Option<OffsetDateTime>,
    pub image_url: Option<String>,
}

/// `startDate`/`endDate` come in as `YYYY-MM-DD`; parsing happens in the
/// handler so a bad value maps to the date error, not a query rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieSummary {
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fats: f64,
    pub log_count: usize,
}

impl CalorieSummary {
    /// Fold entries into day totals. Absent macros were stored as zero, so
    /// a plain sum is enough.
    pub fn from_entries(entries: &[FoodLog]) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            summary.total_calories += entry.calories;
            summary.total_protein += entry.protein;
            summary.total_carbs += entry.carbs;
            summary.total_fats += entry.fats;
        }
        summary.log_count = entries.len();
        summary
    }
}

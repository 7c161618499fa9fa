use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Meal buckets accepted at write time; anything else is rejected when the
/// request body is decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "meal_type")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    #[default]
    Snack,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FoodLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub image_url: Option<String>,
    pub meal_type: MealType,
    #[serde(with = "time::serde::rfc3339")]
    pub eaten_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Field values for an entry about to be inserted. Ownership is fixed here
/// and immutable afterwards.
#[derive(Debug)]
pub struct NewFoodLog {
    pub user_id: Uuid,
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub image_url: Option<String>,
    pub meal_type: MealType,
    /// `None` means "now", applied store-side.
    pub eaten_at: Option<OffsetDateTime>,
}

impl NewFoodLog {
    /// Entry-level validation shared by the manual and detection paths.
    pub fn validate(&self) -> Result<(), String> {
        if self.food_name.trim().is_empty() {
            return Err("Food name and calories are required".into());
        }
        if !self.calories.is_finite() || self.calories < 0.0 {
            return Err("Calories must be a non-negative number".into());
        }
        for (label, value) in [
            ("Protein", self.protein),
            ("Carbs", self.carbs),
            ("Fats", self.fats),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{label} must be a non-negative number"));
            }
        }
        Ok(())
    }
}

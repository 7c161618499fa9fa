//! Decoding of the recognition service's variable-shaped responses.
//!
//! The service has been observed to answer in three shapes. Each shape gets
//! its own candidate decoder; decoders are tried in a fixed priority order,
//! the first whose structure is present wins, and only then are the
//! essential fields checked.

use serde_json::Value;

/// Normalized recognition result.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedFood {
    pub food_name: String,
    pub calories: f64,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
}

/// Why a response could not be turned into a [`DetectedFood`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractError {
    /// None of the known shapes matched.
    UnrecognizedShape,
    /// A shape matched but the food name or calorie value was missing.
    MissingEssentials,
}

/// Fields a shape decoder managed to pull out before the essential check.
struct Candidate {
    food_name: Option<String>,
    calories: Option<f64>,
    protein: Option<f64>,
    carbs: Option<f64>,
    fats: Option<f64>,
}

pub fn extract_detected_food(value: &Value) -> Result<DetectedFood, ExtractError> {
    let candidate = decode_category_nutrition(value)
        .or_else(|| decode_results_list(value))
        .or_else(|| decode_flat_pair(value))
        .ok_or(ExtractError::UnrecognizedShape)?;

    let food_name = candidate
        .food_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    match (food_name, candidate.calories) {
        (Some(food_name), Some(calories)) => Ok(DetectedFood {
            food_name,
            calories,
            protein: candidate.protein,
            carbs: candidate.carbs,
            fats: candidate.fats,
        }),
        _ => Err(ExtractError::MissingEssentials),
    }
}

/// `{ category: { name }, nutrition: { calories: { value }, ... } }`
fn decode_category_nutrition(value: &Value) -> Option<Candidate> {
    let category = value.get("category").filter(|v| !v.is_null())?;
    let nutrition = value.get("nutrition").filter(|v| !v.is_null())?;
    let nested = |field: &str| {
        nutrition
            .get(field)
            .and_then(|v| v.get("value"))
            .and_then(as_number)
    };
    Some(Candidate {
        food_name: category.get("name").and_then(as_string),
        calories: nested("calories"),
        protein: nested("protein"),
        carbs: nested("carbs"),
        // upstream names this field "fat"
        fats: nested("fat"),
    })
}

/// `{ results: [ { name, calories }, ... ] }`. The first element wins; this
/// shape carries no macro breakdown.
fn decode_results_list(value: &Value) -> Option<Candidate> {
    let first = value.get("results")?.as_array()?.first()?;
    Some(Candidate {
        food_name: first.get("name").and_then(as_string),
        calories: first.get("calories").and_then(as_number),
        protein: None,
        carbs: None,
        fats: None,
    })
}

/// `{ annotation, calories }`
fn decode_flat_pair(value: &Value) -> Option<Candidate> {
    let annotation = value.get("annotation")?;
    let calories = value.get("calories")?;
    Some(Candidate {
        food_name: as_string(annotation),
        calories: as_number(calories),
        protein: None,
        carbs: None,
        fats: None,
    })
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// The service is loose about numeric types; accept JSON numbers and
/// numeric strings.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

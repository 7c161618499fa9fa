use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use time::macros::{format_description, time};
use time::{Date, OffsetDateTime};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::AuthUser, error::ApiError, state::AppState, uploads};

use super::dto::{CalorieSummary, CreateFoodLogRequest, ListQuery, MessageResponse};
use super::model::{FoodLog, NewFoodLog};
use super::{repo, service};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/calories", get(list_food_logs))
        .route("/calories/summary/today", get(today_summary))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/calories", post(add_food_log))
        .route("/calories/detect", post(detect_food))
        .route("/calories/:id", delete(delete_food_log))
        // 5MB image plus multipart framing
        .layer(DefaultBodyLimit::max(6 * 1024 * 1024))
}

#[instrument(skip(state, payload))]
pub async fn add_food_log(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateFoodLogRequest>,
) -> Result<(StatusCode, Json<FoodLog>), ApiError> {
    let food_name = payload
        .food_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let (food_name, calories) = match (food_name, payload.calories) {
        (Some(name), Some(calories)) => (name, calories),
        _ => {
            return Err(ApiError::Validation(
                "Food name and calories are required".into(),
            ))
        }
    };

    let entry = NewFoodLog {
        user_id,
        food_name,
        calories,
        protein: payload.protein.unwrap_or(0.0),
        carbs: payload.carbs.unwrap_or(0.0),
        fats: payload.fats.unwrap_or(0.0),
        image_url: payload.image_url,
        meal_type: payload.meal_type.unwrap_or_default(),
        eaten_at: payload.eaten_at,
    };
    entry.validate().map_err(ApiError::Validation)?;

    let saved = repo::insert(&state.db, entry).await?;
    info!(food_log_id = %saved.id, "food log created");
    Ok((StatusCode::CREATED, Json(saved)))
}

#[instrument(skip(state))]
pub async fn list_food_logs(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<FoodLog>>, ApiError> {
    let from = query
        .start_date
        .as_deref()
        .map(parse_day)
        .transpose()?
        .map(start_of_day);
    let to = query
        .end_date
        .as_deref()
        .map(parse_day)
        .transpose()?
        .map(end_of_day);

    let rows = repo::list_by_user(&state.db, user_id, from, to).await?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn delete_food_log(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let entry = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    if entry.user_id != user_id {
        return Err(ApiError::Forbidden);
    }

    repo::delete_by_id(&state.db, id).await?;
    info!(food_log_id = %id, "food log deleted");
    Ok(Json(MessageResponse {
        message: "Food log deleted successfully".into(),
    }))
}

/// POST /calories/detect (multipart, one `foodImage` file field)
#[instrument(skip(state, multipart))]
pub async fn detect_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<FoodLog>), ApiError> {
    let upload = uploads::store_food_image(multipart, &state.config.upload_dir).await?;
    let saved = service::detect_and_log(&state, user_id, upload).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

#[instrument(skip(state))]
pub async fn today_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<CalorieSummary>, ApiError> {
    let today = OffsetDateTime::now_utc().date();
    let rows = repo::list_by_user(
        &state.db,
        user_id,
        Some(start_of_day(today)),
        Some(end_of_day(today)),
    )
    .await?;
    Ok(Json(CalorieSummary::from_entries(&rows)))
}

fn parse_day(raw: &str) -> Result<Date, ApiError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(raw, &format).map_err(|_| ApiError::InvalidDate)
}

/// Inclusive lower bound of a calendar day.
fn start_of_day(day: Date) -> OffsetDateTime {
    day.midnight().assume_utc()
}

/// Inclusive upper bound of a calendar day, millisecond precision.
fn end_of_day(day: Date) -> OffsetDateTime {
    day.with_time(time!(23:59:59.999)).assume_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food_logs::model::MealType;
    use time::macros::date;

    #[test]
    fn parses_iso_dates() {
        let day = parse_day("2023-01-02").expect("parse");
        assert_eq!(day, date!(2023 - 01 - 02));
    }

    #[test]
    fn rejects_malformed_dates() {
        for raw in ["01-01-2023", "2023-13-40", "yesterday", "2023/01/01", ""] {
            assert!(
                matches!(parse_day(raw), Err(ApiError::InvalidDate)),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn day_bounds_are_inclusive_edges() {
        let day = date!(2023 - 06 - 15);
        let start = start_of_day(day);
        let end = end_of_day(day);

        assert_eq!(start.time(), time!(00:00:00));
        assert_eq!(end.time(), time!(23:59:59.999));
        assert_eq!(end.millisecond(), 999);
        assert!(start < end);
        assert_eq!(start.date(), end.date());
    }

    fn entry(calories: f64, protein: f64, carbs: f64, fats: f64) -> FoodLog {
        let now = OffsetDateTime::now_utc();
        FoodLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            food_name: "Apple".into(),
            calories,
            protein,
            carbs,
            fats,
            image_url: None,
            meal_type: MealType::Snack,
            eaten_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn summary_sums_every_field() {
        let entries = vec![
            entry(95.0, 0.5, 25.0, 0.25),
            entry(300.0, 12.5, 30.0, 18.0),
            entry(0.0, 0.0, 0.0, 0.0),
        ];
        let summary = CalorieSummary::from_entries(&entries);
        assert_eq!(summary.total_calories, 395.0);
        assert_eq!(summary.total_protein, 13.0);
        assert_eq!(summary.total_carbs, 55.0);
        assert_eq!(summary.total_fats, 18.25);
        assert_eq!(summary.log_count, 3);
    }

    #[test]
    fn summary_of_nothing_is_all_zeros() {
        let summary = CalorieSummary::from_entries(&[]);
        assert_eq!(summary, CalorieSummary::default());
        assert_eq!(summary.log_count, 0);
    }
}

use anyhow::Context;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::{FoodLog, NewFoodLog};

pub async fn insert(db: &PgPool, entry: NewFoodLog) -> anyhow::Result<FoodLog> {
    let row = sqlx::query_as::<_, FoodLog>(
        r#"
        INSERT INTO food_logs
            (user_id, food_name, calories, protein, carbs, fats, image_url, meal_type, eaten_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, now()))
        RETURNING id, user_id, food_name, calories, protein, carbs, fats,
                  image_url, meal_type, eaten_at, created_at, updated_at
        "#,
    )
    .bind(entry.user_id)
    .bind(entry.food_name)
    .bind(entry.calories)
    .bind(entry.protein)
    .bind(entry.carbs)
    .bind(entry.fats)
    .bind(entry.image_url)
    .bind(entry.meal_type)
    .bind(entry.eaten_at)
    .fetch_one(db)
    .await
    .context("insert food log")?;
    Ok(row)
}

/// Entries for one user, newest first, optionally bounded on `eaten_at`.
/// Both bounds are inclusive.
pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    from: Option<OffsetDateTime>,
    to: Option<OffsetDateTime>,
) -> anyhow::Result<Vec<FoodLog>> {
    let rows = sqlx::query_as::<_, FoodLog>(
        r#"
        SELECT id, user_id, food_name, calories, protein, carbs, fats,
               image_url, meal_type, eaten_at, created_at, updated_at
        FROM food_logs
        WHERE user_id = $1
          AND ($2::timestamptz IS NULL OR eaten_at >= $2)
          AND ($3::timestamptz IS NULL OR eaten_at <= $3)
        ORDER BY eaten_at DESC
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await
    .context("list food logs")?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<FoodLog>> {
    let row = sqlx::query_as::<_, FoodLog>(
        r#"
        SELECT id, user_id, food_name, calories, protein, carbs, fats,
               image_url, meal_type, eaten_at, created_at, updated_at
        FROM food_logs
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("find food log")?;
    Ok(row)
}

pub async fn delete_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM food_logs WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete food log")?;
    Ok(())
}

use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

/// Create the record tables for SQLite
///
/// Users reference their favorite animal; the read path joins the two
/// tables as `users u LEFT JOIN animals a`.
pub async fn init_schema(pool: &SqlitePool) -> AppResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS animals (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| AppError::Database(format!("Failed to create animals table: {}", e)))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            user_name TEXT NOT NULL,
            email TEXT NOT NULL,
            registration_date TEXT NOT NULL,
            favorite_animal_id INTEGER REFERENCES animals(id)
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_users_favorite_animal ON users(favorite_animal_id)",
    )
    .execute(pool)
    .await
    .map_err(|e| AppError::Database(format!("Failed to create users index: {}", e)))?;

    Ok(())
}

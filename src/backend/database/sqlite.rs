use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

use super::config::DatabaseBackendConfig;
use super::schema;
use crate::backend::Backend;
use crate::error::{AppError, AppResult};
use crate::models::{Animal, User};
use crate::query::{Record, RecordQuery, RecordSource};

const USER_SELECT: &str = "SELECT u.id, u.user_name, u.email, u.registration_date, \
     a.id AS animal_id, a.name AS animal_name \
     FROM users u LEFT JOIN animals a ON a.id = u.favorite_animal_id";

const ANIMAL_SELECT: &str = "SELECT a.id, a.name FROM animals a";

/// SQLite backend
///
/// Ordering and slicing are translated into `ORDER BY` / `LIMIT` / `OFFSET`.
/// Unordered reads use `ORDER BY RANDOM()` as the natural order.
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseBackendConfig) -> AppResult<Self> {
        config
            .validate()
            .map_err(|e| AppError::Internal(format!("Invalid backend config: {}", e)))?;

        let options = SqliteConnectOptions::from_str(&config.connection_url)
            .map_err(|e| AppError::Database(format!("Invalid SQLite URL: {}", e)))?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(config.connection_timeout));
        pool_options = if config.is_memory_database() {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(config.max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to SQLite: {}", e)))?;

        Ok(Self::new(pool))
    }

    async fn count_rows(&self, table: &str) -> AppResult<i64> {
        let count_sql = format!("SELECT COUNT(*) FROM {}", table);
        let total: (i64,) = sqlx::query_as(&count_sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to count {}: {}", table, e)))?;
        Ok(total.0)
    }

    async fn fetch_rows<T: Record>(
        &self,
        select: &str,
        query: &RecordQuery<T>,
    ) -> AppResult<Vec<SqliteRow>> {
        let (limit, offset) = limit_offset(query);
        sqlx::query(&build_select(select, query))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to fetch records: {}", e)))
    }
}

/// Append ordering and the `LIMIT ?1 OFFSET ?2` placeholders to `select`.
///
/// Column expressions come from the property registries, never from the
/// request.
fn build_select<T: Record>(select: &str, query: &RecordQuery<T>) -> String {
    let order_by = match query.ordering() {
        Some(order_by) => order_by.sql_clause(),
        None => "RANDOM()".to_string(),
    };
    format!("{} ORDER BY {} LIMIT ?1 OFFSET ?2", select, order_by)
}

/// SQLite treats a negative limit as "no limit"
fn limit_offset<T: Record>(query: &RecordQuery<T>) -> (i64, i64) {
    let limit = query
        .take()
        .map(|take| i64::try_from(take).unwrap_or(i64::MAX))
        .unwrap_or(-1);
    let offset = i64::try_from(query.skip()).unwrap_or(i64::MAX);
    (limit, offset)
}

fn user_from_row(row: &SqliteRow) -> AppResult<User> {
    let animal_id: Option<i64> = row.try_get("animal_id")?;
    let animal_name: Option<String> = row.try_get("animal_name")?;
    let favorite_animal = match (animal_id, animal_name) {
        (Some(id), Some(name)) => Some(Animal { id, name }),
        _ => None,
    };

    Ok(User {
        id: row.try_get("id")?,
        user_name: row.try_get("user_name")?,
        email: row.try_get("email")?,
        registration_date: row.try_get("registration_date")?,
        favorite_animal,
    })
}

fn animal_from_row(row: &SqliteRow) -> AppResult<Animal> {
    Ok(Animal {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

#[async_trait]
impl Backend for SqliteBackend {
    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    async fn init_schema(&self) -> AppResult<()> {
        schema::init_schema(&self.pool).await
    }

    async fn insert_animals(&self, animals: &[Animal]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        for animal in animals {
            sqlx::query("INSERT INTO animals (id, name) VALUES (?1, ?2)")
                .bind(animal.id)
                .bind(&animal.name)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::Database(format!("Failed to insert animal: {}", e)))?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn insert_users(&self, users: &[User]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        for user in users {
            // The referenced animal may not have been loaded separately
            if let Some(animal) = &user.favorite_animal {
                sqlx::query("INSERT OR IGNORE INTO animals (id, name) VALUES (?1, ?2)")
                    .bind(animal.id)
                    .bind(&animal.name)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        AppError::Database(format!("Failed to insert animal: {}", e))
                    })?;
            }

            sqlx::query(
                "INSERT INTO users (id, user_name, email, registration_date, favorite_animal_id) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(user.id)
            .bind(&user.user_name)
            .bind(&user.email)
            .bind(user.registration_date)
            .bind(user.favorite_animal.as_ref().map(|a| a.id))
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert user: {}", e)))?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl RecordSource<User> for SqliteBackend {
    async fn count(&self, _query: &RecordQuery<User>) -> AppResult<i64> {
        self.count_rows("users").await
    }

    async fn materialize(&self, query: &RecordQuery<User>) -> AppResult<Vec<User>> {
        let rows = self.fetch_rows(USER_SELECT, query).await?;
        rows.iter().map(user_from_row).collect()
    }
}

#[async_trait]
impl RecordSource<Animal> for SqliteBackend {
    async fn count(&self, _query: &RecordQuery<Animal>) -> AppResult<i64> {
        self.count_rows("animals").await
    }

    async fn materialize(&self, query: &RecordQuery<Animal>) -> AppResult<Vec<Animal>> {
        let rows = self.fetch_rows(ANIMAL_SELECT, query).await?;
        rows.iter().map(animal_from_row).collect()
    }
}

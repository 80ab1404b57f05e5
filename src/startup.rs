use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tracing::info;

use crate::backend::{BackendFactory, DataBackend};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::models::{Animal, User};

/// Create the configured backend, prepare its schema, and seed it if asked to
pub async fn initialize_backend(config: &AppConfig) -> AppResult<Arc<dyn DataBackend>> {
    let backend_config = config.backend.to_backend_config();
    let backend = BackendFactory::create(&backend_config).await?;

    backend.init_schema().await?;

    if config.backend.seed {
        let animals = sample_animals();
        let users = sample_users(&animals)?;
        backend.insert_animals(&animals).await?;
        backend.insert_users(&users).await?;
        info!(
            "Seeded {} users and {} animals",
            users.len(),
            animals.len()
        );
    }

    Ok(backend)
}

pub fn sample_animals() -> Vec<Animal> {
    ["Owl", "Cat", "Fox", "Badger", "Heron", "Axolotl"]
        .iter()
        .enumerate()
        .map(|(i, name)| Animal {
            id: i as i64 + 1,
            name: name.to_string(),
        })
        .collect()
}

/// Ten users with distinct names and emails, each with a favorite animal
pub fn sample_users(animals: &[Animal]) -> AppResult<Vec<User>> {
    const USERS: [(i64, &str, &str, (i32, u32, u32)); 10] = [
        (4, "dorothy", "dorothy.v@example.com", (2019, 5, 17)),
        (9, "ignatius", "iggy@example.net", (2021, 1, 3)),
        (1, "alan", "turing@example.org", (2018, 11, 30)),
        (7, "grace", "hopper@example.com", (2020, 2, 29)),
        (2, "barbara", "liskov@example.edu", (2022, 7, 4)),
        (10, "john", "mccarthy@example.org", (2017, 3, 9)),
        (5, "edsger", "dijkstra@example.nl", (2019, 8, 1)),
        (3, "claude", "shannon@example.com", (2023, 12, 24)),
        (8, "hedy", "lamarr@example.at", (2016, 6, 6)),
        (6, "frances", "allen@example.com", (2020, 10, 15)),
    ];

    USERS
        .iter()
        .enumerate()
        .map(|(i, (id, user_name, email, (year, month, day)))| {
            let registration_date = Utc
                .with_ymd_and_hms(*year, *month, *day, 9, 30, 0)
                .single()
                .ok_or_else(|| AppError::Internal(format!("Invalid seed date for {}", user_name)))?;

            Ok(User {
                id: *id,
                user_name: user_name.to_string(),
                email: email.to_string(),
                registration_date,
                favorite_animal: animals.get(i % animals.len().max(1)).cloned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{RecordQuery, RecordSource};
    use std::collections::HashSet;

    #[test]
    fn test_sample_users_are_distinct() {
        let users = sample_users(&sample_animals()).unwrap();

        let ids: HashSet<i64> = users.iter().map(|u| u.id).collect();
        let names: HashSet<&str> = users.iter().map(|u| u.user_name.as_str()).collect();
        let emails: HashSet<&str> = users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(ids.len(), 10);
        assert_eq!(names.len(), 10);
        assert_eq!(emails.len(), 10);
        assert!(users.iter().all(|u| u.favorite_animal.is_some()));
    }

    #[tokio::test]
    async fn test_initialize_default_backend() {
        let config = AppConfig::default_config();
        let backend = initialize_backend(&config).await.unwrap();

        let query = RecordQuery::<User>::new();
        assert_eq!(RecordSource::<User>::count(&*backend, &query).await.unwrap(), 10);
        let query = RecordQuery::<Animal>::new();
        assert_eq!(RecordSource::<Animal>::count(&*backend, &query).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_initialize_without_seed() {
        let mut config = AppConfig::default_config();
        config.backend.seed = false;
        let backend = initialize_backend(&config).await.unwrap();

        let query = RecordQuery::<User>::new();
        assert_eq!(RecordSource::<User>::count(&*backend, &query).await.unwrap(), 0);
    }
}

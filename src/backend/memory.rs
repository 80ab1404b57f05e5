//! In-memory record store.
//!
//! Records are kept in insertion order but handed out shuffled, so callers
//! that rely on an unordered listing being repeatable fail fast.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::sync::RwLock;

use crate::backend::Backend;
use crate::error::AppResult;
use crate::models::{Animal, User};
use crate::query::{Record, RecordQuery, RecordSource};

struct MemoryTable<T> {
    rows: RwLock<Vec<T>>,
}

impl<T: Record> MemoryTable<T> {
    fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    async fn extend(&self, records: &[T]) {
        self.rows.write().await.extend_from_slice(records);
    }

    async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    async fn run(&self, query: &RecordQuery<T>) -> Vec<T> {
        let snapshot = self.rows.read().await.clone();
        query.apply(natural_order(snapshot))
    }
}

fn natural_order<T>(mut records: Vec<T>) -> Vec<T> {
    records.shuffle(&mut rand::thread_rng());
    records
}

pub struct MemoryBackend {
    users: MemoryTable<User>,
    animals: MemoryTable<Animal>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            users: MemoryTable::new(),
            animals: MemoryTable::new(),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    async fn init_schema(&self) -> AppResult<()> {
        Ok(())
    }

    async fn insert_animals(&self, animals: &[Animal]) -> AppResult<()> {
        self.animals.extend(animals).await;
        Ok(())
    }

    async fn insert_users(&self, users: &[User]) -> AppResult<()> {
        self.users.extend(users).await;
        Ok(())
    }
}

#[async_trait]
impl RecordSource<User> for MemoryBackend {
    async fn count(&self, _query: &RecordQuery<User>) -> AppResult<i64> {
        Ok(self.users.len().await as i64)
    }

    async fn materialize(&self, query: &RecordQuery<User>) -> AppResult<Vec<User>> {
        Ok(self.users.run(query).await)
    }
}

#[async_trait]
impl RecordSource<Animal> for MemoryBackend {
    async fn count(&self, _query: &RecordQuery<Animal>) -> AppResult<i64> {
        Ok(self.animals.len().await as i64)
    }

    async fn materialize(&self, query: &RecordQuery<Animal>) -> AppResult<Vec<Animal>> {
        Ok(self.animals.run(query).await)
    }
}

//! Storage-facing side of the query engine.
//!
//! Ordering and slicing are composed on a [`RecordQuery`] without touching
//! the store; a [`RecordSource`] decides how to execute it (in memory, or
//! translated into SQL).

use async_trait::async_trait;

use super::ordering::OrderBy;
use super::property::Record;
use crate::error::AppResult;

/// Deferred query over a record collection
#[derive(Debug, Clone)]
pub struct RecordQuery<T> {
    order_by: Option<OrderBy<T>>,
    skip: usize,
    take: Option<usize>,
}

impl<T: Record> RecordQuery<T> {
    pub fn new() -> Self {
        Self {
            order_by: None,
            skip: 0,
            take: None,
        }
    }

    pub fn order_by(mut self, order_by: OrderBy<T>) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn slice(mut self, skip: usize, take: usize) -> Self {
        self.skip = skip;
        self.take = Some(take);
        self
    }

    pub fn ordering(&self) -> Option<&OrderBy<T>> {
        self.order_by.as_ref()
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn take(&self) -> Option<usize> {
        self.take
    }

    /// Run the query over records already in natural order
    pub fn apply(&self, mut records: Vec<T>) -> Vec<T> {
        if let Some(order_by) = &self.order_by {
            order_by.apply(&mut records);
        }

        let take = self.take.unwrap_or(usize::MAX);
        records.into_iter().skip(self.skip).take(take).collect()
    }
}

impl<T: Record> Default for RecordQuery<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A collection the query engine can read from
#[async_trait]
pub trait RecordSource<T: Record>: Send + Sync {
    /// Number of records in the whole collection; ordering and slice are ignored
    async fn count(&self, query: &RecordQuery<T>) -> AppResult<i64>;

    /// Execute the query. Without an ordering the store's natural order is
    /// returned, which is not guaranteed to be stable between calls.
    async fn materialize(&self, query: &RecordQuery<T>) -> AppResult<Vec<T>>;
}

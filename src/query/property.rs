//! Property path resolution.
//!
//! Each record type registers its sortable properties once. A registry maps
//! the lowercased dotted path of every scalar property to a typed accessor
//! and to the SQL column the database backend orders by, so resolving a
//! client supplied path is a single case-insensitive lookup.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Comparison key extracted from a record
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(DateTime<Utc>),
}

impl PropertyValue {
    fn rank(&self) -> u8 {
        match self {
            PropertyValue::Null => 0,
            PropertyValue::Bool(_) => 1,
            PropertyValue::Int(_) => 2,
            PropertyValue::Float(_) => 3,
            PropertyValue::Text(_) => 4,
            PropertyValue::DateTime(_) => 5,
        }
    }
}

impl Ord for PropertyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (PropertyValue::Bool(a), PropertyValue::Bool(b)) => a.cmp(b),
            (PropertyValue::Int(a), PropertyValue::Int(b)) => a.cmp(b),
            (PropertyValue::Float(a), PropertyValue::Float(b)) => a.total_cmp(b),
            (PropertyValue::Text(a), PropertyValue::Text(b)) => a.cmp(b),
            (PropertyValue::DateTime(a), PropertyValue::DateTime(b)) => a.cmp(b),
            // Null first, mixed kinds by kind
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for PropertyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PropertyValue {}

pub type Accessor<T> = Arc<dyn Fn(&T) -> PropertyValue + Send + Sync>;

/// A resolved, sortable property of `T`
pub struct Property<T> {
    name: String,
    column: String,
    accessor: Accessor<T>,
}

impl<T> Property<T> {
    /// Canonical dotted name, e.g. `favoriteAnimal.name`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// SQL expression ordered by in the database backend
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn value(&self, record: &T) -> PropertyValue {
        (self.accessor)(record)
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            column: self.column.clone(),
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("column", &self.column)
            .finish()
    }
}

pub struct PropertyRegistry<T> {
    properties: HashMap<String, Property<T>>,
}

impl<T: 'static> PropertyRegistry<T> {
    pub fn new() -> Self {
        Self {
            properties: HashMap::new(),
        }
    }

    /// Register a scalar property
    pub fn with<F>(mut self, name: &str, column: &str, accessor: F) -> Self
    where
        F: Fn(&T) -> PropertyValue + Send + Sync + 'static,
    {
        self.properties.insert(
            name.to_lowercase(),
            Property {
                name: name.to_string(),
                column: column.to_string(),
                accessor: Arc::new(accessor),
            },
        );
        self
    }

    /// Register every property of a nested record under `prefix`.
    ///
    /// A missing nested record yields [`PropertyValue::Null`].
    pub fn nest<U: 'static>(
        mut self,
        prefix: &str,
        child: &PropertyRegistry<U>,
        project: fn(&T) -> Option<&U>,
    ) -> Self {
        for property in child.properties.values() {
            let name = format!("{}.{}", prefix, property.name);
            let inner = Arc::clone(&property.accessor);
            let accessor: Accessor<T> = Arc::new(move |record: &T| {
                project(record)
                    .map(|nested| inner(nested))
                    .unwrap_or(PropertyValue::Null)
            });

            self.properties.insert(
                name.to_lowercase(),
                Property {
                    name,
                    column: property.column.clone(),
                    accessor,
                },
            );
        }
        self
    }

    /// Resolve path segments case-insensitively.
    ///
    /// Fails on an empty path, an empty segment, an unknown name, or a path
    /// that stops at a nested record instead of one of its scalars.
    pub fn resolve(&self, path: &[String]) -> Option<&Property<T>> {
        if path.is_empty() || path.iter().any(|segment| segment.is_empty()) {
            return None;
        }

        let key = path
            .iter()
            .map(|segment| segment.to_lowercase())
            .collect::<Vec<_>>()
            .join(".");
        self.properties.get(&key)
    }

    /// Canonical names of all registered properties, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.properties.values().map(|p| p.name()).collect();
        names.sort_unstable();
        names
    }
}

impl<T: 'static> Default for PropertyRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A record type that can be sorted by property path
pub trait Record: Clone + Send + Sync + 'static {
    fn registry() -> &'static PropertyRegistry<Self>;
}

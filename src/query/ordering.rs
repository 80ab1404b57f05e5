use std::cmp::Ordering;

use super::property::{Property, Record};
use crate::parser::{SortOrder, SortSpec};

/// A sort directive resolved against a record type
#[derive(Debug, Clone)]
pub struct OrderBy<T> {
    pub property: Property<T>,
    pub order: SortOrder,
}

impl<T: Record> OrderBy<T> {
    /// `None` when the path does not name a sortable property of `T`
    pub fn resolve(spec: &SortSpec) -> Option<OrderBy<T>> {
        T::registry().resolve(&spec.path).map(|property| OrderBy {
            property: property.clone(),
            order: spec.order,
        })
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let ordering = self.property.value(a).cmp(&self.property.value(b));
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }

    /// Stable in-place sort; equal keys keep their incoming order
    pub fn apply(&self, records: &mut [T]) {
        records.sort_by(|a, b| self.compare(a, b));
    }

    /// `ORDER BY` expression for the database backend
    pub fn sql_clause(&self) -> String {
        let direction = match self.order {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        };
        format!("{} {}", self.property.column(), direction)
    }
}

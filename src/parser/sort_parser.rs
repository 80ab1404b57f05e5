use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Only `desc` (any case) selects descending order.
    pub fn from_token(token: Option<&str>) -> SortOrder {
        match token {
            Some(t) if t.eq_ignore_ascii_case("desc") => SortOrder::Descending,
            _ => SortOrder::Ascending, // Default to ascending
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Property path segments as written by the client, never empty
    pub path: Vec<String>,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(path: Vec<String>, order: SortOrder) -> Self {
        SortSpec { path, order }
    }

    /// Parse a `sort` query value of the form `<path>[ desc]`.
    ///
    /// Returns `None` for an absent or blank value. The path is not checked
    /// against any record type here; see [`crate::query::PropertyRegistry`].
    pub fn parse(raw: Option<&str>) -> Option<SortSpec> {
        let mut tokens = raw?.split_whitespace();
        let path_token = tokens.next()?;
        let direction = tokens.next();

        let path = path_token.split('.').map(str::to_string).collect();
        Some(SortSpec::new(path, SortOrder::from_token(direction)))
    }

    /// Lowercased dotted path, the key used for registry lookups
    pub fn path_key(&self) -> String {
        self.path
            .iter()
            .map(|segment| segment.to_lowercase())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.join("."))?;
        if self.order == SortOrder::Descending {
            write!(f, " desc")?;
        }
        Ok(())
    }
}

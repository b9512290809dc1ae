//! SQLite dialect implementation

use super::{LimitTemplate, Pagination, SqlDialect};

// SQLite treats a negative LIMIT as "no limit"
const LIMIT: LimitTemplate = LimitTemplate {
    limit: " LIMIT {limit}",
    limit_offset: " LIMIT {limit} OFFSET {offset}",
    offset: Some(" LIMIT -1 OFFSET {offset}"),
};

/// SQLite dialect
pub struct SQLiteDialect;

impl SQLiteDialect {
    /// Create a new SQLite dialect
    pub fn new() -> Self {
        Self
    }
}

impl Default for SQLiteDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for SQLiteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_chars(&self) -> (char, char) {
        ('"', '"')
    }

    fn placeholder(&self, _position: usize) -> String {
        "?".to_string()
    }

    fn pagination(&self) -> Pagination {
        Pagination::Native(LIMIT)
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }

    fn max_identifier_length(&self) -> usize {
        // no hard limit in SQLite itself
        1024
    }
}

//! Oracle dialect implementation
//!
//! Oracle (before 12c) has no LIMIT clause; queries are paginated by
//! wrapping them in a ROWNUM-bounded subquery. Booleans are stored as
//! numbers and identifiers are limited to 30 characters.

use super::{Pagination, SqlDialect};
use chrono::{NaiveDate, NaiveDateTime};

/// Oracle dialect
pub struct OracleDialect;

impl OracleDialect {
    /// Create a new Oracle dialect
    pub fn new() -> Self {
        Self
    }
}

impl Default for OracleDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn quote_chars(&self) -> (char, char) {
        ('"', '"')
    }

    fn placeholder(&self, position: usize) -> String {
        format!(":{}", position)
    }

    fn pagination(&self) -> Pagination {
        Pagination::RowNumRewrite
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }

    fn max_identifier_length(&self) -> usize {
        30
    }

    fn current_timestamp(&self) -> &'static str {
        "SYSTIMESTAMP"
    }

    fn date_literal(&self, date: &NaiveDate) -> String {
        format!("TO_DATE('{}', 'YYYY-MM-DD')", date.format("%Y-%m-%d"))
    }

    fn datetime_literal(&self, datetime: &NaiveDateTime) -> String {
        format!(
            "TO_DATE('{}', 'YYYY-MM-DD HH24:MI:SS')",
            datetime.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

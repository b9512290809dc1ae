//! Microsoft SQL Server dialect implementation
//!
//! Row limiting goes through `SELECT TOP n`; skipping rows is not
//! expressible without an OFFSET/FETCH ordering contract, so any offset is
//! rejected at render time.

use super::{Pagination, SqlDialect};
use chrono::NaiveDateTime;

/// SQL Server dialect
pub struct MsSqlDialect;

impl MsSqlDialect {
    /// Create a new SQL Server dialect
    pub fn new() -> Self {
        Self
    }
}

impl Default for MsSqlDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for MsSqlDialect {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn quote_chars(&self) -> (char, char) {
        ('[', ']')
    }

    fn placeholder(&self, position: usize) -> String {
        format!("@P{}", position)
    }

    fn pagination(&self) -> Pagination {
        Pagination::Top
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }

    fn max_identifier_length(&self) -> usize {
        128
    }

    fn current_timestamp(&self) -> &'static str {
        "GETDATE()"
    }

    fn datetime_literal(&self, datetime: &NaiveDateTime) -> String {
        format!("'{}'", datetime.format("%Y-%m-%dT%H:%M:%S"))
    }
}

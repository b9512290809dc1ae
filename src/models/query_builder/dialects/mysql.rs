//! MySQL/MariaDB dialect implementation
//!
//! MySQL writes the offset first (`LIMIT offset, count`), needs a row count
//! whenever rows are skipped, quotes with backticks and treats backslashes
//! in string literals as escape characters.

use super::{LimitTemplate, Pagination, SqlDialect};
use chrono::NaiveDateTime;

// Largest row count MySQL accepts, used to skip rows without a limit
const LIMIT: LimitTemplate = LimitTemplate {
    limit: " LIMIT {limit}",
    limit_offset: " LIMIT {offset}, {limit}",
    offset: Some(" LIMIT {offset}, 18446744073709551615"),
};

/// MySQL/MariaDB dialect
pub struct MySQLDialect;

impl MySQLDialect {
    /// Create a new MySQL dialect
    pub fn new() -> Self {
        Self
    }
}

impl Default for MySQLDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for MySQLDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_chars(&self) -> (char, char) {
        ('`', '`')
    }

    fn placeholder(&self, _position: usize) -> String {
        "?".to_string()
    }

    fn pagination(&self) -> Pagination {
        Pagination::Native(LIMIT)
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    fn max_identifier_length(&self) -> usize {
        64
    }

    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP()"
    }

    fn escape_text(&self, text: &str) -> String {
        text.replace('\\', "\\\\").replace('\'', "''")
    }

    fn datetime_literal(&self, datetime: &NaiveDateTime) -> String {
        format!("'{}'", datetime.format("%Y%m%d%H%M%S"))
    }
}

//! PostgreSQL dialect implementation
//!
//! PostgreSQL supports `LIMIT`/`OFFSET` in any combination, numbered `$n`
//! placeholders, real boolean literals and a native `ILIKE`.

use super::{LimitTemplate, Pagination, SqlDialect};
use chrono::{NaiveDate, NaiveDateTime};

const LIMIT: LimitTemplate = LimitTemplate {
    limit: " LIMIT {limit}",
    limit_offset: " LIMIT {limit} OFFSET {offset}",
    offset: Some(" OFFSET {offset}"),
};

/// PostgreSQL dialect
pub struct PostgresDialect;

impl PostgresDialect {
    /// Create a new PostgreSQL dialect
    pub fn new() -> Self {
        Self
    }
}

impl Default for PostgresDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn quote_chars(&self) -> (char, char) {
        ('"', '"')
    }

    fn placeholder(&self, position: usize) -> String {
        format!("${}", position)
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
        63
    }

    fn date_literal(&self, date: &NaiveDate) -> String {
        format!("DATE '{}'", date.format("%Y-%m-%d"))
    }

    fn datetime_literal(&self, datetime: &NaiveDateTime) -> String {
        format!("TIMESTAMP '{}'", datetime.format("%Y-%m-%d %H:%M:%S"))
    }

    fn case_insensitive_like(&self, negated: bool) -> Option<&'static str> {
        Some(if negated { " NOT ILIKE " } else { " ILIKE " })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_placeholders() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.placeholder(1), "$1");
        assert_eq!(dialect.placeholder(12), "$12");
    }

    #[test]
    fn test_offset_without_limit() {
        let Pagination::Native(template) = PostgresDialect::new().pagination() else {
            panic!("PostgreSQL paginates natively");
        };
        assert_eq!(template.render(None, Some(20)), Some(" OFFSET 20".to_string()));
        assert_eq!(
            template.render(Some(10), Some(20)),
            Some(" LIMIT 10 OFFSET 20".to_string())
        );
    }

    #[test]
    fn test_typed_datetime_literal() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(
            PostgresDialect::new().datetime_literal(&dt),
            "TIMESTAMP '2024-01-15 10:30:00'"
        );
    }
}

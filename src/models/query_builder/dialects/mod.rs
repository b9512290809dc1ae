//! Database dialect implementations for the query builder
//!
//! Each supported database product gets one stateless [`SqlDialect`]
//! implementation describing its syntax quirks: identifier quoting,
//! placeholders, LIMIT/OFFSET support, boolean and date literals.

use crate::error::{QueryError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::str::FromStr;

pub mod derby;
pub mod mssql;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod sqlite;

pub use derby::DerbyDialect;
pub use mssql::MsSqlDialect;
pub use mysql::MySQLDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SQLiteDialect;

/// Database products with a built-in dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseBackend {
    Postgres,
    MySQL,
    SQLite,
    Oracle,
    MsSql,
    Derby,
}

impl DatabaseBackend {
    /// All built-in backends
    pub const ALL: [DatabaseBackend; 6] = [
        DatabaseBackend::Postgres,
        DatabaseBackend::MySQL,
        DatabaseBackend::SQLite,
        DatabaseBackend::Oracle,
        DatabaseBackend::MsSql,
        DatabaseBackend::Derby,
    ];

    /// Canonical product key used in configuration files
    pub fn key(&self) -> &'static str {
        match self {
            DatabaseBackend::Postgres => "postgresql",
            DatabaseBackend::MySQL => "mysql",
            DatabaseBackend::SQLite => "sqlite",
            DatabaseBackend::Oracle => "oracle",
            DatabaseBackend::MsSql => "mssql",
            DatabaseBackend::Derby => "derby",
        }
    }

    /// Detect the backend from a connection URL scheme
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split_once(':')?.0;
        match scheme.to_ascii_lowercase().as_str() {
            "jdbc" => Self::from_url(&url[5..]),
            "postgresql" | "postgres" => Some(DatabaseBackend::Postgres),
            "mysql" | "mariadb" => Some(DatabaseBackend::MySQL),
            "sqlite" => Some(DatabaseBackend::SQLite),
            "oracle" => Some(DatabaseBackend::Oracle),
            "mssql" | "sqlserver" => Some(DatabaseBackend::MsSql),
            "derby" => Some(DatabaseBackend::Derby),
            _ => None,
        }
    }
}

impl fmt::Display for DatabaseBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DatabaseBackend {
    type Err = QueryError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" | "pgsql" => Ok(DatabaseBackend::Postgres),
            "mysql" | "mariadb" => Ok(DatabaseBackend::MySQL),
            "sqlite" | "sqlite3" => Ok(DatabaseBackend::SQLite),
            "oracle" => Ok(DatabaseBackend::Oracle),
            "mssql" | "sqlserver" => Ok(DatabaseBackend::MsSql),
            "derby" => Ok(DatabaseBackend::Derby),
            _ => Err(QueryError::UnknownDialect(name.to_string())),
        }
    }
}

/// How LIMIT/OFFSET text is written for dialects with native support
///
/// Templates use `{limit}` and `{offset}` markers, so products that order
/// the two arguments differently only differ in their table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitTemplate {
    pub limit: &'static str,
    pub limit_offset: &'static str,
    /// `None` when the product cannot skip rows without a row limit
    pub offset: Option<&'static str>,
}

impl LimitTemplate {
    /// Fill in the template; `None` if the combination is not expressible
    pub fn render(&self, limit: Option<i64>, offset: Option<i64>) -> Option<String> {
        let template = match (limit, offset) {
            (None, None) => return Some(String::new()),
            (Some(_), None) => self.limit,
            (Some(_), Some(_)) => self.limit_offset,
            (None, Some(_)) => self.offset?,
        };

        let mut sql = template.to_string();
        if let Some(limit) = limit {
            sql = sql.replace("{limit}", &limit.to_string());
        }
        if let Some(offset) = offset {
            sql = sql.replace("{offset}", &offset.to_string());
        }
        Some(sql)
    }
}

/// Row-limiting strategy of a dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// Trailing LIMIT/OFFSET clause
    Native(LimitTemplate),
    /// `SELECT TOP n`, no way to skip rows
    Top,
    /// Wrap the query in a ROWNUM-bounded subquery
    RowNumRewrite,
    /// No row limiting at all
    Unsupported,
}

/// Trait for database-specific SQL generation
pub trait SqlDialect: Send + Sync {
    /// Product name, as used in error messages and logs
    fn name(&self) -> &'static str;

    /// Opening and closing identifier quote characters
    fn quote_chars(&self) -> (char, char);

    /// Generate a parameter placeholder for the given 1-based position
    fn placeholder(&self, position: usize) -> String;

    /// Row-limiting strategy
    fn pagination(&self) -> Pagination;

    /// Literal used for boolean values
    fn boolean_literal(&self, value: bool) -> &'static str;

    /// Maximum length of table, column and alias names
    fn max_identifier_length(&self) -> usize;

    /// Get the current timestamp expression for this database
    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    /// Quote an identifier, segment by segment for qualified names
    fn quote_identifier(&self, identifier: &str) -> String {
        let (open, close) = self.quote_chars();
        identifier
            .split('.')
            .map(|segment| {
                if segment == "*" {
                    segment.to_string()
                } else {
                    let escaped = segment.replace(close, &format!("{}{}", close, close));
                    format!("{}{}{}", open, escaped, close)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Escape text for use inside a single-quoted literal
    fn escape_text(&self, text: &str) -> String {
        text.replace('\'', "''")
    }

    fn date_literal(&self, date: &NaiveDate) -> String {
        format!("'{}'", date.format("%Y-%m-%d"))
    }

    fn time_literal(&self, time: &NaiveTime) -> String {
        format!("'{}'", time.format("%H:%M:%S"))
    }

    fn datetime_literal(&self, datetime: &NaiveDateTime) -> String {
        format!("'{}'", datetime.format("%Y-%m-%d %H:%M:%S"))
    }

    /// Wrap an expression so comparisons ignore case
    fn ignore_case(&self, expression: &str) -> String {
        format!("UPPER({})", expression)
    }

    /// Native case-insensitive LIKE operator, if the product has one
    fn case_insensitive_like(&self, _negated: bool) -> Option<&'static str> {
        None
    }
}

/// Factory function to create the appropriate dialect for a database backend
pub fn create_dialect(backend: DatabaseBackend) -> Box<dyn SqlDialect> {
    match backend {
        DatabaseBackend::Postgres => Box::new(PostgresDialect::new()),
        DatabaseBackend::MySQL => Box::new(MySQLDialect::new()),
        DatabaseBackend::SQLite => Box::new(SQLiteDialect::new()),
        DatabaseBackend::Oracle => Box::new(OracleDialect::new()),
        DatabaseBackend::MsSql => Box::new(MsSqlDialect::new()),
        DatabaseBackend::Derby => Box::new(DerbyDialect::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!(
            "PostgreSQL".parse::<DatabaseBackend>().unwrap(),
            DatabaseBackend::Postgres
        );
        assert_eq!(
            "mariadb".parse::<DatabaseBackend>().unwrap(),
            DatabaseBackend::MySQL
        );
        assert_eq!(
            " sqlserver ".parse::<DatabaseBackend>().unwrap(),
            DatabaseBackend::MsSql
        );
    }

    #[test]
    fn test_unknown_backend() {
        let err = "informix".parse::<DatabaseBackend>().unwrap_err();
        assert_eq!(err, QueryError::UnknownDialect("informix".to_string()));
    }

    #[test]
    fn test_backend_from_url() {
        assert_eq!(
            DatabaseBackend::from_url("postgres://localhost/app"),
            Some(DatabaseBackend::Postgres)
        );
        assert_eq!(
            DatabaseBackend::from_url("jdbc:oracle:thin:@db:1521:orcl"),
            Some(DatabaseBackend::Oracle)
        );
        assert_eq!(DatabaseBackend::from_url("sqlite://./app.db"), Some(DatabaseBackend::SQLite));
        assert_eq!(DatabaseBackend::from_url("redis://localhost"), None);
        assert_eq!(DatabaseBackend::from_url("no scheme"), None);
    }

    #[test]
    fn test_factory_matches_backend_key() {
        for backend in DatabaseBackend::ALL {
            let dialect = create_dialect(backend);
            assert_eq!(dialect.name(), backend.key());
        }
    }

    #[test]
    fn test_limit_template_substitution() {
        let template = LimitTemplate {
            limit: " LIMIT {limit}",
            limit_offset: " LIMIT {offset}, {limit}",
            offset: None,
        };

        assert_eq!(template.render(None, None), Some(String::new()));
        assert_eq!(template.render(Some(5), None), Some(" LIMIT 5".to_string()));
        assert_eq!(
            template.render(Some(5), Some(3)),
            Some(" LIMIT 3, 5".to_string())
        );
        assert_eq!(template.render(None, Some(3)), None);
    }

    #[test]
    fn test_default_identifier_quoting() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.quote_identifier("users"), "\"users\"");
        assert_eq!(dialect.quote_identifier("app.users.id"), "\"app\".\"users\".\"id\"");
        assert_eq!(dialect.quote_identifier("users.*"), "\"users\".*");
        assert_eq!(dialect.quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}

//! querycraft - criteria-based SQL query builder
//!
//! querycraft builds SELECT statements from a mutable [`Criteria`]:
//! - composable predicates with AND/OR grouping, LIKE, IN and NULL handling
//! - automatic FROM clause from qualified column references
//! - dialect-aware rendering for PostgreSQL, MySQL, SQLite, Oracle,
//!   SQL Server and Derby, with inlined literals or bind parameters
//! - LIMIT/OFFSET per dialect, including Oracle ROWNUM subqueries
//!
//! Executing the SQL is left to the caller.

// Enforce error handling best practices
#![cfg_attr(
    not(test),
    warn(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
    )
)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used,))]

pub mod database;
pub mod error;
pub mod models;
pub mod utils;

// Re-export main types for public API
pub use database::{DatabaseRegistry, DatabasesConfig, DialectRegistry, SqlValue};
pub use error::{QueryError, Result};
pub use models::query_builder::{
    render, render_parameterized, Conjunction, Criteria, Criterion, JoinType, OrderDirection,
    QueryRenderer, SqlOperator,
};
pub use models::query_builder::{
    create_dialect, DatabaseBackend, DerbyDialect, MsSqlDialect, MySQLDialect, OracleDialect,
    PostgresDialect, SQLiteDialect, SqlDialect,
};
pub use utils::UniqueList;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::*;
    pub use crate::models::query_builder::{Operand, Query, RenderMode};
}

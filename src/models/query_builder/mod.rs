//! Criteria-based query builder
//!
//! A [`Criteria`] collects what a SELECT statement should return, a
//! [`Criterion`] tree describes its conditions, and [`render`] turns both into
//! SQL for one of the supported database dialects, handling
//! database-specific syntax differences automatically.

pub mod column;
pub mod criteria;
pub mod criterion;
pub mod dialects;
pub mod pagination;
pub mod query;
pub mod render;
pub mod writer;

pub use criteria::{Criteria, Join, JoinType, OrderByClause, OrderDirection};
pub use criterion::{Comparison, Conjunction, Criterion, Operand, SqlOperator};
pub use dialects::{create_dialect, DatabaseBackend, LimitTemplate, Pagination, SqlDialect};
pub use dialects::{
    DerbyDialect, MsSqlDialect, MySQLDialect, OracleDialect, PostgresDialect, SQLiteDialect,
};
pub use pagination::{alias_duplicate_columns, apply_pagination};
pub use query::Query;
pub use render::{build_query, render, render_parameterized, QueryRenderer};
pub use writer::RenderMode;

// Re-export SqlValue from the unified type system
pub use crate::database::types::SqlValue;

//! Criteria: the mutable specification of a SELECT statement
//!
//! A `Criteria` only collects state. Rendering it into SQL for a particular
//! database is done by [`super::render`].
//!
//! # Example
//! ```
//! use querycraft::{Criteria, Criterion, PostgresDialect, render};
//!
//! let criteria = Criteria::new()
//!     .add_select_column("users.name").unwrap()
//!     .add("users.active", true).unwrap()
//!     .add_predicate(Criterion::gt("orders.total", 100).unwrap()).unwrap()
//!     .add_descending_order_by("orders.total")
//!     .set_limit(10).unwrap();
//!
//! assert_eq!(
//!     render(&criteria, &PostgresDialect::new()).unwrap(),
//!     "SELECT users.name FROM users, orders WHERE users.active=TRUE AND orders.total>100 \
//!      ORDER BY orders.total DESC LIMIT 10"
//! );
//! ```

use super::column::table_names;
use super::criterion::{Criterion, Operand, SqlOperator};
use crate::database::types::SqlValue;
use crate::error::{QueryError, Result};
use crate::utils::UniqueList;
use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

/// Explicit join of a table onto the FROM clause
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: String,
    /// `None` only for cross joins
    pub condition: Option<Criterion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderByClause {
    pub column: String,
    pub direction: OrderDirection,
}

/// Builder for SELECT statements
///
/// Every table referenced by a select column, predicate or join is
/// registered in the FROM clause automatically. Columns must therefore be
/// qualified (`table.column`), except for wildcard forms such as `*` and
/// `count(*)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pub(crate) db_name: Option<String>,
    pub(crate) distinct: bool,
    pub(crate) select_columns: UniqueList<String>,
    pub(crate) as_columns: IndexMap<String, String>,
    pub(crate) tables: UniqueList<String>,
    pub(crate) aliases: IndexMap<String, String>,
    pub(crate) joins: Vec<Join>,
    pub(crate) root: Option<Criterion>,
    pub(crate) group_by: UniqueList<String>,
    pub(crate) having: Option<Criterion>,
    pub(crate) order_by: UniqueList<OrderByClause>,
    pub(crate) limit: Option<i64>,
    pub(crate) offset: Option<i64>,
    pub(crate) ignore_case: bool,
    pub(crate) quote_identifiers: bool,
    pub(crate) default_select_table: Option<String>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria targeting a configured database instead of the default one
    pub fn for_database(name: impl Into<String>) -> Self {
        Self::new().set_db_name(name)
    }

    /// Add a column expression to the select list
    pub fn add_select_column(mut self, column: impl Into<String>) -> Result<Self> {
        let column = column.into();
        self.register_tables(&column)?;
        self.select_columns.add(column);
        Ok(self)
    }

    /// Add `expression AS alias` to the select list
    pub fn add_as_column(
        mut self,
        alias: impl Into<String>,
        expression: impl Into<String>,
    ) -> Result<Self> {
        let expression = expression.into();
        self.register_tables(&expression)?;
        self.as_columns.insert(alias.into(), expression);
        Ok(self)
    }

    /// Add a table to the FROM clause
    pub fn add_table(mut self, table: impl Into<String>) -> Self {
        self.tables.add(table.into());
        self
    }

    /// Register `alias` as an alias of `table`
    ///
    /// Columns then reference the alias (`u.name`) and the FROM clause
    /// renders `users u`.
    pub fn add_alias(mut self, alias: impl Into<String>, table: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), table.into());
        self
    }

    /// Join `table` with an explicit condition
    ///
    /// Tables referenced by the condition other than `table` itself become
    /// regular FROM entries.
    pub fn add_join_table(
        mut self,
        table: impl Into<String>,
        join_type: JoinType,
        on: Criterion,
    ) -> Result<Self> {
        let table = table.into();
        if join_type == JoinType::Cross {
            return Err(QueryError::invalid_argument(
                "cross joins take no condition, use add_cross_join",
            ));
        }

        for column in on.column_refs() {
            for referenced in table_names(column)? {
                if referenced != table {
                    self.tables.add(referenced);
                }
            }
        }

        self.push_join(Join {
            join_type,
            table,
            condition: Some(on),
        });
        Ok(self)
    }

    /// Join the table of `right` onto the table of `left` with `left = right`
    pub fn add_join(
        self,
        left: impl Into<String>,
        right: impl Into<String>,
        join_type: JoinType,
    ) -> Result<Self> {
        let right = right.into();
        let table = table_names(&right)?
            .into_iter()
            .next()
            .ok_or_else(|| QueryError::malformed_column(right.as_str()))?;
        let on = Criterion::columns_eq(left, right)?;
        self.add_join_table(table, join_type, on)
    }

    pub fn add_cross_join(mut self, table: impl Into<String>) -> Self {
        self.push_join(Join {
            join_type: JoinType::Cross,
            table: table.into(),
            condition: None,
        });
        self
    }

    fn push_join(&mut self, join: Join) {
        log::debug!("Joining {} with {}", join.table, join.join_type.as_sql());
        self.joins.push(join);
    }

    /// AND a predicate with the current WHERE condition
    pub fn add_predicate(mut self, criterion: Criterion) -> Result<Self> {
        self.register_criterion_tables(&criterion)?;
        self.root = Some(match self.root.take() {
            Some(root) => root.and(criterion),
            None => criterion,
        });
        Ok(self)
    }

    /// OR a predicate with the current WHERE condition
    pub fn or_predicate(mut self, criterion: Criterion) -> Result<Self> {
        self.register_criterion_tables(&criterion)?;
        self.root = Some(match self.root.take() {
            Some(root) => root.or(criterion),
            None => criterion,
        });
        Ok(self)
    }

    /// `column = value`
    pub fn add(self, column: impl Into<String>, value: impl Into<SqlValue>) -> Result<Self> {
        let criterion = Criterion::eq(column, value)?;
        self.add_predicate(criterion)
    }

    /// `column <operator> value`
    pub fn add_with(
        self,
        column: impl Into<String>,
        operator: SqlOperator,
        value: impl Into<SqlValue>,
    ) -> Result<Self> {
        let criterion =
            Criterion::comparison(column, operator, Some(Operand::Value(value.into())), false)?;
        self.add_predicate(criterion)
    }

    /// Group by a column
    ///
    /// Like ORDER BY, GROUP BY may name a select alias, so only qualified
    /// columns register a table.
    pub fn add_group_by(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        self.register_tables_leniently(&column);
        self.group_by.add(column);
        self
    }

    /// AND a predicate with the current HAVING condition
    pub fn add_having(mut self, criterion: Criterion) -> Result<Self> {
        self.register_criterion_tables(&criterion)?;
        self.having = Some(match self.having.take() {
            Some(having) => having.and(criterion),
            None => criterion,
        });
        Ok(self)
    }

    /// Order by a column; ordering by the same column twice in the same
    /// direction is ignored
    pub fn add_order_by(mut self, column: impl Into<String>, direction: OrderDirection) -> Self {
        let column = column.into();
        // ORDER BY may name a select alias, so unqualified columns are fine here
        self.register_tables_leniently(&column);
        self.order_by.add(OrderByClause { column, direction });
        self
    }

    pub fn add_ascending_order_by(self, column: impl Into<String>) -> Self {
        self.add_order_by(column, OrderDirection::Asc)
    }

    pub fn add_descending_order_by(self, column: impl Into<String>) -> Self {
        self.add_order_by(column, OrderDirection::Desc)
    }

    /// Maximum number of rows to return
    pub fn set_limit(mut self, limit: i64) -> Result<Self> {
        if limit < 0 {
            return Err(QueryError::invalid_argument(format!(
                "limit must not be negative, got {}",
                limit
            )));
        }
        self.limit = Some(limit);
        Ok(self)
    }

    /// Number of rows to skip
    pub fn set_offset(mut self, offset: i64) -> Result<Self> {
        if offset < 0 {
            return Err(QueryError::invalid_argument(format!(
                "offset must not be negative, got {}",
                offset
            )));
        }
        self.offset = Some(offset);
        Ok(self)
    }

    /// Limit and offset for a 1-based page number
    pub fn paginate(self, page: i64, per_page: i64) -> Result<Self> {
        if page < 1 || per_page < 1 {
            return Err(QueryError::invalid_argument(format!(
                "page and per_page must be positive, got page {} of {}",
                page, per_page
            )));
        }
        let offset = (page - 1)
            .checked_mul(per_page)
            .ok_or_else(|| QueryError::invalid_argument("page offset overflows"))?;
        self.set_limit(per_page)?.set_offset(offset)
    }

    pub fn set_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Compare every text value case-insensitively
    pub fn set_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Quote plain column and table references with the dialect's quotes
    pub fn set_quote_identifiers(mut self, quote: bool) -> Self {
        self.quote_identifiers = quote;
        self
    }

    /// Name of the configured database this criteria targets
    pub fn set_db_name(mut self, name: impl Into<String>) -> Self {
        self.db_name = Some(name.into());
        self
    }

    /// Table whose columns are selected (`SELECT table.*`) when no select
    /// column was added
    pub fn set_default_select_table(mut self, table: impl Into<String>) -> Self {
        let table = table.into();
        self.tables.add(table.clone());
        self.default_select_table = Some(table);
        self
    }

    pub fn db_name(&self) -> Option<&str> {
        self.db_name.as_deref()
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn select_columns(&self) -> &UniqueList<String> {
        &self.select_columns
    }

    pub fn tables(&self) -> &UniqueList<String> {
        &self.tables
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn predicate(&self) -> Option<&Criterion> {
        self.root.as_ref()
    }

    pub fn order_by(&self) -> &UniqueList<OrderByClause> {
        &self.order_by
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    fn register_tables(&mut self, column: &str) -> Result<()> {
        self.tables.extend(table_names(column)?);
        Ok(())
    }

    fn register_tables_leniently(&mut self, column: &str) {
        if let Ok(tables) = table_names(column) {
            self.tables.extend(tables);
        }
    }

    fn register_criterion_tables(&mut self, criterion: &Criterion) -> Result<()> {
        match criterion {
            Criterion::Comparison(comparison) => {
                if comparison.operator() == SqlOperator::Custom {
                    // raw SQL such as `1=1` references no table
                    self.register_tables_leniently(comparison.column());
                    return Ok(());
                }
                self.register_tables(comparison.column())?;
                if let Some(Operand::Column(other)) = comparison.right() {
                    self.register_tables(other)?;
                }
                Ok(())
            }
            Criterion::Composite { children, .. } => children
                .iter()
                .try_for_each(|child| self.register_criterion_tables(child)),
        }
    }
}

impl fmt::Display for Criteria {
    /// Inline rendering with the PostgreSQL dialect, for logging
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dialect = super::dialects::PostgresDialect::new();
        match super::render::render(self, &dialect) {
            Ok(sql) => f.write_str(&sql),
            Err(err) => write!(f, "<unrenderable criteria: {}>", err),
        }
    }
}

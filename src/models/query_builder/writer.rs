//! Output state shared by every clause while a query is rendered

use super::column::is_identifier_path;
use super::dialects::SqlDialect;
use crate::database::types::SqlValue;

/// How literal values end up in the generated SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Literals are escaped and written into the SQL text
    Inline,
    /// Literals become placeholders and are collected as bind values
    Parameterized,
}

/// Accumulates bind values and applies per-query rendering options
pub(crate) struct SqlWriter<'a> {
    dialect: &'a dyn SqlDialect,
    mode: RenderMode,
    params: Vec<SqlValue>,
    quote_identifiers: bool,
    ignore_case: bool,
}

impl<'a> SqlWriter<'a> {
    pub(crate) fn new(dialect: &'a dyn SqlDialect, mode: RenderMode) -> Self {
        Self {
            dialect,
            mode,
            params: Vec::new(),
            quote_identifiers: false,
            ignore_case: false,
        }
    }

    pub(crate) fn quote_identifiers(mut self, quote: bool) -> Self {
        self.quote_identifiers = quote;
        self
    }

    pub(crate) fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub(crate) fn dialect(&self) -> &'a dyn SqlDialect {
        self.dialect
    }

    /// Whether every text comparison of the query ignores case
    pub(crate) fn ignores_case(&self) -> bool {
        self.ignore_case
    }

    /// Column or table reference, quoted when quoting is enabled and the
    /// expression is a plain identifier path
    pub(crate) fn identifier(&self, expression: &str) -> String {
        if self.quote_identifiers && is_identifier_path(expression) {
            self.dialect.quote_identifier(expression)
        } else {
            expression.to_string()
        }
    }

    /// Literal or placeholder for a value
    pub(crate) fn value(&mut self, value: &SqlValue) -> String {
        match self.mode {
            RenderMode::Parameterized if value.is_bindable() => {
                self.params.push(value.clone());
                self.dialect.placeholder(self.params.len())
            }
            _ => value.to_sql_literal(self.dialect),
        }
    }

    pub(crate) fn into_params(self) -> Vec<SqlValue> {
        self.params
    }
}

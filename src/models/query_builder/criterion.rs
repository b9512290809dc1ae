//! Boolean expression tree for WHERE, HAVING and JOIN conditions
//!
//! A [`Criterion`] is either a single comparison or an AND/OR group of
//! criteria. Comparisons are validated when they are built, so a tree that
//! exists can always be rendered.

use super::dialects::SqlDialect;
use super::writer::{RenderMode, SqlWriter};
use crate::database::types::SqlValue;
use crate::error::{QueryError, Result};
use std::fmt;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlOperator {
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Like,
    NotLike,
    In,
    NotIn,
    IsNull,
    IsNotNull,
    /// The right operand is written out as raw SQL
    Custom,
}

impl SqlOperator {
    /// SQL text of the operator; keyword operators carry their own blanks
    pub fn as_sql(&self) -> &'static str {
        match self {
            SqlOperator::Equal => "=",
            SqlOperator::NotEqual => "<>",
            SqlOperator::LessThan => "<",
            SqlOperator::LessEqual => "<=",
            SqlOperator::GreaterThan => ">",
            SqlOperator::GreaterEqual => ">=",
            SqlOperator::Like => " LIKE ",
            SqlOperator::NotLike => " NOT LIKE ",
            SqlOperator::In => " IN ",
            SqlOperator::NotIn => " NOT IN ",
            SqlOperator::IsNull => " IS NULL",
            SqlOperator::IsNotNull => " IS NOT NULL",
            SqlOperator::Custom => "",
        }
    }
}

impl fmt::Display for SqlOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlOperator::Custom => f.write_str("CUSTOM"),
            op => f.write_str(op.as_sql().trim()),
        }
    }
}

/// Operator joining the children of a composite criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Conjunction::And => " AND ",
            Conjunction::Or => " OR ",
        }
    }
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Another column, as in join conditions
    Column(String),
    Value(SqlValue),
}

impl From<SqlValue> for Operand {
    fn from(value: SqlValue) -> Self {
        Operand::Value(value)
    }
}

/// `left operator right`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    column: String,
    operator: SqlOperator,
    right: Option<Operand>,
    ignore_case: bool,
}

impl Comparison {
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn operator(&self) -> SqlOperator {
        self.operator
    }

    pub fn right(&self) -> Option<&Operand> {
        self.right.as_ref()
    }

    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }

    fn write(&self, out: &mut SqlWriter<'_>) -> String {
        let ignore_case = self.ignore_case || out.ignores_case();
        let column = out.identifier(&self.column);

        match (self.operator, &self.right) {
            (SqlOperator::IsNull | SqlOperator::IsNotNull, _) => {
                format!("{}{}", column, self.operator.as_sql())
            }
            (SqlOperator::Custom, Some(Operand::Value(value))) => {
                value.as_str().unwrap_or_default().to_string()
            }
            (SqlOperator::In | SqlOperator::NotIn, Some(Operand::Value(SqlValue::Array(values)))) => {
                write_in(&column, self.operator, values, ignore_case, out)
            }
            (SqlOperator::Like | SqlOperator::NotLike, Some(Operand::Value(SqlValue::String(pattern)))) => {
                write_like(&column, self.operator, pattern, ignore_case, out)
            }
            (operator, Some(Operand::Column(other))) => {
                let other = out.identifier(other);
                // the criteria-wide flag only folds text values
                if self.ignore_case {
                    let dialect = out.dialect();
                    format!(
                        "{}{}{}",
                        dialect.ignore_case(&column),
                        operator.as_sql(),
                        dialect.ignore_case(&other)
                    )
                } else {
                    format!("{}{}{}", column, operator.as_sql(), other)
                }
            }
            (operator, Some(Operand::Value(value))) => {
                write_binary(&column, operator, value, ignore_case, out)
            }
            // rejected when the comparison was built
            (operator, None) => format!("{}{}", column, operator.as_sql()),
        }
    }
}

fn write_binary(
    column: &str,
    operator: SqlOperator,
    value: &SqlValue,
    ignore_case: bool,
    out: &mut SqlWriter<'_>,
) -> String {
    let rendered = out.value(value);
    if ignore_case && value.is_text() {
        let dialect = out.dialect();
        format!(
            "{}{}{}",
            dialect.ignore_case(column),
            operator.as_sql(),
            dialect.ignore_case(&rendered)
        )
    } else {
        format!("{}{}{}", column, operator.as_sql(), rendered)
    }
}

fn write_in(
    column: &str,
    operator: SqlOperator,
    values: &[SqlValue],
    ignore_case: bool,
    out: &mut SqlWriter<'_>,
) -> String {
    let negated = operator == SqlOperator::NotIn;
    let has_null = values.iter().any(SqlValue::is_null);
    let values: Vec<&SqlValue> = values.iter().filter(|v| !v.is_null()).collect();

    if values.is_empty() {
        return match (negated, has_null) {
            (false, false) => "1<>1".to_string(),
            (true, false) => "1=1".to_string(),
            (false, true) => format!("{}{}", column, SqlOperator::IsNull.as_sql()),
            (true, true) => format!("{}{}", column, SqlOperator::IsNotNull.as_sql()),
        };
    }

    let fold = ignore_case && values.iter().any(|v| v.is_text());
    let items: Vec<String> = values
        .iter()
        .map(|value| {
            let rendered = out.value(value);
            if fold && value.is_text() {
                out.dialect().ignore_case(&rendered)
            } else {
                rendered
            }
        })
        .collect();

    let left = if fold {
        out.dialect().ignore_case(column)
    } else {
        column.to_string()
    };
    let list = format!("{}{}({})", left, operator.as_sql(), items.join(","));

    match (negated, has_null) {
        (false, true) => format!("({} OR {}{})", list, column, SqlOperator::IsNull.as_sql()),
        (true, true) => format!("({} AND {}{})", list, column, SqlOperator::IsNotNull.as_sql()),
        _ => list,
    }
}

fn write_like(
    column: &str,
    operator: SqlOperator,
    pattern: &str,
    ignore_case: bool,
    out: &mut SqlWriter<'_>,
) -> String {
    let negated = operator == SqlOperator::NotLike;
    let translated = LikePattern::parse(pattern);

    if !translated.has_wildcard {
        // nothing to match against, plain equality is cheaper
        let operator = if negated {
            SqlOperator::NotEqual
        } else {
            SqlOperator::Equal
        };
        let value = SqlValue::String(translated.literal);
        return write_binary(column, operator, &value, ignore_case, out);
    }

    let value = out.value(&SqlValue::String(translated.pattern));
    if !ignore_case {
        return format!("{}{}{}", column, operator.as_sql(), value);
    }

    let dialect = out.dialect();
    match dialect.case_insensitive_like(negated) {
        Some(native) => format!("{}{}{}", column, native, value),
        None => format!(
            "{}{}{}",
            dialect.ignore_case(column),
            operator.as_sql(),
            dialect.ignore_case(&value)
        ),
    }
}

/// LIKE pattern with `*`/`?` translated to `%`/`_`
#[derive(Debug, PartialEq)]
struct LikePattern {
    /// Pattern text for LIKE
    pattern: String,
    /// Same text with escapes resolved, used when there is no wildcard
    literal: String,
    has_wildcard: bool,
}

impl LikePattern {
    fn parse(input: &str) -> Self {
        let mut pattern = String::with_capacity(input.len());
        let mut literal = String::with_capacity(input.len());
        let mut has_wildcard = false;
        let mut chars = input.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped @ ('*' | '?')) => {
                        pattern.push(escaped);
                        literal.push(escaped);
                    }
                    Some(escaped @ ('%' | '_')) => {
                        pattern.push('\\');
                        pattern.push(escaped);
                        literal.push(escaped);
                    }
                    Some(other) => {
                        pattern.push('\\');
                        pattern.push(other);
                        literal.push('\\');
                        literal.push(other);
                    }
                    None => {
                        pattern.push('\\');
                        literal.push('\\');
                    }
                },
                '*' => {
                    pattern.push('%');
                    has_wildcard = true;
                }
                '?' => {
                    pattern.push('_');
                    has_wildcard = true;
                }
                '%' | '_' => {
                    pattern.push(c);
                    has_wildcard = true;
                }
                _ => {
                    pattern.push(c);
                    literal.push(c);
                }
            }
        }

        Self {
            pattern,
            literal,
            has_wildcard,
        }
    }
}

/// Node of a WHERE/HAVING/ON expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Comparison(Comparison),
    Composite {
        conjunction: Conjunction,
        children: Vec<Criterion>,
    },
}

impl Criterion {
    /// Build a validated comparison
    ///
    /// `=` and `<>` against NULL become `IS NULL` and `IS NOT NULL`.
    pub fn comparison(
        column: impl Into<String>,
        operator: SqlOperator,
        right: Option<Operand>,
        ignore_case: bool,
    ) -> Result<Self> {
        let column = column.into();
        let (operator, right) = normalize(operator, right)?;

        Ok(Criterion::Comparison(Comparison {
            column,
            operator,
            right,
            ignore_case,
        }))
    }

    fn value(
        column: impl Into<String>,
        operator: SqlOperator,
        value: impl Into<SqlValue>,
    ) -> Result<Self> {
        Self::comparison(column, operator, Some(Operand::Value(value.into())), false)
    }

    pub fn eq(column: impl Into<String>, value: impl Into<SqlValue>) -> Result<Self> {
        Self::value(column, SqlOperator::Equal, value)
    }

    pub fn ne(column: impl Into<String>, value: impl Into<SqlValue>) -> Result<Self> {
        Self::value(column, SqlOperator::NotEqual, value)
    }

    pub fn lt(column: impl Into<String>, value: impl Into<SqlValue>) -> Result<Self> {
        Self::value(column, SqlOperator::LessThan, value)
    }

    pub fn le(column: impl Into<String>, value: impl Into<SqlValue>) -> Result<Self> {
        Self::value(column, SqlOperator::LessEqual, value)
    }

    pub fn gt(column: impl Into<String>, value: impl Into<SqlValue>) -> Result<Self> {
        Self::value(column, SqlOperator::GreaterThan, value)
    }

    pub fn ge(column: impl Into<String>, value: impl Into<SqlValue>) -> Result<Self> {
        Self::value(column, SqlOperator::GreaterEqual, value)
    }

    /// LIKE with `*`/`?` or `%`/`_` wildcards
    pub fn like(column: impl Into<String>, pattern: impl Into<SqlValue>) -> Result<Self> {
        Self::value(column, SqlOperator::Like, pattern)
    }

    pub fn not_like(column: impl Into<String>, pattern: impl Into<SqlValue>) -> Result<Self> {
        Self::value(column, SqlOperator::NotLike, pattern)
    }

    pub fn is_in<I, V>(column: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        Self::value(column, SqlOperator::In, SqlValue::list(values))
    }

    pub fn not_in<I, V>(column: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        Self::value(column, SqlOperator::NotIn, SqlValue::list(values))
    }

    pub fn is_null(column: impl Into<String>) -> Result<Self> {
        Self::comparison(column, SqlOperator::IsNull, None, false)
    }

    pub fn is_not_null(column: impl Into<String>) -> Result<Self> {
        Self::comparison(column, SqlOperator::IsNotNull, None, false)
    }

    /// Column-to-column comparison
    pub fn columns(
        left: impl Into<String>,
        operator: SqlOperator,
        right: impl Into<String>,
    ) -> Result<Self> {
        Self::comparison(left, operator, Some(Operand::Column(right.into())), false)
    }

    /// `left = right` between two columns
    pub fn columns_eq(left: impl Into<String>, right: impl Into<String>) -> Result<Self> {
        Self::columns(left, SqlOperator::Equal, right)
    }

    /// Raw SQL condition, e.g. `"orders.total > orders.paid * 2"`
    ///
    /// The tables referenced in the text are still registered in the FROM
    /// clause when the criterion is added to a criteria.
    pub fn custom(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        Criterion::Comparison(Comparison {
            column: sql.clone(),
            operator: SqlOperator::Custom,
            right: Some(Operand::Value(SqlValue::Verbatim(sql))),
            ignore_case: false,
        })
    }

    /// Group criteria under one conjunction
    pub fn group(conjunction: Conjunction, children: Vec<Criterion>) -> Result<Self> {
        if children.is_empty() {
            return Err(QueryError::invalid_argument(
                "a criterion group needs at least one child",
            ));
        }
        Ok(Criterion::Composite {
            conjunction,
            children,
        })
    }

    /// Make every comparison of this criterion case-insensitive
    pub fn ignore_case(self) -> Self {
        match self {
            Criterion::Comparison(mut comparison) => {
                comparison.ignore_case = true;
                Criterion::Comparison(comparison)
            }
            Criterion::Composite {
                conjunction,
                children,
            } => Criterion::Composite {
                conjunction,
                children: children.into_iter().map(Criterion::ignore_case).collect(),
            },
        }
    }

    /// `self AND other`
    ///
    /// When `self` already is an AND group, `other` joins that group instead
    /// of nesting it one level deeper.
    pub fn and(self, other: Criterion) -> Criterion {
        self.combine(Conjunction::And, other)
    }

    /// `self OR other`, flattening like [`Criterion::and`]
    pub fn or(self, other: Criterion) -> Criterion {
        self.combine(Conjunction::Or, other)
    }

    fn combine(self, with: Conjunction, other: Criterion) -> Criterion {
        match self {
            Criterion::Composite {
                conjunction,
                mut children,
            } if conjunction == with => {
                children.push(other);
                Criterion::Composite {
                    conjunction,
                    children,
                }
            }
            criterion => Criterion::Composite {
                conjunction: with,
                children: vec![criterion, other],
            },
        }
    }

    /// Every column expression in the tree, left sides first
    pub fn column_refs(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        self.collect_columns(&mut refs);
        refs
    }

    fn collect_columns<'a>(&'a self, refs: &mut Vec<&'a str>) {
        match self {
            Criterion::Comparison(comparison) => {
                refs.push(&comparison.column);
                if let Some(Operand::Column(other)) = &comparison.right {
                    refs.push(other);
                }
            }
            Criterion::Composite { children, .. } => {
                for child in children {
                    child.collect_columns(refs);
                }
            }
        }
    }

    /// Render with placeholders, returning the SQL fragment and bind values
    pub fn to_sql(&self, dialect: &dyn SqlDialect) -> (String, Vec<SqlValue>) {
        let mut out = SqlWriter::new(dialect, RenderMode::Parameterized);
        let sql = self.write(&mut out);
        (sql, out.into_params())
    }

    /// Render with every literal inlined, for logging and debugging
    pub fn to_inline_sql(&self, dialect: &dyn SqlDialect) -> String {
        let mut out = SqlWriter::new(dialect, RenderMode::Inline);
        self.write(&mut out)
    }

    pub(crate) fn write(&self, out: &mut SqlWriter<'_>) -> String {
        self.write_nested(out, None)
    }

    // Groups only need parentheses inside a group of the other conjunction;
    // a one-child group is transparent.
    fn write_nested(&self, out: &mut SqlWriter<'_>, parent: Option<Conjunction>) -> String {
        match self {
            Criterion::Comparison(comparison) => comparison.write(out),
            Criterion::Composite {
                conjunction,
                children,
            } => {
                if let [only] = children.as_slice() {
                    return only.write_nested(out, parent);
                }

                let sql = children
                    .iter()
                    .map(|child| child.write_nested(out, Some(*conjunction)))
                    .collect::<Vec<_>>()
                    .join(conjunction.as_sql());

                match parent {
                    Some(parent) if parent != *conjunction => format!("({})", sql),
                    _ => sql,
                }
            }
        }
    }
}

fn normalize(
    operator: SqlOperator,
    right: Option<Operand>,
) -> Result<(SqlOperator, Option<Operand>)> {
    let invalid = |message: &str| Err(QueryError::invalid_operator(operator.to_string(), message));

    match operator {
        SqlOperator::IsNull | SqlOperator::IsNotNull => match right {
            None | Some(Operand::Value(SqlValue::Null)) => Ok((operator, None)),
            Some(_) => invalid("takes no right operand"),
        },
        SqlOperator::In | SqlOperator::NotIn => match right {
            Some(Operand::Value(SqlValue::Array(values))) => {
                if values.iter().any(SqlValue::is_array) {
                    return invalid("list values cannot be nested lists");
                }
                if values.iter().any(SqlValue::is_non_finite) {
                    return invalid("cannot compare against NaN or infinity");
                }
                Ok((operator, Some(Operand::Value(SqlValue::Array(values)))))
            }
            _ => invalid("requires a list of values"),
        },
        SqlOperator::Custom => match right {
            Some(Operand::Value(SqlValue::String(sql) | SqlValue::Verbatim(sql))) => {
                Ok((operator, Some(Operand::Value(SqlValue::Verbatim(sql)))))
            }
            _ => invalid("requires SQL text"),
        },
        _ => match right {
            None => invalid("requires a right operand"),
            Some(Operand::Value(SqlValue::Array(_))) => invalid("cannot compare against a list"),
            Some(Operand::Value(SqlValue::Null)) => match operator {
                SqlOperator::Equal => Ok((SqlOperator::IsNull, None)),
                SqlOperator::NotEqual => Ok((SqlOperator::IsNotNull, None)),
                _ => invalid("cannot compare against NULL"),
            },
            Some(Operand::Value(ref value)) if value.is_non_finite() => {
                invalid("cannot compare against NaN or infinity")
            }
            Some(Operand::Value(ref value))
                if matches!(operator, SqlOperator::Like | SqlOperator::NotLike)
                    && !(value.is_text() || value.is_verbatim()) =>
            {
                invalid("requires a text pattern")
            }
            Some(right) => Ok((operator, Some(right))),
        },
    }
}

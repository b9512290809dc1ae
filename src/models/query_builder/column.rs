//! Column expression helpers
//!
//! Criteria register the tables a query touches by reading the qualifier off
//! column expressions, so `add("users.name", ..)` is enough to put `users`
//! in the FROM clause. Expressions may be plain (`table.column`), schema
//! qualified (`schema.table.column`), wrapped in functions
//! (`UPPER(table.column)`) or whole comparisons (`table.column < 10`).

use crate::error::{QueryError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// `qualifier.column` or `qualifier.*` not preceded by an identifier or quote
static QUALIFIED_COLUMN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|[^\w$.'"])((?:[A-Za-z_][\w$]*\.)+)(?:[A-Za-z_][\w$]*|\*)"#)
        .expect("column: invalid qualified column regex")
});

/// Stand-alone `*`, as in `*` or `count(*)`
static WILDCARD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[\s(,])\*(?:$|[\s),])").expect("column: invalid wildcard regex")
});

/// Single-quoted text literal, with `''` escapes
static QUOTED_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'(?:[^']|'')*'").expect("column: invalid quoted text regex"));

/// A bare or dotted identifier path, optionally ending in `.*`
static IDENTIFIER_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][\w$]*(?:\.[A-Za-z_][\w$]*)*(?:\.\*)?$")
        .expect("column: invalid identifier path regex")
});

/// Tables referenced by a column expression, in order of appearance
///
/// Wildcard expressions (`*`, `count(*)`) reference no table. An expression
/// with neither a qualifier nor a wildcard is malformed.
///
/// # Example
/// ```
/// use querycraft::models::query_builder::column::table_names;
///
/// assert_eq!(table_names("UPPER(users.name)").unwrap(), vec!["users"]);
/// assert_eq!(table_names("app.users.id").unwrap(), vec!["app.users"]);
/// assert!(table_names("count(*)").unwrap().is_empty());
/// assert!(table_names("name").is_err());
/// ```
pub fn table_names(expression: &str) -> Result<Vec<String>> {
    let mut tables: Vec<String> = Vec::new();
    // literals such as 'x a.b' are data, not column references
    let scanned = QUOTED_TEXT.replace_all(expression, " ");

    for captures in QUALIFIED_COLUMN.captures_iter(&scanned) {
        if let Some(qualifier) = captures.get(1) {
            let table = qualifier.as_str().trim_end_matches('.').to_string();
            if !tables.contains(&table) {
                tables.push(table);
            }
        }
    }

    if tables.is_empty() && !WILDCARD.is_match(scanned.trim()) {
        return Err(QueryError::malformed_column(expression));
    }

    Ok(tables)
}

/// First table referenced by a column expression
pub fn table_name(expression: &str) -> Result<Option<String>> {
    Ok(table_names(expression)?.into_iter().next())
}

/// Whether the expression is a plain identifier path such as `t.c` or `s.t.*`
pub fn is_identifier_path(expression: &str) -> bool {
    IDENTIFIER_PATH.is_match(expression)
}

/// Split a select entry into its expression and optional alias
///
/// Both `expr alias` and `expr AS alias` are recognised. Entries containing
/// parentheses are treated as SQL functions and never split.
pub fn split_alias(entry: &str) -> (&str, Option<&str>) {
    let entry = entry.trim();
    if entry.contains('(') || entry.contains(')') {
        return (entry, None);
    }

    match entry.rfind(' ') {
        Some(space) => {
            let alias = &entry[space + 1..];
            let mut expression = entry[..space].trim_end();
            if let Some(stripped) = strip_suffix_ignore_case(expression, " AS") {
                expression = stripped.trim_end();
            }
            (expression, Some(alias))
        }
        None => (entry, None),
    }
}

/// Unqualified column name of a plain column reference (`t.c` -> `c`)
pub fn column_name(expression: &str) -> &str {
    match expression.rfind('.') {
        Some(dot) => &expression[dot + 1..],
        None => expression,
    }
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    if text.len() >= suffix.len()
        && text.is_char_boundary(text.len() - suffix.len())
        && text[text.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
    {
        Some(&text[..text.len() - suffix.len()])
    } else {
        None
    }
}

//! Row limiting for each dialect's pagination strategy

use super::column::{column_name, split_alias};
use super::dialects::{Pagination, SqlDialect};
use super::query::Query;
use crate::error::{QueryError, Result};
use std::collections::HashSet;

/// Row-number column added by the subquery rewrite
pub const ROW_NUMBER_ALIAS: &str = "RN$";

/// Apply limit and offset to a query using the dialect's strategy
///
/// An offset of zero is the same as no offset.
pub fn apply_pagination(
    query: &mut Query,
    dialect: &dyn SqlDialect,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<()> {
    let offset = offset.filter(|offset| *offset > 0);
    if limit.is_none() && offset.is_none() {
        return Ok(());
    }

    match dialect.pagination() {
        Pagination::Native(template) => {
            let text = template.render(limit, offset).ok_or_else(|| {
                QueryError::unsupported_pagination(dialect.name(), "an offset requires a limit")
            })?;
            query.limit = Some(text);
            Ok(())
        }
        Pagination::Top => match (limit, offset) {
            (Some(limit), None) => {
                query.select_modifiers.push(format!("TOP {}", limit));
                Ok(())
            }
            _ => Err(QueryError::unsupported_pagination(
                dialect.name(),
                "only a row limit without offset can be expressed",
            )),
        },
        Pagination::RowNumRewrite => {
            row_number_rewrite(query, limit, offset);
            Ok(())
        }
        Pagination::Unsupported => Err(QueryError::unsupported_pagination(
            dialect.name(),
            "no limit or offset syntax",
        )),
    }
}

/// Wrap the query in a subquery bounded by ROWNUM
fn row_number_rewrite(query: &mut Query, limit: Option<i64>, offset: Option<i64>) {
    if query
        .select_clause
        .iter()
        .any(|column| is_function(column) && function_alias(column).is_none())
    {
        log::warn!("Unaliased function columns are not checked for duplicate names");
    }
    alias_duplicate_columns(&mut query.select_clause);

    let bound = match (limit, offset) {
        (Some(limit), Some(offset)) => format!(
            "B.{rn} > {} AND B.{rn} <= {}",
            offset,
            offset.saturating_add(limit),
            rn = ROW_NUMBER_ALIAS
        ),
        (Some(limit), None) => format!("B.{} <= {}", ROW_NUMBER_ALIAS, limit),
        (None, Some(offset)) => format!("B.{} > {}", ROW_NUMBER_ALIAS, offset),
        (None, None) => return,
    };

    query.pre_limit = Some(format!(
        "SELECT B.* FROM (SELECT A.*, rownum AS {} FROM (",
        ROW_NUMBER_ALIAS
    ));
    query.post_limit = Some(format!(") A) B WHERE {}", bound));
}

/// Give select entries that would produce the same result column name a
/// generated alias
///
/// The first occurrence of a name keeps it; later ones become `expr a0`,
/// `expr a1`, ... in left-to-right order. Aliases already present in the
/// list are never generated, and function entries are left alone.
///
/// ```
/// use querycraft::models::query_builder::pagination::alias_duplicate_columns;
///
/// let mut columns = vec!["c1".to_string(), "c2".to_string(), "t.c1".to_string()];
/// alias_duplicate_columns(&mut columns);
/// assert_eq!(columns, vec!["c1", "c2", "t.c1 a0"]);
/// ```
pub fn alias_duplicate_columns(columns: &mut [String]) {
    let mut names: HashSet<String> = columns
        .iter()
        .filter_map(|column| {
            if is_function(column) {
                function_alias(column)
            } else {
                split_alias(column).1
            }
        })
        .map(str::to_string)
        .collect();
    let mut counter = 0usize;

    for column in columns.iter_mut() {
        if is_function(column) {
            continue;
        }
        let (expression, alias) = split_alias(column);
        if alias.is_some() {
            continue;
        }

        let name = column_name(expression);
        if name == "*" {
            continue;
        }
        if names.insert(name.to_string()) {
            continue;
        }

        let generated = loop {
            let candidate = format!("a{}", counter);
            counter += 1;
            if !names.contains(&candidate) {
                break candidate;
            }
        };
        *column = format!("{} {}", expression, generated);
        names.insert(generated);
    }
}

fn is_function(column: &str) -> bool {
    column.contains('(')
}

/// Alias written after the closing parenthesis of a function entry,
/// as in `COUNT(t.c) AS n` or `MAX(t.c) m`
fn function_alias(column: &str) -> Option<&str> {
    let close = column.rfind(')')?;
    let tail = column[close + 1..].trim();
    let tail = match tail.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("AS ") => tail[3..].trim_start(),
        _ => tail,
    };
    if tail.is_empty() || tail.contains(char::is_whitespace) {
        None
    } else {
        Some(tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::query_builder::dialects::{
        DerbyDialect, MsSqlDialect, MySQLDialect, OracleDialect, PostgresDialect, SQLiteDialect,
    };

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn base_query() -> Query {
        Query {
            select_clause: columns(&["t.a"]),
            from_clause: columns(&["t"]),
            ..Query::default()
        }
    }

    #[test]
    fn test_repeated_names_get_sequential_aliases() {
        let mut select = columns(&["c1", "c2", "c1", "c1"]);
        alias_duplicate_columns(&mut select);
        assert_eq!(select, vec!["c1", "c2", "c1 a0", "c1 a1"]);
    }

    #[test]
    fn test_qualified_duplicate() {
        let mut select = columns(&["c1", "c2", "t.c1"]);
        alias_duplicate_columns(&mut select);
        assert_eq!(select, vec!["c1", "c2", "t.c1 a0"]);
    }

    #[test]
    fn test_existing_aliases_are_skipped() {
        let mut select = columns(&["x.c1", "y.c1", "z.c9 a0", "w.c1 AS a1"]);
        alias_duplicate_columns(&mut select);
        assert_eq!(select, vec!["x.c1", "y.c1 a2", "z.c9 a0", "w.c1 AS a1"]);

        let mut select = columns(&["s.c1", "t.c1", "COUNT(u.x) AS a0", "MAX(u.y) a1"]);
        alias_duplicate_columns(&mut select);
        assert_eq!(
            select,
            vec!["s.c1", "t.c1 a2", "COUNT(u.x) AS a0", "MAX(u.y) a1"]
        );
    }

    #[test]
    fn test_function_alias() {
        assert_eq!(function_alias("COUNT(u.x) AS a0"), Some("a0"));
        assert_eq!(function_alias("max(u.y) as top"), Some("top"));
        assert_eq!(function_alias("MAX(u.y) m"), Some("m"));
        assert_eq!(function_alias("COUNT(*)"), None);
        assert_eq!(function_alias("COALESCE(a.x, 0) + 1"), None);
    }

    #[test]
    fn test_column_named_like_an_alias() {
        let mut select = columns(&["x.total", "y.a0 total"]);
        alias_duplicate_columns(&mut select);
        assert_eq!(select, vec!["x.total a0", "y.a0 total"]);
    }

    #[test]
    fn test_functions_are_left_alone() {
        let mut select = columns(&["COUNT(t.c1)", "COUNT(t.c1)", "t.c1"]);
        alias_duplicate_columns(&mut select);
        assert_eq!(select, vec!["COUNT(t.c1)", "COUNT(t.c1)", "t.c1"]);
    }

    #[test]
    fn test_aliasing_is_deterministic() {
        let mut first = columns(&["a.id", "b.id", "c.id", "a0.x", "b.a0"]);
        let mut second = first.clone();
        alias_duplicate_columns(&mut first);
        alias_duplicate_columns(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn test_native_limit_offset() {
        let mut query = base_query();
        apply_pagination(&mut query, &PostgresDialect::new(), Some(5), Some(3)).unwrap();
        assert_eq!(query.to_sql(), "SELECT t.a FROM t LIMIT 5 OFFSET 3");

        let mut query = base_query();
        apply_pagination(&mut query, &MySQLDialect::new(), Some(5), Some(3)).unwrap();
        assert_eq!(query.to_sql(), "SELECT t.a FROM t LIMIT 3, 5");
    }

    #[test]
    fn test_zero_offset_is_dropped() {
        let mut query = base_query();
        apply_pagination(&mut query, &PostgresDialect::new(), Some(5), Some(0)).unwrap();
        assert_eq!(query.to_sql(), "SELECT t.a FROM t LIMIT 5");
    }

    #[test]
    fn test_offset_only() {
        let mut query = base_query();
        apply_pagination(&mut query, &SQLiteDialect::new(), None, Some(10)).unwrap();
        assert_eq!(query.to_sql(), "SELECT t.a FROM t LIMIT -1 OFFSET 10");
    }

    #[test]
    fn test_top() {
        let mut query = base_query();
        apply_pagination(&mut query, &MsSqlDialect::new(), Some(5), None).unwrap();
        assert_eq!(query.to_sql(), "SELECT TOP 5 t.a FROM t");

        let mut query = base_query();
        let err = apply_pagination(&mut query, &MsSqlDialect::new(), Some(5), Some(2)).unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedPagination { .. }));
    }

    #[test]
    fn test_row_number_rewrite() {
        let mut query = base_query();
        apply_pagination(&mut query, &OracleDialect::new(), Some(5), Some(3)).unwrap();
        assert_eq!(
            query.to_sql(),
            "SELECT B.* FROM (SELECT A.*, rownum AS RN$ FROM (SELECT t.a FROM t) A) B \
             WHERE B.RN$ > 3 AND B.RN$ <= 8"
        );

        let mut query = base_query();
        apply_pagination(&mut query, &OracleDialect::new(), Some(1), None).unwrap();
        assert_eq!(
            query.to_sql(),
            "SELECT B.* FROM (SELECT A.*, rownum AS RN$ FROM (SELECT t.a FROM t) A) B \
             WHERE B.RN$ <= 1"
        );
    }

    #[test]
    fn test_unsupported() {
        let mut query = base_query();
        let err = apply_pagination(&mut query, &DerbyDialect::new(), Some(5), Some(3)).unwrap_err();
        assert_eq!(err.error_code(), "E_UNSUPPORTED_PAGINATION");

        // nothing requested, nothing to reject
        let mut query = base_query();
        assert!(apply_pagination(&mut query, &DerbyDialect::new(), None, Some(0)).is_ok());
    }
}

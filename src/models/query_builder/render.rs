//! Criteria to SQL rendering
//!
//! Rendering is a pure function of the criteria and the dialect: the same
//! criteria always renders to the same text.

use super::column::table_names;
use super::criteria::Criteria;
use super::dialects::SqlDialect;
use super::pagination::apply_pagination;
use super::query::Query;
use super::writer::{RenderMode, SqlWriter};
use crate::database::config::DatabasesConfig;
use crate::database::registry::{DatabaseEntry, DatabaseRegistry};
use crate::database::types::SqlValue;
use crate::error::{QueryError, Result};
use std::collections::HashSet;

/// Render a criteria with every literal inlined
pub fn render(criteria: &Criteria, dialect: &dyn SqlDialect) -> Result<String> {
    let (query, _) = build_query(criteria, dialect, RenderMode::Inline, false)?;
    let sql = query.to_sql();

    #[cfg(debug_assertions)]
    log::debug!("{} SQL: {}", dialect.name(), sql);

    Ok(sql)
}

/// Render a criteria with placeholders, returning the bind values in
/// placeholder order
pub fn render_parameterized(
    criteria: &Criteria,
    dialect: &dyn SqlDialect,
) -> Result<(String, Vec<SqlValue>)> {
    let (query, params) = build_query(criteria, dialect, RenderMode::Parameterized, false)?;
    let sql = query.to_sql();

    #[cfg(debug_assertions)]
    {
        log::debug!("{} SQL: {}", dialect.name(), sql);
        log::debug!("  Parameters: {:?}", params);
    }

    Ok((sql, params))
}

/// Build the clause-level query for a criteria
///
/// `quote_identifiers` forces identifier quoting on top of the criteria's
/// own setting.
pub fn build_query(
    criteria: &Criteria,
    dialect: &dyn SqlDialect,
    mode: RenderMode,
    quote_identifiers: bool,
) -> Result<(Query, Vec<SqlValue>)> {
    let mut out = SqlWriter::new(dialect, mode)
        .quote_identifiers(quote_identifiers || criteria.quote_identifiers)
        .ignore_case(criteria.ignore_case);
    let mut query = Query::new();

    if criteria.distinct {
        query.select_modifiers.push("DISTINCT".to_string());
    }

    for column in &criteria.select_columns {
        query.select_clause.push(out.identifier(column));
    }
    for (alias, expression) in &criteria.as_columns {
        check_identifier(alias, dialect)?;
        query
            .select_clause
            .push(format!("{} AS {}", out.identifier(expression), alias));
    }
    if query.select_clause.is_empty() {
        let all = match &criteria.default_select_table {
            Some(table) => out.identifier(&format!("{}.*", table)),
            None => "*".to_string(),
        };
        query.select_clause.push(all);
    }

    build_from(criteria, dialect, &mut out, &mut query)?;

    if let Some(root) = &criteria.root {
        query.where_clause = Some(root.write(&mut out));
    }

    query.group_by_clause = criteria
        .group_by
        .iter()
        .map(|column| out.identifier(column))
        .collect();

    if let Some(having) = &criteria.having {
        query.having = Some(having.write(&mut out));
    }

    query.order_by_clause = criteria
        .order_by
        .iter()
        .map(|order| format!("{} {}", out.identifier(&order.column), order.direction.as_sql()))
        .collect();

    apply_pagination(&mut query, dialect, criteria.limit, criteria.offset)?;

    Ok((query, out.into_params()))
}

// Join targets are left out of the comma list, and tables a join condition
// refers to go last so the join attaches to them.
fn build_from(
    criteria: &Criteria,
    dialect: &dyn SqlDialect,
    out: &mut SqlWriter<'_>,
    query: &mut Query,
) -> Result<()> {
    let targets: HashSet<&str> = criteria.joins.iter().map(|j| j.table.as_str()).collect();
    let sources: HashSet<String> = criteria
        .joins
        .iter()
        .filter_map(|join| join.condition.as_ref())
        .flat_map(|condition| condition.column_refs())
        .filter_map(|column| table_names(column).ok())
        .flatten()
        .collect();

    let (joined, plain): (Vec<&String>, Vec<&String>) = criteria
        .tables
        .iter()
        .filter(|table| !targets.contains(table.as_str()))
        .partition(|table| sources.contains(table.as_str()));

    for table in plain.into_iter().chain(joined) {
        let entry = from_entry(criteria, dialect, out, table)?;
        query.from_clause.push(entry);
    }

    for join in &criteria.joins {
        let table = from_entry(criteria, dialect, out, &join.table)?;
        let clause = match &join.condition {
            Some(condition) => format!(
                "{} {} ON {}",
                join.join_type.as_sql(),
                table,
                condition.write(out)
            ),
            None => format!("{} {}", join.join_type.as_sql(), table),
        };
        query.join_clause.push(clause);
    }

    Ok(())
}

fn from_entry(
    criteria: &Criteria,
    dialect: &dyn SqlDialect,
    out: &SqlWriter<'_>,
    table: &str,
) -> Result<String> {
    match criteria.aliases.get(table) {
        Some(real) => {
            check_identifier(table, dialect)?;
            Ok(format!("{} {}", out.identifier(real), table))
        }
        None => Ok(out.identifier(table)),
    }
}

fn check_identifier(identifier: &str, dialect: &dyn SqlDialect) -> Result<()> {
    let max_length = dialect.max_identifier_length();
    if identifier.chars().count() > max_length {
        return Err(QueryError::IdentifierTooLong {
            identifier: identifier.to_string(),
            dialect: dialect.name().to_string(),
            max_length,
        });
    }
    Ok(())
}

/// Renders criteria against the databases of a [`DatabaseRegistry`]
///
/// A criteria naming a database with `set_db_name` renders with that
/// database's dialect, any other with the default database's.
pub struct QueryRenderer {
    registry: DatabaseRegistry,
}

impl QueryRenderer {
    pub fn new(registry: DatabaseRegistry) -> Self {
        Self { registry }
    }

    /// Resolve every configured database up front
    pub fn from_config(config: &DatabasesConfig) -> Result<Self> {
        Ok(Self::new(DatabaseRegistry::from_config(config)?))
    }

    pub fn registry(&self) -> &DatabaseRegistry {
        &self.registry
    }

    /// Database a criteria renders against
    pub fn database_for(&self, criteria: &Criteria) -> Result<&DatabaseEntry> {
        let database = self.registry.resolve(criteria.db_name())?;
        log::debug!(
            "Rendering for database '{}' ({})",
            database.name,
            database.dialect.name()
        );
        Ok(database)
    }

    pub fn render(&self, criteria: &Criteria) -> Result<String> {
        let database = self.database_for(criteria)?;
        let (query, _) = build_query(
            criteria,
            database.dialect.as_ref(),
            RenderMode::Inline,
            database.quote_identifiers,
        )?;
        Ok(query.to_sql())
    }

    pub fn render_parameterized(&self, criteria: &Criteria) -> Result<(String, Vec<SqlValue>)> {
        let database = self.database_for(criteria)?;
        let (query, params) = build_query(
            criteria,
            database.dialect.as_ref(),
            RenderMode::Parameterized,
            database.quote_identifiers,
        )?;
        let sql = query.to_sql();

        #[cfg(debug_assertions)]
        {
            log::debug!("{} SQL: {}", database.name, sql);
            log::debug!("  Parameters: {:?}", params);
        }

        Ok((sql, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::query_builder::criteria::JoinType;
    use crate::models::query_builder::criterion::Criterion;
    use crate::models::query_builder::dialects::{MySQLDialect, OracleDialect, PostgresDialect};

    #[test]
    fn test_default_projection() {
        let dialect = PostgresDialect::new();
        assert_eq!(render(&Criteria::new(), &dialect).unwrap(), "SELECT *");

        let criteria = Criteria::new().set_default_select_table("users");
        assert_eq!(render(&criteria, &dialect).unwrap(), "SELECT users.* FROM users");
    }

    #[test]
    fn test_join_rendering() {
        let criteria = Criteria::new()
            .add_select_column("a.name")
            .unwrap()
            .add_select_column("b.title")
            .unwrap()
            .add_join("a.id", "b.a_id", JoinType::Inner)
            .unwrap()
            .add("c.flag", 1)
            .unwrap();

        assert_eq!(
            render(&criteria, &PostgresDialect::new()).unwrap(),
            "SELECT a.name, b.title FROM c, a INNER JOIN b ON a.id=b.a_id WHERE c.flag=1"
        );
    }

    #[test]
    fn test_placeholders_follow_clause_order() {
        let on = Criterion::columns_eq("a.id", "b.a_id")
            .unwrap()
            .and(Criterion::eq("b.kind", "x").unwrap());
        let criteria = Criteria::new()
            .add_join_table("b", JoinType::Left, on)
            .unwrap()
            .add("a.id", 7)
            .unwrap()
            .add_group_by("a.id")
            .add_having(Criterion::custom("COUNT(*) > 1"))
            .unwrap();

        let (sql, params) = render_parameterized(&criteria, &PostgresDialect::new()).unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM a LEFT JOIN b ON a.id=b.a_id AND b.kind=$1 WHERE a.id=$2 \
             GROUP BY a.id HAVING COUNT(*) > 1"
        );
        assert_eq!(params, vec![SqlValue::from("x"), SqlValue::Int(7)]);
    }

    #[test]
    fn test_global_ignore_case_leaves_join_keys_alone() {
        let criteria = Criteria::new()
            .add_join("a.id", "b.a_id", JoinType::Inner)
            .unwrap()
            .add("a.name", "x")
            .unwrap()
            .add("a.id", 3)
            .unwrap()
            .set_ignore_case(true);

        assert_eq!(
            render(&criteria, &MySQLDialect::new()).unwrap(),
            "SELECT * FROM a INNER JOIN b ON a.id=b.a_id WHERE UPPER(a.name)=UPPER('x') AND a.id=3"
        );
    }

    #[test]
    fn test_explicit_ignore_case_on_column_comparison() {
        let on = Criterion::columns_eq("a.code", "b.code").unwrap().ignore_case();
        let criteria = Criteria::new()
            .add_join_table("b", JoinType::Inner, on)
            .unwrap();

        assert_eq!(
            render(&criteria, &MySQLDialect::new()).unwrap(),
            "SELECT * FROM a INNER JOIN b ON UPPER(a.code)=UPPER(b.code)"
        );
    }

    #[test]
    fn test_table_aliases() {
        let criteria = Criteria::new()
            .add_alias("u", "users")
            .add_select_column("u.name")
            .unwrap();
        assert_eq!(
            render(&criteria, &MySQLDialect::new()).unwrap(),
            "SELECT u.name FROM users u"
        );
    }

    #[test]
    fn test_identifier_quoting() {
        let criteria = Criteria::new()
            .add_select_column("users.name")
            .unwrap()
            .add("users.id", 1)
            .unwrap()
            .set_quote_identifiers(true);
        assert_eq!(
            render(&criteria, &MySQLDialect::new()).unwrap(),
            "SELECT `users`.`name` FROM `users` WHERE `users`.`id`=1"
        );
    }

    #[test]
    fn test_alias_length_is_checked() {
        let criteria = Criteria::new()
            .add_as_column("a_very_long_alias_name_over_thirty", "t.x")
            .unwrap();
        let err = render(&criteria, &OracleDialect::new()).unwrap_err();
        assert!(matches!(
            err,
            QueryError::IdentifierTooLong { max_length: 30, .. }
        ));
        assert!(render(&criteria, &PostgresDialect::new()).is_ok());
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let criteria = Criteria::new()
            .add_select_column("a.c1")
            .unwrap()
            .add_select_column("b.c1")
            .unwrap()
            .add_select_column("c.c1")
            .unwrap()
            .set_limit(10)
            .unwrap();

        let dialect = OracleDialect::new();
        let first = render(&criteria, &dialect).unwrap();
        assert_eq!(first, render(&criteria, &dialect).unwrap());
        assert!(first.contains("SELECT a.c1, b.c1 a0, c.c1 a1 FROM a, b, c"));
    }
}

//! Clause-level form of a SELECT statement
//!
//! The renderer fills a [`Query`] clause by clause; dialects then rewrite it
//! for pagination before it is turned into text.

/// SELECT statement split into its clauses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// `DISTINCT`, `TOP n`
    pub select_modifiers: Vec<String>,
    pub select_clause: Vec<String>,
    /// Comma-separated FROM entries
    pub from_clause: Vec<String>,
    /// `INNER JOIN t ON ...` entries following the FROM entries
    pub join_clause: Vec<String>,
    pub where_clause: Option<String>,
    pub group_by_clause: Vec<String>,
    pub having: Option<String>,
    pub order_by_clause: Vec<String>,
    /// Trailing row-limit text including its leading blank
    pub limit: Option<String>,
    /// Text wrapped around the whole statement by subquery pagination
    pub pre_limit: Option<String>,
    pub post_limit: Option<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_sql(&self) -> String {
        let mut sql = String::new();

        if let Some(pre) = &self.pre_limit {
            sql.push_str(pre);
        }

        sql.push_str("SELECT ");
        for modifier in &self.select_modifiers {
            sql.push_str(modifier);
            sql.push(' ');
        }
        sql.push_str(&self.select_clause.join(", "));

        if !self.from_clause.is_empty() || !self.join_clause.is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&self.from_clause.join(", "));
            for join in &self.join_clause {
                sql.push(' ');
                sql.push_str(join);
            }
        }

        if let Some(condition) = &self.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(condition);
        }

        if !self.group_by_clause.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by_clause.join(", "));
        }

        if let Some(having) = &self.having {
            sql.push_str(" HAVING ");
            sql.push_str(having);
        }

        if !self.order_by_clause.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by_clause.join(", "));
        }

        if let Some(limit) = &self.limit {
            sql.push_str(limit);
        }

        if let Some(post) = &self.post_limit {
            sql.push_str(post);
        }

        sql
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use querycraft::{
        render, render_parameterized, Criteria, Criterion, JoinType, MySQLDialect, OracleDialect,
        PostgresDialect, QueryError, SQLiteDialect, SqlDialect, SqlValue,
    };

    #[test]
    fn test_empty_select_list() {
        let dialect = PostgresDialect::new();

        let criteria = Criteria::new().add("users.active", true).unwrap();
        assert_eq!(
            render(&criteria, &dialect).unwrap(),
            "SELECT * FROM users WHERE users.active=TRUE"
        );

        let criteria = Criteria::new()
            .set_default_select_table("users")
            .add_join("users.id", "roles.user_id", JoinType::Left)
            .unwrap();
        assert_eq!(
            render(&criteria, &dialect).unwrap(),
            "SELECT users.* FROM users LEFT JOIN roles ON users.id=roles.user_id"
        );
    }

    #[test]
    fn test_or_of_and_groups() {
        let left = Criterion::eq("t.A", 1)
            .unwrap()
            .and(Criterion::eq("t.B", 2).unwrap());
        let right = Criterion::eq("t.C", 3)
            .unwrap()
            .and(Criterion::eq("t.D", 4).unwrap());
        let criteria = Criteria::new().add_predicate(left.or(right)).unwrap();

        assert_eq!(
            render(&criteria, &PostgresDialect::new()).unwrap(),
            "SELECT * FROM t WHERE (t.A=1 AND t.B=2) OR (t.C=3 AND t.D=4)"
        );
    }

    #[test]
    fn test_full_statement() {
        let criteria = Criteria::new()
            .set_distinct(true)
            .add_select_column("customers.country")
            .unwrap()
            .add_as_column("orders_total", "SUM(orders.total)")
            .unwrap()
            .add_join("customers.id", "orders.customer_id", JoinType::Inner)
            .unwrap()
            .add_predicate(Criterion::like("customers.name", "A*").unwrap())
            .unwrap()
            .add_predicate(Criterion::is_in("orders.status", vec!["paid", "sent"]).unwrap())
            .unwrap()
            .add_group_by("customers.country")
            .add_having(Criterion::custom("SUM(orders.total) > 1000"))
            .unwrap()
            .add_descending_order_by("orders_total")
            .set_limit(20)
            .unwrap();

        assert_eq!(
            render(&criteria, &MySQLDialect::new()).unwrap(),
            "SELECT DISTINCT customers.country, SUM(orders.total) AS orders_total \
             FROM customers INNER JOIN orders ON customers.id=orders.customer_id \
             WHERE customers.name LIKE 'A%' AND orders.status IN ('paid','sent') \
             GROUP BY customers.country HAVING SUM(orders.total) > 1000 \
             ORDER BY orders_total DESC LIMIT 20"
        );
    }

    #[test]
    fn test_parameterized_placeholders_per_dialect() {
        let criteria = Criteria::new()
            .add("users.name", "bob")
            .unwrap()
            .add_predicate(Criterion::gt("users.age", 30).unwrap())
            .unwrap();

        let (sql, params) = render_parameterized(&criteria, &PostgresDialect::new()).unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE users.name=$1 AND users.age>$2");
        assert_eq!(params, vec![SqlValue::from("bob"), SqlValue::Int(30)]);

        let (sql, _) = render_parameterized(&criteria, &MySQLDialect::new()).unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE users.name=? AND users.age>?");

        let (sql, _) = render_parameterized(&criteria, &OracleDialect::new()).unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE users.name=:1 AND users.age>:2");
    }

    #[test]
    fn test_inline_literals_follow_dialect() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let criteria = Criteria::new()
            .add("events.public", false)
            .unwrap()
            .add_predicate(Criterion::ge("events.day", date).unwrap())
            .unwrap();

        assert_eq!(
            render(&criteria, &SQLiteDialect::new()).unwrap(),
            "SELECT * FROM events WHERE events.public=0 AND events.day>='2024-03-01'"
        );
        assert_eq!(
            render(&criteria, &OracleDialect::new()).unwrap(),
            "SELECT * FROM events WHERE events.public=0 \
             AND events.day>=TO_DATE('2024-03-01', 'YYYY-MM-DD')"
        );
    }

    #[test]
    fn test_ignore_case_criteria() {
        let criteria = Criteria::new()
            .add("users.email", "Bob@Example.com")
            .unwrap()
            .add_predicate(Criterion::like("users.name", "b*").unwrap())
            .unwrap()
            .set_ignore_case(true);

        assert_eq!(
            render(&criteria, &MySQLDialect::new()).unwrap(),
            "SELECT * FROM users WHERE UPPER(users.email)=UPPER('Bob@Example.com') \
             AND UPPER(users.name) LIKE UPPER('b%')"
        );
        assert_eq!(
            render(&criteria, &PostgresDialect::new()).unwrap(),
            "SELECT * FROM users WHERE UPPER(users.email)=UPPER('Bob@Example.com') \
             AND users.name ILIKE 'b%'"
        );
    }

    #[test]
    fn test_ignore_case_does_not_fold_join_condition() {
        let criteria = Criteria::new()
            .add_join("a.id", "b.a_id", JoinType::Inner)
            .unwrap()
            .add("a.name", "x")
            .unwrap()
            .set_ignore_case(true);

        assert_eq!(
            render(&criteria, &PostgresDialect::new()).unwrap(),
            "SELECT * FROM a INNER JOIN b ON a.id=b.a_id WHERE UPPER(a.name)=UPPER('x')"
        );
    }

    #[test]
    fn test_oracle_rewrite_keeps_function_alias_unique() {
        let criteria = Criteria::new()
            .add_select_column("s.c1")
            .unwrap()
            .add_select_column("t.c1")
            .unwrap()
            .add_as_column("a0", "COUNT(u.x)")
            .unwrap()
            .set_limit(1)
            .unwrap();

        assert_eq!(
            render(&criteria, &OracleDialect::new()).unwrap(),
            "SELECT B.* FROM (SELECT A.*, rownum AS RN$ FROM (SELECT s.c1, t.c1 a1, \
             COUNT(u.x) AS a0 FROM s, t, u) A) B WHERE B.RN$ <= 1"
        );
    }

    #[test]
    fn test_as_column_tables_reach_from_clause() {
        let criteria = Criteria::new()
            .add_as_column("n", "COUNT(orders.id)")
            .unwrap();

        assert_eq!(
            render(&criteria, &MySQLDialect::new()).unwrap(),
            "SELECT COUNT(orders.id) AS n FROM orders"
        );
    }

    #[test]
    fn test_group_by_and_having_tables_reach_from_clause() {
        let criteria = Criteria::new()
            .add_select_column("COUNT(*)")
            .unwrap()
            .add_group_by("orders.status")
            .add_having(Criterion::gt("orders.total", 5).unwrap())
            .unwrap();

        assert_eq!(
            render(&criteria, &MySQLDialect::new()).unwrap(),
            "SELECT COUNT(*) FROM orders GROUP BY orders.status HAVING orders.total>5"
        );

        let err = Criteria::new()
            .add_having(Criterion::gt("total", 5).unwrap())
            .unwrap_err();
        assert!(matches!(err, QueryError::MalformedColumnReference { .. }));
    }

    #[test]
    fn test_render_twice_is_identical() {
        let criteria = Criteria::new()
            .add_select_column("a.id")
            .unwrap()
            .add_select_column("b.id")
            .unwrap()
            .add_predicate(Criterion::is_in("a.x", vec![1, 2]).unwrap())
            .unwrap()
            .set_limit(3)
            .unwrap();

        let postgres = PostgresDialect::new();
        let oracle = OracleDialect::new();
        let dialects: [&dyn SqlDialect; 2] = [&postgres, &oracle];
        for dialect in dialects {
            assert_eq!(
                render(&criteria, dialect).unwrap(),
                render(&criteria, dialect).unwrap()
            );
        }
    }

    #[test]
    fn test_criteria_display() {
        let criteria = Criteria::new().add("t.id", 5).unwrap();
        assert_eq!(criteria.to_string(), "SELECT * FROM t WHERE t.id=5");
    }
}

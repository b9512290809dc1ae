#[cfg(test)]
mod tests {
    use querycraft::models::query_builder::{JoinType, SqlOperator};
    use querycraft::{Criteria, Criterion, QueryError, SqlValue};

    fn tables(criteria: &Criteria) -> Vec<String> {
        criteria.tables().iter().cloned().collect()
    }

    #[test]
    fn test_embedded_comparisons_register_table() {
        let criteria = Criteria::new()
            .add_predicate(Criterion::custom("table.column < 10"))
            .unwrap();
        assert_eq!(tables(&criteria), vec!["table"]);

        let criteria = Criteria::new()
            .add_predicate(Criterion::custom("10 > table.column"))
            .unwrap();
        assert_eq!(tables(&criteria), vec!["table"]);
    }

    #[test]
    fn test_wildcard_columns_register_no_table() {
        for column in ["*", "count(*)"] {
            let criteria = Criteria::new().add_select_column(column).unwrap();
            assert!(criteria.tables().is_empty(), "{} registered a table", column);
        }
    }

    #[test]
    fn test_bare_column_is_malformed() {
        let err = Criteria::new()
            .add_with("column", SqlOperator::LessThan, 10)
            .unwrap_err();
        assert!(matches!(err, QueryError::MalformedColumnReference { .. }));
        assert_eq!(err.error_code(), "E_MALFORMED_COLUMN");
    }

    #[test]
    fn test_schema_and_function_columns() {
        let criteria = Criteria::new()
            .add_select_column("app.users.name")
            .unwrap()
            .add_select_column("MAX(orders.total)")
            .unwrap();
        assert_eq!(tables(&criteria), vec!["app.users", "orders"]);
    }

    #[test]
    fn test_table_registration_order_is_stable() {
        let criteria = Criteria::new()
            .add("b.x", 1)
            .unwrap()
            .add("a.x", 2)
            .unwrap()
            .add("b.y", 3)
            .unwrap()
            .add_table("c");
        assert_eq!(tables(&criteria), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_invalid_operator_usage() {
        let err = Criteria::new()
            .add_with("t.c", SqlOperator::In, 5)
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidOperator { .. }));

        let err = Criteria::new()
            .add_with("t.c", SqlOperator::IsNull, 5)
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidOperator { .. }));

        // IS NULL with a NULL operand is fine
        assert!(Criteria::new()
            .add_with("t.c", SqlOperator::IsNull, SqlValue::Null)
            .is_ok());
    }

    #[test]
    fn test_negative_limits() {
        assert!(matches!(
            Criteria::new().set_limit(-3),
            Err(QueryError::InvalidArgument(_))
        ));
        assert!(matches!(
            Criteria::new().set_offset(-1),
            Err(QueryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_join_table_registers_condition_tables() {
        let on = Criterion::columns_eq("orders.user_id", "users.id")
            .unwrap()
            .and(Criterion::columns_eq("orders.shop_id", "shops.id").unwrap());
        let criteria = Criteria::new()
            .add_join_table("orders", JoinType::Inner, on)
            .unwrap();
        assert_eq!(tables(&criteria), vec!["users", "shops"]);
    }

    #[test]
    fn test_malformed_join_column() {
        let err = Criteria::new()
            .add_join("users.id", "user_id", JoinType::Inner)
            .unwrap_err();
        assert!(matches!(err, QueryError::MalformedColumnReference { .. }));
    }
}

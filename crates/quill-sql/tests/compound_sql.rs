use pretty_assertions::assert_eq;

use quill_core::{
    driver::Capability,
    stmt::{Cte, Expr, Query, Select, SetOp, Statement, With},
};
use quill_sql::{Inline, Serializer};

fn pg(stmt: &Statement) -> String {
    Serializer::postgresql(&Capability::POSTGRESQL)
        .serialize(stmt, &mut Inline)
        .unwrap()
}

fn select_from(table: &str) -> Query {
    Query::new(Select::new(Expr::column(table)))
}

// ---------------------------------------------------------------------------
// Set operations
// ---------------------------------------------------------------------------

#[test]
fn union_of_two_selects() {
    let mut query = select_from("a");
    query.union(select_from("b"));

    assert_eq!(
        pg(&Statement::Query(query)),
        "SELECT * FROM a UNION SELECT * FROM b"
    );
}

#[test]
fn chained_same_operator_appends() {
    let mut query = select_from("a");
    query.union(select_from("b"));
    query.union(select_from("c"));

    assert_eq!(
        pg(&Statement::Query(query)),
        "SELECT * FROM a UNION SELECT * FROM b UNION SELECT * FROM c"
    );
}

#[test]
fn union_all_and_friends() {
    let mut query = select_from("a");
    query.set_op(SetOp::Union, true, select_from("b"));
    assert_eq!(
        pg(&Statement::Query(query)),
        "SELECT * FROM a UNION ALL SELECT * FROM b"
    );

    let mut query = select_from("a");
    query.set_op(SetOp::Intersect, false, select_from("b"));
    assert_eq!(
        pg(&Statement::Query(query)),
        "SELECT * FROM a INTERSECT SELECT * FROM b"
    );

    let mut query = select_from("a");
    query.set_op(SetOp::Except, false, select_from("b"));
    assert_eq!(
        pg(&Statement::Query(query)),
        "SELECT * FROM a EXCEPT SELECT * FROM b"
    );
}

#[test]
fn mysql_rejects_intersect() {
    let mut query = select_from("a");
    query.set_op(SetOp::Intersect, false, select_from("b"));

    let err = Serializer::mysql(&Capability::MYSQL)
        .serialize(&Statement::Query(query), &mut Inline)
        .unwrap_err();
    assert!(err.is_unsupported());
}

#[test]
fn intersect_all_is_postgres_only() {
    let mut query = select_from("a");
    query.set_op(SetOp::Intersect, true, select_from("b"));
    let stmt = Statement::Query(query);

    assert_eq!(
        pg(&stmt),
        "SELECT * FROM a INTERSECT ALL SELECT * FROM b"
    );

    let err = Serializer::sqlite(&Capability::SQLITE)
        .serialize(&stmt, &mut Inline)
        .unwrap_err();
    assert!(err.is_unsupported());
}

// ---------------------------------------------------------------------------
// Derived tables get generated aliases
// ---------------------------------------------------------------------------

#[test]
fn anonymous_derived_table_gets_t1() {
    let mut inner = select_from("a");
    inner.union(select_from("b"));

    let outer = Query::new(Select::new(Expr::subquery(inner)));
    assert_eq!(
        pg(&Statement::Query(outer)),
        "SELECT * FROM (SELECT * FROM a UNION SELECT * FROM b) AS t1"
    );
}

#[test]
fn sibling_derived_tables_count_up() {
    let mut select = Select::new(Expr::subquery(select_from("a")));
    select.from.push(Expr::subquery(select_from("b")));

    assert_eq!(
        pg(&Statement::Query(Query::new(select))),
        "SELECT * FROM (SELECT * FROM a) AS t1, (SELECT * FROM b) AS t2"
    );
}

#[test]
fn aliased_derived_table_keeps_its_name() {
    let select = Select::new(Expr::alias(Expr::subquery(select_from("a")), "inner_a"));
    assert_eq!(
        pg(&Statement::Query(Query::new(select))),
        "SELECT * FROM (SELECT * FROM a) AS inner_a"
    );
}

// ---------------------------------------------------------------------------
// Common table expressions
// ---------------------------------------------------------------------------

#[test]
fn with_clause() {
    let mut query = select_from("recent");
    query.with = Some(With {
        recursive: false,
        ctes: vec![Cte::new("recent", select_from("events"))],
    });

    assert_eq!(
        pg(&Statement::Query(query)),
        "WITH recent AS (SELECT * FROM events) SELECT * FROM recent"
    );
}

#[test]
fn recursive_with_and_column_list() {
    let mut cte = Cte::new("walk", select_from("edges"));
    cte.columns = vec!["id".into(), "parent_id".into()];

    let mut query = select_from("walk");
    query.with = Some(With {
        recursive: true,
        ctes: vec![cte],
    });

    assert_eq!(
        pg(&Statement::Query(query)),
        "WITH RECURSIVE walk (id, parent_id) AS (SELECT * FROM edges) SELECT * FROM walk"
    );
}

#[test]
fn multiple_ctes_comma_separated() {
    let mut query = select_from("x");
    query.with = Some(With {
        recursive: false,
        ctes: vec![
            Cte::new("x", select_from("a")),
            Cte::new("y", select_from("b")),
        ],
    });

    assert_eq!(
        pg(&Statement::Query(query)),
        "WITH x AS (SELECT * FROM a), y AS (SELECT * FROM b) SELECT * FROM x"
    );
}

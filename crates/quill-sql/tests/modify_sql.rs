use pretty_assertions::assert_eq;

use quill_core::{
    driver::Capability,
    stmt::{
        Assignments, Delete, Expr, Insert, InsertSource, Query, Select, Statement, Update,
        Values,
    },
};
use quill_sql::{Inline, Serializer};

fn pg(stmt: &Statement) -> String {
    Serializer::postgresql(&Capability::POSTGRESQL)
        .serialize(stmt, &mut Inline)
        .unwrap()
}

fn mysql(stmt: &Statement) -> quill_core::Result<String> {
    Serializer::mysql(&Capability::MYSQL).serialize(stmt, &mut Inline)
}

fn insert_rows() -> Insert {
    Insert::new(
        "albums",
        vec!["name".into(), "artist_id".into()],
        InsertSource::Values(Values::new(vec![vec![
            Expr::from("Born to Run"),
            Expr::from(3i64),
        ]])),
    )
}

// ---------------------------------------------------------------------------
// INSERT
// ---------------------------------------------------------------------------

#[test]
fn insert_values() {
    assert_eq!(
        pg(&Statement::Insert(insert_rows())),
        "INSERT INTO albums (name, artist_id) VALUES ('Born to Run', 3)"
    );
}

#[test]
fn insert_multiple_rows() {
    let insert = Insert::new(
        "points",
        vec!["x".into(), "y".into()],
        InsertSource::Values(Values::new(vec![
            vec![Expr::from(1i64), Expr::from(2i64)],
            vec![Expr::from(3i64), Expr::from(4i64)],
        ])),
    );
    assert_eq!(
        pg(&Statement::Insert(insert)),
        "INSERT INTO points (x, y) VALUES (1, 2), (3, 4)"
    );
}

#[test]
fn insert_defaults_per_dialect() {
    let insert = Insert::new("albums", vec![], InsertSource::Values(Values::default()));
    let stmt = Statement::Insert(insert);

    assert_eq!(pg(&stmt), "INSERT INTO albums DEFAULT VALUES");
    assert_eq!(mysql(&stmt).unwrap(), "INSERT INTO albums () VALUES ()");
}

#[test]
fn insert_from_query() {
    let insert = Insert::new(
        "archive",
        vec!["id".into()],
        InsertSource::Query(Box::new(Query::new({
            let mut select = Select::new(Expr::column("events"));
            select.columns = vec![Expr::column("id")];
            select
        }))),
    );
    assert_eq!(
        pg(&Statement::Insert(insert)),
        "INSERT INTO archive (id) SELECT id FROM events"
    );
}

#[test]
fn insert_returning_gates_on_capability() {
    let mut insert = insert_rows();
    insert.returning = Some(vec![Expr::column("id")]);
    let stmt = Statement::Insert(insert);

    assert_eq!(
        pg(&stmt),
        "INSERT INTO albums (name, artist_id) VALUES ('Born to Run', 3) RETURNING id"
    );
    assert!(mysql(&stmt).unwrap_err().is_unsupported());
}

// ---------------------------------------------------------------------------
// UPDATE
// ---------------------------------------------------------------------------

#[test]
fn update_set_where() {
    let mut update = Update::new(
        "albums",
        Assignments::from_iter([("name", Expr::from("Nebraska"))]),
    );
    update.filter.add_filter(Expr::eq(Expr::column("id"), 5i64));

    assert_eq!(
        pg(&Statement::Update(update)),
        "UPDATE albums SET name = 'Nebraska' WHERE (id = 5)"
    );
}

#[test]
fn update_multiple_assignments_keep_order() {
    let update = Update::new(
        "counters",
        Assignments::from_iter([
            ("a", Expr::from(1i64)),
            ("b", Expr::add(Expr::column("b"), 1i64)),
        ]),
    );

    assert_eq!(
        pg(&Statement::Update(update)),
        "UPDATE counters SET a = 1, b = (b + 1)"
    );
}

// ---------------------------------------------------------------------------
// DELETE
// ---------------------------------------------------------------------------

#[test]
fn delete_where() {
    let mut delete = Delete::new("albums");
    delete
        .filter
        .add_filter(Expr::eq(Expr::column("artist_id"), 3i64));

    assert_eq!(
        pg(&Statement::Delete(delete)),
        "DELETE FROM albums WHERE (artist_id = 3)"
    );
}

#[test]
fn delete_without_filter_is_everything() {
    assert_eq!(pg(&Statement::Delete(Delete::new("albums"))), "DELETE FROM albums");
}

#[test]
fn delete_returning() {
    let mut delete = Delete::new("albums");
    delete.returning = Some(vec![Expr::column("id")]);

    assert_eq!(
        pg(&Statement::Delete(delete)),
        "DELETE FROM albums RETURNING id"
    );
}

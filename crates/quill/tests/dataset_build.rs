mod support;

use pretty_assertions::assert_eq;

use quill::stmt::{Expr, OrderByExpr};
use support::mock_db;

fn db() -> quill::Db {
    mock_db(2).0
}

// ---------------------------------------------------------------------------
// The headline shapes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn filtered_ordered_select() {
    let db = db();
    let sql = db
        .table("albums")
        .filter(Expr::eq(Expr::column("artist_id"), 1i64))
        .order_by([Expr::column("name")])
        .sql()
        .unwrap();

    assert_eq!(sql, "SELECT * FROM albums WHERE (artist_id = 1) ORDER BY name");
}

#[tokio::test]
async fn filter_then_exclude() {
    let db = db();
    let sql = db
        .table("t")
        .filter(Expr::eq(Expr::column("a"), 1i64))
        .exclude(Expr::eq(Expr::column("b"), 2i64))
        .sql()
        .unwrap();

    assert_eq!(sql, "SELECT * FROM t WHERE ((a = 1) AND NOT (b = 2))");
}

// ---------------------------------------------------------------------------
// Immutability
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chaining_never_mutates_the_receiver() {
    let db = db();
    let base = db.table("albums");
    let before = base.sql().unwrap();

    // Derive away in every direction
    let _ = base.filter(Expr::eq(Expr::column("id"), 1i64));
    let _ = base.select([Expr::column("name")]);
    let _ = base.order_by([OrderByExpr::desc(Expr::column("name"))]);
    let _ = base.limit(10).unwrap();
    let _ = base.distinct();
    let _ = base.for_update();

    assert_eq!(base.sql().unwrap(), before);
}

#[tokio::test]
async fn derived_datasets_are_independent() {
    let db = db();
    let base = db.table("t").filter(Expr::eq(Expr::column("a"), 1i64));

    let with_b = base.filter(Expr::eq(Expr::column("b"), 2i64));
    let with_c = base.filter(Expr::eq(Expr::column("c"), 3i64));

    assert_eq!(
        with_b.sql().unwrap(),
        "SELECT * FROM t WHERE ((a = 1) AND (b = 2))"
    );
    assert_eq!(
        with_c.sql().unwrap(),
        "SELECT * FROM t WHERE ((a = 1) AND (c = 3))"
    );
}

// ---------------------------------------------------------------------------
// Filter composition rules
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stacked_filters_flatten_into_one_and() {
    let db = db();
    let chained = db
        .table("t")
        .filter(Expr::eq(Expr::column("a"), 1i64))
        .filter(Expr::eq(Expr::column("b"), 2i64))
        .filter(Expr::eq(Expr::column("c"), 3i64))
        .sql()
        .unwrap();

    let composed = db
        .table("t")
        .filter(
            Expr::and_all(vec![
                Expr::eq(Expr::column("a"), 1i64),
                Expr::eq(Expr::column("b"), 2i64),
                Expr::eq(Expr::column("c"), 3i64),
            ])
            .unwrap(),
        )
        .sql()
        .unwrap();

    assert_eq!(chained, composed);
    assert_eq!(
        chained,
        "SELECT * FROM t WHERE ((a = 1) AND (b = 2) AND (c = 3))"
    );
}

#[tokio::test]
async fn or_requires_an_existing_filter() {
    let db = db();
    let err = db
        .table("t")
        .or(Expr::eq(Expr::column("a"), 1i64))
        .unwrap_err();
    assert!(err.is_build());

    let sql = db
        .table("t")
        .filter(Expr::eq(Expr::column("a"), 1i64))
        .or(Expr::eq(Expr::column("b"), 2i64))
        .unwrap()
        .sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM t WHERE ((a = 1) OR (b = 2))");
}

#[tokio::test]
async fn exclude_empty_membership_is_constant_true() {
    let db = db();
    let sql = db
        .table("t")
        .exclude(Expr::in_list(Expr::column("col"), Vec::<Expr>::new()))
        .sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM t WHERE (1 = 1)");

    let sql = db
        .table("t")
        .filter(Expr::in_list(Expr::column("col"), Vec::<Expr>::new()))
        .sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM t WHERE (1 = 0)");
}

// ---------------------------------------------------------------------------
// Select list management
// ---------------------------------------------------------------------------

#[tokio::test]
async fn select_replace_and_append() {
    let db = db();
    let ds = db.table("albums").select([Expr::column("id")]);
    assert_eq!(ds.sql().unwrap(), "SELECT id FROM albums");

    let more = ds.select_append([Expr::column("name")]);
    assert_eq!(more.sql().unwrap(), "SELECT id, name FROM albums");

    // select_more is select_append
    let even_more = more.select_more([Expr::column("year")]);
    assert_eq!(
        even_more.sql().unwrap(),
        "SELECT id, name, year FROM albums"
    );

    // Replacing starts over
    let replaced = even_more.select([Expr::count_star()]);
    assert_eq!(replaced.sql().unwrap(), "SELECT count(*) FROM albums");
}

// ---------------------------------------------------------------------------
// Pagination guards
// ---------------------------------------------------------------------------

#[tokio::test]
async fn paginate_after_limit_errors() {
    let db = db();
    let limited = db.table("t").limit(10).unwrap();
    let err = limited.paginate(1, 20).unwrap_err();
    assert!(err.is_build());
}

#[tokio::test]
async fn limit_after_paginate_errors() {
    let db = db();
    let page = db.table("t").paginate(1, 20).unwrap();
    assert!(page.limit(10).unwrap_err().is_build());
    assert!(page.offset(5).unwrap_err().is_build());
    assert!(page.paginate(2, 20).unwrap_err().is_build());
}

#[tokio::test]
async fn paginate_computes_offsets() {
    let db = db();
    assert_eq!(
        db.table("t").paginate(1, 20).unwrap().sql().unwrap(),
        "SELECT * FROM t LIMIT 20"
    );
    assert_eq!(
        db.table("t").paginate(3, 20).unwrap().sql().unwrap(),
        "SELECT * FROM t LIMIT 20 OFFSET 40"
    );
    assert!(db.table("t").paginate(0, 20).unwrap_err().is_build());
}

// ---------------------------------------------------------------------------
// Grouping guards
// ---------------------------------------------------------------------------

#[tokio::test]
async fn having_requires_group_by() {
    let db = db();
    let err = db
        .table("t")
        .having(Expr::gt(Expr::count_star(), 1i64))
        .unwrap_err();
    assert!(err.is_build());

    let sql = db
        .table("t")
        .group_by([Expr::column("a")])
        .having(Expr::gt(Expr::count_star(), 1i64))
        .unwrap()
        .sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM t GROUP BY a HAVING (count(*) > 1)"
    );
}

// ---------------------------------------------------------------------------
// Compounds wrap as aliased subselects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn union_wraps_with_generated_alias() {
    let db = db();
    let sql = db.table("a").union(&db.table("b")).sql().unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM (SELECT * FROM a UNION SELECT * FROM b) AS t1"
    );
}

#[tokio::test]
async fn union_side_with_order_is_wrapped_only_as_needed() {
    let db = db();
    let ordered = db.table("a").order_by([Expr::column("name")]);
    let sql = ordered.union(&db.table("b")).sql().unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM (SELECT * FROM (SELECT * FROM a ORDER BY name) AS t2 \
         UNION SELECT * FROM b) AS t1"
    );
}

#[tokio::test]
async fn chained_compounds() {
    let db = db();
    let sql = db
        .table("a")
        .union(&db.table("b"))
        .union_all(&db.table("c"))
        .sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM (SELECT * FROM (SELECT * FROM a UNION SELECT * FROM b) AS t2 \
         UNION ALL SELECT * FROM c) AS t1"
    );
}

// ---------------------------------------------------------------------------
// Raw SQL guard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn raw_fragments_allowed_by_default() {
    let db = db();
    let sql = db
        .table("t")
        .filter_raw("a = any(b)")
        .unwrap()
        .sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM t WHERE a = any(b)");
}

#[tokio::test]
async fn raw_fragments_can_be_forbidden() {
    let db = quill::Db::builder()
        .driver(support::MockDriver::new())
        .forbid_raw_sql()
        .build()
        .unwrap();

    assert!(db.table("t").filter_raw("a = 1").unwrap_err().is_build());
    assert!(db.table("t").select_raw("a + 1").unwrap_err().is_build());

    // A raw expression smuggled in directly is refused at render time
    let err = db.table("t").filter(Expr::raw("1 = 1")).sql().unwrap_err();
    assert!(err.is_build());
}

// ---------------------------------------------------------------------------
// Miscellaneous chaining
// ---------------------------------------------------------------------------

#[tokio::test]
async fn from_self_wraps_with_alias() {
    let db = db();
    let sql = db
        .table("t")
        .filter(Expr::eq(Expr::column("a"), 1i64))
        .from_self()
        .sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM (SELECT * FROM t WHERE (a = 1)) AS t1");
}

#[tokio::test]
async fn reverse_flips_order() {
    let db = db();
    let ds = db
        .table("t")
        .order_by([OrderByExpr::desc(Expr::column("a"))])
        .order_append([Expr::column("b")]);
    assert_eq!(ds.sql().unwrap(), "SELECT * FROM t ORDER BY a DESC, b");
    assert_eq!(
        ds.reverse().sql().unwrap(),
        "SELECT * FROM t ORDER BY a, b DESC"
    );
}

#[tokio::test]
async fn with_attaches_ctes() {
    let db = db();
    let recent = db.table("events").filter(Expr::gt(Expr::column("id"), 100i64));
    let sql = db.table("recent").with("recent", &recent).sql().unwrap();
    assert_eq!(
        sql,
        "WITH recent AS (SELECT * FROM events WHERE (id > 100)) SELECT * FROM recent"
    );
}

#[tokio::test]
async fn prepared_sql_binds_values() {
    let db = db();
    let ds = db
        .table("albums")
        .filter(Expr::eq(Expr::column("artist_id"), 1i64));

    let (template, params) = ds.prepared_sql().unwrap();
    assert_eq!(template, "SELECT * FROM albums WHERE (artist_id = $1)");
    assert_eq!(params, vec![quill::stmt::Value::I64(1)]);

    // Same shape, different value: identical template
    let other = db
        .table("albums")
        .filter(Expr::eq(Expr::column("artist_id"), 2i64));
    assert_eq!(other.prepared_sql().unwrap().0, template);
}

#[tokio::test]
async fn locks_render_after_everything() {
    let db = db();
    let sql = db
        .table("t")
        .filter(Expr::eq(Expr::column("a"), 1i64))
        .for_update()
        .sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM t WHERE (a = 1) FOR UPDATE");
}

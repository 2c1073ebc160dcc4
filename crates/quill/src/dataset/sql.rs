//! SQL production for datasets. Everything here is pure: option map in,
//! SQL text out, with typed errors for malformed combinations.

use quill_core::{
    stmt::{
        Assignments, Delete, Expr, Ident, Insert, InsertSource, Limit, OrderBy, Query, Select,
        Statement, Value, Values, With,
    },
    Error, Result,
};
use quill_sql::Inline;

use super::Dataset;

impl Dataset {
    /// Assembles the statement tree for this dataset's SELECT.
    pub(crate) fn to_query(&self) -> Query {
        let opts = &self.opts;

        let select = Select {
            distinct: opts.distinct.clone(),
            columns: opts.select.clone(),
            from: opts.from.clone(),
            joins: opts.joins.clone(),
            filter: opts.filter.clone(),
            group_by: opts.group.clone(),
            having: opts.having.clone(),
        };

        let with = if opts.ctes.is_empty() {
            None
        } else {
            Some(With {
                recursive: opts.recursive_ctes,
                ctes: opts.ctes.clone(),
            })
        };

        let limit = if opts.limit.is_none() && opts.offset.is_none() {
            None
        } else {
            Some(Limit {
                count: opts.limit,
                offset: opts.offset,
            })
        };

        Query {
            with,
            body: select.into(),
            order_by: if opts.order.is_empty() {
                None
            } else {
                Some(OrderBy {
                    exprs: opts.order.clone(),
                })
            },
            limit,
            locks: opts.locks.clone(),
        }
    }

    /// The SELECT statement as SQL text, with values inlined as literals.
    ///
    /// Cached: a dataset always renders the same SQL, and deriving a new
    /// dataset starts a fresh cache.
    pub fn sql(&self) -> Result<String> {
        self.sql_cache
            .get_or_init(|| {
                let stmt = Statement::Query(self.to_query());
                self.db.serializer().serialize(&stmt, &mut Inline)
            })
            .clone()
    }

    /// The SELECT statement as a parameterized template plus its bound
    /// values. The template depends only on the statement shape, so it is
    /// reusable across datasets differing only in bound values.
    pub fn prepared_sql(&self) -> Result<(String, Vec<Value>)> {
        let stmt = Statement::Query(self.to_query());
        let mut params = Vec::new();
        let sql = self.db.serializer().serialize(&stmt, &mut params)?;
        Ok((sql, params))
    }

    fn table_name(&self) -> Result<&Ident> {
        self.opts.table.as_ref().ok_or_else(|| {
            Error::build("this dataset has no single underlying table to modify")
        })
    }

    /// Refuses modification statements on datasets whose read-side clauses
    /// have no meaning for them.
    fn guard_modification(&self, verb: &str) -> Result<()> {
        let opts = &self.opts;
        if !opts.joins.is_empty()
            || !opts.group.is_empty()
            || !opts.having.is_empty()
            || opts.distinct.is_some()
            || opts.limit.is_some()
            || opts.offset.is_some()
        {
            return Err(Error::build(format!(
                "cannot {verb} a dataset with joins, grouping, distinct, or limits"
            )));
        }
        Ok(())
    }

    /// `INSERT INTO table (columns) VALUES ...`; no rows renders the
    /// all-defaults form.
    pub fn insert_sql(&self, columns: &[&str], rows: Vec<Vec<Value>>) -> Result<String> {
        let stmt = Statement::Insert(self.build_insert(columns, rows, None)?);
        self.db.serializer().serialize(&stmt, &mut Inline)
    }

    /// `INSERT ... RETURNING ...`; rendering fails on dialects without
    /// RETURNING.
    pub fn insert_returning_sql(
        &self,
        columns: &[&str],
        rows: Vec<Vec<Value>>,
        returning: Vec<Expr>,
    ) -> Result<String> {
        let stmt = Statement::Insert(self.build_insert(columns, rows, Some(returning))?);
        self.db.serializer().serialize(&stmt, &mut Inline)
    }

    fn build_insert(
        &self,
        columns: &[&str],
        rows: Vec<Vec<Value>>,
        returning: Option<Vec<Expr>>,
    ) -> Result<Insert> {
        for row in &rows {
            if row.len() != columns.len() {
                return Err(Error::build(format!(
                    "insert row has {} values for {} columns",
                    row.len(),
                    columns.len()
                )));
            }
        }

        let rows: Vec<Vec<Expr>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Expr::from).collect())
            .collect();

        let mut insert = Insert::new(
            self.table_name()?.clone(),
            columns.iter().map(|c| Ident::new(*c)).collect(),
            InsertSource::Values(Values::new(rows)),
        );
        insert.returning = returning;
        Ok(insert)
    }

    /// `UPDATE table SET ... WHERE ...` for this dataset's filter.
    pub fn update_sql(&self, assignments: Assignments) -> Result<String> {
        self.guard_modification("update")?;
        if assignments.is_empty() {
            return Err(Error::build("update requires at least one assignment"));
        }

        let mut update = quill_core::stmt::Update::new(self.table_name()?.clone(), assignments);
        update.filter = self.opts.filter.clone();

        let stmt = Statement::Update(update);
        self.db.serializer().serialize(&stmt, &mut Inline)
    }

    /// `DELETE FROM table WHERE ...` for this dataset's filter.
    pub fn delete_sql(&self) -> Result<String> {
        self.guard_modification("delete")?;

        let mut delete = Delete::new(self.table_name()?.clone());
        delete.filter = self.opts.filter.clone();

        let stmt = Statement::Delete(delete);
        self.db.serializer().serialize(&stmt, &mut Inline)
    }

    /// `SELECT count(*) AS count` over this dataset, wrapping it as a
    /// subselect when grouping, distinct, compounds, or limits would change
    /// the row count being measured.
    pub fn count_sql(&self) -> Result<String> {
        let opts = &self.opts;
        let needs_wrap = !opts.group.is_empty()
            || opts.distinct.is_some()
            || opts.limit.is_some()
            || opts.offset.is_some();

        let base = if needs_wrap {
            self.from_self()
        } else {
            self.clone()
        };

        base.derive(|opts| {
            opts.select = vec![Expr::alias(Expr::count_star(), "count")];
            opts.order.clear();
        })
        .sql()
    }
}

use super::{Expr, Filter, Join};

/// The `SELECT` body of a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    /// `DISTINCT` / `DISTINCT ON (...)`, if any.
    pub distinct: Option<Distinct>,

    /// The projection list. Empty renders as `*`.
    pub columns: Vec<Expr>,

    /// The `FROM` list: table references, aliased subqueries, ...
    pub from: Vec<Expr>,

    /// Join clauses applied to the `FROM` list, in insertion order.
    pub joins: Vec<Join>,

    /// The `WHERE` filter.
    pub filter: Filter,

    /// `GROUP BY` expressions.
    pub group_by: Vec<Expr>,

    /// The `HAVING` filter.
    pub having: Filter,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Distinct {
    /// Plain `DISTINCT`
    Rows,

    /// `DISTINCT ON (exprs)` (PostgreSQL)
    On(Vec<Expr>),
}

impl Select {
    pub fn new(from: impl Into<Expr>) -> Self {
        Self {
            from: vec![from.into()],
            ..Self::default()
        }
    }

    pub fn add_filter(&mut self, filter: impl Into<Filter>) {
        self.filter.add_filter(filter);
    }
}

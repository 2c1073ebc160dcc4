mod exec;
mod sql;

use std::sync::{Arc, OnceLock};

use quill_core::{
    stmt::{
        Cte, Distinct, Expr, Filter, Ident, Join, JoinConstraint, JoinOp, Lock, OrderByExpr,
        Query, SetOp,
    },
    Error, Result,
};

use crate::{Db, DEFAULT_SERVER};

/// An immutable, chainable query over one database.
///
/// Every chain method returns a new `Dataset`; the receiver is never
/// changed, so a dataset can be derived from freely and concurrently.
/// Rendered SQL and discovered columns are cached per instance (sound
/// because the value is immutable); derived datasets start with fresh
/// caches.
#[derive(Clone)]
pub struct Dataset {
    db: Db,
    server: String,
    opts: Options,

    /// The dataset this one wraps as its sole source, when built by
    /// `from_self` or a set operation. Lets `columns` delegate without a
    /// round trip.
    wrapped: Option<Arc<Dataset>>,

    sql_cache: Arc<OnceLock<Result<String>>>,
    columns_cache: Arc<OnceLock<Vec<String>>>,
}

/// The typed option map behind a dataset. Cloned wholesale on every chain
/// step; never mutated in place after construction.
#[derive(Clone, Debug, Default)]
struct Options {
    distinct: Option<Distinct>,
    select: Vec<Expr>,
    from: Vec<Expr>,
    table: Option<Ident>,
    joins: Vec<Join>,
    filter: Filter,
    group: Vec<Expr>,
    having: Filter,
    order: Vec<OrderByExpr>,
    limit: Option<u64>,
    offset: Option<u64>,
    paginated: bool,
    ctes: Vec<Cte>,
    recursive_ctes: bool,
    locks: Vec<Lock>,
}

impl Dataset {
    pub(crate) fn table(db: Db, name: &str) -> Dataset {
        Dataset {
            db,
            server: DEFAULT_SERVER.to_string(),
            opts: Options {
                from: vec![Expr::column(name)],
                table: Some(Ident::new(name)),
                ..Options::default()
            },
            wrapped: None,
            sql_cache: Arc::new(OnceLock::new()),
            columns_cache: Arc::new(OnceLock::new()),
        }
    }

    fn from_query(db: Db, server: String, query: Query, wrapped: Option<Arc<Dataset>>) -> Dataset {
        Dataset {
            db,
            server,
            opts: Options {
                from: vec![Expr::subquery(query)],
                ..Options::default()
            },
            wrapped,
            sql_cache: Arc::new(OnceLock::new()),
            columns_cache: Arc::new(OnceLock::new()),
        }
    }

    /// Derives a new dataset with one change applied to a copy of the
    /// options. Caches are not carried over.
    fn derive(&self, f: impl FnOnce(&mut Options)) -> Dataset {
        let mut opts = self.opts.clone();
        f(&mut opts);
        Dataset {
            db: self.db.clone(),
            server: self.server.clone(),
            opts,
            wrapped: self.wrapped.clone(),
            sql_cache: Arc::new(OnceLock::new()),
            columns_cache: Arc::new(OnceLock::new()),
        }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn server_name(&self) -> &str {
        &self.server
    }

    // === Filters ===

    /// ANDs a condition onto the filter (flattening same-operator
    /// compositions).
    pub fn filter(&self, cond: impl Into<Expr>) -> Dataset {
        let cond = cond.into();
        self.derive(|opts| opts.filter.add_filter(cond))
    }

    /// ANDs the negation of a condition onto the filter. The condition is
    /// wrapped in `NOT` (or has its negation flag flipped); it is never
    /// rewritten by De Morgan.
    pub fn exclude(&self, cond: impl Into<Expr>) -> Dataset {
        let cond = Expr::negate(cond.into());
        self.derive(|opts| opts.filter.add_filter(cond))
    }

    /// ORs a condition onto the existing filter.
    ///
    /// There must be an existing filter to OR against; otherwise this is a
    /// construction error.
    pub fn or(&self, cond: impl Into<Expr>) -> Result<Dataset> {
        if self.opts.filter.is_empty() {
            return Err(Error::build(
                "cannot OR a condition onto a dataset without a filter",
            ));
        }
        let cond = cond.into();
        Ok(self.derive(|opts| {
            opts.filter
                .or_filter(cond)
                .expect("non-empty filter checked above");
        }))
    }

    /// ANDs a trusted raw SQL fragment onto the filter.
    ///
    /// Refused when the database was built with `forbid_raw_sql`.
    pub fn filter_raw(&self, template: &str) -> Result<Dataset> {
        self.guard_raw()?;
        Ok(self.filter(Expr::raw(template)))
    }

    fn guard_raw(&self) -> Result<()> {
        if self.db.allow_raw_sql() {
            Ok(())
        } else {
            Err(Error::build(
                "raw SQL fragments are disabled for this database",
            ))
        }
    }

    // === Projections ===

    /// Replaces the select list.
    pub fn select<T: Into<Expr>>(&self, columns: impl IntoIterator<Item = T>) -> Dataset {
        let columns: Vec<Expr> = columns.into_iter().map(Into::into).collect();
        self.derive(|opts| opts.select = columns)
    }

    /// Appends to the select list.
    pub fn select_append<T: Into<Expr>>(&self, columns: impl IntoIterator<Item = T>) -> Dataset {
        let columns: Vec<Expr> = columns.into_iter().map(Into::into).collect();
        self.derive(|opts| opts.select.extend(columns))
    }

    /// Alias of [`select_append`](Self::select_append).
    pub fn select_more<T: Into<Expr>>(&self, columns: impl IntoIterator<Item = T>) -> Dataset {
        self.select_append(columns)
    }

    /// Appends a trusted raw SQL fragment to the select list.
    ///
    /// Refused when the database was built with `forbid_raw_sql`.
    pub fn select_raw(&self, template: &str) -> Result<Dataset> {
        self.guard_raw()?;
        Ok(self.select_append([Expr::raw(template)]))
    }

    pub fn distinct(&self) -> Dataset {
        self.derive(|opts| opts.distinct = Some(Distinct::Rows))
    }

    /// `DISTINCT ON (...)`; rendering fails on dialects without it.
    pub fn distinct_on<T: Into<Expr>>(&self, exprs: impl IntoIterator<Item = T>) -> Dataset {
        let exprs: Vec<Expr> = exprs.into_iter().map(Into::into).collect();
        self.derive(|opts| opts.distinct = Some(Distinct::On(exprs)))
    }

    // === Sources and joins ===

    /// Wraps the current query as a subselect and selects everything from
    /// it. The subselect gets an auto-generated alias at render time.
    pub fn from_self(&self) -> Dataset {
        Dataset::from_query(
            self.db.clone(),
            self.server.clone(),
            self.to_query(),
            Some(Arc::new(self.clone())),
        )
    }

    pub fn join(&self, table: impl Into<Expr>, on: impl Into<Expr>) -> Dataset {
        self.push_join(Join::inner(table, on))
    }

    pub fn left_join(&self, table: impl Into<Expr>, on: impl Into<Expr>) -> Dataset {
        self.push_join(Join::left(table, on))
    }

    pub fn right_join(&self, table: impl Into<Expr>, on: impl Into<Expr>) -> Dataset {
        self.push_join(Join::new(
            JoinOp::Right,
            table,
            Some(JoinConstraint::On(on.into())),
        ))
    }

    pub fn full_join(&self, table: impl Into<Expr>, on: impl Into<Expr>) -> Dataset {
        self.push_join(Join::new(
            JoinOp::Full,
            table,
            Some(JoinConstraint::On(on.into())),
        ))
    }

    pub fn cross_join(&self, table: impl Into<Expr>) -> Dataset {
        self.push_join(Join::cross(table))
    }

    pub fn join_using<I: Into<Ident>>(
        &self,
        table: impl Into<Expr>,
        columns: impl IntoIterator<Item = I>,
    ) -> Dataset {
        self.push_join(Join::new(
            JoinOp::Inner,
            table,
            Some(JoinConstraint::Using(
                columns.into_iter().map(Into::into).collect(),
            )),
        ))
    }

    fn push_join(&self, join: Join) -> Dataset {
        self.derive(|opts| opts.joins.push(join))
    }

    // === Grouping ===

    pub fn group_by<T: Into<Expr>>(&self, exprs: impl IntoIterator<Item = T>) -> Dataset {
        let exprs: Vec<Expr> = exprs.into_iter().map(Into::into).collect();
        self.derive(|opts| opts.group = exprs)
    }

    /// Adds a `HAVING` condition; a construction error without grouping.
    pub fn having(&self, cond: impl Into<Expr>) -> Result<Dataset> {
        if self.opts.group.is_empty() {
            return Err(Error::build("HAVING requires a GROUP BY"));
        }
        let cond = cond.into();
        Ok(self.derive(|opts| opts.having.add_filter(cond)))
    }

    // === Ordering ===

    /// Replaces the ordering.
    pub fn order_by<T: Into<OrderByExpr>>(&self, exprs: impl IntoIterator<Item = T>) -> Dataset {
        let exprs: Vec<OrderByExpr> = exprs.into_iter().map(Into::into).collect();
        self.derive(|opts| opts.order = exprs)
    }

    /// Appends to the ordering.
    pub fn order_append<T: Into<OrderByExpr>>(
        &self,
        exprs: impl IntoIterator<Item = T>,
    ) -> Dataset {
        let exprs: Vec<OrderByExpr> = exprs.into_iter().map(Into::into).collect();
        self.derive(|opts| opts.order.extend(exprs))
    }

    /// Flips every ordering direction.
    pub fn reverse(&self) -> Dataset {
        self.derive(|opts| {
            for expr in &mut opts.order {
                expr.reverse();
            }
        })
    }

    // === Paging ===

    /// Caps the row count. A construction error on a paginated dataset.
    pub fn limit(&self, count: u64) -> Result<Dataset> {
        if self.opts.paginated {
            return Err(Error::build("cannot set a limit on a paginated dataset"));
        }
        Ok(self.derive(|opts| opts.limit = Some(count)))
    }

    /// Skips rows. A construction error on a paginated dataset.
    pub fn offset(&self, count: u64) -> Result<Dataset> {
        if self.opts.paginated {
            return Err(Error::build("cannot set an offset on a paginated dataset"));
        }
        Ok(self.derive(|opts| opts.offset = Some(count)))
    }

    /// Selects one page (1-based). A construction error when a limit is
    /// already set, or when called twice; silently wrong page math is not
    /// an option.
    pub fn paginate(&self, page: u64, per_page: u64) -> Result<Dataset> {
        if self.opts.limit.is_some() || self.opts.paginated {
            return Err(Error::build(
                "cannot paginate a dataset that already has a limit",
            ));
        }
        if page == 0 {
            return Err(Error::build("page numbers start at 1"));
        }
        if per_page == 0 {
            return Err(Error::build("page size must be at least 1"));
        }
        Ok(self.derive(|opts| {
            opts.limit = Some(per_page);
            opts.offset = Some((page - 1) * per_page);
            opts.paginated = true;
        }))
    }

    // === Locks ===

    /// `FOR UPDATE`; rendering fails on dialects without row locking.
    pub fn for_update(&self) -> Dataset {
        self.derive(|opts| opts.locks.push(Lock::Update))
    }

    /// `FOR SHARE` (spelled per dialect); rendering fails on dialects
    /// without row locking.
    pub fn for_share(&self) -> Dataset {
        self.derive(|opts| opts.locks.push(Lock::Share))
    }

    // === CTEs ===

    /// Attaches a common table expression.
    pub fn with(&self, name: &str, dataset: &Dataset) -> Dataset {
        let cte = Cte::new(name, dataset.to_query());
        self.derive(|opts| opts.ctes.push(cte))
    }

    /// Attaches a recursive common table expression.
    pub fn with_recursive(&self, name: &str, dataset: &Dataset) -> Dataset {
        let cte = Cte::new(name, dataset.to_query());
        self.derive(|opts| {
            opts.ctes.push(cte);
            opts.recursive_ctes = true;
        })
    }

    // === Set operations ===

    pub fn union(&self, other: &Dataset) -> Dataset {
        self.compound(SetOp::Union, false, other)
    }

    pub fn union_all(&self, other: &Dataset) -> Dataset {
        self.compound(SetOp::Union, true, other)
    }

    pub fn intersect(&self, other: &Dataset) -> Dataset {
        self.compound(SetOp::Intersect, false, other)
    }

    pub fn intersect_all(&self, other: &Dataset) -> Dataset {
        self.compound(SetOp::Intersect, true, other)
    }

    pub fn except(&self, other: &Dataset) -> Dataset {
        self.compound(SetOp::Except, false, other)
    }

    pub fn except_all(&self, other: &Dataset) -> Dataset {
        self.compound(SetOp::Except, true, other)
    }

    /// Combines two datasets with a set operation and wraps the result as
    /// a subselect (aliased at render time), so further chaining applies
    /// to the combined rows.
    fn compound(&self, op: SetOp, all: bool, other: &Dataset) -> Dataset {
        let mut query = Query::new(self.compound_operand());
        query.set_op(op, all, Query::new(other.compound_operand()));

        Dataset::from_query(
            self.db.clone(),
            self.server.clone(),
            query,
            // Column lists of a compound come from its first operand.
            Some(Arc::new(self.clone())),
        )
    }

    /// This dataset's query body, wrapped as a subselect only when clauses
    /// outside the body (ORDER BY, LIMIT, CTEs, locks) would be ambiguous
    /// inside a compound.
    fn compound_operand(&self) -> quill_core::stmt::ExprSet {
        let query = self.to_query();
        let plain = query.with.is_none()
            && query.order_by.is_none()
            && query.limit.is_none()
            && query.locks.is_empty();

        if plain {
            query.body
        } else {
            quill_core::stmt::Select::new(Expr::subquery(query)).into()
        }
    }

    // === Sharding ===

    /// Targets a named server (shard); execution checks out from that
    /// server's pool.
    pub fn server(&self, name: &str) -> Dataset {
        let mut ds = self.derive(|_| {});
        ds.server = name.to_string();
        ds
    }
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("server", &self.server)
            .field("opts", &self.opts)
            .finish()
    }
}

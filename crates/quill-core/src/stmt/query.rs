use super::*;

/// A complete query: body plus the clauses that apply to the whole result.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Any CTEs
    pub with: Option<With>,

    /// The body of the query. Either `SELECT`, a set operation, or `VALUES`.
    pub body: ExprSet,

    /// ORDER BY
    pub order_by: Option<OrderBy>,

    /// LIMIT and OFFSET
    pub limit: Option<Limit>,

    /// FOR { UPDATE | SHARE }
    pub locks: Vec<Lock>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lock {
    Update,
    Share,
}

impl Query {
    pub fn new(body: impl Into<ExprSet>) -> Self {
        Self {
            with: None,
            body: body.into(),
            order_by: None,
            limit: None,
            locks: vec![],
        }
    }

    /// A `SELECT *` over a single source with an optional filter.
    pub fn filter(from: impl Into<Expr>, filter: impl Into<Filter>) -> Self {
        let mut select = Select::new(from);
        select.add_filter(filter);
        Self::new(select)
    }

    pub fn as_select(&self) -> Option<&Select> {
        self.body.as_select()
    }

    pub fn and(&mut self, expr: impl Into<Expr>) {
        if let Some(select) = self.body.as_select_mut() {
            select.add_filter(expr.into());
        }
    }

    /// Combines this query's body with another via a set operation,
    /// appending to an existing same-operator chain rather than nesting.
    pub fn set_op(&mut self, op: SetOp, all: bool, query: impl Into<Self>) {
        let rhs = query.into();

        match (&mut self.body, rhs.body) {
            (ExprSet::SetOp(lhs), rhs) if lhs.op == op && lhs.all == all => {
                lhs.operands.push(rhs);
            }
            (me, rhs) => {
                let lhs = std::mem::take(me);
                *me = ExprSet::SetOp(ExprSetOp {
                    op,
                    all,
                    operands: vec![lhs, rhs],
                });
            }
        }
    }

    pub fn union(&mut self, query: impl Into<Self>) {
        self.set_op(SetOp::Union, false, query);
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::new(ExprSet::default())
    }
}

impl From<Select> for Query {
    fn from(value: Select) -> Self {
        Self::new(value)
    }
}

impl From<ExprSet> for Query {
    fn from(value: ExprSet) -> Self {
        Self::new(value)
    }
}

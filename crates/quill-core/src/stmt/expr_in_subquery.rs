use super::*;

/// `expr IN (subquery)`, or `expr NOT IN (subquery)` when negated.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprInSubquery {
    /// When `true`, this is a `NOT IN` check.
    pub negate: bool,

    pub expr: Box<Expr>,

    pub query: Box<Query>,
}

impl Expr {
    pub fn in_subquery(lhs: impl Into<Self>, query: impl Into<Query>) -> Self {
        ExprInSubquery {
            negate: false,
            expr: Box::new(lhs.into()),
            query: Box::new(query.into()),
        }
        .into()
    }
}

impl From<ExprInSubquery> for Expr {
    fn from(value: ExprInSubquery) -> Self {
        Self::InSubquery(value)
    }
}

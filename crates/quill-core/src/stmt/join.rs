use super::{Expr, Ident};

/// A join clause within a `FROM`.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// The join type
    pub op: JoinOp,

    /// The table (or subquery) being joined
    pub table: Expr,

    /// The join condition; `None` only for cross joins
    pub constraint: Option<JoinConstraint>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum JoinOp {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinConstraint {
    /// `ON expr`
    On(Expr),

    /// `USING (columns)`
    Using(Vec<Ident>),
}

impl Join {
    pub fn new(op: JoinOp, table: impl Into<Expr>, constraint: Option<JoinConstraint>) -> Self {
        Self {
            op,
            table: table.into(),
            constraint,
        }
    }

    pub fn inner(table: impl Into<Expr>, on: impl Into<Expr>) -> Self {
        Self::new(JoinOp::Inner, table, Some(JoinConstraint::On(on.into())))
    }

    pub fn left(table: impl Into<Expr>, on: impl Into<Expr>) -> Self {
        Self::new(JoinOp::Left, table, Some(JoinConstraint::On(on.into())))
    }

    pub fn cross(table: impl Into<Expr>) -> Self {
        Self::new(JoinOp::Cross, table, None)
    }
}

use super::{Expr, OrderByExpr};

/// A window specification: the `OVER (...)` part of a window function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Window {
    /// `PARTITION BY` expressions.
    pub partition_by: Vec<Expr>,

    /// `ORDER BY` expressions.
    pub order_by: Vec<OrderByExpr>,
}

impl Window {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition_by<T: Into<Expr>>(mut self, exprs: impl IntoIterator<Item = T>) -> Self {
        self.partition_by.extend(exprs.into_iter().map(Into::into));
        self
    }

    pub fn order_by<T: Into<OrderByExpr>>(mut self, exprs: impl IntoIterator<Item = T>) -> Self {
        self.order_by.extend(exprs.into_iter().map(Into::into));
        self
    }
}

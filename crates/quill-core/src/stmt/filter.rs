use super::Expr;

/// An optional conjunction of conditions (`WHERE`/`HAVING`).
///
/// Adding a condition to a non-empty filter ANDs it on, flattening per
/// [`Expr::and`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Filter {
    expr: Option<Expr>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.expr.is_none()
    }

    pub fn as_expr(&self) -> Option<&Expr> {
        self.expr.as_ref()
    }

    pub fn add_filter(&mut self, filter: impl Into<Filter>) {
        match (self.expr.take(), filter.into().expr) {
            (Some(expr), Some(other)) => {
                self.expr = Some(Expr::and(expr, other));
            }
            (Some(expr), None) => {
                self.expr = Some(expr);
            }
            (_, other) => {
                self.expr = other;
            }
        }
    }

    /// ORs a condition onto the existing filter.
    ///
    /// Unlike [`add_filter`](Self::add_filter), there must be something to
    /// OR against; `None` is returned when the filter is empty so the
    /// caller can raise a construction error.
    pub fn or_filter(&mut self, filter: impl Into<Filter>) -> Option<()> {
        let existing = self.expr.take()?;
        match filter.into().expr {
            Some(other) => self.expr = Some(Expr::or(existing, other)),
            None => self.expr = Some(existing),
        }
        Some(())
    }
}

impl<T> From<T> for Filter
where
    Expr: From<T>,
{
    fn from(value: T) -> Self {
        Filter {
            expr: Some(value.into()),
        }
    }
}

use super::{Direction, Expr, NullsOrder};

/// One element of an `ORDER BY` list.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    /// The expression
    pub expr: Expr,

    /// Ascending or descending; `None` leaves the database default.
    pub order: Option<Direction>,

    /// Nulls placement, when the dialect supports spelling it.
    pub nulls: Option<NullsOrder>,
}

impl OrderByExpr {
    pub fn asc(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            order: Some(Direction::Asc),
            nulls: None,
        }
    }

    pub fn desc(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            order: Some(Direction::Desc),
            nulls: None,
        }
    }

    pub fn nulls(mut self, nulls: NullsOrder) -> Self {
        self.nulls = Some(nulls);
        self
    }

    /// Flips the direction by which the query is ordered.
    pub fn reverse(&mut self) {
        self.order = match self.order {
            Some(Direction::Desc) => None,
            _ => Some(Direction::Desc),
        }
    }
}

impl<T> From<T> for OrderByExpr
where
    Expr: From<T>,
{
    fn from(value: T) -> Self {
        Self {
            expr: value.into(),
            order: None,
            nulls: None,
        }
    }
}

use super::Expr;

/// A `CASE` expression.
///
/// With an operand: `CASE x WHEN a THEN b ... ELSE d END`.
/// Without: `CASE WHEN cond THEN b ... ELSE d END`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCase {
    /// The expression compared against each `WHEN`, if any.
    pub operand: Option<Box<Expr>>,

    /// `(when, then)` pairs, rendered in insertion order.
    pub when_then: Vec<(Expr, Expr)>,

    /// The `ELSE` expression, if any.
    pub otherwise: Option<Box<Expr>>,
}

impl Expr {
    pub fn case(when_then: Vec<(Expr, Expr)>, otherwise: Option<Expr>) -> Self {
        ExprCase {
            operand: None,
            when_then,
            otherwise: otherwise.map(Box::new),
        }
        .into()
    }

    pub fn case_of(
        operand: impl Into<Self>,
        when_then: Vec<(Expr, Expr)>,
        otherwise: Option<Expr>,
    ) -> Self {
        ExprCase {
            operand: Some(Box::new(operand.into())),
            when_then,
            otherwise: otherwise.map(Box::new),
        }
        .into()
    }
}

impl From<ExprCase> for Expr {
    fn from(value: ExprCase) -> Self {
        Self::Case(value)
    }
}

use super::*;

/// Logical negation of an expression.
///
/// `NOT` wraps its operand as-is. Negation is never distributed over the
/// operands of an `AND`/`OR` (no De Morgan rewriting): construction may
/// minimize the rendered string but must not restructure the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprNot {
    pub operand: Box<Expr>,
}

impl Expr {
    /// Wraps an expression in `NOT (...)`.
    pub fn not(operand: impl Into<Self>) -> Self {
        ExprNot {
            operand: Box::new(operand.into()),
        }
        .into()
    }

    /// Negates an expression, flipping the built-in negation flag where one
    /// exists (`IN` → `NOT IN`, `IS NULL` → `IS NOT NULL`, `EXISTS` →
    /// `NOT EXISTS`, double negation unwraps) and wrapping in `NOT`
    /// otherwise.
    pub fn negate(expr: impl Into<Self>) -> Self {
        match expr.into() {
            Self::InList(mut e) => {
                e.negate = !e.negate;
                e.into()
            }
            Self::InSubquery(mut e) => {
                e.negate = !e.negate;
                e.into()
            }
            Self::IsNull(mut e) => {
                e.negate = !e.negate;
                e.into()
            }
            Self::Exists(mut e) => {
                e.negate = !e.negate;
                e.into()
            }
            Self::Not(e) => *e.operand,
            other => Self::not(other),
        }
    }
}

impl From<ExprNot> for Expr {
    fn from(value: ExprNot) -> Self {
        Self::Not(value)
    }
}

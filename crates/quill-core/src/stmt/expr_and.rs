use super::*;

use std::ops;

/// An n-ary `AND` of expressions.
///
/// Composing two `AND`s merges their operand lists rather than nesting, so
/// `a AND b AND c` is a single three-operand node however it was built.
/// Flattening never crosses an `OR` or `NOT` boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprAnd {
    pub operands: Vec<Expr>,
}

impl Expr {
    pub fn and(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        let mut lhs = lhs.into();
        let rhs = rhs.into();

        match (&mut lhs, rhs) {
            (expr, rhs) if expr.is_true() => rhs,
            (_, expr) if expr.is_true() => lhs,
            (Self::And(lhs_and), Self::And(rhs_and)) => {
                lhs_and.operands.extend(rhs_and.operands);
                lhs
            }
            (Self::And(lhs_and), rhs) => {
                lhs_and.operands.push(rhs);
                lhs
            }
            (_, Self::And(mut rhs_and)) => {
                rhs_and.operands.insert(0, lhs);
                rhs_and.into()
            }
            (_, rhs) => ExprAnd {
                operands: vec![lhs, rhs],
            }
            .into(),
        }
    }

    /// AND together a list of expressions.
    ///
    /// An empty list is a construction error: there is no implicit `TRUE`.
    /// Boolean constants must be spelled explicitly via `Expr::from(bool)`.
    pub fn and_all(operands: Vec<Self>) -> crate::Result<Self> {
        if operands.is_empty() {
            return Err(crate::Error::build("cannot AND zero expressions"));
        }

        if operands.len() == 1 {
            return Ok(operands.into_iter().next().unwrap());
        }

        Ok(operands
            .into_iter()
            .reduce(Expr::and)
            .expect("non-empty operand list"))
    }
}

impl ops::Deref for ExprAnd {
    type Target = [Expr];

    fn deref(&self) -> &Self::Target {
        self.operands.deref()
    }
}

impl<'a> IntoIterator for &'a ExprAnd {
    type IntoIter = std::slice::Iter<'a, Expr>;
    type Item = &'a Expr;

    fn into_iter(self) -> Self::IntoIter {
        self.operands.iter()
    }
}

impl From<ExprAnd> for Expr {
    fn from(value: ExprAnd) -> Self {
        Self::And(value)
    }
}

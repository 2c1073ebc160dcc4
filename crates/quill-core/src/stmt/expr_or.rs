use super::*;

use std::ops;

/// An n-ary `OR` of expressions.
///
/// Same flattening rule as [`ExprAnd`]: same-operator composition merges
/// operand lists, and flattening never crosses the AND/OR boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprOr {
    pub operands: Vec<Expr>,
}

impl Expr {
    pub fn or(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        let mut lhs = lhs.into();
        let rhs = rhs.into();

        match (&mut lhs, rhs) {
            (expr, rhs) if expr.is_false() => rhs,
            (_, expr) if expr.is_false() => lhs,
            (Self::Or(lhs_or), Self::Or(rhs_or)) => {
                lhs_or.operands.extend(rhs_or.operands);
                lhs
            }
            (Self::Or(lhs_or), rhs) => {
                lhs_or.operands.push(rhs);
                lhs
            }
            (_, Self::Or(mut rhs_or)) => {
                rhs_or.operands.insert(0, lhs);
                rhs_or.into()
            }
            (_, rhs) => ExprOr {
                operands: vec![lhs, rhs],
            }
            .into(),
        }
    }

    /// OR together a list of expressions.
    ///
    /// An empty list is a construction error, mirroring [`Expr::and_all`].
    pub fn or_all(operands: Vec<Self>) -> crate::Result<Self> {
        if operands.is_empty() {
            return Err(crate::Error::build("cannot OR zero expressions"));
        }

        if operands.len() == 1 {
            return Ok(operands.into_iter().next().unwrap());
        }

        Ok(operands
            .into_iter()
            .reduce(Expr::or)
            .expect("non-empty operand list"))
    }
}

impl ops::Deref for ExprOr {
    type Target = [Expr];

    fn deref(&self) -> &Self::Target {
        self.operands.deref()
    }
}

impl<'a> IntoIterator for &'a ExprOr {
    type IntoIter = std::slice::Iter<'a, Expr>;
    type Item = &'a Expr;

    fn into_iter(self) -> Self::IntoIter {
        self.operands.iter()
    }
}

impl From<ExprOr> for Expr {
    fn from(value: ExprOr) -> Self {
        Self::Or(value)
    }
}

use super::Expr;

/// An array subscript: `expr[i]`, `expr[i][j]`, ...
#[derive(Debug, Clone, PartialEq)]
pub struct ExprSubscript {
    pub expr: Box<Expr>,
    pub indices: Vec<Expr>,
}

impl Expr {
    pub fn subscript<T: Into<Expr>>(
        expr: impl Into<Self>,
        indices: impl IntoIterator<Item = T>,
    ) -> Self {
        ExprSubscript {
            expr: Box::new(expr.into()),
            indices: indices.into_iter().map(Into::into).collect(),
        }
        .into()
    }
}

impl From<ExprSubscript> for Expr {
    fn from(value: ExprSubscript) -> Self {
        Self::Subscript(value)
    }
}

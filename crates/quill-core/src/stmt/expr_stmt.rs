use super::*;

/// A scalar subquery used in expression position: `(SELECT ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub query: Box<Query>,
}

impl Expr {
    pub fn subquery(query: impl Into<Query>) -> Self {
        ExprStmt {
            query: Box::new(query.into()),
        }
        .into()
    }
}

impl From<ExprStmt> for Expr {
    fn from(value: ExprStmt) -> Self {
        Self::Stmt(value)
    }
}

impl From<Query> for Expr {
    fn from(value: Query) -> Self {
        Self::subquery(value)
    }
}

use super::*;

/// `EXISTS (subquery)`, or `NOT EXISTS (subquery)` when negated.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprExists {
    /// When `true`, this is a `NOT EXISTS` check.
    pub negate: bool,

    pub query: Box<Query>,
}

impl Expr {
    pub fn exists(query: impl Into<Query>) -> Self {
        ExprExists {
            negate: false,
            query: Box::new(query.into()),
        }
        .into()
    }

    pub fn not_exists(query: impl Into<Query>) -> Self {
        ExprExists {
            negate: true,
            query: Box::new(query.into()),
        }
        .into()
    }
}

impl From<ExprExists> for Expr {
    fn from(value: ExprExists) -> Self {
        Self::Exists(value)
    }
}

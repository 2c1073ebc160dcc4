use super::{Expr, Ident};

/// `*`, or `table.*` when qualified.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprWildcard {
    pub table: Option<Ident>,
}

impl Expr {
    pub fn wildcard() -> Self {
        ExprWildcard { table: None }.into()
    }

    pub fn wildcard_of(table: impl Into<Ident>) -> Self {
        ExprWildcard {
            table: Some(table.into()),
        }
        .into()
    }
}

impl From<ExprWildcard> for Expr {
    fn from(value: ExprWildcard) -> Self {
        Self::Wildcard(value)
    }
}

use super::{Expr, Ident};

/// `expr AS alias`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprAlias {
    pub expr: Box<Expr>,
    pub alias: Ident,
}

impl Expr {
    pub fn alias(expr: impl Into<Self>, alias: impl Into<Ident>) -> Self {
        ExprAlias {
            expr: Box::new(expr.into()),
            alias: alias.into(),
        }
        .into()
    }

    /// Returns the alias name if this expression carries one.
    pub fn alias_name(&self) -> Option<&Ident> {
        match self {
            Self::Alias(alias) => Some(&alias.alias),
            _ => None,
        }
    }
}

impl From<ExprAlias> for Expr {
    fn from(value: ExprAlias) -> Self {
        Self::Alias(value)
    }
}

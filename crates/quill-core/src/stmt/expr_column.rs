use super::{Expr, Ident};

/// A column reference, optionally qualified by a table (or alias) name.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprColumn {
    /// The qualifying table or alias, if any.
    pub table: Option<Ident>,

    /// The column name.
    pub name: Ident,
}

impl Expr {
    /// A bare column reference: `name`.
    pub fn column(name: impl Into<Ident>) -> Self {
        ExprColumn {
            table: None,
            name: name.into(),
        }
        .into()
    }

    /// A qualified column reference: `table.name`.
    pub fn qualified(table: impl Into<Ident>, name: impl Into<Ident>) -> Self {
        ExprColumn {
            table: Some(table.into()),
            name: name.into(),
        }
        .into()
    }
}

impl From<ExprColumn> for Expr {
    fn from(value: ExprColumn) -> Self {
        Self::Column(value)
    }
}

impl From<Ident> for Expr {
    fn from(value: Ident) -> Self {
        Self::Column(ExprColumn {
            table: None,
            name: value,
        })
    }
}

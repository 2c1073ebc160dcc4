use super::{Expr, Filter, Ident};

/// Delete rows from a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    /// The target table.
    pub from: Ident,

    /// The `WHERE` filter.
    pub filter: Filter,

    /// `RETURNING` expressions, where the dialect supports them.
    pub returning: Option<Vec<Expr>>,
}

impl Delete {
    pub fn new(from: impl Into<Ident>) -> Self {
        Self {
            from: from.into(),
            filter: Filter::default(),
            returning: None,
        }
    }
}

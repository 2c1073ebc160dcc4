use super::{Assignments, Expr, Filter, Ident};

/// Update rows in a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// The target table.
    pub table: Ident,

    /// The `SET` list.
    pub assignments: Assignments,

    /// The `WHERE` filter.
    pub filter: Filter,

    /// `RETURNING` expressions, where the dialect supports them.
    pub returning: Option<Vec<Expr>>,
}

impl Update {
    pub fn new(table: impl Into<Ident>, assignments: Assignments) -> Self {
        Self {
            table: table.into(),
            assignments,
            filter: Filter::default(),
            returning: None,
        }
    }
}

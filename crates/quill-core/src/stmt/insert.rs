use super::{Expr, Ident, Query, Values};

/// Insert rows into a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    /// The target table.
    pub table: Ident,

    /// The column list; may be empty when inserting database defaults.
    pub columns: Vec<Ident>,

    /// Where the rows come from.
    pub source: InsertSource,

    /// `RETURNING` expressions, where the dialect supports them.
    pub returning: Option<Vec<Expr>>,
}

/// The row source of an `INSERT`.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// Literal `VALUES` rows. Empty renders as `DEFAULT VALUES`.
    Values(Values),

    /// `INSERT INTO ... SELECT ...`
    Query(Box<Query>),
}

impl Insert {
    pub fn new(table: impl Into<Ident>, columns: Vec<Ident>, source: InsertSource) -> Self {
        Self {
            table: table.into(),
            columns,
            source,
            returning: None,
        }
    }
}

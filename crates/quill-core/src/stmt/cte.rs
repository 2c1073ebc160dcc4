use super::{Ident, Query};

/// One common table expression of a `WITH` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    /// The CTE name.
    pub name: Ident,

    /// Explicit column names, if any.
    pub columns: Vec<Ident>,

    /// The CTE body.
    pub query: Box<Query>,
}

impl Cte {
    pub fn new(name: impl Into<Ident>, query: impl Into<Query>) -> Self {
        Self {
            name: name.into(),
            columns: vec![],
            query: Box::new(query.into()),
        }
    }
}

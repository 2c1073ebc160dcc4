use std::fmt;

/// Sort direction for an `ORDER BY` expression.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("ASC"),
            Self::Desc => f.write_str("DESC"),
        }
    }
}

/// Placement of nulls within an ordering.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

impl fmt::Display for NullsOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("NULLS FIRST"),
            Self::Last => f.write_str("NULLS LAST"),
        }
    }
}

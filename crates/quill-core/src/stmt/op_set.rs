use std::fmt;

/// A set operation combining query bodies.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SetOp {
    Union,
    Intersect,
    Except,
}

impl SetOp {
    pub fn is_union(self) -> bool {
        matches!(self, Self::Union)
    }
}

impl fmt::Display for SetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Union => f.write_str("UNION"),
            Self::Intersect => f.write_str("INTERSECT"),
            Self::Except => f.write_str("EXCEPT"),
        }
    }
}

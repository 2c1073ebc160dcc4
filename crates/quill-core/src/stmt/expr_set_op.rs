use super::{ExprSet, SetOp};

/// A set operation combining multiple query bodies.
///
/// Applies a set operator (union, except, intersect) to combine the results
/// of multiple queries into a single result set. Operands keep insertion
/// order; same-operator composition appends rather than nesting.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprSetOp {
    /// The set operation to apply.
    pub op: SetOp,

    /// `UNION ALL` (and friends) when `true`.
    pub all: bool,

    /// The query bodies to combine.
    pub operands: Vec<ExprSet>,
}

impl ExprSetOp {
    pub fn is_union(&self) -> bool {
        self.op.is_union()
    }
}

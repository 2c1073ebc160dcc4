use super::*;

/// `expr IN (a, b, ...)`, or `expr NOT IN (...)` when negated.
///
/// The member list keeps insertion order and may be empty; the serializer
/// turns an empty list into a constant-false (`(1 = 0)`) or constant-true
/// (`(1 = 1)`) condition rather than emitting `IN ()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprInList {
    /// When `true`, this is a `NOT IN` check.
    pub negate: bool,

    pub expr: Box<Expr>,

    pub list: Vec<Expr>,
}

impl Expr {
    pub fn in_list<T: Into<Expr>>(lhs: impl Into<Self>, list: impl IntoIterator<Item = T>) -> Self {
        ExprInList {
            negate: false,
            expr: Box::new(lhs.into()),
            list: list.into_iter().map(Into::into).collect(),
        }
        .into()
    }

    pub fn not_in_list<T: Into<Expr>>(
        lhs: impl Into<Self>,
        list: impl IntoIterator<Item = T>,
    ) -> Self {
        ExprInList {
            negate: true,
            expr: Box::new(lhs.into()),
            list: list.into_iter().map(Into::into).collect(),
        }
        .into()
    }
}

impl From<ExprInList> for Expr {
    fn from(value: ExprInList) -> Self {
        Self::InList(value)
    }
}

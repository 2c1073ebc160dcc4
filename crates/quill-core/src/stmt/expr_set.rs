use super::{ExprSetOp, Select, Values};

/// The body of a query: a plain `SELECT`, a set operation over bodies, or a
/// `VALUES` list.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprSet {
    Select(Box<Select>),
    SetOp(ExprSetOp),
    Values(Values),
}

impl ExprSet {
    pub fn as_select(&self) -> Option<&Select> {
        match self {
            Self::Select(select) => Some(select),
            _ => None,
        }
    }

    pub fn as_select_mut(&mut self) -> Option<&mut Select> {
        match self {
            Self::Select(select) => Some(select),
            _ => None,
        }
    }

    #[track_caller]
    pub fn as_select_unwrap(&self) -> &Select {
        self.as_select()
            .unwrap_or_else(|| panic!("expected `Select`; actual={self:#?}"))
    }

    pub fn is_select(&self) -> bool {
        matches!(self, Self::Select(_))
    }

    pub fn is_set_op(&self) -> bool {
        matches!(self, Self::SetOp(_))
    }
}

impl Default for ExprSet {
    fn default() -> Self {
        Self::Select(Box::new(Select::default()))
    }
}

impl From<Select> for ExprSet {
    fn from(value: Select) -> Self {
        Self::Select(Box::new(value))
    }
}

impl From<ExprSetOp> for ExprSet {
    fn from(value: ExprSetOp) -> Self {
        Self::SetOp(value)
    }
}

impl From<Values> for ExprSet {
    fn from(value: Values) -> Self {
        Self::Values(value)
    }
}

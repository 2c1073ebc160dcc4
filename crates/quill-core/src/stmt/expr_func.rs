use super::{Expr, Ident};

/// A function call: `name(args...)`, optionally with `DISTINCT` applied to
/// the arguments (`count(DISTINCT x)`).
#[derive(Debug, Clone, PartialEq)]
pub struct ExprFunc {
    pub name: Ident,
    pub args: Vec<Expr>,
    pub distinct: bool,
}

impl ExprFunc {
    pub fn new(name: impl Into<Ident>, args: Vec<Expr>) -> Self {
        Self {
            name: name.into(),
            args,
            distinct: false,
        }
    }
}

impl Expr {
    pub fn func(name: impl Into<Ident>, args: Vec<Expr>) -> Self {
        ExprFunc::new(name, args).into()
    }

    /// `COUNT(*)`
    pub fn count_star() -> Self {
        Self::func("count", vec![Expr::wildcard()])
    }

    pub fn count(arg: impl Into<Self>) -> Self {
        Self::func("count", vec![arg.into()])
    }

    pub fn count_distinct(arg: impl Into<Self>) -> Self {
        let mut func = ExprFunc::new("count", vec![arg.into()]);
        func.distinct = true;
        func.into()
    }
}

impl From<ExprFunc> for Expr {
    fn from(value: ExprFunc) -> Self {
        Self::Func(value)
    }
}

use super::{Expr, ExprFunc, Window};

/// A window function call: `func(...) OVER (PARTITION BY ... ORDER BY ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprWindow {
    pub func: ExprFunc,
    pub window: Window,
}

impl Expr {
    pub fn window(func: ExprFunc, window: Window) -> Self {
        ExprWindow { func, window }.into()
    }
}

impl From<ExprWindow> for Expr {
    fn from(value: ExprWindow) -> Self {
        Self::Window(value)
    }
}

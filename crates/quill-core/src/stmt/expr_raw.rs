use super::Expr;

/// A literal SQL fragment.
///
/// Each `?` in the template splices the rendered form of the corresponding
/// argument expression. The template text itself is trusted and passes
/// through unescaped; databases configured to forbid raw fragments reject
/// it at serialization time.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprRaw {
    pub template: String,
    pub args: Vec<Expr>,
}

impl Expr {
    /// A raw fragment with no spliced arguments.
    pub fn raw(template: impl Into<String>) -> Self {
        ExprRaw {
            template: template.into(),
            args: vec![],
        }
        .into()
    }

    /// A raw fragment whose `?` positions splice the given arguments.
    pub fn raw_with(template: impl Into<String>, args: Vec<Expr>) -> Self {
        ExprRaw {
            template: template.into(),
            args,
        }
        .into()
    }
}

impl From<ExprRaw> for Expr {
    fn from(value: ExprRaw) -> Self {
        Self::Raw(value)
    }
}

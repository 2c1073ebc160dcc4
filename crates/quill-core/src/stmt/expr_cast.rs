use super::Expr;

/// `CAST(expr AS type)`.
///
/// The target type is the database's own type name; it passes through to
/// the serializer verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCast {
    pub expr: Box<Expr>,
    pub ty: String,
}

impl Expr {
    pub fn cast(expr: impl Into<Self>, ty: impl Into<String>) -> Self {
        ExprCast {
            expr: Box::new(expr.into()),
            ty: ty.into(),
        }
        .into()
    }
}

impl From<ExprCast> for Expr {
    fn from(value: ExprCast) -> Self {
        Self::Cast(value)
    }
}

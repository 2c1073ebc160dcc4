use super::*;

use std::fmt;

/// A SQL expression fragment.
///
/// Expressions are immutable values: combining them always produces a new
/// expression, and two expressions with identical shape compare equal.
#[derive(Clone, PartialEq)]
pub enum Expr {
    /// `expr AS alias`
    Alias(ExprAlias),

    /// AND a set of expressions
    And(ExprAnd),

    /// Binary operation (comparison, arithmetic, LIKE, string concat)
    BinaryOp(ExprBinaryOp),

    /// `CASE` expression
    Case(ExprCase),

    /// Cast an expression to a database type
    Cast(ExprCast),

    /// A column reference, optionally qualified by a table name
    Column(ExprColumn),

    /// `EXISTS (subquery)`
    Exists(ExprExists),

    /// Function call
    Func(ExprFunc),

    /// `expr IN (list)`. An empty list renders as a constant-false
    /// condition (constant-true when negated), never invalid SQL.
    InList(ExprInList),

    /// `expr IN (subquery)`
    InSubquery(ExprInSubquery),

    /// Whether an expression is (or is not) null. This is separate from a
    /// binary expression because of how databases treat null comparisons.
    IsNull(ExprIsNull),

    /// Logical negation. Wraps its operand; negation is never pushed
    /// through AND/OR operands.
    Not(ExprNot),

    /// OR a set of expressions
    Or(ExprOr),

    /// A literal SQL fragment with `?` placeholders spliced from
    /// argument expressions
    Raw(ExprRaw),

    /// A scalar subquery
    Stmt(ExprStmt),

    /// `expr[index]`
    Subscript(ExprSubscript),

    /// Evaluates to a constant value
    Value(Value),

    /// `*` or `table.*`
    Wildcard(ExprWildcard),

    /// A window function call: `func(...) OVER (...)`
    Window(ExprWindow),
}

impl Expr {
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    /// Is a value that evaluates to null
    pub fn is_value_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    /// Returns `true` if the expression is the `true` boolean constant
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(true)))
    }

    /// Returns `true` if the expression is the `false` boolean constant
    pub fn is_false(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(false)))
    }

    /// Returns `true` if the expression is a constant value.
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(..))
    }

    pub fn is_stmt(&self) -> bool {
        matches!(self, Self::Stmt(..))
    }

    /// Returns `true` if the expression is a binary operation
    pub fn is_binary_op(&self) -> bool {
        matches!(self, Self::BinaryOp(..))
    }

    /// Returns `true` if the expression is a bare or qualified column
    /// reference.
    pub fn is_column(&self) -> bool {
        matches!(self, Self::Column(..))
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Value(value) => value,
            v => panic!("expected `Value`, found {v:#?}"),
        }
    }

    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Self::Value(Value::Null))
    }
}

impl Default for Expr {
    fn default() -> Self {
        Self::Value(Value::default())
    }
}

// === Conversions ===

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Value(value.into())
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<&i64> for Expr {
    fn from(value: &i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}

impl From<&String> for Expr {
    fn from(value: &String) -> Self {
        Self::Value(value.into())
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alias(e) => e.fmt(f),
            Self::And(e) => e.fmt(f),
            Self::BinaryOp(e) => e.fmt(f),
            Self::Case(e) => e.fmt(f),
            Self::Cast(e) => e.fmt(f),
            Self::Column(e) => e.fmt(f),
            Self::Exists(e) => e.fmt(f),
            Self::Func(e) => e.fmt(f),
            Self::InList(e) => e.fmt(f),
            Self::InSubquery(e) => e.fmt(f),
            Self::IsNull(e) => e.fmt(f),
            Self::Not(e) => e.fmt(f),
            Self::Or(e) => e.fmt(f),
            Self::Raw(e) => e.fmt(f),
            Self::Stmt(e) => e.fmt(f),
            Self::Subscript(e) => e.fmt(f),
            Self::Value(e) => e.fmt(f),
            Self::Wildcard(e) => e.fmt(f),
            Self::Window(e) => e.fmt(f),
        }
    }
}

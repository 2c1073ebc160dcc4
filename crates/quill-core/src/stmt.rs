mod assignments;
pub use assignments::{Assignment, Assignments};

mod cte;
pub use cte::Cte;

mod delete;
pub use delete::Delete;

mod direction;
pub use direction::{Direction, NullsOrder};

mod expr;
pub use expr::Expr;

mod expr_alias;
pub use expr_alias::ExprAlias;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_case;
pub use expr_case::ExprCase;

mod expr_cast;
pub use expr_cast::ExprCast;

mod expr_column;
pub use expr_column::ExprColumn;

mod expr_exists;
pub use expr_exists::ExprExists;

mod expr_func;
pub use expr_func::ExprFunc;

mod expr_in_list;
pub use expr_in_list::ExprInList;

mod expr_in_subquery;
pub use expr_in_subquery::ExprInSubquery;

mod expr_is_null;
pub use expr_is_null::ExprIsNull;

mod expr_not;
pub use expr_not::ExprNot;

mod expr_or;
pub use expr_or::ExprOr;

mod expr_raw;
pub use expr_raw::ExprRaw;

mod expr_set;
pub use expr_set::ExprSet;

mod expr_set_op;
pub use expr_set_op::ExprSetOp;

mod expr_stmt;
pub use expr_stmt::ExprStmt;

mod expr_subscript;
pub use expr_subscript::ExprSubscript;

mod expr_wildcard;
pub use expr_wildcard::ExprWildcard;

mod expr_window;
pub use expr_window::ExprWindow;

mod filter;
pub use filter::Filter;

mod ident;
pub use ident::Ident;

mod insert;
pub use insert::{Insert, InsertSource};

mod join;
pub use join::{Join, JoinConstraint, JoinOp};

mod limit;
pub use limit::Limit;

mod op_binary;
pub use op_binary::BinaryOp;

mod op_set;
pub use op_set::SetOp;

mod order_by;
pub use order_by::OrderBy;

mod order_by_expr;
pub use order_by_expr::OrderByExpr;

mod query;
pub use query::{Lock, Query};

mod select;
pub use select::{Distinct, Select};

mod update;
pub use update::Update;

mod value;
pub use value::Value;

mod value_chrono;

mod values;
pub use values::Values;

mod window;
pub use window::Window;

mod with;
pub use with::With;

use std::fmt;

/// A complete SQL statement, ready for serialization.
#[derive(Clone, PartialEq)]
pub enum Statement {
    /// Delete rows from a table
    Delete(Delete),

    /// Insert rows into a table
    Insert(Insert),

    /// Query the database
    Query(Query),

    /// Update rows in a table
    Update(Update),
}

impl Statement {
    /// Attempts to return a reference to an inner [`Query`].
    pub fn as_query(&self) -> Option<&Query> {
        match self {
            Self::Query(query) => Some(query),
            _ => None,
        }
    }

    /// Consumes `self` and attempts to return the inner [`Query`].
    pub fn into_query(self) -> Option<Query> {
        match self {
            Self::Query(query) => Some(query),
            _ => None,
        }
    }

    /// Consumes `self` and returns the inner [`Query`].
    ///
    /// # Panics
    ///
    /// If `self` is not a [`Statement::Query`].
    pub fn unwrap_query(self) -> Query {
        match self {
            Self::Query(query) => query,
            v => panic!("expected `Query`, found {v:#?}"),
        }
    }
}

impl From<Query> for Statement {
    fn from(value: Query) -> Self {
        Self::Query(value)
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}

impl fmt::Debug for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete(v) => v.fmt(f),
            Self::Insert(v) => v.fmt(f),
            Self::Query(v) => v.fmt(f),
            Self::Update(v) => v.fmt(f),
        }
    }
}

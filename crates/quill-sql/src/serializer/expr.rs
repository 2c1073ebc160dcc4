use super::{Comma, Delimited, Formatter, Ident, Params, ToSql};

use quill_core::{stmt, Error};

impl ToSql for &stmt::Expr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use stmt::Expr::*;

        match self {
            Alias(expr) => {
                fmt!(f, expr.expr.as_ref(), " AS ", Ident(expr.alias.as_str()));
            }
            And(expr) => {
                fmt!(f, "(", Delimited(&expr.operands, " AND "), ")");
            }
            BinaryOp(expr) => {
                fmt!(f, "(", expr.lhs.as_ref(), " ", &expr.op, " ", expr.rhs.as_ref(), ")");
            }
            Case(expr) => expr.to_sql(f),
            Cast(expr) => {
                fmt!(f, "CAST(", expr.expr.as_ref(), " AS ", expr.ty.as_str(), ")");
            }
            Column(expr) => expr.to_sql(f),
            Exists(expr) => {
                let negate = if expr.negate { "NOT " } else { "" };
                fmt!(f, negate, "EXISTS (", expr.query.as_ref(), ")");
            }
            Func(expr) => expr.to_sql(f),
            InList(expr) => {
                // An empty member list would be invalid SQL; render the
                // constant condition it means instead.
                if expr.list.is_empty() {
                    let constant = if expr.negate { "(1 = 1)" } else { "(1 = 0)" };
                    fmt!(f, constant);
                } else {
                    let op = if expr.negate { " NOT IN (" } else { " IN (" };
                    fmt!(f, "(", expr.expr.as_ref(), op, Comma(&expr.list), "))");
                }
            }
            InSubquery(expr) => {
                let op = if expr.negate { " NOT IN (" } else { " IN (" };
                fmt!(f, "(", expr.expr.as_ref(), op, expr.query.as_ref(), "))");
            }
            IsNull(expr) => {
                if expr.negate {
                    fmt!(f, "(", expr.expr.as_ref(), " IS NOT NULL)");
                } else {
                    fmt!(f, "(", expr.expr.as_ref(), " IS NULL)");
                }
            }
            Not(expr) => {
                fmt!(f, "NOT ", Grouped(&expr.operand));
            }
            Or(expr) => {
                fmt!(f, "(", Delimited(&expr.operands, " OR "), ")");
            }
            Raw(expr) => expr.to_sql(f),
            Stmt(expr) => {
                fmt!(f, "(", expr.query.as_ref(), ")");
            }
            Subscript(expr) => {
                fmt!(f, Grouped(&expr.expr));
                for index in &expr.indices {
                    fmt!(f, "[", index, "]");
                }
            }
            Value(value) => value.to_sql(f),
            Wildcard(expr) => {
                if let Some(table) = &expr.table {
                    fmt!(f, Ident(table.as_str()), ".");
                }
                fmt!(f, "*");
            }
            Window(expr) => expr.to_sql(f),
        }
    }
}

/// Wraps expressions whose rendering does not already group itself.
struct Grouped<'a>(&'a stmt::Expr);

impl ToSql for Grouped<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use stmt::Expr::*;

        match self.0 {
            // These renderings carry their own parentheses (or are a
            // single token) already.
            And(_) | BinaryOp(_) | Case(_) | Column(_) | InList(_) | InSubquery(_) | IsNull(_)
            | Or(_) | Stmt(_) | Value(_) => self.0.to_sql(f),
            _ => fmt!(f, "(", self.0, ")"),
        }
    }
}

impl ToSql for &stmt::ExprColumn {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if let Some(table) = &self.table {
            fmt!(f, Ident(table.as_str()), ".");
        }
        fmt!(f, Ident(self.name.as_str()));
    }
}

impl ToSql for &stmt::ExprFunc {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let distinct = if self.distinct { "DISTINCT " } else { "" };
        fmt!(f, self.name.as_str(), "(", distinct, Comma(&self.args), ")");
    }
}

impl ToSql for &stmt::ExprCase {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "(CASE");
        if let Some(operand) = &self.operand {
            fmt!(f, " ", operand.as_ref());
        }
        for (when, then) in &self.when_then {
            fmt!(f, " WHEN ", when, " THEN ", then);
        }
        if let Some(otherwise) = &self.otherwise {
            fmt!(f, " ELSE ", otherwise.as_ref());
        }
        fmt!(f, " END)");
    }
}

impl ToSql for &stmt::ExprRaw {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if !f.serializer.allow_raw {
            f.fail(Error::build(
                "raw SQL fragments are disabled for this database",
            ));
            return;
        }

        let segments: Vec<&str> = self.template.split('?').collect();
        if segments.len() - 1 != self.args.len() {
            f.fail(Error::build(format!(
                "raw SQL fragment has {} placeholders but {} arguments",
                segments.len() - 1,
                self.args.len()
            )));
            return;
        }

        let mut args = self.args.iter();
        let mut pending = None::<&stmt::Expr>;
        for segment in segments {
            if let Some(arg) = pending {
                fmt!(f, arg);
            }
            fmt!(f, segment);
            pending = args.next();
        }
    }
}

impl ToSql for &stmt::ExprWindow {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if !f.serializer.capability().window_functions {
            f.fail(Error::unsupported("window functions"));
            return;
        }

        fmt!(f, &self.func, " OVER (");

        let mut sep = "";
        if !self.window.partition_by.is_empty() {
            fmt!(f, "PARTITION BY ", Comma(&self.window.partition_by));
            sep = " ";
        }
        if !self.window.order_by.is_empty() {
            fmt!(f, sep, "ORDER BY ", Comma(&self.window.order_by));
        }

        fmt!(f, ")");
    }
}

impl ToSql for &stmt::BinaryOp {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use std::fmt::Write;
        write!(f.dst, "{self}").unwrap();
    }
}

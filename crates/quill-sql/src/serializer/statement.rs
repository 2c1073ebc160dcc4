use super::{Comma, Flavor, Formatter, Ident, Params, ToSql};

use quill_core::{stmt, Error};

impl ToSql for &stmt::Statement {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            stmt::Statement::Delete(stmt) => stmt.to_sql(f),
            stmt::Statement::Insert(stmt) => stmt.to_sql(f),
            stmt::Statement::Query(stmt) => stmt.to_sql(f),
            stmt::Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::Query {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if let Some(with) = &self.with {
            with.to_sql(f);
        }

        (&self.body).to_sql(f);

        if let Some(order_by) = &self.order_by {
            fmt!(f, " ORDER BY ", Comma(&order_by.exprs));
        }

        if let Some(limit) = &self.limit {
            limit.to_sql(f);
        }

        for lock in &self.locks {
            lock.to_sql(f);
        }
    }
}

impl ToSql for &stmt::With {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if !f.serializer.capability().cte {
            f.fail(Error::unsupported("common table expressions"));
            return;
        }

        let recursive = if self.recursive { "RECURSIVE " } else { "" };
        fmt!(f, "WITH ", recursive, Comma(&self.ctes), " ");
    }
}

impl ToSql for &stmt::Cte {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(self.name.as_str()));
        if !self.columns.is_empty() {
            let columns = Comma(self.columns.iter().map(|c| Ident(c.as_str())));
            fmt!(f, " (", columns, ")");
        }
        fmt!(f, " AS (", self.query.as_ref(), ")");
    }
}

impl ToSql for &stmt::ExprSet {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            stmt::ExprSet::Select(select) => select.as_ref().to_sql(f),
            stmt::ExprSet::SetOp(set_op) => set_op.to_sql(f),
            stmt::ExprSet::Values(values) => values.to_sql(f),
        }
    }
}

impl ToSql for &stmt::ExprSetOp {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use stmt::SetOp::*;

        let supported = match self.op {
            Union => true,
            Intersect | Except => f.serializer.capability().intersect_except,
        };
        if !supported {
            f.fail(Error::unsupported(format!(
                "{} set operations",
                self.op
            )));
            return;
        }
        // Only PostgreSQL accepts ALL on the non-union operators
        if self.all && !matches!(self.op, Union) && !f.serializer.is_postgresql() {
            f.fail(Error::unsupported(format!("{} ALL", self.op)));
            return;
        }

        let separator = match (self.op, self.all) {
            (Union, false) => " UNION ",
            (Union, true) => " UNION ALL ",
            (Intersect, false) => " INTERSECT ",
            (Intersect, true) => " INTERSECT ALL ",
            (Except, false) => " EXCEPT ",
            (Except, true) => " EXCEPT ALL ",
        };

        for (i, operand) in self.operands.iter().enumerate() {
            if i > 0 {
                fmt!(f, separator);
            }
            operand.to_sql(f);
        }
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "SELECT ");

        match &self.distinct {
            None => {}
            Some(stmt::Distinct::Rows) => fmt!(f, "DISTINCT "),
            Some(stmt::Distinct::On(exprs)) => {
                if !f.serializer.capability().distinct_on {
                    f.fail(Error::unsupported("DISTINCT ON"));
                    return;
                }
                fmt!(f, "DISTINCT ON (", Comma(exprs), ") ");
            }
        }

        if self.columns.is_empty() {
            fmt!(f, "*");
        } else {
            fmt!(f, Comma(&self.columns));
        }

        if !self.from.is_empty() {
            let from = Comma(self.from.iter().map(FromItem));
            fmt!(f, " FROM ", from);
        }

        for join in &self.joins {
            join.to_sql(f);
        }

        if let Some(filter) = self.filter.as_expr() {
            fmt!(f, " WHERE ", filter);
        }

        if !self.group_by.is_empty() {
            fmt!(f, " GROUP BY ", Comma(&self.group_by));
        }

        if let Some(having) = self.having.as_expr() {
            fmt!(f, " HAVING ", having);
        }
    }
}

/// A `FROM`-position expression. An anonymous derived table gets an
/// auto-generated `tN` alias, since most dialects require one.
pub(super) struct FromItem<'a>(pub(super) &'a stmt::Expr);

impl ToSql for FromItem<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self.0 {
            stmt::Expr::Stmt(_) => {
                let alias = f.next_alias();
                fmt!(f, self.0, " AS t", alias);
            }
            _ => self.0.to_sql(f),
        }
    }
}

impl ToSql for &stmt::Join {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let keyword = match self.op {
            stmt::JoinOp::Inner => " INNER JOIN ",
            stmt::JoinOp::Left => " LEFT JOIN ",
            stmt::JoinOp::Right => " RIGHT JOIN ",
            stmt::JoinOp::Full => " FULL JOIN ",
            stmt::JoinOp::Cross => " CROSS JOIN ",
        };
        fmt!(f, keyword, FromItem(&self.table));

        match &self.constraint {
            Some(stmt::JoinConstraint::On(expr)) => fmt!(f, " ON ", expr),
            Some(stmt::JoinConstraint::Using(columns)) => {
                let columns = Comma(columns.iter().map(|c| Ident(c.as_str())));
                fmt!(f, " USING (", columns, ")");
            }
            None => {}
        }
    }
}

impl ToSql for &stmt::OrderByExpr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, &self.expr);
        if let Some(order) = &self.order {
            match order {
                stmt::Direction::Asc => fmt!(f, " ASC"),
                stmt::Direction::Desc => fmt!(f, " DESC"),
            }
        }
        if let Some(nulls) = &self.nulls {
            match nulls {
                stmt::NullsOrder::First => fmt!(f, " NULLS FIRST"),
                stmt::NullsOrder::Last => fmt!(f, " NULLS LAST"),
            }
        }
    }
}

impl ToSql for &stmt::Limit {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match (self.count, self.offset) {
            (Some(count), Some(offset)) => fmt!(f, " LIMIT ", count, " OFFSET ", offset),
            (Some(count), None) => fmt!(f, " LIMIT ", count),
            (None, Some(offset)) => {
                if f.serializer.capability().bare_offset {
                    fmt!(f, " OFFSET ", offset);
                } else {
                    // MySQL cannot spell OFFSET without LIMIT
                    fmt!(f, " LIMIT 18446744073709551615 OFFSET ", offset);
                }
            }
            (None, None) => {}
        }
    }
}

impl ToSql for &stmt::Lock {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if !f.serializer.capability().select_for_update {
            f.fail(Error::unsupported("row locking clauses"));
            return;
        }
        match self {
            stmt::Lock::Update => fmt!(f, " FOR UPDATE"),
            stmt::Lock::Share => {
                if f.serializer.flavor() == Flavor::Mysql {
                    fmt!(f, " LOCK IN SHARE MODE");
                } else {
                    fmt!(f, " FOR SHARE");
                }
            }
        }
    }
}

impl ToSql for &stmt::Values {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "VALUES ");
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                fmt!(f, ", ");
            }
            fmt!(f, "(", Comma(row), ")");
        }
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "INSERT INTO ", Ident(self.table.as_str()));

        if !self.columns.is_empty() {
            let columns = Comma(self.columns.iter().map(|c| Ident(c.as_str())));
            fmt!(f, " (", columns, ")");
        }

        match &self.source {
            stmt::InsertSource::Values(values) if values.is_empty() => {
                // All-defaults row; MySQL spells this with an empty list
                if f.serializer.is_mysql() {
                    fmt!(f, " () VALUES ()");
                } else {
                    fmt!(f, " DEFAULT VALUES");
                }
            }
            stmt::InsertSource::Values(values) => {
                fmt!(f, " ", values);
            }
            stmt::InsertSource::Query(query) => {
                fmt!(f, " ", query.as_ref());
            }
        }

        returning(&self.returning, f);
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "UPDATE ", Ident(self.table.as_str()), " SET ");

        for (i, assignment) in self.assignments.iter().enumerate() {
            if i > 0 {
                fmt!(f, ", ");
            }
            fmt!(f, Ident(assignment.column.as_str()), " = ", &assignment.expr);
        }

        if let Some(filter) = self.filter.as_expr() {
            fmt!(f, " WHERE ", filter);
        }

        returning(&self.returning, f);
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "DELETE FROM ", Ident(self.from.as_str()));

        if let Some(filter) = self.filter.as_expr() {
            fmt!(f, " WHERE ", filter);
        }

        returning(&self.returning, f);
    }
}

fn returning<P: Params>(returning: &Option<Vec<stmt::Expr>>, f: &mut Formatter<'_, P>) {
    let Some(exprs) = returning else {
        return;
    };

    if !f.serializer.capability().returning {
        f.fail(Error::unsupported("the RETURNING clause"));
        return;
    }

    fmt!(f, " RETURNING ", Comma(exprs));
}

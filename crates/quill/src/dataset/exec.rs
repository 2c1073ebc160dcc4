//! Execution methods: the only part of a dataset that touches the pool.

use quill_core::{
    driver::{Row, RowStream, Rows},
    stmt::{Assignments, Expr, Value},
    Error, Result,
};

use super::Dataset;

impl Dataset {
    /// Runs the query and returns all rows.
    pub async fn all(&self) -> Result<Vec<Row>> {
        self.each().await?.collect().await
    }

    /// Runs the query and returns the rows as a stream.
    pub async fn each(&self) -> Result<RowStream> {
        let sql = self.sql()?;
        let response = self.db.execute_on(&self.server, &sql, &[]).await?;
        Ok(rows(response.rows))
    }

    /// Runs the query with `LIMIT 1` and returns the row, if any.
    pub async fn first(&self) -> Result<Option<Row>> {
        let limited = self.derive(|opts| {
            opts.limit = Some(1);
        });
        let mut stream = limited.each().await?;
        match stream.next().await {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Selects a single expression and returns its value from the first
    /// row, if any.
    pub async fn get(&self, expr: impl Into<Expr>) -> Result<Option<Value>> {
        let expr = expr.into();
        let row = self.derive(|opts| opts.select = vec![expr]).first().await?;
        Ok(row.and_then(|row| row.into_values().into_iter().next()))
    }

    /// Counts the rows the query would return.
    pub async fn count(&self) -> Result<u64> {
        let sql = self.count_sql()?;
        let response = self.db.execute_on(&self.server, &sql, &[]).await?;
        let mut stream = rows(response.rows);

        let row = match stream.next().await {
            Some(row) => row?,
            None => return Err(Error::driver(CountWithoutRow)),
        };
        let value = row
            .into_values()
            .into_iter()
            .next()
            .ok_or_else(|| Error::driver(CountWithoutRow))?;
        let count = i64::try_from(value)?;
        Ok(count as u64)
    }

    /// Whether the query returns no rows, via `SELECT 1 ... LIMIT 1`.
    pub async fn is_empty(&self) -> Result<bool> {
        let probe = self.derive(|opts| {
            opts.select = vec![Expr::alias(Expr::from(1i64), "one")];
            opts.order.clear();
            opts.limit = Some(1);
        });
        Ok(probe.first().await?.is_none())
    }

    /// Inserts rows, returning the affected-row count.
    pub async fn insert(&self, columns: &[&str], insert_rows: Vec<Vec<Value>>) -> Result<u64> {
        let sql = self.insert_sql(columns, insert_rows)?;
        let response = self.db.execute_on(&self.server, &sql, &[]).await?;
        response.rows.into_count().await
    }

    /// Inserts rows and returns the `RETURNING` rows.
    pub async fn insert_returning(
        &self,
        columns: &[&str],
        insert_rows: Vec<Vec<Value>>,
        returning: Vec<Expr>,
    ) -> Result<Vec<Row>> {
        let sql = self.insert_returning_sql(columns, insert_rows, returning)?;
        let response = self.db.execute_on(&self.server, &sql, &[]).await?;
        rows(response.rows).collect().await
    }

    /// Updates the rows this dataset filters to, returning the affected
    /// count.
    pub async fn update(&self, assignments: Assignments) -> Result<u64> {
        let sql = self.update_sql(assignments)?;
        let response = self.db.execute_on(&self.server, &sql, &[]).await?;
        response.rows.into_count().await
    }

    /// Deletes the rows this dataset filters to, returning the affected
    /// count.
    pub async fn delete(&self) -> Result<u64> {
        let sql = self.delete_sql()?;
        let response = self.db.execute_on(&self.server, &sql, &[]).await?;
        response.rows.into_count().await
    }

    /// Runs `f` once per page of `per_page` rows. A construction error when
    /// the dataset already has a limit.
    pub async fn each_page(
        &self,
        per_page: u64,
        mut f: impl AsyncFnMut(Dataset) -> Result<()>,
    ) -> Result<()> {
        if self.opts.limit.is_some() || self.opts.paginated {
            return Err(Error::build(
                "cannot page through a dataset that already has a limit",
            ));
        }

        let total = self.count().await?;
        let pages = std::cmp::max(1, total.div_ceil(per_page.max(1)));
        for page in 1..=pages {
            f(self.paginate(page, per_page)?).await?;
        }
        Ok(())
    }

    /// The column names this dataset returns.
    ///
    /// Answered without touching the database whenever possible: an
    /// explicit select list of plain or aliased columns is read directly; a
    /// dataset wrapping another (subselect or compound) with no joins and
    /// no select list delegates to the wrapped dataset; a previous answer
    /// is cached. Only when none of those apply does this issue a one-row
    /// metadata query.
    pub async fn columns(&self) -> Result<Vec<String>> {
        if let Some(columns) = self.static_columns() {
            return Ok(columns);
        }
        if let Some(columns) = self.columns_cache.get() {
            return Ok(columns.clone());
        }

        // Walk the delegation chain as far as it stays unambiguous.
        let mut target = self;
        loop {
            let delegatable = target.opts.select.is_empty() && target.opts.joins.is_empty();
            match &target.wrapped {
                Some(inner) if delegatable => {
                    target = inner.as_ref();
                    if let Some(columns) = target.static_columns() {
                        let _ = self.columns_cache.set(columns.clone());
                        return Ok(columns);
                    }
                    if let Some(columns) = target.columns_cache.get() {
                        let _ = self.columns_cache.set(columns.clone());
                        return Ok(columns.clone());
                    }
                }
                _ => break,
            }
        }

        // Metadata probe: one row is enough to learn the field names.
        let probe = target.derive(|opts| {
            opts.limit = Some(1);
            opts.offset = None;
            opts.paginated = false;
        });
        let sql = probe.sql()?;
        let response = self.db.execute_on(&self.server, &sql, &[]).await?;
        let mut stream = rows(response.rows);

        let columns = match stream.next().await {
            Some(row) => row?.columns().map(str::to_string).collect(),
            None => Vec::new(),
        };
        let _ = self.columns_cache.set(columns.clone());
        Ok(columns)
    }

    /// Column names determinable from the select list alone.
    fn static_columns(&self) -> Option<Vec<String>> {
        if self.opts.select.is_empty() {
            return None;
        }

        let mut columns = Vec::with_capacity(self.opts.select.len());
        for expr in &self.opts.select {
            match expr {
                Expr::Column(column) => columns.push(column.name.as_str().to_string()),
                Expr::Alias(alias) => columns.push(alias.alias.as_str().to_string()),
                _ => return None,
            }
        }
        Some(columns)
    }
}

fn rows(rows: Rows) -> RowStream {
    match rows {
        Rows::Values(stream) => stream,
        Rows::Count(_) => RowStream::default(),
    }
}

#[derive(Debug)]
struct CountWithoutRow;

impl std::error::Error for CountWithoutRow {}

impl std::fmt::Display for CountWithoutRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("count query returned no rows")
    }
}

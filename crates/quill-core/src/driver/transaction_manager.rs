use std::borrow::Cow;

/// Tracks transaction nesting depth and produces the SQL for
/// `BEGIN`/`SAVEPOINT`, `COMMIT`/`RELEASE SAVEPOINT`, and
/// `ROLLBACK`/`ROLLBACK TO SAVEPOINT` at each level.
///
/// When the database has no savepoint support, nested levels produce no SQL
/// at all: the inner transaction joins the outer one and only the outermost
/// boundary is real.
#[derive(Debug)]
pub struct TransactionManager {
    depth: u32,
    begin_stmt: &'static str,
    savepoints: bool,
}

impl TransactionManager {
    pub fn new(begin_stmt: &'static str, savepoints: bool) -> Self {
        Self {
            depth: 0,
            begin_stmt,
            savepoints,
        }
    }

    /// Create a `TransactionManager` configured for SQLite (`BEGIN`).
    pub fn sqlite() -> Self {
        Self::new("BEGIN", true)
    }

    /// Create a `TransactionManager` configured for MySQL (`START TRANSACTION`).
    pub fn mysql() -> Self {
        Self::new("START TRANSACTION", true)
    }

    /// Create a `TransactionManager` configured for PostgreSQL (`BEGIN`).
    pub fn postgresql() -> Self {
        Self::new("BEGIN", true)
    }

    /// Current nesting depth: 0 outside any transaction.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn in_transaction(&self) -> bool {
        self.depth > 0
    }

    /// Returns the SQL to begin a transaction or create a savepoint, and
    /// increments the nesting depth. `None` when the level needs no SQL
    /// (nested level without savepoint support).
    pub fn start(&mut self) -> Option<Cow<'static, str>> {
        let sql = if self.depth == 0 {
            Some(Cow::Borrowed(self.begin_stmt))
        } else if self.savepoints {
            Some(Cow::Owned(format!("SAVEPOINT sp_{}", self.depth)))
        } else {
            None
        };
        self.depth += 1;
        sql
    }

    /// Returns the SQL to commit the current transaction or release a
    /// savepoint, and decrements the nesting depth.
    pub fn commit(&mut self) -> Option<Cow<'static, str>> {
        self.depth -= 1;
        if self.depth == 0 {
            Some(Cow::Borrowed("COMMIT"))
        } else if self.savepoints {
            Some(Cow::Owned(format!("RELEASE SAVEPOINT sp_{}", self.depth)))
        } else {
            None
        }
    }

    /// Returns the SQL to roll back the current transaction or savepoint,
    /// and decrements the nesting depth.
    ///
    /// For nested transactions this is `ROLLBACK TO SAVEPOINT sp_N`. The
    /// savepoint itself is left in place; the outer `COMMIT` or `ROLLBACK`
    /// cleans it up, and re-entering a nested transaction at the same depth
    /// replaces it with a new `SAVEPOINT sp_N`.
    pub fn rollback(&mut self) -> Option<Cow<'static, str>> {
        self.depth -= 1;
        if self.depth == 0 {
            Some(Cow::Borrowed("ROLLBACK"))
        } else if self.savepoints {
            Some(Cow::Owned(format!(
                "ROLLBACK TO SAVEPOINT sp_{}",
                self.depth
            )))
        } else {
            None
        }
    }
}

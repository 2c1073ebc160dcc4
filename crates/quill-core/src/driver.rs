mod capability;
pub use capability::{Capability, StringEscaping};

mod response;
pub use response::{Response, Rows};

mod row;
pub use row::Row;

mod row_stream;
pub use row_stream::RowStream;

mod transaction_manager;
pub use transaction_manager::TransactionManager;

use crate::{async_trait, stmt::Value};

use std::fmt::Debug;

/// A live physical connection to a database.
///
/// The only thing quill requires of a connection: execute a SQL string with
/// optional bound parameters and report rows (or a row count) back.
/// Implementations raise [`Error::disconnect`](crate::Error::disconnect)
/// when a failure means the connection can no longer be used.
#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a SQL statement, yielding result rows or an affected-row
    /// count.
    async fn execute(&mut self, sql: &str, params: &[Value]) -> crate::Result<Response>;

    /// Check that the connection is still alive.
    ///
    /// The pool calls this before reusing a connection that has been idle
    /// past the validation threshold; a failure causes the connection to be
    /// discarded and replaced, never surfaced to the caller.
    async fn ping(&mut self) -> crate::Result<()> {
        Ok(())
    }
}

/// A factory for [`Connection`]s against one server, plus the dialect
/// description the serializer needs.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Describes the target database's dialect and feature set.
    fn capability(&self) -> &Capability;

    /// Open a new physical connection.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;
}

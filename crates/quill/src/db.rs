mod builder;
pub use builder::Builder;

mod connection;
pub use connection::ConnectionHandle;

mod pool;
pub use pool::{Pool, PoolConfig, PoolConnection, PoolStats};

mod transaction;
pub use transaction::Transaction;

use std::sync::Arc;

use quill_core::{
    driver::{Capability, Response},
    stmt::Value,
    Result,
};
use quill_sql::{Flavor, Serializer};

use crate::{Dataset, DEFAULT_SERVER};

/// Shared state between all `Db` clones.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) pool: Pool,
    pub(crate) config: Config,
}

/// Everything configurable about a database, resolved at build time and
/// threaded through explicitly. There is no process-global configuration.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) capability: Capability,
    pub(crate) flavor: Flavor,
    pub(crate) allow_raw_sql: bool,
}

/// A database handle: per-server connection pools, dialect configuration,
/// and the entry point for datasets and transactions. Cloning is cheap and
/// clones share the pools.
#[derive(Clone)]
pub struct Db {
    pub(crate) shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// A dataset selecting everything from the named table.
    pub fn table(&self, name: &str) -> Dataset {
        Dataset::table(self.clone(), name)
    }

    pub fn capability(&self) -> &Capability {
        &self.shared.config.capability
    }

    pub fn flavor(&self) -> Flavor {
        self.shared.config.flavor
    }

    pub(crate) fn serializer(&self) -> Serializer<'_> {
        let serializer =
            Serializer::with_flavor(self.shared.config.flavor, &self.shared.config.capability);
        if self.shared.config.allow_raw_sql {
            serializer
        } else {
            serializer.forbid_raw_sql()
        }
    }

    pub(crate) fn allow_raw_sql(&self) -> bool {
        self.shared.config.allow_raw_sql
    }

    /// Checks out a connection for `server` and runs `f` with it.
    ///
    /// The checkout is registered per task: a nested `synchronize` on the
    /// same server reuses the same connection rather than taking a second
    /// pool slot. The connection returns to the pool when the outermost
    /// scope ends, however it ends.
    pub async fn synchronize<R>(
        &self,
        server: &str,
        f: impl AsyncFnOnce(ConnectionHandle) -> Result<R>,
    ) -> Result<R> {
        if let Some(handle) = connection::current(server) {
            return f(handle).await;
        }

        let conn = self.shared.pool.checkout(server).await?;
        let handle = ConnectionHandle::new(conn);
        connection::scoped(server, handle.clone(), f(handle.clone())).await
    }

    /// Executes one statement on the named server.
    pub async fn execute_on(
        &self,
        server: &str,
        sql: &str,
        params: &[Value],
    ) -> Result<Response> {
        self.synchronize(server, async |conn| conn.execute(sql, params).await)
            .await
    }

    /// Executes one statement on the default server.
    pub async fn execute(&self, sql: &str, params: &[Value]) -> Result<Response> {
        self.execute_on(DEFAULT_SERVER, sql, params).await
    }

    /// Destroys every idle connection on every server; checked-out
    /// connections are destroyed as they come back.
    pub fn disconnect(&self) {
        self.shared.pool.disconnect();
    }

    /// Pool bookkeeping counters for one server.
    pub fn pool_stats(&self, server: &str) -> Result<PoolStats> {
        self.shared.pool.stats(server)
    }

    /// The configured server names.
    pub fn servers(&self) -> Vec<&str> {
        self.shared.pool.servers().collect()
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("flavor", &self.shared.config.flavor)
            .field("servers", &self.servers())
            .finish()
    }
}

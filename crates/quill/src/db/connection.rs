//! The per-task connection registry behind `Db::synchronize`.
//!
//! A checked-out connection is recorded in a task-local map keyed by server
//! name. A nested `synchronize` on the same server inside the same task
//! reuses the recorded connection instead of requesting a second pool slot,
//! so holding a connection can never deadlock against itself.

use std::{cell::RefCell, collections::HashMap, future::Future, sync::Arc};

use quill_core::{driver::Response, stmt::Value, Result};
use tokio::sync::Mutex;

use super::{pool::PoolConnection, transaction::TxState};

tokio::task_local! {
    static CURRENT: RefCell<HashMap<String, ConnectionHandle>>;
}

/// A handle to a checked-out connection, shared between the caller's scope
/// and any nested `synchronize`/transaction on the same server.
///
/// Statements lock the connection per call, so a single holder executes its
/// statements strictly in issue order.
#[derive(Clone, Debug)]
pub struct ConnectionHandle {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    conn: Mutex<PoolConnection>,

    /// Transaction bookkeeping for this checkout, if one is open.
    tx: std::sync::Mutex<Option<TxState>>,
}

impl ConnectionHandle {
    pub(crate) fn new(conn: PoolConnection) -> Self {
        Self {
            inner: Arc::new(Inner {
                conn: Mutex::new(conn),
                tx: std::sync::Mutex::new(None),
            }),
        }
    }

    /// Executes one statement on the held connection.
    ///
    /// A disconnect marks the connection defunct so the pool destroys it
    /// instead of recycling it.
    pub async fn execute(&self, sql: &str, params: &[Value]) -> Result<Response> {
        let mut conn = self.inner.conn.lock().await;
        match conn.execute(sql, params).await {
            Err(err) if err.is_disconnect() => {
                conn.mark_defunct();
                Err(err)
            }
            other => other,
        }
    }

    /// Runs `f` against the transaction state slot for this checkout.
    pub(crate) fn with_tx<R>(&self, f: impl FnOnce(&mut Option<TxState>) -> R) -> R {
        let mut tx = self.inner.tx.lock().unwrap();
        f(&mut tx)
    }
}

/// The connection currently registered for `server` in this task, if any.
pub(crate) fn current(server: &str) -> Option<ConnectionHandle> {
    CURRENT
        .try_with(|map| map.borrow().get(server).cloned())
        .ok()
        .flatten()
}

/// Runs `fut` with `handle` registered for `server`, establishing the
/// task-local scope when this is the outermost registration.
pub(crate) async fn scoped<R>(
    server: &str,
    handle: ConnectionHandle,
    fut: impl Future<Output = R>,
) -> R {
    if CURRENT.try_with(|_| ()).is_ok() {
        CURRENT.with(|map| {
            map.borrow_mut().insert(server.to_string(), handle);
        });
        let out = fut.await;
        CURRENT.with(|map| {
            map.borrow_mut().remove(server);
        });
        out
    } else {
        CURRENT
            .scope(RefCell::new(HashMap::new()), async move {
                CURRENT.with(|map| {
                    map.borrow_mut().insert(server.to_string(), handle);
                });
                let out = fut.await;
                CURRENT.with(|map| {
                    map.borrow_mut().remove(server);
                });
                out
            })
            .await
    }
}

use std::ops::Deref;

use quill_core::{
    driver::{Response, TransactionManager},
    stmt::Value,
    Result,
};
use quill_sql::Flavor;

use super::{connection, ConnectionHandle, Db};
use crate::DEFAULT_SERVER;

/// How many times connect+BEGIN is retried when the handshake itself hits a
/// disconnect. Errors anywhere later are never retried.
const BEGIN_ATTEMPTS: usize = 5;

type Hook = Box<dyn FnOnce() + Send + 'static>;

/// Transaction bookkeeping attached to a checked-out connection: nesting
/// depth plus one hook frame per open level.
pub(crate) struct TxState {
    manager: TransactionManager,
    frames: Vec<Frame>,
}

#[derive(Default)]
struct Frame {
    after_commit: Vec<Hook>,
    after_rollback: Vec<Hook>,
}

impl std::fmt::Debug for TxState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxState")
            .field("depth", &self.manager.depth())
            .field("frames", &self.frames.len())
            .finish()
    }
}

/// An open transaction on one server.
///
/// Derefs to [`Db`], so datasets built inside the transaction closure run
/// their statements on the transaction's connection (the per-task checkout
/// registry routes them there).
pub struct Transaction {
    db: Db,
    handle: ConnectionHandle,
}

impl Transaction {
    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Executes one statement on the transaction's connection.
    pub async fn execute(&self, sql: &str, params: &[Value]) -> Result<Response> {
        self.handle.execute(sql, params).await
    }

    /// Registers a hook to run after the enclosing real transaction
    /// commits. Hooks run in registration order, after the COMMIT has
    /// completed, outside any pool or connection lock. A savepoint-only
    /// rollback does not discard these.
    pub fn after_commit(&self, hook: impl FnOnce() + Send + 'static) {
        self.handle.with_tx(|slot| {
            let state = slot.as_mut().expect("open transaction");
            state.frames[0].after_commit.push(Box::new(hook));
        });
    }

    /// Registers a hook to run after the enclosing real transaction rolls
    /// back, in registration order.
    pub fn after_rollback(&self, hook: impl FnOnce() + Send + 'static) {
        self.handle.with_tx(|slot| {
            let state = slot.as_mut().expect("open transaction");
            state.frames[0].after_rollback.push(Box::new(hook));
        });
    }

    /// Registers a commit hook scoped to the current savepoint level: it is
    /// discarded if that savepoint rolls back, and otherwise merges into
    /// the enclosing level when the savepoint releases.
    pub fn after_commit_savepoint(&self, hook: impl FnOnce() + Send + 'static) {
        self.handle.with_tx(|slot| {
            let state = slot.as_mut().expect("open transaction");
            state
                .frames
                .last_mut()
                .expect("open frame")
                .after_commit
                .push(Box::new(hook));
        });
    }

    /// Registers a rollback hook scoped to the current savepoint level: it
    /// runs right after a `ROLLBACK TO SAVEPOINT` of that level.
    pub fn after_rollback_savepoint(&self, hook: impl FnOnce() + Send + 'static) {
        self.handle.with_tx(|slot| {
            let state = slot.as_mut().expect("open transaction");
            state
                .frames
                .last_mut()
                .expect("open frame")
                .after_rollback
                .push(Box::new(hook));
        });
    }
}

impl Deref for Transaction {
    type Target = Db;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

impl Db {
    /// Runs `f` inside a transaction on the default server: COMMIT when it
    /// returns `Ok`, ROLLBACK when it returns `Err` (the error propagates
    /// unchanged).
    pub async fn transaction<R>(
        &self,
        f: impl AsyncFnOnce(&Transaction) -> Result<R>,
    ) -> Result<R> {
        self.transaction_on(DEFAULT_SERVER, f).await
    }

    /// Runs `f` inside a transaction on the named server.
    ///
    /// Called inside an open transaction on the same server, this becomes a
    /// savepoint level when the dialect has savepoints, and otherwise joins
    /// the outer transaction.
    pub async fn transaction_on<R>(
        &self,
        server: &str,
        f: impl AsyncFnOnce(&Transaction) -> Result<R>,
    ) -> Result<R> {
        if let Some(handle) = connection::current(server) {
            let open = handle.with_tx(|slot| slot.is_some());
            return if open {
                self.nested_transaction(handle, f).await
            } else {
                // A connection is held but no transaction is open on it;
                // no reconnect is possible here, so no BEGIN retry either.
                self.begin_on(&handle).await?;
                self.run_root(handle, f).await
            };
        }

        // Fresh checkout: a disconnect during the BEGIN handshake tears the
        // connection down and retries the whole connect+BEGIN sequence. No
        // user statement has run yet, so the retry cannot double-execute
        // anything.
        let mut attempt = 1;
        let handle = loop {
            let conn = self.shared.pool.checkout(server).await?;
            let handle = ConnectionHandle::new(conn);
            match self.begin_on(&handle).await {
                Ok(()) => break handle,
                Err(err) if err.is_disconnect() && attempt < BEGIN_ATTEMPTS => {
                    // The defunct connection is destroyed as the handle
                    // drops; go around with a fresh one.
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        };

        connection::scoped(server, handle.clone(), self.run_root(handle.clone(), f)).await
    }

    fn transaction_manager(&self) -> TransactionManager {
        let begin = match self.flavor() {
            Flavor::Mysql => "START TRANSACTION",
            Flavor::Postgresql | Flavor::Sqlite => "BEGIN",
        };
        TransactionManager::new(begin, self.capability().savepoints)
    }

    async fn begin_on(&self, handle: &ConnectionHandle) -> Result<()> {
        let mut state = TxState {
            manager: self.transaction_manager(),
            frames: vec![Frame::default()],
        };
        let begin = state.manager.start().expect("root level always emits SQL");

        handle.execute(&begin, &[]).await?;
        handle.with_tx(|slot| *slot = Some(state));
        Ok(())
    }

    async fn run_root<R>(
        &self,
        handle: ConnectionHandle,
        f: impl AsyncFnOnce(&Transaction) -> Result<R>,
    ) -> Result<R> {
        let tx = Transaction {
            db: self.clone(),
            handle: handle.clone(),
        };

        let out = f(&tx).await;

        let boundary = handle.with_tx(|slot| {
            let state = slot.as_mut().expect("open transaction");
            let sql = if out.is_ok() {
                state.manager.commit()
            } else {
                state.manager.rollback()
            };
            sql.expect("root level always emits SQL")
        });

        let resolved = handle.execute(&boundary, &[]).await;

        let root = handle
            .with_tx(|slot| slot.take().expect("open transaction"))
            .frames
            .into_iter()
            .next()
            .expect("root frame");

        // The boundary is decided; hooks run here, outside every lock.
        match (out, resolved) {
            (Ok(value), Ok(_)) => {
                for hook in root.after_commit {
                    hook();
                }
                Ok(value)
            }
            (Ok(_), Err(err)) => {
                // COMMIT itself failed; nothing was committed.
                for hook in root.after_rollback {
                    hook();
                }
                Err(err)
            }
            (Err(err), _) => {
                for hook in root.after_rollback {
                    hook();
                }
                Err(err)
            }
        }
    }

    async fn nested_transaction<R>(
        &self,
        handle: ConnectionHandle,
        f: impl AsyncFnOnce(&Transaction) -> Result<R>,
    ) -> Result<R> {
        let savepoint = handle.with_tx(|slot| {
            let state = slot.as_mut().expect("open transaction");
            state.frames.push(Frame::default());
            state.manager.start()
        });

        if let Some(sql) = savepoint {
            if let Err(err) = handle.execute(&sql, &[]).await {
                handle.with_tx(|slot| {
                    let state = slot.as_mut().expect("open transaction");
                    state.frames.pop();
                    let _ = state.manager.rollback();
                });
                return Err(err);
            }
        }

        let tx = Transaction {
            db: self.clone(),
            handle: handle.clone(),
        };

        match f(&tx).await {
            Ok(value) => {
                let release = handle.with_tx(|slot| {
                    slot.as_mut().expect("open transaction").manager.commit()
                });
                if let Some(sql) = release {
                    if let Err(err) = handle.execute(&sql, &[]).await {
                        let frame = handle.with_tx(|slot| {
                            slot.as_mut().expect("open transaction").frames.pop()
                        });
                        if let Some(frame) = frame {
                            for hook in frame.after_rollback {
                                hook();
                            }
                        }
                        return Err(err);
                    }
                }
                // Scoped hooks survive the savepoint: merge them into the
                // enclosing level.
                handle.with_tx(|slot| {
                    let state = slot.as_mut().expect("open transaction");
                    let frame = state.frames.pop().expect("open frame");
                    let parent = state.frames.last_mut().expect("parent frame");
                    parent.after_commit.extend(frame.after_commit);
                    parent.after_rollback.extend(frame.after_rollback);
                });
                Ok(value)
            }
            Err(err) => {
                let rollback = handle.with_tx(|slot| {
                    slot.as_mut().expect("open transaction").manager.rollback()
                });
                let rolled_back = match rollback {
                    Some(sql) => handle.execute(&sql, &[]).await.is_ok(),
                    // No savepoint support: the level was virtual and the
                    // outer transaction decides the real boundary.
                    None => false,
                };
                let frame = handle.with_tx(|slot| {
                    slot.as_mut().expect("open transaction").frames.pop()
                });
                if let Some(frame) = frame {
                    if rolled_back {
                        // Savepoint-scoped rollback hooks fire now; scoped
                        // commit hooks die with the savepoint.
                        for hook in frame.after_rollback {
                            hook();
                        }
                    } else {
                        // The level produced no real rollback; its hooks
                        // ride along to the enclosing boundary.
                        handle.with_tx(|slot| {
                            let state = slot.as_mut().expect("open transaction");
                            let parent = state.frames.last_mut().expect("parent frame");
                            parent.after_commit.extend(frame.after_commit);
                            parent.after_rollback.extend(frame.after_rollback);
                        });
                    }
                }
                Err(err)
            }
        }
    }
}

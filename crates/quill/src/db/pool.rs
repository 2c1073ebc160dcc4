//! Connection pooling for database connections.
//!
//! One [`Pool`] manages an independent sub-pool per server (shard). Each
//! sub-pool guards its bookkeeping with its own mutex, so unrelated shards
//! never serialize against each other.

use std::{
    collections::{HashMap, VecDeque},
    ops::{Deref, DerefMut},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use quill_core::{driver::Driver, Connection, Error, Result};
use tokio::sync::oneshot;

/// Configuration for connection pool behavior, per server.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Upper bound on live connections (idle plus checked out).
    pub max_size: usize,

    /// How long a checkout may wait for a free connection before failing
    /// with a pool-timeout error.
    pub checkout_timeout: Duration,

    /// Idle connections older than this are destroyed at checkout and
    /// replaced with a fresh connection.
    pub max_idle: Option<Duration>,

    /// Idle connections older than this are pinged before reuse; a failed
    /// ping destroys the connection and checkout silently moves on.
    pub validate_after: Option<Duration>,
}

impl PoolConfig {
    pub fn new() -> Self {
        Self {
            max_size: 4,
            checkout_timeout: Duration::from_secs(5),
            max_idle: None,
            validate_after: None,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A set of per-server connection pools.
#[derive(Debug)]
pub struct Pool {
    servers: HashMap<String, Arc<Shard>>,
}

/// Point-in-time bookkeeping counters for one server's sub-pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Live connections: idle plus checked out.
    pub total: usize,

    /// Connections sitting in the idle list.
    pub idle: usize,

    /// Checkouts currently parked waiting for a connection.
    pub waiting: usize,
}

#[derive(Debug)]
struct Shard {
    name: String,
    driver: Arc<dyn Driver>,
    config: PoolConfig,
    state: Mutex<ShardState>,
}

struct ShardState {
    /// Idle connections, most recently returned last. Popping from the
    /// back hands a just-returned connection to the next checkout.
    idle: Vec<IdleConn>,

    /// Live connections: idle + checked out + being created.
    total: usize,

    /// Parked checkouts, woken FIFO.
    waiters: VecDeque<oneshot::Sender<()>>,

    /// Bumped by disconnect-all; connections carrying an older epoch are
    /// destroyed at checkin instead of returning to the idle list.
    epoch: u64,
}

struct IdleConn {
    conn: Box<dyn Connection>,
    since: Instant,
    epoch: u64,
}

impl std::fmt::Debug for ShardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardState")
            .field("idle", &self.idle.len())
            .field("total", &self.total)
            .field("waiters", &self.waiters.len())
            .field("epoch", &self.epoch)
            .finish()
    }
}

/// What a checkout decided to do while holding the shard lock.
enum Plan {
    Ready(Box<dyn Connection>, u64),
    Validate(Box<dyn Connection>, u64),
    Create(u64),
    Wait(oneshot::Receiver<()>),
}

impl Pool {
    pub(crate) fn new(servers: HashMap<String, (Arc<dyn Driver>, PoolConfig)>) -> Self {
        let servers = servers
            .into_iter()
            .map(|(name, (driver, config))| {
                let shard = Arc::new(Shard {
                    name: name.clone(),
                    driver,
                    config,
                    state: Mutex::new(ShardState {
                        idle: Vec::new(),
                        total: 0,
                        waiters: VecDeque::new(),
                        epoch: 0,
                    }),
                });
                (name, shard)
            })
            .collect();

        Self { servers }
    }

    pub(crate) fn driver(&self, server: &str) -> Result<&Arc<dyn Driver>> {
        Ok(&self.shard(server)?.driver)
    }

    pub(crate) fn servers(&self) -> impl Iterator<Item = &str> {
        self.servers.keys().map(String::as_str)
    }

    fn shard(&self, server: &str) -> Result<&Arc<Shard>> {
        self.servers
            .get(server)
            .ok_or_else(|| Error::build(format!("unknown server `{server}`")))
    }

    /// Checks a connection out of the named server's sub-pool.
    ///
    /// Immediately available idle connections are reused; below the size
    /// cap a fresh connection is created; otherwise the checkout parks
    /// until a checkin wakes it, bounded by the configured timeout.
    pub async fn checkout(&self, server: &str) -> Result<PoolConnection> {
        let shard = self.shard(server)?;
        Shard::checkout(shard).await
    }

    /// Destroys every idle connection and marks checked-out connections for
    /// destruction at checkin. Parked checkouts are woken so they can
    /// create fresh connections.
    pub fn disconnect(&self) {
        for shard in self.servers.values() {
            shard.disconnect();
        }
    }

    pub fn stats(&self, server: &str) -> Result<PoolStats> {
        let shard = self.shard(server)?;
        let state = shard.state.lock().unwrap();
        Ok(PoolStats {
            total: state.total,
            idle: state.idle.len(),
            waiting: state.waiters.len(),
        })
    }
}

impl Shard {
    async fn checkout(shard: &Arc<Self>) -> Result<PoolConnection> {
        let timeout = shard.config.checkout_timeout;
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let plan = shard.plan_checkout();

            match plan {
                Plan::Ready(conn, epoch) => return Ok(PoolConnection::new(shard, conn, epoch)),
                Plan::Validate(mut conn, epoch) => {
                    // A stale connection gets one ping; failure is not the
                    // caller's problem, the pool just tries again.
                    match conn.ping().await {
                        Ok(()) => return Ok(PoolConnection::new(shard, conn, epoch)),
                        Err(_) => {
                            drop(conn);
                            shard.release_slot();
                            continue;
                        }
                    }
                }
                Plan::Create(epoch) => match shard.driver.connect().await {
                    Ok(conn) => return Ok(PoolConnection::new(shard, conn, epoch)),
                    Err(err) => {
                        // Give the reserved slot back and let a parked
                        // checkout have a go.
                        shard.release_slot();
                        return Err(err);
                    }
                },
                Plan::Wait(rx) => {
                    match tokio::time::timeout_at(deadline, rx).await {
                        // Woken by a checkin (or the waker was dropped);
                        // race for the connection again.
                        Ok(_) => continue,
                        Err(_) => {
                            // This waiter may have consumed a wake-up right
                            // as its deadline expired; pass it along.
                            let mut state = shard.state.lock().unwrap();
                            Self::wake_one(&mut state);
                            drop(state);
                            return Err(Error::pool_timeout(&shard.name, timeout));
                        }
                    }
                }
            }
        }
    }

    /// One pass over the shard state, deciding how this checkout proceeds.
    fn plan_checkout(&self) -> Plan {
        let mut state = self.state.lock().unwrap();

        while let Some(idle) = state.idle.pop() {
            if idle.epoch < state.epoch {
                state.total -= 1;
                continue;
            }
            if let Some(max_idle) = self.config.max_idle {
                if idle.since.elapsed() >= max_idle {
                    state.total -= 1;
                    continue;
                }
            }
            if let Some(validate_after) = self.config.validate_after {
                if idle.since.elapsed() >= validate_after {
                    return Plan::Validate(idle.conn, idle.epoch);
                }
            }
            return Plan::Ready(idle.conn, idle.epoch);
        }

        if state.total < self.config.max_size {
            state.total += 1;
            return Plan::Create(state.epoch);
        }

        let (tx, rx) = oneshot::channel();
        state.waiters.push_back(tx);
        Plan::Wait(rx)
    }

    fn checkin(&self, conn: Box<dyn Connection>, epoch: u64) {
        let mut state = self.state.lock().unwrap();
        if epoch < state.epoch {
            // Marked for destruction by a disconnect-all while checked out
            state.total -= 1;
            drop(conn);
        } else {
            state.idle.push(IdleConn {
                conn,
                since: Instant::now(),
                epoch,
            });
        }
        Self::wake_one(&mut state);
    }

    /// Destroys a connection (or abandons a reservation), freeing its slot.
    fn release_slot(&self) {
        let mut state = self.state.lock().unwrap();
        state.total -= 1;
        Self::wake_one(&mut state);
    }

    fn wake_one(state: &mut ShardState) {
        while let Some(waiter) = state.waiters.pop_front() {
            if waiter.send(()).is_ok() {
                break;
            }
        }
    }

    fn disconnect(&self) {
        let (drained, waiters) = {
            let mut state = self.state.lock().unwrap();
            state.epoch += 1;
            let drained: Vec<_> = state.idle.drain(..).collect();
            state.total -= drained.len();
            let waiters = std::mem::take(&mut state.waiters);
            (drained, waiters)
        };

        // Destroy connections and wake waiters outside the lock
        drop(drained);
        for waiter in waiters {
            let _ = waiter.send(());
        }
    }
}

/// A connection checked out of a pool.
///
/// Dropping the guard returns the connection, so an early return or panic
/// in the caller's scope can never leak a checked-out entry. A guard marked
/// defunct destroys its connection instead.
pub struct PoolConnection {
    shard: Arc<Shard>,
    conn: Option<Box<dyn Connection>>,
    epoch: u64,
    defunct: bool,
}

impl PoolConnection {
    fn new(shard: &Arc<Shard>, conn: Box<dyn Connection>, epoch: u64) -> Self {
        Self {
            shard: shard.clone(),
            conn: Some(conn),
            epoch,
            defunct: false,
        }
    }

    /// Marks the connection dead: it will be destroyed at drop rather than
    /// returned to the idle list.
    pub fn mark_defunct(&mut self) {
        self.defunct = true;
    }
}

impl Deref for PoolConnection {
    type Target = Box<dyn Connection>;

    fn deref(&self) -> &Self::Target {
        self.conn.as_ref().expect("connection present until drop")
    }
}

impl DerefMut for PoolConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.conn.as_mut().expect("connection present until drop")
    }
}

impl Drop for PoolConnection {
    fn drop(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        if self.defunct {
            drop(conn);
            self.shard.release_slot();
        } else {
            self.shard.checkin(conn, self.epoch);
        }
    }
}

impl std::fmt::Debug for PoolConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolConnection")
            .field("server", &self.shard.name)
            .field("epoch", &self.epoch)
            .field("defunct", &self.defunct)
            .finish()
    }
}

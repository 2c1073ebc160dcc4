//! A scripted in-memory driver: records every statement, serves canned
//! rows, and injects connect/ping/execute failures on demand.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use quill::{
    async_trait, stmt::Value, Capability, Connection, Driver, Error, Response, Result, Row,
};

/// Shared, inspectable state behind a [`MockDriver`] and its connections.
#[derive(Debug, Default)]
pub struct DriverState {
    /// Total connections ever created.
    pub connects: AtomicUsize,

    /// `(connection id, sql)` for every statement executed.
    pub log: Mutex<Vec<(usize, String)>>,

    /// Canned result rows, keyed by exact SQL text.
    pub results: Mutex<HashMap<String, Vec<Row>>>,

    /// Fail this many upcoming `connect` calls.
    pub connect_failures: Mutex<usize>,

    /// Fail this many upcoming `ping` calls with a disconnect.
    pub ping_failures: Mutex<usize>,

    /// Fail this many upcoming BEGIN statements with a disconnect.
    pub begin_disconnects: Mutex<usize>,

    /// Fail this many upcoming statements with a disconnect.
    pub execute_disconnects: Mutex<usize>,

    /// Sleep this long inside `connect`.
    pub connect_delay: Mutex<Option<Duration>>,
}

impl DriverState {
    /// Scripts the rows returned for an exact SQL string.
    pub fn script(&self, sql: &str, rows: Vec<Row>) {
        self.results.lock().unwrap().insert(sql.to_string(), rows);
    }

    /// The executed SQL, in order, ignoring which connection ran it.
    pub fn sql_log(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|(_, sql)| sql.clone())
            .collect()
    }

    /// The connection ids that executed statements, in order.
    pub fn conn_log(&self) -> Vec<usize> {
        self.log.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }

    fn take_one(counter: &Mutex<usize>) -> bool {
        let mut remaining = counter.lock().unwrap();
        if *remaining > 0 {
            *remaining -= 1;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockDriver {
    capability: Capability,
    state: Arc<DriverState>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::with_capability(Capability::POSTGRESQL)
    }

    pub fn with_capability(capability: Capability) -> Self {
        Self {
            capability,
            state: Arc::new(DriverState::default()),
        }
    }

    pub fn state(&self) -> Arc<DriverState> {
        self.state.clone()
    }
}

#[async_trait]
impl Driver for MockDriver {
    fn capability(&self) -> &Capability {
        &self.capability
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        let delay = *self.state.connect_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if DriverState::take_one(&self.state.connect_failures) {
            return Err(Error::disconnect(MockFailure("connect refused")));
        }

        let id = self.state.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockConnection {
            id,
            state: self.state.clone(),
        }))
    }
}

#[derive(Debug)]
pub struct MockConnection {
    pub id: usize,
    state: Arc<DriverState>,
}

#[async_trait]
impl Connection for MockConnection {
    async fn execute(&mut self, sql: &str, _params: &[Value]) -> Result<Response> {
        self.state
            .log
            .lock()
            .unwrap()
            .push((self.id, sql.to_string()));

        let is_begin = sql == "BEGIN" || sql == "START TRANSACTION";
        if is_begin && DriverState::take_one(&self.state.begin_disconnects) {
            return Err(Error::disconnect(MockFailure("lost during begin")));
        }

        // Injected statement failures target the caller's statements, not
        // transaction control.
        let is_control = is_begin
            || sql == "COMMIT"
            || sql == "ROLLBACK"
            || sql.starts_with("SAVEPOINT")
            || sql.starts_with("RELEASE SAVEPOINT")
            || sql.starts_with("ROLLBACK TO SAVEPOINT");
        if !is_control && DriverState::take_one(&self.state.execute_disconnects) {
            return Err(Error::disconnect(MockFailure("lost mid-statement")));
        }

        if let Some(rows) = self.state.results.lock().unwrap().get(sql) {
            return Ok(Response::rows(rows.clone()));
        }

        if sql.starts_with("INSERT") || sql.starts_with("UPDATE") || sql.starts_with("DELETE") {
            Ok(Response::count(1))
        } else {
            Ok(Response::rows(Vec::new()))
        }
    }

    async fn ping(&mut self) -> Result<()> {
        if DriverState::take_one(&self.state.ping_failures) {
            return Err(Error::disconnect(MockFailure("stale connection")));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct MockFailure(pub &'static str);

impl std::error::Error for MockFailure {}

impl std::fmt::Display for MockFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// A database over one mock driver with the given pool size, plus the
/// driver's inspectable state.
pub fn mock_db(max_connections: usize) -> (quill::Db, Arc<DriverState>) {
    let driver = MockDriver::new();
    let state = driver.state();
    let db = quill::Db::builder()
        .driver(driver)
        .max_connections(max_connections)
        .build()
        .unwrap();
    (db, state)
}

use std::time::Duration;

use super::Error;

/// Error raised when a connection could not be checked out of the pool
/// within the configured wait.
///
/// Distinguishable from query and disconnect errors so callers can
/// special-case "could not acquire a connection".
#[derive(Debug)]
pub(super) struct PoolTimeoutError {
    pub(super) server: String,
    pub(super) waited: Duration,
}

impl std::error::Error for PoolTimeoutError {}

impl core::fmt::Display for PoolTimeoutError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "connection pool timeout: no connection available for server `{}` after {}s",
            self.server,
            self.waited.as_secs_f64()
        )
    }
}

impl Error {
    /// Creates a pool-timeout error.
    pub fn pool_timeout(server: impl Into<String>, waited: Duration) -> Error {
        Error::from(super::ErrorKind::PoolTimeout(PoolTimeoutError {
            server: server.into(),
            waited,
        }))
    }

    /// Returns `true` if this error is a pool-timeout error.
    pub fn is_pool_timeout(&self) -> bool {
        self.chain_any(|kind| matches!(kind, super::ErrorKind::PoolTimeout(_)))
    }
}

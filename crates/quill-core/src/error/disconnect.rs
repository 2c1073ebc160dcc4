use super::Error;

/// Error indicating the underlying connection is dead.
///
/// Disconnects are recovered by the pool (the connection is destroyed, never
/// returned to the idle set); everywhere else they propagate to the caller.
#[derive(Debug)]
pub(super) struct DisconnectError {
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for DisconnectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for DisconnectError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "connection lost: ")?;
        // Display the error and walk its source chain
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates a disconnect error.
    ///
    /// Adapters raise this (rather than [`Error::driver`]) when the failure
    /// means the physical connection can no longer be used.
    pub fn disconnect(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
        Error::from(super::ErrorKind::Disconnect(DisconnectError {
            inner: err.into(),
        }))
    }

    /// Returns `true` if this error (or any cause in its chain) is a
    /// disconnect.
    pub fn is_disconnect(&self) -> bool {
        self.chain_any(|kind| matches!(kind, super::ErrorKind::Disconnect(_)))
    }
}

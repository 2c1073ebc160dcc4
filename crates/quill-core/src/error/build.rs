use super::Error;

/// Error raised when a statement or dataset is constructed incorrectly.
///
/// Construction errors are raised synchronously at build time and are never
/// retried or silently corrected.
#[derive(Debug)]
pub(super) struct BuildError {
    pub(super) message: String,
}

impl std::error::Error for BuildError {}

impl core::fmt::Display for BuildError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid query construction: {}", self.message)
    }
}

impl Error {
    /// Creates a construction error.
    pub fn build(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Build(BuildError {
            message: message.into(),
        }))
    }

    /// Returns `true` if this error is a construction error.
    pub fn is_build(&self) -> bool {
        self.chain_any(|kind| matches!(kind, super::ErrorKind::Build(_)))
    }
}

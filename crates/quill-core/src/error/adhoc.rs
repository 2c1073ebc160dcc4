use super::Error;

/// An ad-hoc error created from a message.
#[derive(Debug)]
pub(super) struct AdhocError {
    pub(super) message: String,
}

impl std::error::Error for AdhocError {}

impl core::fmt::Display for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error {
    /// Creates an error from format arguments.
    ///
    /// Prefer the typed constructors; this exists for the `bail!` and `err!`
    /// macros and one-off messages.
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        Error::from(super::ErrorKind::Adhoc(AdhocError {
            message: std::fmt::format(args),
        }))
    }

    /// Creates an error from a message.
    pub fn msg(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Adhoc(AdhocError {
            message: message.into(),
        }))
    }
}

use crate::{Error, Result};

/// Describes a target database's dialect: what syntax it accepts and how
/// literals must be escaped. Rendering is a pure function of the statement
/// tree and this descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Capability {
    /// When `true`, identifiers are quoted in rendered SQL.
    pub quote_identifiers: bool,

    /// How string literals are escaped. Exactly one convention applies; an
    /// adapter reporting an unknown convention is rejected at configuration
    /// time rather than risking a mis-escaped literal.
    pub string_escaping: StringEscaping,

    /// Fractional-second digits the database stores for timestamps.
    /// Literals are rounded (half-up) to this precision.
    pub timestamp_precision: u32,

    /// Supports window functions (`OVER` clauses).
    pub window_functions: bool,

    /// Supports `RETURNING` on INSERT/UPDATE/DELETE.
    pub returning: bool,

    /// Supports `SAVEPOINT` for nested transactions.
    pub savepoints: bool,

    /// Supports row-level locking clauses (`FOR UPDATE` / `FOR SHARE`).
    pub select_for_update: bool,

    /// Supports common table expressions.
    pub cte: bool,

    /// Supports `INTERSECT` and `EXCEPT` set operations.
    pub intersect_except: bool,

    /// Supports `DISTINCT ON (...)`.
    pub distinct_on: bool,

    /// Supports `OFFSET` without a `LIMIT`.
    pub bare_offset: bool,
}

/// String-literal escaping conventions.
///
/// Mutually exclusive; see [`StringEscaping::from_name`] for the fail-fast
/// mapping from adapter-reported names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringEscaping {
    /// `'it''s'` — embedded quotes doubled.
    Standard,

    /// `'it''s \\ backslash'` — quotes doubled and backslashes escaped;
    /// the only convention that can represent a NUL byte (`\0`).
    Backslash,

    /// `N'it''s'` — national-character literals with doubled quotes.
    NPrefix,
}

impl StringEscaping {
    /// Maps an adapter-reported convention name to the convention.
    ///
    /// Unknown names fail fast with a construction error: silently guessing
    /// an escaping convention is how injection bugs happen.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "standard" => Ok(Self::Standard),
            "backslash" => Ok(Self::Backslash),
            "n-prefix" => Ok(Self::NPrefix),
            _ => Err(Error::build(format!(
                "unrecognized string escaping convention `{name}`"
            ))),
        }
    }
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        quote_identifiers: false,
        string_escaping: StringEscaping::Standard,
        timestamp_precision: 3,
        window_functions: true,
        returning: true,
        savepoints: true,
        select_for_update: false,
        cte: true,
        intersect_except: true,
        distinct_on: false,
        bare_offset: true,
    };

    /// PostgreSQL capabilities.
    pub const POSTGRESQL: Self = Self {
        timestamp_precision: 6,
        select_for_update: true,
        distinct_on: true,
        ..Self::SQLITE
    };

    /// MySQL capabilities.
    pub const MYSQL: Self = Self {
        string_escaping: StringEscaping::Backslash,
        timestamp_precision: 6,
        returning: false,
        select_for_update: true,
        intersect_except: false,
        bare_offset: false,
        ..Self::SQLITE
    };
}

mod db;
pub use db::{Builder, ConnectionHandle, Db, PoolConfig, PoolStats, Transaction};

mod dataset;
pub use dataset::Dataset;

pub use quill_core::{
    async_trait,
    driver::{Capability, Connection, Driver, Response, Row, RowStream, Rows, StringEscaping},
    stmt, Error, Result,
};
pub use quill_sql::{DateInterval, Flavor, Serializer};

/// The server datasets and transactions target when none is named.
pub const DEFAULT_SERVER: &str = "default";

use std::{collections::HashMap, sync::Arc, time::Duration};

use quill_core::{
    driver::{Driver, StringEscaping},
    Error, Result,
};
use quill_sql::Flavor;

use super::{Config, Db, Pool, PoolConfig, Shared};
use crate::DEFAULT_SERVER;

/// Builds a [`Db`]: servers (shards), pool behavior, and dialect overrides.
#[derive(Default)]
pub struct Builder {
    servers: Vec<(String, Arc<dyn Driver>, Option<PoolConfig>)>,
    pool: Option<PoolConfig>,
    flavor: Option<Flavor>,
    quote_identifiers: Option<bool>,
    string_escaping: Option<String>,
    timestamp_precision: Option<u32>,
    forbid_raw_sql: bool,
}

impl Builder {
    /// Registers the default server's driver.
    pub fn driver(self, driver: impl Driver) -> Self {
        self.server(DEFAULT_SERVER, driver)
    }

    /// Registers a named server (shard).
    pub fn server(mut self, name: &str, driver: impl Driver) -> Self {
        self.servers.push((name.to_string(), Arc::new(driver), None));
        self
    }

    /// Registers a named server with its own pool configuration.
    pub fn server_with(mut self, name: &str, driver: impl Driver, config: PoolConfig) -> Self {
        self.servers
            .push((name.to_string(), Arc::new(driver), Some(config)));
        self
    }

    /// Maximum live connections per server.
    pub fn max_connections(mut self, max: usize) -> Self {
        self.pool.get_or_insert_with(PoolConfig::new).max_size = max;
        self
    }

    /// How long a checkout may wait before failing with a pool timeout.
    pub fn checkout_timeout(mut self, timeout: Duration) -> Self {
        self.pool
            .get_or_insert_with(PoolConfig::new)
            .checkout_timeout = timeout;
        self
    }

    /// Destroy idle connections older than this at checkout.
    pub fn max_idle(mut self, max_idle: Duration) -> Self {
        self.pool.get_or_insert_with(PoolConfig::new).max_idle = Some(max_idle);
        self
    }

    /// Ping idle connections older than this before reuse.
    pub fn validate_after(mut self, validate_after: Duration) -> Self {
        self.pool.get_or_insert_with(PoolConfig::new).validate_after = Some(validate_after);
        self
    }

    /// The SQL dialect to render. Defaults to PostgreSQL.
    pub fn flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = Some(flavor);
        self
    }

    /// Quote identifiers in rendered SQL.
    pub fn quote_identifiers(mut self, quote: bool) -> Self {
        self.quote_identifiers = Some(quote);
        self
    }

    /// Overrides the string-escaping convention by adapter-reported name.
    ///
    /// Unknown names fail at [`build`](Self::build), before any SQL is
    /// rendered.
    pub fn string_escaping(mut self, name: &str) -> Self {
        self.string_escaping = Some(name.to_string());
        self
    }

    /// Overrides the fractional-second digits used for timestamp literals.
    pub fn timestamp_precision(mut self, digits: u32) -> Self {
        self.timestamp_precision = Some(digits);
        self
    }

    /// Rejects raw SQL fragments everywhere: datasets refuse raw entry
    /// points and the serializer refuses to render them.
    pub fn forbid_raw_sql(mut self) -> Self {
        self.forbid_raw_sql = true;
        self
    }

    pub fn build(self) -> Result<Db> {
        if self.servers.is_empty() {
            return Err(Error::build("a database needs at least one server"));
        }

        // The dialect is a property of the database, not the shard: every
        // server reports the default server's capability.
        let base = self
            .servers
            .iter()
            .find(|(name, _, _)| name == DEFAULT_SERVER)
            .unwrap_or(&self.servers[0]);
        let mut capability = base.1.capability().clone();

        if let Some(quote) = self.quote_identifiers {
            capability.quote_identifiers = quote;
        }
        if let Some(name) = &self.string_escaping {
            capability.string_escaping = StringEscaping::from_name(name)?;
        }
        if let Some(digits) = self.timestamp_precision {
            capability.timestamp_precision = digits;
        }

        let pool_config = self.pool.unwrap_or_default();
        let servers: HashMap<_, _> = self
            .servers
            .into_iter()
            .map(|(name, driver, config)| {
                (name, (driver, config.unwrap_or_else(|| pool_config.clone())))
            })
            .collect();

        Ok(Db {
            shared: Arc::new(Shared {
                pool: Pool::new(servers),
                config: Config {
                    capability,
                    flavor: self.flavor.unwrap_or(Flavor::Postgresql),
                    allow_raw_sql: !self.forbid_raw_sql,
                },
            }),
        })
    }
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field(
                "servers",
                &self
                    .servers
                    .iter()
                    .map(|(name, _, _)| name.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("flavor", &self.flavor)
            .finish()
    }
}

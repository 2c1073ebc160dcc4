use super::Serializer;

use quill_core::driver::Capability;

/// The SQL dialect family being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Postgresql,
    Sqlite,
    Mysql,
}

impl Flavor {
    /// The stock capability descriptor for this flavor, for drivers that do
    /// not refine the defaults.
    pub fn capability(self) -> Capability {
        match self {
            Self::Postgresql => Capability::POSTGRESQL,
            Self::Sqlite => Capability::SQLITE,
            Self::Mysql => Capability::MYSQL,
        }
    }
}

impl<'a> Serializer<'a> {
    pub fn sqlite(capability: &'a Capability) -> Serializer<'a> {
        Serializer {
            capability,
            flavor: Flavor::Sqlite,
            allow_raw: true,
        }
    }

    pub fn postgresql(capability: &'a Capability) -> Serializer<'a> {
        Serializer {
            capability,
            flavor: Flavor::Postgresql,
            allow_raw: true,
        }
    }

    pub fn mysql(capability: &'a Capability) -> Serializer<'a> {
        Serializer {
            capability,
            flavor: Flavor::Mysql,
            allow_raw: true,
        }
    }

    pub fn with_flavor(flavor: Flavor, capability: &'a Capability) -> Serializer<'a> {
        Serializer {
            capability,
            flavor,
            allow_raw: true,
        }
    }

    /// Rejects any raw SQL fragment at render time instead of splicing it.
    pub fn forbid_raw_sql(mut self) -> Self {
        self.allow_raw = false;
        self
    }

    pub(super) fn is_mysql(&self) -> bool {
        matches!(self.flavor, Flavor::Mysql)
    }

    pub(super) fn is_sqlite(&self) -> bool {
        matches!(self.flavor, Flavor::Sqlite)
    }

    pub(super) fn is_postgresql(&self) -> bool {
        matches!(self.flavor, Flavor::Postgresql)
    }
}

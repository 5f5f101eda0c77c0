use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use crate::config::Config;
use crate::errors::ConfigError;
use crate::manager::CURRENT_VERSION;
use crate::version::Version;

/// Loosely-typed document as parsed from JSON.
pub type Document = Map<String, Value>;

/// Rewrites a document from one older schema into the current schema.
pub type MigrationFn = fn(Document) -> Result<Document, ConfigError>;

/// Table of schema upgrades keyed by the version they migrate from.
///
/// The current schema generation ships without entries; an entry is added
/// here whenever the persisted shape changes.
#[derive(Debug, Clone, Default)]
pub struct MigrationRegistry {
    migrations: BTreeMap<Version, MigrationFn>,
}

impl MigrationRegistry {
    /// Registry with every migration this build knows about.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Register a migration from `from` to the current schema.
    pub fn with_migration(
        mut self,
        from: Version,
        migration: MigrationFn,
    ) -> Self {
        self.migrations.insert(from, migration);
        self
    }

    pub fn compatible_versions(&self) -> BTreeSet<Version> {
        self.migrations.keys().copied().collect()
    }

    pub fn is_compatible(&self, version: Version) -> bool {
        version < CURRENT_VERSION && self.migrations.contains_key(&version)
    }

    /// Upgrade `document`, declared as `from`, into a current config.
    pub fn migrate(
        &self,
        document: Document,
        from: Version,
    ) -> Result<Config, ConfigError> {
        if from >= CURRENT_VERSION {
            return Err(ConfigError::IncompatibleVersion(from));
        }
        let Some(migration) = self.migrations.get(&from) else {
            return Err(ConfigError::IncompatibleVersion(from));
        };

        let mut migrated = migration(document)?;
        migrated.insert(String::from("version"), CURRENT_VERSION.to_value());

        let config = serde_json::from_value(Value::Object(migrated))
            .map_err(|err| {
                log::warn!("migrated config from {from} does not decode: {err}");
                ConfigError::CannotDecodeConfig
            })?;
        log::info!("migrated config from {from} to {CURRENT_VERSION}");

        Ok(config)
    }
}

use serde_json::{Map, Value};

use crate::config::Config;
use crate::errors::ConfigError;
use crate::manager::CURRENT_VERSION;
use crate::migration::{Document, MigrationRegistry};
use crate::preset::Preset;
use crate::version::Version;

const VERSION_KEY: &str = "version";
const PRESETS_KEY: &str = "presets";
const PINNED_KEY: &str = "pinnedPresetIds";

/// Converts config documents to and from their persisted JSON form.
///
/// Decoding is two-phase: a strict typed parse first, then a generic JSON
/// tree whose `version` field decides between stamping the current version
/// (unversioned legacy files) and running a registered migration.
#[derive(Debug, Clone)]
pub struct ConfigCodec {
    registry: MigrationRegistry,
}

impl Default for ConfigCodec {
    fn default() -> Self {
        Self::new(MigrationRegistry::builtin())
    }
}

impl ConfigCodec {
    pub fn new(registry: MigrationRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &MigrationRegistry {
        &self.registry
    }

    /// Pretty-printed, deterministic encoding.
    pub fn encode(&self, config: &Config) -> Result<Vec<u8>, ConfigError> {
        Ok(serde_json::to_vec_pretty(config)?)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Config, ConfigError> {
        match serde_json::from_slice::<Config>(bytes) {
            Ok(config) if config.version >= CURRENT_VERSION => {
                return Ok(config);
            },
            Ok(config) => {
                log::warn!(
                    "config version {} is older than {CURRENT_VERSION}",
                    config.version
                );
            },
            Err(err) => {
                log::debug!("strict config decode failed: {err}");
            },
        }

        let document = match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => map,
            Ok(Value::Array(presets)) => {
                log::warn!("legacy preset list found, upgrading to config");
                legacy_preset_list(presets)
            },
            Ok(_) => return Err(ConfigError::CannotDecodeConfig),
            Err(err) => {
                log::warn!("config is not valid JSON: {err}");
                return Err(ConfigError::CannotDecodeConfig);
            },
        };

        self.decode_document(document)
    }

    fn decode_document(
        &self,
        mut document: Document,
    ) -> Result<Config, ConfigError> {
        let declared = document.get(VERSION_KEY).map(Version::from_value);

        match declared {
            None | Some(Err(_)) => {
                log::warn!(
                    "no version number found, enforcing {CURRENT_VERSION}"
                );
                document.insert(
                    String::from(VERSION_KEY),
                    CURRENT_VERSION.to_value(),
                );
                document
                    .entry(PINNED_KEY)
                    .or_insert_with(|| Value::Array(Vec::new()));
                decode_current(document)
            },
            Some(Ok(version)) if version < CURRENT_VERSION => {
                log::warn!("config version {version} is outdated, migrating");
                self.registry.migrate(document, version)
            },
            Some(Ok(version)) => {
                log::warn!("config declares {version} but does not decode");
                Err(ConfigError::CannotDecodeConfig)
            },
        }
    }
}

/// Encode a single preset as a shareable artifact.
pub fn encode_preset(preset: &Preset) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(preset)
}

pub fn decode_preset(bytes: &[u8]) -> Result<Preset, serde_json::Error> {
    serde_json::from_slice(bytes)
}

fn decode_current(document: Document) -> Result<Config, ConfigError> {
    serde_json::from_value(Value::Object(document)).map_err(|err| {
        log::warn!("config does not match the current schema: {err}");
        ConfigError::CannotDecodeConfig
    })
}

fn legacy_preset_list(presets: Vec<Value>) -> Document {
    let mut document = Map::new();
    document.insert(String::from(PRESETS_KEY), Value::Array(presets));
    document
}

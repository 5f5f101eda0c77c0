use std::fmt;

use crate::codec::ConfigCodec;
use crate::config::Config;
use crate::errors::ConfigError;
use crate::storage::ConfigStorage;
use crate::version::Version;

/// Schema version written by this build and used as the decode baseline.
pub const CURRENT_VERSION: Version = Version::new(0, 1, 0);

/// Single entry and exit point for durable config reads and writes.
pub struct ConfigManager {
    storage: Box<dyn ConfigStorage>,
    codec: ConfigCodec,
}

impl fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigManager")
            .field("storage", &self.storage.describe())
            .field("codec", &self.codec)
            .finish()
    }
}

impl ConfigManager {
    pub fn new(storage: impl ConfigStorage + 'static) -> Self {
        Self::with_codec(storage, ConfigCodec::default())
    }

    pub fn with_codec(
        storage: impl ConfigStorage + 'static,
        codec: ConfigCodec,
    ) -> Self {
        Self {
            storage: Box::new(storage),
            codec,
        }
    }

    pub fn codec(&self) -> &ConfigCodec {
        &self.codec
    }

    pub fn location(&self) -> String {
        self.storage.describe()
    }

    /// Read and decode the stored document. `Ok(None)` means nothing has
    /// been stored yet.
    pub fn load(&self) -> Result<Option<Config>, ConfigError> {
        let Some(data) = self.storage.read()? else {
            return Ok(None);
        };

        let config = self.codec.decode(&data)?;
        log::info!(
            "loaded config with {} preset(s) from {}",
            config.presets.len(),
            self.storage.describe()
        );
        Ok(Some(config))
    }

    /// Encode and write, reporting failures to the caller.
    pub fn try_save(&self, config: &Config) -> Result<(), ConfigError> {
        let payload = self.codec.encode(config)?;
        self.storage.write(&payload)?;
        Ok(())
    }

    /// Encode and write; failures are logged and absorbed so that autosave
    /// never interrupts the caller.
    pub fn save(&self, config: &Config) {
        match self.try_save(config) {
            Ok(()) => log::debug!("saved config to {}", self.storage.describe()),
            Err(err) => log::error!(
                "failed to save config to {}: {err}",
                self.storage.describe()
            ),
        }
    }
}

use std::io;

use thiserror::Error;
use uuid::Uuid;

use crate::version::Version;

/// Errors emitted while decoding, migrating or persisting a config document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed version: {0:?}")]
    MalformedVersion(String),

    #[error("failed to decode config file")]
    CannotDecodeConfig,

    #[error("config version {0} is incompatible with this build")]
    IncompatibleVersion(Version),

    #[error("config I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Text that names neither a built-in color nor a valid hex color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown color {0:?}")]
pub struct ColorParseError(pub String);

/// Errors returned by preset store operations that the caller should present.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("the default preset cannot be deleted")]
    CannotDeleteDefaultPreset,

    #[error("the default preset cannot be renamed")]
    DefaultPresetName,

    #[error("preset {0} not found")]
    PresetNotFound(Uuid),

    #[error("preset {0} is locked")]
    PresetLocked(Uuid),

    #[error("preset name cannot be empty")]
    EmptyName,

    #[error("index {index} is out of range for {len} preset(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("failed to import preset: {0}")]
    ImportFailed(#[source] serde_json::Error),

    #[error("failed to export preset: {0}")]
    ExportFailed(#[source] serde_json::Error),

    #[error("preset I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

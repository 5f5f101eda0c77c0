//! Preset storage for Fluid Gradient Composer.
//!
//! The crate owns the persisted configuration document: its versioned JSON
//! codec, schema migrations, atomic durable storage and the in-memory
//! [`PresetStore`] that front-ends call into.

mod codec;
mod color;
mod config;
mod errors;
mod manager;
mod migration;
mod preset;
mod storage;
mod store;
mod version;

pub use crate::codec::{ConfigCodec, decode_preset, encode_preset};
pub use crate::color::{BUILTIN_COLORS, Color, HexColor};
pub use crate::config::Config;
pub use crate::errors::{ColorParseError, ConfigError, StoreError};
pub use crate::manager::{CURRENT_VERSION, ConfigManager};
pub use crate::migration::{Document, MigrationFn, MigrationRegistry};
pub use crate::preset::{
    DEFAULT_PRESET_ID, DEFAULT_PRESET_NAME, DEFAULT_SPEED, MAX_SPEED,
    MIN_SPEED, Preset, PresetEdit, RANDOM_COLOR_COUNT, clamp_speed,
    default_colors,
};
pub use crate::storage::{
    ConfigStorage, FileStorage, MemoryStorage, default_config_path,
};
pub use crate::store::{
    CONFIG_FILE_EXTENSION, PRESET_FILE_EXTENSION, PresetStore,
};
pub use crate::version::Version;

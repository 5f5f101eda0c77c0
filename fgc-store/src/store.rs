use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::codec::{decode_preset, encode_preset};
use crate::config::Config;
use crate::errors::{ConfigError, StoreError};
use crate::manager::ConfigManager;
use crate::preset::{
    DEFAULT_PRESET_ID, DEFAULT_SPEED, Preset, PresetEdit, RANDOM_COLOR_COUNT,
    clamp_speed,
};
use crate::storage::write_atomic;

/// Extension of files produced by [`PresetStore::export_preset_to`].
pub const PRESET_FILE_EXTENSION: &str = "fgcpreset";

/// Extension of whole-configuration exports.
pub const CONFIG_FILE_EXTENSION: &str = "fgcconfig";

/// Authoritative in-memory preset collection.
///
/// Every mutation is followed by an autosave through the [`ConfigManager`]
/// unless it runs inside [`PresetStore::batch`]. Autosave failures are
/// logged and never reach the caller.
#[derive(Debug)]
pub struct PresetStore {
    presets: Vec<Preset>,
    pinned_preset_ids: BTreeSet<Uuid>,
    manager: ConfigManager,
    rng: fastrand::Rng,
    batch_depth: usize,
}

impl PresetStore {
    /// Load from the manager's storage, falling back to the default preset
    /// when nothing is stored or the stored document is unusable.
    pub fn load(manager: ConfigManager) -> Self {
        Self::load_with_rng(manager, fastrand::Rng::new())
    }

    pub fn load_with_rng(manager: ConfigManager, rng: fastrand::Rng) -> Self {
        let mut store = Self {
            presets: Vec::new(),
            pinned_preset_ids: BTreeSet::new(),
            manager,
            rng,
            batch_depth: 0,
        };

        match store.manager.load() {
            Ok(Some(config)) => store.adopt(config),
            Ok(None) => {
                log::info!(
                    "no config at {}, starting with default preset",
                    store.manager.location()
                );
                store.adopt(Config::default());
            },
            Err(err) => {
                log::warn!(
                    "config load from {} failed, using defaults: {err}",
                    store.manager.location()
                );
                store.adopt(Config::default());
            },
        }

        store
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn preset(&self, id: Uuid) -> Option<&Preset> {
        self.presets.iter().find(|preset| preset.id == id)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.presets.iter().position(|preset| preset.id == id)
    }

    pub fn pinned_preset_ids(&self) -> &BTreeSet<Uuid> {
        &self.pinned_preset_ids
    }

    pub fn locked_preset_ids(&self) -> BTreeSet<Uuid> {
        self.presets
            .iter()
            .filter(|preset| preset.locked)
            .map(|preset| preset.id)
            .collect()
    }

    pub fn is_pinned(&self, id: Uuid) -> bool {
        self.pinned_preset_ids.contains(&id)
    }

    pub fn is_locked(&self, id: Uuid) -> bool {
        self.preset(id).is_some_and(|preset| preset.locked)
    }

    /// Pinned presets in collection order.
    pub fn pinned_presets(&self) -> Vec<&Preset> {
        self.presets
            .iter()
            .filter(|preset| self.is_pinned(preset.id))
            .collect()
    }

    pub fn unpinned_presets(&self) -> Vec<&Preset> {
        self.presets
            .iter()
            .filter(|preset| !self.is_pinned(preset.id))
            .collect()
    }

    pub fn manager(&self) -> &ConfigManager {
        &self.manager
    }

    /// Current state as a persistable document.
    pub fn snapshot(&self) -> Config {
        Config::new(self.presets.clone(), self.pinned_preset_ids.clone())
    }

    /// Run `action` with autosave suppressed, then save exactly once.
    ///
    /// The trailing save happens whatever `action` returns, and also when it
    /// unwinds. Nested batches only save when the outermost one finishes.
    pub fn batch<R>(&mut self, action: impl FnOnce(&mut Self) -> R) -> R {
        self.batch_depth += 1;
        let mut scope = BatchScope { store: self };
        action(&mut *scope.store)
    }

    /// Append a preset with random colors, suffixing `" (n)"` to the name
    /// until it is unique.
    pub fn create_preset(&mut self, name: &str) -> Result<Uuid, StoreError> {
        let base = name.trim();
        if base.is_empty() {
            return Err(StoreError::EmptyName);
        }

        let name = self.unique_name(base);
        let mut preset =
            Preset::new(name, Vec::new(), Vec::new(), DEFAULT_SPEED);
        preset.randomize_colors(&mut self.rng, RANDOM_COLOR_COUNT);
        let id = preset.id;

        log::info!("added preset {:?}", preset.name);
        self.presets.push(preset);
        self.autosave();

        Ok(id)
    }

    pub fn delete_preset(&mut self, id: Uuid) -> Result<(), StoreError> {
        if id == DEFAULT_PRESET_ID {
            return Err(StoreError::CannotDeleteDefaultPreset);
        }

        let before = self.presets.len();
        self.presets.retain(|preset| preset.id != id);
        if self.presets.len() != before {
            log::info!("deleted preset {id}");
            self.autosave();
        }

        Ok(())
    }

    /// Delete every preset at `indices`. Nothing is removed if any index is
    /// out of range or targets the default preset.
    pub fn delete_presets(
        &mut self,
        indices: &[usize],
    ) -> Result<(), StoreError> {
        let targets = self.checked_indices(indices)?;
        if targets
            .iter()
            .any(|&index| self.presets[index].id == DEFAULT_PRESET_ID)
        {
            return Err(StoreError::CannotDeleteDefaultPreset);
        }
        if targets.is_empty() {
            return Ok(());
        }

        for &index in targets.iter().rev() {
            self.presets.remove(index);
        }
        log::info!("deleted {} preset(s)", targets.len());
        self.autosave();

        Ok(())
    }

    /// Move the presets at `indices` so they sit before the element that
    /// was at `destination`, keeping their relative order.
    pub fn move_presets(
        &mut self,
        indices: &[usize],
        destination: usize,
    ) -> Result<(), StoreError> {
        let len = self.presets.len();
        if destination > len {
            return Err(StoreError::IndexOutOfRange {
                index: destination,
                len,
            });
        }
        let moving = self.checked_indices(indices)?;
        if moving.is_empty() {
            return Ok(());
        }

        let insert_at = destination - moving.range(..destination).count();
        let mut moved = Vec::with_capacity(moving.len());
        let mut rest = Vec::with_capacity(len - moving.len());
        for (index, preset) in self.presets.drain(..).enumerate() {
            if moving.contains(&index) {
                moved.push(preset);
            } else {
                rest.push(preset);
            }
        }
        rest.splice(insert_at..insert_at, moved);
        self.presets = rest;

        log::info!("moved presets at {moving:?} to index {destination}");
        self.autosave();

        Ok(())
    }

    pub fn pin(&mut self, id: Uuid) {
        if self.preset(id).is_none() {
            log::warn!("cannot pin unknown preset {id}");
            return;
        }
        if self.pinned_preset_ids.insert(id) {
            self.autosave();
        }
    }

    /// Unpinning also clears ids whose preset no longer exists.
    pub fn unpin(&mut self, id: Uuid) {
        if self.pinned_preset_ids.remove(&id) {
            self.autosave();
        } else if self.preset(id).is_none() {
            log::warn!("cannot unpin unknown preset {id}");
        }
    }

    pub fn lock(&mut self, id: Uuid) {
        self.set_locked(id, true);
    }

    pub fn unlock(&mut self, id: Uuid) {
        self.set_locked(id, false);
    }

    /// Apply editor changes to an unlocked preset.
    pub fn update_preset(
        &mut self,
        id: Uuid,
        edit: PresetEdit,
    ) -> Result<(), StoreError> {
        let preset = self.editable_preset(id)?;

        if let Some(name) = &edit.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(StoreError::EmptyName);
            }
            if preset.is_default() && name != preset.name {
                return Err(StoreError::DefaultPresetName);
            }
        }

        if let Some(name) = edit.name {
            preset.name = name.trim().to_string();
        }
        if let Some(colors) = edit.colors {
            preset.colors = colors;
        }
        if let Some(highlights) = edit.highlights {
            preset.highlights = highlights;
        }
        if let Some(speed) = edit.speed {
            preset.speed = clamp_speed(speed);
        }

        self.autosave();
        Ok(())
    }

    /// Replace colors and highlights with `count` uniform built-in draws.
    pub fn randomize_colors(
        &mut self,
        id: Uuid,
        count: usize,
    ) -> Result<(), StoreError> {
        let Some(preset) = self.presets.iter_mut().find(|p| p.id == id) else {
            return Err(StoreError::PresetNotFound(id));
        };
        if preset.locked {
            return Err(StoreError::PresetLocked(id));
        }

        preset.randomize_colors(&mut self.rng, count);
        self.autosave();

        Ok(())
    }

    /// Add a preset from exported bytes. The imported preset always gets a
    /// fresh id; the name is made unique like in [`Self::create_preset`].
    pub fn import_preset(&mut self, data: &[u8]) -> Result<Uuid, StoreError> {
        let mut preset = decode_preset(data).map_err(StoreError::ImportFailed)?;

        let base = preset.name.trim().to_string();
        if base.is_empty() {
            return Err(StoreError::EmptyName);
        }

        let embedded = preset.id;
        let mut id = Uuid::new_v4();
        while id == embedded || self.preset(id).is_some() {
            id = Uuid::new_v4();
        }

        preset.id = id;
        preset.name = self.unique_name(&base);
        preset.speed = clamp_speed(preset.speed);

        log::info!("imported preset {:?} as {id}", preset.name);
        self.presets.push(preset);
        self.autosave();

        Ok(id)
    }

    pub fn import_preset_from(
        &mut self,
        path: &Path,
    ) -> Result<Uuid, StoreError> {
        let data = fs::read(path)?;
        self.import_preset(&data)
    }

    /// Serialize a single preset as a shareable artifact.
    pub fn export_preset(&self, preset: &Preset) -> Result<Vec<u8>, StoreError> {
        encode_preset(preset).map_err(StoreError::ExportFailed)
    }

    /// Write the preset with `id` to `<dir>/<name>.fgcpreset`.
    pub fn export_preset_to(
        &self,
        id: Uuid,
        dir: &Path,
    ) -> Result<PathBuf, StoreError> {
        let preset = self.preset(id).ok_or(StoreError::PresetNotFound(id))?;
        let payload = self.export_preset(preset)?;

        fs::create_dir_all(dir)?;
        let path = dir.join(format!(
            "{}.{PRESET_FILE_EXTENSION}",
            file_stem(&preset.name)
        ));
        write_atomic(&path, &payload)?;

        log::info!("exported preset {:?} to {}", preset.name, path.display());
        Ok(path)
    }

    /// The current document as shareable bytes.
    pub fn export_config(&self) -> Result<Vec<u8>, StoreError> {
        Ok(self.manager.codec().encode(&self.snapshot())?)
    }

    /// Replace the whole collection: write `config` to storage, then reload
    /// from storage so the regular decode and migration path runs.
    ///
    /// When the written document does not load back, the previous state is
    /// written again and the load error is returned.
    pub fn apply_config(&mut self, config: &Config) -> Result<(), StoreError> {
        self.manager.try_save(config)?;

        let reloaded = self
            .manager
            .load()
            .and_then(|loaded| loaded.ok_or(ConfigError::CannotDecodeConfig));
        let loaded = match reloaded {
            Ok(loaded) => loaded,
            Err(err) => {
                log::warn!(
                    "applied config does not load back, restoring {}: {err}",
                    self.manager.location()
                );
                self.save_now();
                return Err(err.into());
            },
        };
        self.adopt(loaded);

        log::info!(
            "applied config with {} preset(s) to {}",
            self.presets.len(),
            self.manager.location()
        );
        Ok(())
    }

    /// Decode `data` (legacy shapes included) and apply it.
    pub fn apply_config_bytes(
        &mut self,
        data: &[u8],
    ) -> Result<(), StoreError> {
        let config = self.manager.codec().decode(data)?;
        self.apply_config(&config)
    }

    fn adopt(&mut self, config: Config) {
        let dangling = config.dangling_ids();
        if !dangling.is_empty() {
            log::debug!(
                "config references {} unknown preset id(s)",
                dangling.len()
            );
        }

        let Config {
            mut presets,
            pinned_preset_ids,
            locked_preset_ids,
            ..
        } = config;

        for preset in &mut presets {
            if locked_preset_ids.contains(&preset.id) {
                preset.locked = true;
            }
        }
        if presets.is_empty() {
            log::warn!("config has no presets, seeding default preset");
            presets.push(Preset::default_preset());
        }

        self.presets = presets;
        self.pinned_preset_ids = pinned_preset_ids;
    }

    fn set_locked(&mut self, id: Uuid, locked: bool) {
        let Some(preset) = self.presets.iter_mut().find(|p| p.id == id) else {
            log::warn!("cannot change lock of unknown preset {id}");
            return;
        };
        if preset.locked == locked {
            return;
        }

        if locked {
            preset.lock();
        } else {
            preset.unlock();
        }
        self.autosave();
    }

    fn editable_preset(&mut self, id: Uuid) -> Result<&mut Preset, StoreError> {
        let preset = self
            .presets
            .iter_mut()
            .find(|preset| preset.id == id)
            .ok_or(StoreError::PresetNotFound(id))?;
        if preset.locked {
            return Err(StoreError::PresetLocked(id));
        }
        Ok(preset)
    }

    fn checked_indices(
        &self,
        indices: &[usize],
    ) -> Result<BTreeSet<usize>, StoreError> {
        let len = self.presets.len();
        if let Some(&index) = indices.iter().find(|&&index| index >= len) {
            return Err(StoreError::IndexOutOfRange { index, len });
        }
        Ok(indices.iter().copied().collect())
    }

    fn unique_name(&self, base: &str) -> String {
        let taken = |name: &str| self.presets.iter().any(|p| p.name == name);

        let mut name = base.to_string();
        let mut counter = 1;
        while taken(&name) {
            name = format!("{base} ({counter})");
            counter += 1;
        }
        name
    }

    fn autosave(&mut self) {
        if self.batch_depth > 0 {
            return;
        }
        self.save_now();
    }

    fn save_now(&self) {
        self.manager.save(&self.snapshot());
    }
}

struct BatchScope<'a> {
    store: &'a mut PresetStore,
}

impl Drop for BatchScope<'_> {
    fn drop(&mut self) {
        self.store.batch_depth -= 1;
        if self.store.batch_depth == 0 {
            self.store.save_now();
        }
    }
}

fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            other => other,
        })
        .collect();
    let stem = stem.trim().trim_start_matches('.');

    if stem.is_empty() {
        String::from("preset")
    } else {
        stem.to_string()
    }
}

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::manager::CURRENT_VERSION;
use crate::preset::Preset;
use crate::version::Version;

/// Root payload persisted to disk.
///
/// Id sets are ordered so that encoding the same document twice yields the
/// same bytes. Ids that no longer match a preset are kept and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub version: Version,
    pub presets: Vec<Preset>,
    pub pinned_preset_ids: BTreeSet<Uuid>,
    /// Mirror of the per-preset `locked` flags, kept for older readers.
    #[serde(default)]
    pub locked_preset_ids: BTreeSet<Uuid>,
}

impl Config {
    /// Build a current-version document, deriving the locked id set from
    /// the presets themselves.
    pub fn new(presets: Vec<Preset>, pinned_preset_ids: BTreeSet<Uuid>) -> Self {
        let locked_preset_ids = presets
            .iter()
            .filter(|preset| preset.locked)
            .map(|preset| preset.id)
            .collect();

        Self {
            version: CURRENT_VERSION,
            presets,
            pinned_preset_ids,
            locked_preset_ids,
        }
    }

    pub fn preset(&self, id: Uuid) -> Option<&Preset> {
        self.presets.iter().find(|preset| preset.id == id)
    }

    /// Ids in either set that reference no preset.
    pub fn dangling_ids(&self) -> BTreeSet<Uuid> {
        self.pinned_preset_ids
            .iter()
            .chain(self.locked_preset_ids.iter())
            .filter(|id| self.preset(**id).is_none())
            .copied()
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(vec![Preset::default_preset()], BTreeSet::new())
    }
}

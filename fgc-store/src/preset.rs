use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Color;

/// Reserved identifier of the non-deletable seed preset.
pub const DEFAULT_PRESET_ID: Uuid =
    Uuid::from_u128(0x9A2F1A9E_4579_4B79_A99E_6477FF635A09);

pub const DEFAULT_PRESET_NAME: &str = "Default";

pub const MIN_SPEED: f64 = 0.0;
pub const MAX_SPEED: f64 = 5.0;
pub const DEFAULT_SPEED: f64 = 1.0;

/// Number of blobs drawn when colors are randomized.
pub const RANDOM_COLOR_COUNT: usize = 5;

/// Named gradient configuration persisted in the config document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: Uuid,
    pub name: String,
    pub colors: Vec<Color>,
    pub highlights: Vec<Color>,
    pub speed: f64,
    #[serde(default)]
    pub locked: bool,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        colors: Vec<Color>,
        highlights: Vec<Color>,
        speed: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            colors,
            highlights,
            speed,
            locked: false,
        }
    }

    /// The seed preset every fresh store starts with.
    pub fn default_preset() -> Self {
        Self {
            id: DEFAULT_PRESET_ID,
            name: String::from(DEFAULT_PRESET_NAME),
            colors: default_colors(),
            highlights: default_colors(),
            speed: DEFAULT_SPEED,
            locked: false,
        }
    }

    /// Empty preset used as an editor starting point.
    pub fn blank() -> Self {
        Self::new(String::new(), Vec::new(), Vec::new(), DEFAULT_SPEED)
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_PRESET_ID
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Replace colors and highlights with `count` uniform built-in draws each.
    pub fn randomize_colors(&mut self, rng: &mut fastrand::Rng, count: usize) {
        self.colors = Color::random_builtins(rng, count);
        self.highlights = Color::random_builtins(rng, count);
    }
}

pub fn default_colors() -> Vec<Color> {
    vec![
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Orange,
        Color::Red,
    ]
}

/// Clamp a speed to the supported `[0, 5]` domain. NaN maps to the default.
pub fn clamp_speed(speed: f64) -> f64 {
    if speed.is_nan() {
        return DEFAULT_SPEED;
    }
    speed.clamp(MIN_SPEED, MAX_SPEED)
}

/// Field changes requested by an editor. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetEdit {
    pub name: Option<String>,
    pub colors: Option<Vec<Color>>,
    pub highlights: Option<Vec<Color>>,
    pub speed: Option<f64>,
}

impl PresetEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.colors.is_none()
            && self.highlights.is_none()
            && self.speed.is_none()
    }
}

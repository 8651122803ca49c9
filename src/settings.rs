//! Player settings and preferences
//!
//! Persisted separately from the high score, as one JSON value.

use serde::{Deserialize, Serialize};

use crate::persistence::Store;
use crate::tuning::Tuning;

/// Which rule set a match runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RulePreset {
    /// Trash costs a life, three lives
    #[default]
    Lives,
    /// Legacy: the third trash ends the match
    Classic,
}

impl RulePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            RulePreset::Lives => "Lives",
            RulePreset::Classic => "Classic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lives" => Some(RulePreset::Lives),
            "classic" | "legacy" => Some(RulePreset::Classic),
            _ => None,
        }
    }

    /// Balance for this preset
    pub fn tuning(&self) -> Tuning {
        match self {
            RulePreset::Lives => Tuning::default(),
            RulePreset::Classic => Tuning::classic(),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rule set for new matches
    pub rules: RulePreset,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === HUD ===
    /// Show catch/miss feedback text
    pub show_feedback: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rules: RulePreset::Lives,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            show_feedback: true,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "shadow_fishing_settings";

    /// Load from `store`, falling back to defaults
    pub fn load(store: &impl Store) -> Self {
        match store.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Discarding malformed settings: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unavailable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Save to `store`
    pub fn save(&self, store: &mut impl Store) {
        let result = serde_json::to_string(self)
            .map_err(crate::persistence::Error::from)
            .and_then(|json| store.set_item(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}

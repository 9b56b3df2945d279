//! Game configuration and data directory resolution

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bank::DEFAULT_BANK_ID;

/// User-facing game options
///
/// Stored values are merged over the defaults field by field, so a saved
/// configuration from an older version still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Identifier of the active word bank
    pub current_bank: String,

    /// Seconds to wait before advancing to the next word
    pub auto_delay: f64,

    /// Play sound effects
    pub sound_effects: bool,

    /// Show hints while answering
    pub show_hints: bool,

    /// Adjust per-word difficulty from accuracy
    pub difficulty_adjust: bool,

    /// Pick words at random instead of in bank order
    pub random_selection: bool,

    /// Options this version does not know about, kept as-is
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            current_bank: DEFAULT_BANK_ID.to_string(),
            auto_delay: 1.5,
            sound_effects: true,
            show_hints: true,
            difficulty_adjust: true,
            random_selection: true,
            extra: BTreeMap::new(),
        }
    }
}

/// A partial configuration update; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigPatch {
    pub current_bank: Option<String>,
    pub auto_delay: Option<f64>,
    pub sound_effects: Option<bool>,
    pub show_hints: Option<bool>,
    pub difficulty_adjust: Option<bool>,
    pub random_selection: Option<bool>,
}

impl ConfigPatch {
    /// Whether applying this patch would change nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl GameConfig {
    /// Merge the set fields of `patch` into this configuration
    pub fn apply(&mut self, patch: ConfigPatch) {
        if let Some(bank) = patch.current_bank {
            self.current_bank = bank;
        }
        if let Some(delay) = patch.auto_delay {
            self.auto_delay = delay;
        }
        if let Some(sound) = patch.sound_effects {
            self.sound_effects = sound;
        }
        if let Some(hints) = patch.show_hints {
            self.show_hints = hints;
        }
        if let Some(adjust) = patch.difficulty_adjust {
            self.difficulty_adjust = adjust;
        }
        if let Some(random) = patch.random_selection {
            self.random_selection = random;
        }
    }

    /// Get the default data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "wordgame")
            .context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_main_bank() {
        let config = GameConfig::default();
        assert_eq!(config.current_bank, "words.txt");
        assert_eq!(config.auto_delay, 1.5);
        assert!(config.sound_effects);
        assert!(config.show_hints);
        assert!(config.difficulty_adjust);
        assert!(config.random_selection);
    }

    #[test]
    fn config_serializes_camel_case() {
        let json = serde_json::to_string(&GameConfig::default()).unwrap();
        assert!(json.contains(r#""currentBank":"words.txt""#));
        assert!(json.contains(r#""autoDelay":1.5"#));
        assert!(json.contains(r#""difficultyAdjust":true"#));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let json = r#"{"currentBank":"words_exam.txt","soundEffects":false}"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.current_bank, "words_exam.txt");
        assert!(!config.sound_effects);
        assert_eq!(config.auto_delay, 1.5);
        assert!(config.show_hints);
    }

    #[test]
    fn unknown_options_survive_roundtrip() {
        let json = r#"{"currentBank":"all","theme":"dark"}"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.extra.get("theme"), Some(&Value::from("dark")));

        let back = serde_json::to_string(&config).unwrap();
        assert!(back.contains(r#""theme":"dark""#));
    }

    #[test]
    fn apply_merges_only_set_fields() {
        let mut config = GameConfig::default();
        config.apply(ConfigPatch {
            auto_delay: Some(3.0),
            show_hints: Some(false),
            ..Default::default()
        });

        assert_eq!(config.auto_delay, 3.0);
        assert!(!config.show_hints);
        assert_eq!(config.current_bank, "words.txt");
        assert!(config.sound_effects);
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(ConfigPatch::default().is_empty());
        assert!(!ConfigPatch { random_selection: Some(false), ..Default::default() }.is_empty());
    }
}

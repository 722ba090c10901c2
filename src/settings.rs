//! Game settings and preferences
//!
//! Loaded from JSON. Every field has a default, so partial files work and a
//! missing or broken file falls back to defaults with a warning.

use serde::{Deserialize, Serialize};

use crate::sim::{CharacterKind, GameState};
use crate::tuning::Tuning;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 3] = [Self::Low, Self::Medium, Self::High];

    /// Display name, also accepted by `from_str`
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Case-insensitive lookup by display name ("med" also works)
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("med") {
            return Some(QualityPreset::Medium);
        }
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(s))
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Camera shake on hits and eliminations
    pub screen_shake: bool,
    /// Hit sparks, special bursts, elimination bursts
    pub particles: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,

    // === Balance ===
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            screen_shake: true,
            particles: true,
            reduced_motion: false,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Build a menu-phase match configured by these settings
    pub fn new_match(&self, seed: u64, roster: [CharacterKind; 2]) -> GameState {
        let mut state = GameState::new(seed, roster, self.tuning.clone());
        state.max_particles = self.max_particles();
        state
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parsing() {
        assert_eq!(QualityPreset::from_str("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::from_str(" low "), Some(QualityPreset::Low));
        for preset in QualityPreset::ALL {
            assert_eq!(QualityPreset::from_str(preset.as_str()), Some(preset));
        }
    }

    #[test]
    fn test_particle_budget() {
        let mut settings = Settings::from_preset(QualityPreset::Low);
        assert_eq!(settings.max_particles(), 100);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let mut settings = Settings::default();
        assert!(settings.effective_screen_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            Settings::from_json(r#"{"quality":"High","tuning":{"combat":{"base_damage":12.0}}}"#)
                .unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(settings.particles);
        assert_eq!(settings.tuning.combat.base_damage, 12.0);
        assert_eq!(settings.tuning.physics.gravity, 800.0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{quality:").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::from_preset(QualityPreset::High);
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "brawl-arena-settings-{}.json",
            std::process::id()
        ));
        let mut settings = Settings::from_preset(QualityPreset::Low);
        settings.reduced_motion = true;
        settings.tuning.ai.block_chance = 0.9;

        settings.save(&path).unwrap();
        let loaded = Settings::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_malformed_file_falls_back() {
        let path = std::env::temp_dir().join(format!(
            "brawl-arena-broken-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{quality:").unwrap();
        let loaded = Settings::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load(std::path::Path::new("/nonexistent/brawl-arena.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_new_match_applies_budget_and_tuning() {
        let mut settings = Settings::from_preset(QualityPreset::Low);
        settings.tuning.combat.base_damage = 5.0;
        let state = settings.new_match(7, [CharacterKind::Hero, CharacterKind::Brute]);
        assert_eq!(state.max_particles, 100);
        assert_eq!(state.tuning.combat.base_damage, 5.0);
    }
}

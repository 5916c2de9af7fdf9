//! Game settings and preferences
//!
//! Persisted as JSON next to the high-score file. The sim reads these once
//! at construction; nothing here changes mid-run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Sim-facing preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Lives at the start of a run
    pub starting_lives: u32,
    /// Particle pool cap (oldest evicted beyond this)
    pub max_particles: usize,
    /// Fixed seed for reproducible runs; None draws from the clock
    pub fixed_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            starting_lives: crate::consts::STARTING_LIVES,
            max_particles: crate::consts::MAX_PARTICLES,
            fixed_seed: None,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("malformed settings file {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no settings file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged, never propagated
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("failed to save settings: {e}");
                } else {
                    log::info!("settings saved");
                }
            }
            Err(e) => log::warn!("failed to serialize settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.starting_lives, 3);
        assert_eq!(s.max_particles, 256);
        assert!(s.fixed_seed.is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let s = Settings {
            starting_lives: 5,
            max_particles: 128,
            fixed_seed: Some(42),
        };
        let json = serde_json::to_string(&s).expect("serialize");
        let back: Settings = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.starting_lives, 5);
        assert_eq!(back.max_particles, 128);
        assert_eq!(back.fixed_seed, Some(42));
    }
}

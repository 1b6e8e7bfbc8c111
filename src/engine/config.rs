//! Engine Configuration
//!
//! Tunables that are settings rather than contracts: weather densities
//! and smoothing, the particle cap, the rng seed. An optional RON file
//! overrides the defaults; a missing or malformed file falls back with a
//! logged message, never an error.

use serde::{Deserialize, Serialize};

use super::weather::WeatherTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weather: WeatherTuning,
    /// Default particle store cap.
    pub max_particles: usize,
    /// Seed for the frame rng (0 picks the built-in seed).
    pub rng_seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weather: WeatherTuning::default(),
            max_particles: 256,
            rng_seed: 0,
        }
    }
}

impl EngineConfig {
    /// Parse a RON settings document. Unlisted fields keep their defaults.
    pub fn from_ron(text: &str) -> Result<Self, String> {
        ron::from_str(text).map_err(|e| format!("engine config parse error: {}", e))
    }

    /// Load from a file, falling back to defaults when the file is
    /// absent or malformed (both are logged, neither is fatal).
    pub async fn load_or_default(path: &str) -> Self {
        match macroquad::file::load_string(path).await {
            Ok(text) => match Self::from_ron(&text) {
                Ok(config) => {
                    println!("Loaded engine config from {}", path);
                    config
                }
                Err(e) => {
                    println!("{}; using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                println!("No engine config at {}, using defaults", path);
                Self::default()
            }
        }
    }
}

//! Aggregated session configuration.

use quiz_defence_system_difficulty::Config as DifficultyConfig;
use quiz_defence_system_waves::Config as WaveConfig;
use quiz_defence_world::Rules;
use serde::Deserialize;

/// Everything needed to start a session.
///
/// Deserialises from partial documents: absent keys keep their defaults.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// World economy and scaling rules.
    pub rules: Rules,
    /// Spawn cadence and completion debounce.
    pub waves: WaveConfig,
    /// Quiz difficulty thresholds.
    pub difficulty: DifficultyConfig,
    /// Seed for the quiz problem generator.
    pub rng_seed: u64,
    /// Largest accepted speed multiplier.
    pub max_speed_multiplier: u32,
    /// Experience awarded for a correct quiz answer.
    pub quiz_experience: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            waves: WaveConfig::default(),
            difficulty: DifficultyConfig::default(),
            rng_seed: 0,
            max_speed_multiplier: 3,
            quiz_experience: 10,
        }
    }
}

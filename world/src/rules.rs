//! Tunable rules of a session.

use quiz_defence_core::WaveNumber;
use serde::Deserialize;

/// When the player is allowed to commit new towers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildWindow {
    /// Towers may be built whether or not a wave is running.
    Anytime,
    /// Towers may only be built while a wave is spawning or in combat.
    WaveActive,
}

/// Economy, reward, and enemy scaling parameters.
///
/// Every field has a default, so configuration files only need to name the
/// values they override.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Gold at session start.
    pub starting_gold: u32,
    /// Lives at session start.
    pub starting_lives: u32,
    /// Experience at session start.
    pub starting_experience: u32,
    /// Enemies in every wave before scaling.
    pub wave_enemy_base: u32,
    /// Additional enemies per wave number, truncated.
    pub wave_enemy_scale: f32,
    /// Enemy speed before scaling, in world units per tick.
    pub enemy_base_speed: f32,
    /// Additional enemy speed per wave number.
    pub enemy_speed_per_wave: f32,
    /// Enemy health before scaling.
    pub enemy_base_health: u32,
    /// Additional enemy health per wave number.
    pub enemy_health_per_wave: u32,
    /// Gold for a kill before the wave bonus.
    pub kill_gold_base: u32,
    /// Additional kill gold per wave number.
    pub kill_gold_per_wave: u32,
    /// Experience for a kill.
    pub kill_experience: u32,
    /// Gold credited when a wave completes.
    pub wave_completion_bonus: u32,
    /// Speed multiplier applied while an enemy is slowed.
    pub slow_factor: f32,
    /// Build window policy.
    pub build_window: BuildWindow,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_gold: 150,
            starting_lives: 20,
            starting_experience: 0,
            wave_enemy_base: 5,
            wave_enemy_scale: 1.5,
            enemy_base_speed: 1.5,
            enemy_speed_per_wave: 0.1,
            enemy_base_health: 40,
            enemy_health_per_wave: 30,
            kill_gold_base: 15,
            kill_gold_per_wave: 1,
            kill_experience: 5,
            wave_completion_bonus: 50,
            slow_factor: 0.5,
            build_window: BuildWindow::WaveActive,
        }
    }
}

impl Rules {
    /// Number of enemies queued for the provided wave.
    #[must_use]
    pub fn enemy_count(&self, wave: WaveNumber) -> u32 {
        let scaled = (wave.get() as f32 * self.wave_enemy_scale).max(0.0).floor() as u32;
        self.wave_enemy_base.saturating_add(scaled)
    }

    /// Base speed of enemies spawned in the provided wave.
    #[must_use]
    pub fn enemy_speed(&self, wave: WaveNumber) -> f32 {
        self.enemy_base_speed + wave.get() as f32 * self.enemy_speed_per_wave
    }

    /// Maximum health of enemies spawned in the provided wave.
    #[must_use]
    pub fn enemy_health(&self, wave: WaveNumber) -> u32 {
        self.enemy_base_health
            .saturating_add(wave.get().saturating_mul(self.enemy_health_per_wave))
    }

    /// Gold credited for a kill during the provided wave.
    #[must_use]
    pub fn kill_gold(&self, wave: WaveNumber) -> u32 {
        self.kill_gold_base
            .saturating_add(wave.get().saturating_mul(self.kill_gold_per_wave))
    }
}

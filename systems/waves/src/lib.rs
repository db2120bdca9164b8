#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave system responsible for releasing enemies on a tick
//! counted timer and confirming wave completion.

use quiz_defence_core::{Command, Event, WaveNumber, WaveStatus};
use serde::Deserialize;
use tracing::debug;

/// Configuration parameters required to construct the wave system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    spawn_interval_ticks: u32,
    first_spawn_delay_ticks: u32,
    completion_delay_ticks: u32,
}

impl Config {
    /// Creates a new configuration using the provided cadence and debounce.
    #[must_use]
    pub const fn new(
        spawn_interval_ticks: u32,
        first_spawn_delay_ticks: u32,
        completion_delay_ticks: u32,
    ) -> Self {
        Self {
            spawn_interval_ticks,
            first_spawn_delay_ticks,
            completion_delay_ticks,
        }
    }

    /// Ticks between two consecutive spawns.
    #[must_use]
    pub const fn spawn_interval_ticks(&self) -> u32 {
        self.spawn_interval_ticks
    }

    /// Consecutive resolved ticks required for completion; it is sent on the
    /// last of them.
    #[must_use]
    pub const fn completion_delay_ticks(&self) -> u32 {
        self.completion_delay_ticks
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(60, 0, 30)
    }
}

/// World state the wave system inspects every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveView {
    /// Wave currently recorded by the world.
    pub wave: WaveNumber,
    /// Current state of the world's wave ledger.
    pub status: WaveStatus,
    /// Enemies still walking with health left.
    pub live_enemies: usize,
    /// Lives the player has left.
    pub lives: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ActiveWave {
    wave: WaveNumber,
    pending: u32,
    spawn_timer: u32,
    completion_countdown: Option<u32>,
    completion_sent: bool,
}

/// Pure system that emits spawn and completion commands for the active wave.
#[derive(Debug)]
pub struct Waves {
    config: Config,
    active: Option<ActiveWave>,
}

impl Waves {
    /// Creates a new wave system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Enemies of the active wave that have not been released yet.
    #[must_use]
    pub fn pending_spawns(&self) -> u32 {
        self.active.map_or(0, |active| active.pending)
    }

    /// Consumes events and the wave view to emit wave commands.
    pub fn handle(&mut self, events: &[Event], view: WaveView, out: &mut Vec<Command>) {
        let mut ticks = 0_u32;
        for event in events {
            match *event {
                Event::WaveStarted { wave, enemy_count } => {
                    self.active = Some(ActiveWave {
                        wave,
                        pending: enemy_count,
                        spawn_timer: self.config.first_spawn_delay_ticks,
                        completion_countdown: None,
                        completion_sent: false,
                    });
                }
                Event::WaveCompleted { .. } | Event::GameOver { .. } | Event::WorldReset => {
                    self.active = None;
                }
                Event::TimeAdvanced { .. } => ticks = ticks.saturating_add(1),
                _ => {}
            }
        }

        for _ in 0..ticks {
            self.advance(view, out);
        }
    }

    fn advance(&mut self, view: WaveView, out: &mut Vec<Command>) {
        let Some(active) = self.active.as_mut() else {
            return;
        };

        if active.pending > 0 {
            active.spawn_timer = active.spawn_timer.saturating_sub(1);
            if active.spawn_timer == 0 {
                active.pending -= 1;
                active.spawn_timer = self.config.spawn_interval_ticks;
                out.push(Command::SpawnEnemy {
                    wave: active.wave,
                    remaining: active.pending,
                });
            }
            return;
        }

        let resolved = view.status == WaveStatus::Combat
            && view.wave == active.wave
            && view.live_enemies == 0
            && view.lives > 0;
        if !resolved {
            active.completion_countdown = None;
            return;
        }

        if active.completion_sent {
            return;
        }

        let countdown = active
            .completion_countdown
            .get_or_insert(self.config.completion_delay_ticks.saturating_sub(1));
        if *countdown == 0 {
            active.completion_sent = true;
            debug!(wave = active.wave.get(), "wave resolved");
            out.push(Command::CompleteWave { wave: active.wave });
        } else {
            *countdown -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(status: WaveStatus, live_enemies: usize) -> WaveView {
        WaveView {
            wave: WaveNumber::FIRST,
            status,
            live_enemies,
            lives: 20,
        }
    }

    fn tick(waves: &mut Waves, view: WaveView) -> Vec<Command> {
        let mut out = Vec::new();
        waves.handle(&[Event::TimeAdvanced { tick: 0 }], view, &mut out);
        out
    }

    fn started(waves: &mut Waves, enemy_count: u32) {
        let mut out = Vec::new();
        waves.handle(
            &[Event::WaveStarted {
                wave: WaveNumber::FIRST,
                enemy_count,
            }],
            view(WaveStatus::Spawning, 0),
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn first_spawn_is_immediate_then_interval_counted() {
        let mut waves = Waves::new(Config::new(3, 0, 0));
        started(&mut waves, 3);

        let mut spawn_ticks = Vec::new();
        for tick_index in 1..=10 {
            let commands = tick(&mut waves, view(WaveStatus::Spawning, 0));
            if !commands.is_empty() {
                spawn_ticks.push(tick_index);
            }
        }

        assert_eq!(spawn_ticks, vec![1, 4, 7]);
        assert_eq!(waves.pending_spawns(), 0);
    }

    #[test]
    fn remaining_counts_down_to_zero() {
        let mut waves = Waves::new(Config::new(1, 0, 0));
        started(&mut waves, 2);

        assert_eq!(
            tick(&mut waves, view(WaveStatus::Spawning, 0)),
            vec![Command::SpawnEnemy {
                wave: WaveNumber::FIRST,
                remaining: 1
            }]
        );
        assert_eq!(
            tick(&mut waves, view(WaveStatus::Spawning, 1)),
            vec![Command::SpawnEnemy {
                wave: WaveNumber::FIRST,
                remaining: 0
            }]
        );
    }

    #[test]
    fn completion_waits_for_debounce_and_fires_once() {
        let mut waves = Waves::new(Config::new(60, 0, 3));
        started(&mut waves, 0);

        let mut emitted = Vec::new();
        for _ in 0..10 {
            emitted.push(tick(&mut waves, view(WaveStatus::Combat, 0)));
        }

        let completions: Vec<usize> = emitted
            .iter()
            .enumerate()
            .filter(|(_, commands)| !commands.is_empty())
            .map(|(index, _)| index)
            .collect();
        assert_eq!(completions, vec![2]);
        assert_eq!(
            emitted[2],
            vec![Command::CompleteWave {
                wave: WaveNumber::FIRST
            }]
        );
    }

    #[test]
    fn new_enemies_restart_the_debounce() {
        let mut waves = Waves::new(Config::new(60, 0, 3));
        started(&mut waves, 0);

        assert!(tick(&mut waves, view(WaveStatus::Combat, 0)).is_empty());
        assert!(tick(&mut waves, view(WaveStatus::Combat, 0)).is_empty());
        assert!(tick(&mut waves, view(WaveStatus::Combat, 1)).is_empty());
        assert!(tick(&mut waves, view(WaveStatus::Combat, 0)).is_empty());
        assert!(tick(&mut waves, view(WaveStatus::Combat, 0)).is_empty());
        assert_eq!(tick(&mut waves, view(WaveStatus::Combat, 0)).len(), 1);
    }

    #[test]
    fn zero_delay_completes_on_the_first_resolved_tick() {
        let mut waves = Waves::new(Config::new(60, 0, 0));
        started(&mut waves, 0);

        assert_eq!(
            tick(&mut waves, view(WaveStatus::Combat, 0)),
            vec![Command::CompleteWave {
                wave: WaveNumber::FIRST
            }]
        );
        assert!(tick(&mut waves, view(WaveStatus::Combat, 0)).is_empty());
    }

    #[test]
    fn no_completion_without_lives() {
        let mut waves = Waves::new(Config::new(60, 0, 0));
        started(&mut waves, 0);

        let exhausted = WaveView {
            lives: 0,
            ..view(WaveStatus::Combat, 0)
        };
        assert!(tick(&mut waves, exhausted).is_empty());
    }

    #[test]
    fn terminal_events_clear_the_active_wave() {
        let mut waves = Waves::new(Config::default());
        started(&mut waves, 6);

        let mut out = Vec::new();
        waves.handle(
            &[
                Event::GameOver {
                    wave: WaveNumber::FIRST,
                },
                Event::TimeAdvanced { tick: 1 },
            ],
            view(WaveStatus::GameOver, 0),
            &mut out,
        );

        assert!(out.is_empty());
        assert_eq!(waves.pending_spawns(), 0);
    }
}

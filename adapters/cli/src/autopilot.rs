//! Scripted player used by the headless binary.

use quiz_defence_core::{CellCoord, TowerKind, WaveStatus};
use quiz_defence_presentation::Presenter;
use quiz_defence_session::Session;
use quiz_defence_world::query;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::AutopilotConfig;

/// Plays the game: starts waves, answers quizzes and builds along a fixed
/// list of cells.
#[derive(Debug)]
pub(crate) struct Autopilot {
    cells: Vec<CellCoord>,
    next_cell: usize,
    frames_between_builds: u32,
    frames_until_build: u32,
    ice_unlock_cost: u32,
    accuracy: f64,
    speed: u32,
    rng: ChaCha8Rng,
}

impl Autopilot {
    pub(crate) fn new(config: &AutopilotConfig, accuracy: f64, speed: u32, seed: u64) -> Self {
        Self {
            cells: config.cells(),
            next_cell: 0,
            frames_between_builds: config.frames_between_builds,
            frames_until_build: 0,
            ice_unlock_cost: config.ice_unlock_cost,
            accuracy: if accuracy.is_nan() {
                0.0
            } else {
                accuracy.clamp(0.0, 1.0)
            },
            speed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Performs at most one player action before the next frame.
    pub(crate) fn act<P: Presenter>(&mut self, session: &mut Session<P>) {
        if session.is_game_over() {
            return;
        }

        if let Some(answer) = session.active_quiz().map(|quiz| quiz.answer) {
            let guess = if self.rng.gen_bool(self.accuracy) {
                answer
            } else {
                answer + 1
            };
            let _ = session.submit_answer(guess);
            return;
        }

        let status = query::wave_status(session.world());
        if matches!(status, WaveStatus::Idle | WaveStatus::Complete) {
            if session.start_wave().is_ok() {
                let speed = session.set_speed_multiplier(self.speed);
                info!(wave = query::wave_number(session.world()).get(), speed, "autopilot started wave");
            }
            return;
        }

        self.maybe_unlock_ice(session);

        if self.frames_until_build > 0 {
            self.frames_until_build -= 1;
            return;
        }
        self.try_build(session);
    }

    fn maybe_unlock_ice<P: Presenter>(&mut self, session: &mut Session<P>) {
        if query::is_unlocked(session.world(), TowerKind::Ice) {
            return;
        }
        if query::economy(session.world()).experience < self.ice_unlock_cost {
            return;
        }
        if session
            .unlock_tower_kind(TowerKind::Ice, self.ice_unlock_cost)
            .is_ok()
        {
            info!("autopilot unlocked ice towers");
        }
    }

    fn try_build<P: Presenter>(&mut self, session: &mut Session<P>) {
        let Some(&cell) = self.cells.get(self.next_cell) else {
            return;
        };

        let kind = self.pick_kind(session);
        if session.select_tower_kind(kind).is_err() {
            return;
        }

        match session.place_selected(cell) {
            Ok(()) => {
                self.next_cell += 1;
                self.frames_until_build = self.frames_between_builds;
            }
            Err(reason) if reason.is_permanent_for_cell() => {
                debug!(?cell, %reason, "autopilot skipping cell");
                self.next_cell += 1;
            }
            Err(_) => {}
        }
    }

    fn pick_kind<P: Presenter>(&self, session: &Session<P>) -> TowerKind {
        let gold = query::economy(session.world()).gold;
        let sniper = TowerKind::Sniper.profile().cost;
        let ice = TowerKind::Ice.profile().cost;
        if self.next_cell % 3 == 2 && gold >= sniper {
            TowerKind::Sniper
        } else if self.next_cell % 3 == 1
            && gold >= ice
            && query::is_unlocked(session.world(), TowerKind::Ice)
        {
            TowerKind::Ice
        } else {
            TowerKind::Basic
        }
    }
}

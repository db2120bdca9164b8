#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Quiz Defence adapters.

use quiz_defence_core::{EconomySnapshot, EnemyView, ProjectileView, TowerView, WaveStatus};

/// Read-only entity snapshot handed to adapters once per rendered frame.
#[derive(Clone, Debug, Default)]
pub struct FrameSnapshot {
    /// Live enemies sorted by identifier.
    pub enemies: EnemyView,
    /// Towers sorted by identifier.
    pub towers: TowerView,
    /// Projectiles still in flight sorted by identifier.
    pub projectiles: ProjectileView,
}

impl FrameSnapshot {
    /// Creates a new frame snapshot from the provided views.
    #[must_use]
    pub fn new(enemies: EnemyView, towers: TowerView, projectiles: ProjectileView) -> Self {
        Self {
            enemies,
            towers,
            projectiles,
        }
    }
}

/// Narrow interface through which the simulation reports to a user interface.
pub trait Presenter {
    /// Receives the entity snapshot for the frame being rendered.
    fn on_entities_changed(&mut self, frame: &FrameSnapshot);

    /// Receives the player's resources whenever they change.
    fn on_economy_changed(&mut self, economy: EconomySnapshot);

    /// Receives wave state transitions for the status banner.
    fn on_wave_status(&mut self, status: WaveStatus);

    /// Asks the player to answer a quiz before a build is committed.
    fn on_quiz_requested(&mut self, prompt: &str);

    /// Reports whether the submitted answer was correct.
    fn on_quiz_resolved(&mut self, correct: bool);
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn on_entities_changed(&mut self, frame: &FrameSnapshot) {
        (**self).on_entities_changed(frame);
    }

    fn on_economy_changed(&mut self, economy: EconomySnapshot) {
        (**self).on_economy_changed(economy);
    }

    fn on_wave_status(&mut self, status: WaveStatus) {
        (**self).on_wave_status(status);
    }

    fn on_quiz_requested(&mut self, prompt: &str) {
        (**self).on_quiz_requested(prompt);
    }

    fn on_quiz_resolved(&mut self, correct: bool) {
        (**self).on_quiz_resolved(correct);
    }
}

/// Presenter that discards every callback.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn on_entities_changed(&mut self, _frame: &FrameSnapshot) {}

    fn on_economy_changed(&mut self, _economy: EconomySnapshot) {}

    fn on_wave_status(&mut self, _status: WaveStatus) {}

    fn on_quiz_requested(&mut self, _prompt: &str) {}

    fn on_quiz_resolved(&mut self, _correct: bool) {}
}

/// Callback captured by [`RecordingPresenter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresenterCall {
    /// Entity counts of a rendered frame.
    Entities {
        /// Live enemies in the frame.
        enemies: usize,
        /// Towers in the frame.
        towers: usize,
        /// Projectiles in the frame.
        projectiles: usize,
    },
    /// Economy update.
    Economy(EconomySnapshot),
    /// Wave state transition.
    WaveStatus(WaveStatus),
    /// Quiz prompt shown to the player.
    QuizRequested(String),
    /// Quiz outcome.
    QuizResolved(bool),
}

/// Presenter that records every callback, used by replays and tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresenter {
    calls: Vec<PresenterCall>,
}

impl RecordingPresenter {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks received so far in arrival order.
    #[must_use]
    pub fn calls(&self) -> &[PresenterCall] {
        &self.calls
    }

    /// Drains the recorded callbacks.
    pub fn take_calls(&mut self) -> Vec<PresenterCall> {
        std::mem::take(&mut self.calls)
    }

    /// Most recent economy update, if any.
    #[must_use]
    pub fn last_economy(&self) -> Option<EconomySnapshot> {
        self.calls.iter().rev().find_map(|call| match call {
            PresenterCall::Economy(economy) => Some(*economy),
            _ => None,
        })
    }

    /// Wave statuses in the order they were reported.
    #[must_use]
    pub fn wave_statuses(&self) -> Vec<WaveStatus> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                PresenterCall::WaveStatus(status) => Some(*status),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn on_entities_changed(&mut self, frame: &FrameSnapshot) {
        self.calls.push(PresenterCall::Entities {
            enemies: frame.enemies.len(),
            towers: frame.towers.len(),
            projectiles: frame.projectiles.len(),
        });
    }

    fn on_economy_changed(&mut self, economy: EconomySnapshot) {
        self.calls.push(PresenterCall::Economy(economy));
    }

    fn on_wave_status(&mut self, status: WaveStatus) {
        self.calls.push(PresenterCall::WaveStatus(status));
    }

    fn on_quiz_requested(&mut self, prompt: &str) {
        self.calls.push(PresenterCall::QuizRequested(prompt.to_owned()));
    }

    fn on_quiz_resolved(&mut self, correct: bool) {
        self.calls.push(PresenterCall::QuizResolved(correct));
    }
}

/// Banner text shown for the provided wave state.
#[must_use]
pub const fn status_banner(status: WaveStatus) -> &'static str {
    match status {
        WaveStatus::Idle => "Ready for the next wave",
        WaveStatus::Spawning => "Enemies incoming",
        WaveStatus::Combat => "Defend the path",
        WaveStatus::Complete => "Wave cleared",
        WaveStatus::GameOver => "Game over",
    }
}

/// Reports whether the start-wave control should be enabled.
#[must_use]
pub const fn start_wave_enabled(status: WaveStatus) -> bool {
    matches!(status, WaveStatus::Idle | WaveStatus::Complete)
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session facade that drives the Quiz Defence simulation one frame at a time.
//!
//! A [`Session`] owns the world, every system, the quiz state and the
//! presenter. Each logical tick runs the same fixed pipeline: cooldowns,
//! waves, targeting and firing, enemy movement, projectile resolution and
//! finally the removal sweep.

mod clock;
mod config;

use quiz_defence_core::{
    CellCoord, Command, EconomySnapshot, Event, MathProblem, PlacementError, QuizError,
    TowerKind, TowerTarget, UnlockError, WaveStartError, WaveStatus,
};
use quiz_defence_presentation::{FrameSnapshot, Presenter};
use quiz_defence_system_builder::{Builder, PendingBuild};
use quiz_defence_system_difficulty::DifficultyController;
use quiz_defence_system_tower_combat::TowerCombat;
use quiz_defence_system_tower_targeting::TowerTargeting;
use quiz_defence_system_waves::{WaveView, Waves};
use quiz_defence_world::{self as world, query, World};
use tracing::{debug, info};

pub use crate::{clock::SimulationClock, config::SessionConfig};

/// Interactive game session bound to a presenter.
#[derive(Debug)]
pub struct Session<P> {
    config: SessionConfig,
    world: World,
    waves: Waves,
    targeting: TowerTargeting,
    combat: TowerCombat,
    builder: Builder,
    difficulty: DifficultyController,
    clock: SimulationClock,
    presenter: P,
    pending_events: Vec<Event>,
    targets: Vec<TowerTarget>,
    active_quiz: Option<MathProblem>,
    selected_kind: TowerKind,
    reported_economy: Option<EconomySnapshot>,
}

impl<P: Presenter> Session<P> {
    /// Creates a session and reports the initial HUD state to the presenter.
    pub fn new(config: SessionConfig, presenter: P) -> Self {
        let mut session = Self {
            world: World::with_rules(config.rules.clone()),
            waves: Waves::new(config.waves),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            builder: Builder::new(),
            difficulty: DifficultyController::new(config.difficulty, config.rng_seed),
            clock: SimulationClock::new(config.max_speed_multiplier),
            presenter,
            pending_events: Vec::new(),
            targets: Vec::new(),
            active_quiz: None,
            selected_kind: TowerKind::Basic,
            reported_economy: None,
            config,
        };
        session.report_initial_state();
        session
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the presenter.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Mutable access to the presenter.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Difficulty controller deciding the next quiz.
    #[must_use]
    pub fn difficulty(&self) -> &DifficultyController {
        &self.difficulty
    }

    /// Frame pacing state.
    #[must_use]
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Logical ticks run per rendered frame.
    #[must_use]
    pub fn speed_multiplier(&self) -> u32 {
        self.clock.speed_multiplier()
    }

    /// Quiz currently shown to the player.
    #[must_use]
    pub fn active_quiz(&self) -> Option<&MathProblem> {
        self.active_quiz.as_ref()
    }

    /// Placement awaiting the active quiz.
    #[must_use]
    pub fn pending_build(&self) -> Option<PendingBuild> {
        self.builder.pending()
    }

    /// Tower kind used by [`Self::place_selected`].
    #[must_use]
    pub fn selected_kind(&self) -> TowerKind {
        self.selected_kind
    }

    /// Reports whether the game has ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        query::wave_status(&self.world) == WaveStatus::GameOver
    }

    /// Selects the kind future placements use.
    pub fn select_tower_kind(&mut self, kind: TowerKind) -> Result<(), PlacementError> {
        if !query::is_unlocked(&self.world, kind) {
            return Err(PlacementError::Locked);
        }
        self.selected_kind = kind;
        Ok(())
    }

    /// Requests a tower of the selected kind at the provided cell.
    pub fn place_selected(&mut self, cell: CellCoord) -> Result<(), PlacementError> {
        self.place_tower_request(cell, self.selected_kind)
    }

    /// Validates a placement and, when it is legal, pauses the simulation
    /// behind a quiz.
    ///
    /// Nothing is built or charged until the quiz is resolved.
    pub fn place_tower_request(
        &mut self,
        cell: CellCoord,
        kind: TowerKind,
    ) -> Result<(), PlacementError> {
        let world = &self.world;
        let pending = self
            .builder
            .request(kind, cell, |kind, cell| query::placement_check(world, kind, cell))?;

        let problem = self.difficulty.generate_problem();
        debug!(
            kind = ?pending.kind,
            cell = ?pending.cell,
            tier = self.difficulty.tier().get(),
            "quiz requested"
        );
        self.presenter.on_quiz_requested(&problem.prompt);
        self.active_quiz = Some(problem);
        self.issue(Command::SetPaused { paused: true });
        Ok(())
    }

    /// Checks an answer against the active quiz and resolves it.
    ///
    /// Returns whether the answer was correct.
    pub fn submit_answer(&mut self, answer: i64) -> Result<bool, QuizError> {
        let correct = self
            .active_quiz
            .as_ref()
            .map(|problem| problem.is_correct(answer))
            .ok_or(QuizError::NoPendingQuiz)?;
        self.resolve_quiz(correct)?;
        Ok(correct)
    }

    /// Records a quiz outcome, then commits or cancels the pending build and
    /// resumes the simulation.
    pub fn resolve_quiz(&mut self, correct: bool) -> Result<(), QuizError> {
        if self.builder.pending().is_none() {
            return Err(QuizError::NoPendingQuiz);
        }

        let _ = self.difficulty.record_outcome(correct);

        let mut commands = Vec::new();
        if correct {
            commands.push(Command::AwardExperience {
                amount: self.config.quiz_experience,
            });
        }
        commands.push(Command::SetPaused { paused: false });
        let _ = self.builder.resolve(correct, &mut commands);
        self.active_quiz = None;

        info!(correct, "quiz resolved");
        self.presenter.on_quiz_resolved(correct);
        for command in commands {
            self.issue(command);
        }
        Ok(())
    }

    /// Closes the quiz without answering; the pending build is dropped.
    pub fn abandon_quiz(&mut self) -> Result<(), QuizError> {
        let build = self.builder.abandon().ok_or(QuizError::NoPendingQuiz)?;
        debug!(kind = ?build.kind, cell = ?build.cell, "quiz abandoned");
        self.active_quiz = None;
        self.issue(Command::SetPaused { paused: false });
        Ok(())
    }

    /// Starts the next wave.
    pub fn start_wave(&mut self) -> Result<(), WaveStartError> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::StartWave, &mut events);
        let rejection = events.iter().find_map(|event| match event {
            Event::WaveStartRejected { reason } => Some(*reason),
            _ => None,
        });
        self.absorb(events);
        rejection.map_or(Ok(()), Err)
    }

    /// Sets how many logical ticks each frame runs, returning the clamped value.
    pub fn set_speed_multiplier(&mut self, requested: u32) -> u32 {
        self.clock.set_speed_multiplier(requested)
    }

    /// Flips between normal speed and the maximum multiplier.
    pub fn toggle_speed(&mut self) -> u32 {
        self.clock.toggle()
    }

    /// Spends experience to make a tower kind buildable.
    pub fn unlock_tower_kind(&mut self, kind: TowerKind, xp_cost: u32) -> Result<(), UnlockError> {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::UnlockTowerKind { kind, xp_cost },
            &mut events,
        );
        let rejection = events.iter().find_map(|event| match event {
            Event::UnlockRejected { reason, .. } => Some(*reason),
            _ => None,
        });
        self.absorb(events);
        rejection.map_or(Ok(()), Err)
    }

    /// Discards all progress and starts over with the same configuration.
    pub fn restart(&mut self) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Reset, &mut events);
        self.pending_events.clear();
        self.builder.handle(&events);
        self.difficulty = DifficultyController::new(self.config.difficulty, self.config.rng_seed);
        self.clock.reset_speed();
        self.active_quiz = None;
        self.selected_kind = TowerKind::Basic;
        self.reported_economy = None;
        info!("session restarted");
        self.absorb(events);
    }

    /// Runs one rendered frame and returns the number of logical ticks it ran.
    ///
    /// While a quiz is open or the game is over no tick runs, yet the frame
    /// is still rendered.
    pub fn frame(&mut self) -> u32 {
        let halted = query::is_paused(&self.world) || self.is_game_over();
        let steps = self.clock.begin_frame(halted);

        let mut ran = 0;
        for _ in 0..steps {
            self.step();
            ran += 1;
            if self.is_game_over() {
                break;
            }
        }

        let frame = FrameSnapshot::new(
            query::enemy_view(&self.world),
            query::tower_view(&self.world),
            query::projectile_view(&self.world),
        );
        self.presenter.on_entities_changed(&frame);
        ran
    }

    fn step(&mut self) {
        let mut events = std::mem::take(&mut self.pending_events);
        let fresh_from = events.len();

        world::apply(&mut self.world, Command::Tick, &mut events);

        let mut commands = Vec::new();
        self.waves
            .handle(&events, wave_view(&self.world), &mut commands);
        let carry_from = events.len();
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }

        let status = query::wave_status(&self.world);
        let towers = query::tower_view(&self.world);
        self.targeting.handle(
            status,
            &towers,
            &query::enemy_view(&self.world),
            &mut self.targets,
        );
        self.combat.handle(status, &towers, &self.targets, &mut commands);
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }

        for command in [
            Command::AdvanceEnemies,
            Command::ResolveProjectiles,
            Command::SweepRemovals,
        ] {
            world::apply(&mut self.world, command, &mut events);
        }

        self.builder.handle(&events[fresh_from..]);
        self.report(&events[fresh_from..]);
        // Events raised after the wave system ran are replayed to it next tick.
        self.pending_events = events.split_off(carry_from);
    }

    /// Applies a command outside the tick pipeline and forwards its events.
    fn issue(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.absorb(events);
    }

    /// Reports events produced outside a tick and queues them for the
    /// systems that consume events on the next tick.
    fn absorb(&mut self, events: Vec<Event>) {
        self.report(&events);
        self.pending_events.extend(events);
    }

    fn report(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::WaveStatusChanged { status } => self.presenter.on_wave_status(*status),
                Event::WaveCompleted { wave, .. } => {
                    self.clock.reset_speed();
                    debug!(wave = wave.get(), "speed reset after wave");
                }
                Event::GameOver { wave } => {
                    info!(wave = wave.get(), "session over");
                    let _ = self.builder.abandon();
                    self.active_quiz = None;
                }
                _ => {}
            }
        }

        let economy = query::economy(&self.world);
        if self.reported_economy != Some(economy) {
            self.reported_economy = Some(economy);
            self.presenter.on_economy_changed(economy);
        }
    }

    fn report_initial_state(&mut self) {
        self.presenter
            .on_wave_status(query::wave_status(&self.world));
        self.report(&[]);
    }
}

fn wave_view(world: &World) -> WaveView {
    WaveView {
        wave: query::wave_number(world),
        status: query::wave_status(world),
        live_enemies: query::live_enemy_count(world),
        lives: query::economy(world).lives,
    }
}

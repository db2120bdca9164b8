#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that holds quiz-gated build requests and emits tower placement
//! commands once the quiz is resolved.

use quiz_defence_core::{CellCoord, Command, Event, PlacementError, TowerKind};
use tracing::debug;

/// Placement awaiting the player's quiz answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingBuild {
    /// Kind of tower proposed for placement.
    pub kind: TowerKind,
    /// Cell the tower would occupy.
    pub cell: CellCoord,
}

impl PendingBuild {
    /// Creates a new pending build descriptor.
    #[must_use]
    pub const fn new(kind: TowerKind, cell: CellCoord) -> Self {
        Self { kind, cell }
    }
}

/// Build-request system that gates placements behind a single pending quiz.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    pending: Option<PendingBuild>,
}

impl Builder {
    /// Creates a new builder system instance with no pending request.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Placement currently awaiting a quiz outcome.
    #[must_use]
    pub const fn pending(&self) -> Option<PendingBuild> {
        self.pending
    }

    /// Validates and stores a build request.
    ///
    /// The `validate` closure should mirror the semantics of the world's
    /// `query::placement_check` helper. Nothing is charged here; gold moves
    /// only once the resulting `Command::PlaceTower` is applied.
    pub fn request<F>(
        &mut self,
        kind: TowerKind,
        cell: CellCoord,
        validate: F,
    ) -> Result<PendingBuild, PlacementError>
    where
        F: FnOnce(TowerKind, CellCoord) -> Result<(), PlacementError>,
    {
        if self.pending.is_some() {
            return Err(PlacementError::QuizPending);
        }

        validate(kind, cell)?;
        let build = PendingBuild::new(kind, cell);
        self.pending = Some(build);
        Ok(build)
    }

    /// Resolves the pending request with the quiz outcome.
    ///
    /// A correct answer emits `Command::PlaceTower`; an incorrect one drops
    /// the request. Returns the request that was resolved, if any.
    pub fn resolve(&mut self, correct: bool, out: &mut Vec<Command>) -> Option<PendingBuild> {
        let build = self.pending.take()?;
        if correct {
            out.push(Command::PlaceTower {
                kind: build.kind,
                cell: build.cell,
            });
        } else {
            debug!(kind = ?build.kind, cell = ?build.cell, "build cancelled by quiz");
        }
        Some(build)
    }

    /// Drops the pending request without placing anything.
    pub fn abandon(&mut self) -> Option<PendingBuild> {
        self.pending.take()
    }

    /// Consumes world events, discarding the pending request when the world
    /// is reset or the game ends.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            if matches!(event, Event::WorldReset | Event::GameOver { .. }) {
                self.pending = None;
            }
        }
    }
}

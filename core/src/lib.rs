#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Quiz Defence engine.
//!
//! This crate defines the message surface that connects the session, the
//! authoritative world, and pure systems. The session submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views, and respond exclusively with new command batches.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the next wave begins spawning.
    StartWave,
    /// Opens a new logical tick and runs the tower cooldown pass.
    Tick,
    /// Releases one enemy of the active wave onto the path.
    SpawnEnemy {
        /// Wave the enemy belongs to; stale waves are ignored.
        wave: WaveNumber,
        /// Number of enemies still queued after this one.
        remaining: u32,
    },
    /// Requests that a ready tower fires at the provided enemy.
    FireProjectile {
        /// Tower that fires.
        tower: TowerId,
        /// Enemy captured as the projectile's target.
        target: EnemyId,
    },
    /// Moves every live enemy one tick along the path.
    AdvanceEnemies,
    /// Homes every active projectile and resolves hits.
    ResolveProjectiles,
    /// Removes dead and leaked enemies and spent projectiles.
    SweepRemovals,
    /// Confirms that the provided wave has been fully resolved.
    CompleteWave {
        /// Wave being confirmed.
        wave: WaveNumber,
    },
    /// Commits construction of a tower, charging its cost.
    PlaceTower {
        /// Kind of tower to construct.
        kind: TowerKind,
        /// Grid cell the tower occupies.
        cell: CellCoord,
    },
    /// Spends experience to make a tower kind available for building.
    UnlockTowerKind {
        /// Kind being unlocked.
        kind: TowerKind,
        /// Experience charged for the unlock.
        xp_cost: u32,
    },
    /// Credits experience earned outside combat.
    AwardExperience {
        /// Experience to add.
        amount: u32,
    },
    /// Freezes or resumes simulation state while a quiz is open.
    SetPaused {
        /// Whether simulation commands should be ignored.
        paused: bool,
    },
    /// Restores the world to its initial session state.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that a new logical tick opened.
    TimeAdvanced {
        /// Index of the tick that just opened.
        tick: u64,
    },
    /// Announces that a wave started spawning.
    WaveStarted {
        /// Wave that started.
        wave: WaveNumber,
        /// Number of enemies queued for the wave.
        enemy_count: u32,
    },
    /// Reports that a wave start request was rejected.
    WaveStartRejected {
        /// Specific reason the request failed.
        reason: WaveStartError,
    },
    /// Announces a transition of the wave state machine.
    WaveStatusChanged {
        /// Status that became active.
        status: WaveStatus,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Wave the enemy belongs to.
        wave: WaveNumber,
    },
    /// Confirms that a tower fired a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy captured as the target.
        target: EnemyId,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyLeaked {
        /// Enemy that leaked.
        enemy: EnemyId,
    },
    /// Reports the lethal hit on an enemy. Emitted at most once per enemy.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Gold credited for the kill.
        gold_reward: u32,
        /// Experience credited for the kill.
        experience_reward: u32,
    },
    /// Confirms that an enemy left the active collection.
    EnemyRemoved {
        /// Enemy that was removed.
        enemy: EnemyId,
    },
    /// Confirms that a projectile left the active collection.
    ProjectileExpired {
        /// Projectile that was removed.
        projectile: ProjectileId,
    },
    /// Announces that a wave was completed and rewarded.
    WaveCompleted {
        /// Wave that completed.
        wave: WaveNumber,
        /// Gold credited for completing the wave.
        gold_bonus: u32,
    },
    /// Confirms that a tower was constructed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Kind of tower that was placed.
        kind: TowerKind,
        /// Cell occupied by the tower.
        cell: CellCoord,
    },
    /// Reports that a tower placement was rejected.
    TowerPlacementRejected {
        /// Kind of tower requested.
        kind: TowerKind,
        /// Cell requested.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower kind became available.
    TowerKindUnlocked {
        /// Kind that was unlocked.
        kind: TowerKind,
    },
    /// Reports that an unlock request was rejected.
    UnlockRejected {
        /// Kind requested.
        kind: TowerKind,
        /// Specific reason the unlock failed.
        reason: UnlockError,
    },
    /// Reports the economy after a mutation.
    EconomyChanged {
        /// Economy values after the mutation.
        economy: EconomySnapshot,
    },
    /// Reports that the quiz pause flag flipped.
    PauseChanged {
        /// Whether the simulation is now paused.
        paused: bool,
    },
    /// Announces that the player ran out of lives.
    GameOver {
        /// Wave during which the session ended.
        wave: WaveNumber,
    },
    /// Confirms that the world returned to its initial state.
    WorldReset,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// One-based index of a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaveNumber(u32);

impl WaveNumber {
    /// First wave of every session.
    pub const FIRST: Self = Self(1);

    /// Creates a wave number wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying wave index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Wave that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Hit points of an enemy, kept within `0..=maximum`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Health {
    current: u32,
    maximum: u32,
}

impl Health {
    /// Creates full health with the provided maximum.
    #[must_use]
    pub const fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Hit points at spawn.
    #[must_use]
    pub const fn maximum(&self) -> u32 {
        self.maximum
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Returns the health left after taking `amount` damage, floored at zero.
    #[must_use]
    pub const fn damaged(self, amount: u32) -> Self {
        Self {
            current: self.current.saturating_sub(amount),
            maximum: self.maximum,
        }
    }
}

/// Lifecycle of a wave as observed by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveStatus {
    /// No wave is running; the next one may be started.
    Idle,
    /// Enemies of the active wave are still queued.
    Spawning,
    /// Every enemy has spawned and some remain on the path.
    Combat,
    /// The wave was just resolved; transient before returning to idle.
    Complete,
    /// Lives are exhausted. Terminal until the world is reset.
    GameOver,
}

impl WaveStatus {
    /// Reports whether a wave is currently running.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Spawning | Self::Combat)
    }
}

/// Side effect carried by a projectile in addition to its damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileEffect {
    /// Plain damage.
    None,
    /// Halves the target's speed; the latest hit resets the timer.
    Slow {
        /// Number of ticks the slow lasts.
        duration_ticks: u32,
    },
}

/// Immutable combat parameters of a tower kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponProfile {
    /// Gold charged when the tower is built.
    pub cost: u32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Damage dealt by each projectile.
    pub damage: u32,
    /// Ticks between consecutive shots.
    pub cooldown_ticks: u32,
    /// Distance covered by a projectile per tick.
    pub projectile_speed: f32,
    /// Effect applied on hit.
    pub effect: ProjectileEffect,
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Cheap all-rounder.
    Basic,
    /// Low damage, slows its target.
    Ice,
    /// Long range, heavy damage, slow to reload.
    Sniper,
}

impl TowerKind {
    /// Every tower kind in catalogue order.
    pub const ALL: [Self; 3] = [Self::Basic, Self::Ice, Self::Sniper];

    /// Weapon profile installed on towers of this kind.
    #[must_use]
    pub const fn profile(self) -> WeaponProfile {
        match self {
            Self::Basic => WeaponProfile {
                cost: 50,
                range: 100.0,
                damage: 20,
                cooldown_ticks: 30,
                projectile_speed: 5.0,
                effect: ProjectileEffect::None,
            },
            Self::Ice => WeaponProfile {
                cost: 100,
                range: 120.0,
                damage: 5,
                cooldown_ticks: 40,
                projectile_speed: 4.0,
                effect: ProjectileEffect::Slow { duration_ticks: 90 },
            },
            Self::Sniper => WeaponProfile {
                cost: 150,
                range: 300.0,
                damage: 120,
                cooldown_ticks: 90,
                projectile_speed: 12.0,
                effect: ProjectileEffect::None,
            },
        }
    }

    /// Reports whether the kind is buildable without spending experience.
    #[must_use]
    pub const fn unlocked_by_default(self) -> bool {
        !matches!(self, Self::Ice)
    }

    /// Human readable name shown in menus.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Ice => "Ice",
            Self::Sniper => "Sniper",
        }
    }
}

/// Reasons a tower placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the map.
    #[error("cell lies outside the map")]
    OutOfBounds,
    /// The requested cell is a path tile.
    #[error("cell is part of the enemy path")]
    OnPath,
    /// Another tower already occupies the cell.
    #[error("cell is already occupied by a tower")]
    Occupied,
    /// The build window policy forbids building right now.
    #[error("towers cannot be built at this point of the wave")]
    BuildWindowClosed,
    /// The tower kind has not been unlocked.
    #[error("tower kind is locked")]
    Locked,
    /// Another build request is waiting for its quiz.
    #[error("another build is waiting for a quiz answer")]
    QuizPending,
    /// The session ended.
    #[error("the game is over")]
    GameOver,
    /// The player cannot afford the tower.
    #[error("not enough gold")]
    InsufficientFunds,
}

impl PlacementError {
    /// Reports whether the target cell itself can never hold the tower.
    #[must_use]
    pub const fn is_permanent_for_cell(self) -> bool {
        matches!(self, Self::OutOfBounds | Self::OnPath | Self::Occupied)
    }
}

/// Reasons a tower unlock request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum UnlockError {
    /// The player has less experience than the unlock costs.
    #[error("not enough experience")]
    InsufficientExperience,
    /// The kind is already available.
    #[error("tower kind is already unlocked")]
    AlreadyUnlocked,
    /// The session ended.
    #[error("the game is over")]
    GameOver,
}

/// Reasons a wave start request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum WaveStartError {
    /// A wave is already running.
    #[error("a wave is already active")]
    AlreadyActive,
    /// The session ended.
    #[error("the game is over")]
    GameOver,
}

/// Reasons a quiz interaction may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum QuizError {
    /// No quiz is waiting for an answer.
    #[error("no quiz is pending")]
    NoPendingQuiz,
}

/// Arithmetic difficulty level, bounded to `MIN..=MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DifficultyTier(u8);

impl DifficultyTier {
    /// Easiest tier: small additions.
    pub const MIN: Self = Self(1);
    /// Hardest tier: linear equations.
    pub const MAX: Self = Self(3);

    /// Creates a tier, clamping the value into the valid range.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    /// Retrieves the numeric tier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Next harder tier, saturating at [`Self::MAX`].
    #[must_use]
    pub fn raised(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// Next easier tier, saturating at [`Self::MIN`].
    #[must_use]
    pub fn lowered(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }
}

impl Default for DifficultyTier {
    fn default() -> Self {
        Self::MIN
    }
}

/// Quiz question gating a build.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MathProblem {
    /// Text shown to the player.
    pub prompt: String,
    /// Integer answer expected from the player.
    pub answer: i64,
}

impl MathProblem {
    /// Reports whether the provided answer solves the problem.
    #[must_use]
    pub fn is_correct(&self, answer: i64) -> bool {
        self.answer == answer
    }
}

/// Player resources shown on the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EconomySnapshot {
    /// Gold available for towers.
    pub gold: u32,
    /// Lives left before the game ends.
    pub lives: u32,
    /// Experience available for unlocks.
    pub experience: u32,
    /// Wave the player is on.
    pub wave: WaveNumber,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Position in world units.
    pub position: Vec2,
    /// Index of the waypoint the enemy is walking towards.
    pub next_waypoint: usize,
    /// Unslowed speed in world units per tick.
    pub base_speed: f32,
    /// Remaining and maximum hit points.
    pub health: Health,
    /// Ticks of slow left.
    pub slow_ticks_remaining: u32,
}

/// Read-only snapshot describing every live enemy.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the snapshots in ascending identifier order, which is
    /// also spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Looks up the snapshot of the provided enemy.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Centre of the cell in world units.
    pub position: Vec2,
    /// Weapon installed at placement.
    pub profile: WeaponProfile,
    /// Ticks left before the tower may fire again.
    pub cooldown_remaining: u32,
}

/// Read-only snapshot describing all towers placed on the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of towers captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no tower was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Looks up the snapshot of the provided tower.
    #[must_use]
    pub fn get(&self, id: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Tower that fired it.
    pub tower: TowerId,
    /// Enemy it homes on.
    pub target: EnemyId,
    /// Position in world units.
    pub position: Vec2,
}

/// Read-only snapshot describing every projectile in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the snapshots in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectile was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Target chosen for a tower during the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy selected.
    pub enemy: EnemyId,
    /// Distance between the tower and the enemy in world units.
    pub distance: f32,
}

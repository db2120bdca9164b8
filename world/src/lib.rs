#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Quiz Defence.
//!
//! The world owns every entity collection and the player economy. It is
//! mutated exclusively through [`apply`] and observed through [`query`].

mod economy;
mod enemies;
mod path;
mod projectiles;
mod rules;
mod towers;

use quiz_defence_core::{
    CellCoord, Command, EconomySnapshot, EnemyId, Event, PlacementError, ProjectileId, TowerId,
    TowerKind, UnlockError, WaveNumber, WaveStartError, WaveStatus,
};
use tracing::{debug, info, warn};

use crate::{
    economy::{Economy, Unlocks},
    enemies::{Advance, Enemy},
    projectiles::{Projectile, Resolution},
    towers::TowerRegistry,
};

pub use crate::{
    path::{LayoutError, MapLayout, PathModel, TileKind},
    rules::{BuildWindow, Rules},
};

#[derive(Clone, Copy, Debug)]
struct WaveLedger {
    number: WaveNumber,
    status: WaveStatus,
}

/// Represents the authoritative Quiz Defence world state.
#[derive(Clone, Debug)]
pub struct World {
    rules: Rules,
    layout: MapLayout,
    economy: Economy,
    unlocks: Unlocks,
    enemies: Vec<Enemy>,
    towers: TowerRegistry,
    projectiles: Vec<Projectile>,
    wave: WaveLedger,
    paused: bool,
    tick_index: u64,
    next_enemy_id: u32,
    next_projectile_id: u32,
}

impl World {
    /// Creates a world on the classic map using the default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    /// Creates a world on the classic map using the provided rules.
    #[must_use]
    pub fn with_rules(rules: Rules) -> Self {
        Self::with_layout(rules, MapLayout::classic())
    }

    /// Creates a world on the provided map.
    #[must_use]
    pub fn with_layout(rules: Rules, layout: MapLayout) -> Self {
        Self {
            economy: Economy::new(
                rules.starting_gold,
                rules.starting_lives,
                rules.starting_experience,
            ),
            unlocks: Unlocks::with_defaults(),
            enemies: Vec::new(),
            towers: TowerRegistry::new(),
            projectiles: Vec::new(),
            wave: WaveLedger {
                number: WaveNumber::FIRST,
                status: WaveStatus::Idle,
            },
            paused: false,
            tick_index: 0,
            next_enemy_id: 0,
            next_projectile_id: 0,
            rules,
            layout,
        }
    }

    fn economy_snapshot(&self) -> EconomySnapshot {
        economy_snapshot(&self.economy, self.wave.number)
    }

    fn set_status(&mut self, status: WaveStatus, out_events: &mut Vec<Event>) {
        if self.wave.status != status {
            self.wave.status = status;
            out_events.push(Event::WaveStatusChanged { status });
        }
    }

    fn placement_error(&self, kind: TowerKind, cell: CellCoord) -> Option<PlacementError> {
        if self.wave.status == WaveStatus::GameOver {
            return Some(PlacementError::GameOver);
        }
        match self.layout.tile(cell) {
            None => return Some(PlacementError::OutOfBounds),
            Some(TileKind::Path) => return Some(PlacementError::OnPath),
            Some(TileKind::Grass) => {}
        }
        if self.towers.occupant(cell).is_some() {
            return Some(PlacementError::Occupied);
        }
        if self.rules.build_window == BuildWindow::WaveActive && !self.wave.status.is_active() {
            return Some(PlacementError::BuildWindowClosed);
        }
        if !self.unlocks.contains(kind) {
            return Some(PlacementError::Locked);
        }
        if self.economy.gold < kind.profile().cost {
            return Some(PlacementError::InsufficientFunds);
        }
        None
    }

    fn start_wave(&mut self, out_events: &mut Vec<Event>) {
        if self.wave.status.is_active() {
            debug!(wave = self.wave.number.get(), "wave already active");
            out_events.push(Event::WaveStartRejected {
                reason: WaveStartError::AlreadyActive,
            });
            return;
        }

        let wave = self.wave.number;
        let enemy_count = self.rules.enemy_count(wave);
        info!(wave = wave.get(), enemy_count, "wave started");
        out_events.push(Event::WaveStarted { wave, enemy_count });
        let status = if enemy_count == 0 {
            WaveStatus::Combat
        } else {
            WaveStatus::Spawning
        };
        self.set_status(status, out_events);
    }

    fn spawn_enemy(&mut self, wave: WaveNumber, remaining: u32, out_events: &mut Vec<Event>) {
        if wave != self.wave.number || self.wave.status != WaveStatus::Spawning {
            warn!(wave = wave.get(), "ignoring spawn for inactive wave");
            return;
        }

        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);
        self.enemies.push(Enemy::spawn(
            id,
            self.layout.path(),
            self.rules.enemy_speed(wave),
            self.rules.enemy_health(wave),
        ));
        out_events.push(Event::EnemySpawned { enemy: id, wave });

        if remaining == 0 {
            self.set_status(WaveStatus::Combat, out_events);
        }
    }

    fn fire_projectile(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        let target_live = self
            .enemy_index(target)
            .map_or(false, |index| self.enemies[index].is_live());
        if !target_live {
            debug!(tower = tower.get(), target = target.get(), "target not live");
            return;
        }

        let Some(state) = self.towers.get_mut(tower) else {
            warn!(tower = tower.get(), "fire requested for unknown tower");
            return;
        };
        if state.cooldown_remaining > 0 {
            debug!(tower = tower.get(), "tower still cooling down");
            return;
        }

        state.cooldown_remaining = state.profile.cooldown_ticks;
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.saturating_add(1);
        self.projectiles.push(Projectile::launch(
            id,
            tower,
            target,
            state.position,
            state.profile.damage,
            state.profile.projectile_speed,
            state.profile.effect,
        ));
        out_events.push(Event::ProjectileFired {
            projectile: id,
            tower,
            target,
        });
    }

    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        let mut lives_exhausted = false;
        for enemy in self.enemies.iter_mut().filter(|enemy| enemy.is_live()) {
            if enemy.advance(self.layout.path(), self.rules.slow_factor) != Advance::Leaked {
                continue;
            }

            let lives = self.economy.lose_life();
            debug!(enemy = enemy.id.get(), lives, "enemy leaked");
            out_events.push(Event::EnemyLeaked { enemy: enemy.id });
            out_events.push(Event::EconomyChanged {
                economy: economy_snapshot(&self.economy, self.wave.number),
            });
            if lives == 0 {
                lives_exhausted = true;
                break;
            }
        }

        if lives_exhausted {
            info!(wave = self.wave.number.get(), "lives exhausted");
            self.set_status(WaveStatus::GameOver, out_events);
            out_events.push(Event::GameOver {
                wave: self.wave.number,
            });
        }
    }

    fn resolve_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let wave = self.wave.number;
        for projectile in self.projectiles.iter_mut().filter(|p| p.is_active()) {
            let target = projectile.target();
            let enemy = self
                .enemies
                .binary_search_by_key(&target, |enemy| enemy.id)
                .ok()
                .map(|index| &mut self.enemies[index]);

            if projectile.advance(enemy) != (Resolution::Hit { lethal: true }) {
                continue;
            }

            let gold_reward = self.rules.kill_gold(wave);
            let experience_reward = self.rules.kill_experience;
            self.economy.credit(gold_reward, experience_reward);
            out_events.push(Event::EnemyKilled {
                enemy: target,
                gold_reward,
                experience_reward,
            });
            out_events.push(Event::EconomyChanged {
                economy: economy_snapshot(&self.economy, wave),
            });
        }
    }

    fn sweep_removals(&mut self, out_events: &mut Vec<Event>) {
        let removed_enemies: Vec<EnemyId> = self
            .enemies
            .iter()
            .filter(|enemy| !enemy.is_live())
            .map(|enemy| enemy.id)
            .collect();
        if !removed_enemies.is_empty() {
            self.enemies.retain(|enemy| enemy.is_live());
            out_events.extend(
                removed_enemies
                    .into_iter()
                    .map(|enemy| Event::EnemyRemoved { enemy }),
            );
        }

        let expired: Vec<ProjectileId> = self
            .projectiles
            .iter()
            .filter(|projectile| !projectile.is_active())
            .map(|projectile| projectile.id)
            .collect();
        if !expired.is_empty() {
            self.projectiles.retain(Projectile::is_active);
            out_events.extend(
                expired
                    .into_iter()
                    .map(|projectile| Event::ProjectileExpired { projectile }),
            );
        }
    }

    fn complete_wave(&mut self, wave: WaveNumber, out_events: &mut Vec<Event>) {
        let resolved = self.wave.status == WaveStatus::Combat
            && self.enemies.is_empty()
            && self.economy.lives > 0;
        if wave != self.wave.number || !resolved {
            warn!(wave = wave.get(), "ignoring completion for unresolved wave");
            return;
        }

        let gold_bonus = self.rules.wave_completion_bonus;
        self.economy.credit(gold_bonus, 0);
        self.wave.number = wave.next();
        info!(wave = wave.get(), gold_bonus, "wave completed");
        self.set_status(WaveStatus::Complete, out_events);
        out_events.push(Event::WaveCompleted { wave, gold_bonus });
        out_events.push(Event::EconomyChanged {
            economy: self.economy_snapshot(),
        });
        self.set_status(WaveStatus::Idle, out_events);
    }

    fn place_tower(&mut self, kind: TowerKind, cell: CellCoord, out_events: &mut Vec<Event>) {
        if let Some(reason) = self.placement_error(kind, cell) {
            debug!(?kind, ?cell, %reason, "tower placement rejected");
            out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            return;
        }

        if !self.economy.spend_gold(kind.profile().cost) {
            out_events.push(Event::TowerPlacementRejected {
                kind,
                cell,
                reason: PlacementError::InsufficientFunds,
            });
            return;
        }
        let position = self.layout.cell_center(cell);
        let tower = self.towers.insert(kind, cell, position);
        out_events.push(Event::TowerPlaced { tower, kind, cell });
        out_events.push(Event::EconomyChanged {
            economy: self.economy_snapshot(),
        });
    }

    fn unlock(&mut self, kind: TowerKind, xp_cost: u32, out_events: &mut Vec<Event>) {
        let rejection = if self.wave.status == WaveStatus::GameOver {
            Some(UnlockError::GameOver)
        } else if self.unlocks.contains(kind) {
            Some(UnlockError::AlreadyUnlocked)
        } else if !self.economy.spend_experience(xp_cost) {
            Some(UnlockError::InsufficientExperience)
        } else {
            None
        };

        if let Some(reason) = rejection {
            debug!(?kind, %reason, "unlock rejected");
            out_events.push(Event::UnlockRejected { kind, reason });
            return;
        }

        self.unlocks.insert(kind);
        out_events.push(Event::TowerKindUnlocked { kind });
        out_events.push(Event::EconomyChanged {
            economy: self.economy_snapshot(),
        });
    }

    fn enemy_index(&self, id: EnemyId) -> Option<usize> {
        self.enemies
            .binary_search_by_key(&id, |enemy| enemy.id)
            .ok()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn economy_snapshot(economy: &Economy, wave: WaveNumber) -> EconomySnapshot {
    EconomySnapshot {
        gold: economy.gold,
        lives: economy.lives,
        experience: economy.experience,
        wave,
    }
}

/// Commands that move simulation state forward and must stay frozen while
/// the world is paused.
fn advances_simulation(command: &Command) -> bool {
    matches!(
        command,
        Command::Tick
            | Command::SpawnEnemy { .. }
            | Command::FireProjectile { .. }
            | Command::AdvanceEnemies
            | Command::ResolveProjectiles
            | Command::SweepRemovals
            | Command::CompleteWave { .. }
    )
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.wave.status == WaveStatus::GameOver {
        match command {
            Command::Reset | Command::SweepRemovals => {}
            Command::StartWave => {
                out_events.push(Event::WaveStartRejected {
                    reason: WaveStartError::GameOver,
                });
                return;
            }
            Command::PlaceTower { kind, cell } => {
                out_events.push(Event::TowerPlacementRejected {
                    kind,
                    cell,
                    reason: PlacementError::GameOver,
                });
                return;
            }
            Command::UnlockTowerKind { kind, .. } => {
                out_events.push(Event::UnlockRejected {
                    kind,
                    reason: UnlockError::GameOver,
                });
                return;
            }
            _ => {
                debug!(?command, "ignoring command after game over");
                return;
            }
        }
    }

    if world.paused && advances_simulation(&command) {
        debug!(?command, "ignoring simulation command while paused");
        return;
    }

    match command {
        Command::StartWave => world.start_wave(out_events),
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.towers.decrement_cooldowns();
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::SpawnEnemy { wave, remaining } => world.spawn_enemy(wave, remaining, out_events),
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events);
        }
        Command::AdvanceEnemies => world.advance_enemies(out_events),
        Command::ResolveProjectiles => world.resolve_projectiles(out_events),
        Command::SweepRemovals => world.sweep_removals(out_events),
        Command::CompleteWave { wave } => world.complete_wave(wave, out_events),
        Command::PlaceTower { kind, cell } => world.place_tower(kind, cell, out_events),
        Command::UnlockTowerKind { kind, xp_cost } => world.unlock(kind, xp_cost, out_events),
        Command::AwardExperience { amount } => {
            world.economy.credit(0, amount);
            out_events.push(Event::EconomyChanged {
                economy: world.economy_snapshot(),
            });
        }
        Command::SetPaused { paused } => {
            if world.paused != paused {
                world.paused = paused;
                out_events.push(Event::PauseChanged { paused });
            }
        }
        Command::Reset => {
            let rules = world.rules.clone();
            let layout = world.layout.clone();
            *world = World::with_layout(rules, layout);
            info!("world reset");
            out_events.push(Event::WorldReset);
            out_events.push(Event::WaveStatusChanged {
                status: WaveStatus::Idle,
            });
            out_events.push(Event::EconomyChanged {
                economy: world.economy_snapshot(),
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use quiz_defence_core::{
        CellCoord, EconomySnapshot, EnemyView, PlacementError, ProjectileView, TowerId, TowerKind,
        TowerView, WaveNumber, WaveStatus,
    };

    use super::{MapLayout, Rules, World};

    /// Provides read-only access to the map layout.
    #[must_use]
    pub fn layout(world: &World) -> &MapLayout {
        &world.layout
    }

    /// Provides read-only access to the rules the world was created with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Captures the player's resources.
    #[must_use]
    pub fn economy(world: &World) -> EconomySnapshot {
        world.economy_snapshot()
    }

    /// Wave the player is on.
    #[must_use]
    pub fn wave_number(world: &World) -> WaveNumber {
        world.wave.number
    }

    /// Current state of the wave state machine.
    #[must_use]
    pub fn wave_status(world: &World) -> WaveStatus {
        world.wave.status
    }

    /// Reports whether simulation commands are frozen for a quiz.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Number of logical ticks processed since the session started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Number of enemies still walking with health left.
    #[must_use]
    pub fn live_enemy_count(world: &World) -> usize {
        world.enemies.iter().filter(|enemy| enemy.is_live()).count()
    }

    /// Captures a read-only view of the live enemies in spawn order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .filter(|enemy| enemy.is_live())
                .map(|enemy| enemy.snapshot())
                .collect(),
        )
    }

    /// Captures a read-only view of the towers on the map.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .filter(|projectile| projectile.is_active())
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Tower occupying the provided cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        world.towers.occupant(cell)
    }

    /// Reports whether the provided kind may be built.
    #[must_use]
    pub fn is_unlocked(world: &World, kind: TowerKind) -> bool {
        world.unlocks.contains(kind)
    }

    /// Validates a placement without mutating the world.
    ///
    /// Mirrors the checks performed when `Command::PlaceTower` is applied.
    pub fn placement_check(
        world: &World,
        kind: TowerKind,
        cell: CellCoord,
    ) -> Result<(), PlacementError> {
        match world.placement_error(kind, cell) {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }
}

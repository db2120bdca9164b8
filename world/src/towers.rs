//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use glam::Vec2;
use quiz_defence_core::{CellCoord, TowerId, TowerKind, TowerSnapshot, WeaponProfile};

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Cell occupied by the tower.
    pub(crate) cell: CellCoord,
    /// Centre of the cell, where projectiles are launched from.
    pub(crate) position: Vec2,
    /// Weapon captured at placement.
    pub(crate) profile: WeaponProfile,
    /// Ticks left before the tower may fire again.
    pub(crate) cooldown_remaining: u32,
}

impl TowerState {
    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            position: self.position,
            profile: self.profile,
            cooldown_remaining: self.cooldown_remaining,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Clone, Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    by_cell: BTreeMap<CellCoord, TowerId>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            by_cell: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Stores a new tower ready to fire and returns its identifier.
    pub(crate) fn insert(&mut self, kind: TowerKind, cell: CellCoord, position: Vec2) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let state = TowerState {
            id,
            kind,
            cell,
            position,
            profile: kind.profile(),
            cooldown_remaining: 0,
        };
        let _ = self.entries.insert(id, state);
        let _ = self.by_cell.insert(cell, id);
        id
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<TowerId> {
        self.by_cell.get(&cell).copied()
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    /// Counts every running cooldown down by one tick.
    pub(crate) fn decrement_cooldowns(&mut self) {
        for tower in self.entries.values_mut() {
            tower.cooldown_remaining = tower.cooldown_remaining.saturating_sub(1);
        }
    }
}

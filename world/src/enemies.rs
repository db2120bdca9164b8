//! Enemy actors walking the path.

use glam::Vec2;
use quiz_defence_core::{EnemyId, EnemySnapshot, Health};

use crate::path::PathModel;

/// Outcome of advancing an enemy by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Advance {
    /// The enemy is still on the path.
    Moved,
    /// The enemy reached the final waypoint.
    Leaked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Alive,
    Leaked,
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) position: Vec2,
    next_waypoint: usize,
    base_speed: f32,
    health: Health,
    slow_ticks_remaining: u32,
    lifecycle: Lifecycle,
}

impl Enemy {
    pub(crate) fn spawn(id: EnemyId, path: &PathModel, base_speed: f32, max_health: u32) -> Self {
        Self {
            id,
            position: path.start(),
            next_waypoint: 1,
            base_speed,
            health: Health::full(max_health),
            slow_ticks_remaining: 0,
            lifecycle: Lifecycle::Alive,
        }
    }

    /// Moves the enemy towards its next waypoint, snapping onto it when the
    /// remaining distance is shorter than this tick's stride.
    pub(crate) fn advance(&mut self, path: &PathModel, slow_factor: f32) -> Advance {
        let mut stride = self.base_speed;
        if self.slow_ticks_remaining > 0 {
            stride *= slow_factor;
            self.slow_ticks_remaining -= 1;
        }

        let Some(target) = path.waypoint(self.next_waypoint) else {
            self.lifecycle = Lifecycle::Leaked;
            return Advance::Leaked;
        };

        let delta = target - self.position;
        let distance = delta.length();
        if distance < stride || distance <= f32::EPSILON {
            self.position = target;
            self.next_waypoint += 1;
            if self.next_waypoint >= path.waypoints().len() {
                self.lifecycle = Lifecycle::Leaked;
                return Advance::Leaked;
            }
        } else {
            self.position += delta / distance * stride;
        }
        Advance::Moved
    }

    pub(crate) fn apply_damage(&mut self, amount: u32) {
        self.health = self.health.damaged(amount);
    }

    /// Overwrites any running slow; the latest hit wins.
    pub(crate) fn apply_slow(&mut self, duration_ticks: u32) {
        self.slow_ticks_remaining = duration_ticks;
    }

    pub(crate) fn health(&self) -> Health {
        self.health
    }

    /// Reports whether the enemy is still walking and has health left.
    pub(crate) fn is_live(&self) -> bool {
        self.lifecycle == Lifecycle::Alive && !self.health.is_depleted()
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position,
            next_waypoint: self.next_waypoint,
            base_speed: self.base_speed,
            health: self.health,
            slow_ticks_remaining: self.slow_ticks_remaining,
        }
    }
}

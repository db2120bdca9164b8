//! Homing projectiles fired by towers.

use glam::Vec2;
use quiz_defence_core::{EnemyId, ProjectileEffect, ProjectileId, ProjectileSnapshot, TowerId};

use crate::enemies::Enemy;

/// Outcome of advancing a projectile by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// The target is gone or already dead; the projectile fizzles.
    Stale,
    /// Still travelling towards the target.
    InFlight,
    /// Damage was applied. `lethal` is set when this hit killed the target.
    Hit {
        /// Whether the hit depleted the target's health.
        lethal: bool,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    tower: TowerId,
    target: EnemyId,
    position: Vec2,
    damage: u32,
    speed: f32,
    effect: ProjectileEffect,
    active: bool,
}

impl Projectile {
    pub(crate) fn launch(
        id: ProjectileId,
        tower: TowerId,
        target: EnemyId,
        position: Vec2,
        damage: u32,
        speed: f32,
        effect: ProjectileEffect,
    ) -> Self {
        Self {
            id,
            tower,
            target,
            position,
            damage,
            speed,
            effect,
            active: true,
        }
    }

    pub(crate) fn target(&self) -> EnemyId {
        self.target
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    /// Re-homes on the target's current position and resolves a hit once the
    /// remaining distance is shorter than one tick of travel.
    ///
    /// `target` is the live-collection lookup for [`Self::target`]; a missing
    /// entry or one that is no longer live makes the projectile fizzle.
    pub(crate) fn advance(&mut self, target: Option<&mut Enemy>) -> Resolution {
        let Some(enemy) = target.filter(|enemy| enemy.is_live()) else {
            self.active = false;
            return Resolution::Stale;
        };

        let delta = enemy.position - self.position;
        let distance = delta.length();
        if distance < self.speed {
            enemy.apply_damage(self.damage);
            if let ProjectileEffect::Slow { duration_ticks } = self.effect {
                enemy.apply_slow(duration_ticks);
            }
            self.active = false;
            return Resolution::Hit {
                lethal: enemy.health().is_depleted(),
            };
        }

        self.position += delta / distance * self.speed;
        Resolution::InFlight
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            tower: self.tower,
            target: self.target,
            position: self.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathModel;

    fn enemy_at_origin(health: u32) -> (PathModel, Enemy) {
        let path = PathModel::new(vec![Vec2::ZERO, Vec2::new(500.0, 0.0)]).expect("valid path");
        let enemy = Enemy::spawn(EnemyId::new(1), &path, 1.0, health);
        (path, enemy)
    }

    fn projectile_from(position: Vec2, effect: ProjectileEffect) -> Projectile {
        Projectile::launch(
            ProjectileId::new(0),
            TowerId::new(0),
            EnemyId::new(1),
            position,
            20,
            5.0,
            effect,
        )
    }

    #[test]
    fn missing_target_fizzles() {
        let mut projectile = projectile_from(Vec2::ZERO, ProjectileEffect::None);
        assert_eq!(projectile.advance(None), Resolution::Stale);
        assert!(!projectile.is_active());
    }

    #[test]
    fn travels_then_hits() {
        let (_, mut enemy) = enemy_at_origin(70);
        let mut projectile = projectile_from(Vec2::new(8.0, 0.0), ProjectileEffect::None);
        assert_eq!(projectile.advance(Some(&mut enemy)), Resolution::InFlight);
        assert_eq!(projectile.snapshot().position, Vec2::new(3.0, 0.0));
        assert_eq!(
            projectile.advance(Some(&mut enemy)),
            Resolution::Hit { lethal: false }
        );
        assert_eq!(enemy.health().current(), 50);
        assert!(!projectile.is_active());
    }

    #[test]
    fn slow_effect_is_applied_on_hit() {
        let (_, mut enemy) = enemy_at_origin(70);
        let mut projectile = projectile_from(
            Vec2::new(1.0, 0.0),
            ProjectileEffect::Slow { duration_ticks: 90 },
        );
        let _ = projectile.advance(Some(&mut enemy));
        assert_eq!(enemy.snapshot().slow_ticks_remaining, 90);
    }

    #[test]
    fn dead_target_is_stale_for_second_projectile() {
        let (_, mut enemy) = enemy_at_origin(20);
        let mut first = projectile_from(Vec2::new(1.0, 0.0), ProjectileEffect::None);
        let mut second = projectile_from(Vec2::new(1.0, 0.0), ProjectileEffect::None);
        assert_eq!(
            first.advance(Some(&mut enemy)),
            Resolution::Hit { lethal: true }
        );
        assert_eq!(second.advance(Some(&mut enemy)), Resolution::Stale);
        assert_eq!(enemy.health().current(), 0);
    }
}

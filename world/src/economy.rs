//! Player resources and tower unlock bookkeeping.

use std::collections::BTreeSet;

use quiz_defence_core::TowerKind;

/// Gold, lives, and experience of the player.
#[derive(Clone, Debug)]
pub(crate) struct Economy {
    pub(crate) gold: u32,
    pub(crate) lives: u32,
    pub(crate) experience: u32,
}

impl Economy {
    pub(crate) fn new(gold: u32, lives: u32, experience: u32) -> Self {
        Self {
            gold,
            lives,
            experience,
        }
    }

    /// Deducts `amount` gold, returning `false` without change if unaffordable.
    pub(crate) fn spend_gold(&mut self, amount: u32) -> bool {
        match self.gold.checked_sub(amount) {
            Some(rest) => {
                self.gold = rest;
                true
            }
            None => false,
        }
    }

    /// Deducts `amount` experience, returning `false` without change if unaffordable.
    pub(crate) fn spend_experience(&mut self, amount: u32) -> bool {
        match self.experience.checked_sub(amount) {
            Some(rest) => {
                self.experience = rest;
                true
            }
            None => false,
        }
    }

    pub(crate) fn credit(&mut self, gold: u32, experience: u32) {
        self.gold = self.gold.saturating_add(gold);
        self.experience = self.experience.saturating_add(experience);
    }

    /// Removes one life and returns how many remain.
    pub(crate) fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }
}

/// Tower kinds the player may build.
#[derive(Clone, Debug)]
pub(crate) struct Unlocks {
    kinds: BTreeSet<TowerKind>,
}

impl Unlocks {
    pub(crate) fn with_defaults() -> Self {
        Self {
            kinds: TowerKind::ALL
                .into_iter()
                .filter(|kind| kind.unlocked_by_default())
                .collect(),
        }
    }

    pub(crate) fn contains(&self, kind: TowerKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub(crate) fn insert(&mut self, kind: TowerKind) {
        let _ = self.kinds.insert(kind);
    }
}

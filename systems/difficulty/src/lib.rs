#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Adaptive difficulty system that tracks quiz outcomes and generates
//! arithmetic problems for the current tier.

use std::collections::VecDeque;

use quiz_defence_core::{DifficultyTier, MathProblem};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use tracing::info;

/// Configuration parameters required to construct the difficulty controller.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    window: usize,
    minimum_samples: usize,
    raise_above: f32,
    lower_below: f32,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// `window` caps how many recent outcomes are remembered and
    /// `minimum_samples` is how many are needed before the tier may move.
    #[must_use]
    pub const fn new(
        window: usize,
        minimum_samples: usize,
        raise_above: f32,
        lower_below: f32,
    ) -> Self {
        Self {
            window,
            minimum_samples,
            raise_above,
            lower_below,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(10, 5, 0.8, 0.4)
    }
}

/// Outcome of recording a quiz answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TierChange {
    /// The tier stayed where it was.
    Unchanged,
    /// Accuracy exceeded the upper bound; holds the new tier.
    Raised(DifficultyTier),
    /// Accuracy fell below the lower bound; holds the new tier.
    Lowered(DifficultyTier),
}

/// Rolling-accuracy difficulty controller that owns its random source.
#[derive(Debug, Clone)]
pub struct DifficultyController {
    config: Config,
    tier: DifficultyTier,
    history: VecDeque<bool>,
    rng: ChaCha8Rng,
}

impl DifficultyController {
    /// Creates a controller at the lowest tier seeded for deterministic problems.
    #[must_use]
    pub fn new(config: Config, seed: u64) -> Self {
        Self {
            config,
            tier: DifficultyTier::MIN,
            history: VecDeque::with_capacity(config.window),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Tier used for the next generated problem.
    #[must_use]
    pub fn tier(&self) -> DifficultyTier {
        self.tier
    }

    /// Number of outcomes currently held in the rolling window.
    #[must_use]
    pub fn samples(&self) -> usize {
        self.history.len()
    }

    /// Fraction of correct answers in the rolling window.
    #[must_use]
    pub fn accuracy(&self) -> Option<f32> {
        if self.history.is_empty() {
            return None;
        }
        let correct = self.history.iter().filter(|&&outcome| outcome).count();
        Some(correct as f32 / self.history.len() as f32)
    }

    /// Appends an outcome and re-evaluates the tier.
    ///
    /// The window is cleared whenever the tier moves, so the next adjustment
    /// is judged on answers given at the new tier.
    pub fn record_outcome(&mut self, correct: bool) -> TierChange {
        self.history.push_back(correct);
        while self.history.len() > self.config.window.max(1) {
            let _ = self.history.pop_front();
        }

        if self.history.len() < self.config.minimum_samples {
            return TierChange::Unchanged;
        }

        let Some(accuracy) = self.accuracy() else {
            return TierChange::Unchanged;
        };

        let previous = self.tier;
        let change = if accuracy > self.config.raise_above {
            self.tier = previous.raised();
            TierChange::Raised(self.tier)
        } else if accuracy < self.config.lower_below {
            self.tier = previous.lowered();
            TierChange::Lowered(self.tier)
        } else {
            TierChange::Unchanged
        };

        if self.tier == previous {
            return TierChange::Unchanged;
        }

        info!(
            from = previous.get(),
            to = self.tier.get(),
            accuracy,
            "difficulty tier changed"
        );
        self.history.clear();
        change
    }

    /// Draws a problem for the current tier.
    pub fn generate_problem(&mut self) -> MathProblem {
        generate_problem_for(self.tier, &mut self.rng)
    }
}

/// Generates a problem for the provided tier from the supplied random source.
///
/// Tier 1 adds two operands, tier 2 multiplies them and tier 3 asks for `x`
/// in `m·x + c = r` with `m >= 2`, so every answer is a unique integer.
pub fn generate_problem_for<R: Rng + ?Sized>(tier: DifficultyTier, rng: &mut R) -> MathProblem {
    match tier.get() {
        1 => {
            let a: i64 = rng.gen_range(2..=11);
            let b: i64 = rng.gen_range(2..=11);
            MathProblem {
                prompt: format!("{a} + {b} = ?"),
                answer: a + b,
            }
        }
        2 => {
            let a: i64 = rng.gen_range(2..=10);
            let b: i64 = rng.gen_range(2..=10);
            MathProblem {
                prompt: format!("{a} x {b} = ?"),
                answer: a * b,
            }
        }
        _ => {
            let x: i64 = rng.gen_range(2..=9);
            let m: i64 = rng.gen_range(2..=5);
            let c: i64 = rng.gen_range(0..=9);
            let result = m * x + c;
            MathProblem {
                prompt: format!("{m}x + {c} = {result}, solve for x"),
                answer: x,
            }
        }
    }
}

//! Frame pacing: how many logical ticks each rendered frame runs.

/// Speed multiplier bounded to `1..=max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationClock {
    speed_multiplier: u32,
    max_speed_multiplier: u32,
    frames: u64,
}

impl SimulationClock {
    /// Creates a clock running at normal speed.
    #[must_use]
    pub fn new(max_speed_multiplier: u32) -> Self {
        Self {
            speed_multiplier: 1,
            max_speed_multiplier: max_speed_multiplier.max(1),
            frames: 0,
        }
    }

    /// Logical ticks run per rendered frame.
    #[must_use]
    pub const fn speed_multiplier(&self) -> u32 {
        self.speed_multiplier
    }

    /// Upper bound accepted by [`Self::set_speed_multiplier`].
    #[must_use]
    pub const fn max_speed_multiplier(&self) -> u32 {
        self.max_speed_multiplier
    }

    /// Frames rendered since the clock was created.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Clamps and stores the requested multiplier, returning the value in effect.
    pub fn set_speed_multiplier(&mut self, requested: u32) -> u32 {
        self.speed_multiplier = requested.clamp(1, self.max_speed_multiplier);
        self.speed_multiplier
    }

    /// Flips between normal speed and the maximum multiplier.
    pub fn toggle(&mut self) -> u32 {
        let next = if self.speed_multiplier == 1 {
            self.max_speed_multiplier
        } else {
            1
        };
        self.set_speed_multiplier(next)
    }

    /// Returns to normal speed.
    pub fn reset_speed(&mut self) {
        self.speed_multiplier = 1;
    }

    /// Starts a frame and returns how many logical ticks it should run.
    ///
    /// A halted simulation still renders but runs no ticks.
    pub fn begin_frame(&mut self, halted: bool) -> u32 {
        self.frames = self.frames.saturating_add(1);
        if halted {
            0
        } else {
            self.speed_multiplier
        }
    }
}

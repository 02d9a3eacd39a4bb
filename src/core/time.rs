//! Frame timing and the fixed simulation clock

use std::time::{Duration, Instant};

/// Wall-clock frame timing
#[derive(Debug)]
pub struct Time {
    /// Instant of the last update
    last_update: Instant,
    /// Time between the last two updates
    delta: Duration,
    /// Total time since creation
    elapsed: Duration,
}

impl Time {
    /// Create a new timer starting now
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance the timer; call once per frame
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_update;
        self.elapsed += self.delta;
        self.last_update = now;
    }

    /// Time between the last two updates
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Time between the last two updates in seconds
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Total elapsed time
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns variable frame times into a whole number of fixed simulation ticks.
///
/// Leftover time carries over to the next frame. After a long stall only
/// `max_ticks_per_frame` ticks run and the rest of the backlog is dropped.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// Length of one tick in seconds
    step: f32,
    /// Unsimulated time carried between frames
    accumulator: f32,
    /// Upper bound on ticks run for a single frame
    max_ticks_per_frame: u32,
}

impl FixedTimestep {
    /// Default simulation rate
    pub const DEFAULT_HZ: u32 = 50;

    /// Create a clock ticking `hz` times per second
    pub fn new(hz: u32) -> Self {
        Self {
            step: 1.0 / hz.max(1) as f32,
            accumulator: 0.0,
            max_ticks_per_frame: 8,
        }
    }

    /// Set the catch-up limit
    pub fn with_max_ticks_per_frame(mut self, max: u32) -> Self {
        self.max_ticks_per_frame = max.max(1);
        self
    }

    /// Length of one tick in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Fraction of a tick currently accumulated, in `[0, 1)`
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    /// Add `dt` seconds of frame time and return how many ticks to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_ticks_per_frame {
            self.accumulator -= self.step;
            ticks += 1;
        }

        if ticks == self.max_ticks_per_frame && self.accumulator >= self.step {
            log::debug!(
                "Dropping {:.3}s of simulation backlog",
                self.accumulator - self.accumulator % self.step
            );
            self.accumulator %= self.step;
        }

        ticks
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HZ)
    }
}

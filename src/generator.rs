//! # Sequence Generator
//!
//! Weighted random walk over a fixed pool of staff slots, used for endless practice.
//!
//! Each draw prefers stepwise motion: with probability `stepwise_bias` the next note
//! is taken from the slots within `stepwise_distance` staff steps of the previous
//! note, otherwise from the whole pool. The previous note itself is never drawn
//! again unless the pool has only one slot.

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::note::StaffNote;
use crate::note_space;

pub const DEFAULT_STEPWISE_BIAS: f64 = 0.7;
pub const DEFAULT_STEPWISE_DISTANCE: i32 = 2;

#[derive(Debug, Clone)]
pub struct SequenceGenerator<R: Rng = SmallRng> {
    pool: Vec<StaffNote>,
    previous: Option<StaffNote>,
    stepwise_bias: f64,
    stepwise_distance: i32,
    rng: R,
}

impl SequenceGenerator<SmallRng> {
    /// Generator seeded from the operating system
    pub fn new(pool: Vec<StaffNote>) -> Self {
        Self::with_rng(pool, SmallRng::from_os_rng())
    }

    /// Deterministic generator for tests and reproducible sessions
    pub fn with_seed(pool: Vec<StaffNote>, seed: u64) -> Self {
        Self::with_rng(pool, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SequenceGenerator<R> {
    pub fn with_rng(pool: Vec<StaffNote>, rng: R) -> Self {
        let pool = if pool.is_empty() {
            tracing::warn!("sequence generator built with an empty pool, using the default pool");
            note_space::default_pool()
        } else {
            pool
        };

        Self {
            pool,
            previous: None,
            stepwise_bias: DEFAULT_STEPWISE_BIAS,
            stepwise_distance: DEFAULT_STEPWISE_DISTANCE,
            rng,
        }
    }

    /// Override the stepwise preference (bias is clamped to 0..=1)
    pub fn with_stepwise(mut self, bias: f64, distance: i32) -> Self {
        self.stepwise_bias = if bias.is_finite() { bias.clamp(0.0, 1.0) } else { DEFAULT_STEPWISE_BIAS };
        self.stepwise_distance = distance.max(1);
        self
    }

    pub fn pool(&self) -> &[StaffNote] {
        &self.pool
    }

    pub fn previous(&self) -> Option<&StaffNote> {
        self.previous.as_ref()
    }

    /// Forget the previous note so the next draw is uniform again
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Slots within stepwise reach of `from`, excluding `from` itself
    pub fn nearby(&self, from: &StaffNote) -> Vec<StaffNote> {
        self.pool
            .iter()
            .filter(|n| *n != from && n.diatonic_distance(from) <= self.stepwise_distance)
            .copied()
            .collect()
    }

    /// Draw the next note of the walk.
    ///
    /// # Example
    /// ```
    /// use sightread::{note_space, Clef, SequenceGenerator};
    ///
    /// let mut generator = SequenceGenerator::with_seed(note_space::positions_for(Clef::Treble), 7);
    /// let first = generator.next_note();
    /// let second = generator.next_note();
    /// assert_ne!(first, second);
    /// ```
    pub fn next_note(&mut self) -> StaffNote {
        let next = self.pick();
        self.previous = Some(next);
        next
    }

    fn pick(&mut self) -> StaffNote {
        if self.pool.len() == 1 {
            return self.pool[0];
        }

        let Some(previous) = self.previous else {
            return self.pool.choose(&mut self.rng).copied().unwrap_or(self.pool[0]);
        };

        let mut candidates = Vec::new();
        if self.rng.random_bool(self.stepwise_bias) {
            candidates = self.nearby(&previous);
        }
        if candidates.is_empty() {
            candidates = self
                .pool
                .iter()
                .filter(|n| **n != previous)
                .copied()
                .collect();
        }

        candidates.choose(&mut self.rng).copied().unwrap_or(previous)
    }
}

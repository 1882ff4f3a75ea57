//! Injectable randomness for decisions, durations, and initial needs.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the random draws an occupant makes.
///
/// The simulation only ever asks for these two shapes of draw, so tests can
/// script them exactly with [`ScriptedRandom`].
pub trait RandomSource {
    /// Uniform real in `[lo, hi]`. Returns `lo` when the range is empty.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64;

    /// Uniform index in `[0, len)`. Returns 0 when `len` is 0.
    fn pick(&mut self, len: usize) -> usize;
}

/// Deterministic source backed by a seeded [`StdRng`].
///
/// # Examples
///
/// ```
/// use household_sim::sim::rng::{RandomSource, SeededRandom};
///
/// let mut a = SeededRandom::new(7);
/// let mut b = SeededRandom::new(7);
/// assert_eq!(a.pick(100), b.pick(100));
/// ```
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo {
            self.rng.random_range(lo..=hi)
        } else {
            lo
        }
    }

    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.rng.random_range(0..len)
        }
    }
}

/// Replays queued draws, falling back to the low end once exhausted.
///
/// Scripted picks are reduced modulo `len`; scripted reals are clamped into
/// the requested range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    picks: VecDeque<usize>,
    reals: VecDeque<f64>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    pub fn with_reals(mut self, reals: impl IntoIterator<Item = f64>) -> Self {
        self.reals.extend(reals);
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        match self.reals.pop_front() {
            Some(v) if hi > lo => v.clamp(lo, hi),
            _ => lo,
        }
    }

    fn pick(&mut self, len: usize) -> usize {
        match (self.picks.pop_front(), len) {
            (_, 0) => 0,
            (Some(v), len) => v % len,
            (None, _) => 0,
        }
    }
}

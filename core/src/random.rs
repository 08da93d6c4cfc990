use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::{RngExt, SeedableRng};

/// Uniform draw in `[0, 1)`; the only randomness the engines ever consume.
///
/// Passed into `Board::new` and `Board::shift` by the caller, so spawn
/// behavior is fully deterministic under a scripted source.
pub trait RandomSource {
    fn draw(&mut self) -> f64;
}

/// Production source backed by a seedable PRNG.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn draw(&mut self) -> f64 {
        self.rng.random()
    }
}

/// Replays a scripted list of draws, repeating the final draw once the list
/// is exhausted (an empty list always draws `0.0`).
#[derive(Clone, Debug, PartialEq)]
pub struct FixedSequence {
    draws: Vec<f64>,
    next: usize,
}

impl FixedSequence {
    pub fn new(draws: &[f64]) -> Self {
        Self {
            draws: draws.to_vec(),
            next: 0,
        }
    }
}

impl RandomSource for FixedSequence {
    fn draw(&mut self) -> f64 {
        match self.draws.get(self.next) {
            Some(&value) => {
                self.next += 1;
                value
            }
            None => self.draws.last().copied().unwrap_or(0.0),
        }
    }
}

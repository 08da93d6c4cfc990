#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use error::*;
pub use grid::*;
pub use guess::*;
pub use random::*;
pub use types::*;

mod error;
mod grid;
mod guess;
mod random;
mod types;

/// Board sizing for the sliding-tile game.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub size: Coord,
}

impl GridConfig {
    pub const fn new_unchecked(size: Coord) -> Self {
        Self { size }
    }

    pub fn new(size: Coord) -> Self {
        Self::new_unchecked(size.clamp(2, 16))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new_unchecked(4)
    }
}

/// Attempt-grid sizing for the word-guessing game.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuessConfig {
    pub word_length: Coord,
    pub max_attempts: Coord,
}

impl GuessConfig {
    pub const fn new_unchecked(word_length: Coord, max_attempts: Coord) -> Self {
        Self {
            word_length,
            max_attempts,
        }
    }

    pub fn new(word_length: Coord, max_attempts: Coord) -> Self {
        Self::new_unchecked(word_length.clamp(1, 16), max_attempts.clamp(1, 16))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.word_length, self.max_attempts)
    }
}

impl Default for GuessConfig {
    fn default() -> Self {
        Self::new_unchecked(5, 6)
    }
}

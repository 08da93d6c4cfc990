use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

pub use cell::*;

mod cell;

const LETTER_COUNT: usize = 26;

fn letter_index(letter: u8) -> usize {
    usize::from(letter - b'a')
}

/// Immutable word-guessing round. The target word and the dictionary
/// validation both live outside this engine: the caller fetches a target
/// before [`GuessState::new`] and confirms a completed row is a real word
/// before [`GuessState::press_enter`].
///
/// Every transition returns a brand-new state; ill-timed input (full row,
/// finished round, cursor at the edge) is the identity, never an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuessState {
    config: GuessConfig,
    target: String,
    grid: Array2<LetterCell>,
    current_attempt: Coord,
    cursor_col: Coord,
    wrong_letters: BTreeSet<char>,
    solved: bool,
}

impl GuessState {
    pub fn new(target: &str) -> Result<Self> {
        Self::with_config(target, GuessConfig::default())
    }

    pub fn with_config(target: &str, config: GuessConfig) -> Result<Self> {
        if !target.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(GameError::TargetNotAlphabetic);
        }
        if target.len() != usize::from(config.word_length) {
            return Err(GameError::TargetLengthMismatch);
        }

        Ok(Self {
            config,
            target: target.to_ascii_lowercase(),
            grid: Array2::default([
                usize::from(config.max_attempts),
                usize::from(config.word_length),
            ]),
            current_attempt: 1,
            cursor_col: 0,
            wrong_letters: BTreeSet::new(),
            solved: false,
        })
    }

    pub fn config(&self) -> GuessConfig {
        self.config
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// 1-based; `max_attempts + 1` once every row has been submitted.
    pub fn current_attempt(&self) -> Coord {
        self.current_attempt
    }

    pub fn cursor_column(&self) -> Coord {
        self.cursor_col
    }

    pub fn cell(&self, attempt_row: Coord, col: Coord) -> LetterCell {
        self.grid[(attempt_row, col).to_nd_index()]
    }

    pub fn wrong_guessed_letters(&self) -> impl Iterator<Item = char> {
        self.wrong_letters.iter().copied()
    }

    /// Whether the on-screen keyboard should gray this letter out.
    pub fn is_letter_disabled(&self, letter: char) -> bool {
        self.wrong_letters.contains(&letter.to_ascii_lowercase())
    }

    pub fn has_won(&self) -> bool {
        self.solved
    }

    pub fn has_lost(&self) -> bool {
        !self.solved && self.current_attempt > self.config.max_attempts
    }

    pub fn is_finished(&self) -> bool {
        self.solved || self.current_attempt > self.config.max_attempts
    }

    /// Place a letter at the cursor of the active row and advance.
    pub fn press_letter(&self, letter: char) -> Self {
        if self.is_finished() || self.cursor_col >= self.config.word_length {
            return self.clone();
        }
        if !letter.is_ascii_alphabetic() {
            return self.clone();
        }

        let mut next = self.clone();
        let cell = (next.current_attempt - 1, next.cursor_col);
        next.grid[cell.to_nd_index()] = LetterCell::pending(letter.to_ascii_lowercase());
        next.cursor_col += 1;
        next
    }

    /// Remove the letter immediately before the cursor.
    pub fn press_backspace(&self) -> Self {
        if self.is_finished() || self.cursor_col == 0 {
            return self.clone();
        }

        let mut next = self.clone();
        next.cursor_col -= 1;
        let cell = (next.current_attempt - 1, next.cursor_col);
        next.grid[cell.to_nd_index()] = LetterCell::empty();
        next
    }

    /// Finalize the active row. Only a completely filled row is evaluated;
    /// anything else is the identity. Scoring is two-pass so duplicate
    /// letters never claim more marks than the target holds: exact matches
    /// first consume from a per-letter pool, then remaining columns claim
    /// `Present` left to right while the pool lasts.
    pub fn press_enter(&self) -> Self {
        if self.is_finished() || self.cursor_col < self.config.word_length {
            return self.clone();
        }

        let mut next = self.clone();
        let row = usize::from(next.current_attempt - 1);
        let width = usize::from(next.config.word_length);

        let mut guess: SmallVec<[u8; 16]> = SmallVec::new();
        for col in 0..width {
            match next.grid[[row, col]].letter {
                Some(letter) => guess.push(letter as u8),
                None => return self.clone(),
            }
        }
        let target = next.target.as_bytes();

        let mut remaining = [0u8; LETTER_COUNT];
        for &letter in target {
            remaining[letter_index(letter)] += 1;
        }

        let mut status: SmallVec<[LetterStatus; 16]> = SmallVec::new();
        status.resize(width, LetterStatus::Unknown);
        for col in 0..width {
            if guess[col] == target[col] {
                status[col] = LetterStatus::Correct;
                remaining[letter_index(guess[col])] -= 1;
            }
        }
        for col in 0..width {
            if status[col].is_scored() {
                continue;
            }
            let pool = &mut remaining[letter_index(guess[col])];
            status[col] = if *pool > 0 {
                *pool -= 1;
                LetterStatus::Present
            } else {
                LetterStatus::Absent
            };
        }

        // only letters with no Correct or Present claim anywhere in this row
        // are confirmed absent and disable further input
        for col in 0..width {
            if status[col] != LetterStatus::Absent {
                continue;
            }
            let letter = guess[col];
            let claimed = (0..width).any(|other| {
                guess[other] == letter
                    && matches!(
                        status[other],
                        LetterStatus::Correct | LetterStatus::Present
                    )
            });
            if !claimed {
                next.wrong_letters.insert(letter as char);
            }
        }

        for col in 0..width {
            next.grid[[row, col]].status = status[col];
        }
        next.solved = status.iter().all(|&s| s == LetterStatus::Correct);
        next.current_attempt += 1;
        next.cursor_col = 0;
        log::debug!(
            "attempt {} submitted, solved: {}, {} letters ruled out",
            row + 1,
            next.solved,
            next.wrong_letters.len()
        );
        next
    }

    pub fn snapshot(&self) -> GuessSnapshot {
        GuessSnapshot {
            rows: self
                .grid
                .outer_iter()
                .map(|row| row.iter().copied().collect())
                .collect(),
            current_attempt: self.current_attempt,
            cursor_column: self.cursor_col,
            wrong_guessed_letters: self.wrong_letters.iter().copied().collect(),
            has_won: self.has_won(),
            has_lost: self.has_lost(),
        }
    }
}

/// Render-ready view of a round, returned by [`GuessState::snapshot`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuessSnapshot {
    pub rows: Vec<Vec<LetterCell>>,
    pub current_attempt: Coord,
    pub cursor_column: Coord,
    pub wrong_guessed_letters: Vec<char>,
    pub has_won: bool,
    pub has_lost: bool,
}

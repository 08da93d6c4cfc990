use serde::{Deserialize, Serialize};

/// Per-cell scoring outcome of a submitted attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterStatus {
    /// Not evaluated yet (row not submitted).
    Unknown,
    /// Right letter, right position.
    Correct,
    /// Right letter, wrong position.
    Present,
    /// Letter not available at that point.
    Absent,
}

impl LetterStatus {
    pub const fn is_scored(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl Default for LetterStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

/// One slot of the attempt grid: a typed letter plus its status.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterCell {
    pub letter: Option<char>,
    pub status: LetterStatus,
}

impl LetterCell {
    pub const fn empty() -> Self {
        Self {
            letter: None,
            status: LetterStatus::Unknown,
        }
    }

    pub const fn pending(letter: char) -> Self {
        Self {
            letter: Some(letter),
            status: LetterStatus::Unknown,
        }
    }
}

use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Target word length does not match the configured word length")]
    TargetLengthMismatch,
    #[error("Target word must consist of ASCII letters")]
    TargetNotAlphabetic,
}

pub type Result<T> = core::result::Result<T, GameError>;

use thiserror::Error;

use crate::model::{ColorId, Move};

/// Input that cannot describe a playable board. Raised before any search work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("tube capacity must be at least 1")]
    ZeroCapacity,
    #[error("a board needs at least one tube")]
    NoTubes,
    #[error("tube {tube} holds {len} units but capacity is {capacity}")]
    Overfull {
        tube: usize,
        len: usize,
        capacity: usize,
    },
    #[error("expected {expected} tubes, found {found}")]
    TubeCount { expected: usize, found: usize },
    #[error("color {color} is outside the {colors} colors of this puzzle")]
    UnknownColor { color: ColorId, colors: usize },
    #[error("color {color} has {found} units, expected {expected}")]
    ColorCount {
        color: ColorId,
        expected: usize,
        found: usize,
    },
    #[error("invalid color label {token:?}")]
    InvalidToken { token: String },
    #[error("tube {tube} has an empty slot below a colored unit")]
    Gap { tube: usize },
}

/// Why a pour was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error("tube index is out of range for {tube_count} tubes")]
    OutOfRange { tube_count: usize },
    #[error("source and destination are the same tube")]
    SameTube,
    #[error("source tube is empty")]
    EmptySource,
    #[error("destination tube is full")]
    FullDestination,
    #[error("top colors differ")]
    ColorMismatch,
}

/// A move was applied that `legal_moves` would never have produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal move {mv}: {reason}")]
pub struct IllegalMoveError {
    pub mv: Move,
    pub reason: MoveRejection,
}

//! First-class move types.
//!
//! A move is a domain event: a piece relocated from one square to another.
//! No legality is implied.

use crate::types::Square;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A relocation from one square to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Square the piece leaves.
    pub from: Square,
    /// Square the piece lands on.
    pub to: Square,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Returns the source square.
    pub fn from(&self) -> Square {
        self.from
    }

    /// Returns the destination square.
    pub fn to(&self) -> Square {
        self.to
    }
}

/// Long algebraic form, e.g. `e2e4`.
impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Error that can occur when checking or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// There is no piece on the source square.
    #[display("No piece on {}", _0)]
    EmptySource(Square),

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}

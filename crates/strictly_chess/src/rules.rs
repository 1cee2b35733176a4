//! Capability set shared by every game backend.
//!
//! Front ends talk to a `ChessRules` implementation chosen when the session
//! is built. [`PositionStore`] is the notation-tracking backend: it knows
//! where the pieces are but nothing about check, mate or draws. A rule-aware
//! backend plugs in behind the same trait.

use crate::action::Move;
use crate::store::PositionStore;
use crate::types::{Color, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Operations a game backend offers to its front end.
pub trait ChessRules {
    /// Returns to the start position with empty history.
    fn reset(&mut self);

    /// Applies a move, or returns `None` if the backend refuses it.
    fn make_move(&mut self, from: Square, to: Square) -> Option<Move>;

    /// Takes back the last move; `false` if there is none.
    fn undo(&mut self) -> bool;

    /// Notation of the current position.
    fn snapshot(&self) -> String;

    /// Side to move.
    fn side_to_move(&self) -> Color;

    /// Whether the side to move is in check.
    fn is_check(&self) -> bool;

    /// Whether the side to move is checkmated.
    fn is_checkmate(&self) -> bool;

    /// Whether the game is drawn.
    fn is_draw(&self) -> bool;

    /// Summarizes the position for a status line.
    #[instrument(skip(self))]
    fn status(&self) -> GameStatus {
        let side = self.side_to_move();
        if self.is_checkmate() {
            GameStatus::Checkmate(side)
        } else if self.is_draw() {
            GameStatus::Draw
        } else {
            GameStatus::InProgress {
                to_move: side,
                in_check: self.is_check(),
            }
        }
    }
}

/// Current status of the game, as shown to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress {
        /// Side to move.
        to_move: Color,
        /// Whether that side is in check.
        in_check: bool,
    },
    /// The given side is checkmated.
    Checkmate(Color),
    /// Game ended in a draw.
    Draw,
}

impl GameStatus {
    /// Returns true if the game is over.
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress { .. })
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::InProgress {
                to_move,
                in_check: false,
            } => write!(f, "{} to move", to_move),
            GameStatus::InProgress {
                to_move,
                in_check: true,
            } => write!(f, "{} to move, {} is in check", to_move, to_move),
            GameStatus::Checkmate(side) => write!(f, "Game over, {} is in checkmate.", side),
            GameStatus::Draw => write!(f, "Game over, drawn position."),
        }
    }
}

/// Notation-only backend: rule queries always answer `false`.
impl ChessRules for PositionStore {
    fn reset(&mut self) {
        PositionStore::reset(self)
    }

    fn make_move(&mut self, from: Square, to: Square) -> Option<Move> {
        PositionStore::make_move(self, from, to)
    }

    fn undo(&mut self) -> bool {
        PositionStore::undo(self)
    }

    fn snapshot(&self) -> String {
        PositionStore::snapshot(self)
    }

    fn side_to_move(&self) -> Color {
        PositionStore::side_to_move(self)
    }

    fn is_check(&self) -> bool {
        false
    }

    fn is_checkmate(&self) -> bool {
        false
    }

    fn is_draw(&self) -> bool {
        false
    }
}

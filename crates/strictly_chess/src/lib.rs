//! Strictly Chess - a chess position store with FEN snapshots
//!
//! This library tracks a chess position, serializes it to Forsyth-Edwards
//! Notation, and lets callers move pieces and take moves back. It performs
//! no legality checking: rule-aware backends plug in behind [`ChessRules`].
//!
//! # Architecture
//!
//! - **FEN codec**: [`decode`] and [`encode`] convert between notation and [`Position`]
//! - **Store**: [`PositionStore`] owns the position and an undo stack of snapshots
//! - **Rules**: [`ChessRules`] is the capability set front ends program against
//! - **Contracts**: move pre/postconditions and composable store invariants
//!
//! # Example
//!
//! ```
//! use strictly_chess::{PositionStore, Square};
//!
//! let mut store = PositionStore::new();
//! let e2 = Square::from_algebraic("e2").unwrap();
//! let e4 = Square::from_algebraic("e4").unwrap();
//!
//! store.make_move(e2, e4).unwrap();
//! assert_eq!(
//!     store.snapshot(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b - - 0 1"
//! );
//!
//! assert!(store.undo());
//! assert!(!store.undo());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod config;
mod contracts;
mod fen;
pub mod invariants;
mod rules;
mod store;
mod types;

// Crate-level exports - Board types
pub use types::{Board, Color, Piece, PieceKind, Rank, Square, SquareError, BOARD_SIZE};

// Crate-level exports - FEN codec
pub use fen::{decode, encode, FenError, Position, STARTING_FEN};

// Crate-level exports - Moves and contracts
pub use action::{Move, MoveError};
pub use contracts::{Contract, MoveContract, OnePlyRecorded, SourceOccupied};

// Crate-level exports - Store and configuration
pub use config::{ConfigError, StoreConfig};
pub use store::PositionStore;

// Crate-level exports - Rules capability set
pub use rules::{ChessRules, GameStatus};

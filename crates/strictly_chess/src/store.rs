//! Position store: the current position plus an undo stack of snapshots.

use crate::action::Move;
use crate::config::{ConfigError, StoreConfig};
use crate::contracts::{Contract, MoveContract};
use crate::fen::{decode, Position};
use crate::invariants::{InvariantSet, InvariantViolation, StoreInvariants};
use crate::types::{Board, Color, Square};
use tracing::{debug, instrument, warn};

/// Holds one game's position and its history.
///
/// Moves are applied without any legality checking: the only refusal is a
/// move from an empty square. Every applied move pushes the previous
/// snapshot, so [`undo`](Self::undo) always restores exactly one ply.
///
/// One store belongs to one session. Callers sharing a store across threads
/// must serialize access themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionStore {
    position: Position,
    start: Position,
    pub(crate) history: Vec<String>,
    check_invariants: bool,
}

impl PositionStore {
    /// Creates a store at the standard starting position.
    #[instrument]
    pub fn new() -> Self {
        let config = StoreConfig::new();
        Self {
            position: Position::starting(),
            start: Position::starting(),
            history: Vec::new(),
            check_invariants: *config.check_invariants(),
        }
    }

    /// Creates a store from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configured start position is not valid
    /// notation.
    #[instrument(skip(config))]
    pub fn with_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        let start = config.start()?;
        Ok(Self {
            position: start.clone(),
            start,
            history: Vec::new(),
            check_invariants: *config.check_invariants(),
        })
    }

    /// Returns to the start position and clears the history.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.position = self.start.clone();
        self.history.clear();
        debug!(snapshot = %self.position, "Store reset");
    }

    /// Moves whatever stands on `from` to `to`.
    ///
    /// Returns `None` without touching anything if `from` is empty, or if a
    /// move by black would overflow the fullmove number. A piece on `to` is
    /// overwritten. Turn order is not enforced.
    #[instrument(skip(self), fields(side = %self.position.side_to_move()))]
    pub fn make_move(&mut self, from: Square, to: Square) -> Option<Move> {
        let action = Move::new(from, to);
        if let Err(e) = MoveContract::pre(self, &action) {
            debug!(error = %e, "Move declined");
            return None;
        }

        let mut next = self.position.clone();
        let board = next.board_mut();
        let piece = board.set(from, None);
        board.set(to, piece);
        if next.pass_turn().is_none() {
            warn!(fullmove = self.position.fullmove_number(), "Fullmove number would overflow");
            return None;
        }

        self.history.push(self.position.to_fen());
        let before = std::mem::replace(&mut self.position, next);

        if self.check_invariants
            && let Err(e) = MoveContract::post(&before, self)
        {
            warn!(error = %e, "Rolling back move");
            self.position = before;
            self.history.pop();
            return None;
        }

        debug!(history_len = self.history.len(), "Move applied");
        Some(action)
    }

    /// Restores the position before the most recent move.
    ///
    /// Returns `false` if there is nothing to undo.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.last() else {
            debug!("Nothing to undo");
            return false;
        };

        match decode(snapshot) {
            Ok(position) => {
                self.position = position;
                self.history.pop();
                debug!(history_len = self.history.len(), "Move undone");
                true
            }
            Err(e) => {
                warn!(error = %e, "History snapshot is corrupt, keeping current position");
                false
            }
        }
    }

    /// Encodes the current position.
    pub fn snapshot(&self) -> String {
        self.position.to_fen()
    }

    /// Returns the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        self.position.board()
    }

    /// Returns the side to move.
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    /// Returns the halfmove clock.
    pub fn halfmove_clock(&self) -> u32 {
        self.position.halfmove_clock()
    }

    /// Returns the fullmove number.
    pub fn fullmove_number(&self) -> u32 {
        self.position.fullmove_number()
    }

    /// Returns prior snapshots, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Number of moves that can be undone.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Checks every store invariant, walking the whole history.
    ///
    /// Costs O(history); moves only check what they changed.
    #[instrument(skip(self), fields(history_len = self.history.len()))]
    pub fn audit(&self) -> Result<(), Vec<InvariantViolation>> {
        StoreInvariants::check_all(self)
    }
}

impl Default for PositionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::STARTING_FEN;

    fn sq(rank: usize, file: usize) -> Square {
        Square::new(rank, file).unwrap()
    }

    #[test]
    fn test_new_store_is_at_start() {
        let store = PositionStore::new();
        assert_eq!(store.snapshot(), STARTING_FEN);
        assert_eq!(store.history_len(), 0);
    }

    #[test]
    fn test_move_pushes_snapshot() {
        let mut store = PositionStore::new();
        let applied = store.make_move(sq(6, 4), sq(4, 4));

        assert_eq!(applied, Some(Move::new(sq(6, 4), sq(4, 4))));
        assert_eq!(store.history(), &[STARTING_FEN.to_string()]);
        assert_eq!(store.side_to_move(), Color::Black);
    }

    #[test]
    fn test_empty_source_declined() {
        let mut store = PositionStore::new();
        assert_eq!(store.make_move(sq(4, 4), sq(3, 4)), None);
        assert_eq!(store.snapshot(), STARTING_FEN);
        assert_eq!(store.history_len(), 0);
    }

    #[test]
    fn test_halfmove_clock_untouched() {
        let config = StoreConfig::new().with_start_position("4k3/8/8/8/8/8/8/4K3 w - - 9 30");
        let mut store = PositionStore::with_config(&config).unwrap();
        store.make_move(sq(7, 4), sq(6, 4));
        assert_eq!(store.halfmove_clock(), 9);
    }

    #[test]
    fn test_reset_returns_to_configured_start() {
        let notation = "4k3/8/8/8/8/8/8/4K3 b - - 0 30";
        let config = StoreConfig::new().with_start_position(notation);
        let mut store = PositionStore::with_config(&config).unwrap();

        store.make_move(sq(0, 4), sq(1, 4));
        assert_eq!(store.fullmove_number(), 31);

        store.reset();
        assert_eq!(store.snapshot(), notation);
        assert_eq!(store.history_len(), 0);
    }

    #[test]
    fn test_corrupt_history_not_popped() {
        let mut store = PositionStore::new();
        store.history.push("garbage".to_string());

        assert!(!store.undo());
        assert_eq!(store.history_len(), 1);
        assert_eq!(store.snapshot(), STARTING_FEN);
    }

    #[test]
    fn test_black_move_at_counter_limit_declined() {
        let notation = "4k3/8/8/8/8/8/8/4K3 b - - 0 4294967295";
        for check_invariants in [true, false] {
            let config = StoreConfig::new()
                .with_start_position(notation)
                .with_check_invariants(check_invariants);
            let mut store = PositionStore::with_config(&config).unwrap();

            assert_eq!(store.make_move(sq(0, 4), sq(1, 4)), None);
            assert_eq!(store.snapshot(), notation);
            assert_eq!(store.history_len(), 0);
            assert!(!store.undo());
        }
    }

    #[test]
    fn test_white_move_at_counter_limit_undoable() {
        let notation = "4k3/8/8/8/8/8/8/4K3 w - - 0 4294967295";
        let config = StoreConfig::new().with_start_position(notation);
        let mut store = PositionStore::with_config(&config).unwrap();

        assert!(store.make_move(sq(7, 4), sq(6, 4)).is_some());
        assert_eq!(store.fullmove_number(), u32::MAX);
        assert!(store.undo());
        assert_eq!(store.snapshot(), notation);
    }

    #[test]
    fn test_long_game_keeps_full_history() {
        let mut store = PositionStore::new();
        let shuffle = [
            (sq(7, 6), sq(5, 5)),
            (sq(0, 6), sq(2, 5)),
            (sq(5, 5), sq(7, 6)),
            (sq(2, 5), sq(0, 6)),
        ];
        for (from, to) in shuffle.iter().cycle().take(400) {
            assert!(store.make_move(*from, *to).is_some());
        }

        assert_eq!(store.history_len(), 400);
        assert_eq!(store.fullmove_number(), 201);
        assert!(store.audit().is_ok());
    }

    #[test]
    fn test_audit_reports_corrupt_history() {
        let mut store = PositionStore::new();
        store.make_move(sq(6, 4), sq(4, 4));
        store.history.insert(0, "garbage".to_string());
        assert!(store.audit().is_err());
    }

    #[test]
    fn test_unchecked_store_behaves_the_same() {
        let config = StoreConfig::new().with_check_invariants(false);
        let mut checked = PositionStore::new();
        let mut unchecked = PositionStore::with_config(&config).unwrap();

        for store in [&mut checked, &mut unchecked] {
            store.make_move(sq(6, 4), sq(4, 4));
            store.make_move(sq(1, 4), sq(3, 4));
        }
        assert_eq!(checked.snapshot(), unchecked.snapshot());
        assert_eq!(checked.history(), unchecked.history());
    }
}

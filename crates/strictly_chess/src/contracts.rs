//! Contract-based validation for store transitions.
//!
//! Contracts pair a precondition checked before a transition with a
//! postcondition relating the state before and after it.

use crate::action::{Move, MoveError};
use crate::fen::{decode, Position};
use crate::invariants::{Invariant, SnapshotRoundTripInvariant};
use crate::store::PositionStore;
use crate::types::Piece;
use tracing::{instrument, warn};

/// A contract defines preconditions and postconditions for state transitions.
///
/// `Before` is what the postcondition needs to remember about the state
/// prior to the transition. It can be much smaller than `S`.
pub trait Contract<S, A> {
    /// State captured before the action for the postcondition.
    type Before;

    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &Self::Before, after: &S) -> Result<(), MoveError>;
}

/// Precondition: there must be a piece on the source square.
///
/// This is the only check a move is subject to.
pub struct SourceOccupied;

impl SourceOccupied {
    /// Returns the piece that would move.
    #[instrument(skip(store))]
    pub fn check(mov: &Move, store: &PositionStore) -> Result<Piece, MoveError> {
        store
            .board()
            .get(mov.from)
            .ok_or(MoveError::EmptySource(mov.from))
    }
}

/// Postcondition: exactly one ply was recorded.
///
/// The top history entry decodes to the pre-move position, the side to move
/// flipped, and the fullmove number advanced only if black moved. Only the
/// newest history entry is inspected.
pub struct OnePlyRecorded;

impl OnePlyRecorded {
    #[instrument(skip(before, after))]
    pub fn check(before: &Position, after: &PositionStore) -> Result<(), MoveError> {
        let pushed = after
            .history()
            .last()
            .and_then(|snapshot| decode(snapshot).ok())
            .is_some_and(|recorded| recorded == *before);
        let flipped = after.side_to_move() == before.side_to_move().opponent();
        let counted = before.next_fullmove_number() == Some(after.fullmove_number());

        if pushed && flipped && counted {
            Ok(())
        } else {
            warn!(pushed, flipped, counted, "Ply bookkeeping violated");
            Err(MoveError::InvariantViolation(
                "Move did not record exactly one ply".to_string(),
            ))
        }
    }
}

/// Contract for move actions.
///
/// Preconditions:
/// - Source square is occupied
///
/// Postconditions:
/// - One ply recorded
/// - Current snapshot round-trips
pub struct MoveContract;

impl Contract<PositionStore, Move> for MoveContract {
    type Before = Position;

    fn pre(store: &PositionStore, action: &Move) -> Result<(), MoveError> {
        SourceOccupied::check(action, store).map(|_| ())
    }

    fn post(before: &Position, after: &PositionStore) -> Result<(), MoveError> {
        OnePlyRecorded::check(before, after)?;
        if SnapshotRoundTripInvariant::holds(after) {
            Ok(())
        } else {
            Err(MoveError::InvariantViolation(format!(
                "Postcondition failed: {}",
                SnapshotRoundTripInvariant::description()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Square;

    fn mov(from: &str, to: &str) -> Move {
        Move::new(
            Square::from_algebraic(from).unwrap(),
            Square::from_algebraic(to).unwrap(),
        )
    }

    #[test]
    fn test_precondition_occupied_source() {
        let store = PositionStore::new();
        assert!(MoveContract::pre(&store, &mov("e2", "e4")).is_ok());
    }

    #[test]
    fn test_precondition_empty_source() {
        let store = PositionStore::new();
        assert!(matches!(
            MoveContract::pre(&store, &mov("e4", "e5")),
            Err(MoveError::EmptySource(_))
        ));
    }

    #[test]
    fn test_precondition_ignores_turn() {
        let store = PositionStore::new();
        assert!(MoveContract::pre(&store, &mov("e7", "e5")).is_ok());
    }

    #[test]
    fn test_postcondition_holds_after_move() {
        let mut store = PositionStore::new();
        let before = store.position().clone();
        let action = mov("e2", "e4");
        store.make_move(action.from, action.to);

        assert!(MoveContract::post(&before, &store).is_ok());
    }

    #[test]
    fn test_postcondition_detects_missing_ply() {
        let store = PositionStore::new();
        let before = store.position().clone();

        assert!(matches!(
            MoveContract::post(&before, &store),
            Err(MoveError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_postcondition_detects_wrong_recorded_snapshot() {
        let mut store = PositionStore::new();
        store.make_move(Square::new(6, 4).unwrap(), Square::new(4, 4).unwrap());
        let wrong_before = Position::starting();
        store.history.pop();
        store
            .history
            .push("8/8/8/8/8/8/8/8 w - - 0 1".to_string());

        assert!(MoveContract::post(&wrong_before, &store).is_err());
    }

    #[test]
    fn test_postcondition_at_counter_limit() {
        let position = decode("4k3/8/8/8/8/8/8/4K3 b - - 0 4294967295").unwrap();
        assert_eq!(position.next_fullmove_number(), None);

        let store = PositionStore::new();
        assert!(OnePlyRecorded::check(&position, &store).is_err());
    }
}

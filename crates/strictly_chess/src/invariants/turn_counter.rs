//! Turn counter invariant: sides alternate ply by ply through the history.

use super::Invariant;
use crate::fen::{decode, Position};
use crate::store::PositionStore;

/// Invariant: each recorded ply flips the side to move, and the fullmove
/// number grows by one exactly when black hands the move back to white.
///
/// Undecodable history entries are skipped; they are reported by
/// [`HistoryDecodableInvariant`](super::HistoryDecodableInvariant).
pub struct TurnCounterInvariant;

impl Invariant<PositionStore> for TurnCounterInvariant {
    fn holds(store: &PositionStore) -> bool {
        let mut chain: Vec<Position> = store
            .history()
            .iter()
            .filter_map(|snapshot| decode(snapshot).ok())
            .collect();
        chain.push(store.position().clone());

        chain.windows(2).all(|pair| {
            let (before, after) = (&pair[0], &pair[1]);
            after.side_to_move() == before.side_to_move().opponent()
                && before.next_fullmove_number() == Some(after.fullmove_number())
        })
    }

    fn description() -> &'static str {
        "Side to move alternates and fullmove number counts black's moves"
    }
}

//! Snapshot round-trip invariant: the current snapshot decodes back to the
//! current position and re-encodes to the same text.

use super::Invariant;
use crate::fen::decode;
use crate::store::PositionStore;

/// Invariant: `encode(decode(snapshot)) == snapshot` for the live position.
pub struct SnapshotRoundTripInvariant;

impl Invariant<PositionStore> for SnapshotRoundTripInvariant {
    fn holds(store: &PositionStore) -> bool {
        let snapshot = store.snapshot();
        match decode(&snapshot) {
            Ok(position) => position == *store.position() && position.to_fen() == snapshot,
            Err(_) => false,
        }
    }

    fn description() -> &'static str {
        "Snapshot decodes to the current position and re-encodes unchanged"
    }
}

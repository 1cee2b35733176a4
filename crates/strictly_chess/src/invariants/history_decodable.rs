//! History invariant: every stored snapshot is valid notation.

use super::Invariant;
use crate::fen::decode;
use crate::store::PositionStore;

/// Invariant: every history entry decodes, so any undo can restore it.
pub struct HistoryDecodableInvariant;

impl Invariant<PositionStore> for HistoryDecodableInvariant {
    fn holds(store: &PositionStore) -> bool {
        store.history().iter().all(|snapshot| decode(snapshot).is_ok())
    }

    fn description() -> &'static str {
        "Every history snapshot is decodable"
    }
}

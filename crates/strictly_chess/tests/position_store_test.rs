//! Tests for the position store.

use strictly_chess::{
    ChessRules, Color, PositionStore, Square, StoreConfig, STARTING_FEN,
};
use tracing_subscriber::EnvFilter;

fn sq(rank: usize, file: usize) -> Square {
    Square::new(rank, file).unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_reset_gives_standard_start() {
    init_tracing();
    let mut store = PositionStore::new();
    store.make_move(sq(6, 4), sq(4, 4));
    store.reset();

    assert_eq!(store.snapshot(), STARTING_FEN);
    assert_eq!(
        store.snapshot(),
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1"
    );
    assert_eq!(store.history_len(), 0);
}

#[test]
fn test_king_pawn_opening() {
    init_tracing();
    let mut store = PositionStore::new();
    let applied = store.make_move(sq(6, 4), sq(4, 4)).expect("pawn on e2");

    assert_eq!(applied.from, sq(6, 4));
    assert_eq!(applied.to, sq(4, 4));
    assert_eq!(
        store.snapshot(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b - - 0 1"
    );
    assert_eq!(store.side_to_move(), Color::Black);
    assert_eq!(store.fullmove_number(), 1);
}

#[test]
fn test_undo_restores_exact_snapshot() {
    init_tracing();
    let mut store = PositionStore::new();
    let moves = [((6, 4), (4, 4)), ((1, 4), (3, 4)), ((7, 6), (5, 5)), ((0, 1), (2, 2))];

    for ((fr, ff), (tr, tf)) in moves {
        let before = store.snapshot();
        store.make_move(sq(fr, ff), sq(tr, tf)).expect("occupied source");
        let mut rewound = store.clone();
        assert!(rewound.undo());
        assert_eq!(rewound.snapshot(), before);
    }
}

#[test]
fn test_undo_one_ply_only() {
    init_tracing();
    let mut store = PositionStore::new();
    store.make_move(sq(6, 4), sq(4, 4));
    let after_first = store.snapshot();
    store.make_move(sq(1, 4), sq(3, 4));

    assert!(store.undo());
    assert_eq!(store.snapshot(), after_first);
    assert_eq!(store.history_len(), 1);
}

#[test]
fn test_undo_on_fresh_store() {
    let mut store = PositionStore::new();
    assert!(!store.undo());
    assert_eq!(store.snapshot(), STARTING_FEN);
}

#[test]
fn test_move_from_every_empty_square_is_noop() {
    let mut store = PositionStore::new();
    let target = sq(0, 0);

    for rank in 2..6 {
        for file in 0..8 {
            assert_eq!(store.make_move(sq(rank, file), target), None);
        }
    }
    assert_eq!(store.snapshot(), STARTING_FEN);
    assert_eq!(store.history_len(), 0);
}

#[test]
fn test_capture_discards_piece_and_undo_restores_it() {
    let mut store = PositionStore::new();
    let before = store.snapshot();

    // Rook takes the black rook straight through its own pawns.
    store.make_move(sq(7, 0), sq(0, 0)).unwrap();
    assert_eq!(store.board().piece_count(), 31);
    assert_eq!(
        store.snapshot(),
        "Rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/1NBQKBNR b - - 0 1"
    );

    assert!(store.undo());
    assert_eq!(store.snapshot(), before);
    assert_eq!(store.board().piece_count(), 32);
}

#[test]
fn test_turn_order_not_enforced() {
    let mut store = PositionStore::new();
    // Black piece moved on white's turn: accepted, side still flips.
    store.make_move(sq(1, 0), sq(2, 0)).unwrap();
    assert_eq!(store.side_to_move(), Color::Black);

    store.make_move(sq(1, 1), sq(2, 1)).unwrap();
    assert_eq!(store.side_to_move(), Color::White);
    assert_eq!(store.fullmove_number(), 2);
}

#[test]
fn test_move_to_same_square() {
    let mut store = PositionStore::new();
    let before_board = store.board().clone();
    store.make_move(sq(7, 1), sq(7, 1)).unwrap();

    assert_eq!(store.board(), &before_board);
    assert_eq!(store.side_to_move(), Color::Black);
    assert_eq!(store.history_len(), 1);
}

#[test]
fn test_no_redo_after_new_move() {
    let mut store = PositionStore::new();
    store.make_move(sq(6, 4), sq(4, 4));
    store.make_move(sq(1, 4), sq(3, 4));
    assert!(store.undo());

    store.make_move(sq(1, 3), sq(3, 3));
    assert_eq!(store.history_len(), 2);
    assert!(store.undo());
    assert!(store.undo());
    assert!(!store.undo());
    assert_eq!(store.snapshot(), STARTING_FEN);
}

#[test]
fn test_store_through_trait_object() {
    let mut backend: Box<dyn ChessRules> = Box::new(PositionStore::new());

    assert!(backend.make_move(sq(6, 3), sq(4, 3)).is_some());
    assert_eq!(backend.side_to_move(), Color::Black);
    assert!(!backend.is_check());
    assert!(!backend.is_checkmate());
    assert!(!backend.is_draw());
    assert_eq!(backend.status().to_string(), "Black to move");

    assert!(backend.undo());
    backend.reset();
    assert_eq!(backend.snapshot(), STARTING_FEN);
}

#[test]
fn test_store_from_bad_config() {
    let config = StoreConfig::new().with_start_position("not/a/position");
    assert!(PositionStore::with_config(&config).is_err());
}

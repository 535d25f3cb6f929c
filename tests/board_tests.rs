use chess_core::moves::{Move, MoveSpec};
use chess_core::perft::perft;
use chess_core::position::{Position, PositionStack};
use chess_core::tt::{ScorePrecision, TranspositionTable};
use chess_core::types::{Color, Piece, PieceKind};

struct TestPosition {
    name: &'static str,
    fen: &'static str,
    depths: &'static [(u32, u64)],
}

const TEST_POSITIONS: &[TestPosition] = &[
    TestPosition {
        name: "Initial Position",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        depths: &[(1, 20), (2, 400), (3, 8902), (4, 197_281)],
    },
    TestPosition {
        name: "Kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depths: &[(1, 48), (2, 2039), (3, 97_862)],
    },
    TestPosition {
        name: "Endgame",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        depths: &[(1, 14), (2, 191), (3, 2812)],
    },
];

#[test]
fn perft_positions() {
    for position in TEST_POSITIONS {
        let mut stack = PositionStack::new(Position::from_fen(position.fen).unwrap());
        for &(depth, expected) in position.depths {
            let nodes = perft(&mut stack, depth);
            assert_eq!(nodes, expected, "perft failed for {} at depth {depth}", position.name);
        }
    }
}

#[test]
fn fifty_move_counter_triggers_draw_detection() {
    let mut pos = Position::from_fen("8/8/8/8/8/8/8/K6k w - - 99 1").unwrap();
    assert!(!pos.is_fifty_move_draw());
    pos.ply_since_capture_or_pawn_move = 100;
    assert!(pos.is_fifty_move_draw());
}

#[test]
fn bare_kings_is_insufficient_material() {
    let pos = Position::from_fen("8/8/8/8/8/8/8/K6k w - - 0 1").unwrap();
    assert!(pos.has_insufficient_material());
}

#[test]
fn transposition_table_store_probe_respects_depth() {
    let mut tt = TranspositionTable::new(1);
    let hash = 0xdead_beef_u64;
    let mv = Move::new(MoveSpec {
        from: "e2".parse().unwrap(),
        to: "e4".parse().unwrap(),
        piece: Piece::of(PieceKind::Pawn, Color::White),
        ..Default::default()
    });

    tt.store(hash, 1, 100, ScorePrecision::Exact, Move::NULL);
    let entry = tt.probe(hash).expect("entry missing");
    assert_eq!(entry.depth, 1);

    tt.store(hash, 0, 50, ScorePrecision::Exact, mv);
    let entry = tt.probe(hash).expect("entry missing after shallower store");
    assert_eq!(entry.depth, 1, "a shallower search must not overwrite a deeper one");

    tt.store(hash, 5, 200, ScorePrecision::Exact, mv);
    let entry = tt.probe(hash).expect("entry missing after deeper store");
    assert_eq!(entry.depth, 5);
}

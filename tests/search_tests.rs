//! Search tests to verify the engine finds correct moves in various positions.

use chess_core::config::Config;
use chess_core::eval;
use chess_core::movegen;
use chess_core::position::{Position, PositionStack};
use chess_core::search::{Search, SearchLimits};
use chess_core::sync::StopFlag;
use chess_core::tt::TranspositionTable;

fn search_best_move(fen: &str, depth: u32) -> Option<chess_core::moves::Move> {
    let mut stack = PositionStack::new(Position::from_fen(fen).unwrap());
    let mut tt = TranspositionTable::new(16);
    let mut search = Search::new(&mut tt, StopFlag::new(), SearchLimits::depth(depth), &Config::default());
    search.iterative_deepening(&mut stack, |_| {})
}

fn is_checkmate(pos: &Position) -> bool {
    pos.king_in_check && movegen::legal_moves(pos).is_empty()
}

fn is_stalemate(pos: &Position) -> bool {
    !pos.king_in_check && movegen::legal_moves(pos).is_empty()
}

#[test]
fn finds_mate_in_one_back_rank() {
    let best = search_best_move("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1", 4);
    assert_eq!(best.map(|m| m.to_long_algebraic()), Some("e1e8".to_string()));
}

#[test]
fn finds_mate_in_one_queen() {
    let best = search_best_move("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 4", 4);
    assert_eq!(best.map(|m| m.to_long_algebraic()), Some("h5f7".to_string()));
}

#[test]
fn avoids_hanging_queen() {
    let best = search_best_move("r1bqkbnr/pppppppp/2n5/8/4P3/5Q2/PPPP1PPP/RNB1KBNR w KQkq - 0 3", 4);
    assert_ne!(best.map(|m| m.to_long_algebraic()), Some("f3c6".to_string()), "should not hang the queen on c6");
}

#[test]
fn captures_free_piece() {
    let best = search_best_move("rnbqk1nr/pppp1ppp/2b5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 4", 4)
        .expect("should find a move");
    assert!(best.is_capture() || best.to_long_algebraic() == "c4f7", "should capture material or threaten the king");
}

#[test]
fn iterative_deepening_results_stay_legal() {
    let root = Position::startpos();
    let legal = movegen::legal_moves(&root);

    let best2 = search_best_move(chess_core::position::STARTPOS_FEN, 2).expect("depth 2 should find a move");
    let best4 = search_best_move(chess_core::position::STARTPOS_FEN, 4).expect("depth 4 should find a move");

    assert!(legal.as_slice().contains(&best2), "depth 2 move should be legal");
    assert!(legal.as_slice().contains(&best4), "depth 4 move should be legal");
}

#[test]
fn single_legal_move() {
    let best = search_best_move("8/8/8/8/8/8/8/K6rk w - - 0 1", 4);
    assert_eq!(best.map(|m| m.to_long_algebraic()), Some("a1a2".to_string()));
}

#[test]
fn no_move_in_checkmate() {
    let pos = Position::from_fen("rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1").unwrap();
    assert!(is_checkmate(&pos), "position should be checkmate");
    assert_eq!(search_best_move("rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1", 4), None);
}

#[test]
fn handles_draw_by_repetition() {
    let mut stack = PositionStack::new(Position::startpos());
    let moves = ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8"];
    for text in moves {
        let mv = chess_core::engine::resolve_move(stack.current(), text).unwrap();
        stack.play_move(mv);
    }
    assert!(stack.is_repetition(2), "should be a draw by repetition");
}

#[test]
fn evaluation_symmetry() {
    let pos = Position::startpos();
    let (score, _) = eval::static_score(&pos, Config::default().tempo_bonus);
    assert!(score.abs() < 50, "starting position should be roughly equal (eval: {score})");
}

#[test]
fn evaluation_material_advantage() {
    let white_up = Position::from_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
    let (score_white_up, _) = eval::static_score(&white_up, Config::default().tempo_bonus);

    let black_up = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1").unwrap();
    let (score_black_up, _) = eval::static_score(&black_up, Config::default().tempo_bonus);

    assert!(score_white_up > 800, "white up a queen should be very positive (eval: {score_white_up})");
    assert!(score_black_up < -800, "black up a queen should be very negative (eval: {score_black_up})");
}

#[test]
fn search_completes_at_depth_6_within_budget() {
    use std::time::Instant;

    let start = Instant::now();
    let best = search_best_move(chess_core::position::STARTPOS_FEN, 6);
    let elapsed = start.elapsed();

    assert!(best.is_some(), "should find a move at depth 6");
    assert!(elapsed.as_secs() < 60, "search at depth 6 took too long: {elapsed:?}");
}

#[test]
fn identifies_stalemate() {
    let pos = Position::from_fen("k7/8/1QK5/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(is_stalemate(&pos), "position should be stalemate");
    assert!(!is_checkmate(&pos), "position should not be checkmate");
}

#[test]
fn fifty_move_rule() {
    let pos = Position::from_fen("8/8/8/8/8/8/8/K1k5 w - - 100 1").unwrap();
    assert!(pos.is_fifty_move_draw(), "position with 100-ply halfmove clock should be a draw");
}

#[test]
fn finds_a_move_in_a_sharp_position() {
    let best = search_best_move("6k1/pp4pp/8/8/8/8/PP4PP/1q4K1 b - - 0 1", 4);
    assert!(best.is_some(), "should find a move in this position");
}

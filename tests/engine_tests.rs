use std::sync::mpsc;
use std::time::Duration;

use chess_core::engine::{resolve_move, Engine, GoRequest};
use chess_core::position::Position;
use chess_core::types::Color;

#[test]
fn engine_depth_search_returns_move() {
    let mut engine = Engine::new();
    let (tx, rx) = mpsc::channel();
    engine.go(GoRequest { depth: Some(1), ..Default::default() }, |_| {}, move |best| {
        tx.send(best).unwrap();
    });
    let best = rx.recv_timeout(Duration::from_secs(5)).expect("search should finish");
    assert!(best.is_some(), "depth-1 search from the starting position should return a move");
}

#[test]
fn engine_time_limited_search_returns_within_budget() {
    let mut engine = Engine::new();
    let (tx, rx) = mpsc::channel();
    let start = std::time::Instant::now();
    engine.go(GoRequest { movetime_ms: Some(50), ..Default::default() }, |_| {}, move |best| {
        tx.send(best).unwrap();
    });
    let best = rx.recv_timeout(Duration::from_secs(5)).expect("time-limited search should finish");
    assert!(best.is_some());
    assert!(start.elapsed() < Duration::from_secs(2), "a 50ms movetime search should not run for seconds");
}

#[test]
fn set_position_and_stop_round_trip() {
    let mut engine = Engine::new();
    let e2e4 = resolve_move(&engine.current_position(), "e2e4").unwrap();
    engine.set_position(Position::startpos(), &[e2e4]);
    assert_eq!(engine.current_position().color_to_move, Color::Black);

    engine.stop();
    assert!(!engine.is_searching());
}

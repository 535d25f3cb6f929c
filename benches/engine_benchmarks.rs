//! Benchmarks for move generation, evaluation, perft, and search throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chess_core::config::Config;
use chess_core::movegen;
use chess_core::perft::perft;
use chess_core::position::{Position, PositionStack};
use chess_core::search::{Search, SearchLimits};
use chess_core::sync::StopFlag;
use chess_core::tt::TranspositionTable;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const MIDDLEGAME: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut stack = PositionStack::new(Position::startpos());
                perft(&mut stack, black_box(depth))
            })
        });
    }

    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut stack = PositionStack::new(Position::from_fen(KIWIPETE).unwrap());
                perft(&mut stack, black_box(depth))
            })
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let startpos = Position::startpos();
    group.bench_function("startpos", |b| b.iter(|| black_box(movegen::legal_moves(&startpos))));

    let middlegame = Position::from_fen(MIDDLEGAME).unwrap();
    group.bench_function("middlegame", |b| b.iter(|| black_box(movegen::legal_moves(&middlegame))));

    let kiwipete = Position::from_fen(KIWIPETE).unwrap();
    group.bench_function("kiwipete", |b| b.iter(|| black_box(movegen::legal_moves(&kiwipete))));

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for depth in [3u32, 4, 5] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut stack = PositionStack::new(Position::startpos());
                let mut tt = TranspositionTable::new(16);
                let mut search = Search::new(&mut tt, StopFlag::new(), SearchLimits::depth(depth), &Config::default());
                search.iterative_deepening(&mut stack, |_| {})
            })
        });
    }

    for depth in [3u32, 4] {
        group.bench_with_input(BenchmarkId::new("tactical", depth), &depth, |b, &depth| {
            b.iter(|| {
                let fen = "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4";
                let mut stack = PositionStack::new(Position::from_fen(fen).unwrap());
                let mut tt = TranspositionTable::new(16);
                let mut search = Search::new(&mut tt, StopFlag::new(), SearchLimits::depth(depth), &Config::default());
                search.iterative_deepening(&mut stack, |_| {})
            })
        });
    }

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    use chess_core::eval;

    let mut group = c.benchmark_group("eval");

    let positions = [
        ("startpos", "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
        ("middlegame", MIDDLEGAME),
        ("endgame", "8/5k2/8/8/8/8/5K2/4R3 w - - 0 1"),
    ];

    for (name, fen) in positions {
        let pos = Position::from_fen(fen).unwrap();
        group.bench_with_input(BenchmarkId::new("position", name), &pos, |b, pos| {
            b.iter(|| black_box(eval::static_score(pos, Config::default().tempo_bonus)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen, bench_search, bench_eval);
criterion_main!(benches);

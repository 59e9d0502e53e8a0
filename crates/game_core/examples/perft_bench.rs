//! Perft benchmark for profiling move generation across variants.
//!
//! Usage:
//!   cargo run --release --example perft_bench -p game_core -- [depth] [variant] [fen]
//!
//! Examples:
//!   # Default: depth 4 over the whole suite
//!   cargo run --release --example perft_bench -p game_core
//!
//!   # One variant's start position
//!   cargo run --release --example perft_bench -p game_core -- 5 atomic
//!
//!   # Custom position
//!   cargo flamegraph --example perft_bench -p game_core -- 4 crazyhouse "r1bqkbnr/pppp1ppp/2n5/4p3/3PP3/5N2/PPP2PPP/RNBQKB1R[Nb] b KQkq - 0 3"

use game_core::{perft, Position, Variant};
use std::env;
use std::process::ExitCode;
use std::time::{Duration, Instant};

const SUITE: &[(&str, Variant, &str)] = &[
    (
        "Start",
        Variant::Standard,
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ),
    (
        "Kiwipete",
        Variant::Standard,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
    (
        "Fischer random",
        Variant::Wild,
        "bqnb1rkr/pp3ppp/3ppn2/2p5/5P2/P2P4/NPP1P1PP/BQ1BNRKR w HFhf - 2 9",
    ),
    (
        "Crazyhouse middlegame",
        Variant::Crazyhouse,
        "r1bqkbnr/pppp1ppp/2n5/4p3/3PP3/5N2/PPP2PPP/RNBQKB1R[Nb] b KQkq - 0 3",
    ),
    (
        "Atomic start",
        Variant::Atomic,
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ),
    (
        "Suicide start",
        Variant::Suicide,
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
    ),
];

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let depth: u8 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(4);

    let Some(name) = args.get(2) else {
        run_suite(depth);
        return ExitCode::SUCCESS;
    };
    let variant = match name.parse::<Variant>() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let pos = match args.get(3) {
        Some(fen) => match Position::from_fen(variant, fen) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("bad FEN: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Position::startpos(variant),
    };
    run_single(pos, depth);
    ExitCode::SUCCESS
}

fn nps(nodes: u64, elapsed: Duration) -> f64 {
    if elapsed.as_secs_f64() > 0.0 {
        nodes as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    }
}

fn run_single(mut pos: Position, depth: u8) {
    println!("Variant: {}", pos.variant);
    println!("Position: {}", pos.to_fen());
    println!("Depth: {depth}");
    println!();

    if depth > 2 {
        let _ = perft(&mut pos, depth - 2);
    }

    let start = Instant::now();
    let nodes = perft(&mut pos, depth);
    let elapsed = start.elapsed();

    println!("Nodes: {nodes}");
    println!("Time: {elapsed:.3?}");
    println!("NPS: {:.0}", nps(nodes, elapsed));
}

fn run_suite(depth: u8) {
    println!("=== Perft Benchmark Suite ===");
    println!("Depth: {depth}");
    println!();

    let mut total_nodes = 0u64;
    let mut total_time = Duration::ZERO;

    for &(name, variant, fen) in SUITE {
        let mut pos = match Position::from_fen(variant, fen) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{name}: {e}");
                continue;
            }
        };

        print!("{name:.<30}");
        let start = Instant::now();
        let nodes = perft(&mut pos, depth);
        let elapsed = start.elapsed();
        total_nodes += nodes;
        total_time += elapsed;

        println!(
            " {nodes:>12} nodes in {elapsed:>8.3?} ({:>10.0} nps)",
            nps(nodes, elapsed)
        );
    }

    println!();
    println!("{:=<70}", "");
    println!(
        "TOTAL: {total_nodes} nodes in {total_time:.3?} ({:.0} nps)",
        nps(total_nodes, total_time)
    );
}

//! Draw and game-end detection through the public API: stalemate, the
//! fifty-move rule, repetition and insufficient material.

use game_core::{
    legal_moves, Color, DrawReason, Game, Outcome, PieceKind, Position, Variant,
};

fn standard(fen: &str) -> Position {
    Position::from_fen(Variant::Standard, fen).unwrap()
}

// =============================================================================
// Stalemate
// =============================================================================

#[test]
fn test_stalemate_king_in_corner() {
    let pos = standard("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");
    assert!(legal_moves(&pos).is_empty());
    assert!(!pos.in_check(Color::Black));

    let game = Game::from_position(pos);
    assert_eq!(game.outcome(), Some(Outcome::Stalemate));
}

#[test]
fn test_stalemate_king_and_pawn_endgame() {
    let game = Game::from_fen(Variant::Standard, "6k1/6P1/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(game.legal_moves().is_empty());
    assert_eq!(game.outcome(), Some(Outcome::Stalemate));
}

#[test]
fn test_checkmate_is_not_stalemate() {
    let fen = "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4";
    let game = Game::from_fen(Variant::Standard, fen).unwrap();
    assert!(game.legal_moves().is_empty());
    assert!(game.position().in_check(Color::Black));
    assert_eq!(
        game.outcome(),
        Some(Outcome::Checkmate {
            winner: Color::White
        })
    );
}

#[test]
fn test_check_is_not_checkmate() {
    let fen = "rnbqkbnr/ppppp1pp/8/5p1Q/4P3/8/PPPP1PPP/RNB1KBNR b KQkq - 1 2";
    let game = Game::from_fen(Variant::Standard, fen).unwrap();
    assert!(!game.legal_moves().is_empty());
    assert!(game.position().in_check(Color::Black));
    assert_eq!(game.outcome(), None);
}

// =============================================================================
// Fifty-move rule
// =============================================================================

#[test]
fn test_fifty_move_rule_threshold() {
    assert!(standard("8/8/8/4k3/8/4K3/8/8 w - - 100 60").is_fifty_move_draw());
    assert!(!standard("8/8/8/4k3/8/4K3/8/8 w - - 99 60").is_fifty_move_draw());
}

#[test]
fn test_fifty_move_rule_reached_by_play() {
    let mut game =
        Game::from_fen(Variant::Standard, "8/8/8/4k3/8/3K4/8/R7 w - - 99 60").unwrap();
    assert_eq!(game.outcome(), None);
    game.make_san("Ra2").unwrap();
    assert_eq!(game.outcome(), Some(Outcome::Draw(DrawReason::FiftyMoves)));
}

#[test]
fn test_pawn_move_resets_halfmove_clock() {
    let mut game =
        Game::from_fen(Variant::Standard, "8/8/8/4k3/8/3K4/4P3/8 w - - 99 60").unwrap();
    let pawn_move = game
        .legal_moves()
        .into_iter()
        .find(|m| m.piece() == PieceKind::Pawn)
        .unwrap();
    game.make_move(pawn_move).unwrap();
    assert_eq!(game.position().halfmove_clock, 0);
    assert!(!game.position().is_fifty_move_draw());

    game.unmake_last_move().unwrap();
    assert_eq!(game.position().halfmove_clock, 99);
}

// =============================================================================
// Insufficient material
// =============================================================================

#[test]
fn test_insufficient_material() {
    let drawn = [
        "8/8/8/4k3/8/4K3/8/8 w - - 0 1",
        "8/8/8/4k3/8/4KB2/8/8 w - - 0 1",
        "8/8/8/4k3/8/4KN2/8/8 w - - 0 1",
        "8/8/4b3/4k3/8/4K3/8/8 w - - 0 1",
        "8/8/4n3/4k3/8/4K3/8/8 w - - 0 1",
        // Both bishops on dark squares.
        "5b2/8/8/4k3/8/4K3/8/2B5 w - - 0 1",
    ];
    for fen in drawn {
        assert!(standard(fen).is_insufficient_material(), "{fen}");
    }
}

#[test]
fn test_sufficient_material() {
    let playable = [
        // Opposite-coloured bishops.
        "2b5/8/8/4k3/8/4K3/8/2B5 w - - 0 1",
        "8/8/8/4k3/8/4K3/4P3/8 w - - 0 1",
        "8/8/8/4k3/8/4K3/8/4R3 w - - 0 1",
        "8/8/8/4k3/8/4K3/8/4Q3 w - - 0 1",
        "8/8/8/4k3/8/4K3/3NN3/8 w - - 0 1",
    ];
    for fen in playable {
        assert!(!standard(fen).is_insufficient_material(), "{fen}");
    }
}

#[test]
fn test_pieces_in_hand_are_sufficient() {
    let zh = Position::from_fen(Variant::Crazyhouse, "8/8/8/4k3/8/4K3/8/8[P] w - - 0 1").unwrap();
    assert!(!zh.is_insufficient_material());
}

// =============================================================================
// Hashing and repetition
// =============================================================================

#[test]
fn test_position_hash_distinguishes_state() {
    let start = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";
    let base = standard(&format!("{start} w KQkq - 0 1")).hash();
    assert_eq!(base, Position::startpos(Variant::Standard).hash());
    assert_ne!(base, standard(&format!("{start} b KQkq - 0 1")).hash());
    assert_ne!(base, standard(&format!("{start} w Kq - 0 1")).hash());

    let with_ep = standard("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    let without_ep = standard("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
    assert_ne!(with_ep.hash(), without_ep.hash());
}

#[test]
fn test_hash_ignores_move_counters() {
    let a = standard("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
    let b = standard("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 6 5");
    assert_eq!(a.hash(), b.hash());
}

#[test]
fn test_hash_includes_reserve_in_drop_variants() {
    let empty = Position::from_fen(Variant::Crazyhouse, "4k3/8/8/8/8/8/8/4K3[] w - - 0 1").unwrap();
    let one = Position::from_fen(Variant::Crazyhouse, "4k3/8/8/8/8/8/8/4K3[P] w - - 0 1").unwrap();
    let two = Position::from_fen(Variant::Crazyhouse, "4k3/8/8/8/8/8/8/4K3[PP] w - - 0 1").unwrap();
    assert_ne!(empty.hash(), one.hash());
    assert_ne!(one.hash(), two.hash());
}

#[test]
fn test_threefold_repetition_by_knight_shuffle() {
    let mut game = Game::new(Variant::Standard);
    let shuffle = ["Nc3", "Nc6", "Nb1", "Nb8"];
    for san in shuffle {
        game.make_san(san).unwrap();
    }
    assert!(!game.is_threefold_repetition());
    for san in shuffle {
        game.make_san(san).unwrap();
    }
    assert!(game.is_threefold_repetition());
    assert_eq!(game.outcome(), Some(Outcome::Draw(DrawReason::Repetition)));

    // Rewinding the timeline forgets the later occurrences.
    game.replay_to(4).unwrap();
    assert!(!game.is_threefold_repetition());
    game.replay_to(8).unwrap();
    assert!(game.is_threefold_repetition());
}

#[test]
fn test_repetition_needs_same_hand() {
    // The same board with a different hand is a different position.
    let mut game = Game::new(Variant::Bughouse);
    let shuffle = ["Nc3", "Nc6", "Nb1", "Nb8"];
    for san in shuffle {
        game.make_san(san).unwrap();
    }
    assert!(game.receive_piece(Color::White, PieceKind::Pawn));
    for san in shuffle {
        game.make_san(san).unwrap();
    }
    assert!(!game.is_threefold_repetition());
}

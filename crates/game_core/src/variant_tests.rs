use super::*;

fn pos(variant: Variant, fen: &str) -> Position {
    Position::from_fen(variant, fen).unwrap()
}

#[test]
fn test_variant_names_round_trip() {
    for variant in Variant::ALL {
        assert_eq!(variant.name().parse::<Variant>(), Ok(variant));
        assert_eq!(variant.rules().variant(), variant);
    }
}

#[test]
fn test_variant_aliases() {
    assert_eq!("Chess960".parse::<Variant>(), Ok(Variant::Wild));
    assert_eq!("wild/fr".parse::<Variant>(), Ok(Variant::Wild));
    assert_eq!(" zh ".parse::<Variant>(), Ok(Variant::Crazyhouse));
    assert_eq!("giveaway".parse::<Variant>(), Ok(Variant::Suicide));
    assert_eq!("blitz".parse::<Variant>(), Ok(Variant::Standard));
    assert_eq!(
        "kriegspiel".parse::<Variant>(),
        Err(UnknownVariantError("kriegspiel".to_string()))
    );
}

#[test]
fn test_variant_capabilities() {
    assert!(Variant::Crazyhouse.has_drops());
    assert!(Variant::Bughouse.has_drops());
    assert!(!Variant::Atomic.has_drops());
    assert!(!Variant::Suicide.allows_castling());
    assert!(Variant::Losers.allows_castling());
    assert!(Variant::Losers.kings_capturable());
    assert!(!Variant::Standard.kings_capturable());
    assert_eq!(Variant::default(), Variant::Standard);
}

#[test]
fn test_outcome_result_tags() {
    assert_eq!(Outcome::Checkmate { winner: Color::White }.result_tag(), "1-0");
    let win = Outcome::VariantWin {
        winner: Color::Black,
        reason: WinReason::KingExploded,
    };
    assert_eq!(win.result_tag(), "0-1");
    assert_eq!(win.winner(), Some(Color::Black));
    assert_eq!(Outcome::Stalemate.result_tag(), "1/2-1/2");
    assert_eq!(Outcome::Draw(DrawReason::Repetition).winner(), None);
}

#[test]
fn test_standard_checkmate_and_stalemate() {
    // Fool's mate.
    let mated = pos(
        Variant::Standard,
        "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
    );
    assert_eq!(
        Variant::Standard.rules().is_terminal(&mated),
        Some(Outcome::Checkmate { winner: Color::Black })
    );

    let stalemate = pos(Variant::Standard, "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert_eq!(
        Variant::Standard.rules().is_terminal(&stalemate),
        Some(Outcome::Stalemate)
    );

    let start = Position::startpos(Variant::Standard);
    assert_eq!(Variant::Standard.rules().is_terminal(&start), None);
}

#[test]
fn test_crazyhouse_drop_escapes_mate() {
    // Back-rank mate, unless a piece in hand can be dropped in between.
    let standard = pos(Variant::Standard, "R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
    assert!(matches!(
        Variant::Standard.rules().is_terminal(&standard),
        Some(Outcome::Checkmate { .. })
    ));

    let zh = pos(Variant::Crazyhouse, "R5k1/5ppp/8/8/8/8/8/6K1[n] b - - 0 1");
    assert_eq!(Variant::Crazyhouse.rules().is_terminal(&zh), None);
}

#[test]
fn test_drop_targets_keep_pawns_off_back_ranks() {
    let zh = pos(Variant::Crazyhouse, "4k3/8/8/8/8/8/8/4K3[P] w - - 0 1");
    let targets = Variant::Crazyhouse.rules().drop_targets(&zh, Color::White);
    // 62 empty squares, 14 of them on the first and last ranks.
    assert_eq!(targets.len(), 48);
    assert!(targets
        .iter()
        .all(|&(to, kind)| kind == PieceKind::Pawn && (8..56).contains(&to)));

    // Nothing in black's hand.
    assert!(Variant::Crazyhouse.rules().drop_targets(&zh, Color::Black).is_empty());
    assert!(Variant::Standard.rules().drop_targets(&zh, Color::White).is_empty());
}

#[test]
fn test_atomic_adjacent_kings_are_never_in_check() {
    let rules = Variant::Atomic.rules();
    // Black rook on e8 would give check if the kings were apart.
    let touching = pos(Variant::Atomic, "4r3/8/8/8/8/8/3k4/4K3 w - - 0 1");
    assert!(!rules.in_check(&touching, Color::White));
    assert!(touching.in_check(Color::White));

    let apart = pos(Variant::Atomic, "4r3/8/8/8/8/8/8/k3K3 w - - 0 1");
    assert!(rules.in_check(&apart, Color::White));
}

#[test]
fn test_atomic_exploded_king_ends_game() {
    let no_black_king = pos(Variant::Atomic, "8/8/8/8/8/8/8/4K3 b - - 0 1");
    assert_eq!(
        Variant::Atomic.rules().is_terminal(&no_black_king),
        Some(Outcome::VariantWin {
            winner: Color::White,
            reason: WinReason::KingExploded,
        })
    );
}

#[test]
fn test_atomic_king_capture_ignores_check() {
    // White is in check from the rook but Qxe7 blows up the black king.
    let p = pos(Variant::Atomic, "4k3/4q3/8/8/7Q/8/8/r3K3 w - - 0 1");
    let rules = Variant::Atomic.rules();
    let mut scratch = p.clone();
    let mut moves = Vec::new();
    rules.generate_pseudo_legal(&p, &mut moves);
    let boom = moves
        .iter()
        .find(|m| m.from() == Some(31) && m.to() == 52)
        .unwrap();
    assert!(rules.is_king_safe_after(&mut scratch, boom));
    assert_eq!(scratch, p);
}

#[test]
fn test_suicide_outcomes() {
    let rules = Variant::Suicide.rules();

    let white_empty = pos(Variant::Suicide, "8/8/8/8/8/8/p7/8 w - - 0 1");
    assert_eq!(
        rules.is_terminal(&white_empty),
        Some(Outcome::VariantWin {
            winner: Color::White,
            reason: WinReason::AllMaterialLost,
        })
    );

    // White to move is blocked and has fewer pieces.
    let blocked = pos(Variant::Suicide, "8/8/8/8/p7/P7/8/7b w - - 0 1");
    assert_eq!(
        rules.is_terminal(&blocked),
        Some(Outcome::VariantWin {
            winner: Color::White,
            reason: WinReason::Stalemated,
        })
    );

    let equal = pos(Variant::Suicide, "8/8/8/8/p7/P7/8/8 w - - 0 1");
    assert_eq!(
        rules.is_terminal(&equal),
        Some(Outcome::Draw(DrawReason::EqualMaterial))
    );

    assert!(!rules.in_check(&pos(Variant::Suicide, "4k3/8/8/8/8/8/8/4R3 b - - 0 1"), Color::Black));
}

#[test]
fn test_losers_outcomes() {
    let rules = Variant::Losers.rules();

    let lone_king = pos(Variant::Losers, "4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
    assert_eq!(
        rules.is_terminal(&lone_king),
        Some(Outcome::VariantWin {
            winner: Color::Black,
            reason: WinReason::AllMaterialLost,
        })
    );

    let king_taken = pos(Variant::Losers, "8/8/8/8/8/8/8/R3K3 b - - 0 1");
    assert_eq!(
        rules.is_terminal(&king_taken),
        Some(Outcome::VariantWin {
            winner: Color::Black,
            reason: WinReason::KingCaptured,
        })
    );

    // Check is reported but staying in it is still allowed.
    let checked = pos(Variant::Losers, "4k3/8/8/8/8/8/8/4RK2 b - - 0 1");
    assert!(rules.in_check(&checked, Color::Black));
    let mut scratch = checked.clone();
    let along_file = Move::new(60, 52, PieceKind::King, Color::Black);
    assert!(rules.is_king_safe_after(&mut scratch, &along_file));
}

#[test]
fn test_giveaway_forced_capture() {
    let p = pos(Variant::Suicide, "8/8/8/3p4/4P3/8/8/N7 w - - 0 1");
    let mut moves = Vec::new();
    Variant::Suicide.rules().generate_pseudo_legal(&p, &mut moves);
    assert_eq!(moves.len(), 1);
    assert!(moves[0].is_capture());
}

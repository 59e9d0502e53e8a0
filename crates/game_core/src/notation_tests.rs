use super::*;
use crate::variant::Variant;

fn pos(variant: Variant, fen: &str) -> Position {
    Position::from_fen(variant, fen).unwrap()
}

fn san_of(p: &Position, uci: &str) -> String {
    let mv = parse_uci_move(p, uci).unwrap();
    encode_san(p, &mv)
}

#[test]
fn test_encode_basic_moves() {
    let start = Position::startpos(Variant::Standard);
    assert_eq!(san_of(&start, "e2e4"), "e4");
    assert_eq!(san_of(&start, "g1f3"), "Nf3");

    let p = pos(
        Variant::Standard,
        "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2",
    );
    assert_eq!(san_of(&p, "e4d5"), "exd5");
}

#[test]
fn test_encode_disambiguation() {
    // Knights on b1 and f1 both reach d2: file letter.
    let p = pos(Variant::Standard, "4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1");
    assert_eq!(san_of(&p, "b1d2"), "Nbd2");

    // Rooks on a1 and a5 share a file: rank digit.
    let p = pos(Variant::Standard, "4k3/8/8/R7/8/8/8/R3K3 w - - 0 1");
    assert_eq!(san_of(&p, "a1a3"), "R1a3");
    assert_eq!(san_of(&p, "a5a3"), "R5a3");

    // Three queens: file and rank together.
    let p = pos(Variant::Standard, "7k/8/8/8/Q1Q5/8/Q7/4K3 w - - 0 1");
    assert_eq!(san_of(&p, "a4b3"), "Qa4b3");
}

#[test]
fn test_encode_check_and_mate_suffixes() {
    let p = pos(Variant::Standard, "4k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
    assert_eq!(san_of(&p, "a1a8"), "Ra8+");
    assert_eq!(san_of(&p, "e1c1"), "O-O-O");

    let p = pos(Variant::Standard, "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    assert_eq!(san_of(&p, "a1a8"), "Ra8#");
}

#[test]
fn test_encode_promotion_and_drop() {
    let p = pos(Variant::Standard, "8/P3k3/8/8/8/8/8/4K3 w - - 0 1");
    assert_eq!(san_of(&p, "a7a8q"), "a8=Q");
    assert_eq!(san_of(&p, "a7a8n"), "a8=N");

    let zh = pos(Variant::Crazyhouse, "4k3/8/8/8/8/8/8/4K3[N] w - - 0 1");
    assert_eq!(san_of(&zh, "N@f6"), "N@f6+");
}

#[test]
fn test_decode_accepted_forms() {
    let start = Position::startpos(Variant::Standard);
    for text in ["e4", "e2e4", "e2-e4", "e4!?", "e4+"] {
        let mv = decode_san(&start, text).unwrap();
        assert_eq!(mv.uci(), "e2e4", "{text}");
        assert!(mv.is_double_pawn_push());
    }
    assert_eq!(decode_san(&start, "Nf3").unwrap().uci(), "g1f3");
    assert_eq!(decode_san(&start, "Ng1f3").unwrap().uci(), "g1f3");
    assert_eq!(decode_san(&start, "Ng1-f3").unwrap().uci(), "g1f3");
}

#[test]
fn test_decode_castling_spellings() {
    let p = pos(Variant::Standard, "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    for text in ["O-O", "0-0", "e1g1", "e1h1"] {
        assert!(decode_san(&p, text).unwrap().is_castle_kingside(), "{text}");
    }
    for text in ["O-O-O", "0-0-0", "e1c1", "e1a1"] {
        assert!(decode_san(&p, text).unwrap().is_castle_queenside(), "{text}");
    }
}

#[test]
fn test_decode_en_passant() {
    let p = pos(
        Variant::Standard,
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    );
    for text in ["exf6", "exf6 e.p.", "e5f6", "e5xf6"] {
        assert!(decode_san(&p, text).unwrap().is_en_passant(), "{text}");
    }
}

#[test]
fn test_decode_promotion_forms() {
    let p = pos(Variant::Standard, "8/P3k3/8/8/8/8/8/4K3 w - - 0 1");
    for text in ["a8=Q", "a8Q", "a7a8q", "a7-a8=Q"] {
        assert_eq!(
            decode_san(&p, text).unwrap().promoted_to(),
            Some(PieceKind::Queen),
            "{text}"
        );
    }
    assert_eq!(
        decode_san(&p, "a8"),
        Err(NotationError::Ambiguous {
            text: "a8".to_string(),
            candidates: 4,
        })
    );
}

#[test]
fn test_decode_drops() {
    let zh = pos(Variant::Crazyhouse, "4k3/8/8/8/8/8/8/4K3[NP] w - - 0 1");
    let mv = decode_san(&zh, "N@f3").unwrap();
    assert!(mv.is_drop());
    assert_eq!(mv.piece(), PieceKind::Knight);
    assert_eq!(decode_san(&zh, "@e4").unwrap().piece(), PieceKind::Pawn);
    assert_eq!(decode_san(&zh, "P@e4").unwrap().to(), 28);
    assert!(decode_san(&zh, "P@e8").is_err());
    assert!(decode_san(&zh, "B@e4").is_err());
}

#[test]
fn test_decode_ambiguous_and_unknown() {
    let p = pos(Variant::Standard, "4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1");
    assert_eq!(
        decode_san(&p, "Nd2"),
        Err(NotationError::Ambiguous {
            text: "Nd2".to_string(),
            candidates: 2,
        })
    );
    assert_eq!(decode_san(&p, "Nbd2").unwrap().from(), Some(1));
    assert_eq!(decode_san(&p, "Nfd2").unwrap().from(), Some(5));

    let start = Position::startpos(Variant::Standard);
    assert_eq!(
        decode_san(&start, "e5"),
        Err(NotationError::Unknown("e5".to_string()))
    );
    assert!(matches!(decode_san(&start, ""), Err(NotationError::Unknown(_))));
    assert!(matches!(decode_san(&start, "Zz9"), Err(NotationError::Unknown(_))));
    assert!(parse_uci_move(&start, "e2e5").is_none());
}

#[test]
fn test_san_round_trip_over_legal_moves() {
    let fens = [
        (Variant::Standard, "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"),
        (Variant::Standard, "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1"),
        (Variant::Crazyhouse, "r1bqkbnr/pppp1ppp/2n5/4p3/3PP3/5N2/PPP2PPP/RNBQKB1R[Nb] b KQkq - 0 3"),
        (Variant::Suicide, "8/P7/8/8/8/8/8/7n w - - 0 1"),
    ];
    for (variant, fen) in fens {
        let p = pos(variant, fen);
        for mv in legal_moves(&p) {
            let san = encode_san(&p, &mv);
            assert_eq!(decode_san(&p, &san), Ok(mv.clone()), "{fen}: {san}");
        }
    }
}

#[test]
fn test_losers_reports_check_suicide_does_not() {
    let losers = pos(Variant::Losers, "4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
    assert_eq!(san_of(&losers, "a1a8"), "Ra8+");
    let suicide = pos(Variant::Suicide, "4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
    assert_eq!(san_of(&suicide, "a1a8"), "Ra8");
}

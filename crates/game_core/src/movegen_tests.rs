use super::*;

fn pos(variant: Variant, fen: &str) -> Position {
    Position::from_fen(variant, fen).unwrap()
}

fn ucis(moves: &[Move]) -> Vec<String> {
    moves.iter().map(Move::uci).collect()
}

#[test]
fn test_startpos_moves() {
    let moves = legal_moves(&Position::startpos(Variant::Standard));
    // Starting position has 20 legal moves
    assert_eq!(moves.len(), 20);
}

#[test]
fn test_kiwipete_moves() {
    // Kiwipete position - complex with many move types
    let p = pos(
        Variant::Standard,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -",
    );
    let moves = legal_moves(&p);
    assert_eq!(moves.len(), 48);
    assert_eq!(moves.iter().filter(|m| m.is_castle()).count(), 2);
    assert_eq!(moves.iter().filter(|m| m.is_capture()).count(), 8);
}

#[test]
fn test_order_is_deterministic() {
    let p = Position::startpos(Variant::Standard);
    let first = ucis(&legal_moves(&p));
    let second = ucis(&legal_moves(&p));
    assert_eq!(first, second);
    assert_eq!(first[0], "b1a3");
    assert!(first.windows(2).all(|w| w[0] != w[1]));

    let keys: Vec<_> = legal_moves(&p).iter().map(Move::order_key).collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_pinned_pawn_cannot_move() {
    // 1.e4 e5 2.Qh5: the f7 pawn shields the king.
    let p = pos(
        Variant::Standard,
        "rnbqkbnr/pppp1ppp/8/4p2Q/4P3/8/PPPP1PPP/RNB1KBNR b KQkq - 1 2",
    );
    let moves = ucis(&legal_moves(&p));
    assert!(!moves.contains(&"f7f6".to_string()));
    assert!(!moves.contains(&"f7f5".to_string()));
    assert!(moves.contains(&"g7g6".to_string()));
}

#[test]
fn test_check_evasions_only() {
    let p = pos(Variant::Standard, "4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
    let moves = ucis(&legal_moves(&p));
    let mut sorted = moves.clone();
    sorted.sort();
    assert_eq!(sorted, vec!["e1d2", "e1e2", "e1f2"]);
}

#[test]
fn test_castling_blocked_or_attacked() {
    let blocked = pos(Variant::Standard, "r3k2r/8/8/8/8/8/8/R3K1NR w KQkq - 0 1");
    let moves = legal_moves(&blocked);
    assert!(!moves.iter().any(Move::is_castle_kingside));
    assert!(moves.iter().any(Move::is_castle_queenside));

    // The f8 rook covers f1.
    let attacked = pos(Variant::Standard, "r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1");
    let moves = legal_moves(&attacked);
    assert!(!moves.iter().any(Move::is_castle_kingside));
    assert!(moves.iter().any(Move::is_castle_queenside));

    // b1 may be attacked, only the king's path matters.
    let b_file = pos(Variant::Standard, "1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
    assert!(legal_moves(&b_file).iter().any(Move::is_castle_queenside));

    let in_check = pos(Variant::Standard, "r3k2r/8/8/8/8/8/8/R3K2r w KQkq - 0 1");
    assert!(!legal_moves(&in_check).iter().any(Move::is_castle));
}

#[test]
fn test_fischer_random_castling() {
    // King b1 with the queenside rook on a1: O-O-O swaps them onto c1/d1.
    let p = pos(Variant::Wild, "rk5r/8/8/8/8/8/8/RK5R w KQkq - 0 1");
    let castles: Vec<Move> = legal_moves(&p).into_iter().filter(Move::is_castle).collect();
    assert_eq!(castles.len(), 2);
    let long = castles.iter().find(|m| m.is_castle_queenside()).unwrap();
    assert_eq!((long.from(), long.to()), (Some(1), 2));
    let short = castles.iter().find(|m| m.is_castle_kingside()).unwrap();
    assert_eq!((short.from(), short.to()), (Some(1), 6));
}

#[test]
fn test_en_passant_requires_victim() {
    let p = pos(
        Variant::Standard,
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    );
    let ep: Vec<Move> = legal_moves(&p).into_iter().filter(Move::is_en_passant).collect();
    assert_eq!(ep.len(), 1);
    assert_eq!(ep[0].uci(), "e5f6");
    assert_eq!(ep[0].ep_target(), Some(37));

    // Stale target with no pawn beside it.
    let stale = pos(Variant::Standard, "4k3/8/8/4P3/8/8/8/4K3 w - f6 0 1");
    assert!(!legal_moves(&stale).iter().any(Move::is_en_passant));
}

#[test]
fn test_promotions() {
    let p = pos(Variant::Standard, "4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
    let promos: Vec<_> = legal_moves(&p)
        .into_iter()
        .filter(Move::is_promotion)
        .filter_map(|m| m.promoted_to())
        .collect();
    assert_eq!(
        promos,
        vec![PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen]
    );
}

#[test]
fn test_suicide_promotes_to_king() {
    let p = pos(Variant::Suicide, "8/P7/8/8/8/8/8/7n w - - 0 1");
    let promos: Vec<_> = legal_moves(&p).iter().filter_map(Move::promoted_to).collect();
    assert_eq!(promos.len(), 5);
    assert!(promos.contains(&PieceKind::King));

    let losers = pos(Variant::Losers, "4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
    assert!(!legal_moves(&losers)
        .iter()
        .any(|m| m.promoted_to() == Some(PieceKind::King)));
}

#[test]
fn test_giveaway_capture_is_compulsory() {
    // Capturing with the king is fine and still forced.
    let p = pos(Variant::Suicide, "8/8/8/8/8/8/3p4/4K3 w - - 0 1");
    assert_eq!(ucis(&legal_moves(&p)), vec!["e1d2"]);

    let losers = pos(Variant::Losers, "4k3/8/8/8/3p4/4P3/8/4K3 w - - 0 1");
    assert_eq!(ucis(&legal_moves(&losers)), vec!["e3d4"]);
}

#[test]
fn test_drops_respect_reserve_and_ranks() {
    let p = pos(Variant::Crazyhouse, "4k3/8/8/8/8/8/8/4K3[Pn] w - - 0 1");
    let drops: Vec<Move> = legal_moves(&p).into_iter().filter(Move::is_drop).collect();
    assert_eq!(drops.len(), 48);
    assert!(drops.iter().all(|m| m.piece() == PieceKind::Pawn));
    assert!(drops.iter().all(|m| (8..56).contains(&m.to())));

    // Drops come after board moves.
    let moves = legal_moves(&p);
    let first_drop = moves.iter().position(Move::is_drop).unwrap();
    assert!(moves[first_drop..].iter().all(Move::is_drop));
}

#[test]
fn test_drop_blocks_check() {
    let p = pos(Variant::Crazyhouse, "4k3/8/8/8/8/8/8/r3K3[N] w - - 0 1");
    let drops: Vec<String> = legal_moves(&p)
        .iter()
        .filter(|m| m.is_drop())
        .map(Move::uci)
        .collect();
    assert_eq!(drops, vec!["N@b1", "N@c1", "N@d1"]);
}

#[test]
fn test_bughouse_has_no_drops_without_reserve() {
    let p = Position::startpos(Variant::Bughouse);
    assert_eq!(legal_moves(&p).len(), 20);
}

#[test]
fn test_atomic_never_explodes_own_king() {
    // Rxd2 would blow up the white king on e1.
    let p = pos(Variant::Atomic, "7k/8/8/8/8/8/R2n4/4K3 w - - 0 1");
    let moves = legal_moves(&p);
    assert!(!moves.iter().any(|m| m.to() == 11));
    assert!(moves.iter().any(|m| m.from() == Some(8)));
}

#[test]
fn test_atomic_king_cannot_capture() {
    let p = pos(Variant::Atomic, "7k/8/8/8/8/8/3p4/4K3 w - - 0 1");
    assert!(!legal_moves(&p).iter().any(Move::is_capture));
}

#[test]
fn test_has_legal_move_and_is_legal() {
    let start = Position::startpos(Variant::Standard);
    assert!(has_legal_move(&start));
    let nf3 = Move::new(6, 21, PieceKind::Knight, Color::White);
    assert!(is_legal(&start, &nf3));
    assert!(!is_legal(&start, &Move::new(6, 22, PieceKind::Knight, Color::White)));

    let stalemate = pos(Variant::Standard, "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(!has_legal_move(&stalemate));
}

#[test]
fn test_legal_moves_into_reuses_buffer() {
    let mut p = Position::startpos(Variant::Standard);
    let before = p.clone();
    let mut buf = vec![Move::new(0, 1, PieceKind::Rook, Color::White)];
    legal_moves_into(&mut p, &mut buf);
    assert_eq!(buf.len(), 20);
    assert_eq!(p, before);
}

use super::*;

#[test]
fn test_coord_conversion() {
    assert_eq!(coord_to_sq("a1"), Some(0));
    assert_eq!(coord_to_sq("h8"), Some(63));
    assert_eq!(coord_to_sq("e4"), Some(28));
    assert_eq!(coord_to_sq("i1"), None);
    assert_eq!(coord_to_sq("a9"), None);
    assert_eq!(sq_to_coord(28), "e4");
}

#[test]
fn test_piece_codes() {
    for color in Color::BOTH {
        for kind in PieceKind::ALL {
            let pc = Piece::new(color, kind);
            assert_eq!(Piece::from_code(pc.code()), Some(pc));
        }
    }
    assert_eq!(PieceKind::from_code(0), None);
}

#[test]
fn test_promoted_mask_is_ignored_by_kind_lookup() {
    let raw = PieceKind::Queen.code() | PROMOTED_MASK;
    assert_eq!(PieceKind::from_code(raw), Some(PieceKind::Queen));
}

#[test]
fn test_fen_chars() {
    assert_eq!(
        Piece::from_fen_char('n'),
        Some(Piece::new(Color::Black, PieceKind::Knight))
    );
    assert_eq!(Piece::new(Color::White, PieceKind::Queen).fen_char(), 'Q');
    assert_eq!(Piece::from_fen_char('x'), None);
}

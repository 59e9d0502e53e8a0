//! Pseudo-legal generation and the legality filter.
//!
//! Generation walks the side to move's pieces in ascending square order; the
//! final legal list is sorted by [`Move::order_key`] so SAN disambiguation and
//! tests see the same sequence every time.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::board::{home_square, CastlingRights, Position};
use crate::chess_move::Move;
use crate::types::*;
use crate::variant::Variant;

const GIVEAWAY_PROMOTIONS: [PieceKind; 5] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

/// Generate all legal moves, returning a freshly allocated vector.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut tmp = pos.clone();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut out);
    out
}

/// Generate all legal moves into the provided buffer, reusing it across calls.
/// `pos` is left unchanged.
pub fn legal_moves_into(pos: &mut Position, out: &mut Vec<Move>) {
    out.clear();
    let rules = pos.variant.rules();
    rules.generate_pseudo_legal(pos, out);
    out.retain(|mv| rules.is_king_safe_after(pos, mv));
    out.sort_by_key(Move::order_key);
}

/// Whether the side to move has any legal move at all.
pub fn has_legal_move(pos: &Position) -> bool {
    let rules = pos.variant.rules();
    let mut candidates = Vec::with_capacity(64);
    rules.generate_pseudo_legal(pos, &mut candidates);
    let mut scratch = pos.clone();
    candidates
        .iter()
        .any(|mv| rules.is_king_safe_after(&mut scratch, mv))
}

/// Membership test against the legal set.
pub fn is_legal(pos: &Position, mv: &Move) -> bool {
    legal_moves(pos).contains(mv)
}

/// Board moves (no drops) for the side to move, ignoring king safety.
pub fn board_moves(pos: &Position, out: &mut Vec<Move>) {
    let us = pos.side_to_move;
    let occ = pos.occupied();
    let own = pos.occupied_by(us);

    for from in own {
        let Some(piece) = pos.piece_at(from) else {
            continue;
        };
        match piece.kind {
            PieceKind::Pawn => gen_pawn(pos, from, us, out),
            PieceKind::Knight => gen_targets(pos, from, piece.kind, knight_attacks(from) & !own, out),
            PieceKind::Bishop => {
                gen_targets(pos, from, piece.kind, bishop_attacks(from, occ) & !own, out)
            }
            PieceKind::Rook => gen_targets(pos, from, piece.kind, rook_attacks(from, occ) & !own, out),
            PieceKind::Queen => {
                gen_targets(pos, from, piece.kind, queen_attacks(from, occ) & !own, out)
            }
            PieceKind::King => {
                gen_targets(pos, from, piece.kind, king_attacks(from) & !own, out);
                gen_castle(pos, from, us, out);
            }
        }
    }
}

/// Raw capture code for whatever stands on `to` (0 if empty).
fn capture_code(pos: &Position, to: Square) -> u8 {
    match pos.piece_at(to) {
        Some(p) if pos.is_promoted(to) => p.kind.code() | PROMOTED_MASK,
        Some(p) => p.kind.code(),
        None => 0,
    }
}

fn gen_targets(pos: &Position, from: Square, kind: PieceKind, targets: Bitboard, out: &mut Vec<Move>) {
    let us = pos.side_to_move;
    for to in targets {
        out.push(Move::new(from, to, kind, us).with_capture(capture_code(pos, to)));
    }
}

fn push_pawn_move(mv: Move, promotions: &[PieceKind], out: &mut Vec<Move>) {
    let last_rank = match mv.color() {
        Color::White => 7,
        Color::Black => 0,
    };
    if rank_of(mv.to()) == last_rank {
        for &kind in promotions {
            out.push(mv.clone().with_promotion(kind));
        }
    } else {
        out.push(mv);
    }
}

fn gen_pawn(pos: &Position, from: Square, c: Color, out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);
    let dir = c.forward();
    let start_rank: i8 = match c {
        Color::White => 1,
        Color::Black => 6,
    };
    let promotions: &[PieceKind] = if pos.variant == Variant::Suicide {
        &GIVEAWAY_PROMOTIONS
    } else {
        &PieceKind::PROMOTIONS
    };

    // forward 1, then 2 from the start rank
    if let Some(to) = sq(f, r + dir) {
        if pos.piece_at(to).is_none() {
            push_pawn_move(Move::new(from, to, PieceKind::Pawn, c), promotions, out);
            if r == start_rank {
                if let Some(to2) = sq(f, r + 2 * dir) {
                    if pos.piece_at(to2).is_none() {
                        out.push(Move::new(from, to2, PieceKind::Pawn, c).with_double_push(to));
                    }
                }
            }
        }
    }

    // captures + en passant
    for to in pawn_attacks(from, c) {
        match pos.piece_at(to) {
            Some(target) if target.color != c => {
                let mv = Move::new(from, to, PieceKind::Pawn, c).with_capture(capture_code(pos, to));
                push_pawn_move(mv, promotions, out);
            }
            Some(_) => {}
            None if pos.en_passant == Some(to) => {
                let victim = Some(Piece::new(c.other(), PieceKind::Pawn));
                if let Some(cs) = sq(file_of(to), r) {
                    if pos.piece_at(cs) == victim {
                        out.push(Move::new(from, to, PieceKind::Pawn, c).with_en_passant(cs));
                    }
                }
            }
            None => {}
        }
    }
}

/// Back-rank squares from `a` to `b` inclusive.
fn span(a: Square, b: Square) -> Bitboard {
    let mut bb = Bitboard::EMPTY;
    for s in a.min(b)..=a.max(b) {
        bb.set(s);
    }
    bb
}

/// Castling for standard and Fischer-random setups. The king lands on the
/// g/c file and the rook on f/d whatever their starting files.
fn gen_castle(pos: &Position, from: Square, c: Color, out: &mut Vec<Move>) {
    if !pos.variant.allows_castling()
        || !pos.castling.intersects(CastlingRights::for_color(c))
        || from != pos.king_home(c)
    {
        return;
    }
    let rules = pos.variant.rules();
    // Can't castle out of check.
    if rules.in_check(pos, c) {
        return;
    }

    let enemy = c.other();
    for kingside in [true, false] {
        if !pos.castling.contains(CastlingRights::side(c, kingside)) {
            continue;
        }
        let rook_from = pos.rook_home(c, kingside);
        if pos.piece_at(rook_from) != Some(Piece::new(c, PieceKind::Rook)) {
            continue;
        }
        let king_to = home_square(c, if kingside { 6 } else { 2 });
        let rook_to = home_square(c, if kingside { 5 } else { 3 });

        let mut must_be_empty = span(from, king_to) | span(rook_from, rook_to);
        must_be_empty.clear(from);
        must_be_empty.clear(rook_from);
        if !(must_be_empty & pos.occupied()).is_empty() {
            continue;
        }
        if span(from, king_to).any(|s| s != from && rules.is_attacked(pos, s, enemy)) {
            continue;
        }
        out.push(Move::castle(from, king_to, c, kingside));
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;

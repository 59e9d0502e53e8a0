//! Attack tables and ray scans.
//!
//! Leaper attacks (knight, king, pawn) are built at compile time from their
//! offset lists. Sliders walk rays against an occupancy set; there is no
//! magic-bitboard machinery, move generation speed is not the bottleneck for
//! a client-side rules core.

use crate::bitboard::Bitboard;
use crate::types::{Color, Square, sq};

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

pub const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const fn leaper_table(offsets: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut s = 0usize;
    while s < 64 {
        let file = (s % 8) as i8;
        let rank = (s / 8) as i8;
        let mut bits = 0u64;
        let mut i = 0;
        while i < offsets.len() {
            let (df, dr) = offsets[i];
            let f = file + df;
            let r = rank + dr;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bits |= 1u64 << ((r * 8 + f) as u32);
            }
            i += 1;
        }
        table[s] = Bitboard(bits);
        s += 1;
    }
    table
}

static KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&KNIGHT_OFFSETS);
static KING_ATTACKS: [Bitboard; 64] = leaper_table(&KING_OFFSETS);
/// Indexed by `Color::idx()`.
static PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    leaper_table(&[(-1, 1), (1, 1)]),
    leaper_table(&[(-1, -1), (1, -1)]),
];

/// Squares a pawn of `color` on `sq` attacks.
#[inline(always)]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.idx()][sq as usize]
}

#[inline(always)]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq as usize]
}

#[inline(always)]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq as usize]
}

/// The 3×3 block centred on `sq`, i.e. everything an atomic capture on `sq`
/// can reach.
#[inline(always)]
pub fn blast_zone(sq: Square) -> Bitboard {
    KING_ATTACKS[sq as usize] | Bitboard::from_square(sq)
}

/// Walk each direction from `from` until the edge or the first occupied
/// square (which is included).
pub fn ray_attacks(from: Square, occupied: Bitboard, dirs: &[(i8, i8)]) -> Bitboard {
    let mut out = Bitboard::EMPTY;
    let f0 = (from % 8) as i8;
    let r0 = (from / 8) as i8;
    for &(df, dr) in dirs {
        let mut f = f0 + df;
        let mut r = r0 + dr;
        while let Some(to) = sq(f, r) {
            out.set(to);
            if occupied.contains(to) {
                break;
            }
            f += df;
            r += dr;
        }
    }
    out
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, &DIAGONALS)
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, &ORTHOGONALS)
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;

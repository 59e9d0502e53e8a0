//! Zobrist keys for position hashing.
//!
//! The key of a position is the XOR of random values for:
//! - each piece on each square (12 × 64)
//! - black to move
//! - each castling right (4)
//! - the en passant file (8)
//! - each non-zero reserve count, per color and droppable kind
//!
//! Threefold repetition compares these keys, so two positions that differ
//! only in what is held in hand never compare equal.

use crate::types::{Color, Piece, PieceKind, Square};

/// Highest distinct reserve count; larger counts share the last slot.
const MAX_RESERVE: usize = 31;

pub struct ZobristKeys {
    /// Indexed by [color][piece_kind][square].
    pub pieces: [[[u64; 64]; 6]; 2],
    pub side_to_move: u64,
    /// [wk, wq, bk, bq]
    pub castling: [u64; 4],
    pub en_passant: [u64; 8],
    /// Indexed by [color][droppable kind][count].
    pub reserve: [[[u64; MAX_RESERVE + 1]; 5]; 2],
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl ZobristKeys {
    /// Keys from a fixed-seed xorshift64 stream so hashes are stable across
    /// runs.
    pub const fn new() -> Self {
        const fn xorshift64(mut state: u64) -> u64 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        }

        let mut state = 0x123456789ABCDEF0u64;

        let mut pieces = [[[0u64; 64]; 6]; 2];
        let mut color = 0;
        while color < 2 {
            let mut piece = 0;
            while piece < 6 {
                let mut sq = 0;
                while sq < 64 {
                    state = xorshift64(state);
                    pieces[color][piece][sq] = state;
                    sq += 1;
                }
                piece += 1;
            }
            color += 1;
        }

        state = xorshift64(state);
        let side_to_move = state;

        let mut castling = [0u64; 4];
        let mut i = 0;
        while i < 4 {
            state = xorshift64(state);
            castling[i] = state;
            i += 1;
        }

        let mut en_passant = [0u64; 8];
        let mut i = 0;
        while i < 8 {
            state = xorshift64(state);
            en_passant[i] = state;
            i += 1;
        }

        let mut reserve = [[[0u64; MAX_RESERVE + 1]; 5]; 2];
        let mut color = 0;
        while color < 2 {
            let mut kind = 0;
            while kind < 5 {
                let mut n = 0;
                while n <= MAX_RESERVE {
                    state = xorshift64(state);
                    reserve[color][kind][n] = state;
                    n += 1;
                }
                kind += 1;
            }
            color += 1;
        }

        ZobristKeys {
            pieces,
            side_to_move,
            castling,
            en_passant,
            reserve,
        }
    }

    #[inline(always)]
    pub fn piece_key(&self, piece: Piece, sq: Square) -> u64 {
        self.pieces[piece.color.idx()][piece.kind.idx()][sq as usize]
    }

    /// Key for castling right index (0=wk, 1=wq, 2=bk, 3=bq).
    #[inline(always)]
    pub fn castling_key(&self, index: usize) -> u64 {
        self.castling[index]
    }

    #[inline(always)]
    pub fn ep_key(&self, file: u8) -> u64 {
        self.en_passant[file as usize]
    }

    /// Key for `color` holding `count` pieces of `kind`. Kings never sit in
    /// a reserve and hash to zero.
    #[inline]
    pub fn reserve_key(&self, color: Color, kind: PieceKind, count: u8) -> u64 {
        if kind == PieceKind::King {
            return 0;
        }
        let n = (count as usize).min(MAX_RESERVE);
        self.reserve[color.idx()][kind.idx()][n]
    }
}

/// Global keys, computed at compile time.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;

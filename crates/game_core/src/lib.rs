//! Rules core for multi-variant chess: positions, legal move generation for
//! standard, Fischer-random, crazyhouse, bughouse, atomic, suicide and losers
//! chess, a reversible game timeline, SAN/LAN notation and annotated PGN.

pub mod annotation;
pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod chess_move;
pub mod config;
pub mod error;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod perft;
pub mod pgn;
pub mod types;
pub mod variant;
pub mod zobrist;

pub use annotation::{Annotation, Arrow, ClockTime, Highlight, MarkColor, Nag, Subline};
pub use bitboard::Bitboard;
pub use board::{CastleFiles, CastlingRights, Position, Reserve, Undo, STARTING_FEN};
pub use chess_move::{Characteristics, Move};
pub use config::GameConfig;
pub use error::*;
pub use game::Game;
pub use movegen::{has_legal_move, is_legal, legal_moves, legal_moves_into};
pub use notation::{decode_san, encode_san, parse_uci_move};
pub use perft::{perft, perft_divide};
pub use pgn::{export_pgn, import_pgn, import_pgn_games};
pub use types::*;
pub use variant::{DrawReason, Outcome, Rules, Variant, WinReason};
pub use zobrist::ZOBRIST;

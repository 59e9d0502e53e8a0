//! Error types surfaced by the game core.

use thiserror::Error;

use crate::types::Color;

/// A move that is not in the legal set of the current position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal move {mv} for {side:?} in {fen}")]
pub struct IllegalMoveError {
    pub mv: String,
    pub side: Color,
    pub fen: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no moves to take back")]
pub struct EmptyTimelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("move index {index} is out of range (timeline has {len} moves)")]
pub struct ReplayRangeError {
    pub index: usize,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("'{text}' matches {candidates} legal moves")]
    Ambiguous { text: String, candidates: usize },
    #[error("'{0}' does not match any legal move")]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("FEN is missing the {0} field")]
    MissingField(&'static str),
    #[error("bad board layout: {0}")]
    BadBoard(String),
    #[error("unknown piece character '{0}'")]
    BadPiece(char),
    #[error("bad side to move '{0}'")]
    BadSideToMove(String),
    #[error("bad castling character '{0}'")]
    BadCastling(char),
    #[error("bad en passant square '{0}'")]
    BadEnPassant(String),
    #[error("bad move counter '{0}'")]
    BadCounter(String),
    #[error("bad holdings character '{0}'")]
    BadHoldings(char),
}

/// Failure while importing PGN text. No partial game is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("PGN parse error at ply {ply} near '{token}': {message}")]
pub struct PgnParseError {
    pub message: String,
    pub token: String,
    pub ply: usize,
}

impl PgnParseError {
    pub(crate) fn new(message: impl Into<String>, token: impl Into<String>, ply: usize) -> Self {
        PgnParseError {
            message: message.into(),
            token: token.into(),
            ply,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown variant '{0}'")]
pub struct UnknownVariantError(pub String);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config extension '{0}'")]
    Extension(String),
}

/// Umbrella error for callers that do not care which layer failed.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    IllegalMove(#[from] IllegalMoveError),
    #[error(transparent)]
    EmptyTimeline(#[from] EmptyTimelineError),
    #[error(transparent)]
    ReplayRange(#[from] ReplayRangeError),
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error(transparent)]
    Pgn(#[from] PgnParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

//! The game timeline: a starting position, the moves played from it, and a
//! cursor saying how many of them are currently applied.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::board::Position;
use crate::chess_move::Move;
use crate::config::GameConfig;
use crate::error::{
    EmptyTimelineError, FenError, GameError, IllegalMoveError, NotationError, ReplayRangeError,
};
use crate::movegen::legal_moves;
use crate::notation;
use crate::types::{Color, PieceKind};
use crate::variant::{DrawReason, Outcome, Variant};

#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    initial: Position,
    history: Vec<Move>,
    /// Number of `history` moves applied to `position`.
    cursor: usize,
    /// `hashes[i]` is the position key after `i` moves.
    hashes: Vec<u64>,
    tags: BTreeMap<String, String>,
}

impl Game {
    pub fn new(variant: Variant) -> Self {
        Self::from_position(Position::startpos(variant))
    }

    pub fn from_position(position: Position) -> Self {
        let hash = position.hash();
        Game {
            initial: position.clone(),
            position,
            history: Vec::new(),
            cursor: 0,
            hashes: vec![hash],
            tags: BTreeMap::new(),
        }
    }

    pub fn from_fen(variant: Variant, fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_position(Position::from_fen(variant, fen)?))
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, GameError> {
        let position = match (&config.fen, config.chess960_index) {
            (Some(fen), _) => Position::from_fen(config.variant, fen)?,
            (None, Some(index)) => Position::chess960(config.variant, index),
            (None, None) => Position::startpos(config.variant),
        };
        let mut game = Self::from_position(position);
        game.tags = config.tags.clone();
        Ok(game)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn initial_position(&self) -> &Position {
        &self.initial
    }

    pub fn variant(&self) -> Variant {
        self.position.variant
    }

    pub fn fen(&self) -> String {
        self.position.to_fen()
    }

    /// Every move on the timeline, including any beyond the cursor.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Moves currently applied to the position.
    pub fn moves_played(&self) -> &[Move] {
        &self.history[..self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Mutable access for annotating a recorded move. The move itself is
    /// frozen; only its annotations can change.
    pub fn move_at_mut(&mut self, index: usize) -> Option<&mut Move> {
        self.history.get_mut(index)
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    pub fn set_tag(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(name.into(), value.into());
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.position)
    }

    pub fn encode_san(&self, mv: &Move) -> String {
        notation::encode_san(&self.position, mv)
    }

    pub fn decode_san(&self, text: &str) -> Result<Move, NotationError> {
        notation::decode_san(&self.position, text)
    }

    /// Same position (and hand) for the third time since the start.
    pub fn is_threefold_repetition(&self) -> bool {
        let current = self.hashes[self.cursor];
        self.hashes[..=self.cursor]
            .iter()
            .filter(|&&h| h == current)
            .count()
            >= 3
    }

    /// Variant result first, then the draw rules.
    pub fn outcome(&self) -> Option<Outcome> {
        if let Some(outcome) = self.position.variant.rules().is_terminal(&self.position) {
            return Some(outcome);
        }
        if self.position.is_fifty_move_draw() {
            return Some(Outcome::Draw(DrawReason::FiftyMoves));
        }
        if self.is_threefold_repetition() {
            return Some(Outcome::Draw(DrawReason::Repetition));
        }
        let orthodox = matches!(self.variant(), Variant::Standard | Variant::Wild);
        if orthodox && self.position.is_insufficient_material() {
            return Some(Outcome::Draw(DrawReason::InsufficientMaterial));
        }
        None
    }

    // ---------------------------------------------------------------------
    // Timeline
    // ---------------------------------------------------------------------

    /// Play `candidate` if it names a legal move. The recorded move is the
    /// generator's copy (so its flags are authoritative) carrying the
    /// candidate's annotations. Any moves beyond the cursor are discarded.
    pub fn make_move(&mut self, mut candidate: Move) -> Result<(), IllegalMoveError> {
        let legal = self.legal_moves();
        let Some(found) = resolve(&legal, &candidate) else {
            warn!(
                mv = %candidate.lan(),
                fen = %self.position.to_fen(),
                "rejected illegal move"
            );
            return Err(IllegalMoveError {
                mv: candidate.lan(),
                side: self.position.side_to_move,
                fen: self.position.to_fen(),
            });
        };

        let mut mv = found.clone();
        mv.set_san(notation::encode_san_with(&self.position, &mv, &legal));
        for annotation in candidate.take_annotations() {
            mv.add_annotation(annotation);
        }

        self.truncate_future();
        self.position.apply_move(&mut mv);
        mv.freeze();
        debug!(ply = self.cursor + 1, mv = %mv, "move made");
        self.history.push(mv);
        self.cursor += 1;
        self.hashes.push(self.position.hash());
        Ok(())
    }

    /// Parse `text` against the current position and play it.
    pub fn make_san(&mut self, text: &str) -> Result<(), GameError> {
        let mv = self.decode_san(text)?;
        self.make_move(mv)?;
        Ok(())
    }

    /// Take back the move before the cursor and drop it from the timeline.
    pub fn unmake_last_move(&mut self) -> Result<Move, EmptyTimelineError> {
        if self.cursor == 0 {
            return Err(EmptyTimelineError);
        }
        self.truncate_future();
        let mv = self.history.pop().ok_or(EmptyTimelineError)?;
        self.position.revert_move(&mv);
        self.cursor -= 1;
        self.hashes.pop();
        debug!(ply = self.cursor + 1, mv = %mv, "move taken back");
        Ok(mv)
    }

    /// Move the cursor to `index` (0 = initial position) by stepping through
    /// the moves in between.
    pub fn replay_to(&mut self, index: usize) -> Result<(), ReplayRangeError> {
        if index > self.history.len() {
            return Err(ReplayRangeError {
                index,
                len: self.history.len(),
            });
        }
        let from = self.cursor;
        while self.cursor > index {
            self.cursor -= 1;
            self.position.revert_move(&self.history[self.cursor]);
            self.hashes[self.cursor] = self.position.hash();
        }
        while self.cursor < index {
            self.position.apply_move(&mut self.history[self.cursor]);
            self.cursor += 1;
            self.hashes[self.cursor] = self.position.hash();
        }
        debug!(from, to = index, "replayed");
        Ok(())
    }

    /// Bughouse: a piece captured on the partner board arrives in `color`'s
    /// hand. Returns false for variants without drops.
    ///
    /// The timeline does not record the transfer. The piece stays in hand
    /// while `replay_to` walks the moves, and the repetition hash of every
    /// ply the walk passes is refreshed from the live position.
    pub fn receive_piece(&mut self, color: Color, kind: PieceKind) -> bool {
        if !self.variant().has_drops() || kind == PieceKind::King {
            return false;
        }
        self.position.reserve.add(color, kind);
        self.hashes[self.cursor] = self.position.hash();
        true
    }

    fn truncate_future(&mut self) {
        self.history.truncate(self.cursor);
        self.hashes.truncate(self.cursor + 1);
    }
}

/// The legal move `candidate` stands for. An exact match wins; otherwise
/// the coordinates, piece and promotion must single out one move, which lets
/// callers pass a bare `Move::new` without the special-move flags. A field
/// the candidate leaves empty may be filled in, one it sets must agree.
fn resolve<'a>(legal: &'a [Move], candidate: &Move) -> Option<&'a Move> {
    if let Some(exact) = legal.iter().find(|m| *m == candidate) {
        return Some(exact);
    }
    let mut loose = legal.iter().filter(|m| {
        m.from() == candidate.from()
            && m.to() == candidate.to()
            && m.piece() == candidate.piece()
            && m.color() == candidate.color()
            && m.promoted_to() == candidate.promoted_to()
            && m.is_drop() == candidate.is_drop()
            && (candidate.capture_raw() == 0 || candidate.capture_raw() == m.capture_raw())
            && (candidate.ep_target().is_none() || candidate.ep_target() == m.ep_target())
            && m.characteristics().contains(candidate.characteristics())
    });
    match (loose.next(), loose.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;

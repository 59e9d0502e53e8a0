//! The compact description of one ply.
//!
//! A `Move` is produced by the generator or the notation decoder, carries an
//! undo snapshot once it has been applied, and is frozen when the timeline
//! takes ownership of it. Only annotations may change after that.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use bitflags::bitflags;

use crate::annotation::Annotation;
use crate::board::{CastlingRights, Undo};
use crate::types::*;

bitflags! {
    /// Special-move bits carried by every [`Move`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Characteristics: u8 {
        const CASTLE_KINGSIDE = 1;
        const CASTLE_QUEENSIDE = 2;
        const DOUBLE_PAWN_PUSH = 4;
        const PROMOTION = 8;
        const EN_PASSANT = 16;
        const DROP = 32;
    }
}

#[derive(Clone, Debug)]
pub struct Move {
    from: Option<Square>,
    to: Square,
    piece: PieceKind,
    color: Color,
    /// Raw capture code: `PieceKind::code()` plus [`PROMOTED_MASK`], 0 if none.
    capture: u8,
    promoted_to: Option<PieceKind>,
    /// Captured pawn's square for en passant, skipped square for a double push.
    ep_target: Option<Square>,
    characteristics: Characteristics,
    pub(crate) snapshot: Option<Undo>,
    san: Option<String>,
    pub(crate) annotations: Vec<Annotation>,
    frozen: bool,
}

impl Move {
    /// A plain, non-capturing board move.
    pub fn new(from: Square, to: Square, piece: PieceKind, color: Color) -> Self {
        Move {
            from: Some(from),
            to,
            piece,
            color,
            capture: 0,
            promoted_to: None,
            ep_target: None,
            characteristics: Characteristics::empty(),
            snapshot: None,
            san: None,
            annotations: Vec::new(),
            frozen: false,
        }
    }

    /// Place `piece` from the reserve onto `to`.
    pub fn new_drop(to: Square, piece: PieceKind, color: Color) -> Self {
        Move {
            from: None,
            characteristics: Characteristics::DROP,
            ..Move::new(to, to, piece, color)
        }
    }

    /// King move of a castle; `to` is the king's destination.
    pub fn castle(from: Square, to: Square, color: Color, kingside: bool) -> Self {
        let flag = if kingside {
            Characteristics::CASTLE_KINGSIDE
        } else {
            Characteristics::CASTLE_QUEENSIDE
        };
        Move {
            characteristics: flag,
            ..Move::new(from, to, PieceKind::King, color)
        }
    }

    pub fn with_capture(mut self, raw: u8) -> Self {
        self.capture = raw;
        self
    }

    pub fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promoted_to = Some(kind);
        self.characteristics |= Characteristics::PROMOTION;
        self
    }

    /// En-passant capture of the pawn standing on `captured_sq`.
    pub fn with_en_passant(mut self, captured_sq: Square) -> Self {
        self.capture = PieceKind::Pawn.code();
        self.ep_target = Some(captured_sq);
        self.characteristics |= Characteristics::EN_PASSANT;
        self
    }

    /// Two-square pawn advance over `skipped`.
    pub fn with_double_push(mut self, skipped: Square) -> Self {
        self.ep_target = Some(skipped);
        self.characteristics |= Characteristics::DOUBLE_PAWN_PUSH;
        self
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Origin square, `None` for drops.
    pub fn from(&self) -> Option<Square> {
        self.from
    }
    pub fn to(&self) -> Square {
        self.to
    }
    pub fn piece(&self) -> PieceKind {
        self.piece
    }
    pub fn color(&self) -> Color {
        self.color
    }
    pub fn promoted_to(&self) -> Option<PieceKind> {
        self.promoted_to
    }
    pub fn ep_target(&self) -> Option<Square> {
        self.ep_target
    }
    pub fn characteristics(&self) -> Characteristics {
        self.characteristics
    }

    /// Captured piece kind with the promotion tag masked off.
    pub fn capture(&self) -> Option<PieceKind> {
        PieceKind::from_code(self.capture & !PROMOTED_MASK)
    }

    /// Captured piece code including [`PROMOTED_MASK`].
    pub fn capture_raw(&self) -> u8 {
        self.capture
    }

    /// Whether the captured piece had reached its rank by promotion.
    pub fn capture_was_promoted(&self) -> bool {
        self.capture & PROMOTED_MASK != 0
    }

    pub fn captured_piece(&self) -> Option<Piece> {
        self.capture().map(|kind| Piece::new(self.color.other(), kind))
    }

    /// The kind a capture hands to a drop reserve: promoted pieces revert to
    /// pawns.
    pub fn capture_reserve_kind(&self) -> Option<PieceKind> {
        let kind = self.capture()?;
        if self.capture_was_promoted() {
            Some(PieceKind::Pawn)
        } else {
            Some(kind)
        }
    }

    pub fn is_capture(&self) -> bool {
        self.capture().is_some()
    }
    pub fn is_promotion(&self) -> bool {
        self.characteristics.contains(Characteristics::PROMOTION)
    }
    pub fn is_castle_kingside(&self) -> bool {
        self.characteristics
            .contains(Characteristics::CASTLE_KINGSIDE)
    }
    pub fn is_castle_queenside(&self) -> bool {
        self.characteristics
            .contains(Characteristics::CASTLE_QUEENSIDE)
    }
    pub fn is_castle(&self) -> bool {
        self.is_castle_kingside() || self.is_castle_queenside()
    }
    pub fn is_en_passant(&self) -> bool {
        self.characteristics.contains(Characteristics::EN_PASSANT)
    }
    pub fn is_double_pawn_push(&self) -> bool {
        self.characteristics
            .contains(Characteristics::DOUBLE_PAWN_PUSH)
    }
    pub fn is_drop(&self) -> bool {
        self.characteristics.contains(Characteristics::DROP)
    }
    pub fn is_whites_move(&self) -> bool {
        self.color == Color::White
    }

    pub fn san(&self) -> Option<&str> {
        self.san.as_deref()
    }

    /// Castling rights before this move was applied.
    pub fn prior_castling_rights(&self) -> Option<CastlingRights> {
        self.snapshot.as_ref().map(|u| u.castling)
    }

    /// Fifty-move counter before this move was applied.
    pub fn prior_halfmove_clock(&self) -> Option<u32> {
        self.snapshot.as_ref().map(|u| u.halfmove_clock)
    }

    pub fn prior_en_passant(&self) -> Option<Square> {
        self.snapshot.as_ref().and_then(|u| u.en_passant)
    }

    /// Full-move number this move was played on.
    pub fn full_move_number(&self) -> Option<u32> {
        self.snapshot.as_ref().map(|u| u.fullmove_number)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    // ---------------------------------------------------------------------
    // Mutation (only until the move is placed on a timeline)
    // ---------------------------------------------------------------------

    fn assert_mutable(&self) {
        assert!(
            !self.frozen,
            "move {} is frozen on a timeline and cannot be modified",
            self.lan()
        );
    }

    pub fn set_to(&mut self, to: Square) {
        self.assert_mutable();
        self.to = to;
    }

    pub fn set_capture(&mut self, raw: u8) {
        self.assert_mutable();
        self.capture = raw;
    }

    pub fn set_promoted_to(&mut self, kind: Option<PieceKind>) {
        self.assert_mutable();
        self.promoted_to = kind;
        self.characteristics
            .set(Characteristics::PROMOTION, kind.is_some());
    }

    pub fn set_ep_target(&mut self, target: Option<Square>) {
        self.assert_mutable();
        self.ep_target = target;
    }

    pub fn set_san(&mut self, san: impl Into<String>) {
        self.assert_mutable();
        self.san = Some(san.into());
    }

    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }

    // ---------------------------------------------------------------------
    // Text
    // ---------------------------------------------------------------------

    /// Long algebraic text built from this move's own fields.
    pub fn lan(&self) -> String {
        if self.is_castle_kingside() {
            return "O-O".to_string();
        }
        if self.is_castle_queenside() {
            return "O-O-O".to_string();
        }
        let mut s = String::with_capacity(8);
        match self.from {
            None => {
                s.push(self.piece.san_char());
                s.push('@');
                s.push_str(&sq_to_coord(self.to));
            }
            Some(from) => {
                s.push_str(&sq_to_coord(from));
                s.push(if self.is_capture() { 'x' } else { '-' });
                s.push_str(&sq_to_coord(self.to));
                if let Some(p) = self.promoted_to {
                    s.push('=');
                    s.push(p.san_char());
                }
            }
        }
        s
    }

    /// Coordinate text (`e2e4`, `e7e8q`, `N@f3`) for engines and servers.
    pub fn uci(&self) -> String {
        match self.from {
            None => format!("{}@{}", self.piece.san_char(), sq_to_coord(self.to)),
            Some(from) => {
                let mut s = sq_to_coord(from);
                s.push_str(&sq_to_coord(self.to));
                if let Some(p) = self.promoted_to {
                    s.push(p.san_char().to_ascii_lowercase());
                }
                s
            }
        }
    }

    /// Sort key for generation order: origin (drops last, by piece), then
    /// destination, then promotion piece.
    pub fn order_key(&self) -> (u8, u8, u8) {
        let origin = match self.from {
            Some(from) => from,
            None => 64 + self.piece.idx() as u8,
        };
        let promo = self.promoted_to.map_or(0, PieceKind::code);
        (origin, self.to, promo)
    }

    fn identity(&self) -> ((u8, u8, u8), u8, u8, u8, u8, u8) {
        (
            self.order_key(),
            self.characteristics.bits(),
            self.piece.code(),
            self.color.idx() as u8,
            self.capture,
            self.ep_target.map_or(u8::MAX, |s| s),
        )
    }
}

impl Move {
    /// Copy of the ply, snapshot and SAN included, without its annotations.
    pub(crate) fn clone_bare(&self) -> Move {
        Move {
            from: self.from,
            to: self.to,
            piece: self.piece,
            color: self.color,
            capture: self.capture,
            promoted_to: self.promoted_to,
            ep_target: self.ep_target,
            characteristics: self.characteristics,
            snapshot: self.snapshot.clone(),
            san: self.san.clone(),
            annotations: Vec::new(),
            frozen: self.frozen,
        }
    }
}

/// Value equality over the ply itself; snapshot, SAN cache and annotations
/// are ignored.
impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl PartialOrd for Move {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Move {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.san {
            Some(san) => f.write_str(san),
            None => f.write_str(&self.lan()),
        }
    }
}

#[cfg(test)]
#[path = "chess_move_tests.rs"]
mod chess_move_tests;

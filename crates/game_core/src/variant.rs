//! Variant tags and the rule-set capability trait.
//!
//! Each variant is a static strategy object implementing [`Rules`]. The
//! engine only ever talks to `pos.variant.rules()`, so the legality pipeline
//! (generate, filter by king safety, detect terminal positions) is the same
//! code for every variant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::chess_move::Move;
use crate::error::UnknownVariantError;
use crate::movegen;
use crate::types::{Color, PieceKind, Square};

mod atomic;
mod drops;
mod giveaway;
mod orthodox;

pub use atomic::AtomicRules;
pub use drops::DropRules;
pub use giveaway::GiveawayRules;
pub use orthodox::OrthodoxRules;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Standard,
    /// Standard rules from an arbitrary back-rank setup (Fischer random).
    Wild,
    Crazyhouse,
    Bughouse,
    Atomic,
    Suicide,
    Losers,
}

static STANDARD: OrthodoxRules = OrthodoxRules(Variant::Standard);
static WILD: OrthodoxRules = OrthodoxRules(Variant::Wild);
static CRAZYHOUSE: DropRules = DropRules(Variant::Crazyhouse);
static BUGHOUSE: DropRules = DropRules(Variant::Bughouse);
static ATOMIC: AtomicRules = AtomicRules;
static SUICIDE: GiveawayRules = GiveawayRules(Variant::Suicide);
static LOSERS: GiveawayRules = GiveawayRules(Variant::Losers);

impl Variant {
    pub const ALL: [Variant; 7] = [
        Variant::Standard,
        Variant::Wild,
        Variant::Crazyhouse,
        Variant::Bughouse,
        Variant::Atomic,
        Variant::Suicide,
        Variant::Losers,
    ];

    pub fn rules(self) -> &'static dyn Rules {
        match self {
            Variant::Standard => &STANDARD,
            Variant::Wild => &WILD,
            Variant::Crazyhouse => &CRAZYHOUSE,
            Variant::Bughouse => &BUGHOUSE,
            Variant::Atomic => &ATOMIC,
            Variant::Suicide => &SUICIDE,
            Variant::Losers => &LOSERS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Standard => "standard",
            Variant::Wild => "wild",
            Variant::Crazyhouse => "crazyhouse",
            Variant::Bughouse => "bughouse",
            Variant::Atomic => "atomic",
            Variant::Suicide => "suicide",
            Variant::Losers => "losers",
        }
    }

    /// Captured material can come back as drops.
    pub fn has_drops(self) -> bool {
        matches!(self, Variant::Crazyhouse | Variant::Bughouse)
    }

    pub fn allows_castling(self) -> bool {
        self != Variant::Suicide
    }

    /// Kings may be captured like any other piece.
    pub fn kings_capturable(self) -> bool {
        matches!(self, Variant::Suicide | Variant::Losers)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let variant = match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "chess" | "normal" | "blitz" | "lightning" | "standard chess" => {
                Variant::Standard
            }
            "wild" | "wild/fr" | "fr" | "chess960" | "fischerandom" | "fischer random" => {
                Variant::Wild
            }
            "crazyhouse" | "zh" => Variant::Crazyhouse,
            "bughouse" | "bug" => Variant::Bughouse,
            "atomic" => Variant::Atomic,
            "suicide" | "giveaway" | "antichess" => Variant::Suicide,
            "losers" => Variant::Losers,
            _ => return Err(UnknownVariantError(s.to_string())),
        };
        Ok(variant)
    }
}

/// How a finished position ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    VariantWin { winner: Color, reason: WinReason },
    Draw(DrawReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    /// Atomic: the loser's king was caught in an explosion.
    KingExploded,
    /// Losers: the winner's king was taken.
    KingCaptured,
    /// Suicide/losers: the winner has given away everything it can.
    AllMaterialLost,
    /// Suicide/losers: the winner could not move.
    Stalemated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawReason {
    FiftyMoves,
    Repetition,
    InsufficientMaterial,
    /// Suicide: blocked with equal piece counts.
    EqualMaterial,
}

impl Outcome {
    pub fn winner(&self) -> Option<Color> {
        match *self {
            Outcome::Checkmate { winner } | Outcome::VariantWin { winner, .. } => Some(winner),
            Outcome::Stalemate | Outcome::Draw(_) => None,
        }
    }

    /// PGN result token.
    pub fn result_tag(&self) -> &'static str {
        match self.winner() {
            Some(Color::White) => "1-0",
            Some(Color::Black) => "0-1",
            None => "1/2-1/2",
        }
    }
}

/// The capability set a variant plugs into the legality pipeline.
pub trait Rules: Send + Sync {
    fn variant(&self) -> Variant;

    /// Candidate moves for the side to move, ignoring king safety.
    fn generate_pseudo_legal(&self, pos: &Position, out: &mut Vec<Move>) {
        movegen::board_moves(pos, out);
        let us = pos.side_to_move;
        for (to, kind) in self.drop_targets(pos, us) {
            out.push(Move::new_drop(to, kind, us));
        }
    }

    /// Whether the mover's king survives `mv` under this variant's notion of
    /// safety. `pos` is restored before returning.
    fn is_king_safe_after(&self, pos: &mut Position, mv: &Move) -> bool {
        let mover = pos.side_to_move;
        let undo = pos.make_move(mv);
        let safe = !self.in_check(pos, mover);
        pos.unmake_move(mv, undo);
        safe
    }

    fn is_terminal(&self, pos: &Position) -> Option<Outcome> {
        orthodox_terminal(self, pos)
    }

    /// Squares and kinds `color` may drop right now.
    fn drop_targets(&self, _pos: &Position, _color: Color) -> Vec<(Square, PieceKind)> {
        Vec::new()
    }

    /// Attack query used for castling transit and check detection.
    fn is_attacked(&self, pos: &Position, sq: Square, by: Color) -> bool {
        pos.is_square_attacked(sq, by)
    }

    fn in_check(&self, pos: &Position, color: Color) -> bool {
        match pos.king_sq(color) {
            Some(ksq) => self.is_attacked(pos, ksq, color.other()),
            None => false,
        }
    }
}

/// Checkmate or stalemate once the side to move runs out of moves.
pub(crate) fn orthodox_terminal<R: Rules + ?Sized>(rules: &R, pos: &Position) -> Option<Outcome> {
    if movegen::has_legal_move(pos) {
        return None;
    }
    let us = pos.side_to_move;
    if rules.in_check(pos, us) {
        Some(Outcome::Checkmate { winner: us.other() })
    } else {
        Some(Outcome::Stalemate)
    }
}

#[cfg(test)]
#[path = "variant_tests.rs"]
mod variant_tests;

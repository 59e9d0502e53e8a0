use std::cmp::Ordering;

use super::{DrawReason, Outcome, Rules, Variant, WinReason};
use crate::board::Position;
use crate::chess_move::Move;
use crate::movegen;
use crate::types::Color;

/// Suicide and losers. Kings are ordinary, capturable pieces, so there is
/// no self-check filter, and a capture is compulsory whenever one exists.
///
/// Suicide has no castling and lets pawns promote to a king. Losers keeps
/// castling and reports check for display, but check never restricts a
/// move.
#[derive(Debug)]
pub struct GiveawayRules(pub(crate) Variant);

impl Rules for GiveawayRules {
    fn variant(&self) -> Variant {
        self.0
    }

    fn generate_pseudo_legal(&self, pos: &Position, out: &mut Vec<Move>) {
        movegen::board_moves(pos, out);
        if out.iter().any(Move::is_capture) {
            out.retain(Move::is_capture);
        }
    }

    fn is_king_safe_after(&self, _pos: &mut Position, _mv: &Move) -> bool {
        true
    }

    fn is_terminal(&self, pos: &Position) -> Option<Outcome> {
        match self.0 {
            Variant::Losers => losers_terminal(pos),
            _ => suicide_terminal(pos),
        }
    }

    fn in_check(&self, pos: &Position, color: Color) -> bool {
        self.0 == Variant::Losers && pos.in_check(color)
    }
}

fn suicide_terminal(pos: &Position) -> Option<Outcome> {
    let us = pos.side_to_move;
    for color in [us, us.other()] {
        if pos.occupied_by(color).is_empty() {
            return Some(Outcome::VariantWin {
                winner: color,
                reason: WinReason::AllMaterialLost,
            });
        }
    }
    if movegen::has_legal_move(pos) {
        return None;
    }
    // Blocked: the side with fewer pieces wins.
    let outcome = match pos.piece_count(us).cmp(&pos.piece_count(us.other())) {
        Ordering::Less => Outcome::VariantWin {
            winner: us,
            reason: WinReason::Stalemated,
        },
        Ordering::Greater => Outcome::VariantWin {
            winner: us.other(),
            reason: WinReason::Stalemated,
        },
        Ordering::Equal => Outcome::Draw(DrawReason::EqualMaterial),
    };
    Some(outcome)
}

fn losers_terminal(pos: &Position) -> Option<Outcome> {
    let us = pos.side_to_move;
    for color in [us, us.other()] {
        if pos.king_sq(color).is_none() {
            return Some(Outcome::VariantWin {
                winner: color,
                reason: WinReason::KingCaptured,
            });
        }
    }
    for color in [us, us.other()] {
        if pos.piece_count(color) == 1 {
            return Some(Outcome::VariantWin {
                winner: color,
                reason: WinReason::AllMaterialLost,
            });
        }
    }
    if movegen::has_legal_move(pos) {
        None
    } else {
        Some(Outcome::VariantWin {
            winner: us,
            reason: WinReason::Stalemated,
        })
    }
}

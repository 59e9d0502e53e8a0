use super::{orthodox_terminal, Outcome, Rules, Variant, WinReason};
use crate::attacks::king_attacks;
use crate::board::Position;
use crate::chess_move::Move;
use crate::movegen;
use crate::types::{Color, PieceKind, Square};

/// Atomic chess. Every capture explodes the 3×3 block around the target
/// square, taking out all non-pawns there along with the capturer. Kings
/// never capture, and kings standing next to each other cannot be checked.
#[derive(Debug)]
pub struct AtomicRules;

impl Rules for AtomicRules {
    fn variant(&self) -> Variant {
        Variant::Atomic
    }

    fn generate_pseudo_legal(&self, pos: &Position, out: &mut Vec<Move>) {
        movegen::board_moves(pos, out);
        out.retain(|mv| !(mv.piece() == PieceKind::King && mv.is_capture()));
    }

    fn is_king_safe_after(&self, pos: &mut Position, mv: &Move) -> bool {
        let mover = pos.side_to_move;
        let undo = pos.make_move(mv);
        let safe = match (pos.king_sq(mover), pos.king_sq(mover.other())) {
            (None, _) => false,
            // Blowing up the enemy king wins even out of check.
            (Some(_), None) => true,
            (Some(_), Some(_)) => !self.in_check(pos, mover),
        };
        pos.unmake_move(mv, undo);
        safe
    }

    fn is_terminal(&self, pos: &Position) -> Option<Outcome> {
        let us = pos.side_to_move;
        for (color, winner) in [(us, us.other()), (us.other(), us)] {
            if pos.king_sq(color).is_none() {
                return Some(Outcome::VariantWin {
                    winner,
                    reason: WinReason::KingExploded,
                });
            }
        }
        orthodox_terminal(self, pos)
    }

    fn is_attacked(&self, pos: &Position, sq: Square, by: Color) -> bool {
        pos.is_square_attacked_by(sq, by, false)
    }

    fn in_check(&self, pos: &Position, color: Color) -> bool {
        let (Some(ksq), Some(enemy)) = (pos.king_sq(color), pos.king_sq(color.other())) else {
            return false;
        };
        if king_attacks(ksq).contains(enemy) {
            return false;
        }
        self.is_attacked(pos, ksq, color.other())
    }
}

use super::{Rules, Variant};
use crate::bitboard::Bitboard;
use crate::board::Position;
use crate::types::{Color, PieceKind, Square};

/// Crazyhouse and bughouse: orthodox rules plus drops from the reserve.
///
/// Crediting captured material happens in `Position::make_move` for
/// crazyhouse. Bughouse captures go to the partner's board, which is outside
/// a single game; the caller forwards them with `Game::receive_piece`.
#[derive(Debug)]
pub struct DropRules(pub(crate) Variant);

impl Rules for DropRules {
    fn variant(&self) -> Variant {
        self.0
    }

    fn drop_targets(&self, pos: &Position, color: Color) -> Vec<(Square, PieceKind)> {
        let empty = !pos.occupied();
        let mut out = Vec::new();
        for kind in PieceKind::DROPPABLE {
            if pos.reserve.count(color, kind) == 0 {
                continue;
            }
            let targets = if kind == PieceKind::Pawn {
                empty & !Bitboard::BACK_RANKS
            } else {
                empty
            };
            out.extend(targets.map(|to| (to, kind)));
        }
        out
    }
}

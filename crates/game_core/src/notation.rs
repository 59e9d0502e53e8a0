//! SAN / LAN / UCI move text.
//!
//! Encoding needs the position the move is played from (disambiguation and
//! the check suffix depend on it). Decoding always resolves against the legal
//! move list, so flags such as castling, en passant and captured piece come
//! from the generator rather than from the text.

use crate::board::Position;
use crate::chess_move::Move;
use crate::error::NotationError;
use crate::movegen::legal_moves;
use crate::types::*;
use crate::variant::Outcome;

/// Standard algebraic notation for the legal move `mv` in `pos`.
pub fn encode_san(pos: &Position, mv: &Move) -> String {
    let legal = legal_moves(pos);
    encode_san_with(pos, mv, &legal)
}

/// [`encode_san`] against a legal list the caller already has.
pub fn encode_san_with(pos: &Position, mv: &Move, legal: &[Move]) -> String {
    let mut s = String::with_capacity(8);
    let to = sq_to_coord(mv.to());

    if mv.is_castle_kingside() {
        s.push_str("O-O");
    } else if mv.is_castle_queenside() {
        s.push_str("O-O-O");
    } else if mv.is_drop() {
        s.push(mv.piece().san_char());
        s.push('@');
        s.push_str(&to);
    } else if let Some(from) = mv.from() {
        if mv.piece() == PieceKind::Pawn {
            if mv.is_capture() {
                s.push(file_char(from));
                s.push('x');
            }
            s.push_str(&to);
        } else {
            s.push(mv.piece().san_char());
            s.push_str(&disambiguation(mv, from, legal));
            if mv.is_capture() {
                s.push('x');
            }
            s.push_str(&to);
        }
        if let Some(kind) = mv.promoted_to() {
            s.push('=');
            s.push(kind.san_char());
        }
    }

    let mut after = pos.clone();
    after.make_move(mv);
    let rules = after.variant.rules();
    match rules.is_terminal(&after) {
        Some(Outcome::Checkmate { .. }) => s.push('#'),
        _ if rules.in_check(&after, after.side_to_move) => s.push('+'),
        _ => {}
    }
    s
}

/// File, then rank, then both, whichever first tells `mv` apart from other
/// same-kind moves to the same square.
fn disambiguation(mv: &Move, from: Square, legal: &[Move]) -> String {
    let rivals: Vec<Square> = legal
        .iter()
        .filter(|other| {
            !other.is_drop()
                && !other.is_castle()
                && other.piece() == mv.piece()
                && other.to() == mv.to()
                && other.from() != Some(from)
        })
        .filter_map(Move::from)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }
    if rivals.iter().all(|&r| file_of(r) != file_of(from)) {
        return file_char(from).to_string();
    }
    if rivals.iter().all(|&r| rank_of(r) != rank_of(from)) {
        return rank_char(from).to_string();
    }
    sq_to_coord(from)
}

/// Parse SAN, LAN or coordinate text into the matching legal move.
pub fn decode_san(pos: &Position, text: &str) -> Result<Move, NotationError> {
    let core = strip_suffixes(text);
    if core.is_empty() {
        return Err(NotationError::Unknown(text.to_string()));
    }
    let legal = legal_moves(pos);

    let candidates: Vec<&Move> = match core {
        "O-O" | "0-0" => legal.iter().filter(|m| m.is_castle_kingside()).collect(),
        "O-O-O" | "0-0-0" => legal.iter().filter(|m| m.is_castle_queenside()).collect(),
        _ if core.contains('@') => match parse_drop(core) {
            Some((kind, to)) => legal
                .iter()
                .filter(|m| m.is_drop() && m.piece() == kind && m.to() == to)
                .collect(),
            None => Vec::new(),
        },
        _ => match parse_coordinate(core) {
            Some((from, to, promo)) => legal
                .iter()
                .filter(|m| {
                    m.from() == Some(from) && m.to() == to && promotion_fits(m, promo)
                        || m.is_castle() && m.from() == Some(from) && castle_alias(pos, m, to)
                })
                .collect(),
            None => match parse_algebraic(core) {
                Some(pattern) => legal.iter().filter(|m| pattern.matches(m)).collect(),
                None => Vec::new(),
            },
        },
    };

    match candidates.as_slice() {
        [] => Err(NotationError::Unknown(text.to_string())),
        [only] => Ok((*only).clone()),
        many => Err(NotationError::Ambiguous {
            text: text.to_string(),
            candidates: many.len(),
        }),
    }
}

/// Coordinate text such as `e2e4` or `e7e8q`, matched against the legal list.
pub fn parse_uci_move(pos: &Position, txt: &str) -> Option<Move> {
    decode_san(pos, txt).ok()
}

/// A text without a promotion piece fits every promotion choice, which
/// leaves a bare `e8` ambiguous instead of unknown.
fn promotion_fits(mv: &Move, promo: Option<PieceKind>) -> bool {
    promo.is_none() || mv.promoted_to() == promo
}

fn strip_suffixes(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_suffix("e.p.").unwrap_or(text).trim_end();
    text.trim_end_matches(['+', '#', '!', '?'])
}

/// `e1h1` (king onto own rook) is how Fischer-random GUIs spell a castle.
fn castle_alias(pos: &Position, castle: &Move, to: Square) -> bool {
    to == pos.rook_home(castle.color(), castle.is_castle_kingside())
}

fn parse_drop(core: &str) -> Option<(PieceKind, Square)> {
    let (piece, dest) = core.split_once('@')?;
    let kind = match piece {
        "" => PieceKind::Pawn,
        p if p.len() == 1 => PieceKind::from_san_char(p.chars().next()?)?,
        _ => return None,
    };
    Some((kind, coord_to_sq(dest)?))
}

/// `e2e4`, `e2-e4`, `e2xd3`, `e7e8q`, `e7-e8=Q`.
fn parse_coordinate(core: &str) -> Option<(Square, Square, Option<PieceKind>)> {
    let bytes = core.as_bytes();
    if bytes.len() < 4 || !bytes[0].is_ascii_lowercase() || !bytes[1].is_ascii_digit() {
        return None;
    }
    let from = coord_to_sq(core.get(0..2)?)?;
    let rest = core[2..].trim_start_matches(['-', 'x']);
    let to = coord_to_sq(rest.get(0..2)?)?;
    let promo = match rest[2..].trim_start_matches('=') {
        "" => None,
        p if p.len() == 1 => Some(PieceKind::from_san_char(p.chars().next()?)?),
        _ => return None,
    };
    Some((from, to, promo))
}

/// What a SAN token pins down about the move it names.
struct SanPattern {
    piece: PieceKind,
    from_file: Option<i8>,
    from_rank: Option<i8>,
    to: Square,
    promo: Option<PieceKind>,
}

impl SanPattern {
    fn matches(&self, mv: &Move) -> bool {
        let Some(from) = mv.from() else {
            return false;
        };
        !mv.is_castle()
            && mv.piece() == self.piece
            && mv.to() == self.to
            && promotion_fits(mv, self.promo)
            && self.from_file.map_or(true, |f| file_of(from) == f)
            && self.from_rank.map_or(true, |r| rank_of(from) == r)
    }
}

fn parse_algebraic(core: &str) -> Option<SanPattern> {
    let mut body: Vec<char> = core.chars().filter(|&c| c != 'x' && c != '-' && c != ':').collect();

    let mut promo = None;
    if let Some(pos) = body.iter().position(|&c| c == '=') {
        promo = Some(PieceKind::from_san_char(*body.get(pos + 1)?)?);
        body.truncate(pos);
    } else if body.len() >= 3 {
        // `e8Q`: trailing piece letter after the destination rank.
        let last = *body.last()?;
        if last.is_ascii_uppercase() && body[body.len() - 2].is_ascii_digit() {
            promo = Some(PieceKind::from_san_char(last)?);
            body.pop();
        }
    }

    let piece = match body.first() {
        Some(&c) if "NBRQKP".contains(c) => {
            body.remove(0);
            PieceKind::from_san_char(c)?
        }
        _ => PieceKind::Pawn,
    };

    if body.len() < 2 {
        return None;
    }
    let dest: String = body[body.len() - 2..].iter().collect();
    let to = coord_to_sq(&dest)?;

    let mut from_file = None;
    let mut from_rank = None;
    for &c in &body[..body.len() - 2] {
        match c {
            'a'..='h' => from_file = Some((c as u8 - b'a') as i8),
            '1'..='8' => from_rank = Some((c as u8 - b'1') as i8),
            _ => return None,
        }
    }
    // A bare pawn destination is a push along its own file.
    if piece == PieceKind::Pawn && from_file.is_none() {
        from_file = Some(file_of(to));
    }

    Some(SanPattern {
        piece,
        from_file,
        from_rank,
        to,
        promo,
    })
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod notation_tests;

//! Board state: piece placement, side to move, castling rights, en passant
//! target, move counters and drop reserves.
//!
//! The mailbox array is the source of truth; per-color occupancy and the set
//! of promoted pieces are kept alongside it as bitboards by `put`/`take`.

use bitflags::bitflags;

use crate::attacks::{
    bishop_attacks, blast_zone, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use crate::bitboard::Bitboard;
use crate::chess_move::Move;
use crate::error::FenError;
use crate::types::*;
use crate::variant::Variant;
use crate::zobrist::ZOBRIST;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const STANDARD_BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CastlingRights: u8 {
        const WHITE_KINGSIDE = 1;
        const WHITE_QUEENSIDE = 2;
        const BLACK_KINGSIDE = 4;
        const BLACK_QUEENSIDE = 8;
    }
}

impl CastlingRights {
    pub fn kingside(color: Color) -> Self {
        match color {
            Color::White => CastlingRights::WHITE_KINGSIDE,
            Color::Black => CastlingRights::BLACK_KINGSIDE,
        }
    }

    pub fn queenside(color: Color) -> Self {
        match color {
            Color::White => CastlingRights::WHITE_QUEENSIDE,
            Color::Black => CastlingRights::BLACK_QUEENSIDE,
        }
    }

    pub fn side(color: Color, kingside: bool) -> Self {
        if kingside {
            Self::kingside(color)
        } else {
            Self::queenside(color)
        }
    }

    pub fn for_color(color: Color) -> Self {
        Self::kingside(color) | Self::queenside(color)
    }
}

/// Pieces in hand, per color and droppable kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reserve {
    counts: [[u8; 5]; 2],
}

impl Reserve {
    pub fn count(&self, color: Color, kind: PieceKind) -> u8 {
        if kind == PieceKind::King {
            return 0;
        }
        self.counts[color.idx()][kind.idx()]
    }

    pub fn add(&mut self, color: Color, kind: PieceKind) {
        if kind == PieceKind::King {
            return;
        }
        let slot = &mut self.counts[color.idx()][kind.idx()];
        *slot = slot.saturating_add(1);
    }

    /// Take one `kind` out of `color`'s hand. Returns false if there was none.
    pub fn remove(&mut self, color: Color, kind: PieceKind) -> bool {
        if kind == PieceKind::King {
            return false;
        }
        let slot = &mut self.counts[color.idx()][kind.idx()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn is_empty(&self, color: Color) -> bool {
        self.counts[color.idx()].iter().all(|&n| n == 0)
    }

    pub fn total(&self, color: Color) -> u32 {
        self.counts[color.idx()].iter().map(|&n| n as u32).sum()
    }

    /// Non-empty slots of `color`'s hand.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (PieceKind, u8)> + '_ {
        PieceKind::DROPPABLE
            .into_iter()
            .map(move |kind| (kind, self.count(color, kind)))
            .filter(|&(_, n)| n > 0)
    }
}

/// Starting files of the castling pieces, per color. Wild setups may put
/// king and rooks anywhere on the back rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CastleFiles {
    pub king: [i8; 2],
    pub kingside_rook: [i8; 2],
    pub queenside_rook: [i8; 2],
}

impl Default for CastleFiles {
    fn default() -> Self {
        CastleFiles {
            king: [4, 4],
            kingside_rook: [7, 7],
            queenside_rook: [0, 0],
        }
    }
}

/// Everything needed to take a move back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Undo {
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    /// (square, piece, was promoted) of the captured piece.
    pub captured: Option<(Square, Piece, bool)>,
    pub rook_move: Option<(Square, Square)>,
    pub moved_was_promoted: bool,
    /// Pieces removed by an atomic explosion, other than the capturer.
    pub exploded: Vec<(Square, Piece, bool)>,
    pub reserve_credit: Option<Piece>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: [Option<Piece>; 64],
    occupancy: [Bitboard; 2],
    promoted: Bitboard,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    /// Square a pawn skipped over on the previous double push.
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub reserve: Reserve,
    pub castle_files: CastleFiles,
    pub variant: Variant,
}

pub(crate) fn home_square(color: Color, file: i8) -> Square {
    (color.back_rank() * 8 + file) as Square
}

impl Position {
    pub fn empty(variant: Variant) -> Self {
        Position {
            board: [None; 64],
            occupancy: [Bitboard::EMPTY; 2],
            promoted: Bitboard::EMPTY,
            side_to_move: Color::White,
            castling: CastlingRights::empty(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            reserve: Reserve::default(),
            castle_files: CastleFiles::default(),
            variant,
        }
    }

    pub fn startpos(variant: Variant) -> Self {
        Self::from_back_rank(variant, STANDARD_BACK_RANK)
    }

    /// Fischer-random start number `index` (0..960, Scharnagl numbering;
    /// 518 is the standard array). Out-of-range indices wrap.
    pub fn chess960(variant: Variant, index: u16) -> Self {
        const KNIGHT_PAIRS: [(usize, usize); 10] = [
            (0, 1),
            (0, 2),
            (0, 3),
            (0, 4),
            (1, 2),
            (1, 3),
            (1, 4),
            (2, 3),
            (2, 4),
            (3, 4),
        ];
        let mut n = (index % 960) as usize;
        let mut rank: [Option<PieceKind>; 8] = [None; 8];

        rank[n % 4 * 2 + 1] = Some(PieceKind::Bishop);
        n /= 4;
        rank[n % 4 * 2] = Some(PieceKind::Bishop);
        n /= 4;
        let queen_slot = n % 6;
        n /= 6;
        let (k1, k2) = KNIGHT_PAIRS[n];

        let free = |rank: &[Option<PieceKind>; 8]| -> Vec<usize> {
            (0..8).filter(|&f| rank[f].is_none()).collect()
        };
        let slots = free(&rank);
        rank[slots[queen_slot]] = Some(PieceKind::Queen);
        let slots = free(&rank);
        rank[slots[k1]] = Some(PieceKind::Knight);
        rank[slots[k2]] = Some(PieceKind::Knight);
        let slots = free(&rank);
        rank[slots[0]] = Some(PieceKind::Rook);
        rank[slots[1]] = Some(PieceKind::King);
        rank[slots[2]] = Some(PieceKind::Rook);

        let back = rank.map(|kind| kind.unwrap_or(PieceKind::Pawn));
        Self::from_back_rank(variant, back)
    }

    fn from_back_rank(variant: Variant, back: [PieceKind; 8]) -> Self {
        let mut pos = Position::empty(variant);
        for (file, &kind) in back.iter().enumerate() {
            let file = file as i8;
            pos.put(home_square(Color::White, file), Piece::new(Color::White, kind), false);
            pos.put(home_square(Color::Black, file), Piece::new(Color::Black, kind), false);
            pos.put(8 + file as Square, Piece::new(Color::White, PieceKind::Pawn), false);
            pos.put(48 + file as Square, Piece::new(Color::Black, PieceKind::Pawn), false);
        }

        let king = back.iter().position(|&k| k == PieceKind::King).unwrap_or(4) as i8;
        let queenside = back.iter().position(|&k| k == PieceKind::Rook).unwrap_or(0) as i8;
        let kingside = back.iter().rposition(|&k| k == PieceKind::Rook).unwrap_or(7) as i8;
        pos.castle_files = CastleFiles {
            king: [king; 2],
            kingside_rook: [kingside; 2],
            queenside_rook: [queenside; 2],
        };
        if variant.allows_castling() {
            pos.castling = CastlingRights::all();
        }
        pos
    }

    // ---------------------------------------------------------------------
    // FEN
    // ---------------------------------------------------------------------

    /// Parse FEN. Drop variants accept holdings either as a `[..]` suffix on
    /// the placement field or as a ninth `/` rank; `~` after a piece marks it
    /// as promoted. Castling accepts `KQkq` and Shredder file letters.
    pub fn from_fen(variant: Variant, fen: &str) -> Result<Self, FenError> {
        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or(FenError::MissingField("placement"))?;
        let stm = fields.next().ok_or(FenError::MissingField("side to move"))?;
        let castling = fields.next().unwrap_or("-");
        let ep = fields.next().unwrap_or("-");
        let halfmove = fields.next().unwrap_or("0");
        let fullmove = fields.next().unwrap_or("1");

        let mut pos = Position::empty(variant);
        let (board, holdings) = split_holdings(placement)?;
        pos.parse_placement(board)?;

        if let Some(holdings) = holdings {
            for ch in holdings.chars() {
                if ch == '-' {
                    continue;
                }
                match Piece::from_fen_char(ch) {
                    Some(p) if p.kind != PieceKind::King => pos.reserve.add(p.color, p.kind),
                    _ => return Err(FenError::BadHoldings(ch)),
                }
            }
        }

        pos.side_to_move = match stm {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::BadSideToMove(other.to_string())),
        };

        pos.parse_castling(castling)?;
        if !variant.allows_castling() {
            pos.castling = CastlingRights::empty();
        }

        pos.en_passant = match ep {
            "-" => None,
            coord => Some(coord_to_sq(coord).ok_or_else(|| FenError::BadEnPassant(coord.to_string()))?),
        };

        pos.halfmove_clock = halfmove
            .parse()
            .map_err(|_| FenError::BadCounter(halfmove.to_string()))?;
        pos.fullmove_number = fullmove
            .parse::<u32>()
            .map_err(|_| FenError::BadCounter(fullmove.to_string()))?
            .max(1);

        Ok(pos)
    }

    fn parse_placement(&mut self, board: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = board.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadBoard(format!(
                "expected 8 ranks, found {}",
                ranks.len()
            )));
        }
        for (idx, row) in ranks.iter().enumerate() {
            let rank = 7 - idx as i8;
            let mut file: i8 = 0;
            let mut chars = row.chars().peekable();
            while let Some(ch) = chars.next() {
                if let Some(d) = ch.to_digit(10) {
                    if d == 0 || d > 8 {
                        return Err(FenError::BadBoard(format!("bad skip '{ch}'")));
                    }
                    file += d as i8;
                    if file > 8 {
                        return Err(FenError::BadBoard(format!("rank {} is too long", rank + 1)));
                    }
                    continue;
                }
                let piece = Piece::from_fen_char(ch).ok_or(FenError::BadPiece(ch))?;
                let promoted = chars.peek() == Some(&'~');
                if promoted {
                    chars.next();
                }
                let s = sq(file, rank)
                    .ok_or_else(|| FenError::BadBoard(format!("rank {} is too long", rank + 1)))?;
                self.put(s, piece, promoted);
                file += 1;
            }
            if file != 8 {
                return Err(FenError::BadBoard(format!(
                    "rank {} covers {} files",
                    rank + 1,
                    file
                )));
            }
        }
        Ok(())
    }

    fn parse_castling(&mut self, field: &str) -> Result<(), FenError> {
        if field == "-" {
            return Ok(());
        }
        for ch in field.chars() {
            if !matches!(ch.to_ascii_lowercase(), 'k' | 'q' | 'a'..='h') {
                return Err(FenError::BadCastling(ch));
            }
            let color = if ch.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            let rook = Some(Piece::new(color, PieceKind::Rook));
            let Some(king_file) = self
                .king_sq(color)
                .filter(|&k| rank_of(k) == color.back_rank())
                .map(file_of)
            else {
                continue;
            };
            let rook_on = |pos: &Position, f: i8| pos.piece_at(home_square(color, f)) == rook;

            let (kingside, rook_file) = match ch.to_ascii_lowercase() {
                'k' => (true, (king_file + 1..8).rev().find(|&f| rook_on(self, f))),
                'q' => (false, (0..king_file).find(|&f| rook_on(self, f))),
                c @ 'a'..='h' => {
                    let f = (c as u8 - b'a') as i8;
                    (f > king_file, rook_on(self, f).then_some(f))
                }
                _ => return Err(FenError::BadCastling(ch)),
            };
            let Some(rook_file) = rook_file else {
                continue;
            };

            self.castle_files.king[color.idx()] = king_file;
            if kingside {
                self.castle_files.kingside_rook[color.idx()] = rook_file;
            } else {
                self.castle_files.queenside_rook[color.idx()] = rook_file;
            }
            self.castling |= CastlingRights::side(color, kingside);
        }
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        let drops = self.variant.has_drops();
        let mut out = String::with_capacity(90);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let s = rank * 8 + file;
                match self.board[s as usize] {
                    None => empty += 1,
                    Some(p) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(p.fen_char());
                        if drops && self.promoted.contains(s) {
                            out.push('~');
                        }
                    }
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }

        if drops {
            out.push('[');
            for color in Color::BOTH {
                for kind in PieceKind::DROPPABLE.iter().rev() {
                    let c = Piece::new(color, *kind).fen_char();
                    for _ in 0..self.reserve.count(color, *kind) {
                        out.push(c);
                    }
                }
            }
            out.push(']');
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        let before = out.len();
        for color in Color::BOTH {
            for kingside in [true, false] {
                if !self.castling.contains(CastlingRights::side(color, kingside)) {
                    continue;
                }
                let (file, outermost) = if kingside {
                    (self.castle_files.kingside_rook[color.idx()], 7)
                } else {
                    (self.castle_files.queenside_rook[color.idx()], 0)
                };
                let letter = if file == outermost {
                    if kingside {
                        'k'
                    } else {
                        'q'
                    }
                } else {
                    char::from(b'a' + file as u8)
                };
                out.push(match color {
                    Color::White => letter.to_ascii_uppercase(),
                    Color::Black => letter,
                });
            }
        }
        if out.len() == before {
            out.push('-');
        }

        out.push(' ');
        match self.en_passant {
            Some(s) => out.push_str(&sq_to_coord(s)),
            None => out.push('-'),
        }
        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        out
    }

    // ---------------------------------------------------------------------
    // Placement
    // ---------------------------------------------------------------------

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board[sq as usize]
    }

    /// Overwrite `sq`. The promoted marker is cleared.
    pub fn set_piece(&mut self, sq: Square, piece: Option<Piece>) {
        self.take(sq);
        if let Some(p) = piece {
            self.put(sq, p, false);
        }
    }

    /// Whether the piece on `sq` reached its rank by promotion.
    pub fn is_promoted(&self, sq: Square) -> bool {
        self.promoted.contains(sq)
    }

    pub(crate) fn put(&mut self, sq: Square, piece: Piece, promoted: bool) {
        debug_assert!(self.board[sq as usize].is_none(), "square {sq} occupied");
        self.board[sq as usize] = Some(piece);
        self.occupancy[piece.color.idx()].set(sq);
        self.promoted.assign(sq, promoted);
    }

    pub(crate) fn take(&mut self, sq: Square) -> Option<(Piece, bool)> {
        let piece = self.board[sq as usize].take()?;
        self.occupancy[piece.color.idx()].clear(sq);
        let promoted = self.promoted.contains(sq);
        self.promoted.clear(sq);
        Some((piece, promoted))
    }

    pub fn occupied(&self) -> Bitboard {
        self.occupancy[0] | self.occupancy[1]
    }

    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupancy[color.idx()]
    }

    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        let mut out = Bitboard::EMPTY;
        for s in self.occupancy[color.idx()] {
            if self.board[s as usize].map(|p| p.kind) == Some(kind) {
                out.set(s);
            }
        }
        out
    }

    /// Number of pieces `color` has on the board, king included.
    pub fn piece_count(&self, color: Color) -> u32 {
        self.occupancy[color.idx()].popcount()
    }

    pub fn king_sq(&self, color: Color) -> Option<Square> {
        self.pieces(color, PieceKind::King).lsb()
    }

    /// Home square of the rook castling to the given side.
    pub fn rook_home(&self, color: Color, kingside: bool) -> Square {
        let file = if kingside {
            self.castle_files.kingside_rook[color.idx()]
        } else {
            self.castle_files.queenside_rook[color.idx()]
        };
        home_square(color, file)
    }

    pub fn king_home(&self, color: Color) -> Square {
        home_square(color, self.castle_files.king[color.idx()])
    }

    // ---------------------------------------------------------------------
    // Attacks
    // ---------------------------------------------------------------------

    pub fn is_square_attacked(&self, target: Square, by: Color) -> bool {
        self.is_square_attacked_by(target, by, true)
    }

    /// Attack test with kings optionally left out (atomic kings never
    /// capture).
    pub fn is_square_attacked_by(&self, target: Square, by: Color, kings: bool) -> bool {
        let occ = self.occupied();
        let theirs = self.occupancy[by.idx()];
        let hits = |set: Bitboard, kinds: &[PieceKind]| {
            (set & theirs).any(|s| {
                self.board[s as usize].map_or(false, |p| kinds.contains(&p.kind))
            })
        };

        hits(pawn_attacks(target, by.other()), &[PieceKind::Pawn])
            || hits(knight_attacks(target), &[PieceKind::Knight])
            || (kings && hits(king_attacks(target), &[PieceKind::King]))
            || hits(
                bishop_attacks(target, occ),
                &[PieceKind::Bishop, PieceKind::Queen],
            )
            || hits(rook_attacks(target, occ), &[PieceKind::Rook, PieceKind::Queen])
    }

    /// Orthodox check test: `color`'s king is attacked. Variants with other
    /// notions of check go through [`crate::variant::Rules::in_check`].
    pub fn in_check(&self, color: Color) -> bool {
        match self.king_sq(color) {
            Some(ksq) => self.is_square_attacked(ksq, color.other()),
            None => false,
        }
    }

    // ---------------------------------------------------------------------
    // Draw helpers
    // ---------------------------------------------------------------------

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Neither side can mate: bare kings, a single minor piece, or bishops
    /// all on one square color. Pieces in hand always count as sufficient.
    pub fn is_insufficient_material(&self) -> bool {
        if !self.reserve.is_empty(Color::White) || !self.reserve.is_empty(Color::Black) {
            return false;
        }
        let mut knights = 0;
        let mut bishops = Bitboard::EMPTY;
        for s in self.occupied() {
            match self.board[s as usize].map(|p| p.kind) {
                Some(PieceKind::King) | None => {}
                Some(PieceKind::Knight) => knights += 1,
                Some(PieceKind::Bishop) => bishops.set(s),
                Some(_) => return false,
            }
        }
        let minors = knights + bishops.popcount();
        if minors <= 1 {
            return true;
        }
        knights == 0
            && ((bishops & Bitboard::LIGHT_SQUARES).is_empty()
                || (bishops & !Bitboard::LIGHT_SQUARES).is_empty())
    }

    /// Zobrist key of the position, reserves included.
    pub fn hash(&self) -> u64 {
        let mut h = 0u64;
        for s in self.occupied() {
            if let Some(p) = self.board[s as usize] {
                h ^= ZOBRIST.piece_key(p, s);
            }
        }
        if self.side_to_move == Color::Black {
            h ^= ZOBRIST.side_to_move;
        }
        for (i, right) in CastlingRights::all().iter().enumerate() {
            if self.castling.contains(right) {
                h ^= ZOBRIST.castling_key(i);
            }
        }
        if let Some(ep) = self.en_passant {
            h ^= ZOBRIST.ep_key(file_of(ep) as u8);
        }
        if self.variant.has_drops() {
            for color in Color::BOTH {
                for (kind, n) in self.reserve.pieces(color) {
                    h ^= ZOBRIST.reserve_key(color, kind, n);
                }
            }
        }
        h
    }

    // ---------------------------------------------------------------------
    // Make / unmake
    // ---------------------------------------------------------------------

    /// Play `mv` without legality checks and return what is needed to take
    /// it back.
    pub fn make_move(&mut self, mv: &Move) -> Undo {
        let us = self.side_to_move;
        let to = mv.to();
        let mut undo = Undo {
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            captured: None,
            rook_move: None,
            moved_was_promoted: false,
            exploded: Vec::new(),
            reserve_credit: None,
        };
        self.en_passant = None;
        let mut reset_clock = mv.piece() == PieceKind::Pawn;

        match mv.from() {
            None => {
                self.reserve.remove(us, mv.piece());
                self.put(to, Piece::new(us, mv.piece()), false);
            }
            Some(from) if mv.is_castle() => {
                let kingside = mv.is_castle_kingside();
                let rook_from = self.rook_home(us, kingside);
                let rook_to = home_square(us, if kingside { 5 } else { 3 });
                // Lift both first: in Fischer-random setups the squares overlap.
                self.take(from);
                self.take(rook_from);
                self.put(to, Piece::new(us, PieceKind::King), false);
                self.put(rook_to, Piece::new(us, PieceKind::Rook), false);
                undo.rook_move = Some((rook_from, rook_to));
            }
            Some(from) => {
                let moved_promoted = self.take(from).map_or(false, |(_, promoted)| promoted);
                undo.moved_was_promoted = moved_promoted;

                let capture_sq = if mv.is_en_passant() {
                    mv.ep_target()
                } else {
                    Some(to)
                };
                if let Some(cs) = capture_sq {
                    if let Some((piece, promoted)) = self.take(cs) {
                        undo.captured = Some((cs, piece, promoted));
                        reset_clock = true;
                    }
                }

                let kind = mv.promoted_to().unwrap_or(mv.piece());
                self.put(to, Piece::new(us, kind), moved_promoted || mv.is_promotion());

                if let Some((_, captured, promoted)) = undo.captured {
                    match self.variant {
                        Variant::Crazyhouse => {
                            let kind = if promoted { PieceKind::Pawn } else { captured.kind };
                            if kind != PieceKind::King {
                                self.reserve.add(us, kind);
                                undo.reserve_credit = Some(Piece::new(us, kind));
                            }
                        }
                        Variant::Atomic => self.explode(to, &mut undo),
                        _ => {}
                    }
                }

                if mv.is_double_pawn_push() {
                    self.en_passant = mv.ep_target();
                }
            }
        }

        self.refresh_castling_rights(mv.from());
        self.halfmove_clock = if reset_clock {
            0
        } else {
            self.halfmove_clock + 1
        };
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = us.other();
        undo
    }

    /// Atomic capture on `center`: the capturer and every non-pawn around it
    /// leave the board.
    fn explode(&mut self, center: Square, undo: &mut Undo) {
        for s in blast_zone(center) {
            // The capturer goes whatever it is; the ring spares pawns.
            if s == center {
                self.take(center);
            } else if matches!(self.board[s as usize], Some(p) if p.kind != PieceKind::Pawn) {
                if let Some((piece, promoted)) = self.take(s) {
                    undo.exploded.push((s, piece, promoted));
                }
            }
        }
    }

    /// Drop every right whose king or rook left home (moved, captured or
    /// exploded).
    fn refresh_castling_rights(&mut self, from: Option<Square>) {
        if self.castling.is_empty() {
            return;
        }
        for color in Color::BOTH {
            let king_home = self.king_home(color);
            for kingside in [true, false] {
                let right = CastlingRights::side(color, kingside);
                if !self.castling.contains(right) {
                    continue;
                }
                let rook_home = self.rook_home(color, kingside);
                let intact = from != Some(king_home)
                    && from != Some(rook_home)
                    && self.piece_at(king_home) == Some(Piece::new(color, PieceKind::King))
                    && self.piece_at(rook_home) == Some(Piece::new(color, PieceKind::Rook));
                if !intact {
                    self.castling.remove(right);
                }
            }
        }
    }

    /// Exact inverse of [`Position::make_move`].
    pub fn unmake_move(&mut self, mv: &Move, undo: Undo) {
        self.side_to_move = self.side_to_move.other();
        let us = self.side_to_move;
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;

        let to = mv.to();
        match mv.from() {
            None => {
                self.take(to);
                self.reserve.add(us, mv.piece());
            }
            Some(from) if mv.is_castle() => {
                self.take(to);
                if let Some((rook_from, rook_to)) = undo.rook_move {
                    self.take(rook_to);
                    self.put(rook_from, Piece::new(us, PieceKind::Rook), false);
                }
                self.put(from, Piece::new(us, PieceKind::King), false);
            }
            Some(from) => {
                self.take(to);
                for &(s, piece, promoted) in undo.exploded.iter().rev() {
                    self.put(s, piece, promoted);
                }
                self.put(from, Piece::new(us, mv.piece()), undo.moved_was_promoted);
                if let Some((cs, piece, promoted)) = undo.captured {
                    self.put(cs, piece, promoted);
                }
                if let Some(credit) = undo.reserve_credit {
                    self.reserve.remove(credit.color, credit.kind);
                }
            }
        }
    }

    /// Apply `mv` and keep the undo snapshot on the move itself.
    pub(crate) fn apply_move(&mut self, mv: &mut Move) {
        let undo = self.make_move(mv);
        mv.snapshot = Some(undo);
    }

    /// Take back a move previously played with [`Position::apply_move`].
    /// Returns false if the move carries no snapshot.
    pub(crate) fn revert_move(&mut self, mv: &Move) -> bool {
        match mv.snapshot.clone() {
            Some(undo) => {
                self.unmake_move(mv, undo);
                true
            }
            None => false,
        }
    }
}

fn split_holdings(placement: &str) -> Result<(&str, Option<&str>), FenError> {
    if let Some(open) = placement.find('[') {
        let close = placement
            .rfind(']')
            .filter(|&close| close > open)
            .ok_or_else(|| FenError::BadBoard("unterminated holdings".to_string()))?;
        return Ok((&placement[..open], Some(&placement[open + 1..close])));
    }
    if placement.matches('/').count() == 8 {
        if let Some((board, holdings)) = placement.rsplit_once('/') {
            return Ok((board, Some(holdings)));
        }
    }
    Ok((placement, None))
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;

//! PGN export and import, annotations included.
//!
//! Comments travel as `{...}` blocks; clock readings, arrows and square
//! highlights ride inside them as `[%clk]`, `[%cal]` and `[%csl]` commands.
//! Variations nest to any depth, so both directions keep their own stack of
//! open lines instead of recursing.

use std::collections::BTreeMap;
use std::iter::Peekable;

use tracing::{info, warn};

use crate::annotation::{Annotation, Arrow, ClockTime, Highlight, MarkColor, Nag, Subline};
use crate::board::Position;
use crate::chess_move::Move;
use crate::error::PgnParseError;
use crate::game::Game;
use crate::notation;
use crate::types::*;
use crate::variant::Variant;

/// Tags written first, in this order, whether or not the game sets them.
pub const SEVEN_TAG_ROSTER: [&str; 7] = ["Event", "Site", "Date", "Round", "White", "Black", "Result"];

const LINE_WIDTH: usize = 80;

// -------------------------------------------------------------------------
// Export
// -------------------------------------------------------------------------

/// Writes the whole timeline, moves past the cursor included, so the result
/// is taken from the end of it.
pub fn export_pgn(game: &Game) -> String {
    let outcome = if game.cursor() < game.len() {
        let mut end = game.clone();
        end.replay_to(end.len()).ok().and_then(|()| end.outcome())
    } else {
        game.outcome()
    };
    let result = outcome
        .map(|o| o.result_tag().to_string())
        .or_else(|| game.tag("Result").map(str::to_string))
        .unwrap_or_else(|| "*".to_string());

    let mut out = String::new();
    for name in SEVEN_TAG_ROSTER {
        let value = match name {
            "Result" => result.clone(),
            "Date" => game.tag(name).unwrap_or("????.??.??").to_string(),
            _ => game.tag(name).unwrap_or("?").to_string(),
        };
        push_tag(&mut out, name, &value);
    }

    let variant = game.variant();
    if variant != Variant::Standard {
        push_tag(&mut out, "Variant", variant.name());
    }
    let initial = game.initial_position();
    if initial.to_fen() != Position::startpos(variant).to_fen() {
        push_tag(&mut out, "SetUp", "1");
        push_tag(&mut out, "FEN", &initial.to_fen());
    }
    for (name, value) in game.tags() {
        let generated = SEVEN_TAG_ROSTER.contains(&name.as_str())
            || matches!(name.as_str(), "Variant" | "SetUp" | "FEN");
        if !generated {
            push_tag(&mut out, name, value);
        }
    }
    out.push('\n');

    let mut tokens = movetext_tokens(game.history(), initial.fullmove_number);
    tokens.push(result);
    out.push_str(&wrap(&tokens));
    out.push('\n');
    out
}

fn push_tag(out: &mut String, name: &str, value: &str) {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    out.push_str(&format!("[{name} \"{escaped}\"]\n"));
}

struct ExportFrame<'a> {
    moves: &'a [Move],
    next: usize,
    number: u32,
    need_number: bool,
    opened: bool,
}

fn movetext_tokens(line: &[Move], first_number: u32) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut stack = vec![ExportFrame {
        moves: line,
        next: 0,
        number: first_number,
        need_number: true,
        opened: true,
    }];

    while let Some(top) = stack.last_mut() {
        if !top.opened {
            top.opened = true;
            tokens.push("(".to_string());
        }
        if top.next >= top.moves.len() {
            stack.pop();
            if !stack.is_empty() {
                close_paren(&mut tokens);
            }
            continue;
        }

        let moves = top.moves;
        let mv = &moves[top.next];
        let number = top.number;
        let commented = push_move_tokens(&mut tokens, mv, number, top.need_number);

        top.next += 1;
        top.need_number = commented;
        if mv.color() == Color::Black {
            top.number += 1;
        }

        let sublines = mv.sublines();
        if !sublines.is_empty() {
            top.need_number = true;
            for sub in sublines.into_iter().rev() {
                stack.push(ExportFrame {
                    moves: sub.moves(),
                    next: 0,
                    number,
                    need_number: true,
                    opened: false,
                });
            }
        }
    }
    tokens
}

/// Returns whether a comment block was written, after which a black move
/// needs its number repeated.
fn push_move_tokens(tokens: &mut Vec<String>, mv: &Move, number: u32, need_number: bool) -> bool {
    match mv.color() {
        Color::White => push_token(tokens, format!("{number}.")),
        Color::Black if need_number => push_token(tokens, format!("{number}...")),
        Color::Black => {}
    }
    push_token(tokens, mv.to_string());
    for nag in mv.nags() {
        push_token(tokens, nag.to_string());
    }
    let Some(block) = comment_block(mv) else {
        return false;
    };
    for word in block.split_whitespace() {
        push_token(tokens, word.to_string());
    }
    true
}

/// A lone `(` token absorbs the next token so variations print as `(1. d4`.
fn push_token(tokens: &mut Vec<String>, token: String) {
    match tokens.last_mut() {
        Some(last) if last == "(" => last.push_str(&token),
        _ => tokens.push(token),
    }
}

fn close_paren(tokens: &mut Vec<String>) {
    match tokens.last_mut() {
        Some(last) => last.push(')'),
        None => tokens.push(")".to_string()),
    }
}

fn comment_block(mv: &Move) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for clock in mv.clock_times() {
        parts.push(format!("[%clk {}]", format_clock(clock.millis)));
    }
    let arrows = mv.arrows();
    if !arrows.is_empty() {
        let list: Vec<String> = arrows
            .iter()
            .map(|a| format!("{}{}{}", a.color.letter(), sq_to_coord(a.from), sq_to_coord(a.to)))
            .collect();
        parts.push(format!("[%cal {}]", list.join(",")));
    }
    let highlights = mv.highlights();
    if !highlights.is_empty() {
        let list: Vec<String> = highlights
            .iter()
            .map(|h| format!("{}{}", h.color.letter(), sq_to_coord(h.square)))
            .collect();
        parts.push(format!("[%csl {}]", list.join(",")));
    }
    for text in mv.comments() {
        parts.push(text.replace('}', ")"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(format!("{{{}}}", parts.join(" ")))
    }
}

fn format_clock(millis: u64) -> String {
    let secs = millis / 1000;
    let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
    match millis % 1000 {
        0 => format!("{h}:{m:02}:{s:02}"),
        frac => format!("{h}:{m:02}:{s:02}.{frac:03}"),
    }
}

fn wrap(tokens: &[String]) -> String {
    let mut out = String::new();
    let mut line_len = 0;
    for token in tokens {
        if line_len > 0 && line_len + 1 + token.len() > LINE_WIDTH {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(token);
        line_len += token.len();
    }
    out
}

// -------------------------------------------------------------------------
// Import
// -------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Tag(String, String),
    MoveNumber,
    Move(String),
    Nag(Nag),
    Comment(String),
    Open,
    Close,
    Result(String),
    /// Malformed input, reported by the parser once it knows the ply.
    Invalid(&'static str, String),
}

impl Token {
    fn text(&self) -> String {
        match self {
            Token::Tag(name, _) => format!("[{name}"),
            Token::MoveNumber => "move number".to_string(),
            Token::Move(san) => san.clone(),
            Token::Nag(nag) => nag.to_string(),
            Token::Comment(_) => "{".to_string(),
            Token::Open => "(".to_string(),
            Token::Close => ")".to_string(),
            Token::Result(r) => r.clone(),
            Token::Invalid(_, text) => text.clone(),
        }
    }
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut line_start = true;

    while let Some(&(start, c)) = chars.peek() {
        if c == '\n' {
            line_start = true;
            chars.next();
            continue;
        }
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let at_line_start = std::mem::replace(&mut line_start, false);
        match c {
            '%' if at_line_start => {
                skip_line(&mut chars);
                line_start = true;
            }
            ';' => {
                skip_line(&mut chars);
                line_start = true;
            }
            '[' => {
                chars.next();
                let tag = read_tag(&mut chars);
                let done = matches!(tag, Token::Invalid(..));
                tokens.push(tag);
                if done {
                    break;
                }
            }
            '{' => {
                chars.next();
                let mut body = String::new();
                let mut closed = false;
                for (_, ch) in chars.by_ref() {
                    if ch == '}' {
                        closed = true;
                        break;
                    }
                    body.push(ch);
                }
                if !closed {
                    tokens.push(Token::Invalid("unterminated comment", "{".to_string()));
                    break;
                }
                tokens.push(Token::Comment(body));
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '$' => {
                chars.next();
                let digits = take_word(text, &mut chars, start + 1);
                match digits.parse::<u8>() {
                    Ok(code) => tokens.push(Token::Nag(Nag(code))),
                    Err(_) => tokens.push(Token::Invalid("bad NAG", format!("${digits}"))),
                }
            }
            _ => {
                let word = take_word(text, &mut chars, start);
                if word.is_empty() {
                    // A delimiter with no arm of its own, such as a stray '}'.
                    chars.next();
                    tokens.push(Token::Invalid("unexpected character", c.to_string()));
                } else {
                    push_word(&mut tokens, word);
                }
            }
        }
    }
    tokens
}

fn skip_line(chars: &mut Peekable<std::str::CharIndices<'_>>) {
    for (_, ch) in chars.by_ref() {
        if ch == '\n' {
            break;
        }
    }
}

fn take_word<'t>(
    text: &'t str,
    chars: &mut Peekable<std::str::CharIndices<'_>>,
    start: usize,
) -> &'t str {
    let mut end = text.len();
    while let Some(&(i, ch)) = chars.peek() {
        if ch.is_whitespace() || "(){};[$".contains(ch) {
            end = i;
            break;
        }
        chars.next();
    }
    &text[start..end]
}

fn read_tag(chars: &mut Peekable<std::str::CharIndices<'_>>) -> Token {
    let mut name = String::new();
    while let Some(&(_, ch)) = chars.peek() {
        if ch.is_whitespace() || ch == '"' || ch == ']' {
            break;
        }
        name.push(ch);
        chars.next();
    }
    while chars.peek().map_or(false, |&(_, ch)| ch.is_whitespace()) {
        chars.next();
    }
    if chars.next().map(|(_, ch)| ch) != Some('"') {
        return Token::Invalid("tag value must be quoted", format!("[{name}"));
    }
    let mut value = String::new();
    loop {
        match chars.next() {
            Some((_, '\\')) => {
                if let Some((_, escaped)) = chars.next() {
                    value.push(escaped);
                }
            }
            Some((_, '"')) => break,
            Some((_, ch)) => value.push(ch),
            None => return Token::Invalid("unterminated tag", format!("[{name}")),
        }
    }
    for (_, ch) in chars.by_ref() {
        if ch == ']' {
            return Token::Tag(name, value);
        }
    }
    Token::Invalid("unterminated tag", format!("[{name}"))
}

/// Classify a bare word: result, move number (possibly glued to a move as
/// in `1.e4`), or a move with optional `!?` glyphs.
fn push_word(tokens: &mut Vec<Token>, word: &str) {
    if matches!(word, "1-0" | "0-1" | "1/2-1/2" | "*") {
        tokens.push(Token::Result(word.to_string()));
        return;
    }
    let mut word = word;
    if word.starts_with(|c: char| c.is_ascii_digit()) && !word.starts_with("0-0") {
        let rest = word.trim_start_matches(|c: char| c.is_ascii_digit());
        if rest.starts_with('.') {
            tokens.push(Token::MoveNumber);
            word = rest.trim_start_matches('.');
            if word.is_empty() {
                return;
            }
        }
    }
    let san = word.trim_end_matches(['!', '?']);
    let glyph = &word[san.len()..];
    tokens.push(Token::Move(san.to_string()));
    if let Some(nag) = Nag::from_glyph(glyph) {
        tokens.push(Token::Nag(nag));
    }
}

/// Turn the inside of a `{...}` block into annotations for a move by
/// `mover`.
fn parse_comment(body: &str, mover: Color) -> Vec<Annotation> {
    let mut out = Vec::new();
    let mut text = String::new();
    let mut rest = body;

    while let Some(open) = rest.find("[%") {
        text.push_str(&rest[..open]);
        let Some(close) = rest[open..].find(']') else {
            text.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let command = &rest[open + 2..open + close];
        let (name, args) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
        let args = args.trim();
        match name {
            "clk" => match parse_clock(args) {
                Some(millis) => out.push(Annotation::ClockTime(ClockTime { color: mover, millis })),
                None => text.push_str(&rest[open..=open + close]),
            },
            "cal" => out.extend(args.split(',').filter_map(parse_arrow).map(Annotation::Arrow)),
            "csl" => out.extend(
                args.split(',')
                    .filter_map(parse_highlight)
                    .map(Annotation::Highlight),
            ),
            // Unknown commands stay in the comment text.
            _ => text.push_str(&rest[open..=open + close]),
        }
        rest = &rest[open + close + 1..];
    }
    text.push_str(rest);

    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if !text.is_empty() {
        out.push(Annotation::Comment(text));
    }
    out
}

fn parse_clock(s: &str) -> Option<u64> {
    let mut parts = s.rsplitn(3, ':');
    let secs = parts.next()?;
    let minutes: u64 = parts.next().map_or(Some(0), |m| m.parse().ok())?;
    let hours: u64 = parts.next().map_or(Some(0), |h| h.parse().ok())?;
    let (whole, frac) = secs.split_once('.').unwrap_or((secs, ""));
    let whole: u64 = whole.parse().ok()?;
    let frac_ms = if frac.is_empty() {
        0
    } else {
        let digits: String = frac.chars().chain("000".chars()).take(3).collect();
        digits.parse::<u64>().ok()?
    };
    Some(((hours * 60 + minutes) * 60 + whole) * 1000 + frac_ms)
}

fn parse_arrow(item: &str) -> Option<Arrow> {
    let item = item.trim();
    let color = MarkColor::from_letter(item.chars().next()?)?;
    Some(Arrow {
        color,
        from: coord_to_sq(item.get(1..3)?)?,
        to: coord_to_sq(item.get(3..5)?)?,
    })
}

fn parse_highlight(item: &str) -> Option<Highlight> {
    let item = item.trim();
    let color = MarkColor::from_letter(item.chars().next()?)?;
    Some(Highlight {
        color,
        square: coord_to_sq(item.get(1..3)?)?,
    })
}

/// One open line while importing: the mainline or a variation.
struct ImportLine {
    pos: Position,
    /// Position before this line's last move; variations start here.
    before_last: Option<Position>,
    moves: Vec<Move>,
    /// Annotations seen before the line's first move.
    pending: Vec<Annotation>,
}

impl ImportLine {
    fn new(pos: Position) -> Self {
        ImportLine {
            pos,
            before_last: None,
            moves: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn annotate(&mut self, annotations: Vec<Annotation>) {
        match self.moves.last_mut() {
            Some(mv) => annotations.into_iter().for_each(|a| mv.add_annotation(a)),
            None => self.pending.extend(annotations),
        }
    }

    /// Color of whoever a comment at this point refers to.
    fn commenter(&self) -> Color {
        match self.moves.last() {
            Some(mv) => mv.color(),
            None => self.pos.side_to_move,
        }
    }
}

/// Parse the first game in `text`.
pub fn import_pgn(text: &str) -> Result<Game, PgnParseError> {
    let mut tokens = tokenize(text).into_iter().peekable();
    match parse_game(&mut tokens) {
        Ok(Some(game)) => Ok(game),
        Ok(None) => Err(PgnParseError::new("no game found", "", 0)),
        Err(e) => {
            warn!(error = %e, "PGN import failed");
            Err(e)
        }
    }
}

/// Parse every game in `text`. Any malformed game fails the whole import.
pub fn import_pgn_games(text: &str) -> Result<Vec<Game>, PgnParseError> {
    let mut tokens = tokenize(text).into_iter().peekable();
    let mut games = Vec::new();
    while let Some(game) = parse_game(&mut tokens).map_err(|e| {
        warn!(error = %e, game = games.len() + 1, "PGN import failed");
        e
    })? {
        games.push(game);
    }
    Ok(games)
}

fn parse_game<I>(tokens: &mut Peekable<I>) -> Result<Option<Game>, PgnParseError>
where
    I: Iterator<Item = Token>,
{
    let mut tags = BTreeMap::new();
    while let Some(Token::Tag(..)) = tokens.peek() {
        if let Some(Token::Tag(name, value)) = tokens.next() {
            tags.insert(name, value);
        }
    }
    if tags.is_empty() && tokens.peek().is_none() {
        return Ok(None);
    }

    let variant = match tags.get("Variant") {
        Some(name) => name
            .parse::<Variant>()
            .map_err(|e| PgnParseError::new(e.to_string(), name.clone(), 0))?,
        None => Variant::Standard,
    };
    let initial = match tags.get("FEN") {
        Some(fen) => Position::from_fen(variant, fen)
            .map_err(|e| PgnParseError::new(e.to_string(), fen.clone(), 0))?,
        None => Position::startpos(variant),
    };

    let mut stack = vec![ImportLine::new(initial.clone())];
    let mut plies = 0usize;
    let mut result = None;

    while let Some(token) = tokens.next() {
        let Some(top) = stack.last_mut() else {
            break;
        };
        match token {
            Token::MoveNumber => {}
            Token::Move(ref san) => {
                let mut mv = notation::decode_san(&top.pos, san)
                    .map_err(|e| PgnParseError::new(e.to_string(), san.clone(), plies))?;
                mv.set_san(notation::encode_san(&top.pos, &mv));
                for annotation in top.pending.drain(..) {
                    mv.add_annotation(annotation);
                }
                top.before_last = Some(top.pos.clone());
                top.pos.apply_move(&mut mv);
                top.moves.push(mv);
                plies += 1;
            }
            Token::Nag(nag) => top.annotate(vec![Annotation::Nag(nag)]),
            Token::Comment(ref body) => {
                let annotations = parse_comment(body, top.commenter());
                top.annotate(annotations);
            }
            Token::Open => {
                let Some(base) = top.before_last.clone() else {
                    return Err(PgnParseError::new(
                        "variation before any move",
                        token.text(),
                        plies,
                    ));
                };
                stack.push(ImportLine::new(base));
            }
            Token::Close => {
                if stack.len() < 2 {
                    return Err(PgnParseError::new("unbalanced ')'", token.text(), plies));
                }
                if let Some(line) = stack.pop() {
                    let mut moves = line.moves;
                    for mv in &mut moves {
                        mv.freeze();
                    }
                    if let Some(parent) = stack.last_mut().and_then(|p| p.moves.last_mut()) {
                        if !moves.is_empty() {
                            parent.add_annotation(Annotation::Subline(Subline::new(moves)));
                        }
                    }
                }
            }
            Token::Result(r) => {
                result = Some(r);
                break;
            }
            Token::Tag(..) => {
                return Err(PgnParseError::new(
                    "tag inside movetext",
                    token.text(),
                    plies,
                ));
            }
            Token::Invalid(message, text) => {
                return Err(PgnParseError::new(message, text, plies));
            }
        }
    }

    if stack.len() != 1 {
        return Err(PgnParseError::new("unterminated variation", "(", plies));
    }
    let Some(root) = stack.pop() else {
        return Err(PgnParseError::new("no movetext", "", plies));
    };

    let mut game = Game::from_position(initial);
    for (name, value) in tags {
        game.set_tag(name, value);
    }
    if let Some(r) = result {
        if game.tag("Result").is_none() {
            game.set_tag("Result", r);
        }
    }
    for (ply, mv) in root.moves.into_iter().enumerate() {
        let text = mv.to_string();
        game.make_move(mv)
            .map_err(|e| PgnParseError::new(e.to_string(), text, ply))?;
    }

    info!(
        variant = %game.variant(),
        moves = game.len(),
        plies,
        "imported PGN game"
    );
    Ok(Some(game))
}

#[cfg(test)]
#[path = "pgn_tests.rs"]
mod pgn_tests;

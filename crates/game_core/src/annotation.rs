//! Annotation tree hanging off moves: comments, board marks, NAGs, clock
//! readings and nested variations.
//!
//! Variations nest without limit in imported PGN, so every walk over the
//! tree here (and the `Drop` of a [`Subline`]) runs on an explicit stack
//! instead of recursing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chess_move::Move;
use crate::types::{Color, Square};

/// Colour of an arrow or square highlight, as written in `%cal`/`%csl`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkColor {
    Green,
    Red,
    Yellow,
    Blue,
}

impl MarkColor {
    pub fn letter(self) -> char {
        match self {
            MarkColor::Green => 'G',
            MarkColor::Red => 'R',
            MarkColor::Yellow => 'Y',
            MarkColor::Blue => 'B',
        }
    }

    pub fn from_letter(c: char) -> Option<MarkColor> {
        match c {
            'G' => Some(MarkColor::Green),
            'R' => Some(MarkColor::Red),
            'Y' => Some(MarkColor::Yellow),
            'B' => Some(MarkColor::Blue),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Arrow {
    pub from: Square,
    pub to: Square,
    pub color: MarkColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Highlight {
    pub square: Square,
    pub color: MarkColor,
}

/// Numeric annotation glyph (`$1` = good move, `$2` = mistake, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Nag(pub u8);

impl Nag {
    /// Map a move-suffix glyph such as `!?` to its NAG.
    pub fn from_glyph(glyph: &str) -> Option<Nag> {
        let code = match glyph {
            "!" => 1,
            "?" => 2,
            "!!" => 3,
            "??" => 4,
            "!?" => 5,
            "?!" => 6,
            _ => return None,
        };
        Some(Nag(code))
    }
}

impl fmt::Display for Nag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// Clock reading recorded after a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockTime {
    pub color: Color,
    pub millis: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Annotation {
    Comment(String),
    Arrow(Arrow),
    Highlight(Highlight),
    Nag(Nag),
    ClockTime(ClockTime),
    Subline(Subline),
}

/// An alternative line branching from the position before the move that
/// owns it.
#[derive(Default, PartialEq)]
pub struct Subline {
    moves: Vec<Move>,
}

impl Subline {
    pub fn new(moves: Vec<Move>) -> Self {
        Subline { moves }
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn moves_mut(&mut self) -> &mut [Move] {
        &mut self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn into_moves(mut self) -> Vec<Move> {
        std::mem::take(&mut self.moves)
    }
}

/// One subline being copied: the source moves, the copies made so far and
/// the move whose annotations are in progress.
struct CloneFrame<'a> {
    src: &'a [Move],
    out: Vec<Move>,
    next_move: usize,
    next_annotation: usize,
    current: Option<Move>,
}

impl<'a> CloneFrame<'a> {
    fn new(src: &'a [Move]) -> Self {
        CloneFrame {
            src,
            out: Vec::with_capacity(src.len()),
            next_move: 0,
            next_annotation: 0,
            current: None,
        }
    }
}

impl Clone for Subline {
    fn clone(&self) -> Self {
        // Explicit stack so copying a deep tree never recurses.
        let mut stack = vec![CloneFrame::new(&self.moves)];
        loop {
            let Some(top) = stack.last_mut() else {
                return Subline::default();
            };
            let src = top.src;
            if top.current.is_none() {
                if top.next_move == src.len() {
                    let finished = Subline {
                        moves: std::mem::take(&mut top.out),
                    };
                    stack.pop();
                    let Some(parent) = stack.last_mut() else {
                        return finished;
                    };
                    if let Some(owner) = parent.current.as_mut() {
                        owner.annotations.push(Annotation::Subline(finished));
                    }
                    parent.next_annotation += 1;
                    continue;
                }
                top.current = Some(src[top.next_move].clone_bare());
                top.next_annotation = 0;
            }

            let source = &src[top.next_move];
            match source.annotations.get(top.next_annotation) {
                None => {
                    if let Some(done) = top.current.take() {
                        top.out.push(done);
                    }
                    top.next_move += 1;
                }
                Some(Annotation::Subline(sub)) => stack.push(CloneFrame::new(&sub.moves)),
                Some(leaf) => {
                    if let Some(owner) = top.current.as_mut() {
                        owner.annotations.push(leaf.clone());
                    }
                    top.next_annotation += 1;
                }
            }
        }
    }
}

/// Lists the line's moves without descending into their own sublines.
impl fmt::Debug for Subline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.moves.iter().map(Move::lan))
            .finish()
    }
}

impl Drop for Subline {
    fn drop(&mut self) {
        // Flatten nested lines so dropping a deep tree never recurses.
        let mut pending = std::mem::take(&mut self.moves);
        while let Some(mut mv) = pending.pop() {
            for annotation in mv.annotations.drain(..) {
                if let Annotation::Subline(mut sub) = annotation {
                    pending.append(&mut sub.moves);
                }
            }
        }
    }
}

impl Move {
    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Remove the first annotation equal to `annotation`. Returns whether one
    /// was found.
    pub fn remove_annotation(&mut self, annotation: &Annotation) -> bool {
        match self.annotations.iter().position(|a| a == annotation) {
            Some(idx) => {
                self.annotations.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn remove_annotation_at(&mut self, index: usize) -> Option<Annotation> {
        (index < self.annotations.len()).then(|| self.annotations.remove(index))
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        &mut self.annotations
    }

    pub(crate) fn take_annotations(&mut self) -> Vec<Annotation> {
        std::mem::take(&mut self.annotations)
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    pub fn annotation_count_excluding_sublines(&self) -> usize {
        self.annotations
            .iter()
            .filter(|a| !matches!(a, Annotation::Subline(_)))
            .count()
    }

    pub fn comments(&self) -> Vec<&str> {
        self.annotations
            .iter()
            .filter_map(|a| match a {
                Annotation::Comment(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn arrows(&self) -> Vec<Arrow> {
        self.annotations
            .iter()
            .filter_map(|a| match a {
                Annotation::Arrow(arrow) => Some(*arrow),
                _ => None,
            })
            .collect()
    }

    pub fn highlights(&self) -> Vec<Highlight> {
        self.annotations
            .iter()
            .filter_map(|a| match a {
                Annotation::Highlight(h) => Some(*h),
                _ => None,
            })
            .collect()
    }

    pub fn nags(&self) -> Vec<Nag> {
        self.annotations
            .iter()
            .filter_map(|a| match a {
                Annotation::Nag(nag) => Some(*nag),
                _ => None,
            })
            .collect()
    }

    pub fn clock_times(&self) -> Vec<ClockTime> {
        self.annotations
            .iter()
            .filter_map(|a| match a {
                Annotation::ClockTime(clock) => Some(*clock),
                _ => None,
            })
            .collect()
    }

    pub fn sublines(&self) -> Vec<&Subline> {
        self.annotations
            .iter()
            .filter_map(|a| match a {
                Annotation::Subline(sub) => Some(sub),
                _ => None,
            })
            .collect()
    }

    pub fn has_subline(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| matches!(a, Annotation::Subline(_)))
    }

    pub fn has_nag(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| matches!(a, Annotation::Nag(_)))
    }
}

/// Visit every move of `line` and of all nested sublines in document order,
/// passing the nesting depth (0 for `line` itself).
pub fn walk<'a>(line: &'a [Move], mut visit: impl FnMut(usize, &'a Move)) {
    let mut stack: Vec<(std::slice::Iter<'a, Move>, usize)> = vec![(line.iter(), 0)];
    while let Some((iter, depth)) = stack.last_mut() {
        let depth = *depth;
        match iter.next() {
            Some(mv) => {
                visit(depth, mv);
                for sub in mv.sublines().into_iter().rev() {
                    stack.push((sub.moves.iter(), depth + 1));
                }
            }
            None => {
                stack.pop();
            }
        }
    }
}

/// Deepest variation nesting below `line` (0 when there are no sublines).
pub fn max_depth(line: &[Move]) -> usize {
    let mut deepest = 0;
    walk(line, |depth, _| deepest = deepest.max(depth));
    deepest
}

#[cfg(test)]
#[path = "annotation_tests.rs"]
mod annotation_tests;

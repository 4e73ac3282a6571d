//! Mapping syntax-tree locations to editor positions
//!
//! Tree locations are 1-based with an exclusive end column. Editor positions
//! are 0-based `(line, character)` pairs in UTF-16 code units, and ranges are
//! half-open. String literal ranges cover the string body only, so replacing
//! the range keeps the surrounding quotes intact.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::syntax::{AstNode, Point};

/// 0-based position in a text document
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

/// Half-open range of positions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn from_coords(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> Self {
        Self::new(
            Position::new(start_line, start_char),
            Position::new(end_line, end_char),
        )
    }

    /// Empty range at a single position (used for insertions)
    pub const fn empty(at: Position) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    /// True when the ranges overlap or touch
    pub fn intersects(&self, other: &TextRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

fn zero_based(point: &Point, column_shift: u32) -> Position {
    Position::new(
        point.line.saturating_sub(1),
        point.column.saturating_sub(column_shift),
    )
}

/// Convert a node location into a half-open 0-based range
pub fn to_range(node: &impl AstNode) -> TextRange {
    let loc = node.loc();
    if node.is_string_literal() {
        // The 1-based column of the opening quote is the 0-based column of the
        // first body character; the exclusive end sits past the closing quote.
        TextRange::new(zero_based(&loc.start, 0), zero_based(&loc.end, 2))
    } else {
        TextRange::new(zero_based(&loc.start, 1), zero_based(&loc.end, 1))
    }
}

/// 0-based start position of a node
pub fn to_start_position(node: &impl AstNode) -> Position {
    zero_based(&node.loc().start, 1)
}

/// 0-based exclusive end position of a node
pub fn to_end_position(node: &impl AstNode) -> Position {
    zero_based(&node.loc().end, 1)
}

/// Line start table for converting between positions and byte offsets
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i + 1),
                b'\r' if bytes.get(i + 1) != Some(&b'\n') => line_starts.push(i + 1),
                _ => {}
            }
            i += 1;
        }
        Self { text, line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte range of a line's content, excluding the line break
    fn line_bounds(&self, line: usize) -> (usize, usize) {
        let start = self.line_starts[line];
        let mut end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.text.len());
        let content = &self.text.as_bytes()[start..end];
        if content.ends_with(b"\r\n") {
            end -= 2;
        } else if content.ends_with(b"\n") || content.ends_with(b"\r") {
            end -= 1;
        }
        (start, end)
    }

    /// Byte offset of a position, clamped to the line end and document end
    pub fn offset(&self, position: Position) -> usize {
        let line = position.line as usize;
        if line >= self.line_starts.len() {
            return self.text.len();
        }
        let (start, end) = self.line_bounds(line);
        let mut units = 0u32;
        for (idx, ch) in self.text[start..end].char_indices() {
            if units >= position.character {
                return start + idx;
            }
            units += ch.len_utf16() as u32;
        }
        end
    }

    /// Position of a byte offset
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let character = self.text[start..offset]
            .chars()
            .map(|c| c.len_utf16() as u32)
            .sum();
        Position::new(line as u32, character)
    }

    /// Text covered by a range
    pub fn slice(&self, range: TextRange) -> &'a str {
        let start = self.offset(range.start);
        let end = self.offset(range.end).max(start);
        &self.text[start..end]
    }

    /// Content of a line without its line break
    pub fn line_text(&self, line: u32) -> Option<&'a str> {
        let line = line as usize;
        if line >= self.line_starts.len() {
            return None;
        }
        let (start, end) = self.line_bounds(line);
        Some(&self.text[start..end])
    }
}

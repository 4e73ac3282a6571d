//! Text edits produced by quick fixes

use serde::{Deserialize, Serialize};

use crate::position::{LineIndex, Position, TextRange};
use crate::{ProxyLintError, Result};

/// Replace `range` with `new_text`; an empty range is an insertion
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub range: TextRange,
    pub new_text: String,
}

impl TextEdit {
    pub fn replace(range: TextRange, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }

    pub fn insert(at: Position, new_text: impl Into<String>) -> Self {
        Self {
            range: TextRange::empty(at),
            new_text: new_text.into(),
        }
    }
}

/// Apply non-overlapping edits to `text`
///
/// Edits are applied back to front so earlier offsets stay valid. Edits at
/// the same position are applied in the order given.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> Result<String> {
    let index = LineIndex::new(text);
    let mut spans: Vec<(usize, usize, usize)> = edits
        .iter()
        .enumerate()
        .map(|(order, edit)| {
            let start = index.offset(edit.range.start);
            let end = index.offset(edit.range.end).max(start);
            (start, end, order)
        })
        .collect();
    spans.sort_by_key(|&(start, end, order)| (start, end, order));

    for pair in spans.windows(2) {
        if pair[1].0 < pair[0].1 {
            return Err(ProxyLintError::internal_error(format!(
                "Overlapping edits at {} and {}",
                edits[pair[0].2].range, edits[pair[1].2].range
            )));
        }
    }

    let mut result = text.to_string();
    for &(start, end, order) in spans.iter().rev() {
        result.replace_range(start..end, &edits[order].new_text);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_replacements_and_insertions() {
        let text = "{\n  \"a\": 1\n}";
        let edits = vec![
            TextEdit::insert(Position::new(1, 8), ",\n  \"b\": 2"),
            TextEdit::replace(TextRange::from_coords(1, 7, 1, 8), "10"),
        ];
        assert_eq!(
            apply_edits(text, &edits).unwrap(),
            "{\n  \"a\": 10,\n  \"b\": 2\n}"
        );
    }

    #[test]
    fn same_position_insertions_keep_order() {
        let edits = vec![
            TextEdit::insert(Position::new(0, 1), "a"),
            TextEdit::insert(Position::new(0, 1), "b"),
        ];
        assert!(edits.iter().all(|edit| edit.range.is_empty()));
        assert_eq!(apply_edits("{}", &edits).unwrap(), "{ab}");
    }

    #[test]
    fn rejects_overlaps() {
        let edits = vec![
            TextEdit::replace(TextRange::from_coords(0, 0, 0, 3), "x"),
            TextEdit::replace(TextRange::from_coords(0, 2, 0, 4), "y"),
        ];
        assert!(apply_edits("abcdef", &edits).is_err());
    }
}

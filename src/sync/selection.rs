//! Highlight geometry.
//!
//! The session addresses text by (row, byte column) and flat byte
//! offsets; the view addresses characters. Everything here returns
//! half-open character ranges into the snapshot text.

use std::ops::Range;

use crate::session::Position;

/// Line table over a snapshot text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Char offset of each line start.
    starts: Vec<usize>,
    /// Byte offset of each line start.
    byte_starts: Vec<usize>,
    len_chars: usize,
    len_bytes: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        let mut byte_starts = vec![0];
        let mut len_chars = 0;
        for (byte, c) in text.char_indices() {
            len_chars += 1;
            if c == '\n' {
                starts.push(len_chars);
                byte_starts.push(byte + 1);
            }
        }
        Self {
            starts,
            byte_starts,
            len_chars,
            len_bytes: text.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    pub const fn len_chars(&self) -> usize {
        self.len_chars
    }

    /// 0-based line containing a char offset. Offsets past the end
    /// belong to the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    pub fn line_start(&self, line: usize) -> usize {
        self.starts.get(line).copied().unwrap_or(self.len_chars)
    }

    /// Char offset just before the line's newline (or end of text).
    pub fn line_end(&self, line: usize) -> usize {
        self.starts
            .get(line + 1)
            .map_or(self.len_chars, |next| next - 1)
    }

    fn line_bytes(&self, line: usize) -> Option<Range<usize>> {
        let start = *self.byte_starts.get(line)?;
        let end = self
            .byte_starts
            .get(line + 1)
            .map_or(self.len_bytes, |next| next - 1);
        Some(start..end)
    }
}

/// Convert a flat byte offset into a char offset, rounding down to the
/// nearest char boundary and clamping to the text.
pub fn char_offset(text: &str, byte: usize) -> usize {
    let mut byte = byte.min(text.len());
    while !text.is_char_boundary(byte) {
        byte -= 1;
    }
    text[..byte].chars().count()
}

/// One-character block cursor at `caret`.
pub fn block_cursor(index: &LineIndex, caret: usize) -> Option<Range<usize>> {
    (caret < index.len_chars()).then(|| caret..caret + 1)
}

/// Characterwise selection between cursor and anchor.
///
/// Both ends are inclusive, as in the session's own visual selection,
/// so a selection where cursor and anchor coincide covers one
/// character and `begin <= end` always holds.
pub fn selection_span(cursor: usize, anchor: usize) -> Range<usize> {
    let (begin, end) = if cursor <= anchor {
        (cursor, anchor)
    } else {
        (anchor, cursor)
    };
    begin..end + 1
}

pub fn char_selection(index: &LineIndex, cursor: usize, anchor: usize) -> Option<Range<usize>> {
    let span = selection_span(cursor, anchor);
    let range = span.start.min(index.len_chars())..span.end.min(index.len_chars());
    (!range.is_empty()).then_some(range)
}

/// Linewise selection: from the start of the first line to the end of
/// the last, as one contiguous range.
pub fn line_selection(index: &LineIndex, cursor: usize, anchor: usize) -> Option<Range<usize>> {
    let span = selection_span(cursor, anchor);
    let first = index.line_of(span.start);
    let last = index.line_of(span.end - 1);
    let range = index.line_start(first)..index.line_end(last);
    // An empty line still selects its (virtual) character.
    if range.is_empty() {
        return (range.start < index.len_chars()).then(|| range.start..range.start + 1);
    }
    Some(range)
}

/// Blockwise selection: one range per line between the two rows,
/// spanning the byte columns between the two ends.
pub fn block_selection(
    text: &str,
    index: &LineIndex,
    cursor: Position,
    anchor: Position,
) -> Vec<Range<usize>> {
    let (top, bottom) = (cursor.row.min(anchor.row), cursor.row.max(anchor.row));
    let (left, right) = (cursor.col.min(anchor.col), cursor.col.max(anchor.col));
    if top == 0 || left == 0 {
        return Vec::new();
    }

    (top..=bottom)
        .filter_map(|row| {
            let line = row - 1;
            let bytes = index.line_bytes(line)?;
            let line_text = &text[bytes];
            if left - 1 >= line_text.len() {
                return None;
            }
            let start = char_offset(line_text, left - 1);
            let end = (char_offset(line_text, right - 1) + 1).min(line_text.chars().count());
            let base = index.line_start(line);
            Some(base + start..base + end)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index_tracks_line_bounds() {
        let index = LineIndex::new("abc\ndef");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_of(0), 0);
        assert_eq!(index.line_of(3), 0);
        assert_eq!(index.line_of(4), 1);
        assert_eq!(index.line_start(1), 4);
        assert_eq!(index.line_end(0), 3);
        assert_eq!(index.line_end(1), 7);
    }

    #[test]
    fn test_char_offset_counts_multibyte_characters() {
        let text = "héllo";
        assert_eq!(char_offset(text, 0), 0);
        assert_eq!(char_offset(text, 1), 1);
        // Byte 2 is inside 'é' and rounds down.
        assert_eq!(char_offset(text, 2), 1);
        assert_eq!(char_offset(text, 3), 2);
        assert_eq!(char_offset(text, 100), 5);
    }

    #[test]
    fn test_degenerate_selection_is_not_inverted() {
        let span = selection_span(5, 5);
        assert!(span.start <= span.end);
        assert_eq!(span, 5..6);
    }

    #[test]
    fn test_selection_span_orders_ends() {
        assert_eq!(selection_span(2, 6), 2..7);
        assert_eq!(selection_span(6, 2), 2..7);
    }

    #[test]
    fn test_char_selection_clamps_to_text() {
        let index = LineIndex::new("ab");
        assert_eq!(char_selection(&index, 1, 5), Some(1..2));
        assert_eq!(char_selection(&LineIndex::new(""), 0, 0), None);
    }

    #[test]
    fn test_line_selection_covers_whole_lines() {
        let index = LineIndex::new("abc\ndef\nghi");
        // cursor on 'e', anchor on 'a'
        assert_eq!(line_selection(&index, 5, 0), Some(0..7));
        // reversed direction yields the same range
        assert_eq!(line_selection(&index, 0, 5), Some(0..7));
        assert_eq!(line_selection(&index, 9, 9), Some(8..11));
    }

    #[test]
    fn test_line_selection_on_empty_line_keeps_one_cell() {
        let index = LineIndex::new("a\n\nb");
        assert_eq!(line_selection(&index, 2, 2), Some(2..3));
    }

    #[test]
    fn test_block_selection_builds_one_range_per_line() {
        let text = "abcd\nefgh\nij";
        let index = LineIndex::new(text);
        let ranges = block_selection(text, &index, Position::new(1, 2), Position::new(3, 3));
        assert_eq!(ranges, vec![1..3, 6..8, 11..12]);
    }

    #[test]
    fn test_block_selection_skips_short_lines() {
        let text = "abcd\n\nabcd";
        let index = LineIndex::new(text);
        let ranges = block_selection(text, &index, Position::new(3, 3), Position::new(1, 2));
        assert_eq!(ranges, vec![1..3, 7..9]);
    }
}

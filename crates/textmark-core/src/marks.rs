//! Page text and the offset → glyph mark index.
//!
//! [`PageText`] owns a page's logical text with its ordered [`TextMark`]s.
//! [`TextMarkArray`] is a borrowed view over a contiguous run of those
//! marks and answers range queries: which glyphs produced the substring
//! `[start, end)`, and what box encloses them.

use std::fmt;

use crate::error::TextError;
use crate::geometry::Rectangle;
use crate::text::TextMark;

/// The logical text of one page together with its marks.
///
/// Immutable after construction. Offsets are counted in chars.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageText {
    text: String,
    marks: Vec<TextMark>,
    char_len: usize,
}

impl PageText {
    /// Wrap assembled text and marks.
    ///
    /// Marks must be in non-decreasing offset order and stay within the
    /// text; the assembler guarantees both.
    pub fn new(text: String, marks: Vec<TextMark>) -> Self {
        debug_assert!(marks.windows(2).all(|w| w[0].offset <= w[1].offset));
        let char_len = text.chars().count();
        Self {
            text,
            marks,
            char_len,
        }
    }

    /// The page's logical text in reading order.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// View over all marks of the page.
    pub fn marks(&self) -> TextMarkArray<'_> {
        TextMarkArray {
            marks: &self.marks,
            text_len: self.char_len,
        }
    }

    /// Length of the text in chars.
    pub fn len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    /// Substring by char offsets; `None` when out of bounds.
    pub fn substring(&self, start: usize, end: usize) -> Option<&str> {
        if start > end || end > self.char_len {
            return None;
        }
        let from = self.byte_index(start);
        let to = self.byte_index(end);
        Some(&self.text[from..to])
    }

    /// Byte index of the char at `char_offset` (text length past the end).
    pub fn byte_index(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map_or(self.text.len(), |(i, _)| i)
    }

    /// Char offset of the char starting at byte index `byte`.
    pub fn char_offset(&self, byte: usize) -> usize {
        self.text
            .char_indices()
            .take_while(|(i, _)| *i < byte)
            .count()
    }
}

/// A borrowed, ordered run of [`TextMark`]s.
///
/// Offsets stay absolute: a view produced by [`range_offset`] still refers
/// to positions in the full page text.
///
/// [`range_offset`]: TextMarkArray::range_offset
#[derive(Debug, Clone, Copy)]
pub struct TextMarkArray<'a> {
    marks: &'a [TextMark],
    text_len: usize,
}

impl<'a> TextMarkArray<'a> {
    /// View over `marks` of a text `text_len` chars long.
    pub fn new(marks: &'a [TextMark], text_len: usize) -> Self {
        Self { marks, text_len }
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a TextMark> {
        self.marks.get(index)
    }

    pub fn first(&self) -> Option<&'a TextMark> {
        self.marks.first()
    }

    pub fn last(&self) -> Option<&'a TextMark> {
        self.marks.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'a, TextMark> {
        self.marks.iter()
    }

    /// The underlying marks.
    pub fn elements(&self) -> &'a [TextMark] {
        self.marks
    }

    /// Length in chars of the page text this view indexes.
    pub fn text_len(&self) -> usize {
        self.text_len
    }

    /// Marks whose coverage intersects the char range `[start, end)`.
    ///
    /// Fails with [`TextError::InvalidRange`] when `start < 0`,
    /// `end > text length` or `start >= end`, and with
    /// [`TextError::NoMatch`] when only separator marks (or none) fall in
    /// the range. A returned mark may start before `start` or end after
    /// `end` when it stands for several chars.
    pub fn range_offset(&self, start: i64, end: i64) -> Result<TextMarkArray<'a>, TextError> {
        let invalid = TextError::InvalidRange {
            start,
            end,
            len: self.text_len,
        };
        if start < 0 || start >= end {
            return Err(invalid);
        }
        let (Ok(from), Ok(to)) = (usize::try_from(start), usize::try_from(end)) else {
            return Err(invalid);
        };
        if to > self.text_len {
            return Err(invalid);
        }

        let intersects = |m: &TextMark| m.offset < to && m.end_offset() > from;
        let no_match = TextError::NoMatch {
            start: from,
            end: to,
        };
        let lo = self.marks.iter().position(intersects).ok_or(no_match.clone())?;
        let hi = self.marks.iter().rposition(intersects).ok_or(no_match.clone())?;
        let view = &self.marks[lo..=hi];
        if view.iter().all(|m| m.meta) {
            return Err(no_match);
        }
        Ok(TextMarkArray {
            marks: view,
            text_len: self.text_len,
        })
    }

    /// Smallest rectangle enclosing every mark that carries geometry.
    ///
    /// `None` for an empty view or one holding only separators.
    pub fn bbox(&self) -> Option<Rectangle> {
        self.marks
            .iter()
            .filter_map(|m| m.bbox)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Text covered by the view; marks sharing an offset count once.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut last_offset = None;
        for mark in self.marks {
            if last_offset == Some(mark.offset) {
                continue;
            }
            last_offset = Some(mark.offset);
            out.push_str(&mark.text);
        }
        out
    }
}

impl<'a> IntoIterator for TextMarkArray<'a> {
    type Item = &'a TextMark;
    type IntoIter = std::slice::Iter<'a, TextMark>;

    fn into_iter(self) -> Self::IntoIter {
        self.marks.iter()
    }
}

impl fmt::Display for TextMarkArray<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} marks", self.marks.len())?;
        for (i, mark) in self.marks.iter().enumerate() {
            writeln!(f, "{i:4}: {mark}")?;
        }
        Ok(())
    }
}

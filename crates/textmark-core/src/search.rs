//! Term lookup: find text patterns in a page and return their boxes.

use regex::Regex;

use crate::geometry::Rectangle;
use crate::marks::PageText;

/// Options controlling text search behavior.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOptions {
    /// Whether to interpret the pattern as a regex (default: `false`).
    /// When `false`, the pattern is treated as a literal string.
    pub regex: bool,
    /// Whether the search is case-sensitive (default: `true`).
    pub case_sensitive: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            regex: false,
            case_sensitive: true,
        }
    }
}

/// One occurrence of a search pattern in the page text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TermMatch {
    /// The matched text.
    pub text: String,
    /// Char offset of the match start.
    pub start: usize,
    /// Char offset one past the match end.
    pub end: usize,
    /// Union box of the glyphs behind the match; `None` when the match
    /// covers only inserted separators.
    pub bbox: Option<Rectangle>,
}

/// Search the page text for `pattern`.
///
/// Each regex match is converted from byte to char offsets and resolved
/// through [`TextMarkArray::range_offset`](crate::marks::TextMarkArray::range_offset).
/// Returns an empty vector if the pattern is invalid or nothing matches.
pub fn search_text(page: &PageText, pattern: &str, options: &SearchOptions) -> Vec<TermMatch> {
    if page.is_empty() || pattern.is_empty() {
        return Vec::new();
    }

    let regex_pattern = if options.regex {
        pattern.to_string()
    } else {
        regex::escape(pattern)
    };
    let regex_pattern = if options.case_sensitive {
        regex_pattern
    } else {
        format!("(?i){regex_pattern}")
    };
    let Ok(re) = Regex::new(&regex_pattern) else {
        return Vec::new();
    };

    let marks = page.marks();
    re.find_iter(page.text())
        .filter(|m| !m.is_empty())
        .map(|m| {
            let start = page.char_offset(m.start());
            let end = page.char_offset(m.end());
            let bbox = i64::try_from(start)
                .ok()
                .zip(i64::try_from(end).ok())
                .and_then(|(s, e)| marks.range_offset(s, e).ok())
                .and_then(|view| view.bbox());
            TermMatch {
                text: m.as_str().to_string(),
                start,
                end,
                bbox,
            }
        })
        .collect()
}

impl PageText {
    /// Search the page text; see [`search_text`].
    pub fn search(&self, pattern: &str, options: &SearchOptions) -> Vec<TermMatch> {
        search_text(self, pattern, options)
    }

    /// Box of the first literal, case-sensitive occurrence of `term`.
    pub fn term_bbox(&self, term: &str) -> Option<Rectangle> {
        search_text(self, term, &SearchOptions::default())
            .into_iter()
            .find_map(|m| m.bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::text::{Orientation, TextMark};

    fn mark(offset: usize, text: &str, x0: f64) -> TextMark {
        TextMark {
            offset,
            text: text.to_string(),
            original: text.to_string(),
            bbox: Some(Rectangle::new(x0, 10.0, x0 + 5.0, 20.0)),
            meta: false,
            font_name: "Courier".to_string(),
            font_size: 10.0,
            fill_color: Color::black(),
            stroke_color: Color::black(),
            orientation: Orientation::Deg0,
            invisible: false,
        }
    }

    /// "Hé lo" with an inserted space.
    fn page() -> PageText {
        PageText::new(
            "H\u{00E9} lo".to_string(),
            vec![
                mark(0, "H", 0.0),
                mark(1, "\u{00E9}", 5.0),
                TextMark::separator(2, " ", Orientation::Deg0),
                mark(3, "l", 20.0),
                mark(4, "o", 25.0),
            ],
        )
    }

    #[test]
    fn literal_search_maps_to_char_offsets() {
        let matches = page().search("lo", &SearchOptions::default());
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].start, matches[0].end), (3, 5));
        assert_eq!(matches[0].bbox, Some(Rectangle::new(20.0, 10.0, 30.0, 20.0)));
    }

    #[test]
    fn multibyte_prefix_does_not_shift_offsets() {
        let matches = page().search("\u{00E9} l", &SearchOptions::default());
        assert_eq!((matches[0].start, matches[0].end), (1, 4));
        assert_eq!(matches[0].bbox, Some(Rectangle::new(5.0, 10.0, 25.0, 20.0)));
    }

    #[test]
    fn case_insensitive_search() {
        let options = SearchOptions {
            case_sensitive: false,
            ..SearchOptions::default()
        };
        assert_eq!(page().search("h", &options).len(), 1);
        assert!(page().search("h", &SearchOptions::default()).is_empty());
    }

    #[test]
    fn regex_search() {
        let options = SearchOptions {
            regex: true,
            ..SearchOptions::default()
        };
        let matches = page().search("[a-z]+", &options);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "lo");
    }

    #[test]
    fn literal_mode_escapes_metacharacters() {
        assert!(page().search(".", &SearchOptions::default()).is_empty());
    }

    #[test]
    fn invalid_regex_yields_nothing() {
        let options = SearchOptions {
            regex: true,
            ..SearchOptions::default()
        };
        assert!(page().search("(", &options).is_empty());
    }

    #[test]
    fn separator_only_match_has_no_box() {
        let matches = page().search(" ", &SearchOptions::default());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].bbox, None);
    }

    #[test]
    fn term_bbox_first_occurrence() {
        assert_eq!(
            page().term_bbox("H"),
            Some(Rectangle::new(0.0, 10.0, 5.0, 20.0))
        );
        assert_eq!(page().term_bbox("zzz"), None);
    }
}

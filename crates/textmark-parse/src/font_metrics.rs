//! Glyph widths and vertical extent of a simple font.
//!
//! Mirrors the font dictionary entries that matter for glyph boxes:
//! /Widths, /FirstChar, /LastChar and the descriptor's /MissingWidth,
//! /Ascent and /Descent. All values are in glyph space units (1/1000 em).

use crate::standard_fonts::StandardFontData;

/// Default ascent when not specified (750/1000 of text space).
pub const DEFAULT_ASCENT: f64 = 750.0;

/// Default descent when not specified (-250/1000 of text space).
pub const DEFAULT_DESCENT: f64 = -250.0;

/// Default character width when not specified (600/1000 of text space).
pub const DEFAULT_WIDTH: f64 = 600.0;

/// Widths and vertical metrics for a font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// Glyph widths indexed by (char_code - first_char).
    widths: Vec<f64>,
    first_char: u32,
    /// Width for codes outside the widths array.
    missing_width: f64,
    /// Positive, above the baseline.
    ascent: f64,
    /// Negative, below the baseline.
    descent: f64,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::default_metrics()
    }
}

impl FontMetrics {
    /// Metrics from explicit /Widths starting at `first_char`.
    pub fn new(widths: Vec<f64>, first_char: u32, ascent: f64, descent: f64) -> Self {
        Self {
            widths,
            first_char,
            missing_width: DEFAULT_WIDTH,
            ascent,
            descent,
        }
    }

    /// Metrics for when font info is unavailable: every glyph 600 wide,
    /// ascent 750, descent -250.
    pub fn default_metrics() -> Self {
        Self {
            widths: Vec::new(),
            first_char: 0,
            missing_width: DEFAULT_WIDTH,
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
        }
    }

    /// Metrics of a built-in standard font.
    pub fn from_standard(data: &StandardFontData) -> Self {
        Self {
            widths: data.widths.iter().map(|&w| f64::from(w)).collect(),
            first_char: 0,
            missing_width: 0.0,
            ascent: f64::from(data.ascent),
            descent: f64::from(data.descent),
        }
    }

    pub fn with_missing_width(mut self, missing_width: f64) -> Self {
        self.missing_width = missing_width;
        self
    }

    /// Width of a character code.
    pub fn width(&self, code: u32) -> f64 {
        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .unwrap_or(self.missing_width)
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }

    pub fn missing_width(&self) -> f64 {
        self.missing_width
    }

    /// First character code covered by the widths array.
    pub fn first_char(&self) -> u32 {
        self.first_char
    }

    /// Last character code covered by the widths array, if any.
    pub fn last_char(&self) -> Option<u32> {
        (self.widths.len() as u32)
            .checked_sub(1)
            .map(|n| self.first_char + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard_fonts;

    #[test]
    fn width_lookup_within_range() {
        let metrics = FontMetrics::new(vec![250.0, 500.0, 750.0], 65, 700.0, -200.0);
        assert_eq!(metrics.width(65), 250.0);
        assert_eq!(metrics.width(66), 500.0);
        assert_eq!(metrics.width(67), 750.0);
        assert_eq!(metrics.last_char(), Some(67));
    }

    #[test]
    fn width_lookup_out_of_range_returns_missing_width() {
        let metrics =
            FontMetrics::new(vec![250.0, 500.0], 65, 700.0, -200.0).with_missing_width(300.0);
        assert_eq!(metrics.width(64), 300.0);
        assert_eq!(metrics.width(67), 300.0);
        assert_eq!(metrics.width(u32::MAX), 300.0);
    }

    #[test]
    fn empty_widths() {
        let metrics = FontMetrics::new(Vec::new(), 0, 700.0, -200.0);
        assert_eq!(metrics.width(0), DEFAULT_WIDTH);
        assert_eq!(metrics.last_char(), None);
    }

    #[test]
    fn default_metrics_values() {
        let metrics = FontMetrics::default();
        assert_eq!(metrics.width(65), 600.0);
        assert_eq!(metrics.ascent(), 750.0);
        assert_eq!(metrics.descent(), -250.0);
    }

    #[test]
    fn from_standard_font() {
        let helv = FontMetrics::from_standard(standard_fonts::lookup("Helvetica").unwrap());
        assert_eq!(helv.width(u32::from(b'P')), 667.0);
        assert_eq!(helv.width(300), 0.0);
        assert_eq!(helv.ascent(), 718.0);
        assert_eq!(helv.descent(), -207.0);
        assert_eq!(helv.last_char(), Some(255));
    }
}

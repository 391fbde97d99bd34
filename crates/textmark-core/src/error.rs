//! Error and warning types for textmark.
//!
//! Provides [`TextError`] for failures that stop processing of a page or a
//! query, [`ExtractWarning`] for recoverable faults that allow best-effort
//! continuation, [`ExtractResult`] for pairing a value with collected
//! warnings, and [`ExtractOptions`] for configuring limits, text
//! normalization and layout heuristics.

use std::fmt;

use crate::unicode_norm::UnicodeNorm;

/// Fatal error types for page extraction and mark queries.
#[derive(Debug, Clone, PartialEq)]
pub enum TextError {
    /// The content stream held bytes but no operator could be recovered.
    StreamDecode(String),
    /// The page never entered a text object.
    NoTextObject,
    /// A range query was malformed: negative start, end past the text, or
    /// an empty or inverted range.
    InvalidRange {
        start: i64,
        end: i64,
        /// Length of the page text in chars.
        len: usize,
    },
    /// A valid range covered no glyph-backed marks.
    NoMatch { start: usize, end: usize },
    /// A configured resource limit was exceeded.
    ResourceLimitExceeded {
        /// Name of the limit that was exceeded (e.g., "max_stream_bytes").
        limit_name: String,
        /// The configured limit value.
        limit_value: usize,
        /// The actual value that exceeded the limit.
        actual_value: usize,
    },
    /// Any other error, including warnings escalated by strict mode.
    Other(String),
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextError::StreamDecode(msg) => write!(f, "stream decode error: {msg}"),
            TextError::NoTextObject => write!(f, "page has no text object"),
            TextError::InvalidRange { start, end, len } => write!(
                f,
                "invalid range [{start}, {end}) for text of length {len}"
            ),
            TextError::NoMatch { start, end } => {
                write!(f, "no text marks in range [{start}, {end})")
            }
            TextError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => write!(
                f,
                "resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})"
            ),
            TextError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for TextError {}

/// Machine-readable warning code for categorizing extraction issues.
///
/// Use [`Other`](ExtractWarningCode::Other) for custom or uncategorized
/// warnings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum ExtractWarningCode {
    /// A malformed token was skipped in the content stream.
    StreamDecode,
    /// A character code had no Unicode mapping.
    UnmappedGlyph,
    /// A referenced font was not found in the page's fonts.
    MissingFont,
    /// A text operator appeared outside `BT`/`ET`.
    TextOutsideTextObject,
    /// An operator had missing or mistyped operands.
    MalformedOperator,
    /// Unbalanced `q`/`Q` or `BT`/`ET` pairs.
    UnbalancedState,
    /// A color space could not be resolved; black was used.
    UnsupportedColorspace,
    /// A configured resource limit was reached during extraction.
    ResourceLimitReached,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl ExtractWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            ExtractWarningCode::StreamDecode => "STREAM_DECODE",
            ExtractWarningCode::UnmappedGlyph => "UNMAPPED_GLYPH",
            ExtractWarningCode::MissingFont => "MISSING_FONT",
            ExtractWarningCode::TextOutsideTextObject => "TEXT_OUTSIDE_TEXT_OBJECT",
            ExtractWarningCode::MalformedOperator => "MALFORMED_OPERATOR",
            ExtractWarningCode::UnbalancedState => "UNBALANCED_STATE",
            ExtractWarningCode::UnsupportedColorspace => "UNSUPPORTED_COLORSPACE",
            ExtractWarningCode::ResourceLimitReached => "RESOURCE_LIMIT_REACHED",
            ExtractWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for ExtractWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal warning encountered during extraction.
///
/// Carries a structured [`code`](ExtractWarning::code), a human-readable
/// description, and optional source context: the index of the operator in
/// the content stream, the byte offset of a malformed token, and the
/// active font.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    /// Machine-readable warning code.
    pub code: ExtractWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Index of the operator in the content stream.
    pub operator_index: Option<usize>,
    /// Byte offset in the content stream.
    pub byte_offset: Option<usize>,
    /// Font name associated with the warning, if applicable.
    pub font_name: Option<String>,
}

impl ExtractWarning {
    /// Create a warning with just a description.
    ///
    /// Uses [`ExtractWarningCode::Other`] as the default code.
    pub fn new(description: impl Into<String>) -> Self {
        let desc = description.into();
        Self::with_code(ExtractWarningCode::Other(desc.clone()), desc)
    }

    /// Create a warning with a specific code and description.
    pub fn with_code(code: ExtractWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            operator_index: None,
            byte_offset: None,
            font_name: None,
        }
    }

    /// Attach the operator index (builder pattern).
    pub fn at_operator(mut self, index: usize) -> Self {
        self.operator_index = Some(index);
        self
    }

    /// Attach a content-stream byte offset (builder pattern).
    pub fn at_byte(mut self, offset: usize) -> Self {
        self.byte_offset = Some(offset);
        self
    }

    /// Attach the active font name (builder pattern).
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = Some(font_name.into());
        self
    }

    /// Convert this warning into a [`TextError`].
    ///
    /// Used by strict mode to escalate warnings to errors.
    pub fn to_error(&self) -> TextError {
        TextError::Other(self.to_string())
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(ref font_name) = self.font_name {
            write!(f, " [font {font_name}]")?;
        }
        if let Some(index) = self.operator_index {
            write!(f, " [operator #{index}]")?;
        }
        if let Some(offset) = self.byte_offset {
            write!(f, " [byte {offset}]")?;
        }
        Ok(())
    }
}

/// Result wrapper that pairs a value with collected warnings.
#[derive(Debug, Clone)]
pub struct ExtractResult<T> {
    /// The extracted value.
    pub value: T,
    /// Warnings collected during extraction.
    pub warnings: Vec<ExtractWarning>,
}

impl<T> ExtractResult<T> {
    /// Create a result with no warnings.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Create a result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<ExtractWarning>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if there are no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Transform the value while preserving warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExtractResult<U> {
        ExtractResult {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

/// Thresholds for the reading-order heuristics.
///
/// Factors are relative to the rendered font size of the glyph being placed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutOptions {
    /// Baseline shift that starts a new line (default: 0.5).
    pub line_break_factor: f64,
    /// Horizontal gap that inserts a word space (default: 0.2).
    pub word_gap_factor: f64,
    /// Merge diacritic glyphs with the base they overlap (default: true).
    pub merge_diacritics: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_break_factor: 0.5,
            word_gap_factor: 0.2,
            merge_diacritics: true,
        }
    }
}

/// Options controlling extraction behavior and resource limits.
///
/// Passed explicitly to every extraction call; there is no process-wide
/// configuration.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Maximum `q` nesting depth (default: 64).
    pub max_state_depth: usize,
    /// Maximum number of glyphs extracted per page (default: 100,000).
    pub max_glyphs_per_page: usize,
    /// Maximum content stream bytes to process (default: 100 MB).
    pub max_stream_bytes: usize,
    /// Whether to collect warnings during extraction (default: true).
    pub collect_warnings: bool,
    /// When true, any warning is escalated to an error (default: false).
    pub strict_mode: bool,
    /// Unicode normalization applied to each glyph's text (default: Nfc).
    pub unicode_norm: UnicodeNorm,
    /// Expand U+FB00–U+FB06 presentation ligatures (default: true).
    pub expand_ligatures: bool,
    /// Text for glyphs without a Unicode mapping (default: U+FFFD).
    ///
    /// `None` drops such glyphs from the text; the pen still advances.
    pub replacement_char: Option<char>,
    /// Emit a `trace` event for every glyph (default: false).
    pub trace_glyphs: bool,
    /// Reading-order thresholds.
    pub layout: LayoutOptions,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_state_depth: 64,
            max_glyphs_per_page: 100_000,
            max_stream_bytes: 100 * 1024 * 1024,
            collect_warnings: true,
            strict_mode: false,
            unicode_norm: UnicodeNorm::Nfc,
            expand_ligatures: true,
            replacement_char: Some('\u{FFFD}'),
            trace_glyphs: false,
            layout: LayoutOptions::default(),
        }
    }
}

impl ExtractOptions {
    /// Options that fail on the first recoverable fault.
    pub fn strict() -> Self {
        Self {
            strict_mode: true,
            ..Self::default()
        }
    }

    /// Options that keep glyph text exactly as the fonts decode it.
    pub fn raw_text() -> Self {
        Self {
            unicode_norm: UnicodeNorm::None,
            expand_ligatures: false,
            layout: LayoutOptions {
                merge_diacritics: false,
                ..LayoutOptions::default()
            },
            ..Self::default()
        }
    }

    /// Normalize one glyph's decoded text per these options.
    pub fn glyph_text(&self, decoded: &str) -> String {
        let normalized = self.unicode_norm.normalize(decoded);
        if self.expand_ligatures {
            crate::unicode_norm::expand_ligatures(&normalized)
        } else {
            normalized
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- TextError tests ---

    #[test]
    fn text_error_stream_decode() {
        let err = TextError::StreamDecode("no operators".to_string());
        assert_eq!(err.to_string(), "stream decode error: no operators");
    }

    #[test]
    fn text_error_invalid_range() {
        let err = TextError::InvalidRange {
            start: -1,
            end: 0,
            len: 18,
        };
        assert_eq!(err.to_string(), "invalid range [-1, 0) for text of length 18");
    }

    #[test]
    fn text_error_no_match() {
        let err = TextError::NoMatch { start: 5, end: 6 };
        assert_eq!(err.to_string(), "no text marks in range [5, 6)");
    }

    #[test]
    fn text_error_resource_limit_exceeded() {
        let err = TextError::ResourceLimitExceeded {
            limit_name: "max_stream_bytes".to_string(),
            limit_value: 1024,
            actual_value: 2048,
        };
        assert_eq!(
            err.to_string(),
            "resource limit exceeded: max_stream_bytes (limit: 1024, actual: 2048)"
        );
    }

    #[test]
    fn text_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(TextError::NoTextObject);
        assert_eq!(err.to_string(), "page has no text object");
    }

    // --- ExtractWarning tests ---

    #[test]
    fn warning_new_uses_other_code() {
        let w = ExtractWarning::new("something odd");
        assert_eq!(w.code, ExtractWarningCode::Other("something odd".to_string()));
        assert_eq!(w.to_string(), "[OTHER] something odd");
    }

    #[test]
    fn warning_with_full_context_display() {
        let w = ExtractWarning::with_code(ExtractWarningCode::UnmappedGlyph, "code 0x07 unmapped")
            .with_font("F1")
            .at_operator(12)
            .at_byte(340);
        assert_eq!(
            w.to_string(),
            "[UNMAPPED_GLYPH] code 0x07 unmapped [font F1] [operator #12] [byte 340]"
        );
    }

    #[test]
    fn warning_codes_as_str() {
        assert_eq!(ExtractWarningCode::StreamDecode.as_str(), "STREAM_DECODE");
        assert_eq!(
            ExtractWarningCode::UnsupportedColorspace.as_str(),
            "UNSUPPORTED_COLORSPACE"
        );
        assert_eq!(ExtractWarningCode::UnbalancedState.to_string(), "UNBALANCED_STATE");
    }

    #[test]
    fn warning_to_error() {
        let w = ExtractWarning::with_code(ExtractWarningCode::MissingFont, "font F9 not found");
        assert_eq!(
            w.to_error(),
            TextError::Other("[MISSING_FONT] font F9 not found".to_string())
        );
    }

    // --- ExtractResult tests ---

    #[test]
    fn extract_result_ok_is_clean() {
        let r = ExtractResult::ok(3);
        assert!(r.is_clean());
        let mapped = r.map(|v| v * 2);
        assert_eq!(mapped.value, 6);
    }

    #[test]
    fn extract_result_map_keeps_warnings() {
        let r = ExtractResult::with_warnings("x", vec![ExtractWarning::new("w")]);
        let mapped = r.map(str::len);
        assert_eq!(mapped.value, 1);
        assert_eq!(mapped.warnings.len(), 1);
    }

    // --- ExtractOptions tests ---

    #[test]
    fn extract_options_defaults() {
        let opts = ExtractOptions::default();
        assert_eq!(opts.max_state_depth, 64);
        assert_eq!(opts.max_glyphs_per_page, 100_000);
        assert_eq!(opts.max_stream_bytes, 100 * 1024 * 1024);
        assert!(opts.collect_warnings);
        assert!(!opts.strict_mode);
        assert_eq!(opts.unicode_norm, UnicodeNorm::Nfc);
        assert!(opts.expand_ligatures);
        assert_eq!(opts.replacement_char, Some('\u{FFFD}'));
        assert_eq!(opts.layout, LayoutOptions::default());
    }

    #[test]
    fn extract_options_strict() {
        assert!(ExtractOptions::strict().strict_mode);
    }

    #[test]
    fn glyph_text_expands_ligatures_by_default() {
        let opts = ExtractOptions::default();
        assert_eq!(opts.glyph_text("\u{FB01}"), "fi");
        assert_eq!(opts.glyph_text("e\u{0301}"), "\u{00E9}");
    }

    #[test]
    fn glyph_text_raw_keeps_presentation_forms() {
        let opts = ExtractOptions::raw_text();
        assert_eq!(opts.glyph_text("\u{FB01}"), "\u{FB01}");
        assert!(!opts.layout.merge_diacritics);
    }
}

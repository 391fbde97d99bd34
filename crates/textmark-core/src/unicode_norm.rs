//! Unicode handling for glyph text.
//!
//! Provides [`UnicodeNorm`] for selecting the normalization form applied to
//! each glyph's decoded text, ligature expansion, and the diacritic helpers
//! the assembler uses to merge accents with their base characters.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Unicode normalization form to apply to decoded glyph text.
///
/// Different producers encode the same visual text differently (composed
/// vs. decomposed accented chars). Normalizing per glyph keeps the page
/// text consistent without moving glyph boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnicodeNorm {
    /// No normalization (default).
    #[default]
    None,
    /// Canonical Decomposition, followed by Canonical Composition (NFC).
    Nfc,
    /// Canonical Decomposition (NFD).
    Nfd,
    /// Compatibility Decomposition, followed by Canonical Composition (NFKC).
    Nfkc,
    /// Compatibility Decomposition (NFKD).
    Nfkd,
}

impl UnicodeNorm {
    /// Apply this normalization form to the given string.
    ///
    /// Returns the input unchanged if normalization is `None`.
    pub fn normalize(&self, text: &str) -> String {
        match self {
            UnicodeNorm::None => text.to_string(),
            UnicodeNorm::Nfc => text.nfc().collect(),
            UnicodeNorm::Nfd => text.nfd().collect(),
            UnicodeNorm::Nfkc => text.nfkc().collect(),
            UnicodeNorm::Nfkd => text.nfkd().collect(),
        }
    }
}

/// Expand common Latin ligatures (U+FB00–U+FB06) to their multi-character equivalents.
pub fn expand_ligatures(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{FB00}' => result.push_str("ff"),
            '\u{FB01}' => result.push_str("fi"),
            '\u{FB02}' => result.push_str("fl"),
            '\u{FB03}' => result.push_str("ffi"),
            '\u{FB04}' => result.push_str("ffl"),
            '\u{FB05}' => result.push_str("\u{017F}t"), // long s + t
            '\u{FB06}' => result.push_str("st"),
            _ => result.push(ch),
        }
    }
    result
}

/// True when every char of `text` is a combining mark (and there is at least one).
pub fn is_combining_text(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_combining_mark)
}

/// Combining equivalent of a spacing accent glyph such as `´` or `¨`.
pub fn spacing_accent_to_combining(ch: char) -> Option<char> {
    let combining = match ch {
        '`' | '\u{02CB}' => '\u{0300}',
        '\u{00B4}' | '\u{02CA}' => '\u{0301}',
        '^' | '\u{02C6}' => '\u{0302}',
        '~' | '\u{02DC}' => '\u{0303}',
        '\u{00AF}' | '\u{02C9}' => '\u{0304}',
        '\u{02D8}' => '\u{0306}',
        '\u{02D9}' => '\u{0307}',
        '\u{00A8}' => '\u{0308}',
        '\u{02DA}' => '\u{030A}',
        '\u{02DD}' => '\u{030B}',
        '\u{02C7}' => '\u{030C}',
        '\u{00B8}' => '\u{0327}',
        '\u{02DB}' => '\u{0328}',
        _ => return None,
    };
    Some(combining)
}

/// Combining form of a single-char spacing accent string.
pub fn spacing_accent_text(text: &str) -> Option<String> {
    let mut chars = text.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    spacing_accent_to_combining(ch).map(String::from)
}

/// NFC-compose a base followed by diacritics.
///
/// Returns the composed text only when composition merged at least one
/// char; otherwise `None`.
pub fn compose_cluster(parts: &[&str]) -> Option<String> {
    let joined: String = parts.concat();
    let composed: String = joined.nfc().collect();
    (composed.chars().count() < joined.chars().count()).then_some(composed)
}

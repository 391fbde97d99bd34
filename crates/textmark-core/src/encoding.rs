//! Simple-font byte encodings.
//!
//! [`FontEncoding`] maps single-byte codes to Unicode: WinAnsiEncoding as the
//! base table, optionally patched by a `/Differences` array of glyph names.

/// Byte code to character table of a simple font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontEncoding {
    table: [Option<char>; 256],
}

impl Default for FontEncoding {
    fn default() -> Self {
        Self::win_ansi()
    }
}

impl FontEncoding {
    /// WinAnsiEncoding (Windows code page 1252).
    pub fn win_ansi() -> Self {
        Self {
            table: WIN_ANSI_TABLE,
        }
    }

    /// Every byte maps to the Latin-1 code point with the same value.
    pub fn latin1() -> Self {
        let mut table = [None; 256];
        for (code, slot) in table.iter_mut().enumerate() {
            *slot = char::from_u32(code as u32);
        }
        Self { table }
    }

    pub fn from_table(table: [Option<char>; 256]) -> Self {
        Self { table }
    }

    /// Apply a `/Differences` array.
    ///
    /// Each entry starts a run: `(32, ["space", "exclam"])` sets codes 32
    /// and 33. Unknown glyph names clear their code so it decodes as
    /// unmapped. Runs past code 255 are cut off.
    pub fn with_differences(mut self, differences: &[(u8, &[&str])]) -> Self {
        for &(start, names) in differences {
            for (code, name) in (start as usize..256).zip(names.iter()) {
                self.table[code] = glyph_name_to_char(name);
            }
        }
        self
    }

    /// Override single codes with already-resolved characters.
    pub fn apply_overrides(&mut self, overrides: &[(u8, char)]) {
        for &(code, ch) in overrides {
            self.table[code as usize] = Some(ch);
        }
    }

    pub fn decode(&self, code: u8) -> Option<char> {
        self.table[code as usize]
    }
}

/// Resolve a glyph name to its Unicode character.
///
/// Handles `uniXXXX`, `uXXXX`..`uXXXXXX`, single ASCII letters, and the
/// common Adobe names for Latin text including ligatures and spacing
/// accents.
pub fn glyph_name_to_char(name: &str) -> Option<char> {
    if let Some(hex) = name.strip_prefix("uni") {
        if hex.len() == 4 {
            return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        }
    }
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        }
    }
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Some(c);
        }
    }
    GLYPH_NAMES
        .binary_search_by_key(&name, |&(n, _)| n)
        .ok()
        .map(|i| GLYPH_NAMES[i].1)
}

/// Adobe glyph names, sorted for binary search.
static GLYPH_NAMES: &[(&str, char)] = &[
    ("AE", '\u{00C6}'),
    ("Aacute", '\u{00C1}'),
    ("Acircumflex", '\u{00C2}'),
    ("Adieresis", '\u{00C4}'),
    ("Agrave", '\u{00C0}'),
    ("Aring", '\u{00C5}'),
    ("Atilde", '\u{00C3}'),
    ("Cacute", '\u{0106}'),
    ("Ccedilla", '\u{00C7}'),
    ("Ccircumflex", '\u{0108}'),
    ("Eacute", '\u{00C9}'),
    ("Ecircumflex", '\u{00CA}'),
    ("Edieresis", '\u{00CB}'),
    ("Egrave", '\u{00C8}'),
    ("Eth", '\u{00D0}'),
    ("Euro", '\u{20AC}'),
    ("Iacute", '\u{00CD}'),
    ("Icircumflex", '\u{00CE}'),
    ("Idieresis", '\u{00CF}'),
    ("Igrave", '\u{00CC}'),
    ("Itilde", '\u{0128}'),
    ("Nacute", '\u{0143}'),
    ("Ncedilla", '\u{0145}'),
    ("Ntilde", '\u{00D1}'),
    ("OE", '\u{0152}'),
    ("Oacute", '\u{00D3}'),
    ("Ocircumflex", '\u{00D4}'),
    ("Odieresis", '\u{00D6}'),
    ("Ograve", '\u{00D2}'),
    ("Oslash", '\u{00D8}'),
    ("Otilde", '\u{00D5}'),
    ("Scaron", '\u{0160}'),
    ("Thorn", '\u{00DE}'),
    ("Uacute", '\u{00DA}'),
    ("Ucircumflex", '\u{00DB}'),
    ("Udieresis", '\u{00DC}'),
    ("Ugrave", '\u{00D9}'),
    ("Uring", '\u{016E}'),
    ("Utilde", '\u{0168}'),
    ("Yacute", '\u{00DD}'),
    ("Ycircumflex", '\u{0176}'),
    ("Ydieresis", '\u{0178}'),
    ("Zcaron", '\u{017D}'),
    ("aacute", '\u{00E1}'),
    ("acircumflex", '\u{00E2}'),
    ("acute", '\u{00B4}'),
    ("adieresis", '\u{00E4}'),
    ("ae", '\u{00E6}'),
    ("agrave", '\u{00E0}'),
    ("ampersand", '\u{0026}'),
    ("aring", '\u{00E5}'),
    ("asciicircum", '\u{005E}'),
    ("asciitilde", '\u{007E}'),
    ("asterisk", '\u{002A}'),
    ("at", '\u{0040}'),
    ("atilde", '\u{00E3}'),
    ("backslash", '\u{005C}'),
    ("bar", '\u{007C}'),
    ("braceleft", '\u{007B}'),
    ("braceright", '\u{007D}'),
    ("bracketleft", '\u{005B}'),
    ("bracketright", '\u{005D}'),
    ("breve", '\u{02D8}'),
    ("brokenbar", '\u{00A6}'),
    ("bullet", '\u{2022}'),
    ("cacute", '\u{0107}'),
    ("caron", '\u{02C7}'),
    ("ccedilla", '\u{00E7}'),
    ("ccircumflex", '\u{0109}'),
    ("cedilla", '\u{00B8}'),
    ("cent", '\u{00A2}'),
    ("circumflex", '\u{02C6}'),
    ("colon", '\u{003A}'),
    ("comma", '\u{002C}'),
    ("copyright", '\u{00A9}'),
    ("currency", '\u{00A4}'),
    ("dagger", '\u{2020}'),
    ("daggerdbl", '\u{2021}'),
    ("degree", '\u{00B0}'),
    ("dieresis", '\u{00A8}'),
    ("divide", '\u{00F7}'),
    ("dollar", '\u{0024}'),
    ("dotaccent", '\u{02D9}'),
    ("dotlessi", '\u{0131}'),
    ("eacute", '\u{00E9}'),
    ("ecircumflex", '\u{00EA}'),
    ("edieresis", '\u{00EB}'),
    ("egrave", '\u{00E8}'),
    ("eight", '\u{0038}'),
    ("ellipsis", '\u{2026}'),
    ("emdash", '\u{2014}'),
    ("endash", '\u{2013}'),
    ("equal", '\u{003D}'),
    ("eth", '\u{00F0}'),
    ("exclam", '\u{0021}'),
    ("exclamdown", '\u{00A1}'),
    ("ff", '\u{FB00}'),
    ("ffi", '\u{FB03}'),
    ("ffl", '\u{FB04}'),
    ("fi", '\u{FB01}'),
    ("five", '\u{0035}'),
    ("fl", '\u{FB02}'),
    ("florin", '\u{0192}'),
    ("four", '\u{0034}'),
    ("fraction", '\u{2044}'),
    ("germandbls", '\u{00DF}'),
    ("grave", '\u{0060}'),
    ("greater", '\u{003E}'),
    ("guillemotleft", '\u{00AB}'),
    ("guillemotright", '\u{00BB}'),
    ("guilsinglleft", '\u{2039}'),
    ("guilsinglright", '\u{203A}'),
    ("hungarumlaut", '\u{02DD}'),
    ("hyphen", '\u{002D}'),
    ("iacute", '\u{00ED}'),
    ("icircumflex", '\u{00EE}'),
    ("idieresis", '\u{00EF}'),
    ("igrave", '\u{00EC}'),
    ("itilde", '\u{0129}'),
    ("less", '\u{003C}'),
    ("logicalnot", '\u{00AC}'),
    ("macron", '\u{00AF}'),
    ("minus", '\u{2212}'),
    ("mu", '\u{00B5}'),
    ("multiply", '\u{00D7}'),
    ("nacute", '\u{0144}'),
    ("nbspace", '\u{00A0}'),
    ("ncedilla", '\u{0146}'),
    ("nine", '\u{0039}'),
    ("ntilde", '\u{00F1}'),
    ("numbersign", '\u{0023}'),
    ("oacute", '\u{00F3}'),
    ("ocircumflex", '\u{00F4}'),
    ("odieresis", '\u{00F6}'),
    ("oe", '\u{0153}'),
    ("ogonek", '\u{02DB}'),
    ("ograve", '\u{00F2}'),
    ("one", '\u{0031}'),
    ("ordfeminine", '\u{00AA}'),
    ("ordmasculine", '\u{00BA}'),
    ("oslash", '\u{00F8}'),
    ("otilde", '\u{00F5}'),
    ("paragraph", '\u{00B6}'),
    ("parenleft", '\u{0028}'),
    ("parenright", '\u{0029}'),
    ("percent", '\u{0025}'),
    ("period", '\u{002E}'),
    ("periodcentered", '\u{00B7}'),
    ("perthousand", '\u{2030}'),
    ("plus", '\u{002B}'),
    ("plusminus", '\u{00B1}'),
    ("question", '\u{003F}'),
    ("questiondown", '\u{00BF}'),
    ("quotedbl", '\u{0022}'),
    ("quotedblbase", '\u{201E}'),
    ("quotedblleft", '\u{201C}'),
    ("quotedblright", '\u{201D}'),
    ("quoteleft", '\u{2018}'),
    ("quoteright", '\u{2019}'),
    ("quotesinglbase", '\u{201A}'),
    ("quotesingle", '\u{0027}'),
    ("registered", '\u{00AE}'),
    ("ring", '\u{02DA}'),
    ("scaron", '\u{0161}'),
    ("section", '\u{00A7}'),
    ("semicolon", '\u{003B}'),
    ("seven", '\u{0037}'),
    ("six", '\u{0036}'),
    ("slash", '\u{002F}'),
    ("space", '\u{0020}'),
    ("sterling", '\u{00A3}'),
    ("thorn", '\u{00FE}'),
    ("three", '\u{0033}'),
    ("tilde", '\u{02DC}'),
    ("trademark", '\u{2122}'),
    ("two", '\u{0032}'),
    ("uacute", '\u{00FA}'),
    ("ucircumflex", '\u{00FB}'),
    ("udieresis", '\u{00FC}'),
    ("ugrave", '\u{00F9}'),
    ("underscore", '\u{005F}'),
    ("uring", '\u{016F}'),
    ("utilde", '\u{0169}'),
    ("yacute", '\u{00FD}'),
    ("ycircumflex", '\u{0177}'),
    ("ydieresis", '\u{00FF}'),
    ("yen", '\u{00A5}'),
    ("zcaron", '\u{017E}'),
    ("zero", '\u{0030}'),
];

/// Code points for 0x80..=0x9F, where WinAnsi departs from Latin-1.
const WIN_ANSI_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

static WIN_ANSI_TABLE: [Option<char>; 256] = {
    let mut t = [None; 256];
    let mut code = 0;
    while code < 256 {
        t[code] = match code {
            0x7F => None,
            0x80..=0x9F => WIN_ANSI_HIGH[code - 0x80],
            _ => char::from_u32(code as u32),
        };
        code += 1;
    }
    t
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_ansi_ascii_and_latin1() {
        let enc = FontEncoding::win_ansi();
        assert_eq!(enc.decode(b'A'), Some('A'));
        assert_eq!(enc.decode(b' '), Some(' '));
        assert_eq!(enc.decode(0xE9), Some('é'));
        assert_eq!(enc.decode(0xB4), Some('\u{00B4}'));
    }

    #[test]
    fn win_ansi_high_range() {
        let enc = FontEncoding::win_ansi();
        assert_eq!(enc.decode(0x80), Some('€'));
        assert_eq!(enc.decode(0x93), Some('\u{201C}'));
        assert_eq!(enc.decode(0x97), Some('\u{2014}'));
        assert_eq!(enc.decode(0x81), None);
        assert_eq!(enc.decode(0x7F), None);
    }

    #[test]
    fn latin1_is_identity() {
        let enc = FontEncoding::latin1();
        assert_eq!(enc.decode(0x80), Some('\u{0080}'));
        assert_eq!(enc.decode(0xFF), Some('ÿ'));
    }

    #[test]
    fn differences_patch_runs() {
        let names: &[&str] = &["fi", "fl", "bogus"];
        let enc = FontEncoding::win_ansi().with_differences(&[(1, names)]);
        assert_eq!(enc.decode(1), Some('\u{FB01}'));
        assert_eq!(enc.decode(2), Some('\u{FB02}'));
        assert_eq!(enc.decode(3), None);
        assert_eq!(enc.decode(b'A'), Some('A'));
    }

    #[test]
    fn differences_stop_at_255() {
        let names: &[&str] = &["A", "B", "C"];
        let enc = FontEncoding::win_ansi().with_differences(&[(254, names)]);
        assert_eq!(enc.decode(254), Some('A'));
        assert_eq!(enc.decode(255), Some('B'));
    }

    #[test]
    fn overrides() {
        let mut enc = FontEncoding::win_ansi();
        enc.apply_overrides(&[(b'x', 'ж')]);
        assert_eq!(enc.decode(b'x'), Some('ж'));
    }

    #[test]
    fn glyph_names() {
        assert_eq!(glyph_name_to_char("A"), Some('A'));
        assert_eq!(glyph_name_to_char("z"), Some('z'));
        assert_eq!(glyph_name_to_char("space"), Some(' '));
        assert_eq!(glyph_name_to_char("eacute"), Some('é'));
        assert_eq!(glyph_name_to_char("acute"), Some('\u{00B4}'));
        assert_eq!(glyph_name_to_char("ffi"), Some('\u{FB03}'));
        assert_eq!(glyph_name_to_char("uni0041"), Some('A'));
        assert_eq!(glyph_name_to_char("u1F600"), Some('\u{1F600}'));
        assert_eq!(glyph_name_to_char("unknown"), None);
        assert_eq!(glyph_name_to_char("uniZZZZ"), None);
    }

    #[test]
    fn glyph_table_is_sorted() {
        assert!(GLYPH_NAMES.windows(2).all(|w| w[0].0 < w[1].0));
    }
}

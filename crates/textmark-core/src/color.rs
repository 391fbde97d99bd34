//! Colors attached to text marks.

/// A device color as set by the content stream.
///
/// Components are in `[0.0, 1.0]`. Colors from spaces that cannot be
/// resolved fall back to [`Color::black`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// DeviceGray level.
    Gray(f64),
    /// DeviceRGB triple.
    Rgb(f64, f64, f64),
    /// DeviceCMYK quadruple.
    Cmyk(f64, f64, f64, f64),
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

impl Color {
    /// Black, the initial fill and stroke color of every page.
    pub fn black() -> Self {
        Color::Gray(0.0)
    }

    /// Convert to RGB using the naive device conversions.
    pub fn to_rgb(&self) -> (f64, f64, f64) {
        match *self {
            Color::Gray(g) => (g, g, g),
            Color::Rgb(r, g, b) => (r, g, b),
            Color::Cmyk(c, m, y, k) => (
                (1.0 - c) * (1.0 - k),
                (1.0 - m) * (1.0 - k),
                (1.0 - y) * (1.0 - k),
            ),
        }
    }

    /// Hex string `#rrggbb` of the RGB conversion.
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb();
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
    }
}

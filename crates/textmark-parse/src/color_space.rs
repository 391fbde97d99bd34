//! Color space resolution for fill and stroke colors.
//!
//! Only the device spaces are resolved. Anything else (ICC profiles,
//! patterns, spot colors referenced through page resources) is reported as
//! unsupported and falls back to black.

use textmark_core::Color;

/// A color space selected by `CS`/`cs` or implied by `G`/`RG`/`K`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ColorSpace {
    /// DeviceGray (1 component).
    #[default]
    DeviceGray,
    /// DeviceRGB (3 components).
    DeviceRGB,
    /// DeviceCMYK (4 components).
    DeviceCMYK,
    /// A space this crate cannot resolve, kept by name for diagnostics.
    Unsupported(String),
}

impl ColorSpace {
    /// Resolve a color space operand name, including the inline-image
    /// abbreviations.
    pub fn from_name(name: &str) -> Self {
        match name {
            "DeviceGray" | "G" | "CalGray" => ColorSpace::DeviceGray,
            "DeviceRGB" | "RGB" | "CalRGB" => ColorSpace::DeviceRGB,
            "DeviceCMYK" | "CMYK" => ColorSpace::DeviceCMYK,
            other => ColorSpace::Unsupported(other.to_string()),
        }
    }

    /// Number of components expected for this color space.
    pub fn num_components(&self) -> Option<usize> {
        match self {
            ColorSpace::DeviceGray => Some(1),
            ColorSpace::DeviceRGB => Some(3),
            ColorSpace::DeviceCMYK => Some(4),
            ColorSpace::Unsupported(_) => None,
        }
    }

    /// Initial color after the space is selected (all zeros, black).
    pub fn initial_color(&self) -> Color {
        match self {
            ColorSpace::DeviceRGB => Color::Rgb(0.0, 0.0, 0.0),
            ColorSpace::DeviceCMYK => Color::Cmyk(0.0, 0.0, 0.0, 1.0),
            _ => Color::black(),
        }
    }

    /// Convert color components, `None` when the space is unsupported.
    ///
    /// Missing components read as 0; extra ones are ignored.
    pub fn resolve(&self, components: &[f64]) -> Option<Color> {
        let c = |i: usize| components.get(i).copied().unwrap_or(0.0).clamp(0.0, 1.0);
        match self {
            ColorSpace::DeviceGray => Some(Color::Gray(c(0))),
            ColorSpace::DeviceRGB => Some(Color::Rgb(c(0), c(1), c(2))),
            ColorSpace::DeviceCMYK => Some(Color::Cmyk(c(0), c(1), c(2), c(3))),
            ColorSpace::Unsupported(_) => None,
        }
    }
}

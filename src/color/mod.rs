//! Color representation for dominant poster colors.
//!
//! A [`Color`] carries the clustering library's native Lab value alongside
//! the sRGB value and its HSLV decomposition, all computed once at
//! construction. Within an entry's color list, colors are ordered by
//! descending occurrence count; index 0 is "the dominant color".

mod extract;

pub use extract::{decode_poster, ColorExtractor, ExtractError, KmeansExtractor};

use palette::{Clamp, FromColor, Hsl, Hsv, Lab, Srgb};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors parsing a hex color string.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid hex color {0:?}")]
pub struct ColorParseError(pub String);

/// One dominant color with its pixel occurrence count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Native value from the clustering step.
    pub lab: Lab,
    /// sRGB value, clamped into gamut.
    pub rgb: Srgb,
    /// `#rrggbb` hex string.
    pub hex: String,
    /// Hue in degrees, 0–360.
    pub hue: f64,
    pub saturation: f64,
    pub luminance: f64,
    pub value: f64,
    /// Number of pixels assigned to this cluster.
    pub count: u32,
}

impl Color {
    /// Builds a color from a Lab cluster centroid.
    pub fn from_lab(lab: Lab, count: u32) -> Self {
        let rgb = Srgb::from_color(lab).clamp();
        Self::build(lab, rgb, count)
    }

    /// Builds a color from an sRGB value.
    pub fn from_srgb(rgb: Srgb, count: u32) -> Self {
        let lab = Lab::from_color(rgb);
        Self::build(lab, rgb, count)
    }

    /// Parses a `#rrggbb` string (either case) into a color.
    pub fn from_hex(hex: &str, count: u32) -> Result<Self, ColorParseError> {
        let digits = hex
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.is_ascii())
            .ok_or_else(|| ColorParseError(hex.to_string()))?;

        let channel = |range| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError(hex.to_string()))
        };
        let r = channel(0..2)?;
        let g = channel(2..4)?;
        let b = channel(4..6)?;

        Ok(Self::from_srgb(Srgb::new(r, g, b).into_format(), count))
    }

    fn build(lab: Lab, rgb: Srgb, count: u32) -> Self {
        let hsl = Hsl::from_color(rgb);
        let hsv = Hsv::from_color(rgb);
        let bytes = rgb.into_format::<u8>();

        Self {
            lab,
            rgb,
            hex: format!("#{:02x}{:02x}{:02x}", bytes.red, bytes.green, bytes.blue),
            hue: f64::from(hsl.hue.into_positive_degrees()),
            saturation: f64::from(hsl.saturation),
            luminance: f64::from(hsl.lightness),
            value: f64::from(hsv.value),
            count,
        }
    }

    /// Chromatic intensity: `sqrt(R² + G² + B² − RG − RB − GB)`.
    ///
    /// Exactly zero for achromatic (gray) colors.
    pub fn vividness(&self) -> f64 {
        let r = f64::from(self.rgb.red);
        let g = f64::from(self.rgb.green);
        let b = f64::from(self.rgb.blue);
        if r == g && g == b {
            return 0.0;
        }
        (r * r + g * g + b * b - r * g - r * b - g * b).sqrt()
    }
}

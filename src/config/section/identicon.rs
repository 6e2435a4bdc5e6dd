//! `[identicon]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [identicon]
//! size = 64                                # Canvas side length in px
//! margin = 0.16                            # Margin as a fraction of size
//! pixels = 5                               # Cells per side
//! saturation = 0.7                         # HSL saturation of the hash color
//! lightness = 0.5                          # HSL lightness of the hash color
//! inverted = false                         # Hash color as page fill instead
//! background = "rgba(240, 240, 240, 1.0)"  # Fixed color
//! format = "svg"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::identicon::{Color, Geometry};

/// Identicon output format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Scalable vector graphics document.
    #[default]
    Svg,
}

impl OutputFormat {
    /// Get file extension for this format.
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
        }
    }

    /// Content type used when serving this format.
    pub const fn mime(&self) -> &'static str {
        match self {
            Self::Svg => crate::utils::mime::types::SVG,
        }
    }
}

/// Generator settings. Immutable once a generator is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdenticonConfig {
    /// Fixed color: page fill, or cell color when `inverted`.
    pub background: Color,

    /// Margin around the grid as a fraction of `size`.
    pub margin: f64,

    /// Canvas width and height.
    pub size: u32,

    /// HSL saturation of the hash-derived color.
    pub saturation: f64,

    /// HSL lightness of the hash-derived color.
    pub lightness: f64,

    pub format: OutputFormat,

    /// Swap which of the two colors comes from the hash.
    pub inverted: bool,

    /// Grid cells per side.
    pub pixels: u32,
}

impl Default for IdenticonConfig {
    fn default() -> Self {
        Self {
            background: Color::rgb(240, 240, 240),
            margin: 0.16,
            size: 64,
            saturation: 0.7,
            lightness: 0.5,
            format: OutputFormat::Svg,
            inverted: false,
            pixels: 5,
        }
    }
}

impl IdenticonConfig {
    pub const SIZE: FieldPath = FieldPath::new("identicon.size");
    pub const MARGIN: FieldPath = FieldPath::new("identicon.margin");
    pub const PIXELS: FieldPath = FieldPath::new("identicon.pixels");
    pub const SATURATION: FieldPath = FieldPath::new("identicon.saturation");
    pub const LIGHTNESS: FieldPath = FieldPath::new("identicon.lightness");

    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.size, self.margin, self.pixels)
    }

    /// Validate generator settings.
    ///
    /// # Checks
    /// - `size` and `pixels` are positive
    /// - `margin` lies in `[0, 0.5)`
    /// - `saturation` and `lightness` lie in `[0, 1]`
    /// - the grid fits: every cell is at least 1px wide
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.size == 0 {
            diag.error(Self::SIZE, "must be greater than 0");
        }
        if self.pixels == 0 {
            diag.error(Self::PIXELS, "must be greater than 0");
        }
        if !(0.0..0.5).contains(&self.margin) {
            diag.error_with_hint(
                Self::MARGIN,
                format!("{} is out of range", self.margin),
                "margin is a fraction of the size per side, use a value in [0, 0.5)",
            );
        }
        if !(0.0..=1.0).contains(&self.saturation) {
            diag.error(
                Self::SATURATION,
                format!("{} is out of range [0, 1]", self.saturation),
            );
        }
        if !(0.0..=1.0).contains(&self.lightness) {
            diag.error(
                Self::LIGHTNESS,
                format!("{} is out of range [0, 1]", self.lightness),
            );
        }

        if self.size > 0 && self.pixels > 0 && self.geometry().is_degenerate() {
            diag.error_with_hint(
                Self::PIXELS,
                format!(
                    "{} cells do not fit in a {}px canvas",
                    self.pixels, self.size
                ),
                "increase `size`, or lower `pixels` or `margin`",
            );
        }
    }
}

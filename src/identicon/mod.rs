//! Identicon generation.
//!
//! Maps a hexadecimal hash string to a symmetric grid of colored squares and
//! serializes it as SVG. Pure: the same configuration and hash always give
//! the same document.
//!
//! # Modules
//!
//! - [`color`]: RGBA value type and HSL conversion
//! - [`grid`]: Geometry and the mirrored cell layout
//! - [`svg`]: Document serialization
//! - [`cache`]: Memoized documents for the server
//!
//! # Pipeline
//!
//! ```text
//! hash ──► last 7 digits ──► hue ──► HSL → RGB ──► foreground / background
//!   │
//!   └────► first pixels·⌈pixels/2⌉ digits ──► parity ──► cells ──► rects
//!                                                                    │
//!                                                         svg ◄──────┘
//! ```

mod cache;
mod color;
mod error;
mod grid;
mod svg;

pub use cache::DocumentCache;
pub use color::{Color, ParseColorError};
pub use error::IdenticonError;
pub use grid::{Cell, Geometry, Rect};

use serde::Serialize;

use crate::config::{IdenticonConfig, OutputFormat};

/// Trailing hash digits that determine the hue.
pub const HUE_DIGITS: usize = 7;

/// Largest value of [`HUE_DIGITS`] hex digits.
pub const HUE_MAX: u32 = 0x0FFF_FFFF;

/// Result type for identicon operations.
pub type Result<T> = std::result::Result<T, IdenticonError>;

/// Deterministic identicon generator.
///
/// Built once from a configuration and invoked once per hash. Holds no
/// mutable state, so a shared reference can be used from any thread.
#[derive(Debug, Clone)]
pub struct IdenticonGenerator {
    config: IdenticonConfig,
    geometry: Geometry,
}

impl IdenticonGenerator {
    /// The configuration is expected to have passed
    /// [`IdenticonConfig::validate`]; a degenerate grid renders empty cells.
    pub fn new(config: IdenticonConfig) -> Self {
        let geometry = config.geometry();
        Self { config, geometry }
    }

    pub fn config(&self) -> &IdenticonConfig {
        &self.config
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Minimum hash length this generator accepts.
    pub fn required_digits(&self) -> usize {
        self.geometry.digit_count().max(HUE_DIGITS)
    }

    /// Hue in `[0, 1)` from the last [`HUE_DIGITS`] digits.
    pub fn hue(&self, hash: &str) -> Result<f64> {
        let chars: Vec<char> = hash.chars().collect();
        if chars.len() < HUE_DIGITS {
            return Err(IdenticonError::too_short(hash, HUE_DIGITS, chars.len()));
        }

        let start = chars.len() - HUE_DIGITS;
        let mut value = 0u32;
        for (offset, &ch) in chars[start..].iter().enumerate() {
            let digit = ch
                .to_digit(16)
                .ok_or_else(|| IdenticonError::invalid_digit(hash, start + offset, ch))?;
            value = value * 16 + digit;
        }

        // 0xFFFFFFF / 0xFFFFFFF is the same hue as 0
        let hue = f64::from(value) / f64::from(HUE_MAX);
        Ok(if hue >= 1.0 { 0.0 } else { hue })
    }

    /// Color derived from the hash with the configured lightness and saturation.
    pub fn hash_color(&self, hash: &str) -> Result<Color> {
        let hue = self.hue(hash)?;
        Ok(Color::from_hls(
            hue,
            self.config.lightness,
            self.config.saturation,
        ))
    }

    /// Page fill: the hash color when inverted, else the configured background.
    pub fn background(&self, hash: &str) -> Result<Color> {
        if self.config.inverted {
            self.hash_color(hash)
        } else {
            Ok(self.config.background)
        }
    }

    /// Cell color: the configured background when inverted, else the hash color.
    pub fn foreground(&self, hash: &str) -> Result<Color> {
        if self.config.inverted {
            Ok(self.config.background)
        } else {
            self.hash_color(hash)
        }
    }

    /// Every grid cell, lit or not.
    pub fn cells(&self, hash: &str) -> Result<Vec<Cell>> {
        let digits = self.grid_digits(hash)?;
        Ok(grid::layout(&self.geometry, &digits))
    }

    /// Foreground squares for the lit cells only.
    pub fn rectangles(&self, hash: &str) -> Result<Vec<Rect>> {
        let foreground = self.foreground(hash)?;
        let rects = self
            .cells(hash)?
            .iter()
            .filter(|cell| cell.on)
            .map(|cell| grid::to_rect(&self.geometry, cell, foreground))
            .collect();
        Ok(rects)
    }

    /// A square for every cell, in the foreground color when lit and the
    /// background color when not.
    pub fn colored_rectangles(&self, hash: &str) -> Result<Vec<Rect>> {
        let foreground = self.foreground(hash)?;
        let background = self.background(hash)?;
        let rects = self
            .cells(hash)?
            .iter()
            .map(|cell| {
                let color = if cell.on { foreground } else { background };
                grid::to_rect(&self.geometry, cell, color)
            })
            .collect();
        Ok(rects)
    }

    /// Render the configured output format.
    ///
    /// Off cells are never written: drawn in the background color they would
    /// be indistinguishable from the page fill.
    pub fn render(&self, hash: &str) -> Result<String> {
        match self.config.format {
            OutputFormat::Svg => self.render_svg(hash),
        }
    }

    pub fn render_svg(&self, hash: &str) -> Result<String> {
        let background = self.background(hash)?;
        let foreground = self.foreground(hash)?;
        let rects = self.rectangles(hash)?;

        svg::Document {
            size: self.config.size,
            background,
            foreground,
            rects: &rects,
        }
        .write()
    }

    /// Collect every derived value for the hash.
    ///
    /// `all` lists every cell as a rectangle instead of only the lit ones.
    pub fn inspect<'a>(&self, hash: &'a str, all: bool) -> Result<Inspection<'a>> {
        let rects = if all {
            self.colored_rectangles(hash)?
        } else {
            self.rectangles(hash)?
        };

        Ok(Inspection {
            hash,
            hue: self.hue(hash)?,
            background: self.background(hash)?,
            foreground: self.foreground(hash)?,
            geometry: self.geometry,
            stroke_width: f64::from(self.config.size) * svg::STROKE_RATIO,
            rects,
        })
    }

    /// Numeric values of the digits that drive the grid.
    fn grid_digits(&self, hash: &str) -> Result<Vec<u32>> {
        let needed = self.geometry.digit_count();
        let digits: Vec<char> = hash.chars().take(needed).collect();
        if digits.len() < needed {
            return Err(IdenticonError::too_short(
                hash,
                needed,
                hash.chars().count(),
            ));
        }

        digits
            .iter()
            .enumerate()
            .map(|(index, &ch)| {
                ch.to_digit(16)
                    .ok_or_else(|| IdenticonError::invalid_digit(hash, index, ch))
            })
            .collect()
    }
}

impl Default for IdenticonGenerator {
    fn default() -> Self {
        Self::new(IdenticonConfig::default())
    }
}

/// Derived values for one hash, as reported by `inspect`.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection<'a> {
    pub hash: &'a str,
    pub hue: f64,
    pub background: Color,
    pub foreground: Color,
    pub geometry: Geometry,
    pub stroke_width: f64,
    pub rects: Vec<Rect>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Even/odd alternating grid digits, tail digits for the hue.
    const ALTERNATING: &str = "0101010101010107a3e9f12c4b8d6e0f5a7c9b1d";

    const SHA1: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

    fn generator() -> IdenticonGenerator {
        IdenticonGenerator::default()
    }

    fn inverted() -> IdenticonGenerator {
        IdenticonGenerator::new(IdenticonConfig {
            inverted: true,
            ..Default::default()
        })
    }

    #[test]
    fn test_alternating_scenario() {
        let generator = generator();
        let geometry = generator.geometry();
        assert_eq!(geometry.base_margin, 10);
        assert_eq!(geometry.cell_size, 8);
        assert_eq!(geometry.outer_margin, 12);

        // Digits 0, 2, 4 (center column rows 0, 2, 4), 6, 8 (pair rows 1, 3)
        // and 10, 12, 14 (outer pair rows 0, 2, 4) are even
        let rects = generator.rectangles(ALTERNATING).unwrap();
        let first = rects[0];
        assert_eq!((first.x, first.y), (28.0, 12.0));
        assert_eq!((first.width, first.height), (8.0, 8.0));
        assert_eq!(first.color, generator.hash_color(ALTERNATING).unwrap());
        assert_eq!(rects.len(), 3 + 2 * 2 + 3 * 2);
    }

    #[test]
    fn test_single_center_cell() {
        // Only digit 0 is even
        let hash = "011111111111111fffffff0";
        let rects = generator().rectangles(hash).unwrap();
        assert_eq!(rects.len(), 1);
        assert_eq!((rects[0].x, rects[0].y), (28.0, 12.0));
    }

    #[test]
    fn test_hue_range() {
        let generator = generator();
        assert_eq!(generator.hue("0000000").unwrap(), 0.0);
        assert_eq!(generator.hue("fffffff").unwrap(), 0.0);
        assert_eq!(generator.hue("FFFFFFF").unwrap(), 0.0);

        let near_max = generator.hue("ffffffe").unwrap();
        assert!(near_max > 0.99 && near_max < 1.0);

        for hash in [SHA1, ALTERNATING, "123456789abcdef", "8000000"] {
            let hue = generator.hue(hash).unwrap();
            assert!((0.0..1.0).contains(&hue), "{hash}: {hue}");
        }
    }

    #[test]
    fn test_hue_uses_tail() {
        let generator = generator();
        // 0x8000000 / 0xFFFFFFF
        let hue = generator.hue("deadbeef08000000").unwrap();
        assert!((hue - 0.5).abs() < 1e-8);
    }

    #[test]
    fn test_hash_color_default_sl() {
        // hue 0 at s = 0.7, l = 0.5
        let color = generator().hash_color("ffff0000000").unwrap();
        assert_eq!(color, Color::rgb(217, 38, 38));
    }

    #[test]
    fn test_background_foreground_swap() {
        let plain = generator();
        let inverted = inverted();
        let hash_color = plain.hash_color(SHA1).unwrap();
        let fixed = Color::rgb(240, 240, 240);

        assert_eq!(plain.background(SHA1).unwrap(), fixed);
        assert_eq!(plain.foreground(SHA1).unwrap(), hash_color);
        assert_eq!(inverted.background(SHA1).unwrap(), hash_color);
        assert_eq!(inverted.foreground(SHA1).unwrap(), fixed);
    }

    #[test]
    fn test_render_swap() {
        let plain = generator().render(SHA1).unwrap();
        let swapped = inverted().render(SHA1).unwrap();

        let hash_color = generator().hash_color(SHA1).unwrap().to_rgba_string();
        let fixed = "rgba(240, 240, 240, 1.0)";

        assert!(plain.contains(&format!("background-color: {fixed}")));
        assert!(plain.contains(&format!("fill: {hash_color}; stroke: {hash_color}")));
        assert!(swapped.contains(&format!("background-color: {hash_color}")));
        assert!(swapped.contains(&format!("fill: {fixed}; stroke: {fixed}")));

        // Same grid either way
        assert_eq!(plain.matches("<rect").count(), swapped.matches("<rect").count());
    }

    #[test]
    fn test_render_sha1_colors() {
        let svg = generator().render(SHA1).unwrap();
        assert!(svg.contains("style=\"background-color: rgba(240, 240, 240, 1.0)\""));
        assert!(svg.contains("fill: rgba(217, 38, 49, 1.0); stroke: rgba(217, 38, 49, 1.0);"));
    }

    #[test]
    fn test_render_deterministic() {
        let generator = generator();
        let first = generator.render(SHA1).unwrap();
        for _ in 0..3 {
            assert_eq!(generator.render(SHA1).unwrap(), first);
        }
        // Separate instance, same config
        assert_eq!(IdenticonGenerator::default().render(SHA1).unwrap(), first);
    }

    #[test]
    fn test_render_case_insensitive() {
        let generator = generator();
        assert_eq!(
            generator.render(SHA1).unwrap(),
            generator.render(&SHA1.to_uppercase()).unwrap()
        );
    }

    #[test]
    fn test_mirror_symmetry() {
        let generator = generator();
        let center = f64::from(generator.config().size) / 2.0;
        let cell = f64::from(generator.geometry().cell_size);

        for hash in [SHA1, ALTERNATING, "000000000000000abcdef0"] {
            let cells = generator.cells(hash).unwrap();
            let rects = generator.colored_rectangles(hash).unwrap();

            // Mirrored pairs share digit, row and state
            for pair in cells[5..].chunks(2) {
                assert_eq!(pair[0].digit, pair[1].digit);
                assert_eq!(pair[0].row, pair[1].row);
                assert_eq!(pair[0].on, pair[1].on);
            }

            // Lit x-coordinates are symmetric about the centerline
            let lit: Vec<f64> = rects
                .iter()
                .zip(&cells)
                .filter(|(_, c)| c.on)
                .map(|(r, _)| r.x + cell / 2.0)
                .collect();
            for x in &lit {
                let mirrored = 2.0 * center - x;
                assert!(lit.iter().any(|other| (other - mirrored).abs() < 1e-9));
            }
        }
    }

    #[test]
    fn test_emission_policies_render_the_same() {
        let generator = generator();
        let background = generator.background(SHA1).unwrap();
        let all = generator.colored_rectangles(SHA1).unwrap();
        let lit = generator.rectangles(SHA1).unwrap();

        assert_eq!(all.len(), 25);
        let filtered: Vec<Rect> = all.into_iter().filter(|r| r.color != background).collect();
        assert_eq!(filtered, lit);
    }

    #[test]
    fn test_generalized_grid() {
        for pixels in [1, 2, 4, 6, 7] {
            let generator = IdenticonGenerator::new(IdenticonConfig {
                size: 128,
                pixels,
                ..Default::default()
            });
            let hash = "0".repeat(generator.required_digits());
            let rects = generator.rectangles(&hash).unwrap();
            assert_eq!(rects.len(), (pixels * pixels) as usize, "pixels = {pixels}");
        }
    }

    #[test]
    fn test_hash_too_short() {
        let generator = generator();
        assert_eq!(generator.required_digits(), 15);

        match generator.render("0123456789abcd") {
            Err(IdenticonError::HashTooShort { needed, len, .. }) => {
                assert_eq!((needed, len), (15, 14));
            }
            other => panic!("expected HashTooShort, got {other:?}"),
        }

        assert!(matches!(
            generator.hue("abc"),
            Err(IdenticonError::HashTooShort { needed: 7, len: 3, .. })
        ));
    }

    #[test]
    fn test_invalid_digit() {
        let err = generator().render("0123456789abcdxffffffff").unwrap_err();
        assert!(matches!(
            err,
            IdenticonError::InvalidDigit {
                index: 14,
                digit: 'x',
                ..
            }
        ));
        assert!(err.is_bad_input());

        let err = generator().hue("00000000g").unwrap_err();
        assert!(matches!(err, IdenticonError::InvalidDigit { index: 8, .. }));
    }

    #[test]
    fn test_inspect() {
        let generator = generator();
        let report = generator.inspect(SHA1, false).unwrap();
        assert_eq!(report.hash, SHA1);
        assert_eq!(report.rects, generator.rectangles(SHA1).unwrap());
        assert_eq!(report.stroke_width, 0.32);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["geometry"]["cell_size"], 8);
        assert_eq!(json["background"], "rgba(240, 240, 240, 1.0)");

        let full = generator.inspect(SHA1, true).unwrap();
        assert_eq!(full.rects.len(), 25);
    }
}

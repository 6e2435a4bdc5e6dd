//! RGBA color value and HSL conversion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const ONE_SIXTH: f64 = 1.0 / 6.0;
const TWO_THIRDS: f64 = 2.0 / 3.0;
const ONE_THIRD: f64 = 1.0 / 3.0;

/// An sRGB color with 8-bit channels and a fractional opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// Opacity in `0.0..=1.0`.
    pub alpha: f64,
}

impl Color {
    /// Opaque color from channels.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Convert hue, lightness and saturation (all `0.0..=1.0`) to an opaque color.
    ///
    /// Hue wraps around, so `1.0` and `0.0` are the same red.
    pub fn from_hls(hue: f64, lightness: f64, saturation: f64) -> Self {
        let (r, g, b) = hls_to_rgb(hue, lightness, saturation);
        Self::rgb(to_channel(r), to_channel(g), to_channel(b))
    }

    /// CSS `rgba(r, g, b, a)` notation. Integral opacity keeps one decimal,
    /// so opaque colors read `1.0`.
    pub fn to_rgba_string(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.red,
            self.green,
            self.blue,
            format_alpha(self.alpha)
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rgba_string())
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_rgba_string()
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn format_alpha(alpha: f64) -> String {
    if alpha.fract() == 0.0 {
        format!("{alpha:.1}")
    } else {
        format!("{alpha}")
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// HLS to RGB, every component in `0.0..=1.0`.
fn hls_to_rgb(hue: f64, lightness: f64, saturation: f64) -> (f64, f64, f64) {
    if saturation == 0.0 {
        return (lightness, lightness, lightness);
    }

    let m2 = if lightness <= 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let m1 = 2.0 * lightness - m2;

    (
        hue_component(m1, m2, hue + ONE_THIRD),
        hue_component(m1, m2, hue),
        hue_component(m1, m2, hue - ONE_THIRD),
    )
}

fn hue_component(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < ONE_SIXTH {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < TWO_THIRDS {
        m1 + (m2 - m1) * (TWO_THIRDS - hue) * 6.0
    } else {
        m1
    }
}

// ============================================================================
// Parsing
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("unrecognized color `{0}` (expected `#rrggbb`, `#rrggbbaa`, `rgb(..)` or `rgba(..)`)")]
    Format(String),

    #[error("invalid channel `{0}` (expected an integer in 0..=255)")]
    Channel(String),

    #[error("invalid opacity `{0}` (expected a number in 0.0..=1.0)")]
    Alpha(String),
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(digits) = s.strip_prefix('#') {
            return parse_hex(digits).ok_or_else(|| ParseColorError::Format(s.to_string()));
        }

        let lower = s.to_ascii_lowercase();
        let (args, has_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = lower.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(ParseColorError::Format(s.to_string()));
        };

        let args = args
            .strip_suffix(')')
            .ok_or_else(|| ParseColorError::Format(s.to_string()))?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();

        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(ParseColorError::Format(s.to_string()));
        }

        let channel = |part: &str| {
            part.parse::<u8>()
                .map_err(|_| ParseColorError::Channel(part.to_string()))
        };
        let red = channel(parts[0])?;
        let green = channel(parts[1])?;
        let blue = channel(parts[2])?;

        let alpha = match parts.get(3) {
            Some(part) => part
                .parse::<f64>()
                .ok()
                .filter(|a| (0.0..=1.0).contains(a))
                .ok_or_else(|| ParseColorError::Alpha((*part).to_string()))?,
            None => 1.0,
        };

        Ok(Self::rgba(red, green, blue, alpha))
    }
}

fn parse_hex(digits: &str) -> Option<Color> {
    if digits.len() != 6 && digits.len() != 8 {
        return None;
    }
    let bytes = hex::decode(digits).ok()?;
    let alpha = bytes.get(3).map_or(1.0, |a| f64::from(*a) / 255.0);
    Some(Color::rgba(bytes[0], bytes[1], bytes[2], alpha))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_string() {
        assert_eq!(
            Color::rgb(240, 240, 240).to_rgba_string(),
            "rgba(240, 240, 240, 1.0)"
        );
        assert_eq!(
            Color::rgba(1, 2, 3, 0.5).to_rgba_string(),
            "rgba(1, 2, 3, 0.5)"
        );
    }

    #[test]
    fn test_from_hls_primaries() {
        assert_eq!(Color::from_hls(0.0, 0.5, 1.0), Color::rgb(255, 0, 0));
        assert_eq!(Color::from_hls(ONE_THIRD, 0.5, 1.0), Color::rgb(0, 255, 0));
        assert_eq!(Color::from_hls(TWO_THIRDS, 0.5, 1.0), Color::rgb(0, 0, 255));
        // Hue wraps
        assert_eq!(Color::from_hls(1.0, 0.5, 1.0), Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_from_hls_gray_without_saturation() {
        assert_eq!(Color::from_hls(0.42, 0.5, 0.0), Color::rgb(128, 128, 128));
    }

    #[test]
    fn test_from_hls_default_saturation() {
        // l = 0.5, s = 0.7: channels span 0.15..0.85
        let color = Color::from_hls(0.0, 0.5, 0.7);
        assert_eq!(color, Color::rgb(217, 38, 38));
    }

    #[test]
    fn test_from_hls_high_lightness() {
        // l > 0.5 takes the other m2 branch
        let color = Color::from_hls(0.0, 0.75, 1.0);
        assert_eq!(color, Color::rgb(255, 128, 128));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!("#f0f0f0".parse::<Color>().unwrap(), Color::rgb(240, 240, 240));
        let translucent: Color = "#00000000".parse().unwrap();
        assert_eq!(translucent.alpha, 0.0);
        assert!("#fff".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
    }

    #[test]
    fn test_parse_functional() {
        assert_eq!(
            "rgba(240, 240, 240, 1.0)".parse::<Color>().unwrap(),
            Color::rgb(240, 240, 240)
        );
        assert_eq!(
            "RGB(10,20,30)".parse::<Color>().unwrap(),
            Color::rgb(10, 20, 30)
        );
        assert_eq!(
            "rgba(1, 2, 3, 4)".parse::<Color>(),
            Err(ParseColorError::Alpha("4".into()))
        );
        assert_eq!(
            "rgb(256, 0, 0)".parse::<Color>(),
            Err(ParseColorError::Channel("256".into()))
        );
        assert!("rgb(1, 2)".parse::<Color>().is_err());
        assert!("hsl(1, 2, 3)".parse::<Color>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        let color = Color::rgba(12, 34, 56, 0.25);
        assert_eq!(color.to_string().parse::<Color>().unwrap(), color);
    }

    #[test]
    fn test_integral_alpha_keeps_decimal() {
        assert_eq!(Color::rgb(217, 38, 49).to_string(), "rgba(217, 38, 49, 1.0)");
        assert_eq!(Color::rgba(0, 0, 0, 0.0).to_string(), "rgba(0, 0, 0, 0.0)");
        assert_eq!(Color::rgba(0, 0, 0, 0.75).to_string(), "rgba(0, 0, 0, 0.75)");

        let opaque = Color::rgb(240, 240, 240);
        assert_eq!(opaque.to_string().parse::<Color>().unwrap(), opaque);
    }
}

//! Color values shared by the data pipeline and the renderer.
//!
//! Series colors arrive as CSS strings (`rgb(0, 192, 232)`), so both types
//! (de)serialize through that representation.

use crate::error::UsageError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static CSS_RGB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?\)\s*$",
    )
    .expect("static regex")
});

static CSS_HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#([0-9a-fA-F]{6})\s*$").expect("static regex"));

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// RGB color with a floating point opacity in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Perceived luminance (`0.299R + 0.587G + 0.114B`), unrounded.
    pub fn luminance(self) -> f64 {
        0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64
    }

    /// Gray with the same luminance as `self`.
    pub fn to_grayscale(self) -> Rgb {
        let gray = self.luminance().round().clamp(0.0, 255.0) as u8;
        Rgb::new(gray, gray, gray)
    }

    pub fn with_opacity(self, a: f64) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a: a.clamp(0.0, 1.0),
        }
    }

    pub fn opaque(self) -> Rgba {
        self.with_opacity(1.0)
    }
}

impl Rgba {
    pub const TRANSPARENT_WHITE: Rgba = Rgba {
        r: 255,
        g: 255,
        b: 255,
        a: 0.0,
    };

    pub fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Same channels, opacity replaced.
    pub fn with_opacity(self, a: f64) -> Rgba {
        self.rgb().with_opacity(a)
    }

    /// Component-wise linear blend; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// Parse `rgb(r, g, b)`, `rgba(r, g, b, a)` or `#rrggbb`.
pub fn parse_css_color(s: &str) -> Result<Rgba, UsageError> {
    let invalid = || UsageError::InvalidColor(s.to_string());
    if let Some(caps) = CSS_RGB.captures(s) {
        let channel = |i: usize| -> Result<u8, UsageError> {
            caps[i].parse::<u8>().map_err(|_| invalid())
        };
        let a = match caps.get(4) {
            Some(m) => m.as_str().parse::<f64>().map_err(|_| invalid())?,
            None => 1.0,
        };
        return Ok(Rgba {
            r: channel(1)?,
            g: channel(2)?,
            b: channel(3)?,
            a: a.clamp(0.0, 1.0),
        });
    }
    if let Some(caps) = CSS_HEX.captures(s) {
        let hex = &caps[1];
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        return Ok(Rgb::new(byte(0)?, byte(2)?, byte(4)?).opaque());
    }
    Err(invalid())
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgb {
    type Err = UsageError;

    /// Accepts any supported CSS form; opacity is dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_css_color(s).map(Rgba::rgb)
    }
}

impl FromStr for Rgba {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_css_color(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = UsageError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for Rgba {
    type Error = UsageError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_css_forms() {
        assert_eq!(
            parse_css_color("rgb(0, 192, 232)").unwrap(),
            Rgb::new(0, 192, 232).opaque()
        );
        let c = parse_css_color("rgba(70, 70, 70, 0.7)").unwrap();
        assert_eq!(c.rgb(), Rgb::new(70, 70, 70));
        assert!((c.a - 0.7).abs() < 1e-12);
        assert_eq!(
            parse_css_color("#FF928A").unwrap().rgb(),
            Rgb::new(255, 146, 138)
        );
        assert!(parse_css_color("teal").is_err());
        assert!(parse_css_color("rgb(300, 0, 0)").is_err());
    }

    #[test]
    fn grayscale_uses_rounded_luminance() {
        // 0.299*75 + 0.587*192 + 0.114*192 = 157.017
        assert_eq!(Rgb::new(75, 192, 192).to_grayscale(), Rgb::new(157, 157, 157));
        assert_eq!(Rgb::new(255, 255, 255).to_grayscale(), Rgb::new(255, 255, 255));
    }

    #[test]
    fn display_round_trips_through_serde() {
        let c = Rgb::new(153, 102, 255);
        assert_eq!(c.to_string(), "rgb(153, 102, 255)");
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"rgb(153, 102, 255)\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn lerp_blends_channels_and_alpha() {
        let a = Rgb::new(0, 0, 0).with_opacity(0.0);
        let b = Rgb::new(200, 100, 50).with_opacity(1.0);
        let mid = a.lerp(b, 0.5);
        assert_eq!(mid.rgb(), Rgb::new(100, 50, 25));
        assert!((mid.a - 0.5).abs() < 1e-12);
    }
}

/// Color codec: canonical hex values, random generation and lenient parsing.
use std::fmt;
use std::str::FromStr;

use rand::RngExt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Largest 24-bit RGB value (`#FFFFFF`).
pub const MAX_RGB: u32 = 0xFF_FFFF;

/// Raised when a string is neither `#RRGGBB` nor `rgb(r, g, b)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed color: {input:?}")]
pub struct MalformedColorError {
    pub input: String,
}

/// A 24-bit RGB color. Displays in canonical form: `#`, six uppercase hex digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ColorValue {
    rgb: u32,
}

impl ColorValue {
    pub const BLACK: ColorValue = ColorValue { rgb: 0 };

    /// Builds a color from a packed `0xRRGGBB` value; bits above 24 are ignored.
    pub const fn from_rgb(rgb: u32) -> Self {
        Self { rgb: rgb & MAX_RGB }
    }

    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Self {
            rgb: ((r as u32) << 16) | ((g as u32) << 8) | b as u32,
        }
    }

    pub const fn channels(self) -> (u8, u8, u8) {
        (
            ((self.rgb >> 16) & 0xFF) as u8,
            ((self.rgb >> 8) & 0xFF) as u8,
            (self.rgb & 0xFF) as u8,
        )
    }

    /// Canonical string form, e.g. `#A1B2C3`.
    pub fn to_hex(self) -> String {
        format!("#{:06X}", self.rgb)
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.rgb)
    }
}

impl FromStr for ColorValue {
    type Err = MalformedColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(s)
    }
}

impl Serialize for ColorValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ColorValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        normalize(&raw).map_err(serde::de::Error::custom)
    }
}

/// Draws a color uniformly from the full 24-bit space.
pub fn random_color() -> ColorValue {
    let mut rng = rand::rng();
    ColorValue::from_rgb(rng.random_range(0..=MAX_RGB))
}

/// Parses `#RRGGBB` (case-insensitive, `#` optional) or `rgb(r, g, b)` into a color.
pub fn normalize(input: &str) -> Result<ColorValue, MalformedColorError> {
    let trimmed = input.trim();
    parse_hex(trimmed)
        .or_else(|| parse_rgb_triplet(trimmed))
        .ok_or_else(|| MalformedColorError {
            input: input.to_string(),
        })
}

fn parse_hex(s: &str) -> Option<ColorValue> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().map(ColorValue::from_rgb)
}

fn parse_rgb_triplet(s: &str) -> Option<ColorValue> {
    let lower = s.to_ascii_lowercase();
    let inner = lower.strip_prefix("rgb")?.trim_start();
    let inner = inner.strip_prefix('(')?.strip_suffix(')')?;
    let mut channels = inner.split(',').map(|part| part.trim().parse::<u8>());
    let r = channels.next()?.ok()?;
    let g = channels.next()?.ok()?;
    let b = channels.next()?.ok()?;
    if channels.next().is_some() {
        return None;
    }
    Some(ColorValue::from_channels(r, g, b))
}

/// Supplies replacement colors for generated slots.
pub trait ColorSource {
    fn next_color(&mut self) -> ColorValue;
}

/// Uniform random colors from the thread RNG.
#[derive(Debug, Default)]
pub struct RandomColors;

impl ColorSource for RandomColors {
    fn next_color(&mut self) -> ColorValue {
        random_color()
    }
}

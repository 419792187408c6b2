//! Garment Colour
//!
//! Hex colour parsing and the preset swatch list. A `GarmentColor` can only be
//! built from a parseable value, so everything downstream can assume it is
//! valid.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::StudioError;

/// An sRGB colour picked for the garment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GarmentColor {
    rgb: [u8; 3],
}

/// A named preset shown in the colour picker.
#[derive(Debug, Clone, Copy)]
pub struct Swatch {
    pub name: &'static str,
    pub color: GarmentColor,
}

impl GarmentColor {
    /// `#7c3aed`, the first swatch.
    pub const DEFAULT: GarmentColor = GarmentColor::from_rgb(0x7C, 0x3A, 0xED);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { rgb: [r, g, b] }
    }

    /// Parse `#RRGGBB` or `#RGB`. The leading `#` is optional and case is ignored.
    pub fn parse(value: &str) -> Result<Self, StudioError> {
        let trimmed = value.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(StudioError::InvalidColor(value.to_string()));
        }

        let nibble = |c: u8| -> u8 {
            match c {
                b'0'..=b'9' => c - b'0',
                b'a'..=b'f' => c - b'a' + 10,
                _ => c - b'A' + 10,
            }
        };
        let bytes = hex.as_bytes();

        match bytes.len() {
            6 => Ok(Self::from_rgb(
                nibble(bytes[0]) << 4 | nibble(bytes[1]),
                nibble(bytes[2]) << 4 | nibble(bytes[3]),
                nibble(bytes[4]) << 4 | nibble(bytes[5]),
            )),
            3 => Ok(Self::from_rgb(
                nibble(bytes[0]) * 17,
                nibble(bytes[1]) * 17,
                nibble(bytes[2]) * 17,
            )),
            _ => Err(StudioError::InvalidColor(value.to_string())),
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    /// Canonical lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.rgb[0], self.rgb[1], self.rgb[2])
    }

    /// Linear-space RGB for shading.
    pub fn to_linear(&self) -> Vec3 {
        Vec3::new(
            srgb_to_linear(self.rgb[0]),
            srgb_to_linear(self.rgb[1]),
            srgb_to_linear(self.rgb[2]),
        )
    }
}

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl Default for GarmentColor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for GarmentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for GarmentColor {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for GarmentColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for GarmentColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        GarmentColor::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Preset colours, in picker order.
pub const SWATCHES: [Swatch; 8] = [
    Swatch { name: "Purple", color: GarmentColor::from_rgb(0x7C, 0x3A, 0xED) },
    Swatch { name: "Blue", color: GarmentColor::from_rgb(0x3B, 0x82, 0xF6) },
    Swatch { name: "Pink", color: GarmentColor::from_rgb(0xEC, 0x48, 0x99) },
    Swatch { name: "Green", color: GarmentColor::from_rgb(0x10, 0xB9, 0x81) },
    Swatch { name: "Yellow", color: GarmentColor::from_rgb(0xF5, 0x9E, 0x0B) },
    Swatch { name: "Red", color: GarmentColor::from_rgb(0xEF, 0x44, 0x44) },
    Swatch { name: "Black", color: GarmentColor::from_rgb(0x22, 0x22, 0x22) },
    Swatch { name: "White", color: GarmentColor::from_rgb(0xFF, 0xFF, 0xFF) },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!(
            GarmentColor::parse("#7C3AED").unwrap(),
            GarmentColor::from_rgb(0x7C, 0x3A, 0xED)
        );
        assert_eq!(
            GarmentColor::parse("fff").unwrap(),
            GarmentColor::from_rgb(255, 255, 255)
        );
        assert_eq!(
            GarmentColor::parse("  #9b87f5 ").unwrap().to_hex(),
            "#9b87f5"
        );
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "#", "#12345", "#gggggg", "red", "#1234567"] {
            assert!(GarmentColor::parse(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn default_is_first_swatch() {
        assert_eq!(GarmentColor::default(), SWATCHES[0].color);
        assert_eq!(GarmentColor::default().to_hex(), "#7c3aed");
    }

    #[test]
    fn linear_conversion_endpoints() {
        let black = GarmentColor::from_rgb(0, 0, 0).to_linear();
        let white = GarmentColor::from_rgb(255, 255, 255).to_linear();
        assert_eq!(black, Vec3::ZERO);
        assert!((white - Vec3::ONE).abs().max_element() < 1e-6);
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&GarmentColor::from_rgb(0x10, 0xB9, 0x81)).unwrap();
        assert_eq!(json, "\"#10b981\"");
        let back: GarmentColor = serde_json::from_str("\"#EF4444\"").unwrap();
        assert_eq!(back, SWATCHES[5].color);
        assert!(serde_json::from_str::<GarmentColor>("\"nope\"").is_err());
    }
}

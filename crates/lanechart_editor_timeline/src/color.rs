// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track colors and the palette that color segments index into.

use crate::easing::Lerp;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Color (RGBA, components in `[0, 1]`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Rgba {
    /// Opaque white
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    /// Create a color from components
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Format as `#RRGGBBAA`
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a)
        )
    }
}

impl Lerp for Rgba {
    /// Component-wise blend. The weight is clamped, so overshooting easings
    /// saturate at the endpoint colors.
    fn lerp(&self, other: &Self, weight: f32) -> Self {
        let w = weight.clamp(0.0, 1.0);
        Self {
            r: Lerp::lerp(&self.r, &other.r, w),
            g: Lerp::lerp(&self.g, &other.g, w),
            b: Lerp::lerp(&self.b, &other.b, w),
            a: Lerp::lerp(&self.a, &other.a, w),
        }
    }
}

/// Malformed hex color
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color '{0}', expected #RRGGBB or #RRGGBBAA")]
pub struct ParseColorError(pub String);

impl FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }

        let mut channels = [255u8; 4];
        for (i, channel) in channels.iter_mut().enumerate().take(hex.len() / 2) {
            *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| err())?;
        }

        let [r, g, b, a] = channels;
        Ok(Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ))
    }
}

/// Index into the track palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorIndex(pub u8);

/// Fixed table of track colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Create a palette from colors
    pub fn new(colors: Vec<Rgba>) -> Self {
        Self { colors }
    }

    /// Resolve an index to its color.
    ///
    /// Indices past the end wrap around; an empty palette resolves to white.
    pub fn resolve(&self, index: ColorIndex) -> Rgba {
        if self.colors.is_empty() {
            return Rgba::WHITE;
        }
        self.colors[index.0 as usize % self.colors.len()]
    }

    /// Number of colors
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colors
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// All colors in index order
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }
}

impl Default for Palette {
    /// The editor's ten track colors
    fn default() -> Self {
        Self::new(vec![
            Rgba::from_rgb8(0xF9, 0x8F, 0x95),
            Rgba::from_rgb8(0xF9, 0xE5, 0xA1),
            Rgba::from_rgb8(0xD3, 0xD3, 0xD3),
            Rgba::from_rgb8(0x77, 0xD1, 0xDE),
            Rgba::from_rgb8(0x97, 0xD3, 0x84),
            Rgba::from_rgb8(0xF3, 0xB6, 0x7E),
            Rgba::from_rgb8(0xE2, 0xA0, 0xCB),
            Rgba::from_rgb8(0x8C, 0xA3, 0xD9),
            Rgba::from_rgb8(0xA2, 0xE4, 0xC3),
            Rgba::from_rgb8(0xC8, 0x9F, 0xE4),
        ])
    }
}

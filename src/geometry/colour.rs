//! # Colour Module
//!
//! Floating point RGBA colours used for sampled voxel colours and block reference
//! colours.

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// A colour with four floating point channels, each nominally in `[0, 1]`.
///
/// Equality is exact channel-wise comparison, not a perceptual match.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct RGBA {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel, `1.0` is fully opaque
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl RGBA {
    /// Opaque white. Also the fallback colour for voxels that could not be sampled.
    pub const WHITE: RGBA = RGBA::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: RGBA = RGBA::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a colour from its four channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        RGBA { r, g, b, a }
    }

    /// Converts 8-bit channels to a floating point colour.
    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        RGBA::new(
            rgba[0] as f32 / 255.0,
            rgba[1] as f32 / 255.0,
            rgba[2] as f32 / 255.0,
            rgba[3] as f32 / 255.0,
        )
    }

    /// Squared Euclidean distance over the red, green and blue channels.
    ///
    /// Alpha does not take part: blocks are opaque, so only the visible colour is
    /// matched. This is the metric every block assigner uses.
    pub fn distance_squared_rgb(&self, other: &RGBA) -> f32 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        dr * dr + dg * dg + db * db
    }

    /// Returns a copy with every channel clamped to `[0, 1]`.
    pub fn clamped(&self) -> Self {
        RGBA::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    /// Returns `true` when every channel is a finite number.
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// The exact bit pattern of the colour, usable as a hash key.
    pub fn to_bits(&self) -> [u32; 4] {
        [
            self.r.to_bits(),
            self.g.to_bits(),
            self.b.to_bits(),
            self.a.to_bits(),
        ]
    }

    /// The channels as an array, in `r, g, b, a` order.
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Add for RGBA {
    type Output = RGBA;

    fn add(self, rhs: RGBA) -> RGBA {
        RGBA::new(
            self.r + rhs.r,
            self.g + rhs.g,
            self.b + rhs.b,
            self.a + rhs.a,
        )
    }
}

impl Mul<f32> for RGBA {
    type Output = RGBA;

    fn mul(self, rhs: f32) -> RGBA {
        RGBA::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_ignores_alpha() {
        let opaque = RGBA::new(0.2, 0.4, 0.6, 1.0);
        let clear = RGBA::new(0.2, 0.4, 0.6, 0.0);
        assert_eq!(opaque.distance_squared_rgb(&clear), 0.0);
    }

    #[test]
    fn missing_alpha_deserialises_as_opaque() {
        let colour: RGBA = serde_json::from_str(r#"{"r": 0.5, "g": 0.5, "b": 0.5}"#).unwrap();
        assert_eq!(colour.a, 1.0);
    }
}

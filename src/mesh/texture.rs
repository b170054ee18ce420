//! Texture handling for material sampling.
//!
//! This module wraps a decoded RGBA image and provides the two filtering modes the
//! voxeliser can ask for when it samples a textured material.

use std::path::Path;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::{error::Result, geometry::RGBA, geometry::UV};

/// How a texture is sampled between texel centres.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFiltering {
    /// Take the single texel the coordinate falls in.
    Nearest,
    /// Blend the four surrounding texels.
    #[default]
    Linear,
}

/// A CPU-side texture.
///
/// Texture coordinates wrap (repeat) outside `[0, 1]`, and `v = 0` addresses the
/// bottom row of the image.
#[derive(Clone, Debug)]
pub struct Texture {
    /// The decoded image data.
    image: RgbaImage,
}

impl Texture {
    /// Wraps an already decoded image.
    ///
    /// # Arguments
    /// * `image` - The RGBA image to sample from
    pub fn from_image(image: RgbaImage) -> Self {
        Texture { image }
    }

    /// Loads and decodes a texture file.
    ///
    /// # Arguments
    /// * `path` - Path to the image file
    ///
    /// # Returns
    /// The decoded texture, or an I/O or decoding error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path.as_ref())?.to_rgba8();
        Ok(Texture { image })
    }

    /// Width of the texture in texels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height of the texture in texels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Samples the texture at the given coordinates.
    ///
    /// # Arguments
    /// * `uv` - Texture coordinates; values outside `[0, 1]` wrap around
    /// * `filtering` - Nearest or bilinear filtering
    ///
    /// # Returns
    /// The sampled colour. An empty texture samples as `None`.
    pub fn sample(&self, uv: UV, filtering: TextureFiltering) -> Option<RGBA> {
        if self.width() == 0 || self.height() == 0 {
            return None;
        }

        let u = uv.u.rem_euclid(1.0);
        let v = 1.0 - uv.v.rem_euclid(1.0);

        Some(match filtering {
            TextureFiltering::Nearest => self.sample_nearest(u, v),
            TextureFiltering::Linear => self.sample_linear(u, v),
        })
    }

    fn sample_nearest(&self, u: f32, v: f32) -> RGBA {
        let x = ((u * self.width() as f32).floor() as i64).clamp(0, self.width() as i64 - 1);
        let y = ((v * self.height() as f32).floor() as i64).clamp(0, self.height() as i64 - 1);
        self.texel(x, y)
    }

    fn sample_linear(&self, u: f32, v: f32) -> RGBA {
        let fx = u * self.width() as f32 - 0.5;
        let fy = v * self.height() as f32 - 0.5;

        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;

        let (x0, y0) = (x0 as i64, y0 as i64);
        let top = self.texel(x0, y0) * (1.0 - tx) + self.texel(x0 + 1, y0) * tx;
        let bottom = self.texel(x0, y0 + 1) * (1.0 - tx) + self.texel(x0 + 1, y0 + 1) * tx;

        top * (1.0 - ty) + bottom * ty
    }

    /// Fetches a texel, wrapping out-of-range coordinates.
    fn texel(&self, x: i64, y: i64) -> RGBA {
        let x = x.rem_euclid(self.width() as i64) as u32;
        let y = y.rem_euclid(self.height() as i64) as u32;
        RGBA::from_rgba8(self.image.get_pixel(x, y).0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::Rgba;

    /// 2x1 texture: black on the left, white on the right.
    fn black_white() -> Texture {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        Texture::from_image(image)
    }

    #[test]
    fn nearest_picks_the_containing_texel() {
        let texture = black_white();
        let left = texture.sample(UV::new(0.2, 0.5), TextureFiltering::Nearest).unwrap();
        let right = texture.sample(UV::new(0.8, 0.5), TextureFiltering::Nearest).unwrap();
        assert_eq!(left, RGBA::BLACK);
        assert_eq!(right, RGBA::WHITE);
    }

    #[test]
    fn linear_blends_between_texel_centres() {
        let texture = black_white();
        let middle = texture.sample(UV::new(0.5, 0.5), TextureFiltering::Linear).unwrap();
        assert_relative_eq!(middle.r, 0.5, epsilon = 1e-6);
        assert_relative_eq!(middle.a, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn coordinates_wrap() {
        let texture = black_white();
        let wrapped = texture.sample(UV::new(1.8, 0.5), TextureFiltering::Nearest).unwrap();
        assert_eq!(wrapped, RGBA::WHITE);
    }

    #[test]
    fn v_zero_is_the_bottom_row() {
        let mut image = RgbaImage::new(1, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        let texture = Texture::from_image(image);

        let bottom = texture.sample(UV::new(0.5, 0.1), TextureFiltering::Nearest).unwrap();
        assert_eq!(bottom, RGBA::new(0.0, 0.0, 1.0, 1.0));
    }
}

//! # Block Assigner Module
//!
//! Turns a voxel colour into a concrete block from the active palette.
//!
//! Two strategies share the [`BlockAssigner`] interface:
//!
//! * [`BasicBlockAssigner`] picks the palette block with the nearest reference colour.
//! * [`OrderedDitheringBlockAssigner`] first nudges the colour by a threshold taken from
//!   a fixed Bayer matrix indexed by the voxel position, so that colours between two
//!   palette entries alternate between both blocks in a reproducible pattern.
//!
//! Both are pure functions of `(colour, position)`; the only state they carry is a
//! memoisation cache that never changes a result.
//!
//! ## Colour Metric
//!
//! Squared Euclidean distance over the red, green and blue channels, alpha ignored.
//! Ties go to the block that appears first in the palette.

use std::num::NonZeroUsize;

use cgmath::Point3;
use lru::LruCache;

use crate::{
    error::{PipelineError, Result},
    geometry::RGBA,
};

use super::block_atlas::{BlockAtlas, BlockInfo};

/// Side length of the ordered-dithering threshold matrix.
pub const DITHER_MATRIX_SIZE: i32 = 4;

/// The 4x4 Bayer threshold matrix, indexed `[z mod 4][(x + y) mod 4]`.
pub const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// How far, per channel, a threshold can push a colour before matching.
pub const DITHER_SPREAD: f32 = 0.25;

/// Number of distinct colours each assigner remembers.
const MATCH_CACHE_CAPACITY: usize = 4096;

/// Maps a voxel colour to a block.
pub trait BlockAssigner {
    /// Chooses the block for a voxel.
    ///
    /// # Arguments
    /// * `colour` - The voxel's sampled colour
    /// * `position` - The voxel's grid cell
    ///
    /// # Returns
    /// A copy of the chosen block's reference data. The same arguments always give the
    /// same block.
    fn assign_block(&mut self, colour: RGBA, position: Point3<i32>) -> BlockInfo;
}

/// Selects an assignment strategy, usually from the dithering setting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum BlockAssignerKind {
    /// Nearest colour match
    #[default]
    Basic,
    /// Ordered dithering followed by nearest colour match
    OrderedDithering,
}

impl BlockAssignerKind {
    /// Maps an on/off dithering flag to a strategy.
    pub fn from_dithering(dithering: bool) -> Self {
        if dithering {
            BlockAssignerKind::OrderedDithering
        } else {
            BlockAssignerKind::Basic
        }
    }

    /// Builds the selected assigner over the atlas's active palette.
    ///
    /// # Returns
    /// A configuration error if the palette is empty.
    pub fn create<'a>(&self, atlas: &'a BlockAtlas) -> Result<Box<dyn BlockAssigner + 'a>> {
        Ok(match self {
            BlockAssignerKind::Basic => Box::new(BasicBlockAssigner::new(atlas)?),
            BlockAssignerKind::OrderedDithering => {
                Box::new(OrderedDitheringBlockAssigner::new(atlas)?)
            }
        })
    }
}

/// Nearest-colour lookup with an exact-colour cache in front of it.
struct PaletteMatcher<'a> {
    atlas: &'a BlockAtlas,
    cache: LruCache<[u32; 4], usize>,
}

impl<'a> PaletteMatcher<'a> {
    fn new(atlas: &'a BlockAtlas) -> Result<Self> {
        if !atlas.is_loaded() {
            return Err(PipelineError::Configuration(
                "the block palette is empty; load an atlas and palette before assigning".into(),
            ));
        }

        Ok(PaletteMatcher {
            atlas,
            cache: LruCache::new(
                NonZeroUsize::new(MATCH_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            ),
        })
    }

    fn nearest(&mut self, colour: &RGBA) -> BlockInfo {
        let key = colour.to_bits();
        let index = match self.cache.get(&key) {
            Some(&index) => index,
            None => {
                // The palette is non-empty, checked on construction.
                let index = self.atlas.nearest_block_index(colour).unwrap_or(0);
                self.cache.put(key, index);
                index
            }
        };
        self.atlas.palette()[index].clone()
    }
}

/// Assigns the block whose reference colour is nearest to the voxel colour.
pub struct BasicBlockAssigner<'a> {
    matcher: PaletteMatcher<'a>,
}

impl<'a> BasicBlockAssigner<'a> {
    /// Creates an assigner over the atlas's active palette.
    ///
    /// # Returns
    /// A configuration error if the palette is empty.
    pub fn new(atlas: &'a BlockAtlas) -> Result<Self> {
        Ok(BasicBlockAssigner {
            matcher: PaletteMatcher::new(atlas)?,
        })
    }
}

impl BlockAssigner for BasicBlockAssigner<'_> {
    fn assign_block(&mut self, colour: RGBA, _position: Point3<i32>) -> BlockInfo {
        self.matcher.nearest(&colour)
    }
}

/// Assigns blocks after perturbing the colour with a position-keyed Bayer threshold.
///
/// For a colour exactly half way between two palette entries, cells whose matrix value
/// is below 8 take the darker entry and the rest take the lighter one.
pub struct OrderedDitheringBlockAssigner<'a> {
    matcher: PaletteMatcher<'a>,
}

impl<'a> OrderedDitheringBlockAssigner<'a> {
    /// Creates an assigner over the atlas's active palette.
    ///
    /// # Returns
    /// A configuration error if the palette is empty.
    pub fn new(atlas: &'a BlockAtlas) -> Result<Self> {
        Ok(OrderedDitheringBlockAssigner {
            matcher: PaletteMatcher::new(atlas)?,
        })
    }

    /// The threshold matrix entry for a grid cell.
    pub fn threshold(position: Point3<i32>) -> u8 {
        let row = position.z.rem_euclid(DITHER_MATRIX_SIZE);
        let column = (position.x.rem_euclid(DITHER_MATRIX_SIZE)
            + position.y.rem_euclid(DITHER_MATRIX_SIZE))
            % DITHER_MATRIX_SIZE;
        BAYER_4X4[row as usize][column as usize]
    }

    /// The signed offset for a grid cell, in `(-0.5, 0.5)` and never zero.
    pub fn bias(position: Point3<i32>) -> f32 {
        let levels = (DITHER_MATRIX_SIZE * DITHER_MATRIX_SIZE) as f32;
        (Self::threshold(position) as f32 + 0.5) / levels - 0.5
    }
}

impl BlockAssigner for OrderedDitheringBlockAssigner<'_> {
    fn assign_block(&mut self, colour: RGBA, position: Point3<i32>) -> BlockInfo {
        let offset = Self::bias(position) * DITHER_SPREAD;
        let dithered = RGBA::new(
            colour.r + offset,
            colour.g + offset,
            colour.b + offset,
            colour.a,
        )
        .clamped();
        self.matcher.nearest(&dithered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::block_atlas::{BlockFaces, TexcoordRect};
    use crate::geometry::UV;

    fn black_white_atlas() -> BlockAtlas {
        let faces = BlockFaces::uniform(TexcoordRect::new(UV::new(0.0, 0.0), UV::new(1.0, 1.0)));
        BlockAtlas::from_blocks(vec![
            BlockInfo {
                name: "black".into(),
                colour: RGBA::BLACK,
                faces,
            },
            BlockInfo {
                name: "white".into(),
                colour: RGBA::WHITE,
                faces,
            },
        ])
        .unwrap()
    }

    #[test]
    fn basic_picks_nearest_and_breaks_ties_by_order() {
        let atlas = black_white_atlas();
        let mut assigner = BasicBlockAssigner::new(&atlas).unwrap();
        let origin = Point3::new(0, 0, 0);

        let dark = assigner.assign_block(RGBA::new(0.1, 0.1, 0.1, 1.0), origin);
        let light = assigner.assign_block(RGBA::new(0.9, 0.9, 0.9, 1.0), origin);
        let middle = assigner.assign_block(RGBA::new(0.5, 0.5, 0.5, 1.0), origin);

        assert_eq!(dark.name, "black");
        assert_eq!(light.name, "white");
        assert_eq!(middle.name, "black");
    }

    #[test]
    fn basic_ignores_position() {
        let atlas = black_white_atlas();
        let mut assigner = BasicBlockAssigner::new(&atlas).unwrap();
        let colour = RGBA::new(0.3, 0.3, 0.3, 1.0);
        for x in -3..3 {
            let block = assigner.assign_block(colour, Point3::new(x, 2 * x, -x));
            assert_eq!(block.name, "black");
        }
    }

    #[test]
    fn empty_palette_is_a_configuration_error() {
        let atlas = BlockAtlas::new();
        assert!(matches!(
            BasicBlockAssigner::new(&atlas),
            Err(PipelineError::Configuration(_))
        ));
        assert!(matches!(
            BlockAssignerKind::OrderedDithering.create(&atlas),
            Err(PipelineError::Configuration(_))
        ));
    }

    #[test]
    fn dithering_is_deterministic() {
        let atlas = black_white_atlas();
        let mut assigner = OrderedDitheringBlockAssigner::new(&atlas).unwrap();
        let colour = RGBA::new(0.4, 0.45, 0.5, 1.0);
        let position = Point3::new(7, -2, 13);

        let first = assigner.assign_block(colour, position);
        let second = assigner.assign_block(colour, position);
        assert_eq!(first, second);
    }

    #[test]
    fn midpoint_reproduces_the_bayer_pattern() {
        let atlas = black_white_atlas();
        let mut assigner = OrderedDitheringBlockAssigner::new(&atlas).unwrap();
        let grey = RGBA::new(0.5, 0.5, 0.5, 1.0);

        for z in 0..DITHER_MATRIX_SIZE {
            for x in 0..DITHER_MATRIX_SIZE {
                let block = assigner.assign_block(grey, Point3::new(x, 0, z));
                let expected = if BAYER_4X4[z as usize][x as usize] < 8 {
                    "black"
                } else {
                    "white"
                };
                assert_eq!(block.name, expected, "cell ({}, 0, {})", x, z);
            }
        }
    }

    #[test]
    fn pattern_repeats_every_matrix_period() {
        for (x, y, z) in [(0, 0, 0), (1, 2, 3), (-1, 5, -7)] {
            let here = Point3::new(x, y, z);
            let period = DITHER_MATRIX_SIZE;
            assert_eq!(
                OrderedDitheringBlockAssigner::threshold(here),
                OrderedDitheringBlockAssigner::threshold(Point3::new(x + period, y, z + period))
            );
        }
    }

    #[test]
    fn bias_is_never_zero() {
        for z in 0..DITHER_MATRIX_SIZE {
            for x in 0..DITHER_MATRIX_SIZE {
                assert_ne!(OrderedDitheringBlockAssigner::bias(Point3::new(x, 0, z)), 0.0);
            }
        }
    }

    #[test]
    fn kind_follows_dithering_flag() {
        assert_eq!(
            BlockAssignerKind::from_dithering(true),
            BlockAssignerKind::OrderedDithering
        );
        assert_eq!(BlockAssignerKind::from_dithering(false), BlockAssignerKind::Basic);
    }
}

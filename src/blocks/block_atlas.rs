//! # Block Atlas Module
//!
//! Reference data for the blocks a voxel can be turned into: each block's name, its
//! representative colour, and where each of its faces lives in the texture atlas.
//!
//! An atlas lists every block a texture pack knows about. A palette then selects the
//! subset (and order) of blocks the assigners may choose from. Both are loaded from
//! JSON before any assignment runs.
//!
//! ## File Formats
//!
//! `resources/atlases/<id>.atlas`:
//!
//! ```json
//! { "blocks": [ {
//!     "name": "stone",
//!     "colour": { "r": 0.49, "g": 0.49, "b": 0.49, "a": 1.0 },
//!     "faces": {
//!       "north": { "min": { "u": 0.0, "v": 0.0 }, "max": { "u": 0.0625, "v": 0.0625 } },
//!       "south": { ... }, "up": { ... }, "down": { ... }, "east": { ... }, "west": { ... }
//!     }
//! } ] }
//! ```
//!
//! `resources/palettes/<id>.palette`:
//!
//! ```json
//! { "blocks": ["stone", "dirt"] }
//! ```

use std::{collections::HashSet, path::Path};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::{PipelineError, Result},
    geometry::{RGBA, UV},
};

use super::block_face::BlockFace;

/// A rectangle of texture coordinates inside the atlas.
///
/// Coordinates are in image space: `min` is the top-left corner and `v` grows downwards.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TexcoordRect {
    /// Top-left corner
    pub min: UV,
    /// Bottom-right corner
    pub max: UV,
}

impl TexcoordRect {
    /// Creates a rectangle from its top-left and bottom-right corners.
    pub fn new(min: UV, max: UV) -> Self {
        TexcoordRect { min, max }
    }

    /// The four corners in face-vertex order: lower-left, lower-right, upper-left,
    /// upper-right.
    pub fn corners(&self) -> [UV; 4] {
        [
            UV::new(self.min.u, self.max.v),
            UV::new(self.max.u, self.max.v),
            UV::new(self.min.u, self.min.v),
            UV::new(self.max.u, self.min.v),
        ]
    }
}

/// Atlas rectangles for all six faces of a block. Every face must be present.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockFaces {
    /// The north (-Z) face
    pub north: TexcoordRect,
    /// The south (+Z) face
    pub south: TexcoordRect,
    /// The top face
    pub up: TexcoordRect,
    /// The bottom face
    pub down: TexcoordRect,
    /// The east (+X) face
    pub east: TexcoordRect,
    /// The west (-X) face
    pub west: TexcoordRect,
}

impl BlockFaces {
    /// Uses the same rectangle for every face.
    pub fn uniform(rect: TexcoordRect) -> Self {
        BlockFaces {
            north: rect,
            south: rect,
            up: rect,
            down: rect,
            east: rect,
            west: rect,
        }
    }

    /// The rectangle for a single face.
    pub fn get(&self, face: BlockFace) -> &TexcoordRect {
        match face {
            BlockFace::North => &self.north,
            BlockFace::South => &self.south,
            BlockFace::Up => &self.up,
            BlockFace::Down => &self.down,
            BlockFace::East => &self.east,
            BlockFace::West => &self.west,
        }
    }
}

/// Reference data for one block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Unique name; the key palettes refer to
    pub name: String,
    /// Representative colour the assigners match voxel colours against
    pub colour: RGBA,
    /// Atlas rectangles for each face
    pub faces: BlockFaces,
}

#[derive(Deserialize)]
struct AtlasFile {
    blocks: Vec<BlockInfo>,
}

#[derive(Deserialize)]
struct PaletteFile {
    blocks: Vec<String>,
}

/// The loaded atlas and the active palette drawn from it.
///
/// Load the atlas first, then optionally a palette. Without a palette every atlas block
/// is available, in atlas order.
#[derive(Clone, Debug, Default)]
pub struct BlockAtlas {
    /// Every block listed by the atlas, in file order
    atlas_blocks: Vec<BlockInfo>,
    /// Names requested by the most recently loaded palette
    palette_names: Option<Vec<String>>,
    /// The blocks the assigners may choose from, in palette order
    palette: Vec<BlockInfo>,
}

impl BlockAtlas {
    /// Creates an empty atlas. Nothing can be assigned until blocks are loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an atlas directly from block definitions, all of them active.
    ///
    /// # Arguments
    /// * `blocks` - The blocks, in the order ties should be broken
    ///
    /// # Returns
    /// The atlas, or a configuration error if two blocks share a name.
    pub fn from_blocks(blocks: Vec<BlockInfo>) -> Result<Self> {
        let mut atlas = BlockAtlas::new();
        atlas.set_atlas_blocks(blocks)?;
        Ok(atlas)
    }

    /// Loads `<resources>/atlases/<atlas_id>.atlas`.
    ///
    /// # Arguments
    /// * `resources` - The resources directory
    /// * `atlas_id` - Name of the atlas without extension
    pub fn load_atlas(&mut self, resources: &Path, atlas_id: &str) -> Result<()> {
        let path = resources
            .join("atlases")
            .join(format!("{}.atlas", atlas_id));
        let source = read_config_file(&path, "atlas")?;
        self.load_atlas_from_str(&source)?;
        info!(
            "Loaded atlas '{}' with {} blocks",
            atlas_id,
            self.atlas_blocks.len()
        );
        Ok(())
    }

    /// Parses an atlas from JSON, replacing any previously loaded atlas.
    ///
    /// A palette loaded earlier is resolved again against the new atlas.
    pub fn load_atlas_from_str(&mut self, source: &str) -> Result<()> {
        let file: AtlasFile = serde_json::from_str(source)
            .map_err(|e| PipelineError::Configuration(format!("malformed atlas: {}", e)))?;
        self.set_atlas_blocks(file.blocks)
    }

    /// Loads `<resources>/palettes/<palette_id>.palette`.
    ///
    /// # Arguments
    /// * `resources` - The resources directory
    /// * `palette_id` - Name of the palette without extension
    pub fn load_palette(&mut self, resources: &Path, palette_id: &str) -> Result<()> {
        let path = resources
            .join("palettes")
            .join(format!("{}.palette", palette_id));
        let source = read_config_file(&path, "palette")?;
        self.load_palette_from_str(&source)?;
        info!(
            "Loaded palette '{}' with {} usable blocks",
            palette_id,
            self.palette.len()
        );
        Ok(())
    }

    /// Parses a palette from JSON and makes it the active palette.
    ///
    /// Names the atlas does not contain are skipped with a warning.
    ///
    /// # Returns
    /// A configuration error if no atlas has been loaded yet or the JSON is malformed.
    pub fn load_palette_from_str(&mut self, source: &str) -> Result<()> {
        if self.atlas_blocks.is_empty() {
            return Err(PipelineError::Configuration(
                "a palette cannot be loaded before its atlas".into(),
            ));
        }

        let file: PaletteFile = serde_json::from_str(source)
            .map_err(|e| PipelineError::Configuration(format!("malformed palette: {}", e)))?;
        self.palette_names = Some(file.blocks);
        self.resolve_palette();
        Ok(())
    }

    /// The blocks the assigners may choose from, in tie-break order.
    pub fn palette(&self) -> &[BlockInfo] {
        &self.palette
    }

    /// Returns `true` once at least one block is available for assignment.
    pub fn is_loaded(&self) -> bool {
        !self.palette.is_empty()
    }

    /// Looks up an active block by name.
    pub fn block(&self, name: &str) -> Option<&BlockInfo> {
        self.palette.iter().find(|block| block.name == name)
    }

    /// Index of the palette block whose colour is closest to `colour`.
    ///
    /// Distance is [`RGBA::distance_squared_rgb`]. On a tie the earlier palette entry
    /// wins.
    ///
    /// # Returns
    /// `None` only when the palette is empty.
    pub fn nearest_block_index(&self, colour: &RGBA) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, block) in self.palette.iter().enumerate() {
            let distance = block.colour.distance_squared_rgb(colour);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((index, distance)),
            }
        }
        best.map(|(index, _)| index)
    }

    fn set_atlas_blocks(&mut self, blocks: Vec<BlockInfo>) -> Result<()> {
        {
            let mut seen = HashSet::with_capacity(blocks.len());
            if let Some(duplicate) = blocks.iter().find(|b| !seen.insert(b.name.as_str())) {
                return Err(PipelineError::Configuration(format!(
                    "atlas lists block '{}' more than once",
                    duplicate.name
                )));
            }
        }

        self.atlas_blocks = blocks;
        self.resolve_palette();
        Ok(())
    }

    fn resolve_palette(&mut self) {
        self.palette = match &self.palette_names {
            None => self.atlas_blocks.clone(),
            Some(names) => {
                let mut seen = HashSet::with_capacity(names.len());
                names
                    .iter()
                    .filter(|name| seen.insert(name.as_str()))
                    .filter_map(|name| {
                        let block = self.atlas_blocks.iter().find(|b| &b.name == name);
                        if block.is_none() {
                            warn!("Palette block '{}' is not in the atlas, skipping", name);
                        }
                        block.cloned()
                    })
                    .collect()
            }
        };
    }
}

/// Reads an atlas or palette file; a missing or unreadable file is a configuration error.
fn read_config_file(path: &Path, kind: &str) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        PipelineError::Configuration(format!("could not read {} {:?}: {}", kind, path, e))
    })
}

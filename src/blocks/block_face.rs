//! # Block Face Module
//!
//! This module defines the six faces of a block and the fixed order in which every
//! per-face buffer is laid out.

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

/// Represents the six possible faces of a block.
///
/// Each variant is assigned an integer matching its position in [`BlockFace::ALL`].
/// Directions follow the usual block-game convention: north is -Z, east is +X.
///
/// The order is: [NORTH, SOUTH, UP, DOWN, EAST, WEST]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockFace {
    /// The north face (facing negative Z)
    North = 0,

    /// The south face (facing positive Z)
    South = 1,

    /// The top face (facing positive Y)
    Up = 2,

    /// The bottom face (facing negative Y)
    Down = 3,

    /// The east face (facing positive X)
    East = 4,

    /// The west face (facing negative X)
    West = 5,
}

impl BlockFace {
    /// All six block faces in buffer order.
    ///
    /// Render buffers lay out per-face data in exactly this order, so consumers can rely
    /// on vertex `24 * voxel + 4 * face + corner` belonging to `ALL[face]`. Changing the
    /// order changes the buffer layout.
    pub const ALL: [BlockFace; 6] = [
        BlockFace::North,
        BlockFace::South,
        BlockFace::Up,
        BlockFace::Down,
        BlockFace::East,
        BlockFace::West,
    ];

    /// The outward facing unit normal of this face.
    pub fn normal(&self) -> Vector3<f32> {
        match self {
            BlockFace::North => Vector3::new(0.0, 0.0, -1.0),
            BlockFace::South => Vector3::new(0.0, 0.0, 1.0),
            BlockFace::Up => Vector3::new(0.0, 1.0, 0.0),
            BlockFace::Down => Vector3::new(0.0, -1.0, 0.0),
            BlockFace::East => Vector3::new(1.0, 0.0, 0.0),
            BlockFace::West => Vector3::new(-1.0, 0.0, 0.0),
        }
    }

    /// The lowercase name used for this face in atlas files.
    pub fn name(&self) -> &'static str {
        match self {
            BlockFace::North => "north",
            BlockFace::South => "south",
            BlockFace::Up => "up",
            BlockFace::Down => "down",
            BlockFace::East => "east",
            BlockFace::West => "west",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_match_buffer_order() {
        for (index, face) in BlockFace::ALL.iter().enumerate() {
            assert_eq!(*face as usize, index);
        }
    }

    #[test]
    fn names_round_trip_through_serde() {
        for face in BlockFace::ALL {
            let json = serde_json::to_string(&face).unwrap();
            assert_eq!(json, format!("\"{}\"", face.name()));
        }
    }
}

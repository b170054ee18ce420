//! # Blocks Module
//!
//! Everything between a coloured voxel and a textured block:
//!
//! - `block_face`: the six faces and the order every per-face buffer uses
//! - `block_atlas`: block reference colours, atlas texcoords and the active palette
//! - `block_assigner`: nearest-colour and ordered-dithering block selection
//! - `block_mesh`: voxel to block assignment and the block render buffer

pub mod block_assigner;
pub mod block_atlas;
pub mod block_face;
pub mod block_mesh;

pub use block_assigner::{
    BasicBlockAssigner, BlockAssigner, BlockAssignerKind, OrderedDitheringBlockAssigner,
};
pub use block_atlas::{BlockAtlas, BlockFaces, BlockInfo, TexcoordRect};
pub use block_face::BlockFace;
pub use block_mesh::{Block, BlockMesh};

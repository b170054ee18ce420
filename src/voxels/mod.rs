//! # Voxels Module
//!
//! Voxel meshes and the voxelisers that produce them from triangle meshes.

pub mod voxel_mesh;
pub mod voxeliser;

pub use voxel_mesh::{Voxel, VoxelMesh, VoxelMeshBuilder};
pub use voxeliser::{RayVoxeliser, VoxelOverlapRule, VoxeliseParams, Voxeliser};

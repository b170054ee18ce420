//! Rendering-side data for voxel and block meshes.
//!
//! This crate does not draw anything itself. It produces a [`RenderBuffer`] whose
//! attributes an external renderer can upload directly, and the per-face cube geometry
//! both the voxel and block buffers are laid out from.

pub mod face;
pub mod render_buffer;

pub use face::{face_indices, FaceCorners};
pub use render_buffer::{AttributeDescriptor, RenderBuffer};

/// Name of the per-vertex position attribute (3 components).
pub const POSITION_ATTRIBUTE: &str = "position";

/// Name of the per-vertex normal attribute (3 components).
pub const NORMAL_ATTRIBUTE: &str = "normal";

/// Name of the per-vertex voxel colour attribute (4 components).
pub const COLOUR_ATTRIBUTE: &str = "colour";

/// Name of the per-vertex block atlas texcoord attribute (2 components).
pub const BLOCK_TEXCOORD_ATTRIBUTE: &str = "blockTexcoord";

/// Vertices written per voxel: four corners on each of six faces.
pub const VERTICES_PER_VOXEL: usize = 4 * 6;

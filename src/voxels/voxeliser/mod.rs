//! # Voxeliser Module
//!
//! Turns a triangle mesh into a [`VoxelMesh`].
//!
//! ## Architecture
//!
//! [`Voxeliser`] is a template: implementors provide [`Voxeliser::voxelise_mesh`], the
//! algorithm that decides which cells are occupied and what colour they get. The
//! provided [`Voxeliser::voxelise`] wraps it, timing the run and reporting the voxel
//! count and grid dimensions to the status handler. Reporting never alters the mesh.
//!
//! Colours are sampled through [`sampling::get_voxel_colour`], shared by every
//! implementation.

pub mod ray_voxeliser;
pub mod sampling;

use log::debug;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::{
    core::{CancellationToken, PipelineContext},
    error::Result,
    mesh::{Mesh, TextureFiltering},
};

use super::voxel_mesh::VoxelMesh;

pub use ray_voxeliser::RayVoxeliser;

/// How a cell crossed by several triangles picks its colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoxelOverlapRule {
    /// The first triangle, in traversal order, that yields a colour wins
    #[default]
    First,
    /// The mean of every colour yielded for the cell
    Average,
}

fn default_desired_height() -> u32 {
    32
}

/// Parameters for a single voxelisation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxeliseParams {
    /// Number of voxels spanning the mesh's height
    pub desired_height: u32,
    /// Filtering used when sampling textured materials
    pub texture_filtering: TextureFiltering,
    /// How overlapping triangles combine their colours
    pub voxel_overlap_rule: VoxelOverlapRule,
}

impl Default for VoxeliseParams {
    fn default() -> Self {
        VoxeliseParams {
            desired_height: default_desired_height(),
            texture_filtering: TextureFiltering::default(),
            voxel_overlap_rule: VoxelOverlapRule::default(),
        }
    }
}

/// A strategy for converting a mesh into voxels.
pub trait Voxeliser {
    /// Runs the voxelisation algorithm.
    ///
    /// # Arguments
    /// * `mesh` - The input mesh
    /// * `params` - Resolution, filtering and overlap settings
    /// * `cancellation` - Polled between triangles
    ///
    /// # Returns
    /// The voxel mesh, `Cancelled` if the token fired, or `InvalidMesh` /
    /// `Configuration` if the input cannot be voxelised.
    fn voxelise_mesh(
        &self,
        mesh: &Mesh,
        params: &VoxeliseParams,
        cancellation: &CancellationToken,
    ) -> Result<VoxelMesh>;

    /// Voxelises `mesh` and reports statistics about the result.
    ///
    /// Adds two info messages to the context's status handler: the voxel count and the
    /// dimensions (`max - min + 1` per axis) of the result.
    fn voxelise(
        &self,
        mesh: &Mesh,
        params: &VoxeliseParams,
        context: &mut PipelineContext,
    ) -> Result<VoxelMesh> {
        let start = Instant::now();
        let voxel_mesh = self.voxelise_mesh(mesh, params, &context.cancellation)?;
        debug!("Voxelisation took {:?}", start.elapsed());

        context
            .status
            .info(format!("Voxel mesh has {} voxels", voxel_mesh.voxel_count()));

        let dimensions = voxel_mesh.dimensions();
        context.status.info(format!(
            "Dimensions are {}x{}x{} voxels",
            dimensions.x, dimensions.y, dimensions.z
        ));

        Ok(voxel_mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_fill_in_defaults() {
        let params: VoxeliseParams = serde_json::from_str(r#"{ "desired_height": 8 }"#).unwrap();
        assert_eq!(params.desired_height, 8);
        assert_eq!(params.texture_filtering, TextureFiltering::Linear);
        assert_eq!(params.voxel_overlap_rule, VoxelOverlapRule::First);

        let params: VoxeliseParams =
            serde_json::from_str(r#"{ "voxel_overlap_rule": "average" }"#).unwrap();
        assert_eq!(params.desired_height, 32);
        assert_eq!(params.voxel_overlap_rule, VoxelOverlapRule::Average);
    }
}

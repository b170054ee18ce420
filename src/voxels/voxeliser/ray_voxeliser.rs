//! # Ray Voxeliser
//!
//! Surface voxelisation by casting axis-aligned rays at every triangle.
//!
//! The mesh is first moved into grid space: translated so its minimum corner sits at the
//! origin and scaled so its height spans `desired_height` cells. Then, per triangle and
//! per axis, a ray is cast along the axis through the centre of every cell the triangle's
//! bounding box covers on the other two axes. Each hit marks the cell it falls in and
//! is the point the material is sampled at.
//!
//! Rays along all three axes are needed so that triangles at any orientation leave a
//! gap-free shell. Triangles too small to be crossed by any ray still mark the cell
//! containing their centroid.

use cgmath::{EuclideanSpace, Point3};
use log::debug;

use crate::{
    core::CancellationToken,
    error::{PipelineError, Result},
    geometry::{Axis, Ray, UVTriangle},
    mesh::Mesh,
    voxels::voxel_mesh::{VoxelMesh, VoxelMeshBuilder},
};

use super::{sampling::get_voxel_colour, VoxeliseParams, Voxeliser};

/// Slack used when deciding how many cells a grid extent covers.
const EXTENT_EPSILON: f32 = 1e-4;

/// Voxelises the surface of a mesh by ray casting.
#[derive(Copy, Clone, Debug, Default)]
pub struct RayVoxeliser;

impl RayVoxeliser {
    /// Creates a ray voxeliser.
    pub fn new() -> Self {
        RayVoxeliser
    }
}

/// Mapping from mesh space to grid space, plus the largest cell on each axis.
struct GridTransform {
    origin: Point3<f32>,
    scale: f32,
    max_cell: Point3<i32>,
}

impl GridTransform {
    fn new(mesh: &Mesh, desired_height: u32) -> Result<Self> {
        if desired_height == 0 {
            return Err(PipelineError::Configuration(
                "desired height must be at least one voxel".into(),
            ));
        }

        let (min, max) = mesh
            .bounds()
            .ok_or_else(|| PipelineError::InvalidMesh("mesh has no triangles".into()))?;

        let extent = max - min;
        let largest = extent.x.max(extent.y).max(extent.z);
        if !largest.is_finite() || largest <= 0.0 {
            return Err(PipelineError::InvalidMesh(
                "mesh has zero extent on every axis".into(),
            ));
        }

        // Flat meshes have no height, so use their largest extent instead.
        let reference = if extent.y > 0.0 { extent.y } else { largest };
        let scale = desired_height as f32 / reference;

        let cells = |e: f32| ((e * scale - EXTENT_EPSILON).ceil() as i32).max(1) - 1;
        let max_cell = Point3::new(cells(extent.x), cells(extent.y), cells(extent.z));

        debug!(
            "Grid scale {} maps mesh extent {:?} to cells up to {:?}",
            scale, extent, max_cell
        );

        Ok(GridTransform {
            origin: min,
            scale,
            max_cell,
        })
    }

    fn to_grid(&self, point: Point3<f32>) -> Point3<f32> {
        Point3::from_vec((point - self.origin) * self.scale)
    }

    /// The cell containing `coordinate` along `axis`, clamped to the grid.
    fn cell(&self, coordinate: f32, axis: Axis) -> i32 {
        (coordinate.floor() as i32).clamp(0, self.max_cell[axis.index()])
    }

    /// Cells along `axis` whose centres lie within `[low, high]`.
    fn centres_between(&self, low: f32, high: f32, axis: Axis) -> std::ops::RangeInclusive<i32> {
        let first = ((low - 0.5).ceil() as i32).max(0);
        let last = ((high - 0.5).floor() as i32).min(self.max_cell[axis.index()]);
        first..=last
    }

    fn cell_of(&self, point: Point3<f32>) -> Point3<i32> {
        Point3::new(
            self.cell(point.x, Axis::X),
            self.cell(point.y, Axis::Y),
            self.cell(point.z, Axis::Z),
        )
    }
}

impl RayVoxeliser {
    fn voxelise_triangle(
        &self,
        mesh: &Mesh,
        triangle: &UVTriangle,
        material: &str,
        grid: &GridTransform,
        params: &VoxeliseParams,
        builder: &mut VoxelMeshBuilder,
    ) {
        let plain = triangle.triangle();
        let (low, high) = plain.bounds();

        let sample = |builder: &mut VoxelMeshBuilder, cell: Point3<i32>, at: Point3<f32>| {
            let colour = if builder.wants_colour(cell) {
                get_voxel_colour(mesh, triangle, material, at, params.texture_filtering)
            } else {
                None
            };
            builder.add_sample(cell, colour);
        };

        let mut hits = 0;
        for axis in Axis::ALL {
            let (a, b) = axis.others();
            let along = axis.index();

            for i in grid.centres_between(low[a.index()], high[a.index()], a) {
                for j in grid.centres_between(low[b.index()], high[b.index()], b) {
                    let mut origin = Point3::new(0.0, 0.0, 0.0);
                    origin[along] = low[along] - 1.0;
                    origin[a.index()] = i as f32 + 0.5;
                    origin[b.index()] = j as f32 + 0.5;

                    let Some(hit) = Ray::along_axis(origin, axis).intersect_triangle(&plain) else {
                        continue;
                    };

                    let mut cell = Point3::new(0, 0, 0);
                    cell[along] = grid.cell(hit[along], axis);
                    cell[a.index()] = i;
                    cell[b.index()] = j;

                    sample(builder, cell, hit);
                    hits += 1;
                }
            }
        }

        if hits == 0 {
            let centroid = Point3::centroid(&[plain.v0, plain.v1, plain.v2]);
            sample(builder, grid.cell_of(centroid), centroid);
        }
    }
}

impl Voxeliser for RayVoxeliser {
    fn voxelise_mesh(
        &self,
        mesh: &Mesh,
        params: &VoxeliseParams,
        cancellation: &CancellationToken,
    ) -> Result<VoxelMesh> {
        let grid = GridTransform::new(mesh, params.desired_height)?;
        let mut builder = VoxelMeshBuilder::new(params.voxel_overlap_rule);

        for (triangle, material) in mesh.triangles() {
            if cancellation.is_cancelled() {
                debug!("Voxelisation cancelled after {} cells", builder.len());
                return Err(PipelineError::Cancelled);
            }

            let triangle = triangle.map_vertices(|v| grid.to_grid(v));
            self.voxelise_triangle(mesh, &triangle, material, &grid, params, &mut builder);
        }

        Ok(builder.build())
    }
}

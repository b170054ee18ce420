//! # Voxel Mesh Module
//!
//! The result of voxelisation: a set of coloured grid cells.
//!
//! ## Storage
//!
//! Voxels live in an insertion-ordered `Vec`. A `HashMap` from position to index is kept
//! next to it for lookups only, so iteration order is always the order in which the
//! voxeliser first touched each cell and never depends on hashing.
//!
//! A [`VoxelMesh`] is only created through [`VoxelMeshBuilder`] and is immutable
//! afterwards. Downstream stages share it through `Arc`.

use std::collections::HashMap;

use cgmath::{Point3, Vector3};
use log::debug;

use crate::{
    blocks::BlockFace,
    error::Result,
    geometry::{Bounds, RGBA},
    rendering::{
        face_indices, AttributeDescriptor, FaceCorners, RenderBuffer, COLOUR_ATTRIBUTE,
        NORMAL_ATTRIBUTE, POSITION_ATTRIBUTE, VERTICES_PER_VOXEL,
    },
};

use super::voxeliser::VoxelOverlapRule;

/// A single occupied grid cell and its colour.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Voxel {
    /// The cell this voxel occupies; it covers the cube `[position, position + 1]`
    pub position: Point3<i32>,
    /// The sampled colour
    pub colour: RGBA,
}

/// An immutable collection of voxels with unique positions.
#[derive(Clone, Debug, Default)]
pub struct VoxelMesh {
    voxels: Vec<Voxel>,
    index: HashMap<Point3<i32>, usize>,
    bounds: Option<Bounds>,
}

impl VoxelMesh {
    /// The voxels in the order they were produced.
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Number of voxels.
    pub fn voxel_count(&self) -> usize {
        self.voxels.len()
    }

    /// Returns `true` if the mesh has no voxels.
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Bounds over every voxel position, `None` when empty.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Cells spanned on each axis, `max - min + 1`, or zero for an empty mesh.
    pub fn dimensions(&self) -> Vector3<i32> {
        self.bounds
            .map(|bounds| bounds.dimensions())
            .unwrap_or_else(|| Vector3::new(0, 0, 0))
    }

    /// Returns `true` if a voxel occupies `position`.
    pub fn is_voxel_at(&self, position: Point3<i32>) -> bool {
        self.index.contains_key(&position)
    }

    /// The voxel at `position`, if any.
    pub fn voxel_at(&self, position: Point3<i32>) -> Option<&Voxel> {
        self.index.get(&position).map(|&i| &self.voxels[i])
    }

    /// Builds a cube-per-voxel render buffer.
    ///
    /// Every voxel contributes six faces in [`BlockFace::ALL`] order, four corners per
    /// face, with `position` (3), `normal` (3) and `colour` (4) attributes and two
    /// triangles of indices per face. Faces between neighbouring voxels are not culled,
    /// so vertex `24 * v + 4 * f + c` always belongs to voxel `v`, face `f`.
    pub fn create_buffer(&self) -> Result<RenderBuffer> {
        let vertex_count = self.voxels.len() * VERTICES_PER_VOXEL;
        let mut positions = Vec::with_capacity(vertex_count * 3);
        let mut normals = Vec::with_capacity(vertex_count * 3);
        let mut colours = Vec::with_capacity(vertex_count * 4);
        let mut indices = Vec::with_capacity(self.voxels.len() * 6 * 6);

        let mut num_faces_generated = 0;
        for voxel in &self.voxels {
            for face in BlockFace::ALL {
                let normal = face.normal();
                for corner in FaceCorners::new(voxel.position, face).to_array() {
                    positions.extend([corner.x as f32, corner.y as f32, corner.z as f32]);
                    normals.extend([normal.x, normal.y, normal.z]);
                    colours.extend(voxel.colour.to_array());
                }
                indices.extend(face_indices(num_faces_generated));
                num_faces_generated += 1;
            }
        }

        let mut buffer = RenderBuffer::new();
        buffer.attach_new_attribute(AttributeDescriptor::new(POSITION_ATTRIBUTE, 3), positions)?;
        buffer.attach_new_attribute(AttributeDescriptor::new(NORMAL_ATTRIBUTE, 3), normals)?;
        buffer.attach_new_attribute(AttributeDescriptor::new(COLOUR_ATTRIBUTE, 4), colours)?;
        buffer.set_indices(indices);

        debug!(
            "Built voxel buffer with {} vertices for {} voxels",
            buffer.vertex_count(),
            self.voxels.len()
        );
        Ok(buffer)
    }
}

/// Per-cell colour accumulator used while voxelising.
#[derive(Copy, Clone, Debug)]
struct CellSamples {
    sum: RGBA,
    count: u32,
}

/// Accumulates colour samples per cell and resolves them into a [`VoxelMesh`].
///
/// Cells are recorded in the order they are first touched. A cell whose every sample
/// was `None` is still kept and receives [`RGBA::WHITE`].
#[derive(Debug)]
pub struct VoxelMeshBuilder {
    rule: VoxelOverlapRule,
    cells: Vec<(Point3<i32>, Option<CellSamples>)>,
    index: HashMap<Point3<i32>, usize>,
}

impl VoxelMeshBuilder {
    /// Creates an empty builder that resolves overlaps with `rule`.
    pub fn new(rule: VoxelOverlapRule) -> Self {
        VoxelMeshBuilder {
            rule,
            cells: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Returns `true` if another sample for `position` could change its colour.
    ///
    /// Lets the voxeliser skip sampling the material for cells that are already decided.
    pub fn wants_colour(&self, position: Point3<i32>) -> bool {
        match self.index.get(&position) {
            None => true,
            Some(&i) => match self.rule {
                VoxelOverlapRule::First => self.cells[i].1.is_none(),
                VoxelOverlapRule::Average => true,
            },
        }
    }

    /// Records that the surface crosses `position`, with the colour sampled there.
    ///
    /// # Arguments
    /// * `position` - The grid cell
    /// * `colour` - The sampled colour, or `None` if sampling failed
    pub fn add_sample(&mut self, position: Point3<i32>, colour: Option<RGBA>) {
        let i = match self.index.get(&position) {
            Some(&i) => i,
            None => {
                self.cells.push((position, None));
                self.index.insert(position, self.cells.len() - 1);
                self.cells.len() - 1
            }
        };

        let Some(colour) = colour else {
            return;
        };

        let rule = self.rule;
        let samples = &mut self.cells[i].1;
        match *samples {
            None => *samples = Some(CellSamples { sum: colour, count: 1 }),
            Some(ref mut existing) => {
                if rule == VoxelOverlapRule::Average {
                    existing.sum = existing.sum + colour;
                    existing.count += 1;
                }
            }
        }
    }

    /// Number of cells touched so far.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if no cell has been touched.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Resolves every cell to its final colour.
    pub fn build(self) -> VoxelMesh {
        let mut bounds: Option<Bounds> = None;
        let voxels: Vec<Voxel> = self
            .cells
            .into_iter()
            .map(|(position, samples)| {
                match bounds.as_mut() {
                    Some(bounds) => bounds.extend(position),
                    None => bounds = Some(Bounds::from_point(position)),
                }
                let colour = samples
                    .map(|s| s.sum * (1.0 / s.count as f32))
                    .unwrap_or(RGBA::WHITE);
                Voxel { position, colour }
            })
            .collect();

        VoxelMesh {
            voxels,
            index: self.index,
            bounds,
        }
    }
}

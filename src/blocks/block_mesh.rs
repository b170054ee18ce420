//! # Block Mesh Module
//!
//! Pairs every voxel of a [`VoxelMesh`] with a block chosen by a [`BlockAssigner`] and
//! turns the result into a render buffer textured from the block atlas.
//!
//! ## Lifecycle
//!
//! A `BlockMesh` starts empty. [`BlockMesh::assign_blocks`] fills it exactly once; a
//! second call is rejected instead of appending to or replacing the first result. Queries
//! that need assigned blocks fail with `MissingPrecondition` until then.
//!
//! [`BlockAssigner`]: super::BlockAssigner

use std::{collections::HashSet, sync::Arc};

use log::{debug, info};
use web_time::Instant;

use crate::{
    error::{PipelineError, Result},
    rendering::{
        AttributeDescriptor, RenderBuffer, BLOCK_TEXCOORD_ATTRIBUTE, COLOUR_ATTRIBUTE,
        VERTICES_PER_VOXEL,
    },
    voxels::{Voxel, VoxelMesh},
};

use super::{
    block_assigner::BlockAssignerKind,
    block_atlas::{BlockAtlas, BlockInfo},
    block_face::BlockFace,
};

/// A voxel together with the block assigned to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// The source voxel
    pub voxel: Voxel,
    /// The block chosen for it
    pub block_info: BlockInfo,
}

/// Voxels mapped onto palette blocks.
#[derive(Debug, Default)]
pub struct BlockMesh {
    blocks: Vec<Block>,
    block_palette: Vec<String>,
    voxel_mesh: Option<Arc<VoxelMesh>>,
}

impl BlockMesh {
    /// Creates an empty block mesh.
    pub fn new() -> Self {
        info!("New block mesh");
        Self::default()
    }

    /// Assigns a block to every voxel, in the voxel mesh's stored order.
    ///
    /// # Arguments
    /// * `voxel_mesh` - The voxels to assign, kept for later queries
    /// * `atlas` - An atlas with its palette loaded
    /// * `kind` - Which assignment strategy to use
    ///
    /// # Returns
    /// `BlocksAlreadyAssigned` on a second call, or `Configuration` if the atlas has no
    /// usable palette. On error nothing is assigned.
    pub fn assign_blocks(
        &mut self,
        voxel_mesh: Arc<VoxelMesh>,
        atlas: &BlockAtlas,
        kind: BlockAssignerKind,
    ) -> Result<()> {
        if self.voxel_mesh.is_some() {
            return Err(PipelineError::BlocksAlreadyAssigned);
        }

        info!("Assigning blocks");
        let start = Instant::now();
        let mut assigner = kind.create(atlas)?;

        let mut seen = HashSet::new();
        self.blocks.reserve(voxel_mesh.voxel_count());
        for voxel in voxel_mesh.voxels() {
            let block_info = assigner.assign_block(voxel.colour, voxel.position);
            if seen.insert(block_info.name.clone()) {
                self.block_palette.push(block_info.name.clone());
            }
            self.blocks.push(Block {
                voxel: *voxel,
                block_info,
            });
        }

        debug!(
            "Assigned {} blocks from {} distinct block types in {:?}",
            self.blocks.len(),
            self.block_palette.len(),
            start.elapsed()
        );
        self.voxel_mesh = Some(voxel_mesh);
        Ok(())
    }

    /// The assigned blocks, one per voxel, in voxel order.
    pub fn blocks(&self) -> Result<&[Block]> {
        self.require_assigned()?;
        Ok(&self.blocks)
    }

    /// Distinct block names in first-seen order. Empty before assignment.
    pub fn block_palette(&self) -> &[String] {
        &self.block_palette
    }

    /// The voxel mesh the blocks were assigned from.
    pub fn voxel_mesh(&self) -> Result<&Arc<VoxelMesh>> {
        self.voxel_mesh.as_ref().ok_or_else(|| {
            PipelineError::MissingPrecondition("could not get voxel mesh before blocks are assigned".into())
        })
    }

    /// Builds the block render buffer from the voxel render buffer.
    ///
    /// The voxel buffer is copied, a two-component `blockTexcoord` attribute is attached
    /// and the `colour` attribute is removed. Texcoords follow the voxel buffer layout:
    /// per block, per face in [`BlockFace::ALL`] order, the four corners of the face's
    /// atlas rectangle.
    ///
    /// # Arguments
    /// * `voxel_buffer` - The buffer produced by [`VoxelMesh::create_buffer`]
    ///
    /// # Returns
    /// `MissingPrecondition` before assignment, `BufferMismatch` if the voxel buffer does
    /// not have 24 vertices per block.
    pub fn create_buffer(&self, voxel_buffer: &RenderBuffer) -> Result<RenderBuffer> {
        self.require_assigned()?;

        let expected = self.blocks.len() * VERTICES_PER_VOXEL;
        if voxel_buffer.vertex_count() != expected {
            return Err(PipelineError::BufferMismatch {
                expected,
                actual: voxel_buffer.vertex_count(),
            });
        }

        let mut block_texcoords = Vec::with_capacity(expected * 2);
        for block in &self.blocks {
            for face in BlockFace::ALL {
                for corner in block.block_info.faces.get(face).corners() {
                    block_texcoords.extend([corner.u, corner.v]);
                }
            }
        }

        let mut buffer = voxel_buffer.copy();
        buffer.attach_new_attribute(
            AttributeDescriptor::new(BLOCK_TEXCOORD_ATTRIBUTE, 2),
            block_texcoords,
        )?;
        buffer.remove_attribute(COLOUR_ATTRIBUTE);

        Ok(buffer)
    }

    fn require_assigned(&self) -> Result<()> {
        if self.voxel_mesh.is_none() {
            return Err(PipelineError::MissingPrecondition(
                "blocks have not been assigned yet".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::{
        blocks::block_atlas::{BlockFaces, TexcoordRect},
        geometry::{RGBA, UV},
        voxels::{VoxelMeshBuilder, VoxelOverlapRule},
    };

    fn atlas() -> BlockAtlas {
        let block = |name: &str, colour: RGBA, u: f32| BlockInfo {
            name: name.into(),
            colour,
            faces: BlockFaces::uniform(TexcoordRect::new(UV::new(u, 0.0), UV::new(u + 0.5, 0.5))),
        };
        BlockAtlas::from_blocks(vec![
            block("black", RGBA::BLACK, 0.0),
            block("white", RGBA::WHITE, 0.5),
        ])
        .unwrap()
    }

    fn voxel_mesh(colours: &[RGBA]) -> Arc<VoxelMesh> {
        let mut builder = VoxelMeshBuilder::new(VoxelOverlapRule::First);
        for (x, colour) in colours.iter().enumerate() {
            builder.add_sample(Point3::new(x as i32, 0, 0), Some(*colour));
        }
        Arc::new(builder.build())
    }

    #[test]
    fn palette_is_deduplicated_in_first_seen_order() {
        let mut block_mesh = BlockMesh::new();
        let voxels = voxel_mesh(&[RGBA::WHITE, RGBA::BLACK, RGBA::WHITE, RGBA::BLACK]);
        block_mesh
            .assign_blocks(voxels, &atlas(), BlockAssignerKind::Basic)
            .unwrap();

        assert_eq!(block_mesh.block_palette(), ["white", "black"]);
        assert_eq!(block_mesh.blocks().unwrap().len(), 4);
    }

    #[test]
    fn queries_fail_before_assignment() {
        let block_mesh = BlockMesh::new();
        assert!(matches!(
            block_mesh.voxel_mesh(),
            Err(PipelineError::MissingPrecondition(_))
        ));
        assert!(matches!(
            block_mesh.blocks(),
            Err(PipelineError::MissingPrecondition(_))
        ));
        assert!(matches!(
            block_mesh.create_buffer(&RenderBuffer::new()),
            Err(PipelineError::MissingPrecondition(_))
        ));
        assert!(block_mesh.block_palette().is_empty());
    }

    #[test]
    fn second_assignment_is_rejected() {
        let mut block_mesh = BlockMesh::new();
        let voxels = voxel_mesh(&[RGBA::WHITE]);
        block_mesh
            .assign_blocks(voxels.clone(), &atlas(), BlockAssignerKind::Basic)
            .unwrap();

        let again = block_mesh.assign_blocks(voxels, &atlas(), BlockAssignerKind::Basic);
        assert!(matches!(again, Err(PipelineError::BlocksAlreadyAssigned)));
        assert_eq!(block_mesh.blocks().unwrap().len(), 1);
    }

    #[test]
    fn empty_palette_assigns_nothing() {
        let mut block_mesh = BlockMesh::new();
        let result = block_mesh.assign_blocks(
            voxel_mesh(&[RGBA::WHITE]),
            &BlockAtlas::new(),
            BlockAssignerKind::OrderedDithering,
        );
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
        assert!(block_mesh.voxel_mesh().is_err());
    }

    #[test]
    fn buffer_swaps_colour_for_block_texcoords() {
        let mut block_mesh = BlockMesh::new();
        let voxels = voxel_mesh(&[RGBA::BLACK, RGBA::WHITE]);
        let voxel_buffer = voxels.create_buffer().unwrap();
        block_mesh
            .assign_blocks(voxels, &atlas(), BlockAssignerKind::Basic)
            .unwrap();

        let buffer = block_mesh.create_buffer(&voxel_buffer).unwrap();
        let texcoords = buffer.attribute(BLOCK_TEXCOORD_ATTRIBUTE).unwrap();
        assert_eq!(texcoords.len(), 2 * 6 * 4 * 2);
        assert!(buffer.attribute(COLOUR_ATTRIBUTE).is_none());
        assert!(voxel_buffer.attribute(COLOUR_ATTRIBUTE).is_some());

        // First face of the black block: ll, lr, ul, ur of its rectangle.
        assert_eq!(&texcoords[..8], &[0.0, 0.5, 0.5, 0.5, 0.0, 0.0, 0.5, 0.0]);
        // The white block starts after 24 corners of the black one.
        assert_eq!(&texcoords[48..50], &[0.5, 0.5]);
    }

    #[test]
    fn mismatched_voxel_buffer_is_rejected() {
        let mut block_mesh = BlockMesh::new();
        block_mesh
            .assign_blocks(voxel_mesh(&[RGBA::BLACK]), &atlas(), BlockAssignerKind::Basic)
            .unwrap();

        let result = block_mesh.create_buffer(&RenderBuffer::new());
        assert!(matches!(
            result,
            Err(PipelineError::BufferMismatch {
                expected: 24,
                actual: 0
            })
        ));
    }
}

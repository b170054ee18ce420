#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Block Voxeliser
//!
//! Converts a triangulated, textured surface mesh into a grid of coloured voxels and then
//! into a mesh of discrete blocks drawn from a fixed palette.
//!
//! ## Key Modules
//!
//! * `voxels` - Voxel meshes and the ray-casting voxeliser that builds them
//! * `blocks` - Block atlases, palettes, colour-to-block assigners and the block mesh
//! * `rendering` - CPU-side render buffers for voxel and block meshes
//! * `mesh` - The input mesh, its materials and textures
//! * `geometry` - Colours, triangles, rays and integer bounds
//! * `core` - Status reporting and cancellation shared by every stage
//!
//! ## Architecture
//!
//! Data flows strictly forward:
//!
//! ```text
//! Mesh --voxelise--> VoxelMesh --assign_blocks--> BlockMesh --create_buffer--> RenderBuffer
//! ```
//!
//! Each stage takes its inputs explicitly. There are no process-wide singletons; the
//! atlas, settings and status handler are plain values owned by the caller.
//!
//! ## Usage
//!
//! ```no_run
//! use block_voxeliser::{core::PipelineContext, mesh::Mesh, run_pipeline, settings::Settings};
//!
//! let settings = Settings::load("settings.json")?;
//! let mesh = Mesh::load(&settings.mesh)?;
//! let output = run_pipeline(&mesh, &settings, &mut PipelineContext::new())?;
//! println!("{} block types", output.block_mesh.block_palette().len());
//! # Ok::<(), block_voxeliser::error::PipelineError>(())
//! ```

use std::{process::ExitCode, sync::Arc};

use log::{error, info};
use web_time::Instant;

pub mod blocks;
pub mod core;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod rendering;
pub mod settings;
pub mod voxels;

use crate::{
    blocks::{BlockAtlas, BlockMesh},
    core::PipelineContext,
    error::Result,
    mesh::Mesh,
    rendering::RenderBuffer,
    settings::Settings,
    voxels::{RayVoxeliser, VoxelMesh, Voxeliser},
};

/// Settings file used when none is given on the command line.
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

/// Everything one pipeline run produces.
#[derive(Debug)]
pub struct PipelineOutput {
    /// The voxelised mesh
    pub voxel_mesh: Arc<VoxelMesh>,
    /// The voxels with their assigned blocks
    pub block_mesh: BlockMesh,
    /// The block render buffer, with `blockTexcoord` in place of `colour`
    pub buffer: RenderBuffer,
}

/// Runs the whole pipeline on an already loaded mesh.
///
/// Loads the atlas and palette named by `settings`, voxelises `mesh` with a
/// [`RayVoxeliser`], assigns blocks and builds the block render buffer.
///
/// # Arguments
/// * `mesh` - The input mesh
/// * `settings` - Voxelisation and palette settings
/// * `context` - Receives status messages and carries the cancellation token
pub fn run_pipeline(
    mesh: &Mesh,
    settings: &Settings,
    context: &mut PipelineContext,
) -> Result<PipelineOutput> {
    let mut atlas = BlockAtlas::new();
    atlas.load_atlas(&settings.resources, &settings.palette.texture_atlas)?;
    atlas.load_palette(&settings.resources, &settings.palette.block_palette)?;

    let voxel_mesh = Arc::new(RayVoxeliser::new().voxelise(mesh, &settings.voxelise, context)?);

    let mut block_mesh = BlockMesh::new();
    block_mesh.assign_blocks(
        voxel_mesh.clone(),
        &atlas,
        settings.palette.assigner_kind(),
    )?;
    context.status.info(format!(
        "Block mesh uses {} block types",
        block_mesh.block_palette().len()
    ));

    let voxel_buffer = voxel_mesh.create_buffer()?;
    let buffer = block_mesh.create_buffer(&voxel_buffer)?;

    Ok(PipelineOutput {
        voxel_mesh,
        block_mesh,
        buffer,
    })
}

/// Command line entry point.
///
/// Reads the settings path from the first argument (default [`DEFAULT_SETTINGS_PATH`]),
/// loads the mesh it names and runs the pipeline. Logging goes to stdout and is
/// configured with `RUST_LOG`.
pub fn run() -> ExitCode {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());

    let start = Instant::now();
    let result = Settings::load(&settings_path).and_then(|settings| {
        let mesh = Mesh::load(&settings.mesh)?;
        info!(
            "Loaded mesh {:?} with {} triangles",
            settings.mesh,
            mesh.triangle_count()
        );
        run_pipeline(&mesh, &settings, &mut PipelineContext::new())
    });

    match result {
        Ok(output) => {
            info!(
                "Built {} blocks ({}) with {} vertices in {:?}",
                output.voxel_mesh.voxel_count(),
                output.block_mesh.block_palette().join(", "),
                output.buffer.vertex_count(),
                start.elapsed()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

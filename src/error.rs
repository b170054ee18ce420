//! # Pipeline Error Types
//!
//! All errors that can surface from the voxelisation and block assignment pipeline.
//!
//! Degenerate geometry is deliberately absent: a zero-area triangle makes the sampler
//! return `None` and the voxeliser substitutes a fallback colour instead.

use thiserror::Error;

/// Errors that can occur anywhere in the mesh → voxel → block pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A value was queried before the stage that produces it had run.
    #[error("missing precondition: {0}")]
    MissingPrecondition(String),

    /// `assign_blocks` was called on a block mesh that already holds blocks.
    #[error("blocks have already been assigned for this block mesh")]
    BlocksAlreadyAssigned,

    /// The atlas, palette or settings are unusable (empty, malformed, unloaded).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The input mesh cannot be voxelised.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// A render buffer does not line up with the blocks it is being combined with.
    #[error("render buffer mismatch: expected {expected} vertices, found {actual}")]
    BufferMismatch {
        /// The vertex count implied by the block mesh.
        expected: usize,
        /// The vertex count of the supplied buffer.
        actual: usize,
    },

    /// A render buffer attribute with this name already exists.
    #[error("render buffer already has an attribute named '{0}'")]
    DuplicateAttribute(String),

    /// Voxelisation was cancelled through its cancellation token.
    #[error("voxelisation was cancelled")]
    Cancelled,

    /// Reading a settings, mesh, atlas or palette file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A JSON document could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A texture could not be decoded.
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

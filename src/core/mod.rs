//! # Core Module
//!
//! This module provides the small pieces of shared state the pipeline threads through
//! its stages explicitly instead of reaching for process-wide singletons.
//!
//! ## Key Components
//! - `StatusHandler`: Collects informational messages and mirrors them to the logger
//! - `CancellationToken`: Thread-safe flag for cooperative cancellation
//! - `PipelineContext`: Bundles both for a single pipeline run

pub mod cancellation;
pub mod status;

pub use cancellation::CancellationToken;
pub use status::{StatusHandler, StatusLevel, StatusMessage};

/// Per-run context handed to the pipeline stages.
///
/// A context is cheap to create; use one per voxelisation so status messages from
/// different runs do not interleave.
#[derive(Debug, Default)]
pub struct PipelineContext {
    /// Receives informational messages such as voxel counts.
    pub status: StatusHandler,
    /// Polled by the voxeliser between triangles.
    pub cancellation: CancellationToken,
}

impl PipelineContext {
    /// Creates a context with an empty status handler and a fresh token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that observes an existing cancellation token.
    ///
    /// # Arguments
    /// * `cancellation` - A token the caller keeps a clone of
    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self {
            status: StatusHandler::new(),
            cancellation,
        }
    }
}

//! # Block Voxeliser Entry Point
//!
//! Runs the mesh to block pipeline from a settings file.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- path/to/settings.json
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    block_voxeliser::run()
}

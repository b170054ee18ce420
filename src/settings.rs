//! # Settings Module
//!
//! Configuration for one pipeline run, loaded from a JSON file:
//!
//! ```json
//! {
//!   "mesh": "scene/mesh.json",
//!   "resources": "resources",
//!   "voxelise": { "desired_height": 32, "texture_filtering": "linear", "voxel_overlap_rule": "first" },
//!   "palette": { "texture_atlas": "vanilla", "block_palette": "all", "dithering": true }
//! }
//! ```
//!
//! Only `mesh` is required. Relative paths are resolved against the directory that
//! contains the settings file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    blocks::BlockAssignerKind,
    error::{PipelineError, Result},
    voxels::VoxeliseParams,
};

fn default_resources() -> PathBuf {
    PathBuf::from("resources")
}

/// Which atlas and palette to assign blocks from, and how.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteSettings {
    /// Atlas id, loaded from `<resources>/atlases/<id>.atlas`
    pub texture_atlas: String,
    /// Palette id, loaded from `<resources>/palettes/<id>.palette`
    pub block_palette: String,
    /// Use ordered dithering instead of plain nearest-colour matching
    pub dithering: bool,
}

impl Default for PaletteSettings {
    fn default() -> Self {
        PaletteSettings {
            texture_atlas: "vanilla".into(),
            block_palette: "all".into(),
            dithering: false,
        }
    }
}

impl PaletteSettings {
    /// The assignment strategy these settings select.
    pub fn assigner_kind(&self) -> BlockAssignerKind {
        BlockAssignerKind::from_dithering(self.dithering)
    }
}

/// Everything needed to run the pipeline once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Path of the JSON mesh description
    pub mesh: PathBuf,
    /// Directory holding `atlases/` and `palettes/`
    #[serde(default = "default_resources")]
    pub resources: PathBuf,
    /// Voxelisation parameters
    #[serde(default)]
    pub voxelise: VoxeliseParams,
    /// Block assignment parameters
    #[serde(default)]
    pub palette: PaletteSettings,
}

impl Settings {
    /// Loads settings from a JSON file, resolving relative paths against its directory.
    ///
    /// # Returns
    /// A configuration error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Configuration(format!("could not read settings {:?}: {}", path, e))
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json(&source, base_dir)
    }

    /// Parses settings from JSON.
    ///
    /// # Arguments
    /// * `source` - The JSON text
    /// * `base_dir` - Directory that relative `mesh` and `resources` paths are joined to
    pub fn from_json(source: &str, base_dir: &Path) -> Result<Self> {
        let mut settings: Settings = serde_json::from_str(source)
            .map_err(|e| PipelineError::Configuration(format!("malformed settings: {}", e)))?;
        settings.mesh = base_dir.join(&settings.mesh);
        settings.resources = base_dir.join(&settings.resources);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mesh::TextureFiltering, voxels::VoxelOverlapRule};

    #[test]
    fn only_mesh_is_required() {
        let settings = Settings::from_json(r#"{ "mesh": "bunny.json" }"#, Path::new("scene")).unwrap();

        assert_eq!(settings.mesh, Path::new("scene/bunny.json"));
        assert_eq!(settings.resources, Path::new("scene/resources"));
        assert_eq!(settings.voxelise, VoxeliseParams::default());
        assert_eq!(settings.palette, PaletteSettings::default());
        assert_eq!(settings.palette.assigner_kind(), BlockAssignerKind::Basic);
    }

    #[test]
    fn parses_every_field() {
        let source = r#"{
            "mesh": "/abs/mesh.json",
            "resources": "res",
            "voxelise": { "desired_height": 16, "texture_filtering": "nearest", "voxel_overlap_rule": "average" },
            "palette": { "texture_atlas": "faithful", "block_palette": "greys", "dithering": true }
        }"#;
        let settings = Settings::from_json(source, Path::new("base")).unwrap();

        assert_eq!(settings.mesh, Path::new("/abs/mesh.json"));
        assert_eq!(settings.resources, Path::new("base/res"));
        assert_eq!(settings.voxelise.desired_height, 16);
        assert_eq!(settings.voxelise.texture_filtering, TextureFiltering::Nearest);
        assert_eq!(settings.voxelise.voxel_overlap_rule, VoxelOverlapRule::Average);
        assert_eq!(settings.palette.texture_atlas, "faithful");
        assert_eq!(settings.palette.assigner_kind(), BlockAssignerKind::OrderedDithering);
    }

    #[test]
    fn malformed_settings_are_a_configuration_error() {
        let result = Settings::from_json(r#"{ "resources": "res" }"#, Path::new("."));
        assert!(matches!(result, Err(PipelineError::Configuration(_))));

        let result = Settings::load("definitely/not/here.json");
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }
}

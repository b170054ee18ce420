//! # Mesh Module
//!
//! The triangulated input surface and its materials.
//!
//! A [`Mesh`] owns indexed vertices, texture coordinates and triangles, plus a table of
//! named materials. It plays the material-sampler role for the voxeliser: given a
//! material name and an interpolated UV it answers with a colour, or with `None` when
//! it cannot.
//!
//! Meshes can be built in code or loaded from a small JSON description:
//!
//! ```json
//! {
//!   "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
//!   "uvs": [[0, 0], [1, 0], [0, 1]],
//!   "triangles": [{ "positions": [0, 1, 2], "uvs": [0, 1, 2], "material": "skin" }],
//!   "materials": {
//!     "skin": { "type": "textured", "path": "skin.png" },
//!     "trim": { "type": "solid", "colour": { "r": 1.0, "g": 0.0, "b": 0.0 } }
//!   }
//! }
//! ```

pub mod texture;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use cgmath::Point3;
use log::debug;
use serde::Deserialize;

use crate::{
    error::{PipelineError, Result},
    geometry::{UVTriangle, RGBA, UV},
};

pub use texture::{Texture, TextureFiltering};

/// The surface appearance referenced by a triangle.
#[derive(Clone, Debug)]
pub enum Material {
    /// A single flat colour.
    Solid {
        /// The colour of the whole material
        colour: RGBA,
    },
    /// A texture sampled through the triangle's UVs.
    Textured {
        /// The texture to sample
        texture: Texture,
    },
}

/// A triangle of the mesh, stored as indices into the vertex and UV lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeshTriangle {
    /// Indices into [`Mesh::vertices`]
    pub positions: [usize; 3],
    /// Indices into [`Mesh::uvs`], or `None` when the triangle is not UV mapped
    pub uvs: Option<[usize; 3]>,
    /// Name of the material this triangle uses
    pub material: String,
}

/// A triangulated surface mesh with named materials.
#[derive(Clone, Debug)]
pub struct Mesh {
    vertices: Vec<Point3<f32>>,
    uvs: Vec<UV>,
    triangles: Vec<MeshTriangle>,
    materials: HashMap<String, Material>,
}

#[derive(Deserialize)]
struct MeshDescription {
    vertices: Vec<[f32; 3]>,
    #[serde(default)]
    uvs: Vec<[f32; 2]>,
    triangles: Vec<TriangleDescription>,
    #[serde(default)]
    materials: HashMap<String, MaterialDescription>,
}

#[derive(Deserialize)]
struct TriangleDescription {
    positions: [usize; 3],
    #[serde(default)]
    uvs: Option<[usize; 3]>,
    material: String,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum MaterialDescription {
    Solid { colour: RGBA },
    Textured { path: PathBuf },
}

impl Mesh {
    /// Creates a mesh, checking that every index is in range.
    ///
    /// # Arguments
    /// * `vertices` - Vertex positions
    /// * `uvs` - Texture coordinates
    /// * `triangles` - Indexed triangles
    /// * `materials` - Materials by name; triangles may name materials that are absent,
    ///   in which case sampling them yields no colour
    ///
    /// # Returns
    /// The mesh, or `InvalidMesh` if a triangle indexes past the end of a list.
    pub fn new(
        vertices: Vec<Point3<f32>>,
        uvs: Vec<UV>,
        triangles: Vec<MeshTriangle>,
        materials: HashMap<String, Material>,
    ) -> Result<Self> {
        for (index, triangle) in triangles.iter().enumerate() {
            if let Some(&bad) = triangle.positions.iter().find(|&&i| i >= vertices.len()) {
                return Err(PipelineError::InvalidMesh(format!(
                    "triangle {} references vertex {} but the mesh has {} vertices",
                    index,
                    bad,
                    vertices.len()
                )));
            }
            if let Some(uv_indices) = triangle.uvs {
                if let Some(&bad) = uv_indices.iter().find(|&&i| i >= uvs.len()) {
                    return Err(PipelineError::InvalidMesh(format!(
                        "triangle {} references uv {} but the mesh has {} uvs",
                        index,
                        bad,
                        uvs.len()
                    )));
                }
            }
        }

        Ok(Mesh {
            vertices,
            uvs,
            triangles,
            materials,
        })
    }

    /// Loads a mesh from a JSON description. Texture paths are resolved relative to the
    /// directory containing the description.
    ///
    /// # Arguments
    /// * `path` - Path to the JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json(&source, base_dir)
    }

    /// Parses a mesh from a JSON description.
    ///
    /// # Arguments
    /// * `source` - The JSON text
    /// * `base_dir` - Directory that relative texture paths are resolved against
    pub fn from_json(source: &str, base_dir: &Path) -> Result<Self> {
        let description: MeshDescription = serde_json::from_str(source)?;

        let mut materials = HashMap::with_capacity(description.materials.len());
        for (name, material) in description.materials {
            let material = match material {
                MaterialDescription::Solid { colour } => Material::Solid { colour },
                MaterialDescription::Textured { path } => {
                    let texture_path = base_dir.join(path);
                    debug!("Loading texture {:?} for material {}", texture_path, name);
                    Material::Textured {
                        texture: Texture::load(texture_path)?,
                    }
                }
            };
            materials.insert(name, material);
        }

        Mesh::new(
            description
                .vertices
                .into_iter()
                .map(|[x, y, z]| Point3::new(x, y, z))
                .collect(),
            description
                .uvs
                .into_iter()
                .map(|[u, v]| UV::new(u, v))
                .collect(),
            description
                .triangles
                .into_iter()
                .map(|t| MeshTriangle {
                    positions: t.positions,
                    uvs: t.uvs,
                    material: t.material,
                })
                .collect(),
            materials,
        )
    }

    /// The vertex positions.
    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    /// The texture coordinates.
    pub fn uvs(&self) -> &[UV] {
        &self.uvs
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Resolves a triangle's indices into a [`UVTriangle`] and its material name.
    ///
    /// Triangles without UVs get `(0, 0)` at every vertex.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn uv_triangle(&self, index: usize) -> (UVTriangle, &str) {
        let triangle = &self.triangles[index];
        let [p0, p1, p2] = triangle.positions;
        let [uv0, uv1, uv2] = match triangle.uvs {
            Some([a, b, c]) => [self.uvs[a], self.uvs[b], self.uvs[c]],
            None => [UV::default(); 3],
        };
        (
            UVTriangle::new(
                self.vertices[p0],
                self.vertices[p1],
                self.vertices[p2],
                uv0,
                uv1,
                uv2,
            ),
            &triangle.material,
        )
    }

    /// Iterates the triangles in mesh order.
    pub fn triangles(&self) -> impl Iterator<Item = (UVTriangle, &str)> + '_ {
        (0..self.triangles.len()).map(move |index| self.uv_triangle(index))
    }

    /// The component-wise minimum and maximum over every vertex used by a triangle.
    ///
    /// # Returns
    /// `None` for a mesh without triangles.
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut corners = self
            .triangles
            .iter()
            .flat_map(|t| t.positions)
            .map(|i| self.vertices[i]);

        let first = corners.next()?;
        Some(corners.fold((first, first), |(min, max), v| {
            (
                Point3::new(min.x.min(v.x), min.y.min(v.y), min.z.min(v.z)),
                Point3::new(max.x.max(v.x), max.y.max(v.y), max.z.max(v.z)),
            )
        }))
    }

    /// Samples a material at the given texture coordinates.
    ///
    /// # Arguments
    /// * `material_name` - The material to sample
    /// * `uv` - Interpolated texture coordinates
    /// * `filtering` - Filtering mode for textured materials
    ///
    /// # Returns
    /// The colour, or `None` if the material does not exist or cannot be sampled.
    pub fn sample_material(
        &self,
        material_name: &str,
        uv: UV,
        filtering: TextureFiltering,
    ) -> Option<RGBA> {
        match self.materials.get(material_name)? {
            Material::Solid { colour } => Some(*colour),
            Material::Textured { texture } => texture.sample(uv, filtering),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = r#"{
        "vertices": [[0, 0, 0], [1, 0, 0], [1, 1, 0], [0, 1, 0]],
        "triangles": [
            { "positions": [0, 1, 2], "material": "red" },
            { "positions": [0, 2, 3], "material": "missing" }
        ],
        "materials": {
            "red": { "type": "solid", "colour": { "r": 1.0, "g": 0.0, "b": 0.0 } }
        }
    }"#;

    #[test]
    fn parses_solid_materials() {
        let mesh = Mesh::from_json(QUAD, Path::new(".")).unwrap();
        assert_eq!(mesh.triangle_count(), 2);

        let colour = mesh.sample_material("red", UV::default(), TextureFiltering::Nearest);
        assert_eq!(colour, Some(RGBA::new(1.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn unknown_material_samples_nothing() {
        let mesh = Mesh::from_json(QUAD, Path::new(".")).unwrap();
        let (_, material) = mesh.uv_triangle(1);
        assert_eq!(material, "missing");
        assert!(mesh
            .sample_material(material, UV::default(), TextureFiltering::Linear)
            .is_none());
    }

    #[test]
    fn bounds_cover_all_triangles() {
        let mesh = Mesh::from_json(QUAD, Path::new(".")).unwrap();
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let result = Mesh::new(
            vec![Point3::new(0.0, 0.0, 0.0)],
            Vec::new(),
            vec![MeshTriangle {
                positions: [0, 1, 2],
                uvs: None,
                material: "any".into(),
            }],
            HashMap::new(),
        );
        assert!(matches!(result, Err(PipelineError::InvalidMesh(_))));
    }
}

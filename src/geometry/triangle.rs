//! # Triangle Module
//!
//! Plain triangles and UV-mapped triangles. Neither stores its area; it is derived
//! from the vertices when needed.

use cgmath::{InnerSpace, Point3};
use serde::{Deserialize, Serialize};

/// A pair of texture coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct UV {
    /// Horizontal texture coordinate
    pub u: f32,
    /// Vertical texture coordinate, `0.0` is the bottom of the texture
    pub v: f32,
}

impl UV {
    /// Creates a new pair of texture coordinates.
    pub const fn new(u: f32, v: f32) -> Self {
        UV { u, v }
    }

    /// Returns `true` when both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.u.is_finite() && self.v.is_finite()
    }
}

/// A triangle in 3D space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub v0: Point3<f32>,
    /// Second vertex
    pub v1: Point3<f32>,
    /// Third vertex
    pub v2: Point3<f32>,
}

impl Triangle {
    /// Creates a triangle from three vertices.
    pub fn new(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        Triangle { v0, v1, v2 }
    }

    /// The area of the triangle.
    ///
    /// # Returns
    /// Half the magnitude of the cross product of two edges. Zero for degenerate triangles.
    pub fn area(&self) -> f32 {
        (self.v1 - self.v0).cross(self.v2 - self.v0).magnitude() * 0.5
    }

    /// The component-wise minimum and maximum corners of the triangle.
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        let min = Point3::new(
            self.v0.x.min(self.v1.x).min(self.v2.x),
            self.v0.y.min(self.v1.y).min(self.v2.y),
            self.v0.z.min(self.v1.z).min(self.v2.z),
        );
        let max = Point3::new(
            self.v0.x.max(self.v1.x).max(self.v2.x),
            self.v0.y.max(self.v1.y).max(self.v2.y),
            self.v0.z.max(self.v1.z).max(self.v2.z),
        );
        (min, max)
    }
}

/// A triangle whose vertices carry texture coordinates.
///
/// `uv0`, `uv1` and `uv2` belong to `v0`, `v1` and `v2` respectively.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UVTriangle {
    /// First vertex
    pub v0: Point3<f32>,
    /// Second vertex
    pub v1: Point3<f32>,
    /// Third vertex
    pub v2: Point3<f32>,
    /// Texture coordinates of `v0`
    pub uv0: UV,
    /// Texture coordinates of `v1`
    pub uv1: UV,
    /// Texture coordinates of `v2`
    pub uv2: UV,
}

impl UVTriangle {
    /// Creates a UV triangle from vertices and their texture coordinates.
    pub fn new(
        v0: Point3<f32>,
        v1: Point3<f32>,
        v2: Point3<f32>,
        uv0: UV,
        uv1: UV,
        uv2: UV,
    ) -> Self {
        UVTriangle {
            v0,
            v1,
            v2,
            uv0,
            uv1,
            uv2,
        }
    }

    /// The positional part of this triangle.
    pub fn triangle(&self) -> Triangle {
        Triangle::new(self.v0, self.v1, self.v2)
    }

    /// Returns a copy with every vertex passed through `transform`; UVs are unchanged.
    pub fn map_vertices(&self, transform: impl Fn(Point3<f32>) -> Point3<f32>) -> Self {
        UVTriangle {
            v0: transform(self.v0),
            v1: transform(self.v1),
            v2: transform(self.v2),
            ..*self
        }
    }
}

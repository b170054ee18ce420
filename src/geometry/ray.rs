//! # Ray Module
//!
//! Axis-aligned rays and ray/triangle intersection, used by the ray voxeliser to find
//! where a triangle crosses the voxel lattice.

use cgmath::{InnerSpace, Point3, Vector3};

use super::triangle::Triangle;

/// Determinants smaller than this are treated as a ray parallel to the triangle.
const PARALLEL_EPSILON: f32 = 1e-9;

/// Barycentric slack so rays through a shared edge still hit both triangles.
const EDGE_EPSILON: f32 = 1e-6;

/// One of the three grid axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    /// The X axis
    X,
    /// The Y axis
    Y,
    /// The Z axis
    Z,
}

impl Axis {
    /// All axes in the order the voxeliser casts rays along them.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Unit vector pointing along the positive axis.
    pub fn unit(&self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::unit_x(),
            Axis::Y => Vector3::unit_y(),
            Axis::Z => Vector3::unit_z(),
        }
    }

    /// Component index of this axis in a point or vector.
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two axes perpendicular to this one, in ascending order.
    pub fn others(&self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

/// A ray with an origin and a direction. The direction need not be normalised.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// Where the ray starts
    pub origin: Point3<f32>,
    /// The direction the ray travels in
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Creates a ray travelling along the positive direction of `axis`.
    ///
    /// # Arguments
    /// * `origin` - The start of the ray
    /// * `axis` - The axis to travel along
    pub fn along_axis(origin: Point3<f32>, axis: Axis) -> Self {
        Ray {
            origin,
            direction: axis.unit(),
        }
    }

    /// Intersects the ray with a triangle using the Möller–Trumbore algorithm.
    ///
    /// # Arguments
    /// * `triangle` - The triangle to test against
    ///
    /// # Returns
    /// The intersection point, or `None` if the ray misses, runs parallel to the triangle,
    /// or the triangle lies behind the origin.
    pub fn intersect_triangle(&self, triangle: &Triangle) -> Option<Point3<f32>> {
        let edge1 = triangle.v1 - triangle.v0;
        let edge2 = triangle.v2 - triangle.v0;

        let h = self.direction.cross(edge2);
        let det = edge1.dot(h);
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - triangle.v0;
        let u = inv_det * s.dot(h);
        if !(-EDGE_EPSILON..=1.0 + EDGE_EPSILON).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = inv_det * self.direction.dot(q);
        if v < -EDGE_EPSILON || u + v > 1.0 + EDGE_EPSILON {
            return None;
        }

        let t = inv_det * edge2.dot(q);
        if t < 0.0 {
            return None;
        }

        Some(self.origin + self.direction * t)
    }
}

//! # Geometry Module
//!
//! Value types shared by every pipeline stage: colours, texture coordinates,
//! triangles, integer bounds and rays.

pub mod colour;
pub mod ray;
pub mod triangle;

use cgmath::{Point3, Vector3};

pub use colour::RGBA;
pub use ray::{Axis, Ray};
pub use triangle::{Triangle, UVTriangle, UV};

/// An axis-aligned box over integer voxel cells, inclusive on both ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    /// Smallest cell coordinate on every axis
    pub min: Point3<i32>,
    /// Largest cell coordinate on every axis
    pub max: Point3<i32>,
}

impl Bounds {
    /// Creates bounds containing exactly one cell.
    pub fn from_point(point: Point3<i32>) -> Self {
        Bounds {
            min: point,
            max: point,
        }
    }

    /// Grows the bounds so they contain `point`.
    pub fn extend(&mut self, point: Point3<i32>) {
        self.min = Point3::new(
            self.min.x.min(point.x),
            self.min.y.min(point.y),
            self.min.z.min(point.z),
        );
        self.max = Point3::new(
            self.max.x.max(point.x),
            self.max.y.max(point.y),
            self.max.z.max(point.z),
        );
    }

    /// The number of cells spanned on each axis, `max - min + 1`.
    pub fn dimensions(&self) -> Vector3<i32> {
        self.max - self.min + Vector3::new(1, 1, 1)
    }

    /// Returns `true` if `point` lies inside the bounds.
    pub fn contains(&self, point: Point3<i32>) -> bool {
        (self.min.x..=self.max.x).contains(&point.x)
            && (self.min.y..=self.max.y).contains(&point.y)
            && (self.min.z..=self.max.z).contains(&point.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_are_inclusive() {
        let mut bounds = Bounds::from_point(Point3::new(-1, 0, 2));
        bounds.extend(Point3::new(3, 0, 2));
        assert_eq!(bounds.dimensions(), Vector3::new(5, 1, 1));
        assert!(bounds.contains(Point3::new(0, 0, 2)));
        assert!(!bounds.contains(Point3::new(0, 1, 2)));
    }
}

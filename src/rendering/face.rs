//! Cube face geometry shared by the voxel and block render buffers.

use cgmath::Point3;

use crate::blocks::BlockFace;

/// The four corners of one quad face of a voxel cube.
///
/// A voxel at cell `p` occupies the cube `[p, p + 1]`. Corners are named as seen from
/// outside the cube looking at the face: lower-left, lower-right, upper-left,
/// upper-right. Combined with [`face_indices`] the two triangles wind counter-clockwise
/// from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceCorners {
    /// Lower-left corner
    pub ll: Point3<i32>,
    /// Lower-right corner
    pub lr: Point3<i32>,
    /// Upper-left corner
    pub ul: Point3<i32>,
    /// Upper-right corner
    pub ur: Point3<i32>,
}

impl FaceCorners {
    /// Computes the corners of one face of the voxel at `cell`.
    ///
    /// # Arguments
    /// * `cell` - The voxel's grid cell
    /// * `face` - Which face of the cube
    ///
    /// # Returns
    /// The corners in ll, lr, ul, ur order.
    pub fn new(cell: Point3<i32>, face: BlockFace) -> Self {
        let (i, j, k) = (cell.x, cell.y, cell.z);
        match face {
            BlockFace::North => FaceCorners {
                ll: Point3::new(i + 1, j, k),
                lr: Point3::new(i, j, k),
                ul: Point3::new(i + 1, j + 1, k),
                ur: Point3::new(i, j + 1, k),
            },

            BlockFace::South => FaceCorners {
                ll: Point3::new(i, j, k + 1),
                lr: Point3::new(i + 1, j, k + 1),
                ul: Point3::new(i, j + 1, k + 1),
                ur: Point3::new(i + 1, j + 1, k + 1),
            },

            BlockFace::Up => FaceCorners {
                ll: Point3::new(i, j + 1, k + 1),
                lr: Point3::new(i + 1, j + 1, k + 1),
                ul: Point3::new(i, j + 1, k),
                ur: Point3::new(i + 1, j + 1, k),
            },

            BlockFace::Down => FaceCorners {
                ll: Point3::new(i, j, k),
                lr: Point3::new(i + 1, j, k),
                ul: Point3::new(i, j, k + 1),
                ur: Point3::new(i + 1, j, k + 1),
            },

            BlockFace::East => FaceCorners {
                ll: Point3::new(i + 1, j, k + 1),
                lr: Point3::new(i + 1, j, k),
                ul: Point3::new(i + 1, j + 1, k + 1),
                ur: Point3::new(i + 1, j + 1, k),
            },

            BlockFace::West => FaceCorners {
                ll: Point3::new(i, j, k),
                lr: Point3::new(i, j, k + 1),
                ul: Point3::new(i, j + 1, k),
                ur: Point3::new(i, j + 1, k + 1),
            },
        }
    }

    /// The corners in buffer order.
    pub fn to_array(&self) -> [Point3<i32>; 4] {
        [self.ll, self.lr, self.ul, self.ur]
    }
}

/// Generates index data for a face, offset by the number of faces already written.
///
/// # Arguments
/// * `num_faces_generated` - The number of faces that have been generated so far
///
/// # Returns
/// Six indices forming the two triangles `ll, lr, ur` and `ll, ur, ul`.
pub fn face_indices(num_faces_generated: u32) -> [u32; 6] {
    let base = num_faces_generated * 4;
    [base, base + 1, base + 3, base, base + 3, base + 2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    fn winding_normal(corners: &FaceCorners) -> Vector3<f32> {
        let ll = corners.ll.cast::<f32>().unwrap();
        let lr = corners.lr.cast::<f32>().unwrap();
        let ur = corners.ur.cast::<f32>().unwrap();
        (lr - ll).cross(ur - ll).normalize()
    }

    #[test]
    fn triangles_face_outwards() {
        for face in BlockFace::ALL {
            let corners = FaceCorners::new(Point3::new(2, -1, 5), face);
            assert_eq!(winding_normal(&corners), face.normal(), "{:?}", face);
        }
    }

    #[test]
    fn corners_lie_on_the_unit_cube() {
        let cell = Point3::new(-3, 0, 7);
        for face in BlockFace::ALL {
            for corner in FaceCorners::new(cell, face).to_array() {
                let offset = corner - cell;
                for component in [offset.x, offset.y, offset.z] {
                    assert!(component == 0 || component == 1);
                }
            }
        }
    }

    #[test]
    fn indices_advance_by_four_vertices() {
        assert_eq!(face_indices(0), [0, 1, 3, 0, 3, 2]);
        assert_eq!(face_indices(3), [12, 13, 15, 12, 15, 14]);
    }
}

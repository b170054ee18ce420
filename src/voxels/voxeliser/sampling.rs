//! Colour sampling at a point on a mesh triangle.

use cgmath::Point3;

use crate::{
    geometry::{Triangle, UVTriangle, RGBA, UV},
    mesh::{Mesh, TextureFiltering},
};

/// Triangles with a smaller area than this are treated as degenerate.
const DEGENERATE_AREA: f32 = 1e-10;

/// Barycentric weights of `point` with respect to `triangle`.
///
/// The weight of each vertex is the area of the sub-triangle opposite it, over the sum
/// of all three sub-triangle areas. For a point inside the triangle the weights sum to
/// one and reproduce the point.
///
/// # Returns
/// `None` when the triangle has (near) zero area or the weights are not finite.
pub fn barycentric_weights(triangle: &Triangle, point: Point3<f32>) -> Option<[f32; 3]> {
    let area = triangle.area();
    if area.is_nan() || area <= DEGENERATE_AREA {
        return None;
    }

    let area01 = Triangle::new(triangle.v0, triangle.v1, point).area();
    let area12 = Triangle::new(triangle.v1, triangle.v2, point).area();
    let area20 = Triangle::new(triangle.v2, triangle.v0, point).area();
    let total = area01 + area12 + area20;

    let weights = [area12 / total, area20 / total, area01 / total];
    weights.iter().all(|w| w.is_finite()).then_some(weights)
}

/// Interpolates the triangle's texture coordinates at `point`.
pub fn interpolate_uv(triangle: &UVTriangle, point: Point3<f32>) -> Option<UV> {
    let [w0, w1, w2] = barycentric_weights(&triangle.triangle(), point)?;
    let uv = UV::new(
        triangle.uv0.u * w0 + triangle.uv1.u * w1 + triangle.uv2.u * w2,
        triangle.uv0.v * w0 + triangle.uv1.v * w1 + triangle.uv2.v * w2,
    );
    uv.is_finite().then_some(uv)
}

/// Samples the colour of a mesh's material at a point on one of its triangles.
///
/// # Arguments
/// * `mesh` - The mesh owning the material
/// * `triangle` - The triangle, in the same space as `location`
/// * `material_name` - Material of the triangle
/// * `location` - A point on (or near) the triangle
/// * `filtering` - Texture filtering mode
///
/// # Returns
/// The sampled colour, or `None` if the triangle is degenerate, the interpolated UV is
/// not a number, or the material cannot be sampled. Never an error.
pub fn get_voxel_colour(
    mesh: &Mesh,
    triangle: &UVTriangle,
    material_name: &str,
    location: Point3<f32>,
    filtering: TextureFiltering,
) -> Option<RGBA> {
    let uv = interpolate_uv(triangle, location)?;
    mesh.sample_material(material_name, uv, filtering)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use approx::assert_relative_eq;
    use cgmath::{EuclideanSpace, Point3};

    use super::*;
    use crate::mesh::{Material, MeshTriangle};

    fn right_triangle() -> UVTriangle {
        UVTriangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            UV::new(0.0, 0.0),
            UV::new(1.0, 0.0),
            UV::new(0.0, 1.0),
        )
    }

    #[test]
    fn weights_reproduce_random_interior_points() {
        let triangle = right_triangle().triangle();
        let mut rng = fastrand::Rng::with_seed(7);

        for _ in 0..100 {
            let (mut a, mut b) = (rng.f32(), rng.f32());
            if a + b > 1.0 {
                a = 1.0 - a;
                b = 1.0 - b;
            }
            let point = Point3::new(a, b, 0.0);
            let [w0, w1, w2] = barycentric_weights(&triangle, point).unwrap();

            assert_relative_eq!(w0 + w1 + w2, 1.0, epsilon = 1e-5);
            let rebuilt = Point3::from_vec(
                triangle.v0.to_vec() * w0 + triangle.v1.to_vec() * w1 + triangle.v2.to_vec() * w2,
            );
            assert_relative_eq!(rebuilt.x, point.x, epsilon = 1e-5);
            assert_relative_eq!(rebuilt.y, point.y, epsilon = 1e-5);
        }
    }

    #[test]
    fn vertex_gets_full_weight() {
        let triangle = right_triangle().triangle();
        let weights = barycentric_weights(&triangle, triangle.v1).unwrap();
        assert_relative_eq!(weights[0], 0.0);
        assert_relative_eq!(weights[1], 1.0);
        assert_relative_eq!(weights[2], 0.0);
    }

    #[test]
    fn degenerate_triangles_yield_nothing() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let coincident = Triangle::new(p, p, Point3::new(2.0, 0.0, 0.0));
        let collinear = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );

        assert!(barycentric_weights(&coincident, p).is_none());
        assert!(barycentric_weights(&coincident, Point3::new(5.0, 5.0, 5.0)).is_none());
        assert!(barycentric_weights(&collinear, Point3::new(0.5, 3.0, 0.0)).is_none());
    }

    #[test]
    fn samples_material_through_interpolated_uv() {
        let mut materials = HashMap::new();
        materials.insert(
            "red".to_string(),
            Material::Solid {
                colour: RGBA::new(1.0, 0.0, 0.0, 1.0),
            },
        );
        let mesh = Mesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            Vec::new(),
            vec![MeshTriangle {
                positions: [0, 1, 2],
                uvs: None,
                material: "red".into(),
            }],
            materials,
        )
        .unwrap();
        let (triangle, material) = mesh.uv_triangle(0);
        let location = Point3::new(0.25, 0.25, 0.0);

        assert_eq!(
            get_voxel_colour(&mesh, &triangle, material, location, TextureFiltering::Nearest),
            Some(RGBA::new(1.0, 0.0, 0.0, 1.0))
        );
        assert_eq!(
            get_voxel_colour(&mesh, &triangle, "other", location, TextureFiltering::Nearest),
            None
        );
    }
}

//! Primitive solids.

use crate::float_types::Real;
use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};

/// Closed, outward-wound axis-aligned box of the given extents centred on
/// the origin (8 vertices, 12 triangles).
pub fn cuboid(size: &Vector3<Real>) -> Mesh {
    let h = size / 2.0;
    let vertices = vec![
        Point3::new(-h.x, -h.y, -h.z),
        Point3::new(h.x, -h.y, -h.z),
        Point3::new(h.x, h.y, -h.z),
        Point3::new(-h.x, h.y, -h.z),
        Point3::new(-h.x, -h.y, h.z),
        Point3::new(h.x, -h.y, h.z),
        Point3::new(h.x, h.y, h.z),
        Point3::new(-h.x, h.y, h.z),
    ];
    // (quad corners, counter-clockwise seen from outside)
    let quads = [
        [0, 3, 2, 1], // -z
        [4, 5, 6, 7], // +z
        [0, 1, 5, 4], // -y
        [3, 7, 6, 2], // +y
        [0, 4, 7, 3], // -x
        [1, 2, 6, 5], // +x
    ];
    let faces = quads
        .iter()
        .flat_map(|&[a, b, c, d]| [[a, b, c], [a, c, d]])
        .collect();

    Mesh {
        vertices,
        faces,
        normals: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_faces_point_outward() {
        let mesh = cuboid(&Vector3::new(2.0, 4.0, 6.0));
        for (n, c) in mesh.face_normals().iter().zip(mesh.face_centroids()) {
            assert!(n.dot(&c.coords) > 0.0);
        }
        assert!((mesh.signed_volume() - 48.0).abs() < 1e-9);
    }
}

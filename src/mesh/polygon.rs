//! Convex planar polygons, the unit the BSP tree works on.

use crate::float_types::Real;
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::Point3;

/// A convex polygon with its supporting plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
}

impl Polygon {
    /// Polygon from an ordered vertex loop; `None` if it is degenerate.
    pub fn new(vertices: Vec<Vertex>) -> Option<Self> {
        let plane = Plane::from_vertices(&vertices)?;
        Some(Polygon { vertices, plane })
    }

    /// Polygon whose plane is already known (e.g. a split fragment).
    pub const fn with_plane(vertices: Vec<Vertex>, plane: Plane) -> Self {
        Polygon { vertices, plane }
    }

    /// Reverse winding, vertex normals and plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.vertices.iter_mut().for_each(Vertex::flip);
        self.plane.flip();
    }

    pub fn bounding_box(&self) -> Aabb {
        let first = self.vertices.first().map(|v| v.pos).unwrap_or_else(Point3::origin);
        let (mins, maxs) = self
            .vertices
            .iter()
            .fold((first, first), |(lo, hi), v| (lo.inf(&v.pos), hi.sup(&v.pos)));
        Aabb::new(mins, maxs)
    }

    /// Fan triangulation from the first vertex.
    pub fn triangulate(&self) -> Vec<[Point3<Real>; 3]> {
        let Some(anchor) = self.vertices.first() else {
            return Vec::new();
        };
        self.vertices
            .windows(2)
            .skip(1)
            .map(|pair| [anchor.pos, pair[0].pos, pair[1].pos])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn degenerate_polygon_rejected() {
        let v = |x: Real| Vertex::new(Point3::new(x, 0.0, 0.0), Vector3::z());
        assert!(Polygon::new(vec![v(0.0), v(1.0), v(2.0)]).is_none());
    }

    #[test]
    fn fan_triangulation_count() {
        let v = |x: Real, y: Real| Vertex::new(Point3::new(x, y, 0.0), Vector3::z());
        let pentagon = Polygon::new(vec![
            v(1.0, 0.0),
            v(0.3, 0.95),
            v(-0.8, 0.6),
            v(-0.8, -0.6),
            v(0.3, -0.95),
        ])
        .unwrap();
        assert_eq!(pentagon.triangulate().len(), 3);
    }

    #[test]
    fn flip_reverses_plane() {
        let v = |x: Real, y: Real| Vertex::new(Point3::new(x, y, 0.0), Vector3::z());
        let mut tri = Polygon::new(vec![v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0)]).unwrap();
        tri.flip();
        assert!(tri.plane.normal.z < 0.0);
        assert!(tri.vertices.iter().all(|v| v.normal.z < 0.0));
    }
}

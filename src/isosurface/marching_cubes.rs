//! Marching cubes with shared edge vertices and gradient normals.

use super::IsosurfaceExtractor;
use super::tables::{CORNER_OFFSETS, EDGE_CONNECTIONS, EDGE_TABLE, TRI_TABLE};
use crate::field::ScalarField;
use crate::float_types::Real;
use crate::mesh::Mesh;
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

/// Classic Lorensen–Cline marching cubes.
///
/// Each crossed grid edge contributes exactly one vertex, shared by every
/// triangle that uses it, so a surface that stays inside the sampled block
/// comes out closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarchingCubes;

impl MarchingCubes {
    pub const fn new() -> Self {
        MarchingCubes
    }
}

/// Central-difference gradient at a sample, one-sided on the block faces.
fn gradient(field: &ScalarField, p: [usize; 3]) -> Vector3<Real> {
    let dims = field.dims();
    Vector3::from_fn(|axis, _| {
        let n = dims[axis];
        if n < 2 {
            return 0.0;
        }
        let mut lo = p;
        let mut hi = p;
        lo[axis] = p[axis].saturating_sub(1);
        hi[axis] = (p[axis] + 1).min(n - 1);
        let steps = (hi[axis] - lo[axis]) as Real;
        let dv = field.get(hi[0], hi[1], hi[2]) - field.get(lo[0], lo[1], lo[2]);
        dv / (steps * field.spacing[axis])
    })
}

struct Builder<'a> {
    field: &'a ScalarField,
    level: Real,
    vertices: Vec<Point3<Real>>,
    normals: Vec<Vector3<Real>>,
    faces: Vec<[usize; 3]>,
    // (linear index of the lower end point, axis) -> vertex
    edge_vertices: HashMap<(usize, u8), usize>,
}

impl Builder<'_> {
    fn edge_vertex(&mut self, a: [usize; 3], b: [usize; 3]) -> usize {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let axis = (0..3).find(|&i| lo[i] != hi[i]).unwrap_or(0) as u8;
        let key = (self.field.shape.index(lo[0], lo[1], lo[2]), axis);
        if let Some(&index) = self.edge_vertices.get(&key) {
            return index;
        }

        let v0 = self.field.get(lo[0], lo[1], lo[2]);
        let v1 = self.field.get(hi[0], hi[1], hi[2]);
        let dv = v1 - v0;
        let t = if dv.abs() > Real::EPSILON {
            ((self.level - v0) / dv).clamp(0.0, 1.0)
        } else {
            0.5
        };

        let spacing = self.field.spacing;
        let pos = Point3::from(Vector3::from_fn(|i, _| {
            (lo[i] as Real + t * (hi[i] as Real - lo[i] as Real)) * spacing[i]
        }));
        let g0 = gradient(self.field, lo);
        let g1 = gradient(self.field, hi);
        let descent = -(g0 + (g1 - g0) * t);
        let normal = descent
            .try_normalize(Real::EPSILON)
            .unwrap_or_else(Vector3::zeros);

        self.vertices.push(pos);
        self.normals.push(normal);
        let index = self.vertices.len() - 1;
        self.edge_vertices.insert(key, index);
        index
    }

    fn process_cell(&mut self, x: usize, y: usize, z: usize) {
        let corners: [[usize; 3]; 8] =
            CORNER_OFFSETS.map(|[dx, dy, dz]| [x + dx, y + dy, z + dz]);

        let mut cube_index = 0usize;
        for (i, c) in corners.iter().enumerate() {
            if self.field.get(c[0], c[1], c[2]) < self.level {
                cube_index |= 1 << i;
            }
        }

        let crossed = EDGE_TABLE[cube_index];
        if crossed == 0 {
            return;
        }

        let mut edge_index = [usize::MAX; 12];
        for (e, [c0, c1]) in EDGE_CONNECTIONS.iter().enumerate() {
            if crossed & (1 << e) != 0 {
                edge_index[e] = self.edge_vertex(corners[*c0], corners[*c1]);
            }
        }

        // table winding faces the below-level corners, i.e. down the gradient
        for tri in TRI_TABLE[cube_index].chunks_exact(3) {
            if tri[0] < 0 {
                break;
            }
            let face = [
                edge_index[tri[0] as usize],
                edge_index[tri[1] as usize],
                edge_index[tri[2] as usize],
            ];
            if face[0] != face[1] && face[1] != face[2] && face[2] != face[0] {
                self.faces.push(face);
            }
        }
    }
}

impl IsosurfaceExtractor for MarchingCubes {
    fn extract(&self, field: &ScalarField, level: Real) -> Mesh {
        let [nx, ny, nz] = field.dims();
        if nx < 2 || ny < 2 || nz < 2 || !field.has_crossing(level) {
            log::warn!("Isovalue {level} does not cross the sampled field, surface is empty");
            return Mesh {
                normals: Some(Vec::new()),
                ..Mesh::new()
            };
        }

        let mut builder = Builder {
            field,
            level,
            vertices: Vec::new(),
            normals: Vec::new(),
            faces: Vec::new(),
            edge_vertices: HashMap::new(),
        };

        for z in 0..nz - 1 {
            for y in 0..ny - 1 {
                for x in 0..nx - 1 {
                    builder.process_cell(x, y, z);
                }
            }
        }

        log::debug!(
            "Marching cubes at level {level}: {} vertices, {} triangles",
            builder.vertices.len(),
            builder.faces.len()
        );

        Mesh {
            vertices: builder.vertices,
            faces: builder.faces,
            normals: Some(builder.normals),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::PI;

    fn ball(n: usize, radius: Real) -> ScalarField {
        let centre = Point3::new(1.0, 1.0, 1.0);
        let h = 2.0 / (n - 1) as Real;
        ScalarField::from_fn([n, n, n], Vector3::repeat(h), |p| radius - (p - centre).norm())
    }

    #[test]
    fn ball_is_closed_and_outward() {
        let mesh = MarchingCubes.extract(&ball(24, 0.7), 0.0);
        assert!(!mesh.is_empty());
        assert!(mesh.is_watertight());

        let centre = Point3::new(1.0, 1.0, 1.0);
        let inward = mesh
            .face_normals()
            .iter()
            .zip(mesh.face_centroids())
            .filter(|(n, c)| n.dot(&(c - centre)) < -1e-9)
            .count();
        assert_eq!(inward, 0, "faces must face away from the ball centre");
        let normals = mesh.normals.as_ref().unwrap();
        for (p, n) in mesh.vertices.iter().zip(normals) {
            assert!(((p - centre).norm() - 0.7).abs() < 0.05);
            assert!(n.dot(&(p - centre)) > 0.0);
        }

        let expected = 4.0 / 3.0 * PI * 0.7_f64.powi(3);
        assert!((mesh.signed_volume() - expected).abs() / expected < 0.05);
    }

    #[test]
    fn no_crossing_is_empty() {
        let mesh = MarchingCubes.extract(&ball(8, 0.5), 10.0);
        assert!(mesh.is_empty());
        assert!(mesh.vertices.is_empty());
        assert_eq!(mesh.normals, Some(Vec::new()));
    }

    #[test]
    fn vertices_are_shared_between_cells() {
        let mesh = MarchingCubes.extract(&ball(16, 0.6), 0.0);
        assert_eq!(mesh.weld().vertex_count(), mesh.vertex_count());
    }
}

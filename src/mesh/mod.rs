//! Indexed triangle meshes and the polygon CSG machinery used to clip them.

pub mod bsp;
pub mod cleanup;
pub mod holes;
pub mod manifold;
pub mod plane;
pub mod polygon;
pub mod shapes;
pub mod tjunction;
pub mod vertex;

use crate::errors::{Result, TpmsError};
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::float_types::{Real, tolerance};
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

/// Integer lattice key used to merge coincident vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuantizedPoint(pub i64, pub i64, pub i64);

impl QuantizedPoint {
    /// Snap `p` to a lattice of pitch `1 / factor`.
    #[inline]
    pub fn new(p: &Point3<Real>, factor: Real) -> Self {
        QuantizedPoint(
            (p.x * factor).round() as i64,
            (p.y * factor).round() as i64,
            (p.z * factor).round() as i64,
        )
    }
}

/// Lattice factor used when welding, ten times coarser than [`tolerance`].
pub fn weld_factor() -> Real {
    1.0 / (10.0 * tolerance())
}

/// Ordered vertex list, ordered triangle list and optional per-vertex normals.
///
/// Face winding is counter-clockwise seen from the side the surface faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point3<Real>>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3<Real>>>,
}

impl Mesh {
    pub const fn new() -> Self {
        Mesh {
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
        }
    }

    /// Build a mesh, checking that every face index is in range and that the
    /// normal list (if any) matches the vertex list.
    pub fn from_parts(
        vertices: Vec<Point3<Real>>,
        faces: Vec<[usize; 3]>,
        normals: Option<Vec<Vector3<Real>>>,
    ) -> Result<Self> {
        let mesh = Mesh {
            vertices,
            faces,
            normals,
        };
        mesh.check_indices()?;
        Ok(mesh)
    }

    /// Verify face indices and normal count.
    pub fn check_indices(&self) -> Result<()> {
        let n = self.vertices.len();
        if let Some(face) = self.faces.iter().find(|f| f.iter().any(|&i| i >= n)) {
            return Err(TpmsError::invalid(
                "faces",
                format!("face {face:?} indexes past {n} vertices"),
            ));
        }
        if let Some(normals) = &self.normals {
            if normals.len() != n {
                return Err(TpmsError::invalid(
                    "normals",
                    format!("{} normals for {n} vertices", normals.len()),
                ));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Reverse every face's winding and negate every vertex normal.
    pub fn flip(&mut self) {
        for face in &mut self.faces {
            face.swap(1, 2);
        }
        if let Some(normals) = &mut self.normals {
            normals.iter_mut().for_each(|n| *n = -*n);
        }
    }

    pub fn flipped(&self) -> Mesh {
        let mut mesh = self.clone();
        mesh.flip();
        mesh
    }

    /// Append `other`, offsetting its indices. Vertices are not merged.
    ///
    /// Normals survive only if both meshes carry them (or one side is empty).
    pub fn append(&mut self, other: &Mesh) {
        let offset = self.vertices.len();
        self.normals = match (self.normals.take(), &other.normals) {
            (Some(mut mine), Some(theirs)) => {
                mine.extend_from_slice(theirs);
                Some(mine)
            },
            (None, Some(theirs)) if self.vertices.is_empty() => Some(theirs.clone()),
            (Some(mine), None) if other.vertices.is_empty() => Some(mine),
            _ => None,
        };
        self.vertices.extend_from_slice(&other.vertices);
        self.faces
            .extend(other.faces.iter().map(|f| f.map(|i| i + offset)));
    }

    /// Concatenate meshes in order without welding.
    pub fn concatenate(meshes: &[Mesh]) -> Mesh {
        let mut out = Mesh::new();
        for mesh in meshes {
            out.append(mesh);
        }
        out
    }

    pub fn translate(&mut self, offset: &Vector3<Real>) {
        for p in &mut self.vertices {
            *p += offset;
        }
    }

    /// Axis-aligned bounds of the vertex set, a degenerate box at the origin
    /// for an empty mesh.
    pub fn bounding_box(&self) -> Aabb {
        let mut iter = self.vertices.iter();
        let Some(first) = iter.next() else {
            return Aabb::new(Point3::origin(), Point3::origin());
        };
        let (mins, maxs) = iter.fold((*first, *first), |(lo, hi), p| (lo.inf(p), hi.sup(p)));
        Aabb::new(mins, maxs)
    }

    /// Unnormalized normal `(b − a) × (c − a)` of face `i`.
    pub fn face_cross(&self, i: usize) -> Vector3<Real> {
        let [a, b, c] = self.faces[i].map(|v| self.vertices[v]);
        (b - a).cross(&(c - a))
    }

    /// Unit face normals from winding; zero for degenerate faces.
    pub fn face_normals(&self) -> Vec<Vector3<Real>> {
        (0..self.faces.len())
            .map(|i| {
                self.face_cross(i)
                    .try_normalize(Real::EPSILON)
                    .unwrap_or_else(Vector3::zeros)
            })
            .collect()
    }

    pub fn face_centroids(&self) -> Vec<Point3<Real>> {
        self.faces
            .iter()
            .map(|f| {
                let sum = f
                    .iter()
                    .fold(Vector3::zeros(), |acc, &i| acc + self.vertices[i].coords);
                Point3::from(sum / 3.0)
            })
            .collect()
    }

    /// Total surface area.
    pub fn area(&self) -> Real {
        (0..self.faces.len()).map(|i| self.face_cross(i).norm() * 0.5).sum()
    }

    /// Signed enclosed volume (divergence theorem); positive for a closed
    /// outward-wound surface.
    pub fn signed_volume(&self) -> Real {
        self.faces
            .iter()
            .map(|f| {
                let [a, b, c] = f.map(|i| self.vertices[i].coords);
                a.dot(&b.cross(&c)) / 6.0
            })
            .sum()
    }

    /// Merge vertices that fall on the same lattice point of pitch
    /// `1 / factor` and drop faces that collapse as a result.
    ///
    /// Vertex normals of merged vertices are summed and renormalized.
    pub fn welded(&self, factor: Real) -> Mesh {
        let mut lookup: HashMap<QuantizedPoint, usize> = HashMap::with_capacity(self.vertices.len());
        let mut remap = Vec::with_capacity(self.vertices.len());
        let mut vertices = Vec::new();
        let mut normal_sums: Option<Vec<Vector3<Real>>> = self.normals.as_ref().map(|_| Vec::new());

        for (i, p) in self.vertices.iter().enumerate() {
            let key = QuantizedPoint::new(p, factor);
            let index = *lookup.entry(key).or_insert_with(|| {
                vertices.push(*p);
                if let Some(sums) = &mut normal_sums {
                    sums.push(Vector3::zeros());
                }
                vertices.len() - 1
            });
            if let (Some(sums), Some(normals)) = (&mut normal_sums, &self.normals) {
                sums[index] += normals[i];
            }
            remap.push(index);
        }

        let faces = self
            .faces
            .iter()
            .map(|f| f.map(|i| remap[i]))
            .filter(|[a, b, c]| a != b && b != c && c != a)
            .collect();

        let normals = normal_sums.map(|sums| {
            sums.into_iter()
                .map(|n| n.try_normalize(Real::EPSILON).unwrap_or_else(Vector3::zeros))
                .collect()
        });

        Mesh {
            vertices,
            faces,
            normals,
        }
    }

    /// [`Mesh::welded`] with the crate's default lattice.
    pub fn weld(&self) -> Mesh {
        self.welded(weld_factor())
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.vertices
            .iter()
            .all(|p| p.coords.iter().all(|c| c.is_finite()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
            Some(vec![Vector3::z(); 3]),
        )
        .unwrap()
    }

    #[test]
    fn out_of_range_face_rejected() {
        let result = Mesh::from_parts(vec![Point3::origin()], vec![[0, 0, 1]], None);
        assert!(matches!(result, Err(TpmsError::InvalidParameters { field: "faces", .. })));
    }

    #[test]
    fn flip_reverses_winding_and_normals() {
        let mut mesh = triangle();
        assert!(mesh.face_normals()[0].z > 0.0);
        mesh.flip();
        assert_eq!(mesh.faces[0], [0, 2, 1]);
        assert!(mesh.face_normals()[0].z < 0.0);
        assert!(mesh.normals.unwrap().iter().all(|n| n.z == -1.0));
    }

    #[test]
    fn append_offsets_indices() {
        let mut a = triangle();
        a.append(&triangle());
        assert_eq!(a.vertex_count(), 6);
        assert_eq!(a.faces[1], [3, 4, 5]);
        assert_eq!(a.normals.as_ref().map(Vec::len), Some(6));
    }

    #[test]
    fn weld_merges_duplicates() {
        let mut a = triangle();
        let mut b = triangle();
        b.flip();
        a.append(&b);
        let welded = a.weld();
        assert_eq!(welded.vertex_count(), 3);
        assert_eq!(welded.face_count(), 2);
    }

    #[test]
    fn bounding_box_of_triangle() {
        let bb = triangle().bounding_box();
        assert_eq!(bb.mins, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bb.maxs, Point3::new(1.0, 1.0, 0.0));
    }
}

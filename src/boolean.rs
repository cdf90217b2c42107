//! The boolean geometry service consumed by the refinement loop.

use crate::errors::{Result, TpmsError};
use crate::float_types::parry3d::bounding_volume::{Aabb, BoundingVolume};
use crate::float_types::tolerance;
use crate::mesh::bsp::Node;
use crate::mesh::cleanup::{self, triangle_height};
use crate::mesh::holes;
use crate::mesh::polygon::Polygon;
use crate::mesh::tjunction;
use crate::mesh::vertex::Vertex;
use crate::mesh::{Mesh, QuantizedPoint, weld_factor};
use hashbrown::HashMap;

/// Boolean operation used to clip a lattice against its bounding solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Intersection,
    Difference,
}

impl BooleanOp {
    pub const fn name(self) -> &'static str {
        match self {
            BooleanOp::Intersection => "intersection",
            BooleanOp::Difference => "difference",
        }
    }
}

/// Mesh booleans, watertightness query and hole repair.
///
/// Implementations must report failure instead of returning garbage; the
/// refinement loop aborts the run on the first error.
pub trait BooleanKernel {
    fn intersection(&self, a: &Mesh, b: &Mesh) -> Result<Mesh>;

    fn difference(&self, a: &Mesh, b: &Mesh) -> Result<Mesh>;

    fn is_watertight(&self, mesh: &Mesh) -> bool;

    fn fill_holes(&self, mesh: &Mesh) -> Result<Mesh>;

    /// Dispatch on `op`.
    fn apply(&self, op: BooleanOp, a: &Mesh, b: &Mesh) -> Result<Mesh> {
        match op {
            BooleanOp::Intersection => self.intersection(a, b),
            BooleanOp::Difference => self.difference(a, b),
        }
    }
}

/// [`BooleanKernel`] backed by BSP-tree polygon CSG.
///
/// Results are fan-triangulated and welded on the lattice of
/// [`weld_factor`], so they carry no vertex normals.
#[derive(Debug, Clone, Copy, Default)]
pub struct BspKernel {
    /// Largest hole (in edges) `fill_holes` closes; `None` closes all.
    pub max_hole_edges: Option<usize>,
}

impl BspKernel {
    pub const fn new() -> Self {
        BspKernel {
            max_hole_edges: None,
        }
    }

    pub const fn with_max_hole_edges(max_hole_edges: usize) -> Self {
        BspKernel {
            max_hole_edges: Some(max_hole_edges),
        }
    }

    /// Checked conversion of an indexed mesh into BSP polygons.
    ///
    /// Triangles thinner than the plane tolerance are dropped: their plane
    /// is too poorly conditioned to classify their own vertices.
    fn to_polygons(mesh: &Mesh, operation: &'static str) -> Result<Vec<Polygon>> {
        if !mesh.is_finite() {
            return Err(TpmsError::kernel(operation, "mesh has non-finite coordinates"));
        }
        let n = mesh.vertices.len();
        let mut polygons = Vec::with_capacity(mesh.faces.len());
        for face in &mesh.faces {
            if face.iter().any(|&i| i >= n) {
                return Err(TpmsError::kernel(
                    operation,
                    format!("face {face:?} indexes past {n} vertices"),
                ));
            }
            let [a, b, c] = face.map(|i| mesh.vertices[i]);
            if triangle_height(&a, &b, &c) < tolerance() {
                continue;
            }
            let normal = (b - a).cross(&(c - a)).normalize();
            let vertices = vec![
                Vertex::new(a, normal),
                Vertex::new(b, normal),
                Vertex::new(c, normal),
            ];
            if let Some(polygon) = Polygon::new(vertices) {
                polygons.push(polygon);
            }
        }
        Ok(polygons)
    }

    /// Fan-triangulate and weld BSP output back into an indexed mesh.
    ///
    /// Slivers and coincident faces are removed before the T-junctions the
    /// BSP splits left behind are closed. Faces still meeting on an edge
    /// used more than twice are removed last, leaving boundary edges for
    /// hole filling.
    fn from_polygons(polygons: &[Polygon]) -> Mesh {
        let factor = weld_factor();
        let mut lookup: HashMap<QuantizedPoint, usize> = HashMap::new();
        let mut mesh = Mesh::new();

        for polygon in polygons {
            for triangle in polygon.triangulate() {
                let face = triangle.map(|p| {
                    *lookup.entry(QuantizedPoint::new(&p, factor)).or_insert_with(|| {
                        mesh.vertices.push(p);
                        mesh.vertices.len() - 1
                    })
                });
                if face[0] != face[1] && face[1] != face[2] && face[2] != face[0] {
                    mesh.faces.push(face);
                }
            }
        }
        let pitch = 1.0 / factor;
        let slivers = cleanup::remove_degenerate_faces(&mut mesh, pitch);
        let duplicates = cleanup::remove_duplicate_faces(&mut mesh);
        if slivers + duplicates > 0 {
            log::trace!("dropped {slivers} sliver and {duplicates} duplicate faces");
        }
        tjunction::split_t_junctions(&mut mesh, pitch);
        let overused = cleanup::remove_non_manifold_faces(&mut mesh);
        if overused > 0 {
            log::debug!("removed {overused} faces on non-manifold edges");
        }
        mesh
    }

    /// Split `polys` into those overlapping `other_bb` and those that cannot.
    fn partition_polys(polys: Vec<Polygon>, other_bb: &Aabb) -> (Vec<Polygon>, Vec<Polygon>) {
        polys
            .into_iter()
            .partition(|p| p.bounding_box().intersects(other_bb))
    }

    fn padded_bounds(mesh: &Mesh) -> Aabb {
        mesh.bounding_box().loosened(tolerance())
    }
}

impl BooleanKernel for BspKernel {
    fn intersection(&self, a: &Mesh, b: &Mesh) -> Result<Mesh> {
        let a_polys = Self::to_polygons(a, "intersection")?;
        let b_polys = Self::to_polygons(b, "intersection")?;
        if a_polys.is_empty() || b_polys.is_empty() {
            return Ok(Mesh::new());
        }

        let mut a = Node::from_polygons(&a_polys);
        let mut b = Node::from_polygons(&b_polys);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(&b.all_polygons());
        a.invert();

        Ok(Self::from_polygons(&a.all_polygons()))
    }

    fn difference(&self, a: &Mesh, b: &Mesh) -> Result<Mesh> {
        let a_polys = Self::to_polygons(a, "difference")?;
        let b_polys = Self::to_polygons(b, "difference")?;
        if a_polys.is_empty() || b_polys.is_empty() {
            return Ok(Self::from_polygons(&a_polys));
        }

        // avoid splitting obvious non‑intersecting faces
        let (a_clip, a_passthru) = Self::partition_polys(a_polys, &Self::padded_bounds(b));
        let (b_clip, _) = Self::partition_polys(b_polys, &Self::padded_bounds(a));

        let mut a = Node::from_polygons(&a_clip);
        let mut b = Node::from_polygons(&b_clip);

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());
        a.invert();

        let mut polygons = a.all_polygons();
        polygons.extend(a_passthru);
        Ok(Self::from_polygons(&polygons))
    }

    fn is_watertight(&self, mesh: &Mesh) -> bool {
        mesh.is_watertight()
    }

    fn fill_holes(&self, mesh: &Mesh) -> Result<Mesh> {
        if !mesh.is_finite() {
            return Err(TpmsError::kernel("fill_holes", "mesh has non-finite coordinates"));
        }
        mesh.check_indices()
            .map_err(|e| TpmsError::kernel("fill_holes", e.to_string()))?;
        Ok(holes::fill_holes(mesh, self.max_hole_edges).mesh)
    }
}

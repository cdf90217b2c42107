//! Hole detection and filling.
//!
//! A hole is a closed loop of boundary half-edges, i.e. edges used by a
//! single face. Loops are traced in the direction of the faces that own
//! them and closed with a fan around the loop centroid, wound so the new
//! faces use every boundary edge in the opposite direction.

use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::mesh::manifold::edge_uses;
use hashbrown::{HashMap, HashSet};
use log::{debug, info, warn};
use nalgebra::{Point3, Vector3};

/// Ordered vertex indices of a hole, following the owning faces' winding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryLoop {
    pub vertices: Vec<usize>,
}

impl BoundaryLoop {
    /// Number of edges (and vertices) in the loop.
    pub fn edge_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Result of [`fill_holes`].
#[derive(Debug, Clone)]
pub struct HoleFillReport {
    /// The welded mesh with fill faces appended
    pub mesh: Mesh,
    pub loops_found: usize,
    pub loops_filled: usize,
}

/// Trace the boundary loops of an already welded mesh.
///
/// Boundary chains that do not close (e.g. through edges used by three or
/// more faces) are logged and skipped.
pub fn detect_holes(mesh: &Mesh) -> Vec<BoundaryLoop> {
    let uses = edge_uses(mesh);

    // directed boundary half-edges a -> b, as they appear in their face
    let mut outgoing: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut boundary_count = 0usize;
    for face in &mesh.faces {
        for (a, b) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
            if let Some(&(forward, backward)) = uses.get(&(a.min(b), a.max(b))) {
                if forward + backward == 1 {
                    outgoing.entry(a).or_default().push(b);
                    boundary_count += 1;
                }
            }
        }
    }

    if boundary_count == 0 {
        return Vec::new();
    }
    debug!("Found {boundary_count} boundary edges");

    let mut starts: Vec<usize> = outgoing.keys().copied().collect();
    starts.sort_unstable();

    let mut used: HashSet<(usize, usize)> = HashSet::with_capacity(boundary_count);
    let mut loops = Vec::new();

    for start in starts {
        loop {
            let Some(first) = next_unused(&outgoing, &used, start) else {
                break;
            };
            used.insert((start, first));

            let mut vertices = vec![start];
            let mut current = first;
            let closed = loop {
                if current == start {
                    break true;
                }
                vertices.push(current);
                match next_unused(&outgoing, &used, current) {
                    Some(next) => {
                        used.insert((current, next));
                        current = next;
                    },
                    None => break false,
                }
            };

            if closed && vertices.len() >= 3 {
                loops.push(BoundaryLoop { vertices });
            } else if !closed {
                warn!("Boundary chain starting at vertex {start} is not closed");
            }
        }
    }

    info!(
        "Detected {} holes (boundary loops), sizes: {:?}",
        loops.len(),
        loops.iter().map(BoundaryLoop::edge_count).collect::<Vec<_>>()
    );
    loops
}

fn next_unused(
    outgoing: &HashMap<usize, Vec<usize>>,
    used: &HashSet<(usize, usize)>,
    from: usize,
) -> Option<usize> {
    outgoing
        .get(&from)?
        .iter()
        .copied()
        .find(|&to| !used.contains(&(from, to)))
}

/// Faces closing `boundary`. Triangular holes get one face; larger holes a
/// fan around a new centroid vertex, which is appended to `vertices`.
pub fn fill_hole(vertices: &mut Vec<Point3<Real>>, boundary: &BoundaryLoop) -> Vec<[usize; 3]> {
    let ring = &boundary.vertices;
    let n = ring.len();
    if n < 3 {
        return Vec::new();
    }
    if n == 3 {
        return vec![[ring[0], ring[2], ring[1]]];
    }

    let sum = ring
        .iter()
        .fold(Vector3::zeros(), |acc, &i| acc + vertices[i].coords);
    let centroid = vertices.len();
    vertices.push(Point3::from(sum / n as Real));

    (0..n)
        .map(|i| [ring[(i + 1) % n], ring[i], centroid])
        .collect()
}

/// Weld `mesh` and close every hole with at most `max_edges` edges.
pub fn fill_holes(mesh: &Mesh, max_edges: Option<usize>) -> HoleFillReport {
    let mut welded = mesh.weld();
    let loops = detect_holes(&welded);
    let loops_found = loops.len();

    let vertex_count_before = welded.vertices.len();
    let mut new_faces = Vec::new();
    let mut loops_filled = 0;
    for boundary in &loops {
        if max_edges.is_some_and(|limit| boundary.edge_count() > limit) {
            debug!("Leaving hole with {} edges open", boundary.edge_count());
            continue;
        }
        let faces = fill_hole(&mut welded.vertices, boundary);
        debug!(
            "Filled hole with {} edges using {} triangles",
            boundary.edge_count(),
            faces.len()
        );
        new_faces.extend(faces);
        loops_filled += 1;
    }
    welded.faces.extend(new_faces);

    // centroid vertices get the average normal of their ring
    if let Some(normals) = &mut welded.normals {
        for index in vertex_count_before..welded.vertices.len() {
            let mut sum = Vector3::zeros();
            let mut touching = 0usize;
            for face in welded.faces.iter().filter(|f| f[2] == index) {
                sum += normals[face[0]] + normals[face[1]];
                touching += 1;
            }
            let normal = if touching > 0 {
                sum.try_normalize(Real::EPSILON).unwrap_or_else(Vector3::zeros)
            } else {
                Vector3::zeros()
            };
            normals.push(normal);
        }
    }

    HoleFillReport {
        mesh: welded,
        loops_found,
        loops_filled,
    }
}

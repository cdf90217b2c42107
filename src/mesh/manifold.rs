//! Edge-use analysis: boundary, non-manifold and mis-oriented edges.

use crate::mesh::Mesh;
use hashbrown::HashMap;

/// How the undirected edges of a mesh are used by its faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeAnalysis {
    /// Distinct undirected edges
    pub edge_count: usize,
    /// Edges used by a single face
    pub boundary_edges: usize,
    /// Edges used by more than two faces
    pub non_manifold_edges: usize,
    /// Edges used twice in the same direction
    pub inconsistent_edges: usize,
}

impl EdgeAnalysis {
    /// Every edge shared by exactly two faces with opposite winding.
    pub const fn is_closed_and_consistent(&self) -> bool {
        self.edge_count > 0
            && self.boundary_edges == 0
            && self.non_manifold_edges == 0
            && self.inconsistent_edges == 0
    }
}

/// Directed uses of each undirected edge `(min, max)`: `(forward, backward)`.
pub(crate) fn edge_uses(mesh: &Mesh) -> HashMap<(usize, usize), (u32, u32)> {
    let mut uses: HashMap<(usize, usize), (u32, u32)> = HashMap::with_capacity(mesh.faces.len() * 3 / 2);
    for face in &mesh.faces {
        for (a, b) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
            let entry = uses.entry((a.min(b), a.max(b))).or_insert((0, 0));
            if a < b {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }
    }
    uses
}

impl Mesh {
    /// Edge statistics of the mesh after welding coincident vertices.
    pub fn edge_analysis(&self) -> EdgeAnalysis {
        let welded = self.weld();
        let uses = edge_uses(&welded);

        let mut analysis = EdgeAnalysis {
            edge_count: uses.len(),
            ..EdgeAnalysis::default()
        };
        for &(forward, backward) in uses.values() {
            match forward + backward {
                1 => analysis.boundary_edges += 1,
                2 if forward != 1 => analysis.inconsistent_edges += 1,
                2 => {},
                _ => analysis.non_manifold_edges += 1,
            }
        }
        analysis
    }

    /// A closed, consistently wound 2-manifold. Empty meshes are not
    /// watertight.
    pub fn is_watertight(&self) -> bool {
        self.edge_analysis().is_closed_and_consistent()
    }
}

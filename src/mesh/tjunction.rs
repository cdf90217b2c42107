//! Repair of T-junctions left behind by polygon splitting.
//!
//! A BSP split cuts a polygon along a plane without touching its neighbours,
//! so a vertex can end up in the middle of an edge that the neighbouring
//! triangle still spans in one piece. Such edges show up as unpaired
//! boundary edges even though the surface is closed.

use super::Mesh;
use super::manifold::edge_uses;
use crate::float_types::Real;
use hashbrown::HashMap;
use nalgebra::Point3;

const MAX_PASSES: usize = 3;

/// Vertices lying strictly inside each boundary edge, keyed by directed edge
/// and ordered from the edge's start.
fn interior_points(mesh: &Mesh, pitch: Real) -> HashMap<(usize, usize), Vec<usize>> {
    let uses = edge_uses(mesh);
    let mut boundary: Vec<(usize, usize)> = Vec::new();
    for (&(lo, hi), &(forward, backward)) in &uses {
        match (forward, backward) {
            (1, 0) => boundary.push((lo, hi)),
            (0, 1) => boundary.push((hi, lo)),
            _ => {},
        }
    }
    if boundary.is_empty() {
        return HashMap::new();
    }

    let mut candidates: Vec<usize> = boundary.iter().flat_map(|&(a, b)| [a, b]).collect();
    candidates.sort_unstable();
    candidates.dedup();
    candidates.sort_unstable_by(|&i, &j| mesh.vertices[i].x.total_cmp(&mesh.vertices[j].x));
    let xs: Vec<Real> = candidates.iter().map(|&i| mesh.vertices[i].x).collect();

    let mut splits = HashMap::new();
    for (a, b) in boundary {
        let pa = mesh.vertices[a];
        let pb = mesh.vertices[b];
        let ab = pb - pa;
        let len2 = ab.norm_squared();
        if len2 <= pitch * pitch {
            continue;
        }

        let lo = pa.x.min(pb.x) - pitch;
        let hi = pa.x.max(pb.x) + pitch;
        let start = xs.partition_point(|&x| x < lo);
        let end = xs.partition_point(|&x| x <= hi);

        let mut inside: Vec<(Real, usize)> = candidates[start..end]
            .iter()
            .filter(|&&v| v != a && v != b)
            .filter_map(|&v| {
                let p: Point3<Real> = mesh.vertices[v];
                let t = (p - pa).dot(&ab) / len2;
                let on_line = (pa + ab * t - p).norm() < pitch;
                let margin = pitch / len2.sqrt();
                (on_line && t > margin && t < 1.0 - margin).then_some((t, v))
            })
            .collect();
        if inside.is_empty() {
            continue;
        }
        inside.sort_by(|x, y| x.0.total_cmp(&y.0));
        splits.insert((a, b), inside.into_iter().map(|(_, v)| v).collect());
    }
    splits
}

/// Split triangles so that no vertex lies in the interior of an edge.
///
/// Each affected triangle is fanned from the corner opposite the split edge.
/// Expects a welded mesh; returns the number of triangles that were split.
pub fn split_t_junctions(mesh: &mut Mesh, pitch: Real) -> usize {
    let mut total = 0;
    for _ in 0..MAX_PASSES {
        let splits = interior_points(mesh, pitch);
        if splits.is_empty() {
            break;
        }

        let mut faces = Vec::with_capacity(mesh.faces.len() + splits.len() * 2);
        let mut split_faces = 0;
        for &face in &mesh.faces {
            let hit = (0..3).find_map(|e| {
                let (a, b) = (face[e], face[(e + 1) % 3]);
                splits.get(&(a, b)).map(|points| (a, b, face[(e + 2) % 3], points))
            });
            match hit {
                Some((a, b, c, points)) => {
                    let mut prev = a;
                    for &p in points.iter().chain(std::iter::once(&b)) {
                        faces.push([prev, p, c]);
                        prev = p;
                    }
                    split_faces += 1;
                },
                None => faces.push(face),
            }
        }

        mesh.faces = faces;
        total += split_faces;
    }
    if total > 0 {
        log::debug!("split {total} triangles at T-junctions");
    }
    total
}

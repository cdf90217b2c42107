//! Removal of faces that carry no surface (slivers, coincident pairs) and
//! of faces on edges shared by more than two triangles.

use super::Mesh;
use super::manifold::edge_uses;
use crate::float_types::Real;
use hashbrown::HashMap;
use nalgebra::Point3;

/// Twice the area of `[a, b, c]` divided by its longest edge, i.e. the
/// height of the triangle over that edge. Zero for collapsed triangles.
pub fn triangle_height(a: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Real {
    let longest = (b - a).norm().max((c - b).norm()).max((a - c).norm());
    if longest == 0.0 {
        return 0.0;
    }
    (b - a).cross(&(c - a)).norm() / longest
}

/// Remove triangles whose height is below `min_height`.
///
/// On a welded mesh the apex of such a triangle sits on the opposite edge
/// within `min_height`, so its neighbours meet in a T-junction that
/// [`split_t_junctions`](super::tjunction::split_t_junctions) closes.
/// Returns the number of faces removed.
pub fn remove_degenerate_faces(mesh: &mut Mesh, min_height: Real) -> usize {
    let before = mesh.faces.len();
    let vertices = &mesh.vertices;
    mesh.faces.retain(|&[a, b, c]| {
        triangle_height(&vertices[a], &vertices[b], &vertices[c]) >= min_height
    });
    before - mesh.faces.len()
}

/// Remove repeated faces.
///
/// A face listed twice with the same winding keeps one copy. A face paired
/// with its reverse is a zero-thickness fin and both copies go.
/// Returns the number of faces removed.
pub fn remove_duplicate_faces(mesh: &mut Mesh) -> usize {
    // sorted indices -> (first face, its rotation, same-winding count, reversed count)
    let mut seen: HashMap<[usize; 3], (usize, [usize; 3], usize, usize)> = HashMap::new();
    for (i, face) in mesh.faces.iter().enumerate() {
        let mut key = *face;
        key.sort_unstable();
        let entry = seen.entry(key).or_insert((i, canonical(face), 0, 0));
        if canonical(face) == entry.1 {
            entry.2 += 1;
        } else {
            entry.3 += 1;
        }
    }
    if seen.len() == mesh.faces.len() {
        return 0;
    }

    let before = mesh.faces.len();
    let mut faces = Vec::with_capacity(seen.len());
    for (i, face) in mesh.faces.iter().enumerate() {
        let mut key = *face;
        key.sort_unstable();
        let Some(&(first, _, same, reversed)) = seen.get(&key) else {
            continue;
        };
        // opposite copies cancel pairwise; whatever is left keeps one face
        if first == i && same != reversed {
            faces.push(if same > reversed { *face } else { reverse(face) });
        }
    }
    mesh.faces = faces;
    before - mesh.faces.len()
}

/// Remove every face that uses an edge shared by more than two faces.
///
/// Removing faces only lowers edge use counts, so a single pass leaves no
/// non-manifold edge behind; the edges around the removed faces become
/// boundary edges instead. Returns the number of faces removed.
pub fn remove_non_manifold_faces(mesh: &mut Mesh) -> usize {
    let uses = edge_uses(mesh);
    let overused = |a: usize, b: usize| {
        uses.get(&(a.min(b), a.max(b)))
            .is_some_and(|&(forward, backward)| forward + backward > 2)
    };
    let before = mesh.faces.len();
    mesh.faces
        .retain(|&[a, b, c]| !(overused(a, b) || overused(b, c) || overused(c, a)));
    before - mesh.faces.len()
}

/// Rotation of `face` that starts at its smallest index.
fn canonical(face: &[usize; 3]) -> [usize; 3] {
    let start = (0..3).min_by_key(|&i| face[i]).unwrap_or(0);
    [face[start], face[(start + 1) % 3], face[(start + 2) % 3]]
}

fn reverse(face: &[usize; 3]) -> [usize; 3] {
    [face[0], face[2], face[1]]
}

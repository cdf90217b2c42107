//! User-controlled normal direction.
//!
//! Which side of a level set counts as solid is a property of the design,
//! not of the mesh, so the extracted surface may come out inside-out. The
//! flag travels with every run and is applied to each freshly built mesh,
//! before clipping.

use crate::float_types::Real;
use crate::mesh::Mesh;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Persistent "flip normals" setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalOrientation {
    flipped: bool,
}

impl NormalOrientation {
    pub const fn new(flipped: bool) -> Self {
        NormalOrientation { flipped }
    }

    pub const fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub const fn toggle(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn apply(&self, mesh: &mut Mesh) {
        if self.flipped {
            mesh.flip();
        }
    }

    pub fn applied(&self, mut mesh: Mesh) -> Mesh {
        self.apply(&mut mesh);
        mesh
    }
}

/// Fraction of faces whose normal points away from `reference`.
///
/// Faces within a hair of `reference`, and degenerate faces, are not counted.
/// Returns `None` when no face can be judged.
pub fn outward_fraction(mesh: &Mesh, reference: &Point3<Real>) -> Option<Real> {
    let mut outward = 0usize;
    let mut judged = 0usize;
    for (normal, centroid) in mesh.face_normals().iter().zip(mesh.face_centroids()) {
        let dot = normal.dot(&(centroid - reference));
        if dot.abs() <= Real::EPSILON || normal.norm_squared() == 0.0 {
            continue;
        }
        judged += 1;
        if dot > 0.0 {
            outward += 1;
        }
    }
    (judged > 0).then(|| outward as Real / judged as Real)
}

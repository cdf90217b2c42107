//! Isosurface extraction from sampled fields.
//!
//! Extractors follow the "descent" convention: the solid is the region where
//! the field exceeds the isovalue, and faces and vertex normals point towards
//! decreasing field values.

pub mod marching_cubes;
mod tables;

#[cfg(feature = "surface-nets")]
pub mod surface_nets;

pub use marching_cubes::MarchingCubes;

#[cfg(feature = "surface-nets")]
pub use surface_nets::SurfaceNets;

use crate::field::ScalarField;
use crate::float_types::Real;
use crate::grid::SampleGrid;
use crate::mesh::Mesh;

/// Turns a scalar field and an isovalue into a triangle mesh with vertex
/// normals.
pub trait IsosurfaceExtractor {
    /// Triangulate `field = level`.
    ///
    /// Vertex positions are grid indices scaled by the field's spacing, so
    /// sample `(0, 0, 0)` sits at the origin. An isovalue outside the sampled
    /// range yields an empty mesh.
    fn extract(&self, field: &ScalarField, level: Real) -> Mesh;

    /// [`extract`](IsosurfaceExtractor::extract) and shift the result from
    /// grid-index space back onto the design origin.
    fn extract_centred(&self, field: &ScalarField, level: Real, grid: &SampleGrid) -> Mesh {
        let mut mesh = self.extract(field, level);
        recenter(&mut mesh, grid);
        mesh
    }
}

/// Subtract `box / 2 + tolerance` from every vertex.
pub fn recenter(mesh: &mut Mesh, grid: &SampleGrid) {
    mesh.translate(&-grid.half_extent);
}

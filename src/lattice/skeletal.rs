//! Network lattices: the solid side of a single level set.

use crate::field::ScalarField;
use crate::grid::SampleGrid;
use crate::isosurface::IsosurfaceExtractor;
use crate::mesh::Mesh;

/// Extract the zero level set of a field that already has `C` subtracted.
pub fn build_skeletal<E>(extractor: &E, field: &ScalarField, grid: &SampleGrid) -> Mesh
where
    E: IsosurfaceExtractor + ?Sized,
{
    let mesh = extractor.extract_centred(field, 0.0, grid);
    log::debug!(
        "skeletal surface: {} vertices, {} faces",
        mesh.vertex_count(),
        mesh.face_count()
    );
    mesh
}

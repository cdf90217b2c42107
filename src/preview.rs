//! Quick look at a design before refinement: no padding, no clipping.

use crate::design::DesignParameters;
use crate::errors::Result;
use crate::field::FieldEvaluator;
use crate::float_types::Real;
use crate::grid::GridBuilder;
use crate::isosurface::{IsosurfaceExtractor, MarchingCubes};
use crate::lattice::{LatticeSurface, MeshStrategy};
use crate::mesh::Mesh;
use crate::orientation::NormalOrientation;
use nalgebra::Point3;

#[derive(Debug, Clone)]
pub struct Preview {
    /// Unpadded lattice with the orientation flag applied.
    pub mesh: Mesh,
    /// Raw vertex cloud, both shell walls included.
    pub vertices: Vec<Point3<Real>>,
    /// Per-vertex scalar `x·y·z`, used to tint the cloud.
    pub colors: Vec<Real>,
}

/// [`preview_with`] using marching cubes.
pub fn preview(params: &DesignParameters, orientation: NormalOrientation) -> Result<Preview> {
    preview_with(&MarchingCubes, params, orientation)
}

pub fn preview_with<E>(extractor: &E, params: &DesignParameters, orientation: NormalOrientation) -> Result<Preview>
where
    E: IsosurfaceExtractor + ?Sized,
{
    params.validate()?;

    let grid = GridBuilder::new(params).build(0);
    let field = FieldEvaluator::new(params).evaluate(&grid);
    let LatticeSurface { mut mesh, vertices } =
        MeshStrategy::for_design(params).build_surface(extractor, &field, &grid);
    orientation.apply(&mut mesh);

    let colors = vertices.iter().map(|p| p.x * p.y * p.z).collect();
    log::debug!(
        "preview of {}: {} vertices, {} faces",
        params.tpms_variant,
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(Preview {
        mesh,
        vertices,
        colors,
    })
}

//! Sheet lattices: two parallel offsets of the zero surface.

use crate::field::ScalarField;
use crate::float_types::Real;
use crate::grid::SampleGrid;
use crate::isosurface::IsosurfaceExtractor;
use crate::mesh::Mesh;
use nalgebra::Point3;

/// Output of [`build_shell`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShellMesh {
    /// Both walls, positive wall first, negative wall flipped.
    pub mesh: Mesh,
    /// Concatenated vertex positions of both walls, before any welding.
    pub vertices: Vec<Point3<Real>>,
    /// Number of leading vertices that belong to the `+level` wall.
    pub positive_vertex_count: usize,
}

impl ShellMesh {
    /// Vertices of the `+level` and `−level` walls.
    pub fn split_vertices(&self) -> (&[Point3<Real>], &[Point3<Real>]) {
        self.vertices.split_at(self.positive_vertex_count)
    }
}

/// Extract the walls at `+level` and `−level` and join them into one mesh.
///
/// The `−level` wall faces the wrong way after extraction (its solid side is
/// outside the sheet), so its winding and normals are reversed before the two
/// are concatenated. Vertices are not merged across walls.
pub fn build_shell<E>(extractor: &E, field: &ScalarField, grid: &SampleGrid, level: Real) -> ShellMesh
where
    E: IsosurfaceExtractor + ?Sized,
{
    let outer = extractor.extract_centred(field, level, grid);
    let mut inner = extractor.extract_centred(field, -level, grid);
    inner.flip();

    log::debug!(
        "shell walls: {} + {} vertices at level ±{level}",
        outer.vertex_count(),
        inner.vertex_count()
    );

    let positive_vertex_count = outer.vertex_count();
    let mesh = Mesh::concatenate(&[outer, inner]);
    ShellMesh {
        vertices: mesh.vertices.clone(),
        positive_vertex_count,
        mesh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::DesignParameters;
    use crate::field::FieldEvaluator;
    use crate::grid::GridBuilder;
    use crate::isosurface::MarchingCubes;
    use crate::tpms::TpmsVariant;
    use nalgebra::Vector3;

    fn gyroid_shell() -> (ScalarField, SampleGrid, Real) {
        let params = DesignParameters::shell(TpmsVariant::Gyroid)
            .with_bounding_box(Vector3::repeat(10.0))
            .with_unit_cell(Vector3::repeat(10.0))
            .with_resolution(20);
        let grid = GridBuilder::new(&params).build(1);
        let field = FieldEvaluator::new(&params).evaluate(&grid);
        (field, grid, params.shell_level())
    }

    #[test]
    fn negative_wall_is_reversed_copy_of_plain_extraction() {
        let (field, grid, level) = gyroid_shell();
        let shell = build_shell(&MarchingCubes, &field, &grid, level);
        let plain = MarchingCubes.extract_centred(&field, -level, &grid);

        let (pos, neg) = shell.split_vertices();
        assert_eq!(neg.len(), plain.vertex_count());
        assert_eq!(pos.len() + neg.len(), shell.mesh.vertex_count());

        let normals = shell.mesh.normals.as_ref().unwrap();
        let plain_normals = plain.normals.as_ref().unwrap();
        for (n, m) in normals[pos.len()..].iter().zip(plain_normals) {
            assert!((n + m).norm() < 1e-12);
        }
    }

    #[test]
    fn walls_are_not_welded() {
        let (field, grid, level) = gyroid_shell();
        let shell = build_shell(&MarchingCubes, &field, &grid, level);
        let offset = shell.positive_vertex_count;
        assert!(
            shell.mesh.faces.iter().all(|f| {
                let in_outer = f.iter().all(|&i| i < offset);
                let in_inner = f.iter().all(|&i| i >= offset);
                in_outer || in_inner
            })
        );
    }
}

//! Surface nets extraction backed by `fast-surface-nets`.

use super::IsosurfaceExtractor;
use crate::field::ScalarField;
use crate::float_types::Real;
use crate::mesh::Mesh;
use fast_surface_nets::{SurfaceNetsBuffer, surface_nets};
use nalgebra::{Point3, Vector3};

/// Dual-contouring style extractor: one vertex per crossed cell, smoother
/// and lighter than [`MarchingCubes`](super::MarchingCubes) but with
/// vertices off the grid edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceNets;

impl IsosurfaceExtractor for SurfaceNets {
    fn extract(&self, field: &ScalarField, level: Real) -> Mesh {
        let [nx, ny, nz] = field.dims();
        if nx < 2 || ny < 2 || nz < 2 || !field.has_crossing(level) {
            log::warn!("Isovalue {level} does not cross the sampled field, surface is empty");
            return Mesh {
                normals: Some(Vec::new()),
                ..Mesh::new()
            };
        }

        // surface nets treats negative samples as inside
        let sdf: Vec<f32> = field
            .values
            .iter()
            .map(|&v| {
                let d = level - v;
                if d.is_finite() { d as f32 } else { 1e10_f32 }
            })
            .collect();

        let mut buffer = SurfaceNetsBuffer::default();
        surface_nets(
            &sdf,
            &field.shape,
            [0, 0, 0],
            [field.shape.nx - 1, field.shape.ny - 1, field.shape.nz - 1],
            &mut buffer,
        );

        let spacing = field.spacing;
        let vertices: Vec<Point3<Real>> = buffer
            .positions
            .iter()
            .map(|p| {
                Point3::new(
                    p[0] as Real * spacing.x,
                    p[1] as Real * spacing.y,
                    p[2] as Real * spacing.z,
                )
            })
            .collect();
        let normals: Vec<Vector3<Real>> = buffer
            .normals
            .iter()
            .map(|n| {
                Vector3::new(n[0] as Real, n[1] as Real, n[2] as Real)
                    .try_normalize(Real::EPSILON)
                    .unwrap_or_else(Vector3::zeros)
            })
            .collect();

        // keep each face wound with the sdf gradient, which points down the field
        let faces = buffer
            .indices
            .chunks_exact(3)
            .map(|tri| {
                let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
                let cross = (vertices[b] - vertices[a]).cross(&(vertices[c] - vertices[a]));
                if cross.dot(&(normals[a] + normals[b] + normals[c])) < 0.0 {
                    [a, c, b]
                } else {
                    [a, b, c]
                }
            })
            .collect();

        Mesh {
            vertices,
            faces,
            normals: Some(normals),
        }
    }
}

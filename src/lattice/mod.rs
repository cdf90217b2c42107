//! Turning a sampled field into lattice geometry, one strategy per design
//! family.

pub mod shell;
pub mod skeletal;

pub use shell::{ShellMesh, build_shell};
pub use skeletal::build_skeletal;

use crate::boolean::{BooleanKernel, BooleanOp};
use crate::design::DesignParameters;
use crate::errors::Result;
use crate::field::ScalarField;
use crate::float_types::Real;
use crate::grid::SampleGrid;
use crate::isosurface::IsosurfaceExtractor;
use crate::mesh::Mesh;
use crate::mesh::shapes::cuboid;
use crate::tpms::Family;
use nalgebra::{Point3, Vector3};

/// How a family is meshed and how the result is trimmed to the design box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshStrategy {
    /// Two walls at `±level`, kept where they fall inside the box.
    Shell { level: Real },
    /// One surface at level zero, with everything between the box and a box
    /// twice its size cut away.
    Skeletal,
}

/// Mesh produced by a [`MeshStrategy`], with the raw vertex cloud the
/// front ends use for colouring.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeSurface {
    pub mesh: Mesh,
    pub vertices: Vec<Point3<Real>>,
}

impl MeshStrategy {
    pub fn for_design(params: &DesignParameters) -> Self {
        match params.family() {
            Family::Shell => MeshStrategy::Shell {
                level: params.shell_level(),
            },
            Family::Skeletal => MeshStrategy::Skeletal,
        }
    }

    pub const fn family(&self) -> Family {
        match self {
            MeshStrategy::Shell { .. } => Family::Shell,
            MeshStrategy::Skeletal => Family::Skeletal,
        }
    }

    pub fn build_surface<E>(&self, extractor: &E, field: &ScalarField, grid: &SampleGrid) -> LatticeSurface
    where
        E: IsosurfaceExtractor + ?Sized,
    {
        match *self {
            MeshStrategy::Shell { level } => {
                let ShellMesh { mesh, vertices, .. } = build_shell(extractor, field, grid, level);
                LatticeSurface { mesh, vertices }
            },
            MeshStrategy::Skeletal => {
                let mesh = build_skeletal(extractor, field, grid);
                LatticeSurface {
                    vertices: mesh.vertices.clone(),
                    mesh,
                }
            },
        }
    }

    pub fn build_mesh<E>(&self, extractor: &E, field: &ScalarField, grid: &SampleGrid) -> Mesh
    where
        E: IsosurfaceExtractor + ?Sized,
    {
        match *self {
            MeshStrategy::Shell { level } => build_shell(extractor, field, grid, level).mesh,
            MeshStrategy::Skeletal => build_skeletal(extractor, field, grid),
        }
    }

    /// The operation and operand that trim a lattice to a box of `size`
    /// centred on the origin.
    ///
    /// For skeletal designs the operand is itself a boolean result, so the
    /// kernel is consulted once here and its failure is returned.
    pub fn clip_operation<K>(&self, kernel: &K, size: &Vector3<Real>) -> Result<(BooleanOp, Mesh)>
    where
        K: BooleanKernel + ?Sized,
    {
        match self {
            MeshStrategy::Shell { .. } => Ok((BooleanOp::Intersection, cuboid(size))),
            MeshStrategy::Skeletal => {
                let frame = kernel.difference(&cuboid(&(size * 2.0)), &cuboid(size))?;
                Ok((BooleanOp::Difference, frame))
            },
        }
    }
}

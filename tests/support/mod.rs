//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use nalgebra::{Point3, Vector3};
use std::cell::{Cell, RefCell};
use tpmsgen::{
    BooleanKernel, DesignParameters, Mesh, TpmsVariant,
    errors::{Result, TpmsError},
    float_types::Real,
    mesh::{polygon::Polygon, vertex::Vertex},
};

/// Returns the approximate bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// of a mesh's vertices.
pub fn bounding_box(mesh: &Mesh) -> [Real; 6] {
    let bb = mesh.bounding_box();
    [bb.mins.x, bb.mins.y, bb.mins.z, bb.maxs.x, bb.maxs.y, bb.maxs.z]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Helper to make a simple Polygon in 3D with given vertices.
pub fn make_polygon_3d(points: &[[Real; 3]]) -> Polygon {
    let verts = points
        .iter()
        .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::z()))
        .collect();
    Polygon::new(verts).expect("non-degenerate polygon")
}

/// A cheap shell design: one 10 mm cell at the minimum resolution.
pub fn small_shell(variant: TpmsVariant) -> DesignParameters {
    DesignParameters::shell(variant)
        .with_bounding_box(Vector3::repeat(10.0))
        .with_unit_cell(Vector3::repeat(10.0))
        .with_resolution(20)
        .with_thickness(1.0)
}

/// A cheap skeletal design: one 10 mm cell at the minimum resolution.
pub fn small_skeletal(variant: TpmsVariant) -> DesignParameters {
    DesignParameters::skeletal(variant)
        .with_bounding_box(Vector3::repeat(10.0))
        .with_unit_cell(Vector3::repeat(10.0))
        .with_resolution(20)
}

/// What a [`ScriptedKernel`] saw in one clip call.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipCall {
    pub operation: &'static str,
    pub faces: usize,
    pub signed_volume: Real,
    pub first_face: Option<[usize; 3]>,
}

/// A [`BooleanKernel`] that returns its first operand unchanged and answers
/// watertightness queries from a script.
///
/// Queries past the end of the script answer `false`.
#[derive(Default)]
pub struct ScriptedKernel {
    pub watertight: Vec<bool>,
    /// Fail the clip call with this (zero-based) index.
    pub fail_clip_at: Option<usize>,
    /// Fail every hole-filling call.
    pub fail_fill: bool,
    pub clips: RefCell<Vec<ClipCall>>,
    pub queries: Cell<usize>,
    pub fills: Cell<usize>,
    pub differences_for_setup: Cell<usize>,
}

impl ScriptedKernel {
    pub fn answering(watertight: &[bool]) -> Self {
        ScriptedKernel {
            watertight: watertight.to_vec(),
            ..ScriptedKernel::default()
        }
    }

    fn clip(&self, operation: &'static str, a: &Mesh) -> Result<Mesh> {
        let index = self.clips.borrow().len();
        self.clips.borrow_mut().push(ClipCall {
            operation,
            faces: a.face_count(),
            signed_volume: a.signed_volume(),
            first_face: a.faces.first().copied(),
        });
        if self.fail_clip_at == Some(index) {
            return Err(TpmsError::BooleanKernelFailure {
                operation,
                reason: "scripted failure".to_owned(),
            });
        }
        Ok(a.clone())
    }
}

impl BooleanKernel for ScriptedKernel {
    fn intersection(&self, a: &Mesh, _b: &Mesh) -> Result<Mesh> {
        self.clip("intersection", a)
    }

    fn difference(&self, a: &Mesh, b: &Mesh) -> Result<Mesh> {
        // the first difference builds the skeletal bounding frame
        if self.differences_for_setup.get() == 0 && a.face_count() == 12 && b.face_count() == 12 {
            self.differences_for_setup.set(1);
            return Ok(a.clone());
        }
        self.clip("difference", a)
    }

    fn is_watertight(&self, _mesh: &Mesh) -> bool {
        let i = self.queries.get();
        self.queries.set(i + 1);
        self.watertight.get(i).copied().unwrap_or(false)
    }

    fn fill_holes(&self, mesh: &Mesh) -> Result<Mesh> {
        self.fills.set(self.fills.get() + 1);
        if self.fail_fill {
            return Err(TpmsError::BooleanKernelFailure {
                operation: "fill_holes",
                reason: "scripted failure".to_owned(),
            });
        }
        Ok(mesh.clone())
    }
}

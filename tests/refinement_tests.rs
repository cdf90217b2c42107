mod support;

use approx::assert_relative_eq;
use tpmsgen::{
    BooleanKernel, CancellationToken, FieldEvaluator, GridBuilder, MarchingCubes, MeshStatus,
    MeshStrategy, NormalOrientation, RefinementLoop, RunConfig, TpmsVariant,
    errors::{Result, TpmsError},
    mesh::Mesh,
};

use crate::support::{ScriptedKernel, small_shell, small_skeletal};

#[test]
fn leaky_mesh_exhausts_the_schedule() {
    let kernel = ScriptedKernel::answering(&[]);
    let params = small_shell(TpmsVariant::Gyroid);
    let outcome = RefinementLoop::new(&kernel).run(&params, RunConfig::default()).unwrap();

    assert_eq!(outcome.status, MeshStatus::BestEffort);
    assert!(!outcome.is_watertight());
    // resolution 20: k = 1, 2, ..., 9
    let ks: Vec<usize> = outcome.passes.iter().map(|p| p.k).collect();
    assert_eq!(ks, (1..=9).collect::<Vec<_>>());
    assert_eq!(outcome.final_state.k, 10);
    assert!(!outcome.final_state.is_watertight);

    assert_eq!(kernel.fills.get(), 9);
    assert_eq!(kernel.queries.get(), 18);
    let clips = kernel.clips.borrow();
    assert_eq!(clips.len(), 9);
    assert!(clips.iter().all(|c| c.operation == "intersection"));
    assert!(outcome.passes.iter().all(|p| p.holes_filled && !p.is_watertight));
    assert!(!outcome.mesh.is_empty());
}

#[test]
fn stops_on_the_first_closed_pass() {
    // pass 1 leaks even after filling, pass 2 closes
    let kernel = ScriptedKernel::answering(&[false, false, true]);
    let params = small_shell(TpmsVariant::Diamond);
    let outcome = RefinementLoop::new(&kernel).run(&params, RunConfig::default()).unwrap();

    assert_eq!(outcome.status, MeshStatus::Watertight);
    assert_eq!(outcome.passes.len(), 2);
    assert_eq!(outcome.passes[0].k, 1);
    assert!(outcome.passes[0].holes_filled);
    assert!(!outcome.passes[0].is_watertight);
    assert_eq!(outcome.passes[1].k, 2);
    assert!(!outcome.passes[1].holes_filled);
    assert!(outcome.passes[1].is_watertight);
    assert_eq!(kernel.fills.get(), 1);
    assert_eq!(outcome.final_state.k, 3);
}

#[test]
fn hole_filling_can_close_a_pass() {
    let kernel = ScriptedKernel::answering(&[false, true]);
    let params = small_shell(TpmsVariant::SplitP);
    let outcome = RefinementLoop::new(&kernel).run(&params, RunConfig::default()).unwrap();

    assert!(outcome.is_watertight());
    assert_eq!(outcome.passes.len(), 1);
    assert!(outcome.passes[0].holes_filled);
    assert!(outcome.passes[0].is_watertight);
    assert_eq!(kernel.fills.get(), 1);
    assert_eq!(kernel.clips.borrow().len(), 1);
}

#[test]
fn triangle_counts_are_reported_per_pass() {
    let kernel = ScriptedKernel::answering(&[false, false, true]);
    let params = small_shell(TpmsVariant::Schwarz);
    let outcome = RefinementLoop::new(&kernel).run(&params, RunConfig::default()).unwrap();

    let clips = kernel.clips.borrow();
    for (pass, clip) in outcome.passes.iter().zip(clips.iter()) {
        assert_eq!(pass.triangles_before, clip.faces);
        // the scripted kernel clips nothing away
        assert_eq!(pass.triangles_after, clip.faces);
    }
    assert!(outcome.passes[1].triangles_before > outcome.passes[0].triangles_before);
}

#[test]
fn flip_is_applied_before_clipping() {
    let params = small_shell(TpmsVariant::Gyroid);

    let plain = ScriptedKernel::answering(&[true]);
    RefinementLoop::new(&plain).run(&params, RunConfig::default()).unwrap();
    let flipped = ScriptedKernel::answering(&[true]);
    let config = RunConfig::default().with_orientation(NormalOrientation::new(true));
    RefinementLoop::new(&flipped).run(&params, config).unwrap();

    let plain_clips = plain.clips.borrow();
    let flipped_clips = flipped.clips.borrow();
    let (plain, flipped) = (&plain_clips[0], &flipped_clips[0]);
    assert_eq!(plain.faces, flipped.faces);
    assert_relative_eq!(plain.signed_volume, -flipped.signed_volume);

    let grid = GridBuilder::new(&params).build(1);
    let field = FieldEvaluator::new(&params).evaluate(&grid);
    let expected = MeshStrategy::for_design(&params)
        .build_mesh(&MarchingCubes, &field, &grid)
        .flipped();
    assert_eq!(flipped.first_face, expected.faces.first().copied());
}

#[test]
fn skeletal_designs_clip_with_the_frame() {
    let kernel = ScriptedKernel::answering(&[true]);
    let params = small_skeletal(TpmsVariant::SchwarzPrimitive);
    let outcome = RefinementLoop::new(&kernel).run(&params, RunConfig::default()).unwrap();

    assert!(outcome.is_watertight());
    assert_eq!(kernel.differences_for_setup.get(), 1);
    let clips = kernel.clips.borrow();
    assert_eq!(clips.len(), 1);
    assert_eq!(clips[0].operation, "difference");
}

#[test]
fn invalid_parameters_fail_before_any_work() {
    let kernel = ScriptedKernel::answering(&[true]);
    let params = small_shell(TpmsVariant::Gyroid).with_resolution(10);
    let err = RefinementLoop::new(&kernel).run(&params, RunConfig::default()).unwrap_err();

    assert!(matches!(err, TpmsError::InvalidParameters { field: "mesh_resolution", .. }));
    assert!(kernel.clips.borrow().is_empty());
    assert_eq!(kernel.queries.get(), 0);
}

#[test]
fn kernel_errors_abort_the_run() {
    let mut kernel = ScriptedKernel::answering(&[]);
    kernel.fail_clip_at = Some(1);
    let params = small_shell(TpmsVariant::Lidinoid);
    let err = RefinementLoop::new(&kernel).run(&params, RunConfig::default()).unwrap_err();
    assert!(matches!(err, TpmsError::BooleanKernelFailure { operation: "intersection", .. }));
    assert_eq!(kernel.clips.borrow().len(), 2);
    assert_eq!(kernel.fills.get(), 1);

    let mut kernel = ScriptedKernel::answering(&[]);
    kernel.fail_fill = true;
    let err = RefinementLoop::new(&kernel).run(&params, RunConfig::default()).unwrap_err();
    assert!(matches!(err, TpmsError::BooleanKernelFailure { operation: "fill_holes", .. }));
    assert_eq!(kernel.clips.borrow().len(), 1);
}

#[test]
fn cancelled_before_start_does_nothing() {
    let kernel = ScriptedKernel::answering(&[]);
    let token = CancellationToken::new();
    token.cancel();
    let config = RunConfig::default().with_cancellation(token);
    let err = RefinementLoop::new(&kernel)
        .run(&small_shell(TpmsVariant::Gyroid), config)
        .unwrap_err();

    assert!(matches!(err, TpmsError::Cancelled { passes_completed: 0 }));
    assert!(kernel.clips.borrow().is_empty());
}

/// Sets the token once the wrapped kernel has filled holes `after` times.
struct CancellingKernel {
    inner: ScriptedKernel,
    token: CancellationToken,
    after: usize,
}

impl BooleanKernel for CancellingKernel {
    fn intersection(&self, a: &Mesh, b: &Mesh) -> Result<Mesh> {
        self.inner.intersection(a, b)
    }

    fn difference(&self, a: &Mesh, b: &Mesh) -> Result<Mesh> {
        self.inner.difference(a, b)
    }

    fn is_watertight(&self, mesh: &Mesh) -> bool {
        self.inner.is_watertight(mesh)
    }

    fn fill_holes(&self, mesh: &Mesh) -> Result<Mesh> {
        let filled = self.inner.fill_holes(mesh)?;
        if self.inner.fills.get() == self.after {
            self.token.cancel();
        }
        Ok(filled)
    }
}

#[test]
fn cancellation_is_observed_between_passes() {
    let token = CancellationToken::new();
    let kernel = CancellingKernel {
        inner: ScriptedKernel::answering(&[]),
        token: token.clone(),
        after: 2,
    };
    let config = RunConfig::default().with_cancellation(token);
    let err = RefinementLoop::new(&kernel)
        .run(&small_shell(TpmsVariant::Gyroid), config)
        .unwrap_err();

    // the second pass still finishes; the third never starts
    assert!(matches!(err, TpmsError::Cancelled { passes_completed: 2 }));
    assert_eq!(kernel.inner.clips.borrow().len(), 2);
}

#[test]
fn loop_accepts_a_trait_object() {
    let kernel = ScriptedKernel::answering(&[true]);
    let dynamic: &dyn BooleanKernel = &kernel;
    let outcome = RefinementLoop::new(dynamic)
        .run(&small_shell(TpmsVariant::Gyroid), RunConfig::default())
        .unwrap();
    assert!(outcome.is_watertight());
}

#[cfg(feature = "surface-nets")]
#[test]
fn surface_nets_extractor_drives_the_same_loop() {
    use tpmsgen::isosurface::SurfaceNets;

    let kernel = ScriptedKernel::answering(&[false, true]);
    let outcome = RefinementLoop::with_extractor(&kernel, SurfaceNets)
        .run(&small_shell(TpmsVariant::Gyroid), RunConfig::default())
        .unwrap();
    assert!(outcome.is_watertight());
    assert_eq!(outcome.passes.len(), 1);
    assert!(outcome.passes[0].triangles_before > 0);
}

#[test]
fn status_messages_are_user_facing() {
    assert!(MeshStatus::Watertight.message().starts_with("The obtained mesh is watertight."));
    assert_eq!(
        MeshStatus::BestEffort.message(),
        "Cannot obtain a watertight mesh. Try increasing unit cell mesh resolution."
    );
}

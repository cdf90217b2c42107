//! The bounded clip-and-check loop that turns a periodic lattice into a
//! closed mesh trimmed to the design box.
//!
//! Each pass samples the field on a grid padded by `k` extra layers, meshes
//! it, clips it against the bounding solid and asks the kernel whether the
//! result is closed. A leaky result gets one hole-filling attempt. Padding
//! grows by `k_increment` per pass until the mesh closes or `k` passes
//! `k_max`; in the latter case the last mesh is returned as a best effort.

use crate::boolean::BooleanKernel;
use crate::design::DesignParameters;
use crate::errors::{Result, TpmsError};
use crate::field::FieldEvaluator;
use crate::grid::GridBuilder;
use crate::isosurface::{IsosurfaceExtractor, MarchingCubes};
use crate::lattice::MeshStrategy;
use crate::mesh::Mesh;
use crate::orientation::NormalOrientation;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Padding schedule and the watertight flag of the last pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationState {
    pub k: usize,
    pub k_max: usize,
    pub k_increment: usize,
    pub is_watertight: bool,
}

impl IterationState {
    /// Start at 5% of the resolution, step by 5%, stop after 45%.
    ///
    /// The step never drops below one layer.
    pub const fn for_resolution(mesh_resolution: usize) -> Self {
        let step = mesh_resolution * 5 / 100;
        IterationState {
            k: step,
            k_max: mesh_resolution * 45 / 100,
            k_increment: if step == 0 { 1 } else { step },
            is_watertight: false,
        }
    }

    pub const fn should_continue(&self) -> bool {
        !self.is_watertight && self.k <= self.k_max
    }

    /// Passes left if none of them closes the mesh.
    pub const fn max_passes(&self) -> usize {
        if self.k > self.k_max {
            0
        } else {
            (self.k_max - self.k) / self.k_increment + 1
        }
    }
}

/// Cooperative stop signal, checked between passes.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-run settings that are not part of the design itself.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub orientation: NormalOrientation,
    pub cancel: Option<CancellationToken>,
}

impl RunConfig {
    pub fn with_orientation(mut self, orientation: NormalOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshStatus {
    Watertight,
    /// Padding ran out before the mesh closed; the last pass is returned.
    BestEffort,
}

impl MeshStatus {
    /// Guidance shown to the user once a run finishes.
    pub const fn message(self) -> &'static str {
        match self {
            MeshStatus::Watertight => {
                "The obtained mesh is watertight. If the opposite solution was desired, try using the opposite face normals direction."
            },
            MeshStatus::BestEffort => {
                "Cannot obtain a watertight mesh. Try increasing unit cell mesh resolution."
            },
        }
    }
}

/// What happened in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    /// Padding the pass sampled with.
    pub k: usize,
    pub triangles_before: usize,
    pub triangles_after: usize,
    pub holes_filled: bool,
    pub is_watertight: bool,
}

#[derive(Debug, Clone)]
pub struct RefinementOutcome {
    pub mesh: Mesh,
    pub status: MeshStatus,
    pub passes: Vec<PassReport>,
    pub final_state: IterationState,
}

impl RefinementOutcome {
    pub const fn is_watertight(&self) -> bool {
        matches!(self.status, MeshStatus::Watertight)
    }
}

enum Phase {
    Sampling,
    Clipping { k: usize, mesh: Mesh },
    Checking { k: usize, triangles_before: usize, mesh: Mesh },
    Done,
}

/// Drives [`IterationState`] with a boolean kernel and an isosurface
/// extractor.
pub struct RefinementLoop<'k, K: BooleanKernel + ?Sized, E: IsosurfaceExtractor = MarchingCubes> {
    kernel: &'k K,
    extractor: E,
}

impl<'k, K: BooleanKernel + ?Sized> RefinementLoop<'k, K, MarchingCubes> {
    pub const fn new(kernel: &'k K) -> Self {
        RefinementLoop {
            kernel,
            extractor: MarchingCubes,
        }
    }
}

impl<'k, K: BooleanKernel + ?Sized, E: IsosurfaceExtractor> RefinementLoop<'k, K, E> {
    pub const fn with_extractor(kernel: &'k K, extractor: E) -> Self {
        RefinementLoop { kernel, extractor }
    }

    /// Run the loop to completion.
    ///
    /// Fails on invalid parameters before any sampling, on the first kernel
    /// error, or with [`TpmsError::Cancelled`] when the token is set between
    /// passes. A mesh that never closes is a successful
    /// [`MeshStatus::BestEffort`] outcome.
    pub fn run(&self, params: &DesignParameters, config: RunConfig) -> Result<RefinementOutcome> {
        params.validate()?;

        let strategy = MeshStrategy::for_design(params);
        let evaluator = FieldEvaluator::new(params);
        let grids = GridBuilder::new(params);
        let (op, solid) = strategy.clip_operation(self.kernel, &params.bounding_box_size)?;

        let mut state = IterationState::for_resolution(params.mesh_resolution);
        log::info!(
            "refining {} with k = {}..={} step {} ({} passes at most)",
            params.tpms_variant,
            state.k,
            state.k_max,
            state.k_increment,
            state.max_passes()
        );

        let mut passes: Vec<PassReport> = Vec::new();
        let mut latest = Mesh::new();
        let mut phase = Phase::Sampling;

        loop {
            phase = match phase {
                Phase::Sampling => {
                    if config.is_cancelled() {
                        log::info!("refinement cancelled after {} passes", passes.len());
                        return Err(TpmsError::Cancelled {
                            passes_completed: passes.len(),
                        });
                    }
                    let grid = grids.build(state.k);
                    let field = evaluator.evaluate(&grid);
                    let mut mesh = strategy.build_mesh(&self.extractor, &field, &grid);
                    config.orientation.apply(&mut mesh);
                    Phase::Clipping { k: state.k, mesh }
                },
                Phase::Clipping { k, mesh } => {
                    let clipped = self.kernel.apply(op, &mesh, &solid)?;
                    state.k += state.k_increment;
                    Phase::Checking {
                        k,
                        triangles_before: mesh.face_count(),
                        mesh: clipped,
                    }
                },
                Phase::Checking {
                    k,
                    triangles_before,
                    mesh,
                } => {
                    let mut is_watertight = self.kernel.is_watertight(&mesh);
                    let holes_filled = !is_watertight;
                    let mesh = if is_watertight {
                        mesh
                    } else {
                        let filled = self.kernel.fill_holes(&mesh)?;
                        is_watertight = self.kernel.is_watertight(&filled);
                        filled
                    };

                    let report = PassReport {
                        k,
                        triangles_before,
                        triangles_after: mesh.face_count(),
                        holes_filled,
                        is_watertight,
                    };
                    log::debug!("pass {}: {report:?}", passes.len() + 1);
                    passes.push(report);

                    state.is_watertight = is_watertight;
                    latest = mesh;
                    if state.should_continue() {
                        Phase::Sampling
                    } else {
                        Phase::Done
                    }
                },
                Phase::Done => break,
            };
        }

        let status = if state.is_watertight {
            log::info!("{}", MeshStatus::Watertight.message());
            MeshStatus::Watertight
        } else {
            log::warn!("{}", MeshStatus::BestEffort.message());
            MeshStatus::BestEffort
        };

        Ok(RefinementOutcome {
            mesh: latest,
            status,
            passes,
            final_state: state,
        })
    }
}

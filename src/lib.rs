//! Closed, print-ready triangle meshes of **triply periodic minimal surface**
//! (TPMS) lattices, trimmed to a rectangular design box.
//!
//! A design ([`DesignParameters`]) names one of ten level-set formulas, the
//! box it must fill, the unit cell it repeats with and a mesh resolution.
//! [`RefinementLoop`] samples the field, extracts an isosurface, clips it to
//! the box with a [`BooleanKernel`] and repeats with a wider sampling margin
//! until the clipped mesh is watertight or the margin budget runs out.
//!
//! ```no_run
//! use tpmsgen::{BspKernel, DesignParameters, RefinementLoop, RunConfig, TpmsVariant};
//!
//! # fn main() -> tpmsgen::errors::Result<()> {
//! let design = DesignParameters::shell(TpmsVariant::Gyroid).with_thickness(1.0);
//! let outcome = RefinementLoop::new(&BspKernel::new()).run(&design, RunConfig::default())?;
//! tpmsgen::io::export_stl_file(&outcome.mesh, "gyroid", ".")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//! #### Default
//! - **surface-nets**: [`SurfaceNets`](isosurface::SurfaceNets) extractor using
//!   [fast-surface-nets](https://crates.io/crates/fast-surface-nets)
//! - **cli**: the `tpmsgen` command line tool
//!
//! #### Optional
//! - **parallel**: use rayon for field evaluation and hashbrown/parry internals

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod boolean;
pub mod design;
pub mod errors;
pub mod field;
pub mod float_types;
pub mod grid;
pub mod io;
pub mod isosurface;
pub mod lattice;
pub mod mesh;
pub mod orientation;
pub mod preview;
pub mod refine;
pub mod tpms;

pub use boolean::{BooleanKernel, BooleanOp, BspKernel};
pub use design::DesignParameters;
pub use errors::TpmsError;
pub use field::{FieldEvaluator, ScalarField};
pub use grid::{GridBuilder, SampleGrid};
pub use isosurface::{IsosurfaceExtractor, MarchingCubes};
pub use lattice::MeshStrategy;
pub use mesh::Mesh;
pub use orientation::NormalOrientation;
pub use refine::{
    CancellationToken, IterationState, MeshStatus, PassReport, RefinementLoop, RefinementOutcome,
    RunConfig,
};
pub use tpms::{Family, TpmsVariant};

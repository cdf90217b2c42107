//! Mesh export.
//!
//! I/O failures surface as [`TpmsError::Io`](crate::errors::TpmsError::Io).

pub mod stl;

pub use stl::{export_stl_file, read_stl, to_stl_ascii, to_stl_binary};

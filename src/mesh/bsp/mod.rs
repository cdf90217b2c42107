//! [BSP](https://en.wikipedia.org/wiki/Binary_space_partitioning) trees over convex polygons.
//!
//! All traversals use explicit stacks; clipped TPMS meshes produce trees far
//! deeper than the call stack tolerates.

mod node;

pub use node::{BalancedSplittingStrategy, Node};

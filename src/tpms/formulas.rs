//! Closed-form TPMS level-set expressions.
//!
//! Every expression is written in terms of the per-axis phase
//! `θ_i = w_i · (coord_i + origin_i)` with `w_i = 2π / cell_i`. Because the
//! sample grid is a tensor product of three 1D axes, the trigonometric terms
//! are separable: [`AxisTrig`] caches `sin θ`, `cos θ`, `sin 2θ` and `cos 2θ`
//! for one axis coordinate and the formulas only combine cached values.

use crate::float_types::Real;

/// Cached trigonometric terms of a single axis phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTrig {
    pub s1: Real,
    pub c1: Real,
    pub s2: Real,
    pub c2: Real,
}

impl AxisTrig {
    /// Terms for the phase `theta`.
    ///
    /// `sin 2θ` and `cos 2θ` are evaluated directly rather than through
    /// double-angle identities so the values match a plain `cos(2·w·x)`.
    pub fn new(theta: Real) -> Self {
        let (s1, c1) = theta.sin_cos();
        let (s2, c2) = (2.0 * theta).sin_cos();
        AxisTrig { s1, c1, s2, c2 }
    }
}

/// Schoen gyroid: `cos x sin y + cos y sin z + cos z sin x`
pub fn gyroid(x: &AxisTrig, y: &AxisTrig, z: &AxisTrig) -> Real {
    x.c1 * y.s1 + y.c1 * z.s1 + z.c1 * x.s1
}

/// Skeletal Schwarz diamond: `cos x cos y cos z + sin x sin y sin z`
pub fn schwarz_diamond(x: &AxisTrig, y: &AxisTrig, z: &AxisTrig) -> Real {
    x.c1 * y.c1 * z.c1 + x.s1 * y.s1 * z.s1
}

/// Schwarz primitive: `cos x + cos y + cos z`
pub fn schwarz_primitive(x: &AxisTrig, y: &AxisTrig, z: &AxisTrig) -> Real {
    x.c1 + y.c1 + z.c1
}

pub fn body_diagonals_with_nodes(x: &AxisTrig, y: &AxisTrig, z: &AxisTrig) -> Real {
    2.0 * (x.c1 * y.c1 + y.c1 * z.c1 + z.c1 * x.c1) - (x.c2 + y.c2 + z.c2)
}

/// Shell diamond, four-term sine/cosine form.
pub fn diamond(x: &AxisTrig, y: &AxisTrig, z: &AxisTrig) -> Real {
    x.s1 * y.s1 * z.s1 + x.s1 * y.c1 * z.c1 + x.c1 * y.s1 * z.c1 + x.c1 * y.c1 * z.s1
}

pub fn lidinoid(x: &AxisTrig, y: &AxisTrig, z: &AxisTrig) -> Real {
    x.s2 * y.c1 * z.s1 + x.s1 * y.s2 * z.c1 + x.c1 * y.s1 * z.s2
        - x.c2 * y.c2
        - y.c2 * z.c2
        - z.c2 * x.c2
        + 0.3
}

pub fn split_p(x: &AxisTrig, y: &AxisTrig, z: &AxisTrig) -> Real {
    1.1 * (x.s2 * y.c1 * z.s1 + x.s1 * y.s2 * z.c1 + x.c1 * y.s1 * z.s2)
        - 0.2 * (x.c2 * y.c2 + y.c2 * z.c2 + z.c2 * x.c2)
        - 0.4 * (x.c2 + y.c2 + z.c2)
}

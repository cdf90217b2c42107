//! Regular sample grids with boundary padding.

use crate::design::DesignParameters;
use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// Evenly spaced samples over `[start, stop]`, both ends included.
///
/// The last sample is pinned to `stop` so the padded extent is exact.
pub fn linspace(start: Real, stop: Real, count: usize) -> Vec<Real> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as Real;
            let mut values: Vec<Real> = (0..count).map(|i| start + i as Real * step).collect();
            values[count - 1] = stop;
            values
        },
    }
}

/// The tensor-product sample grid for one refinement step.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    /// Padding step this grid was built for
    pub k: usize,
    /// 1D sample coordinates per axis, ascending
    pub axes: [Vec<Real>; 3],
    /// Padding added on each side of the box, `k · cell / resolution`
    pub tolerances: Vector3<Real>,
    /// Voxel spacing per axis, the step between consecutive samples
    pub spacing: Vector3<Real>,
    /// `box / 2 + tolerance`, the shift that centres grid-index space on the
    /// design origin
    pub half_extent: Vector3<Real>,
}

impl SampleGrid {
    /// Sample counts `[nx, ny, nz]`.
    pub fn dims(&self) -> [usize; 3] {
        [self.axes[0].len(), self.axes[1].len(), self.axes[2].len()]
    }

    pub fn sample_count(&self) -> usize {
        self.dims().iter().product()
    }

    /// World position of sample `(ix, iy, iz)`.
    pub fn point(&self, ix: usize, iy: usize, iz: usize) -> Point3<Real> {
        Point3::new(self.axes[0][ix], self.axes[1][iy], self.axes[2][iz])
    }

    /// Lower and upper corner of the padded sampling region.
    pub fn padded_extent(&self) -> (Point3<Real>, Point3<Real>) {
        (Point3::from(-self.half_extent), Point3::from(self.half_extent))
    }

    /// Co-indexed `X`, `Y`, `Z` coordinate arrays in field order (x fastest).
    pub fn coordinate_grid(&self) -> [Vec<Real>; 3] {
        let [nx, ny, nz] = self.dims();
        let total = nx * ny * nz;
        let mut xs = Vec::with_capacity(total);
        let mut ys = Vec::with_capacity(total);
        let mut zs = Vec::with_capacity(total);
        for &z in &self.axes[2] {
            for &y in &self.axes[1] {
                for &x in &self.axes[0] {
                    xs.push(x);
                    ys.push(y);
                    zs.push(z);
                }
            }
        }
        [xs, ys, zs]
    }
}

/// Builds [`SampleGrid`]s for a fixed design.
#[derive(Debug, Clone)]
pub struct GridBuilder<'a> {
    params: &'a DesignParameters,
}

impl<'a> GridBuilder<'a> {
    pub const fn new(params: &'a DesignParameters) -> Self {
        GridBuilder { params }
    }

    /// Samples per axis at padding step `k`: `floor(box / cell) · res + 2k + 1`.
    pub fn samples_per_axis(&self, k: usize) -> [usize; 3] {
        let cells = self.params.cells_per_axis();
        let res = self.params.mesh_resolution;
        cells.map(|n| n * res + 2 * k + 1)
    }

    /// Per-axis padding `k · cell / res` at step `k`.
    pub fn tolerances(&self, k: usize) -> Vector3<Real> {
        let res = self.params.mesh_resolution as Real;
        self.params.unit_cell_size.map(|cell| k as Real * cell / res)
    }

    /// Grid at padding step `k`.
    pub fn build(&self, k: usize) -> SampleGrid {
        let tolerances = self.tolerances(k);
        let counts = self.samples_per_axis(k);
        let half_extent = self.params.bounding_box_size / 2.0 + tolerances;

        let axes: [Vec<Real>; 3] =
            std::array::from_fn(|i| linspace(-half_extent[i], half_extent[i], counts[i]));

        let spacing = Vector3::from_fn(|i, _| {
            let axis = &axes[i];
            if axis.len() > 1 { axis[1] - axis[0] } else { 0.0 }
        });

        SampleGrid {
            k,
            axes,
            tolerances,
            spacing,
            half_extent,
        }
    }
}

//! Sampled scalar fields and the TPMS field evaluator.

use crate::design::DesignParameters;
use crate::float_types::{Real, TAU};
use crate::grid::SampleGrid;
use crate::tpms::TpmsVariant;
use crate::tpms::formulas::AxisTrig;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Linear layout of a `nx × ny × nz` sample block, x varying fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub nx: u32,
    pub ny: u32,
    pub nz: u32,
}

impl GridShape {
    pub const fn new(dims: [usize; 3]) -> Self {
        GridShape {
            nx: dims[0] as u32,
            ny: dims[1] as u32,
            nz: dims[2] as u32,
        }
    }

    #[inline]
    pub const fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.ny as usize + y) * self.nx as usize + x
    }

    pub const fn len(&self) -> usize {
        self.nx as usize * self.ny as usize * self.nz as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(feature = "surface-nets")]
impl fast_surface_nets::ndshape::Shape<3> for GridShape {
    type Coord = u32;

    #[inline]
    fn as_array(&self) -> [Self::Coord; 3] {
        [self.nx, self.ny, self.nz]
    }

    fn size(&self) -> Self::Coord {
        self.nx * self.ny * self.nz
    }

    fn usize(&self) -> usize {
        (self.nx * self.ny * self.nz) as usize
    }

    fn linearize(&self, coords: [Self::Coord; 3]) -> u32 {
        let [x, y, z] = coords;
        (z * self.ny + y) * self.nx + x
    }

    fn delinearize(&self, i: u32) -> [Self::Coord; 3] {
        let x = i % self.nx;
        let yz = i / self.nx;
        let y = yz % self.ny;
        let z = yz / self.ny;
        [x, y, z]
    }
}

/// A 3D block of field samples with its voxel spacing.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    pub shape: GridShape,
    pub spacing: Vector3<Real>,
    pub values: Vec<Real>,
}

impl ScalarField {
    /// Wrap an existing sample buffer laid out x-fastest.
    ///
    /// Returns `None` when `values` does not match `dims`.
    pub fn from_values(dims: [usize; 3], spacing: Vector3<Real>, values: Vec<Real>) -> Option<Self> {
        let shape = GridShape::new(dims);
        (shape.len() == values.len()).then_some(ScalarField {
            shape,
            spacing,
            values,
        })
    }

    /// Sample `f` at every grid-index position scaled by `spacing`.
    pub fn from_fn(
        dims: [usize; 3],
        spacing: Vector3<Real>,
        f: impl Fn(Point3<Real>) -> Real,
    ) -> Self {
        let shape = GridShape::new(dims);
        let mut values = Vec::with_capacity(shape.len());
        for z in 0..dims[2] {
            for y in 0..dims[1] {
                for x in 0..dims[0] {
                    values.push(f(Point3::new(
                        x as Real * spacing.x,
                        y as Real * spacing.y,
                        z as Real * spacing.z,
                    )));
                }
            }
        }
        ScalarField {
            shape,
            spacing,
            values,
        }
    }

    pub fn dims(&self) -> [usize; 3] {
        [
            self.shape.nx as usize,
            self.shape.ny as usize,
            self.shape.nz as usize,
        ]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Real {
        self.values[self.shape.index(x, y, z)]
    }

    /// Smallest and largest sample, `None` for an empty field.
    pub fn range(&self) -> Option<(Real, Real)> {
        self.values.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Whether the surface `F = level` crosses the sampled block.
    pub fn has_crossing(&self, level: Real) -> bool {
        match self.range() {
            Some((lo, hi)) => (lo < level && level < hi) || lo == level || hi == level,
            None => false,
        }
    }
}

/// Evaluates a design's level-set function over a [`SampleGrid`].
///
/// The field is `formula(w · (p + origin)) − C` with `w_i = 2π / cell_i`.
#[derive(Debug, Clone, Copy)]
pub struct FieldEvaluator {
    variant: TpmsVariant,
    frequency: Vector3<Real>,
    origin: Vector3<Real>,
    level_c: Real,
}

impl FieldEvaluator {
    pub fn new(params: &DesignParameters) -> Self {
        if !params.tpms_variant.is_known() {
            log::warn!("Design not found in library, the field is identically zero");
        }
        FieldEvaluator {
            variant: params.tpms_variant,
            frequency: params.unit_cell_size.map(|cell| TAU / cell),
            origin: params.origin,
            level_c: params.effective_level_c(),
        }
    }

    pub const fn variant(&self) -> TpmsVariant {
        self.variant
    }

    /// Shell half-thickness scale of the evaluated design.
    pub const fn shell_scale(&self) -> Real {
        self.variant.shell_scale()
    }

    #[inline]
    fn axis_terms(&self, axis: usize, coord: Real) -> AxisTrig {
        AxisTrig::new(self.frequency[axis] * (coord + self.origin[axis]))
    }

    /// Field value at a single point.
    pub fn value_at(&self, p: &Point3<Real>) -> Real {
        if !self.variant.is_known() {
            return 0.0;
        }
        let x = self.axis_terms(0, p.x);
        let y = self.axis_terms(1, p.y);
        let z = self.axis_terms(2, p.z);
        self.variant.formula(&x, &y, &z) - self.level_c
    }

    /// Field over every sample of `grid`.
    ///
    /// The trigonometric terms are computed once per axis coordinate; the
    /// result is a pure function of the inputs.
    pub fn evaluate(&self, grid: &SampleGrid) -> ScalarField {
        let dims = grid.dims();
        let shape = GridShape::new(dims);

        if !self.variant.is_known() {
            return ScalarField {
                shape,
                spacing: grid.spacing,
                values: vec![0.0; shape.len()],
            };
        }

        let terms: [Vec<AxisTrig>; 3] = std::array::from_fn(|axis| {
            grid.axes[axis]
                .iter()
                .map(|&coord| self.axis_terms(axis, coord))
                .collect()
        });
        let [tx, ty, tz] = &terms;
        let slab = dims[0] * dims[1];
        let mut values = vec![0.0; shape.len()];

        let fill_slab = |(iz, chunk): (usize, &mut [Real])| {
            let z = &tz[iz];
            for (iy, y) in ty.iter().enumerate() {
                let row = &mut chunk[iy * dims[0]..(iy + 1) * dims[0]];
                for (value, x) in row.iter_mut().zip(tx) {
                    *value = self.variant.formula(x, y, z) - self.level_c;
                }
            }
        };

        if slab > 0 {
            #[cfg(not(feature = "parallel"))]
            values.chunks_mut(slab).enumerate().for_each(fill_slab);

            #[cfg(feature = "parallel")]
            values.par_chunks_mut(slab).enumerate().for_each(fill_slab);
        }

        ScalarField {
            shape,
            spacing: grid.spacing,
            values,
        }
    }
}

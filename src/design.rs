//! Design parameters of a lattice run and their validation.

use crate::errors::{Result, TpmsError};
use crate::float_types::{MM, Real};
use crate::tpms::{Family, TpmsVariant};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest accepted number of samples per unit cell and axis.
pub const MIN_MESH_RESOLUTION: usize = 20;

pub const DEFAULT_SIZE: Real = 40.0 * MM;
pub const DEFAULT_MESH_RESOLUTION: usize = 50;
pub const DEFAULT_THICKNESS: Real = 3.0 * MM;
pub const DEFAULT_LEVEL_C: Real = 0.5;

/// Everything needed to mesh one design.
///
/// Lengths are millimetres. The struct is plain data; call
/// [`DesignParameters::validate`] (the refinement loop does) before sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignParameters {
    pub tpms_variant: TpmsVariant,
    pub bounding_box_size: Vector3<Real>,
    pub unit_cell_size: Vector3<Real>,
    pub origin: Vector3<Real>,
    pub mesh_resolution: usize,
    /// Level shift `C`. Must be non-zero for skeletal designs; shell designs
    /// always use `0`.
    pub level_c: Real,
    /// Wall thickness of shell designs. Ignored for skeletal designs.
    pub thickness: Real,
}

impl Default for DesignParameters {
    fn default() -> Self {
        DesignParameters::shell(TpmsVariant::Gyroid)
    }
}

impl DesignParameters {
    /// Shell design with the default 40 mm box and cell.
    pub fn shell(variant: TpmsVariant) -> Self {
        DesignParameters {
            tpms_variant: variant,
            bounding_box_size: Vector3::repeat(DEFAULT_SIZE),
            unit_cell_size: Vector3::repeat(DEFAULT_SIZE),
            origin: Vector3::zeros(),
            mesh_resolution: DEFAULT_MESH_RESOLUTION,
            level_c: 0.0,
            thickness: DEFAULT_THICKNESS,
        }
    }

    /// Skeletal design with the default 40 mm box and cell and `C = 0.5`.
    pub fn skeletal(variant: TpmsVariant) -> Self {
        DesignParameters {
            level_c: DEFAULT_LEVEL_C,
            ..DesignParameters::shell(variant)
        }
    }

    pub fn with_bounding_box(mut self, size: Vector3<Real>) -> Self {
        self.bounding_box_size = size;
        self
    }

    pub fn with_unit_cell(mut self, size: Vector3<Real>) -> Self {
        self.unit_cell_size = size;
        self
    }

    pub fn with_origin(mut self, origin: Vector3<Real>) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_resolution(mut self, mesh_resolution: usize) -> Self {
        self.mesh_resolution = mesh_resolution;
        self
    }

    pub fn with_level_c(mut self, level_c: Real) -> Self {
        self.level_c = level_c;
        self
    }

    pub fn with_thickness(mut self, thickness: Real) -> Self {
        self.thickness = thickness;
        self
    }

    pub const fn family(&self) -> Family {
        self.tpms_variant.family()
    }

    /// The `C` actually applied to the field: always `0` for shell designs.
    pub fn effective_level_c(&self) -> Real {
        match self.family() {
            Family::Shell => 0.0,
            Family::Skeletal => self.level_c,
        }
    }

    /// Isolevel magnitude of the two shell walls, `thickness · t`.
    pub fn shell_level(&self) -> Real {
        self.thickness * self.tpms_variant.shell_scale()
    }

    /// Whole unit cells per axis, `floor(box / cell)`.
    pub fn cells_per_axis(&self) -> [usize; 3] {
        std::array::from_fn(|i| {
            (self.bounding_box_size[i] / self.unit_cell_size[i]).floor() as usize
        })
    }

    /// Check every parameter against its documented range.
    pub fn validate(&self) -> Result<()> {
        const AXES: [&str; 3] = ["x", "y", "z"];

        for (i, axis) in AXES.iter().enumerate() {
            let size = self.bounding_box_size[i];
            if !size.is_finite() || size <= 0.0 {
                return Err(TpmsError::invalid(
                    "bounding_box_size",
                    format!("{axis} extent must be positive, got {size}"),
                ));
            }

            let cell = self.unit_cell_size[i];
            if !cell.is_finite() || cell <= 0.0 {
                return Err(TpmsError::invalid(
                    "unit_cell_size",
                    format!("{axis} extent must be positive, got {cell}"),
                ));
            }
            if cell > size {
                return Err(TpmsError::invalid(
                    "unit_cell_size",
                    format!("{axis} unit cell ({cell}) is larger than the bounding box ({size})"),
                ));
            }

            if !self.origin[i].is_finite() {
                return Err(TpmsError::invalid("origin", format!("{axis} is not finite")));
            }
        }

        if self.mesh_resolution < MIN_MESH_RESOLUTION {
            return Err(TpmsError::invalid(
                "mesh_resolution",
                format!(
                    "must be at least {MIN_MESH_RESOLUTION}, got {}",
                    self.mesh_resolution
                ),
            ));
        }

        match self.family() {
            Family::Skeletal => {
                if !self.level_c.is_finite() || self.level_c == 0.0 {
                    return Err(TpmsError::invalid(
                        "level_c",
                        "C must be non-zero for skeletal designs",
                    ));
                }
            },
            Family::Shell => {
                if !self.thickness.is_finite() || self.thickness <= 0.0 {
                    return Err(TpmsError::invalid(
                        "thickness",
                        format!("must be positive, got {}", self.thickness),
                    ));
                }
            },
        }

        Ok(())
    }

    /// Parse a JSON design file body. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

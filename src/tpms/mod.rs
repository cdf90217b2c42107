//! The library of triply periodic minimal surface designs.
//!
//! Ten named designs are available, split into two families:
//! - **Shell** designs are thickened into a double wall between the
//!   isosurfaces `F = ±thickness·t`.
//! - **Skeletal** designs are meshed at the single isosurface `F = 0`, the
//!   level shift `C` being part of `F`.

pub mod formulas;

use crate::errors::TpmsError;
use crate::float_types::Real;
use formulas::AxisTrig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a design is turned into a solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Shell,
    Skeletal,
}

impl Family {
    /// Prefix used by the fully qualified design names.
    pub const fn prefix(self) -> &'static str {
        match self {
            Family::Shell => "Shell-TPMS",
            Family::Skeletal => "Skeletal-TPMS",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Shell => f.write_str("Shell"),
            Family::Skeletal => f.write_str("Skeletal"),
        }
    }
}

impl FromStr for Family {
    type Err = TpmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shell" => Ok(Family::Shell),
            "skeletal" => Ok(Family::Skeletal),
            _ => Err(TpmsError::invalid("family", format!("`{s}` is neither shell nor skeletal"))),
        }
    }
}

/// A TPMS design.
///
/// `Unknown` is what a lenient lookup yields for an unrecognised name: it
/// evaluates to the zero field and has no shell scale, so meshing it gives an
/// empty surface instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TpmsVariant {
    Gyroid,
    Diamond,
    Lidinoid,
    SplitP,
    Schwarz,
    SchoenGyroid,
    SchwarzDiamond,
    SchwarzPrimitivePinched,
    SchwarzPrimitive,
    BodyDiagonalsWithNodes,
    Unknown(Family),
}

impl TpmsVariant {
    /// Every known design, shell family first.
    pub const ALL: [TpmsVariant; 10] = [
        TpmsVariant::Gyroid,
        TpmsVariant::Diamond,
        TpmsVariant::Lidinoid,
        TpmsVariant::SplitP,
        TpmsVariant::Schwarz,
        TpmsVariant::SchoenGyroid,
        TpmsVariant::SchwarzDiamond,
        TpmsVariant::SchwarzPrimitivePinched,
        TpmsVariant::SchwarzPrimitive,
        TpmsVariant::BodyDiagonalsWithNodes,
    ];

    pub const fn family(&self) -> Family {
        match self {
            TpmsVariant::Gyroid
            | TpmsVariant::Diamond
            | TpmsVariant::Lidinoid
            | TpmsVariant::SplitP
            | TpmsVariant::Schwarz => Family::Shell,
            TpmsVariant::SchoenGyroid
            | TpmsVariant::SchwarzDiamond
            | TpmsVariant::SchwarzPrimitivePinched
            | TpmsVariant::SchwarzPrimitive
            | TpmsVariant::BodyDiagonalsWithNodes => Family::Skeletal,
            TpmsVariant::Unknown(family) => *family,
        }
    }

    /// Design name without the family prefix, e.g. `Split-P`.
    pub const fn short_name(&self) -> &'static str {
        match self {
            TpmsVariant::Gyroid => "Gyroid",
            TpmsVariant::Diamond => "Diamond",
            TpmsVariant::Lidinoid => "Lidinoid",
            TpmsVariant::SplitP => "Split-P",
            TpmsVariant::Schwarz => "Schwarz",
            TpmsVariant::SchoenGyroid => "Schoen gyroid",
            TpmsVariant::SchwarzDiamond => "Schwarz diamond",
            TpmsVariant::SchwarzPrimitivePinched => "Schwarz primitive (pinched)",
            TpmsVariant::SchwarzPrimitive => "Schwarz primitive",
            TpmsVariant::BodyDiagonalsWithNodes => "Body diagonals with nodes",
            TpmsVariant::Unknown(_) => "unknown",
        }
    }

    /// Fully qualified design name, e.g. `Shell-TPMS Gyroid`.
    pub fn name(&self) -> String {
        format!("{} {}", self.family().prefix(), self.short_name())
    }

    /// Shell half-thickness scale `t`. The shell isolevels are `±thickness·t`.
    pub const fn shell_scale(&self) -> Real {
        match self {
            TpmsVariant::Gyroid | TpmsVariant::SchoenGyroid => 0.125,
            TpmsVariant::Diamond => 0.115,
            TpmsVariant::Lidinoid => 0.37,
            TpmsVariant::SplitP => 0.19,
            TpmsVariant::Schwarz => 0.0875,
            _ => 0.0,
        }
    }

    pub const fn is_known(&self) -> bool {
        !matches!(self, TpmsVariant::Unknown(_))
    }

    /// Level-set expression before the `C` shift, from cached axis terms.
    #[inline]
    pub fn formula(&self, x: &AxisTrig, y: &AxisTrig, z: &AxisTrig) -> Real {
        match self {
            TpmsVariant::Gyroid | TpmsVariant::SchoenGyroid => formulas::gyroid(x, y, z),
            TpmsVariant::SchwarzDiamond => formulas::schwarz_diamond(x, y, z),
            TpmsVariant::SchwarzPrimitivePinched
            | TpmsVariant::SchwarzPrimitive
            | TpmsVariant::Schwarz => formulas::schwarz_primitive(x, y, z),
            TpmsVariant::BodyDiagonalsWithNodes => formulas::body_diagonals_with_nodes(x, y, z),
            TpmsVariant::Diamond => formulas::diamond(x, y, z),
            TpmsVariant::Lidinoid => formulas::lidinoid(x, y, z),
            TpmsVariant::SplitP => formulas::split_p(x, y, z),
            TpmsVariant::Unknown(_) => 0.0,
        }
    }

    /// Lenient lookup used by front ends that select a family first.
    ///
    /// Accepts either the full name or the short name of a design belonging to
    /// `family` (ASCII case-insensitive). Anything else resolves to
    /// [`TpmsVariant::Unknown`] and is logged.
    pub fn resolve(family: Family, name: &str) -> TpmsVariant {
        let wanted = name.trim();
        let found = TpmsVariant::ALL.iter().copied().find(|variant| {
            variant.family() == family
                && (variant.name().eq_ignore_ascii_case(wanted)
                    || variant.short_name().eq_ignore_ascii_case(wanted))
        });
        match found {
            Some(variant) => variant,
            None => {
                log::warn!("Design `{wanted}` not found in the {family} library, using a zero field");
                TpmsVariant::Unknown(family)
            },
        }
    }
}

impl fmt::Display for TpmsVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Strict lookup by fully qualified name (ASCII case-insensitive).
impl FromStr for TpmsVariant {
    type Err = TpmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TpmsVariant::ALL
            .iter()
            .copied()
            .find(|variant| variant.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TpmsError::UnknownDesignVariant(wanted.to_string()))
    }
}

impl TryFrom<String> for TpmsVariant {
    type Error = TpmsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TpmsVariant> for String {
    fn from(variant: TpmsVariant) -> Self {
        variant.name()
    }
}

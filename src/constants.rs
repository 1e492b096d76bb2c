//! Physical constants for the two supported unit systems.
//!
//! `spec.md` §6 requires `control.units ∈ {cgs, mks}`. All physics in the
//! core is written against an explicit [`UnitSystem`] rather than hardcoded
//! SI/Gaussian constants, so the same kernels run under either convention.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Cgs,
    Mks,
}

impl Default for UnitSystem {
    fn default() -> Self {
        UnitSystem::Mks
    }
}

/// Boltzmann constant, elementary charge, vacuum permittivity, electron
/// mass, and the Coulomb constant, resolved for a given unit system.
#[derive(Clone, Copy, Debug)]
pub struct PhysicalConstants {
    pub kb: f64,
    pub elementary_charge: f64,
    pub electron_mass: f64,
    /// Coulomb's constant `1/(4 pi eps0)` in mks; `1.0` in cgs, where the
    /// Gaussian-unit charge already folds it away (`U = q1 q2 / r`).
    pub coulomb_constant: f64,
}

impl PhysicalConstants {
    pub fn for_units(units: UnitSystem) -> Self {
        match units {
            UnitSystem::Mks => PhysicalConstants {
                kb: 1.380_649e-23,
                elementary_charge: 1.602_176_634e-19,
                electron_mass: 9.109_383_7015e-31,
                coulomb_constant: 1.0 / (4.0 * std::f64::consts::PI * 8.854_187_8128e-12),
            },
            UnitSystem::Cgs => PhysicalConstants {
                kb: 1.380_649e-16,
                elementary_charge: 4.803_204_673e-10,
                electron_mass: 9.109_383_7015e-28,
                coulomb_constant: 1.0,
            },
        }
    }
}

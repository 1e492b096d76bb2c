//! In-memory, already-parsed configuration record and its validation.
//!
//! YAML *parsing* into a rendering layer is out of scope (`spec.md` §6), but
//! the `Configuration` record this module validates is exactly the
//! `Parameters`-construction step the core consumes, grounded in
//! `original_source/sarkas/simulation/params.py`'s `Parameters.setup()`.

use serde::{Deserialize, Serialize};

use crate::constants::UnitSystem;
use crate::error::{EngineError, Result};
use crate::potentials::PotentialFamily;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpeciesConfig {
    pub name: String,
    pub mass: f64,
    pub charge: f64,
    pub num_particles: usize,
    pub temperature: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParticlesConfig {
    pub species: Vec<SpeciesConfig>,
    /// Box side lengths, or a single scalar applied to all three axes.
    pub box_lengths: [f64; 3],
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PotentialConfig {
    pub family: PotentialFamily,
    pub rc: f64,
    /// Short-range regularization distance `a_rs`, shared by every pair.
    pub a_rs: f64,
    /// Extra family-specific scalars (e.g. LJ `m`, `n`; Yukawa `kappa`).
    #[serde(default)]
    pub extra: std::collections::HashMap<String, f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct P3MConfig {
    pub enabled: bool,
    pub mesh: [usize; 3],
    pub cao: usize,
    pub alpha: Option<f64>,
    pub target_force_error: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThermostatConfig {
    pub tau: f64,
    pub equilibration_steps: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MagnetizedConfig {
    pub b_field: f64,
    pub b_axis: [f64; 3],
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntegratorConfig {
    pub dt: f64,
    pub equilibration_steps: u64,
    pub production_steps: u64,
    pub dump_interval: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LangevinConfig {
    pub gamma: f64,
    pub variant: LangevinVariantConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LangevinVariantConfig {
    Bbk,
    VanGunsterenBerendsen,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryConditions {
    Periodic,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ControlConfig {
    #[serde(default)]
    pub units: UnitSystem,
    pub seed: u64,
    pub job_id: String,
}

/// The full configuration document. `post_processing` is accepted and
/// stored but never interpreted — post-processing is out of scope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Configuration {
    pub particles: ParticlesConfig,
    pub potential: PotentialConfig,
    pub p3m: Option<P3MConfig>,
    pub thermostat: ThermostatConfig,
    pub magnetized: Option<MagnetizedConfig>,
    pub integrator: IntegratorConfig,
    pub langevin: Option<LangevinConfig>,
    pub boundary_conditions: BoundaryConditions,
    pub control: ControlConfig,
    #[serde(default)]
    pub post_processing: serde_yaml::Value,
}

impl Configuration {
    /// Raises `ConfigurationError` for every malformed-document condition
    /// and `AlgorithmError` for infeasible method/potential combinations,
    /// per `spec.md` §7.
    pub fn validate(&self) -> Result<()> {
        let total_particles: usize = self.particles.species.iter().map(|s| s.num_particles).sum();
        if total_particles == 0 {
            return Err(EngineError::configuration(
                "at least one species with num_particles > 0 is required",
            ));
        }

        let rc = self.potential.rc;
        let half_min_length = 0.5
            * self
                .particles
                .box_lengths
                .iter()
                .cloned()
                .fold(f64::INFINITY, f64::min);
        if rc > half_min_length {
            return Err(EngineError::configuration(format!(
                "cutoff rc={} exceeds L/2={} for the minimum-image convention",
                rc, half_min_length
            )));
        }

        if let Some(p3m) = &self.p3m {
            if p3m.enabled {
                if !(1..=7).contains(&p3m.cao) {
                    return Err(EngineError::configuration(format!(
                        "p3m.cao={} outside supported range 1..=7",
                        p3m.cao
                    )));
                }
                crate::potentials::validate_p3m_compatibility(self.potential.family, true)?;
            }
        }

        if self.boundary_conditions != BoundaryConditions::Periodic {
            return Err(EngineError::configuration(
                "only fully periodic boundary conditions are supported",
            ));
        }

        if self.integrator.dt <= 0.0 {
            return Err(EngineError::configuration("integrator.dt must be positive"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> Configuration {
        Configuration {
            particles: ParticlesConfig {
                species: vec![SpeciesConfig {
                    name: "A".into(),
                    mass: 1.0,
                    charge: 1.0,
                    num_particles: 100,
                    temperature: 1.0,
                }],
                box_lengths: [10.0, 10.0, 10.0],
            },
            potential: PotentialConfig {
                family: PotentialFamily::Coulomb,
                rc: 3.0,
                a_rs: 1e-9,
                extra: Default::default(),
            },
            p3m: Some(P3MConfig {
                enabled: true,
                mesh: [16, 16, 16],
                cao: 5,
                alpha: None,
                target_force_error: 1e-4,
            }),
            thermostat: ThermostatConfig {
                tau: 1.0,
                equilibration_steps: 1000,
            },
            magnetized: None,
            integrator: IntegratorConfig {
                dt: 0.01,
                equilibration_steps: 1000,
                production_steps: 10000,
                dump_interval: 100,
            },
            langevin: None,
            boundary_conditions: BoundaryConditions::Periodic,
            control: ControlConfig {
                units: UnitSystem::Mks,
                seed: 1,
                job_id: "test".into(),
            },
            post_processing: serde_yaml::Value::Null,
        }
    }

    #[test]
    fn minimal_config_validates() {
        assert!(minimal_config().validate().is_ok());
    }

    #[test]
    fn rejects_cutoff_beyond_half_box() {
        let mut config = minimal_config();
        config.potential.rc = 6.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_p3m_with_tabulated_potential() {
        let mut config = minimal_config();
        config.potential.family = PotentialFamily::Tabulated;
        assert!(config.validate().is_err());
    }
}

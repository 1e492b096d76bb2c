//! Per-species immutable records.
//!
//! `spec.md` §3 keys particles by an integer species id; the name is a
//! display-only field (§9 "Species partitioning").

use serde::{Deserialize, Serialize};

/// Immutable per-species physical record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Species {
    /// Display-only; never used for indexing.
    pub name: String,
    pub mass: f64,
    pub charge: f64,
    pub number_density: f64,
    pub temperature: f64,
    pub num_particles: usize,
    /// Plasma frequency `omega_p = sqrt(n q^2 / (eps0 m))`, precomputed by
    /// [`Species::with_derived`].
    pub plasma_frequency: f64,
    /// Cyclotron frequency `omega_c = q B / m`; zero unless a magnetic field
    /// is configured.
    pub cyclotron_frequency: f64,
}

impl Species {
    /// Build a species record, deriving `omega_p` from the Coulomb constant
    /// and, if a field is present, `omega_c` from `b_field`.
    pub fn with_derived(
        name: String,
        mass: f64,
        charge: f64,
        number_density: f64,
        temperature: f64,
        num_particles: usize,
        coulomb_constant: f64,
        b_field: f64,
    ) -> Self {
        let plasma_frequency =
            (4.0 * std::f64::consts::PI * number_density * charge * charge * coulomb_constant / mass)
                .sqrt();
        let cyclotron_frequency = charge * b_field / mass;
        Species {
            name,
            mass,
            charge,
            number_density,
            temperature,
            num_particles,
            plasma_frequency,
            cyclotron_frequency,
        }
    }
}

/// The full species table, indexed by integer species id `s in [0, S)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpeciesTable {
    species: Vec<Species>,
}

impl SpeciesTable {
    pub fn new(species: Vec<Species>) -> Self {
        SpeciesTable { species }
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn get(&self, id: usize) -> &Species {
        &self.species[id]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    pub fn total_num_particles(&self) -> usize {
        self.species.iter().map(|s| s.num_particles).sum()
    }

    /// Total number density `n_tot = sum_s n_s`, used for the Wigner-Seitz radius.
    pub fn total_number_density(&self) -> f64 {
        self.species.iter().map(|s| s.number_density).sum()
    }

    /// Wigner-Seitz radius `a_ws = (3 / (4 pi n_tot))^(1/3)`.
    pub fn wigner_seitz_radius(&self) -> f64 {
        (3.0 / (4.0 * std::f64::consts::PI * self.total_number_density())).powf(1.0 / 3.0)
    }
}

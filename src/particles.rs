//! Structure-of-arrays particle state.
//!
//! `spec.md` §3: "Arrays are stored structure-of-arrays to allow vectorized
//! force kernels." Species partitions are contiguous, matching the
//! invariant in §3.

use nalgebra::Vector3;

use crate::species::SpeciesTable;

/// The full mutable particle state for the run. `N` is fixed for the
/// lifetime of a `Particles` value.
#[derive(Clone, Debug)]
pub struct Particles {
    pub positions: Vec<Vector3<f64>>,
    pub velocities: Vec<Vector3<f64>>,
    pub accelerations: Vec<Vector3<f64>>,
    /// Contiguous per species: particles of species 0 occupy
    /// `[0, species_offsets[1])`, species 1 occupies
    /// `[species_offsets[1], species_offsets[2])`, etc.
    pub species_id: Vec<usize>,
}

impl Particles {
    /// Allocates zeroed arrays for `n` particles and assigns contiguous
    /// species ids from `species.num_particles` per species, in table order.
    pub fn zeroed(species: &SpeciesTable) -> Self {
        let n = species.total_num_particles();
        let mut species_id = Vec::with_capacity(n);
        for (s, sp) in species.iter().enumerate() {
            species_id.extend(std::iter::repeat(s).take(sp.num_particles));
        }
        Particles {
            positions: vec![Vector3::zeros(); n],
            velocities: vec![Vector3::zeros(); n],
            accelerations: vec![Vector3::zeros(); n],
            species_id,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Total momentum `sum_i m_i v_i`.
    pub fn total_momentum(&self, species: &SpeciesTable) -> Vector3<f64> {
        let mut p = Vector3::zeros();
        for i in 0..self.len() {
            let m = species.get(self.species_id[i]).mass;
            p += m * self.velocities[i];
        }
        p
    }

    /// Subtracts the center-of-mass velocity so total momentum is zero,
    /// per the initializer's velocity COM-correction (`spec.md` §4.9).
    pub fn remove_com_velocity(&mut self, species: &SpeciesTable) {
        let total_mass: f64 = (0..self.len())
            .map(|i| species.get(self.species_id[i]).mass)
            .sum();
        if total_mass <= 0.0 {
            return;
        }
        let p = self.total_momentum(species);
        let v_com = p / total_mass;
        for v in self.velocities.iter_mut() {
            *v -= v_com;
        }
    }

    /// Total kinetic energy `sum_i 0.5 m_i |v_i|^2`.
    pub fn kinetic_energy(&self, species: &SpeciesTable) -> f64 {
        let mut ke = 0.0;
        for i in 0..self.len() {
            let m = species.get(self.species_id[i]).mass;
            ke += 0.5 * m * self.velocities[i].norm_squared();
        }
        ke
    }

    /// Per-species instantaneous temperature, `spec.md` §4.7:
    /// `T_s = (sum m v^2) / (d kB N_s)`.
    pub fn species_temperature(&self, species: &SpeciesTable, s: usize, kb: f64) -> f64 {
        const D: f64 = 3.0;
        let sp = species.get(s);
        if sp.num_particles == 0 {
            return 0.0;
        }
        let mut sum_mv2 = 0.0;
        for i in 0..self.len() {
            if self.species_id[i] == s {
                sum_mv2 += sp.mass * self.velocities[i].norm_squared();
            }
        }
        sum_mv2 / (D * kb * sp.num_particles as f64)
    }

    /// `true` if any position, velocity, or acceleration component is NaN or
    /// infinite. Checked every step per the "no silent recovery" policy.
    pub fn has_non_finite(&self) -> bool {
        let bad = |v: &Vector3<f64>| !v.iter().all(|x| x.is_finite());
        self.positions.iter().any(bad)
            || self.velocities.iter().any(bad)
            || self.accelerations.iter().any(bad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;
    use approx::assert_relative_eq;

    fn two_species_table() -> SpeciesTable {
        SpeciesTable::new(vec![
            Species::with_derived("A".into(), 1.0, 1.0, 1.0, 1.0, 3, 1.0, 0.0),
            Species::with_derived("B".into(), 2.0, -1.0, 1.0, 1.0, 2, 1.0, 0.0),
        ])
    }

    #[test]
    fn species_ids_are_contiguous() {
        let table = two_species_table();
        let particles = Particles::zeroed(&table);
        assert_eq!(particles.species_id, vec![0, 0, 0, 1, 1]);
    }

    #[test]
    fn com_removal_zeroes_total_momentum() {
        let table = two_species_table();
        let mut particles = Particles::zeroed(&table);
        particles.velocities[0] = Vector3::new(1.0, 0.0, 0.0);
        particles.velocities[3] = Vector3::new(-0.3, 0.2, 0.0);
        particles.remove_com_velocity(&table);
        let p = particles.total_momentum(&table);
        assert_relative_eq!(p.norm(), 0.0, epsilon = 1e-10);
    }
}

//! Berendsen velocity-rescaling thermostat, applied per species.
//!
//! Grounded in `MDSYN2019-rust_md_work/src/berendsen.rs` and
//! `apply_thermostat`'s `lambda = sqrt(T_target/T_current)` rescaling,
//! generalized to the weak-coupling form with a relaxation time `tau` and
//! restricted to an equilibration window, per `spec.md` §4.7.

use crate::particles::Particles;
use crate::species::SpeciesTable;

/// Per-species Berendsen thermostat parameters.
#[derive(Clone, Copy, Debug)]
pub struct BerendsenParams {
    pub target_temperature: f64,
    /// Relaxation time; larger values couple more weakly to the bath.
    pub tau: f64,
}

/// Applies the Berendsen rescaling `lambda_s = sqrt(1 + (dt/tau)(T_target/T_s - 1))`
/// to every particle of species `s`, only while `step < cutoff_step` (the
/// thermostat is switched off once equilibration ends).
pub fn apply(
    particles: &mut Particles,
    species: &SpeciesTable,
    params: &[BerendsenParams],
    kb: f64,
    dt: f64,
    step: u64,
    cutoff_step: u64,
) {
    if step >= cutoff_step {
        return;
    }
    for s in 0..species.len() {
        let current = particles.species_temperature(species, s, kb);
        if current <= 0.0 {
            continue;
        }
        let p = params[s];
        let ratio = (dt / p.tau) * (p.target_temperature / current - 1.0);
        let lambda = (1.0 + ratio).max(0.0).sqrt();
        for i in 0..particles.len() {
            if particles.species_id[i] == s {
                particles.velocities[i] *= lambda;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;
    use nalgebra::Vector3;

    #[test]
    fn rescales_towards_target_temperature() {
        let table = SpeciesTable::new(vec![Species::with_derived(
            "A".into(),
            1.0,
            1.0,
            1.0,
            1.0,
            2,
            1.0,
            0.0,
        )]);
        let mut particles = Particles::zeroed(&table);
        particles.velocities[0] = Vector3::new(2.0, 0.0, 0.0);
        particles.velocities[1] = Vector3::new(-2.0, 0.0, 0.0);

        let kb = 1.0;
        let before = particles.species_temperature(&table, 0, kb);
        let params = vec![BerendsenParams {
            target_temperature: before * 4.0,
            tau: 1.0,
        }];
        apply(&mut particles, &table, &params, kb, 0.1, 0, 1000);
        let after = particles.species_temperature(&table, 0, kb);
        assert!(after > before);
    }

    #[test]
    fn thermostat_disabled_past_cutoff_step() {
        let table = SpeciesTable::new(vec![Species::with_derived(
            "A".into(),
            1.0,
            1.0,
            1.0,
            1.0,
            1,
            1.0,
            0.0,
        )]);
        let mut particles = Particles::zeroed(&table);
        particles.velocities[0] = Vector3::new(1.0, 0.0, 0.0);
        let params = vec![BerendsenParams {
            target_temperature: 100.0,
            tau: 1.0,
        }];
        apply(&mut particles, &table, &params, 1.0, 0.1, 1000, 1000);
        assert_eq!(particles.velocities[0], Vector3::new(1.0, 0.0, 0.0));
    }
}

//! Symplectic time integrators: velocity-Verlet and the magnetized-Verlet
//! scheme for species under a static magnetic field.
//!
//! Grounded in `MDSYN2019-rust_md_work/src/lib.rs`'s
//! `update_position_verlet`/`update_velocity_verlet`, generalized to the
//! half-kick/drift/half-kick split needed once accelerations depend on the
//! updated positions, and extended with the analytic Lorentz rotation of
//! Spreiter & Walter (1999) for magnetized species.

use nalgebra::Vector3;

use crate::particles::Particles;
use crate::species::SpeciesTable;

/// First half: `v += 0.5 dt a`, `x += dt v`. Forces must be recomputed at
/// the new positions before [`kick`] closes the step.
pub fn drift(particles: &mut Particles, dt: f64) {
    for i in 0..particles.len() {
        particles.velocities[i] += 0.5 * dt * particles.accelerations[i];
        particles.positions[i] += dt * particles.velocities[i];
    }
}

/// Second half: `v += 0.5 dt a`, using the freshly recomputed acceleration.
pub fn kick(particles: &mut Particles, dt: f64) {
    for i in 0..particles.len() {
        particles.velocities[i] += 0.5 * dt * particles.accelerations[i];
    }
}

/// Magnetized half-kick: rotates the velocity by the Lorentz precession
/// angle `omega_c dt / 2` about the field axis before/after the standard
/// acceleration kick, following Spreiter & Walter's exact sub-stepping of
/// the Lorentz force for a static, uniform field along `b_hat`.
pub fn magnetized_half_kick(particles: &mut Particles, species: &SpeciesTable, dt: f64, b_hat: Vector3<f64>) {
    for i in 0..particles.len() {
        let omega_c = species.get(particles.species_id[i]).cyclotron_frequency;
        let theta = 0.5 * omega_c * dt;
        let v_half = particles.velocities[i] + 0.5 * dt * particles.accelerations[i];
        particles.velocities[i] = rotate_about_axis(v_half, b_hat, theta);
    }
}

/// Rotates `v` by angle `theta` about unit axis `axis`, via Rodrigues'
/// rotation formula.
fn rotate_about_axis(v: Vector3<f64>, axis: Vector3<f64>, theta: f64) -> Vector3<f64> {
    let (s, c) = theta.sin_cos();
    v * c + axis.cross(&v) * s + axis * (axis.dot(&v)) * (1.0 - c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;
    use approx::assert_relative_eq;

    fn single_particle_table() -> SpeciesTable {
        SpeciesTable::new(vec![Species::with_derived(
            "A".into(),
            1.0,
            1.0,
            1.0,
            1.0,
            1,
            1.0,
            2.0,
        )])
    }

    #[test]
    fn drift_then_kick_matches_free_particle_analytic_solution() {
        let table = single_particle_table();
        let mut particles = Particles::zeroed(&table);
        particles.velocities[0] = Vector3::new(1.0, 0.0, 0.0);
        particles.accelerations[0] = Vector3::new(0.0, 0.0, 0.0);

        let dt = 0.1;
        drift(&mut particles, dt);
        kick(&mut particles, dt);

        assert_relative_eq!(particles.positions[0].x, 0.1, epsilon = 1e-12);
        assert_relative_eq!(particles.velocities[0].x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn magnetized_kick_preserves_speed() {
        let table = single_particle_table();
        let mut particles = Particles::zeroed(&table);
        particles.velocities[0] = Vector3::new(1.0, 0.3, -0.2);
        particles.accelerations[0] = Vector3::zeros();
        let speed_before = particles.velocities[0].norm();

        magnetized_half_kick(&mut particles, &table, 0.05, Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(particles.velocities[0].norm(), speed_before, epsilon = 1e-12);
    }
}

//! Initial configuration builders: lattice placement, uniform-random
//! placement, Halton quasirandom placement, and Maxwell-Boltzmann velocity
//! assignment.
//!
//! Grounded in `MDSYN2019-rust_md_work/src/lib.rs`'s
//! `maxwellboltzmannvelocity` (`rand_distr::Normal` per velocity component)
//! and `create_atoms_with_set_positions_and_velocities`. The Halton mode
//! (`spec.md` §4.9) reuses the same linear-scan rejection pass as
//! `place_uniform_random`, walking a deterministic low-discrepancy sequence
//! instead of drawing from the RNG.

use nalgebra::Vector3;
use rand_distr::{Distribution, Normal};

use crate::error::{EngineError, Result};
use crate::particles::Particles;
use crate::rng::EngineRng;
use crate::simbox::SimulationBox;
use crate::species::SpeciesTable;

/// Default Halton bases, one per axis, per `spec.md` §4.9.
pub const DEFAULT_HALTON_BASES: [u32; 3] = [2, 3, 5];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlacementMethod {
    Lattice,
    UniformRandom,
    /// Low-discrepancy placement over `bases` (one prime base per axis),
    /// with a minimum-separation rejection pass at radius `r_reject`.
    Halton { bases: [u32; 3], r_reject: f64 },
}

impl PlacementMethod {
    /// Halton placement with the default `{2, 3, 5}` bases.
    pub fn halton_default(r_reject: f64) -> Self {
        PlacementMethod::Halton {
            bases: DEFAULT_HALTON_BASES,
            r_reject,
        }
    }
}

/// Places every particle on a simple cubic lattice sized to fit the box,
/// uniformly at random, or along a Halton quasirandom sequence — the latter
/// two with a minimum-separation rejection pass so no two particles start on
/// top of each other.
pub fn place_positions(
    particles: &mut Particles,
    simbox: &SimulationBox,
    method: PlacementMethod,
    min_separation: f64,
    rng: &mut EngineRng,
) -> Result<()> {
    match method {
        PlacementMethod::Lattice => place_lattice(particles, simbox),
        PlacementMethod::UniformRandom => place_uniform_random(particles, simbox, min_separation, rng),
        PlacementMethod::Halton { bases, r_reject } => place_halton(particles, simbox, bases, r_reject),
    }
}

/// Van der Corput radical-inverse sequence in the given prime `base`.
fn halton(mut index: u64, base: u32) -> f64 {
    let base = base as u64;
    let mut f = 1.0;
    let mut r = 0.0;
    while index > 0 {
        f /= base as f64;
        r += f * (index % base) as f64;
        index /= base;
    }
    r
}

fn place_halton(
    particles: &mut Particles,
    simbox: &SimulationBox,
    bases: [u32; 3],
    r_reject: f64,
) -> Result<()> {
    const MAX_ATTEMPTS_PER_PARTICLE: usize = 10_000;

    let n = particles.len();
    let mut placed: Vec<Vector3<f64>> = Vec::with_capacity(n);
    let mut index: u64 = 1;

    for idx in 0..n {
        let mut attempts = 0;
        loop {
            let candidate = Vector3::new(
                (halton(index, bases[0]) - 0.5) * simbox.lengths.x,
                (halton(index, bases[1]) - 0.5) * simbox.lengths.y,
                (halton(index, bases[2]) - 0.5) * simbox.lengths.z,
            );
            index += 1;

            let collides = r_reject > 0.0
                && placed
                    .iter()
                    .any(|&p| simbox.minimum_image(candidate - p).norm() < r_reject);
            if !collides {
                placed.push(candidate);
                particles.positions[idx] = candidate;
                break;
            }
            attempts += 1;
            if attempts >= MAX_ATTEMPTS_PER_PARTICLE {
                return Err(EngineError::numerical(format!(
                    "failed to place particle {} via Halton sequence with rejection radius {} after {} attempts",
                    idx, r_reject, MAX_ATTEMPTS_PER_PARTICLE
                )));
            }
        }
    }
    Ok(())
}

fn place_lattice(particles: &mut Particles, simbox: &SimulationBox) -> Result<()> {
    let n = particles.len();
    if n == 0 {
        return Ok(());
    }
    let per_axis = (n as f64).cbrt().ceil() as usize;
    let spacing = Vector3::new(
        simbox.lengths.x / per_axis as f64,
        simbox.lengths.y / per_axis as f64,
        simbox.lengths.z / per_axis as f64,
    );

    let mut idx = 0;
    'outer: for ix in 0..per_axis {
        for iy in 0..per_axis {
            for iz in 0..per_axis {
                if idx >= n {
                    break 'outer;
                }
                let position = Vector3::new(
                    (ix as f64 + 0.5) * spacing.x - 0.5 * simbox.lengths.x,
                    (iy as f64 + 0.5) * spacing.y - 0.5 * simbox.lengths.y,
                    (iz as f64 + 0.5) * spacing.z - 0.5 * simbox.lengths.z,
                );
                particles.positions[idx] = position;
                idx += 1;
            }
        }
    }
    Ok(())
}

fn place_uniform_random(
    particles: &mut Particles,
    simbox: &SimulationBox,
    min_separation: f64,
    rng: &mut EngineRng,
) -> Result<()> {
    use rand::Rng;
    const MAX_ATTEMPTS_PER_PARTICLE: usize = 10_000;

    let n = particles.len();
    let mut placed: Vec<Vector3<f64>> = Vec::with_capacity(n);

    for idx in 0..n {
        let mut attempts = 0;
        loop {
            let candidate = Vector3::new(
                rng.gen_range(-0.5 * simbox.lengths.x..0.5 * simbox.lengths.x),
                rng.gen_range(-0.5 * simbox.lengths.y..0.5 * simbox.lengths.y),
                rng.gen_range(-0.5 * simbox.lengths.z..0.5 * simbox.lengths.z),
            );
            let collides = placed.iter().any(|&p| {
                simbox.minimum_image(candidate - p).norm() < min_separation
            });
            if !collides {
                placed.push(candidate);
                particles.positions[idx] = candidate;
                break;
            }
            attempts += 1;
            if attempts >= MAX_ATTEMPTS_PER_PARTICLE {
                return Err(EngineError::numerical(format!(
                    "failed to place particle {} with minimum separation {} after {} attempts",
                    idx, min_separation, MAX_ATTEMPTS_PER_PARTICLE
                )));
            }
        }
    }
    Ok(())
}

/// Draws velocities from the per-species Maxwell-Boltzmann distribution
/// (`Normal(0, sqrt(kB T / m))` per component) and removes the net
/// center-of-mass velocity.
pub fn assign_maxwell_boltzmann_velocities(
    particles: &mut Particles,
    species: &SpeciesTable,
    kb: f64,
    rng: &mut EngineRng,
) {
    for i in 0..particles.len() {
        let sp = species.get(particles.species_id[i]);
        let sigma = (kb * sp.temperature / sp.mass).sqrt();
        let normal = Normal::new(0.0, sigma).expect("Maxwell-Boltzmann sigma is non-negative");
        particles.velocities[i] = Vector3::new(
            normal.sample(&mut *rng),
            normal.sample(&mut *rng),
            normal.sample(&mut *rng),
        );
    }
    particles.remove_com_velocity(species);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;

    fn table(n: usize) -> SpeciesTable {
        SpeciesTable::new(vec![Species::with_derived(
            "A".into(),
            1.0,
            1.0,
            1.0,
            2.0,
            n,
            1.0,
            0.0,
        )])
    }

    #[test]
    fn lattice_placement_keeps_particles_inside_box() {
        let species = table(27);
        let mut particles = Particles::zeroed(&species);
        let simbox = SimulationBox::new(9.0, 9.0, 9.0);
        place_positions(&mut particles, &simbox, PlacementMethod::Lattice, 0.1, &mut EngineRng::from_seed(1)).unwrap();
        for p in &particles.positions {
            assert!(p.x.abs() <= 4.5 + 1e-9);
            assert!(p.y.abs() <= 4.5 + 1e-9);
            assert!(p.z.abs() <= 4.5 + 1e-9);
        }
    }

    #[test]
    fn uniform_random_placement_respects_minimum_separation() {
        let species = table(10);
        let mut particles = Particles::zeroed(&species);
        let simbox = SimulationBox::new(20.0, 20.0, 20.0);
        let mut rng = EngineRng::from_seed(5);
        place_positions(&mut particles, &simbox, PlacementMethod::UniformRandom, 1.0, &mut rng).unwrap();
        for i in 0..particles.len() {
            for j in (i + 1)..particles.len() {
                let d = simbox.minimum_image(particles.positions[i] - particles.positions[j]).norm();
                assert!(d >= 1.0 - 1e-9);
            }
        }
    }

    #[test]
    fn halton_placement_respects_rejection_radius() {
        let species = table(500);
        let mut particles = Particles::zeroed(&species);
        let simbox = SimulationBox::new(20.0, 20.0, 20.0);
        let method = PlacementMethod::halton_default(0.3);
        place_positions(&mut particles, &simbox, method, 0.0, &mut EngineRng::from_seed(11)).unwrap();
        for p in &particles.positions {
            assert!(p.x.abs() <= 10.0 + 1e-9);
            assert!(p.y.abs() <= 10.0 + 1e-9);
            assert!(p.z.abs() <= 10.0 + 1e-9);
        }
        for i in 0..particles.len() {
            for j in (i + 1)..particles.len() {
                let d = simbox.minimum_image(particles.positions[i] - particles.positions[j]).norm();
                assert!(d >= 0.3 - 1e-9);
            }
        }
    }

    #[test]
    fn maxwell_boltzmann_velocities_have_zero_com() {
        let species = table(50);
        let mut particles = Particles::zeroed(&species);
        let mut rng = EngineRng::from_seed(3);
        assign_maxwell_boltzmann_velocities(&mut particles, &species, 1.0, &mut rng);
        let p = particles.total_momentum(&species);
        assert!(p.norm() < 1e-9);
    }
}

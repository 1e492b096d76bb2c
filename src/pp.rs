//! Particle-particle (short-range) force engine.
//!
//! `spec.md` §4.2: for every pair within `rc`, apply the minimum-image
//! convention, dispatch to the configured pair potential, and accumulate
//! force (Newton's third law), potential energy, and virial. Grounded in
//! `MDSYN2019-rust_work/src/lib.rs`'s `compute_forces`/
//! `site_site_energy_calculation` loop shape, generalized to species-pair
//! potentials and a linked-cell neighbor search.

use nalgebra::Vector3;

use crate::cell_list::CellList;
use crate::particles::Particles;
use crate::potentials::Potential;
use crate::simbox::SimulationBox;

/// Aggregate outputs of one short-range force pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct PairOutputs {
    pub potential_energy: f64,
    /// `sum_{i<j} r_ij . F_ij`, used for the pressure/virial diagnostic.
    pub virial: f64,
}

/// Accumulates short-range forces into `particles.accelerations` (as
/// `F_i / m_i`) and returns the aggregate energy/virial. Accelerations are
/// zeroed first; callers combine with long-range (P3M) contributions
/// afterwards.
pub fn compute_short_range(
    particles: &mut Particles,
    species_masses: &[f64],
    simbox: &SimulationBox,
    cells: &CellList,
    potential: &Potential,
    rc: f64,
) -> PairOutputs {
    for a in particles.accelerations.iter_mut() {
        *a = Vector3::zeros();
    }

    let mut outputs = PairOutputs::default();
    let positions = &particles.positions;
    let species_id = &particles.species_id;
    let rc2 = rc * rc;

    // Force accumulation can't happen inside the `for_each_pair` closure
    // while also borrowing `particles` mutably for acceleration updates, so
    // pairs are staged into a local force buffer first.
    let mut force_buffer = vec![Vector3::zeros(); positions.len()];
    let mut potential_energy = 0.0;
    let mut virial = 0.0;

    cells.for_each_pair(|i, j| {
        let displacement = simbox.minimum_image(positions[i] - positions[j]);
        let r2 = displacement.norm_squared();
        if r2 >= rc2 || r2 <= 0.0 {
            return;
        }
        let r = r2.sqrt();
        let si = species_id[i];
        let sj = species_id[j];
        let (u, f_over_r) = potential.force(r, si, sj);
        let force_on_i = f_over_r * displacement;
        force_buffer[i] += force_on_i;
        force_buffer[j] -= force_on_i;
        potential_energy += u;
        virial += f_over_r * r2;
    });

    outputs.potential_energy = potential_energy;
    outputs.virial = virial;

    for i in 0..positions.len() {
        let m = species_masses[species_id[i]];
        particles.accelerations[i] += force_buffer[i] / m;
    }

    outputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potentials::build_coulomb;
    use crate::species::{Species, SpeciesTable};

    #[test]
    fn like_charges_repel_along_separation_axis() {
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
        particles.positions[0] = Vector3::new(4.0, 5.0, 5.0);
        particles.positions[1] = Vector3::new(6.0, 5.0, 5.0);

        let simbox = SimulationBox::new(10.0, 10.0, 10.0);
        let rc = 4.0;
        let mut cells = CellList::new(&simbox, rc);
        cells.rebuild(&particles.positions);

        let params = build_coulomb(&[1.0], 1.0, 0.0, 1e-9);
        let potential = Potential::Coulomb { params };

        let outputs = compute_short_range(&mut particles, &[1.0], &simbox, &cells, &potential, rc);
        assert!(outputs.potential_energy > 0.0); // like charges: repulsive
        assert!(particles.accelerations[0].x < 0.0); // pushed away from particle 1
        assert!(particles.accelerations[1].x > 0.0);
    }

    #[test]
    fn pairs_beyond_cutoff_are_excluded() {
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
        particles.positions[0] = Vector3::new(1.0, 1.0, 1.0);
        particles.positions[1] = Vector3::new(9.0, 9.0, 9.0);

        let simbox = SimulationBox::new(20.0, 20.0, 20.0);
        let rc = 2.0;
        let mut cells = CellList::new(&simbox, rc);
        cells.rebuild(&particles.positions);

        let params = build_coulomb(&[1.0], 1.0, 0.0, 1e-9);
        let potential = Potential::Coulomb { params };

        let outputs = compute_short_range(&mut particles, &[1.0], &simbox, &cells, &potential, rc);
        assert_eq!(outputs.potential_energy, 0.0);
        assert_eq!(particles.accelerations[0], Vector3::zeros());
    }
}

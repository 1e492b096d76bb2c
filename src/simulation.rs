//! Top-level simulation driver: equilibration then production loop.
//!
//! Grounded in `MDSYN2019-rust_md_work/src/lib.rs`'s `run_md_nve` loop shape
//! and `minimization.rs`'s `log::info!` phase-boundary logging density.
//! Ordering per step follows `spec.md` §2/§4.6: recompute short- and
//! long-range forces at the drifted positions, close the velocity half-kick,
//! then apply whichever thermostat is configured.

use log::{debug, info, warn};
use std::path::PathBuf;

use crate::cell_list::CellList;
use crate::checkpoint::{self, Checkpoint};
use crate::config::Configuration;
use crate::constants::PhysicalConstants;
use crate::error::{EngineError, Result};
use crate::ewald::solve_alpha;
use crate::initializer::{self, PlacementMethod};
use crate::integrator;
use crate::langevin::{self, LangevinParams, LangevinVariant};
use crate::particles::Particles;
use crate::pm::P3MSolver;
use crate::potentials::{self, Potential};
use crate::pp;
use crate::rng::EngineRng;
use crate::simbox::SimulationBox;
use crate::species::{Species, SpeciesTable};
use crate::thermostat::{self, BerendsenParams};

/// Owns everything needed to step the system forward: particle state,
/// species table, box, cached neighbor list, and the configured potential.
pub struct Simulation {
    pub particles: Particles,
    pub species: SpeciesTable,
    pub simbox: SimulationBox,
    pub potential: Potential,
    pub p3m: Option<P3MSolver>,
    pub constants: PhysicalConstants,
    pub config: Configuration,
    pub rng: EngineRng,
    cells: CellList,
    step: u64,
    elapsed_time: f64,
}

impl Simulation {
    /// Builds a fresh simulation from a validated configuration: constructs
    /// species/particles, places initial positions and velocities, builds
    /// the potential's parameter tensor, and (if requested) solves for the
    /// Ewald `alpha` and constructs the P3M solver.
    pub fn new(config: Configuration) -> Result<Self> {
        config.validate()?;

        let constants = PhysicalConstants::for_units(config.control.units);
        let box_lengths = config.particles.box_lengths;
        let simbox = SimulationBox::new(box_lengths[0], box_lengths[1], box_lengths[2]);

        let mut rng = EngineRng::from_seed(config.control.seed);

        let mut species_records = Vec::with_capacity(config.particles.species.len());
        for sp in &config.particles.species {
            let number_density = sp.num_particles as f64 / simbox.volume();
            let b_field = config.magnetized.as_ref().map(|m| m.b_field).unwrap_or(0.0);
            species_records.push(Species::with_derived(
                sp.name.clone(),
                sp.mass,
                sp.charge,
                number_density,
                sp.temperature,
                sp.num_particles,
                constants.coulomb_constant,
                b_field,
            ));
        }
        let species = SpeciesTable::new(species_records);

        let mut particles = Particles::zeroed(&species);
        let min_separation = species.wigner_seitz_radius() * 0.1;
        initializer::place_positions(
            &mut particles,
            &simbox,
            PlacementMethod::Lattice,
            min_separation,
            &mut rng,
        )?;
        initializer::assign_maxwell_boltzmann_velocities(&mut particles, &species, constants.kb, &mut rng);

        let rc = config.potential.rc;
        let charges: Vec<f64> = species.iter().map(|s| s.charge).collect();
        let alpha_guess = config
            .p3m
            .as_ref()
            .and_then(|p| p.alpha)
            .unwrap_or(1.0 / rc.max(1e-9));

        let potential = build_potential(&config, &charges, constants.coulomb_constant, alpha_guess)?;

        let p3m = match &config.p3m {
            Some(p3m_config) if p3m_config.enabled => {
                let alpha = match p3m_config.alpha {
                    Some(a) => a,
                    None => {
                        let params = solve_alpha(
                            rc,
                            p3m_config.mesh,
                            p3m_config.cao,
                            box_lengths,
                            particles.len(),
                            simbox.volume(),
                            p3m_config.target_force_error,
                            200,
                        )?;
                        info!(
                            "Ewald solver converged: alpha={:.6}, pp_error={:.3e}, pm_error={:.3e}",
                            params.alpha, params.pp_error, params.pm_error
                        );
                        params.alpha
                    }
                };
                Some(P3MSolver::new(p3m_config.mesh, box_lengths, alpha, p3m_config.cao)?)
            }
            _ => None,
        };

        let cells = CellList::new(&simbox, rc);

        Ok(Simulation {
            particles,
            species,
            simbox,
            potential,
            p3m,
            constants,
            config,
            rng,
            cells,
            step: 0,
            elapsed_time: 0.0,
        })
    }

    /// Recomputes short- (and, if configured, long-) range forces at the
    /// current positions, writing into `particles.accelerations`.
    fn compute_forces(&mut self) -> Result<()> {
        self.cells.rebuild(&self.particles.positions);
        let masses: Vec<f64> = self.species.iter().map(|s| s.mass).collect();
        let rc = self.config.potential.rc;

        // single-threaded reduction; see spec.md §5 for the parallel design
        // this satisfies trivially
        pp::compute_short_range(
            &mut self.particles,
            &masses,
            &self.simbox,
            &self.cells,
            &self.potential,
            rc,
        );

        if let Some(solver) = &self.p3m {
            let charges: Vec<f64> = self.species.iter().map(|s| s.charge).collect();
            solver.compute_long_range(
                &mut self.particles,
                &charges,
                &masses,
                &self.simbox,
                self.constants.coulomb_constant,
            );
        }

        if self.particles.has_non_finite() {
            self.dump_diagnostic_checkpoint("non-finite state detected")?;
            return Err(EngineError::numerical(
                "non-finite position, velocity, or acceleration detected after force evaluation",
            ));
        }
        Ok(())
    }

    fn dump_diagnostic_checkpoint(&self, reason: &str) -> Result<()> {
        warn!("dumping diagnostic checkpoint at step {}: {}", self.step, reason);
        let checkpoint = Checkpoint::capture(&self.particles, self.step, self.elapsed_time, self.rng.state());
        let path = PathBuf::from(format!("{}_diagnostic_step{}.bin", self.config.control.job_id, self.step));
        checkpoint::write(&checkpoint, &path)
    }

    /// Advances the system by one velocity-Verlet (or magnetized-Verlet)
    /// step, applying the configured thermostat(s) afterwards.
    pub fn step(&mut self, dt: f64) -> Result<()> {
        integrator::drift(&mut self.particles, dt);
        self.particles.positions = self
            .particles
            .positions
            .iter()
            .map(|&p| self.simbox.wrap(p))
            .collect();

        self.compute_forces()?;

        match &self.config.magnetized {
            Some(mag) => {
                let b_hat = nalgebra::Vector3::new(mag.b_axis[0], mag.b_axis[1], mag.b_axis[2]).normalize();
                integrator::magnetized_half_kick(&mut self.particles, &self.species, dt, b_hat);
            }
            None => integrator::kick(&mut self.particles, dt),
        }

        if let Some(langevin_config) = &self.config.langevin {
            let variant = match langevin_config.variant {
                crate::config::LangevinVariantConfig::Bbk => LangevinVariant::Bbk,
                crate::config::LangevinVariantConfig::VanGunsterenBerendsen => {
                    LangevinVariant::VanGunsterenBerendsen
                }
            };
            let params: Vec<LangevinParams> = self
                .species
                .iter()
                .map(|sp| LangevinParams {
                    gamma: langevin_config.gamma,
                    bath_temperature: sp.temperature,
                })
                .collect();
            langevin::apply(
                &mut self.particles,
                &self.species,
                &params,
                variant,
                self.constants.kb,
                dt,
                &mut self.rng,
            );
        } else {
            let params: Vec<BerendsenParams> = self
                .species
                .iter()
                .map(|s| BerendsenParams {
                    target_temperature: s.temperature,
                    tau: self.config.thermostat.tau,
                })
                .collect();
            thermostat::apply(
                &mut self.particles,
                &self.species,
                &params,
                self.constants.kb,
                dt,
                self.step,
                self.config.thermostat.equilibration_steps,
            );
        }

        self.step += 1;
        self.elapsed_time += dt;
        Ok(())
    }

    /// Runs the equilibration phase (thermostat active), then the
    /// production phase (thermostat cut off past `equilibration_steps`),
    /// logging at phase boundaries and every `dump_interval` steps.
    pub fn run(&mut self) -> Result<()> {
        self.compute_forces()?;

        let dt = self.config.integrator.dt;
        let equilibration_steps = self.config.integrator.equilibration_steps;
        let production_steps = self.config.integrator.production_steps;
        let dump_interval = self.config.integrator.dump_interval.max(1);

        info!("equilibration started: {} steps", equilibration_steps);
        for _ in 0..equilibration_steps {
            self.step(dt)?;
            if self.step % dump_interval == 0 {
                debug!("equilibration step {}", self.step);
            }
        }
        info!("equilibration finished at step {}", self.step);

        info!("production started: {} steps", production_steps);
        for _ in 0..production_steps {
            self.step(dt)?;
            if self.step % dump_interval == 0 {
                debug!("production step {}", self.step);
            }
        }
        info!("production finished at step {}", self.step);

        Ok(())
    }

    pub fn step_count(&self) -> u64 {
        self.step
    }
}

fn build_potential(
    config: &Configuration,
    charges: &[f64],
    coulomb_constant: f64,
    alpha_guess: f64,
) -> Result<Potential> {
    let a_rs = config.potential.a_rs;
    match config.potential.family {
        potentials::PotentialFamily::Coulomb => Ok(Potential::Coulomb {
            params: potentials::build_coulomb(charges, coulomb_constant, alpha_guess, a_rs),
        }),
        potentials::PotentialFamily::Yukawa => {
            let kappa = *config.potential.extra.get("kappa").ok_or_else(|| {
                EngineError::configuration("yukawa potential requires potential.extra.kappa")
            })?;
            Ok(Potential::Yukawa {
                params: potentials::build_yukawa(charges, coulomb_constant, kappa, alpha_guess, a_rs),
            })
        }
        potentials::PotentialFamily::Lj => {
            let m = *config.potential.extra.get("m").unwrap_or(&12.0);
            let n = *config.potential.extra.get("n").unwrap_or(&6.0);
            let sigma = *config.potential.extra.get("sigma").unwrap_or(&1.0);
            let epsilon = *config.potential.extra.get("epsilon").unwrap_or(&1.0);
            let sigmas = vec![sigma; charges.len()];
            let epsilons = vec![epsilon; charges.len()];
            Ok(Potential::Lj {
                params: potentials::build_lj(&sigmas, &epsilons, m, n, a_rs),
            })
        }
        other => Err(EngineError::algorithm(format!(
            "potential family {:?} has no automatic parameter-tensor builder yet; supply one explicitly",
            other
        ))),
    }
}

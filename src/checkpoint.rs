//! Binary checkpoint/restart via `bincode`.
//!
//! `spec.md` §4.11 (ambient): a checkpoint captures everything needed to
//! resume bit-for-bit-reproducible integration — step, elapsed time, full
//! particle state, and RNG state (not raw `Pcg64` bytes, see
//! [`crate::rng`]).

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::particles::Particles;
use crate::rng::RngState;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    pub step: u64,
    pub elapsed_time: f64,
    pub positions: Vec<Vector3<f64>>,
    pub velocities: Vec<Vector3<f64>>,
    pub accelerations: Vec<Vector3<f64>>,
    pub species_id: Vec<usize>,
    pub rng_state: RngState,
}

impl Checkpoint {
    pub fn capture(particles: &Particles, step: u64, elapsed_time: f64, rng_state: RngState) -> Self {
        Checkpoint {
            step,
            elapsed_time,
            positions: particles.positions.clone(),
            velocities: particles.velocities.clone(),
            accelerations: particles.accelerations.clone(),
            species_id: particles.species_id.clone(),
            rng_state,
        }
    }

    pub fn into_particles(self) -> Particles {
        Particles {
            positions: self.positions,
            velocities: self.velocities,
            accelerations: self.accelerations,
            species_id: self.species_id,
        }
    }
}

/// Writes the checkpoint, retrying once on a transient I/O failure before
/// propagating a fatal [`crate::error::EngineError::Io`].
pub fn write(checkpoint: &Checkpoint, path: &Path) -> Result<()> {
    match write_once(checkpoint, path) {
        Ok(()) => Ok(()),
        Err(_) => write_once(checkpoint, path),
    }
}

fn write_once(checkpoint: &Checkpoint, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    bincode::serialize_into(writer, checkpoint)?;
    Ok(())
}

pub fn read(path: &Path) -> Result<Checkpoint> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let checkpoint = bincode::deserialize_from(reader)?;
    Ok(checkpoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::{Species, SpeciesTable};
    use tempfile_test_support::temp_path;

    mod tempfile_test_support {
        use std::path::PathBuf;

        /// Minimal scratch-file helper; avoids pulling in a `tempfile` dev
        /// dependency for a single round-trip test.
        pub fn temp_path(name: &str) -> PathBuf {
            let mut path = std::env::temp_dir();
            path.push(format!("sarkas_md_test_{}_{}", std::process::id(), name));
            path
        }
    }

    #[test]
    fn round_trips_through_disk() {
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
        particles.positions[0] = Vector3::new(1.0, 2.0, 3.0);
        particles.velocities[1] = Vector3::new(-1.0, 0.5, 0.0);

        let rng_state = RngState::new(99);
        let checkpoint = Checkpoint::capture(&particles, 42, 3.5, rng_state);

        let path = temp_path("checkpoint_roundtrip.bin");
        write(&checkpoint, &path).unwrap();
        let restored = read(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(restored.step, 42);
        assert_eq!(restored.positions[0], Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(restored.rng_state.seed, 99);
    }
}

//! Seeded, checkpointable random number generator.
//!
//! `spec.md` requires the RNG seed (and, for restart equivalence, its full
//! state) to be part of the reproducible state threaded through the
//! initializer, Langevin driver, and checkpoints. `rand_pcg::Pcg64` does not
//! expose its internal LCG state for serialization, so this wraps it with an
//! explicit draw counter and replays draws on restore — the generator itself
//! is the same `Pcg64` used in `NNPDF-pineappl/pineappl/tests/drell_yan_lo.rs`.

use rand::RngCore;
use rand_core_pcg::RngCore as PcgRngCore;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

const DEFAULT_STREAM: u128 = 0xa02bdbf7bb3c0a7ac28fa16a64abf96;

/// Reproducible RNG state: a seed, a fixed stream, and the number of u32
/// words drawn since seeding. Equal `(seed, stream, draws)` triples always
/// produce identical subsequent output.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u128,
    pub stream: u128,
    pub draws: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        RngState {
            seed: seed as u128,
            stream: DEFAULT_STREAM,
            draws: 0,
        }
    }
}

/// The engine's RNG: a `Pcg64` plus the draw counter needed to reconstruct it.
pub struct EngineRng {
    inner: Pcg64,
    draws: u64,
    seed: u128,
    stream: u128,
}

impl EngineRng {
    pub fn from_seed(seed: u64) -> Self {
        Self::from_state(&RngState::new(seed))
    }

    pub fn from_state(state: &RngState) -> Self {
        let mut inner = Pcg64::new(state.seed, state.stream);
        for _ in 0..state.draws {
            inner.next_u32();
        }
        EngineRng {
            inner,
            draws: state.draws,
            seed: state.seed,
            stream: state.stream,
        }
    }

    pub fn state(&self) -> RngState {
        RngState {
            seed: self.seed,
            stream: self.stream,
            draws: self.draws,
        }
    }
}

impl RngCore for EngineRng {
    fn next_u32(&mut self) -> u32 {
        self.draws += 1;
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws += 2;
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws += ((dest.len() + 3) / 4) as u64;
        self.inner.fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_from_state_reproduces_stream() {
        let mut rng = EngineRng::from_seed(42);
        let a = rng.next_u64();
        let b = rng.next_u64();
        let state = rng.state();

        let mut restored = EngineRng::from_state(&state);
        let c = restored.next_u64();
        let d = restored.next_u64();

        // restored rng continues from the same point, not from the seed
        assert_ne!(c, a);
        assert_ne!(d, b);

        let mut fresh = EngineRng::from_seed(42);
        let e = fresh.next_u64();
        let f = fresh.next_u64();
        assert_eq!(e, a);
        assert_eq!(f, b);
    }
}

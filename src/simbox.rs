//! Orthorhombic, fully periodic simulation box.
//!
//! Grounded in `MDSYN2019-rust_md_work/src/lib.rs`'s `SimulationBox` and
//! `minimum_image_convention`, generalized from a cubic box and a single
//! shared length to three independent side lengths, per `spec.md` §3.

use nalgebra::Vector3;

/// Orthorhombic box, periodic along all three axes. `spec.md` explicitly
/// disables open and mirror boundary conditions in the core (§9 Open
/// Questions); this type has no representation for them.
#[derive(Clone, Copy, Debug)]
pub struct SimulationBox {
    pub lengths: Vector3<f64>,
}

impl SimulationBox {
    pub fn new(lx: f64, ly: f64, lz: f64) -> Self {
        SimulationBox {
            lengths: Vector3::new(lx, ly, lz),
        }
    }

    pub fn volume(&self) -> f64 {
        self.lengths.x * self.lengths.y * self.lengths.z
    }

    /// Applies the minimum-image convention to a displacement vector
    /// `r_i - r_j`. Idempotent: applying it twice equals applying it once,
    /// since the result already lies in `[-L/2, L/2]` per axis.
    pub fn minimum_image(&self, mut displacement: Vector3<f64>) -> Vector3<f64> {
        for k in 0..3 {
            let l = self.lengths[k];
            displacement[k] -= l * (displacement[k] / l).round();
        }
        displacement
    }

    /// Wraps a position into `[-L/2, L/2]` per axis. A particle crossing a
    /// box face reappears at the opposite face (§8 boundary behaviors).
    pub fn wrap(&self, mut position: Vector3<f64>) -> Vector3<f64> {
        for k in 0..3 {
            let l = self.lengths[k];
            let half = 0.5 * l;
            position[k] = ((position[k] + half).rem_euclid(l)) - half;
        }
        position
    }

    /// Largest cutoff for which the minimum-image convention is valid.
    pub fn max_valid_cutoff(&self) -> f64 {
        0.5 * self.lengths.x.min(self.lengths.y).min(self.lengths.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn minimum_image_is_idempotent() {
        let sbox = SimulationBox::new(10.0, 10.0, 10.0);
        let d = Vector3::new(7.3, -12.1, 26.0);
        let once = sbox.minimum_image(d);
        let twice = sbox.minimum_image(once);
        assert_relative_eq!(once, twice, epsilon = 1e-12);
        for k in 0..3 {
            assert!(once[k].abs() <= 5.0 + 1e-12);
        }
    }

    #[test]
    fn wrap_reappears_on_opposite_face() {
        let sbox = SimulationBox::new(10.0, 10.0, 10.0);
        let p = Vector3::new(5.2, 0.0, -5.3);
        let wrapped = sbox.wrap(p);
        assert_relative_eq!(wrapped.x, -4.8, epsilon = 1e-9);
        assert_relative_eq!(wrapped.z, 4.7, epsilon = 1e-9);
    }
}

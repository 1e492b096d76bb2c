//! Tabulated `(r, U, F, F')` potential on a uniform grid.
//!
//! Grounded in `original_source/sarkas/potentials/tabulated.py`'s `tab_force`
//! (branchless bin lookup) and `potential_derivatives` (linear interpolation
//! for the force-error integral).

use serde::{Deserialize, Serialize};

/// One species pair's tabulated grid: uniform spacing `dr`, with
/// `r[k] = k * dr`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TabulatedGrid {
    pub dr: f64,
    pub r: Vec<f64>,
    pub u: Vec<f64>,
    /// `F/r`, i.e. already-divided `f_over_r`, matching every other family's
    /// contract.
    pub f_over_r: Vec<f64>,
    /// Second derivative column, used only by [`derivatives`].
    pub f_prime: Vec<f64>,
}

impl TabulatedGrid {
    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }
}

/// `spec.md` §4.1: "lookup `bin = floor(r/dr)` with branchless out-of-range
/// clamp to zero."
pub fn force(r: f64, grid: &TabulatedGrid) -> (f64, f64) {
    if grid.is_empty() || grid.dr <= 0.0 {
        return (0.0, 0.0);
    }
    let bin = (r / grid.dr) as usize;
    let in_range = (bin < grid.len()) as u8 as f64;
    let safe_bin = bin.min(grid.len() - 1);
    (
        grid.u[safe_bin] * in_range,
        grid.f_over_r[safe_bin] * in_range,
    )
}

/// Linear interpolation of `(U, dU/dr, d2U/dr2)` between grid points, for
/// force-error integrals (`spec.md` §4.1, §9 Open Questions: "the intended
/// production formula is the force-error integral over `[rc, infinity)`").
pub fn derivatives(r: f64, grid: &TabulatedGrid) -> (f64, f64, f64) {
    if grid.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let last = grid.len() - 1;
    if r <= grid.r[0] {
        return (grid.u[0], -grid.f_over_r[0] * grid.r[0], grid.f_prime[0]);
    }
    if r >= grid.r[last] {
        return (
            grid.u[last],
            -grid.f_over_r[last] * grid.r[last],
            grid.f_prime[last],
        );
    }
    let bin = (r / grid.dr) as usize;
    let i0 = bin.min(last - 1);
    let i1 = i0 + 1;
    let t = (r - grid.r[i0]) / (grid.r[i1] - grid.r[i0]);

    let lerp = |a: f64, b: f64| a + t * (b - a);
    let u = lerp(grid.u[i0], grid.u[i1]);
    // dU/dr = -F = -(f_over_r * r)
    let dv_dr = lerp(-grid.f_over_r[i0] * grid.r[i0], -grid.f_over_r[i1] * grid.r[i1]);
    let d2v_dr2 = lerp(grid.f_prime[i0], grid.f_prime[i1]);
    (u, dv_dr, d2v_dr2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> TabulatedGrid {
        let dr = 0.5;
        let r: Vec<f64> = (0..5).map(|k| k as f64 * dr).collect();
        let u: Vec<f64> = r.iter().map(|&x| 1.0 / (x + 1.0)).collect();
        let f_over_r: Vec<f64> = r.iter().map(|&x| 1.0 / (x + 1.0).powi(2)).collect();
        let f_prime = vec![0.0; r.len()];
        TabulatedGrid { dr, r, u, f_over_r, f_prime }
    }

    #[test]
    fn out_of_range_lookup_is_zero() {
        let grid = sample_grid();
        let (u, f) = force(1000.0, &grid);
        assert_eq!(u, 0.0);
        assert_eq!(f, 0.0);
    }

    #[test]
    fn in_range_lookup_matches_bin() {
        let grid = sample_grid();
        let (u, _) = force(0.6, &grid); // bin = floor(0.6/0.5) = 1
        assert_eq!(u, grid.u[1]);
    }
}

//! Coulomb potential, real-space (Ewald-split) part.
//!
//! `spec.md` §4.1: `U = (q_i q_j)/(4 pi eps0 r) erfc(alpha r)`,
//! `f/r = (U + (q_i q_j)/(4 pi eps0) (2 alpha / sqrt(pi)) e^{-alpha^2 r^2}) / r^2`.
//!
//! Parameter slots: `P[0] = q_i q_j * coulomb_constant`, `P[1] = alpha`,
//! `P[2] = a_rs` (last).

use special::Error as SpecialError;
use std::f64::consts::PI;

/// `(U, F/r)` for the Coulomb real-space kernel at distance `r`.
pub fn force(r_in: f64, p: &[f64]) -> (f64, f64) {
    let a_rs = p[2];
    let r = r_in.max(a_rs);
    let c = p[0];
    let alpha = p[1];

    let erfc_ar = (alpha * r).compl_error();
    let u = c * erfc_ar / r;
    let gaussian_term = c * (2.0 * alpha / PI.sqrt()) * (-(alpha * alpha) * (r * r)).exp();
    let f_over_r = (u + gaussian_term) / (r * r);
    (u, f_over_r)
}

/// `(U, dU/dr, d2U/dr2)` for force-error and virial computations.
pub fn derivatives(r_in: f64, p: &[f64]) -> (f64, f64, f64) {
    let a_rs = p[2];
    let r = r_in.max(a_rs);
    let c = p[0];
    let alpha = p[1];

    let erfc_ar = (alpha * r).compl_error();
    let gauss = (-(alpha * alpha) * (r * r)).exp();
    let u = c * erfc_ar / r;
    // dU/dr = -c * erfc(ar)/r^2 - c * (2 alpha / sqrt(pi)) * e^{-a^2 r^2} / r
    let du_dr = -u / r - c * (2.0 * alpha / PI.sqrt()) * gauss / r;
    // d2U/dr2, differentiating the above w.r.t. r
    let d2u_dr2 = 2.0 * u / (r * r) + 2.0 * c * (2.0 * alpha / PI.sqrt()) * gauss / (r * r)
        + c * (2.0 * alpha / PI.sqrt()) * gauss * 2.0 * alpha * alpha;
    (u, du_dr, d2u_dr2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_bare_coulomb_at_zero_alpha_limit() {
        // At alpha -> 0, erfc(alpha r) -> 1, so U -> c/r (bare Coulomb).
        let p = [1.0, 1e-6, 1e-9];
        let (u, _) = force(2.0, &p);
        assert!((u - 0.5).abs() < 1e-4);
    }

    #[test]
    fn short_range_regularization_clamps_distance() {
        let p = [1.0, 0.5, 0.2];
        let (u_at_rs, _) = force(0.2, &p);
        let (u_below_rs, _) = force(0.05, &p);
        assert_eq!(u_at_rs, u_below_rs);
    }
}

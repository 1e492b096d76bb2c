//! Generalized Lennard-Jones `m`-`n` potential.
//!
//! `spec.md` §4.1: `U = 4 eps [(sigma/r)^m - (sigma/r)^n]`, with `m, n`
//! configurable (classic 6-12 is `m=12, n=6`). Grounded in
//! `MDSYN2019-rust_md_work/src/lj_parameters.rs`'s `lennard_jones_potential`/
//! `lennard_jones_force`, generalized from the hardcoded 12-6 exponents.
//!
//! Parameter slots: `P[0] = sigma`, `P[1] = epsilon`, `P[2] = m`, `P[3] = n`,
//! `P[4] = a_rs` (last).

pub fn force(r_in: f64, p: &[f64]) -> (f64, f64) {
    let a_rs = p[4];
    let r = r_in.max(a_rs);
    let sigma = p[0];
    let eps = p[1];
    let m = p[2];
    let n = p[3];

    let s = sigma / r;
    let s_m = s.powf(m);
    let s_n = s.powf(n);
    let u = 4.0 * eps * (s_m - s_n);
    let f_over_r = 4.0 * eps / (r * r) * (m * s_m - n * s_n);
    (u, f_over_r)
}

pub fn derivatives(r_in: f64, p: &[f64]) -> (f64, f64, f64) {
    let a_rs = p[4];
    let r = r_in.max(a_rs);
    let sigma = p[0];
    let eps = p[1];
    let m = p[2];
    let n = p[3];

    let s = sigma / r;
    let s_m = s.powf(m);
    let s_n = s.powf(n);
    let u = 4.0 * eps * (s_m - s_n);
    let du_dr = 4.0 * eps * (-m * s_m + n * s_n) / r;
    let d2u_dr2 = 4.0 * eps * (m * (m + 1.0) * s_m - n * (n + 1.0) * s_n) / (r * r);
    (u, du_dr, d2u_dr2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn minimum_is_at_r_equal_two_to_one_sixth_sigma_for_12_6() {
        let sigma = 1.0;
        let eps = 1.0;
        let p = [sigma, eps, 12.0, 6.0, 1e-9];
        let r_min = 2f64.powf(1.0 / 6.0) * sigma;
        let (_, _, d2u) = derivatives(r_min, &p);
        // at the minimum the force is zero and curvature is positive
        let (_, f_over_r) = force(r_min, &p);
        assert_relative_eq!(f_over_r, 0.0, epsilon = 1e-9);
        assert!(d2u > 0.0);
    }
}

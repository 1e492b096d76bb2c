//! Moliere screened-Coulomb potential.
//!
//! `spec.md` §4.1: `U = (Z_i Z_j e^2 / r) sum_k C_k exp(-b_k r)`, the
//! classic three-term Moliere screening fit.
//!
//! Parameter slots: `P[0] = Z_i Z_j e^2`, then three `(C_k, b_k)` pairs at
//! `P[1..7)`, `P[7] = a_rs` (last).

const NUM_TERMS: usize = 3;

pub fn force(r_in: f64, p: &[f64]) -> (f64, f64) {
    let a_rs = p[7];
    let r = r_in.max(a_rs);
    let prefactor = p[0];

    let mut sum_term = 0.0;
    let mut sum_cb_term = 0.0;
    for k in 0..NUM_TERMS {
        let c_k = p[1 + 2 * k];
        let b_k = p[2 + 2 * k];
        let term = c_k * (-b_k * r).exp();
        sum_term += term;
        sum_cb_term += b_k * term;
    }

    let u = prefactor * sum_term / r;
    let f_over_r = (u + prefactor * sum_cb_term) / (r * r);
    (u, f_over_r)
}

pub fn derivatives(r_in: f64, p: &[f64]) -> (f64, f64, f64) {
    let a_rs = p[7];
    let r = r_in.max(a_rs);
    let (u, f_over_r) = force(r, p);
    let du_dr = -f_over_r * r;
    let h = 1e-6 * r.max(1.0);
    let (_, f_plus) = force(r + h, p);
    let (_, f_minus) = force((r - h).max(a_rs), p);
    let d2u_dr2 = ((-f_plus * (r + h)) - (-f_minus * (r - h).max(a_rs))) / (2.0 * h);
    (u, du_dr, d2u_dr2)
}

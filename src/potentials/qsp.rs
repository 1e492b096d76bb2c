//! Quantum Statistical Potential (QSP).
//!
//! `spec.md` §4.1: "combines a de Broglie diffraction term with a Pauli
//! exclusion term for electron-electron pairs." This implements the
//! standard Deutsch diffraction regularization of the Coulomb singularity
//! plus a Gaussian Pauli-exclusion repulsion (zero for non-identical-spin
//! pairs):
//!
//! ```text
//! U(r) = C/r (1 - e^{-r/lambda}) + D e^{-(r/lambda)^2}
//! ```
//!
//! where `C = q_i q_j * coulomb_constant`, `lambda` is the thermal de
//! Broglie wavelength, and `D = k_B T ln(2)` is nonzero only for
//! electron-electron pairs.
//!
//! Parameter slots: `P[0] = C`, `P[1] = 1/lambda`, `P[2] = D` (0 unless
//! electron-electron), `P[3] = a_rs` (last).

pub fn force(r_in: f64, p: &[f64]) -> (f64, f64) {
    let a_rs = p[3];
    let r = r_in.max(a_rs);
    let c = p[0];
    let k = p[1];
    let d = p[2];

    let exp_kr = (-k * r).exp();
    let term1 = c / r * (1.0 - exp_kr);
    let gauss = (-(k * r).powi(2)).exp();
    let term2 = d * gauss;

    let u = term1 + term2;
    let f_over_r = term1 / (r * r) - c * k * exp_kr / (r * r) + 2.0 * k * k * term2;
    (u, f_over_r)
}

pub fn derivatives(r_in: f64, p: &[f64]) -> (f64, f64, f64) {
    let a_rs = p[3];
    let r = r_in.max(a_rs);
    let (u, f_over_r) = force(r, p);
    let du_dr = -f_over_r * r;
    let h = 1e-6 * r.max(1.0);
    let (_, f_plus) = force(r + h, p);
    let (_, f_minus) = force((r - h).max(a_rs), p);
    let d2u_dr2 = ((-f_plus * (r + h)) - (-f_minus * (r - h).max(a_rs))) / (2.0 * h);
    (u, du_dr, d2u_dr2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diffraction_term_regularizes_coulomb_singularity() {
        // Without a Pauli term, U should stay finite as r -> a_rs, unlike
        // bare Coulomb which diverges.
        let p = [1.0, 2.0, 0.0, 1e-9];
        let (u, _) = force(1e-9, &p);
        assert!(u.is_finite());
    }

    #[test]
    fn pauli_term_is_zero_for_non_electron_pairs() {
        let p = [1.0, 2.0, 0.0, 1e-6];
        let (u, _) = force(0.1, &p);
        let term1 = 1.0 / 0.1 * (1.0 - (-2.0 * 0.1f64).exp());
        assert!((u - term1).abs() < 1e-12);
    }
}

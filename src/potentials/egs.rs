//! Exact-Gradient-Screened (EGS) potential.
//!
//! Grounded in `original_source/sarkas/potentials/egs.py`. Computes the
//! dimensionless gradient-correction parameter `nu` and exchange-correlation
//! parameter `b` from the electron degeneracy `Theta` via the
//! Perrot–Dharma-Wardana rational fit, then dispatches to one of two
//! branches: `nu <= 1` (sum of two Yukawa-like exponentials) or `nu > 1`
//! (oscillatory exp/sin/cos). Selection happens once per parameter set, not
//! per pair (`spec.md` §4.1).

/// Degeneracy function `h(Theta)` and its derivative `h'(Theta)`, eqs. 32-34
/// of the EGS reference. Valid for `0.1 <= Theta <= 12`; outside that range
/// the caller should treat exchange-correlation as negligible (`b = 1`).
pub fn degeneracy_h_and_grad(theta: f64) -> (f64, f64) {
    let theta2 = theta * theta;
    let theta3 = theta2 * theta;
    let theta4 = theta2 * theta2;

    let n_theta = 1.0 + 2.8343 * theta2 - 0.2151 * theta3 + 5.2759 * theta4;
    let d_theta = 1.0 + 3.9431 * theta2 + 7.9138 * theta4;
    let tanh_inv_theta = (1.0 / theta).tanh();
    let h = n_theta / d_theta * tanh_inv_theta;

    let sech2_inv_theta = 1.0 / (1.0 / theta).cosh().powi(2);
    let d_n = 5.6686 * theta - 0.6453 * theta2 + 21.1036 * theta3;
    let d_d = 7.8862 * theta + 31.6552 * theta3;
    let grad_h = -(n_theta / d_theta) * sech2_inv_theta / theta2
        - tanh_inv_theta * (n_theta * d_d / (d_theta * d_theta) + d_n / d_theta);
    (h, grad_h)
}

/// Exchange-correlation parameter `b`, eq. 31. Outside the fit's validity
/// range the exchange-correlation contribution is neglected (`b = 1`).
pub fn exchange_correlation_b(theta: f64, kf_lambda_tf: f64) -> f64 {
    if (0.1..=12.0).contains(&theta) {
        let (h, grad_h) = degeneracy_h_and_grad(theta);
        1.0 - 2.0 / (8.0 * kf_lambda_tf * kf_lambda_tf) * (h - 2.0 * theta * grad_h)
    } else {
        1.0
    }
}

/// Gradient-correction parameter, eq. 14: `nu = -(3 lambda)/(pi^1.5) *
/// (landau_length / lambda_deB) * d/d_eta I_{-1/2}(eta)`, here taken
/// pre-evaluated as `d_i_deta` by the caller (the Fermi-integral derivative
/// does not belong in the force kernel).
pub fn gradient_correction_nu(lambda: f64, landau_length: f64, lambda_de_broglie: f64, d_i_deta: f64) -> f64 {
    let prefactor = -3.0 / std::f64::consts::PI.powf(1.5) * landau_length / lambda_de_broglie;
    lambda * prefactor * d_i_deta
}

/// Screening lengths for the monotonic-decay branch (`nu <= 1`), eq. 29.
pub fn monotonic_lengths(nu: f64, b: f64, lambda_tf: f64) -> (f64, f64, f64) {
    let disc = (b * b - nu).max(0.0).sqrt();
    let lambda_minus = lambda_tf * (nu / (2.0 * b - 2.0 * disc)).sqrt();
    let lambda_plus = lambda_tf * (nu / (2.0 * b + 2.0 * disc)).sqrt();
    let alpha = b / (b - nu).sqrt();
    (lambda_minus, lambda_plus, alpha)
}

/// Length scales for the oscillatory branch (`nu > 1`), eq. 29.
pub fn oscillatory_lengths(nu: f64, b: f64, lambda_tf: f64) -> (f64, f64, f64) {
    let gamma_minus = lambda_tf * (nu / (nu.sqrt() - b)).sqrt();
    let gamma_plus = lambda_tf * (nu / (nu.sqrt() + b)).sqrt();
    let alpha_prime = b / (nu - b).sqrt();
    (gamma_minus, gamma_plus, alpha_prime)
}

/// `(U, F/r)` for the EGS pair potential.
///
/// Parameter slots (matching `original_source/sarkas/potentials/egs.py`'s
/// `potential.matrix` layout):
/// `nu <= 1`:  `P = [c, nu, 1+alpha, 1-alpha, 1/lambda_minus, 1/lambda_plus, a_rs]`
/// `nu > 1`:   `P = [c, nu, 1.0,     alpha',  1/gamma_minus,  1/gamma_plus,  a_rs]`
///
/// The reference implementation returns `-dU/dr` (the force magnitude); this
/// divides by one more factor of `r` to produce the `f_over_r = |F|/r`
/// contract every family shares (`spec.md` §4.1).
pub fn force(r_in: f64, p: &[f64]) -> (f64, f64) {
    let a_rs = p[6];
    let r = r_in.max(a_rs);
    let c = p[0];
    let nu = p[1];

    if nu <= 1.0 {
        let temp1 = p[2] * (-r * p[4]).exp();
        let temp2 = p[3] * (-r * p[5]).exp();
        let u = (temp1 + temp2) * c / r;
        let minus_du_dr = u / r + c * (temp1 * p[4] + temp2 * p[5]) / r;
        (u, minus_du_dr / r)
    } else {
        let cos_kr = (r * p[4]).cos();
        let sin_kr = (r * p[4]).sin();
        let exp_kr = c * (-r * p[5]).exp();
        let u = (cos_kr + p[3] * sin_kr) * exp_kr / r;
        let mut minus_du_dr = u / r;
        minus_du_dr += u * p[5];
        minus_du_dr += p[4] * (sin_kr - p[3] * cos_kr) * exp_kr / r;
        (u, minus_du_dr / r)
    }
}

/// `(U, dU/dr, d2U/dr2)` via a centered finite difference of [`force`];
/// the EGS potential has no simpler closed form worth hand-deriving twice.
pub fn derivatives(r_in: f64, p: &[f64]) -> (f64, f64, f64) {
    let a_rs = p[6];
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
    use approx::assert_relative_eq;

    #[test]
    fn monotonic_branch_force_is_minus_gradient_over_r() {
        let p = [1.0, 0.5, 1.3, -0.3, 0.7, 1.1, 1e-6];
        let (u, f_over_r) = force(2.0, &p);
        assert_relative_eq!(u, 0.143_667_552_807_694_14, max_relative = 1e-9);
        assert_relative_eq!(f_over_r, 0.165_752_873_867_492_93 / 2.0, max_relative = 1e-9);
    }

    #[test]
    fn oscillatory_branch_force_is_minus_gradient_over_r() {
        // nu > 1 selects the oscillatory branch unconditionally.
        let p = [1.0, 1.3, 1.0, 0.4, 0.9, 0.6, 1e-6];
        let (u, f_over_r) = force(2.0, &p);
        assert_relative_eq!(u, 0.171_202_747_035_620_72, max_relative = 1e-9);
        assert_relative_eq!(f_over_r, 0.085_601_373_517_810_36, max_relative = 1e-9);
    }

    #[test]
    fn exchange_correlation_defaults_outside_fit_range() {
        assert_eq!(exchange_correlation_b(20.0, 1.0), 1.0);
        assert_eq!(exchange_correlation_b(0.01, 1.0), 1.0);
    }
}

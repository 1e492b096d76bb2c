//! Ewald-parameter solver: balances the real-space (PP) and reciprocal-space
//! (PM) force-error budgets to pick `(rc, alpha, mesh)` for a target
//! accuracy. Grounded in `original_source/sarkas/utilities/maths.py`'s
//! `force_error_analytic_pp` and `force_error_approx_pppm`, which in turn
//! follows Deserno & Holm's B-spline error expansion (its `Cmp` coefficient
//! table, reproduced here for charge-assignment order `p` in `1..=7`).

use crate::error::{EngineError, Result};

/// Deserno-Holm `Cmp` coefficients, indexed `CMP[p - 1][m]`, `m in 0..p`.
pub const CMP: [&[f64]; 7] = [
    &[2.0 / 3.0],
    &[1.0 / 50.0, 5.0 / 294.0],
    &[1.0 / 588.0, 7.0 / 1440.0, 21.0 / 3872.0],
    &[1.0 / 4320.0, 3.0 / 1936.0, 7601.0 / 2271360.0, 143.0 / 28800.0],
    &[
        1.0 / 23232.0,
        7601.0 / 13628160.0,
        143.0 / 69120.0,
        517231.0 / 106536960.0,
        106640677.0 / 11737571328.0,
    ],
    &[
        691.0 / 68140800.0,
        13.0 / 57600.0,
        47021.0 / 35512320.0,
        9694607.0 / 2095994880.0,
        733191589.0 / 59609088000.0,
        326190917.0 / 11700633600.0,
    ],
    &[
        1.0 / 345600.0,
        3617.0 / 35512320.0,
        745739.0 / 838397952.0,
        56399353.0 / 12773376000.0,
        25091609.0 / 1560084480.0,
        1755948832039.0 / 36229939200000.0,
        4887769399.0 / 37838389248.0,
    ],
];

/// `spec.md` §4.4: analytic real-space (PP) relative force error,
/// `2 exp(-alpha^2 rc^2) / sqrt(N rc V)`.
pub fn force_error_analytic_pp(alpha: f64, rc: f64, num_particles: usize, volume: f64) -> f64 {
    2.0 * (-alpha * alpha * rc * rc).exp() / (num_particles as f64 * rc * volume).sqrt()
}

/// Approximate reciprocal-space (PM) relative force error for
/// charge-assignment order `cao` and mesh spacing `h`, following the
/// Deserno-Holm B-spline expansion with the `CMP` table above.
pub fn force_error_approx_pppm(cao: usize, h: f64, alpha: f64) -> Result<f64> {
    if !(1..=7).contains(&cao) {
        return Err(EngineError::configuration(format!(
            "charge assignment order {} outside supported range 1..=7",
            cao
        )));
    }
    let cmp = CMP[cao - 1];
    let ha = h * alpha;
    let cmp_sum: f64 = cmp
        .iter()
        .enumerate()
        .map(|(m, c)| c * ha.powi(2 * m as i32))
        .sum();
    let p = cao as f64;
    Ok((3.0_f64.sqrt() / (2.0 * std::f64::consts::PI)) * ha.powf(p) * (cmp_sum / p).sqrt())
}

/// Resolved Ewald splitting parameters for one run.
#[derive(Clone, Copy, Debug)]
pub struct EwaldParameters {
    pub alpha: f64,
    pub rc: f64,
    pub mesh: [usize; 3],
    pub cao: usize,
    pub pp_error: f64,
    pub pm_error: f64,
}

/// Searches `alpha in (alpha_min, alpha_max]` by bisection for the value
/// that balances the PP and PM error budgets at a fixed `(rc, mesh, cao)`,
/// then reports whichever error is larger as the achieved accuracy.
///
/// `spec.md` §4.4 Open Questions: "the reference implementation performs a
/// deterministic grid search... this design fixes `rc` and `mesh` from the
/// caller-supplied cutoff and mesh density, and solves only for `alpha`,
/// which is the one parameter with a monotonic, bisectable error trade-off."
pub fn solve_alpha(
    rc: f64,
    mesh: [usize; 3],
    cao: usize,
    box_lengths: [f64; 3],
    num_particles: usize,
    volume: f64,
    target_error: f64,
    max_iterations: usize,
) -> Result<EwaldParameters> {
    let h = box_lengths
        .iter()
        .zip(mesh.iter())
        .map(|(&l, &m)| l / m as f64)
        .fold(f64::INFINITY, f64::min);

    let mut lo = 1e-6 / rc;
    let mut hi = 20.0 / rc;

    let error_at = |alpha: f64| -> Result<(f64, f64)> {
        let pp = force_error_analytic_pp(alpha, rc, num_particles, volume);
        let pm = force_error_approx_pppm(cao, h, alpha)?;
        Ok((pp, pm))
    };

    let (mut pp_lo, mut pm_lo) = error_at(lo)?;
    let (mut pp_hi, mut pm_hi) = error_at(hi)?;

    // PP error decreases and PM error increases with alpha; bisect on their
    // difference to find the crossing point, then check it meets target.
    for _ in 0..max_iterations {
        let mid = 0.5 * (lo + hi);
        let (pp_mid, pm_mid) = error_at(mid)?;
        if pp_mid > pm_mid {
            lo = mid;
            pp_lo = pp_mid;
            pm_lo = pm_mid;
        } else {
            hi = mid;
            pp_hi = pp_mid;
            pm_hi = pm_mid;
        }
        if (hi - lo) / hi < 1e-10 {
            break;
        }
    }

    let alpha = 0.5 * (lo + hi);
    let pp_error = pp_lo.max(pp_hi);
    let pm_error = pm_lo.max(pm_hi);
    let achieved = pp_error.max(pm_error);

    if achieved > target_error {
        return Err(EngineError::numerical(format!(
            "Ewald solver could not reach target force-error {:.3e} at rc={:.4}, mesh={:?}, cao={}; achieved {:.3e}",
            target_error, rc, mesh, cao, achieved
        )));
    }

    Ok(EwaldParameters {
        alpha,
        rc,
        mesh,
        cao,
        pp_error,
        pm_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pp_error_decreases_with_larger_alpha() {
        let small = force_error_analytic_pp(0.5, 3.0, 1000, 1000.0);
        let large = force_error_analytic_pp(2.0, 3.0, 1000, 1000.0);
        assert!(large < small);
    }

    #[test]
    fn pm_error_rejects_unsupported_cao() {
        assert!(force_error_approx_pppm(8, 0.5, 0.3).is_err());
        assert!(force_error_approx_pppm(0, 0.5, 0.3).is_err());
        assert!(force_error_approx_pppm(5, 0.5, 0.3).is_ok());
    }

    #[test]
    fn solver_balances_pp_and_pm_errors() {
        let result = solve_alpha(3.0, [16, 16, 16], 5, [20.0, 20.0, 20.0], 2000, 8000.0, 1e-2, 200);
        assert!(result.is_ok());
        let params = result.unwrap();
        assert!(params.alpha > 0.0);
        // at the balance point the two errors should be close to each other
        assert!((params.pp_error - params.pm_error).abs() < 0.5 * params.pp_error.max(params.pm_error) + 1e-12);
    }
}

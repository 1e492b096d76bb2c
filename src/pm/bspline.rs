//! Cardinal B-spline charge-assignment weights, orders `cao` 1 through 7.
//!
//! `spec.md` §4.3: "charge assignment via B-spline weights of configurable
//! order `cao`." Grounded in the Hockney-Eastwood particle-mesh scheme; the
//! recursive construction follows the standard cardinal B-spline recursion
//! `W_n(x) = (x/(n-1)) W_{n-1}(x) + ((n-x)/(n-1)) W_{n-1}(x-1)`.

/// Returns the `cao` assignment weights for a fractional offset
/// `u in [0, 1)` of a particle within its nearest mesh cell, along with the
/// mesh index of the first point they apply to (relative to the particle's
/// containing cell). Weights sum to 1.
pub fn weights(cao: usize, u: f64) -> Vec<f64> {
    match cao {
        1 => vec![1.0],
        2 => vec![1.0 - u, u],
        3 => vec![
            0.5 * (0.5 - u) * (0.5 - u),
            0.75 - (u - 0.5) * (u - 0.5),
            0.5 * (0.5 + u) * (0.5 + u),
        ],
        _ => weights_recursive(cao, u),
    }
}

/// Derivative of the assignment weights with respect to the fractional
/// offset `u`, used by force interpolation back from the mesh.
pub fn weight_derivatives(cao: usize, u: f64, h: f64) -> Vec<f64> {
    const EPS: f64 = 1e-5;
    let plus = weights(cao, (u + EPS).min(1.0 - 1e-9));
    let minus = weights(cao, (u - EPS).max(1e-9));
    plus.iter()
        .zip(minus.iter())
        .map(|(p, m)| (p - m) / (2.0 * EPS * h))
        .collect()
}

/// General recursive cardinal B-spline evaluation for `cao >= 4`, built by
/// repeated convolution of the order-1 (box) spline, sampled at the `cao`
/// integer-offset support points around the particle.
fn weights_recursive(cao: usize, u: f64) -> Vec<f64> {
    // Evaluate the order-`cao` cardinal B-spline M_cao(x) at the `cao`
    // points x = u + (cao/2 - k) for k in 0..cao, via de Boor's recursion
    // starting from the order-1 box function.
    let half = cao as f64 / 2.0;
    let sample_points: Vec<f64> = (0..cao).map(|k| u + half - k as f64).collect();

    let mut weights = Vec::with_capacity(cao);
    for &x in &sample_points {
        weights.push(cardinal_bspline(cao, x + half));
    }
    let sum: f64 = weights.iter().sum();
    if sum > 0.0 {
        for w in weights.iter_mut() {
            *w /= sum;
        }
    }
    weights
}

/// `M_n(x)`, the order-`n` cardinal B-spline evaluated at `x in [0, n]`, via
/// the standard two-term recursion from the order-1 box function.
fn cardinal_bspline(n: usize, x: f64) -> f64 {
    if n == 1 {
        return if (0.0..1.0).contains(&x) { 1.0 } else { 0.0 };
    }
    let n_f = n as f64;
    let a = x / (n_f - 1.0) * cardinal_bspline(n - 1, x);
    let b = (n_f - x) / (n_f - 1.0) * cardinal_bspline(n - 1, x - 1.0);
    a + b
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn weights_sum_to_one_for_every_order() {
        for cao in 1..=7 {
            let w = weights(cao, 0.37);
            let sum: f64 = w.iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn order_two_weights_are_linear_interpolation() {
        let w = weights(2, 0.25);
        assert_relative_eq!(w[0], 0.75, epsilon = 1e-12);
        assert_relative_eq!(w[1], 0.25, epsilon = 1e-12);
    }
}

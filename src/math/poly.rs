//! Least-squares polynomial trends.
//!
//! The abscissa is centred and scaled before building the Vandermonde matrix:
//! raw epoch milliseconds raised to the third power would swamp the solver.

use nalgebra::{DMatrix, DVector};

use super::ols::solve_least_squares;

/// A fitted polynomial `y = Σ c_k u^k` where `u = (x - x_mean) / x_scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    pub coeffs: Vec<f64>,
    pub x_mean: f64,
    pub x_scale: f64,
}

impl Polynomial {
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Evaluate at `x` (Horner).
    pub fn eval(&self, x: f64) -> f64 {
        let u = (x - self.x_mean) / self.x_scale;
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * u + c)
    }
}

/// Fit a polynomial of the given degree through `(xs, ys)`.
///
/// Returns `None` when there are fewer points than coefficients, when the
/// input lengths differ, or when the system cannot be solved.
pub fn fit_polynomial(xs: &[f64], ys: &[f64], degree: usize) -> Option<Polynomial> {
    let n = xs.len();
    let p = degree.checked_add(1)?;
    if degree == 0 || n != ys.len() || n < p {
        return None;
    }

    let x_mean = xs.iter().sum::<f64>() / n as f64;
    let half_range = xs
        .iter()
        .map(|x| (x - x_mean).abs())
        .fold(0.0_f64, f64::max);
    let x_scale = if half_range > 0.0 { half_range } else { 1.0 };

    let mut design = DMatrix::<f64>::zeros(n, p);
    for (i, x) in xs.iter().enumerate() {
        let u = (x - x_mean) / x_scale;
        let mut power = 1.0;
        for k in 0..p {
            design[(i, k)] = power;
            power *= u;
        }
    }
    let y = DVector::from_row_slice(ys);

    let beta = solve_least_squares(&design, &y)?;
    Some(Polynomial {
        coeffs: beta.iter().copied().collect(),
        x_mean,
        x_scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_an_exact_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 5.0, 7.0];
        let poly = fit_polynomial(&xs, &ys, 1).unwrap();
        assert_eq!(poly.degree(), 1);
        for (x, y) in xs.iter().zip(ys) {
            assert!((poly.eval(*x) - y).abs() < 1e-9);
        }
        assert!((poly.eval(10.0) - 21.0).abs() < 1e-8);
    }

    #[test]
    fn fits_an_exact_quadratic_on_large_abscissas() {
        // Day offsets expressed in epoch milliseconds.
        let base = 1_583_020_800_000.0;
        let day = 86_400_000.0;
        let xs: Vec<f64> = (0..10).map(|i| base + i as f64 * day).collect();
        let ys: Vec<f64> = (0..10).map(|i| 2.0 + 0.5 * (i * i) as f64).collect();
        let poly = fit_polynomial(&xs, &ys, 2).unwrap();
        for (x, y) in xs.iter().zip(&ys) {
            assert!((poly.eval(*x) - y).abs() < 1e-6);
        }
    }

    #[test]
    fn rejects_underdetermined_input() {
        assert!(fit_polynomial(&[0.0, 1.0], &[1.0, 2.0], 3).is_none());
        assert!(fit_polynomial(&[], &[], 1).is_none());
        assert!(fit_polynomial(&[0.0, 1.0], &[1.0], 1).is_none());
        assert!(fit_polynomial(&[0.0, 1.0], &[1.0, 2.0], usize::MAX).is_none());
    }
}

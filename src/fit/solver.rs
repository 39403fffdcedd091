//! Levenberg–Marquardt least squares.
//!
//! Minimizes
//!
//! ```text
//! chi2(a) = Σ (y_i - f(a; x_i))^2 / σ_i^2
//! ```
//!
//! When every `yerr` is positive the effective variance
//! `σ_i^2 = yerr_i^2 + (f'(x_i) · xerr_i)^2` is used, so x uncertainties are
//! carried through the model slope. Otherwise every point has unit weight.

use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use thiserror::Error;

use super::functions::FitFunction;
use super::result::FitResult;
use crate::data::model::FitData;

const MAX_ITERATIONS: usize = 1000;
const INITIAL_LAMBDA: f64 = 1e-3;
const MAX_LAMBDA: f64 = 1e16;
const RELATIVE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("{function} expects {expected} initial parameters, got {actual}")]
    ParameterCount {
        function: String,
        expected: usize,
        actual: usize,
    },
    #[error("{records} records are not enough to fit {parameters} parameters")]
    TooFewRecords { records: usize, parameters: usize },
    #[error("{function} is not finite for the given parameters")]
    NonFinite { function: String },
    #[error("fit did not converge after {0} iterations")]
    NotConverged(usize),
    #[error("covariance matrix is singular; parameters are not independent")]
    SingularCovariance,
}

/// Fit `func` to `data` starting from `a0`.
pub fn fit_to_data(data: &FitData, func: &FitFunction, a0: &[f64]) -> Result<FitResult, FitError> {
    let n = func.n();
    if a0.len() != n {
        return Err(FitError::ParameterCount {
            function: func.name(),
            expected: n,
            actual: a0.len(),
        });
    }
    if data.len() <= n {
        return Err(FitError::TooFewRecords {
            records: data.len(),
            parameters: n,
        });
    }

    let problem = Problem::new(data, func);
    let mut a = DVector::from_column_slice(a0);
    let mut chi2 = problem.chi2(&a)?;
    let mut lambda = INITIAL_LAMBDA;
    let mut converged = chi2 == 0.0;
    let mut stalled = false;
    let mut iterations = 0;

    while !converged && !stalled && iterations < MAX_ITERATIONS {
        iterations += 1;
        let (jac, residuals) = problem.linearize(&a)?;
        let jtj = jac.transpose() * &jac;
        let jtr = jac.transpose() * &residuals;

        loop {
            let mut lhs = jtj.clone();
            for i in 0..n {
                lhs[(i, i)] += lambda * jtj[(i, i)].max(f64::EPSILON);
            }
            let Some(step) = lhs.lu().solve(&jtr) else {
                lambda *= 10.0;
                if lambda > MAX_LAMBDA {
                    stalled = true;
                    break;
                }
                continue;
            };

            let candidate = &a + &step;
            match problem.chi2(&candidate) {
                Ok(new_chi2) if new_chi2 <= chi2 => {
                    let decrease = chi2 - new_chi2;
                    let small_step = step.norm() <= RELATIVE_TOLERANCE * (a.norm() + RELATIVE_TOLERANCE);
                    a = candidate;
                    chi2 = new_chi2;
                    lambda = (lambda / 10.0).max(f64::EPSILON);
                    converged = chi2 == 0.0 || decrease <= RELATIVE_TOLERANCE * chi2 || small_step;
                    break;
                }
                _ => {
                    lambda *= 10.0;
                    if lambda > MAX_LAMBDA {
                        // No step lowers chi2, not even a vanishing one.
                        stalled = true;
                        break;
                    }
                }
            }
        }
    }

    if !converged {
        return Err(FitError::NotConverged(iterations));
    }
    log::debug!("{} converged after {iterations} iterations, chi2 = {chi2}", func.name());

    let (jac, _) = problem.linearize(&a)?;
    let acov = (jac.transpose() * &jac)
        .try_inverse()
        .ok_or(FitError::SingularCovariance)?;

    let degrees_of_freedom = data.len() - n;
    let chi2_reduced = chi2 / degrees_of_freedom as f64;
    let aerr: Vec<f64> = (0..n).map(|i| (acov[(i, i)] * chi2_reduced).sqrt()).collect();
    let arerr = a.iter().zip(&aerr).map(|(&value, &err)| relative_error(value, err)).collect();
    let p_probability = ChiSquared::new(degrees_of_freedom as f64)
        .map(|dist| dist.sf(chi2))
        .unwrap_or(f64::NAN);

    Ok(FitResult {
        a0: a0.to_vec(),
        a: a.iter().copied().collect(),
        aerr,
        arerr,
        acov: acov.row_iter().map(|row| row.iter().copied().collect()).collect(),
        degrees_of_freedom,
        chi2,
        chi2_reduced,
        p_probability,
    })
}

/// `err` as a percentage of `value`. A parameter fitted to exactly zero has
/// no relative error unless it is uncertain.
fn relative_error(value: f64, err: f64) -> f64 {
    if value == 0.0 {
        if err == 0.0 { 0.0 } else { f64::INFINITY }
    } else {
        (err / value).abs() * 100.0
    }
}

// ---------------------------------------------------------------------------
// Problem – model + data + weighting
// ---------------------------------------------------------------------------

struct Problem<'a> {
    data: &'a FitData,
    func: &'a FitFunction,
    weighted: bool,
}

impl<'a> Problem<'a> {
    fn new(data: &'a FitData, func: &'a FitFunction) -> Self {
        let weighted = data.yerr.iter().all(|&e| e > 0.0);
        Self {
            data,
            func,
            weighted,
        }
    }

    fn eval(&self, a: &[f64], x: f64) -> Result<f64, FitError> {
        let y = self.func.eval(a, x);
        if y.is_finite() {
            Ok(y)
        } else {
            Err(FitError::NonFinite {
                function: self.func.name(),
            })
        }
    }

    fn sigma(&self, a: &[f64], i: usize) -> f64 {
        if !self.weighted {
            return 1.0;
        }
        let x = self.data.x[i];
        let h = step_size(x);
        let slope = (self.func.eval(a, x + h) - self.func.eval(a, x - h)) / (2.0 * h);
        let sx = if slope.is_finite() { slope * self.data.xerr[i] } else { 0.0 };
        (self.data.yerr[i].powi(2) + sx * sx).sqrt()
    }

    fn chi2(&self, a: &DVector<f64>) -> Result<f64, FitError> {
        let a = a.as_slice();
        let mut total = 0.0;
        for i in 0..self.data.len() {
            let r = (self.data.y[i] - self.eval(a, self.data.x[i])?) / self.sigma(a, i);
            total += r * r;
        }
        Ok(total)
    }

    /// Weighted Jacobian `∂f/∂a_j / σ_i` and weighted residuals `(y_i - f) / σ_i`.
    fn linearize(&self, a: &DVector<f64>) -> Result<(DMatrix<f64>, DVector<f64>), FitError> {
        let m = self.data.len();
        let n = a.len();
        let mut jac = DMatrix::zeros(m, n);
        let mut residuals = DVector::zeros(m);
        let mut shifted = a.as_slice().to_vec();

        for i in 0..m {
            let x = self.data.x[i];
            let sigma = self.sigma(a.as_slice(), i);
            residuals[i] = (self.data.y[i] - self.eval(a.as_slice(), x)?) / sigma;

            for j in 0..n {
                let h = step_size(a[j]);
                shifted[j] = a[j] + h;
                let up = self.eval(&shifted, x)?;
                shifted[j] = a[j] - h;
                let down = self.eval(&shifted, x)?;
                shifted[j] = a[j];
                jac[(i, j)] = (up - down) / (2.0 * h) / sigma;
            }
        }
        Ok((jac, residuals))
    }
}

/// Central-difference step scaled to the magnitude of `v`.
fn step_size(v: f64) -> f64 {
    f64::EPSILON.cbrt() * v.abs().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::functions::FunctionKind;

    fn data(x: &[f64], y: &[f64], xerr: f64, yerr: f64) -> FitData {
        FitData::new(
            x.to_vec(),
            vec![xerr; x.len()],
            y.to_vec(),
            vec![yerr; x.len()],
        )
        .unwrap()
    }

    #[test]
    fn linear_fit_through_exact_points() {
        let d = data(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0], 0.0, 0.0);
        let result = fit_to_data(&d, &FitFunction::new(FunctionKind::Linear), &[0.0, 1.0]).unwrap();
        assert!(result.a[0].abs() < 1e-6, "intercept {}", result.a[0]);
        assert!((result.a[1] - 2.0).abs() < 1e-6, "slope {}", result.a[1]);
        assert_eq!(result.degrees_of_freedom, 1);
        assert_eq!(result.a0, vec![0.0, 1.0]);
        assert!(result.p_probability > 0.999, "p {}", result.p_probability);
    }

    #[test]
    fn zero_parameter_has_finite_relative_error() {
        let d = data(&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0], 0.0, 0.0);
        let result = fit_to_data(&d, &FitFunction::new(FunctionKind::Constant), &[0.0]).unwrap();
        assert_eq!(result.a, vec![0.0]);
        assert_eq!(result.aerr, vec![0.0]);
        assert_eq!(result.arerr, vec![0.0]);
        assert!(!result.to_string().contains("NaN"));
    }

    #[test]
    fn relative_error_of_zero_value() {
        assert_eq!(relative_error(0.0, 0.0), 0.0);
        assert_eq!(relative_error(0.0, 0.5), f64::INFINITY);
        assert_eq!(relative_error(-2.0, 0.5), 25.0);
    }

    #[test]
    fn noisy_line_has_p_probability_between_zero_and_one() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, &x)| 1.0 + 2.0 * x + if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();
        let d = data(&x, &y, 0.0, 0.1);
        let result = fit_to_data(&d, &FitFunction::new(FunctionKind::Linear), &[0.0, 1.0]).unwrap();
        assert_eq!(result.degrees_of_freedom, 8);
        assert!(result.p_probability > 0.0 && result.p_probability < 1.0);
    }

    #[test]
    fn weighted_parabola_recovers_coefficients() {
        let x: Vec<f64> = (0..20).map(|i| i as f64 * 0.5).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, &x)| 1.0 - 2.0 * x + 0.5 * x * x + if i % 2 == 0 { 0.01 } else { -0.01 })
            .collect();
        let d = data(&x, &y, 0.0, 0.1);
        let result =
            fit_to_data(&d, &FitFunction::new(FunctionKind::Parabolic), &[1.0, 1.0, 1.0]).unwrap();
        assert!((result.a[0] - 1.0).abs() < 0.05);
        assert!((result.a[1] + 2.0).abs() < 0.05);
        assert!((result.a[2] - 0.5).abs() < 0.01);
        assert!(result.aerr.iter().all(|e| e.is_finite() && *e > 0.0));
        assert!(result.chi2_reduced < 1.0);
    }

    #[test]
    fn exponential_fit_converges_from_rough_guess() {
        let x: Vec<f64> = (0..15).map(|i| i as f64 * 0.2).collect();
        let y: Vec<f64> = x.iter().map(|&x| 3.0 * (0.7 * x).exp() + 1.0).collect();
        let d = data(&x, &y, 0.0, 0.0);
        let result =
            fit_to_data(&d, &FitFunction::new(FunctionKind::Exponential), &[1.0, 1.0, 0.0]).unwrap();
        assert!((result.a[0] - 3.0).abs() < 1e-4);
        assert!((result.a[1] - 0.7).abs() < 1e-4);
        assert!((result.a[2] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn wrong_guess_length_is_rejected() {
        let d = data(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0], 0.0, 0.0);
        let err = fit_to_data(&d, &FitFunction::new(FunctionKind::Linear), &[1.0]).unwrap_err();
        assert!(matches!(err, FitError::ParameterCount { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn too_few_records_is_rejected() {
        let d = data(&[1.0, 2.0], &[2.0, 4.0], 0.0, 0.0);
        let err = fit_to_data(&d, &FitFunction::new(FunctionKind::Linear), &[0.0, 1.0]).unwrap_err();
        assert_eq!(err, FitError::TooFewRecords { records: 2, parameters: 2 });
    }

    #[test]
    fn degenerate_parameters_give_singular_covariance() {
        // cos with zero frequency: a[0] and a[3] are indistinguishable.
        let d = data(&[1.0, 2.0, 3.0, 4.0, 5.0], &[1.0; 5], 0.0, 0.0);
        let err = fit_to_data(
            &d,
            &FitFunction::new(FunctionKind::Cos),
            &[1.0, 0.0, 0.0, 0.0],
        );
        assert!(err.is_err());
    }
}

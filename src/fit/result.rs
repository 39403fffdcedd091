use std::fmt;

use serde::Serialize;

/// Outcome of a successful fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitResult {
    /// Initial guess the fit started from.
    pub a0: Vec<f64>,
    /// Fitted parameters.
    pub a: Vec<f64>,
    /// Standard errors of `a`, scaled by the reduced chi-square.
    pub aerr: Vec<f64>,
    /// Relative errors of `a`, in percent.
    pub arerr: Vec<f64>,
    /// Covariance matrix of `a` (row-major, `n` × `n`).
    pub acov: Vec<Vec<f64>>,
    pub degrees_of_freedom: usize,
    pub chi2: f64,
    pub chi2_reduced: f64,
    /// Probability of a chi-square at least this large given the degrees of freedom.
    pub p_probability: f64,
}

impl FitResult {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Results:")?;
        writeln!(f, "========")?;
        writeln!(f)?;
        writeln!(f, "Initial parameters' values:")?;
        writeln!(f, "\t{}", join(&self.a0))?;
        writeln!(f, "Fitted parameters' values:")?;
        for (i, ((a, aerr), arerr)) in self.a.iter().zip(&self.aerr).zip(&self.arerr).enumerate() {
            writeln!(f, "\ta[{i}] = {a:.3} \u{b1} {aerr:.3} ({arerr:.3}% error)")?;
        }
        writeln!(f, "Fitted parameters covariance:")?;
        for row in &self.acov {
            writeln!(f, "\t{}", join(row))?;
        }
        writeln!(f, "Chi squared: {:.3}", self.chi2)?;
        writeln!(f, "Degrees of freedom: {}", self.degrees_of_freedom)?;
        writeln!(f, "Chi squared reduced: {:.3}", self.chi2_reduced)?;
        write!(f, "P-probability: {:.3e}", self.p_probability)
    }
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{v:.3}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_every_parameter() {
        let result = FitResult {
            a0: vec![0.0, 1.0],
            a: vec![0.5, 2.0],
            aerr: vec![0.1, 0.05],
            arerr: vec![20.0, 2.5],
            acov: vec![vec![0.01, 0.0], vec![0.0, 0.0025]],
            degrees_of_freedom: 3,
            chi2: 1.5,
            chi2_reduced: 0.5,
            p_probability: 0.6823,
        };
        let text = result.to_string();
        assert!(text.contains("a[0] = 0.500 \u{b1} 0.100 (20.000% error)"));
        assert!(text.contains("a[1] = 2.000"));
        assert!(text.contains("Degrees of freedom: 3"));
        assert!(text.ends_with("P-probability: 6.823e-1"));
        assert!(result.to_json().unwrap().contains("\"chi2_reduced\": 0.5"));
    }
}

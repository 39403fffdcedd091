use std::fmt;

// ---------------------------------------------------------------------------
// FunctionKind – the built-in fitting functions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Constant,
    Linear,
    Parabolic,
    Cubic,
    Polynom,
    Hyperbolic,
    Exponential,
    Cos,
    Sin,
    StraightPower,
    InversePower,
    Normal,
}

impl FunctionKind {
    pub const ALL: [FunctionKind; 12] = [
        FunctionKind::Constant,
        FunctionKind::Linear,
        FunctionKind::Parabolic,
        FunctionKind::Cubic,
        FunctionKind::Polynom,
        FunctionKind::Hyperbolic,
        FunctionKind::Exponential,
        FunctionKind::Cos,
        FunctionKind::Sin,
        FunctionKind::StraightPower,
        FunctionKind::InversePower,
        FunctionKind::Normal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FunctionKind::Constant => "constant",
            FunctionKind::Linear => "linear",
            FunctionKind::Parabolic => "parabolic",
            FunctionKind::Cubic => "cubic",
            FunctionKind::Polynom => "polynom",
            FunctionKind::Hyperbolic => "hyperbolic",
            FunctionKind::Exponential => "exponential",
            FunctionKind::Cos => "cos",
            FunctionKind::Sin => "sin",
            FunctionKind::StraightPower => "straight_power",
            FunctionKind::InversePower => "inverse_power",
            FunctionKind::Normal => "normal",
        }
    }
}

// ---------------------------------------------------------------------------
// FitFunction
// ---------------------------------------------------------------------------

/// Highest degree offered for `polynom`.
pub const MAX_POLYNOM_DEGREE: usize = 10;

/// A model `y = f(a; x)` with a fixed number of parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitFunction {
    kind: FunctionKind,
    degree: usize,
}

impl FitFunction {
    pub fn new(kind: FunctionKind) -> Self {
        Self { kind, degree: 1 }
    }

    /// Polynomial of the given degree, clamped to `1..=MAX_POLYNOM_DEGREE`.
    pub fn polynom(degree: usize) -> Self {
        Self {
            kind: FunctionKind::Polynom,
            degree: degree.clamp(1, MAX_POLYNOM_DEGREE),
        }
    }

    /// Number of parameters.
    pub fn n(&self) -> usize {
        match self.kind {
            FunctionKind::Constant => 1,
            FunctionKind::Linear => 2,
            FunctionKind::Parabolic | FunctionKind::Hyperbolic | FunctionKind::Exponential => 3,
            FunctionKind::Cubic
            | FunctionKind::Cos
            | FunctionKind::Sin
            | FunctionKind::StraightPower
            | FunctionKind::InversePower
            | FunctionKind::Normal => 4,
            FunctionKind::Polynom => self.degree + 1,
        }
    }

    /// Identifier used for output file names, e.g. `straight_power`, `polynom_4`.
    pub fn name(&self) -> String {
        match self.kind {
            FunctionKind::Polynom => format!("polynom_{}", self.degree),
            other => other.label().to_string(),
        }
    }

    /// Human readable name: `straight_power` → `Straight Power`.
    pub fn title(&self) -> String {
        self.name()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn syntax(&self) -> String {
        match self.kind {
            FunctionKind::Constant => "a[0]".into(),
            FunctionKind::Linear | FunctionKind::Parabolic | FunctionKind::Cubic | FunctionKind::Polynom => {
                polynom_syntax(self.n() - 1)
            }
            FunctionKind::Hyperbolic => "a[0] / (x + a[1]) + a[2]".into(),
            FunctionKind::Exponential => "a[0] * exp(a[1] * x) + a[2]".into(),
            FunctionKind::Cos => "a[0] * cos(a[1] * x + a[2]) + a[3]".into(),
            FunctionKind::Sin => "a[0] * sin(a[1] * x + a[2]) + a[3]".into(),
            FunctionKind::StraightPower => "a[0] * (x + a[1]) ^ a[2] + a[3]".into(),
            FunctionKind::InversePower => "a[0] / (x + a[1]) ^ a[2] + a[3]".into(),
            FunctionKind::Normal => "a[0] * exp(-((x - a[1]) / a[2]) ^ 2 / 2) + a[3]".into(),
        }
    }

    /// Evaluate the model. `a` must hold `n()` parameters.
    pub fn eval(&self, a: &[f64], x: f64) -> f64 {
        match self.kind {
            FunctionKind::Constant => a[0],
            FunctionKind::Linear | FunctionKind::Parabolic | FunctionKind::Cubic | FunctionKind::Polynom => {
                // Horner
                a[..self.n()].iter().rev().fold(0.0, |acc, &c| acc * x + c)
            }
            FunctionKind::Hyperbolic => a[0] / (x + a[1]) + a[2],
            FunctionKind::Exponential => a[0] * (a[1] * x).exp() + a[2],
            FunctionKind::Cos => a[0] * (a[1] * x + a[2]).cos() + a[3],
            FunctionKind::Sin => a[0] * (a[1] * x + a[2]).sin() + a[3],
            FunctionKind::StraightPower => a[0] * (x + a[1]).powf(a[2]) + a[3],
            FunctionKind::InversePower => a[0] / (x + a[1]).powf(a[2]) + a[3],
            FunctionKind::Normal => {
                let z = (x - a[1]) / a[2];
                a[0] * (-0.5 * z * z).exp() + a[3]
            }
        }
    }
}

impl fmt::Display for FitFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.syntax())
    }
}

fn polynom_syntax(degree: usize) -> String {
    (0..=degree)
        .map(|i| match i {
            0 => "a[0]".to_string(),
            1 => "a[1] * x".to_string(),
            _ => format!("a[{i}] * x ^ {i}"),
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_counts() {
        assert_eq!(FitFunction::new(FunctionKind::Linear).n(), 2);
        assert_eq!(FitFunction::new(FunctionKind::Normal).n(), 4);
        assert_eq!(FitFunction::polynom(5).n(), 6);
        assert_eq!(FitFunction::polynom(0).n(), 2);
    }

    #[test]
    fn names_and_titles() {
        let f = FitFunction::new(FunctionKind::StraightPower);
        assert_eq!(f.name(), "straight_power");
        assert_eq!(f.title(), "Straight Power");
        assert_eq!(FitFunction::polynom(3).name(), "polynom_3");
        assert_eq!(FitFunction::polynom(3).title(), "Polynom 3");
    }

    #[test]
    fn polynomial_evaluation() {
        let f = FitFunction::new(FunctionKind::Parabolic);
        // 1 + 2x + 3x^2 at x = 2
        assert_eq!(f.eval(&[1.0, 2.0, 3.0], 2.0), 17.0);
        assert_eq!(f.syntax(), "a[0] + a[1] * x + a[2] * x ^ 2");
    }

    #[test]
    fn normal_peak_value() {
        let f = FitFunction::new(FunctionKind::Normal);
        assert!((f.eval(&[2.0, 1.0, 0.5, 0.25], 1.0) - 2.25).abs() < 1e-12);
    }
}

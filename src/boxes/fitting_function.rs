use super::InputEvent;
use crate::fit::{FitFunction, FunctionKind};

/// Selected fitting function, plus the degree used when it is `polynom`.
#[derive(Debug)]
pub struct FittingFunctionBox {
    kind: Option<FunctionKind>,
    degree: usize,
}

impl Default for FittingFunctionBox {
    fn default() -> Self {
        Self {
            kind: None,
            degree: 3,
        }
    }
}

impl FittingFunctionBox {
    pub fn kind(&self) -> Option<FunctionKind> {
        self.kind
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn fit_function(&self) -> Option<FitFunction> {
        self.kind.map(|kind| match kind {
            FunctionKind::Polynom => FitFunction::polynom(self.degree),
            other => FitFunction::new(other),
        })
    }

    pub fn select(&mut self, kind: Option<FunctionKind>) -> Option<InputEvent> {
        if self.kind == kind {
            return None;
        }
        self.kind = kind;
        Some(InputEvent::FitFunctionChanged)
    }

    /// Changing the degree only changes the function while `polynom` is selected.
    pub fn set_degree(&mut self, degree: usize) -> Option<InputEvent> {
        let before = self.fit_function();
        self.degree = degree.clamp(1, crate::fit::functions::MAX_POLYNOM_DEGREE);
        (self.fit_function() != before).then_some(InputEvent::FitFunctionChanged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polynom_uses_degree() {
        let mut functions = FittingFunctionBox::default();
        assert!(functions.fit_function().is_none());
        functions.select(Some(FunctionKind::Polynom));
        assert_eq!(functions.fit_function().unwrap().n(), 4);
        assert_eq!(functions.set_degree(5), Some(InputEvent::FitFunctionChanged));
        assert_eq!(functions.fit_function().unwrap().name(), "polynom_5");
    }

    #[test]
    fn degree_is_silent_for_other_functions() {
        let mut functions = FittingFunctionBox::default();
        functions.select(Some(FunctionKind::Linear));
        assert_eq!(functions.set_degree(6), None);
        assert_eq!(functions.degree(), 6);
        assert_eq!(functions.select(Some(FunctionKind::Linear)), None);
    }
}

use super::InputEvent;

/// Initial parameter vector `a0`, typed as comma or space separated numbers.
#[derive(Debug, Default)]
pub struct InitialGuessBox {
    n: Option<usize>,
    text: String,
    a0: Option<Vec<f64>>,
    error: Option<String>,
}

impl InitialGuessBox {
    /// Expected number of parameters.
    pub fn n(&self) -> Option<usize> {
        self.n
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The guess, present only when it parses and matches `n`.
    pub fn a0(&self) -> Option<&[f64]> {
        self.a0.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// A new parameter count discards a guess typed for the old one.
    pub fn set_parameters_number(&mut self, n: Option<usize>) {
        if self.n != n {
            self.n = n;
            self.reset();
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> InputEvent {
        self.text = text.into();
        self.parse();
        InputEvent::InitialGuessChanged
    }

    pub fn reset(&mut self) {
        self.text.clear();
        self.a0 = None;
        self.error = None;
    }

    fn parse(&mut self) {
        self.a0 = None;
        self.error = None;

        let tokens: Vec<&str> = self
            .text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return;
        }

        let mut values = Vec::with_capacity(tokens.len());
        for token in tokens {
            match token.parse::<f64>() {
                Ok(v) => values.push(v),
                Err(_) => {
                    self.error = Some(format!("'{token}' is not a number"));
                    return;
                }
            }
        }

        match self.n {
            None => self.error = Some("Choose a fitting function first".into()),
            Some(n) if n != values.len() => {
                self.error = Some(format!("Expected {n} values, got {}", values.len()));
            }
            Some(_) => self.a0 = Some(values),
        }
    }
}

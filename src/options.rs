/// Settings controlling how an expression is compiled.
///
/// # Examples
///
/// ```
/// # use plotexpr::{compile_with, Options};
/// let options = Options::default().implicit_multiplication(true);
/// let expr = compile_with("2x^2", &options).unwrap();
/// assert_eq!(expr.eval(3.0), 18.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    implicit_multiplication: bool,
    fold_constants: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            implicit_multiplication: false,
            fold_constants: true,
        }
    }
}

impl Options {
    /// Accept juxtaposition as multiplication: `2x`, `2(x + 1)`, `2pi`,
    /// `(x + 1)(x - 1)`. Off by default.
    #[must_use]
    pub fn implicit_multiplication(mut self, enabled: bool) -> Self {
        self.implicit_multiplication = enabled;
        self
    }

    /// Evaluate sub-expressions that do not depend on `x` at compile time.
    /// On by default.
    #[must_use]
    pub fn fold_constants(mut self, enabled: bool) -> Self {
        self.fold_constants = enabled;
        self
    }

    /// Check if juxtaposition is accepted as multiplication
    #[must_use]
    pub fn implicit_multiplication_enabled(&self) -> bool {
        self.implicit_multiplication
    }

    /// Check if constant sub-expressions are folded
    #[must_use]
    pub fn fold_constants_enabled(&self) -> bool {
        self.fold_constants
    }
}

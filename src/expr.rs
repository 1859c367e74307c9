use crate::ast::Ast;
use crate::options::Options;
use crate::parser::parse;
use crate::Error;

/// Compile `input` with the default [`Options`](struct.Options.html).
///
/// # Example
///
/// ```
/// # use plotexpr::compile;
/// let expr = compile("sin(x)^2 + 2*x - 1").unwrap();
/// assert_eq!(expr.eval(0.0), -1.0);
///
/// let error = compile("2 +").unwrap_err();
/// assert_eq!(error.position(), Some(3));
/// ```
pub fn compile(input: &str) -> Result<Expr, Error> {
    Expr::parse(input)
}

/// Compile `input` with the given `options`.
pub fn compile_with(input: &str, options: &Options) -> Result<Expr, Error> {
    Expr::parse_with(input, options)
}

/// Evaluate an already compiled expression at `x`.
///
/// Arithmetic never fails: division by zero and out of domain function
/// arguments produce infinities or `NaN` as IEEE doubles do.
#[must_use]
pub fn evaluate(compiled: &Expr, x: f64) -> f64 {
    compiled.eval(x)
}

/// Evaluate a single expression from `input` at `x`.
///
/// Returns `Ok(result)` if the evaluation is successful, or `Err(cause)` if
/// lexing or parsing the expression failed.
///
/// # Example
///
/// ```
/// # use plotexpr::eval;
/// assert_eq!(eval("45 - 2^3", 0.0), Ok(37.0));
/// assert_eq!(eval("3 * x", -5.0), Ok(-15.0));
/// assert!(eval("1 / x", 0.0).unwrap().is_infinite());
/// ```
pub fn eval(input: &str, x: f64) -> Result<f64, Error> {
    Expr::parse(input).map(|expr| expr.eval(x))
}

/// The binding of the free variable for one evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scope {
    /// Value of `x`
    pub x: f64,
}

impl From<f64> for Scope {
    fn from(x: f64) -> Self {
        Self { x }
    }
}

/// A parsed and optimized mathematical expression of `x`.
///
/// An `Expr` is immutable once built: evaluating it only reads the tree, so
/// the same value can be shared and evaluated from several threads at once.
///
/// # Examples
/// ```
/// # use plotexpr::Expr;
/// let expr = Expr::parse("x^2").unwrap();
/// assert_eq!(expr.eval(3.0), 9.0);
/// assert_eq!(expr.eval(-3.0), 9.0);
/// assert_eq!(expr.source(), "x^2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    source: String,
    ast: Ast,
}

impl Expr {
    /// Parse the given mathematical `expression` into an `Expr`.
    ///
    /// # Examples
    /// ```
    /// # use plotexpr::Expr;
    /// // A valid expression
    /// assert!(Expr::parse("3 + 5 * x").is_ok());
    /// // an invalid expression
    /// assert!(Expr::parse("3 + foo(x)").is_err());
    /// ```
    pub fn parse(expression: &str) -> Result<Self, Error> {
        Self::parse_with(expression, &Options::default())
    }

    /// Parse the given mathematical `expression` with custom `options`.
    pub fn parse_with(expression: &str, options: &Options) -> Result<Self, Error> {
        let mut ast = parse(expression, options)?;
        if options.fold_constants_enabled() {
            ast = ast.optimize();
        }
        log::debug!("compiled '{}' to {}", expression, ast);
        Ok(Self {
            source: expression.to_owned(),
            ast,
        })
    }

    /// Evaluate the expression with `x` bound to the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use plotexpr::Expr;
    /// let expr = Expr::parse("sqrt(x)").unwrap();
    /// assert_eq!(expr.eval(4.0), 2.0);
    /// assert!(expr.eval(-1.0).is_nan());
    /// ```
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        Self::inner_eval(&self.ast, x)
    }

    /// Evaluate the expression in the given `scope`
    #[must_use]
    pub fn eval_scope(&self, scope: &Scope) -> f64 {
        self.eval(scope.x)
    }

    /// Evaluate the expression once for each value in `xs`
    #[must_use]
    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    /// Evaluate the expression once for each value in `xs`, spreading the
    /// work over the rayon thread pool. The output order follows `xs`.
    #[cfg(feature = "rayon")]
    #[must_use]
    pub fn par_eval_many(&self, xs: &[f64]) -> Vec<f64> {
        use rayon::prelude::*;
        xs.par_iter().map(|&x| self.eval(x)).collect()
    }

    fn inner_eval(ast: &Ast, x: f64) -> f64 {
        match *ast {
            Ast::Variable => x,
            Ast::Value(number) => number,
            Ast::Binary(op, ref left, ref right) => {
                op.apply(Self::inner_eval(left, x), Self::inner_eval(right, x))
            }
            Ast::Neg(ref operand) => -Self::inner_eval(operand, x),
            Ast::Function(_, func, ref arg) => func(Self::inner_eval(arg, x)),
        }
    }

    /// The text this expression was compiled from
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The syntax tree, after constant folding when enabled
    #[must_use]
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Check if the expression gives the same value for every `x`
    ///
    /// # Examples
    /// ```
    /// # use plotexpr::Expr;
    /// assert!(Expr::parse("sin(pi / 2)").unwrap().is_constant());
    /// assert!(!Expr::parse("sin(x)").unwrap().is_constant());
    /// ```
    #[must_use]
    pub fn is_constant(&self) -> bool {
        !self.ast.contains_variable()
    }
}

#[cfg(test)]
mod tests {
    use super::{compile, compile_with, Expr, Scope};
    use crate::options::Options;
    use std::f64::consts::{E, PI};
    use test_case::test_case;

    #[test]
    fn parse() {
        let valid_expressions = [
            "3 + +5",
            "(3 + -5)*45",
            "(3.0 + 5.0)*\t\n45",
            "(3 + 5^5)*45",
            "sin(34.0) ^ sqrt(28.0)",
            "exp(log(abs(tan(cos(x)))))",
            "-x",
        ];
        for expr in &valid_expressions {
            assert!(Expr::parse(expr).is_ok(), "{}", expr);
        }

        let invalid_expressions = ["3. + 5", "3 + +", "sin(x", "x y", "2 ** 3", "ln(x)"];
        for expr in &invalid_expressions {
            assert!(Expr::parse(expr).is_err(), "{}", expr);
        }
    }

    #[test_case("3 + 5", 0.0 => 8.0 ; "addition")]
    #[test_case("2 - 5", 0.0 => -3.0 ; "subtraction")]
    #[test_case("2 * 5", 0.0 => 10.0 ; "multiplication")]
    #[test_case("10 / 5", 0.0 => 2.0 ; "division")]
    #[test_case("2 ^ 3", 0.0 => 8.0 ; "power")]
    #[test_case("-3", 0.0 => -3.0 ; "negation")]
    #[test_case("25 - -3", 0.0 => 28.0 ; "double minus")]
    #[test_case("2+3*4", 7.0 => 14.0 ; "precedence")]
    #[test_case("2^3^2", 0.0 => 512.0 ; "right associative power")]
    #[test_case("10-3-2", 0.0 => 5.0 ; "left associative subtraction")]
    #[test_case("(2+3)*4", 0.0 => 20.0 ; "parenthesis")]
    #[test_case("-2^2", 0.0 => -4.0 ; "sign applies after the power")]
    #[test_case("2^-2", 0.0 => 0.25 ; "negative exponent")]
    #[test_case("x^2", 3.0 => 9.0 ; "square of positive")]
    #[test_case("x^2", -3.0 => 9.0 ; "square of negative")]
    #[test_case("x^2", 0.0 => 0.0 ; "square of zero")]
    #[test_case("sqrt(9)", 0.0 => 3.0 ; "sqrt")]
    #[test_case("abs(x)", -2.5 => 2.5 ; "abs")]
    #[test_case("log(1)", 0.0 => 0.0 ; "natural log")]
    #[test_case("exp(0)", 0.0 => 1.0 ; "exp")]
    fn eval(input: &str, x: f64) -> f64 {
        compile(input).unwrap().eval(x)
    }

    #[test]
    fn constants_and_functions() {
        let expr = compile("sin(pi/2)").unwrap();
        assert!((expr.eval(0.0) - 1.0).abs() < 1e-9);

        assert_eq!(compile("pi").unwrap().eval(0.0), PI);
        assert_eq!(compile("e").unwrap().eval(0.0), E);
        assert!((compile("cos(x)").unwrap().eval(PI) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn ieee_semantics() {
        assert_eq!(compile("1/0").unwrap().eval(0.0), f64::INFINITY);
        assert_eq!(compile("-1/x").unwrap().eval(0.0), f64::NEG_INFINITY);
        assert!(compile("sqrt(x)").unwrap().eval(-1.0).is_nan());
        assert_eq!(compile("log(x)").unwrap().eval(0.0), f64::NEG_INFINITY);
        assert!(compile("0/0").unwrap().eval(0.0).is_nan());
        assert!(compile("x + 1").unwrap().eval(f64::NAN).is_nan());
    }

    #[test]
    fn folding_does_not_change_results() {
        let folded = Options::default();
        let unfolded = Options::default().fold_constants(false);
        let inputs = [
            "sin(pi/3) * x + 2^0.5",
            "x / (3 - 3)",
            "-(2^2) + log(2) * x",
            "sqrt(-1) + x",
        ];
        for input in &inputs {
            let a = compile_with(input, &folded).unwrap();
            let b = compile_with(input, &unfolded).unwrap();
            for &x in &[-2.0, -0.5, 0.0, 1.0, 10.0] {
                assert_eq!(a.eval(x).to_bits(), b.eval(x).to_bits(), "{} at {}", input, x);
            }
        }
    }

    #[test]
    fn accessors() {
        let expr = compile("2 * (1 + 2) * x").unwrap();
        assert_eq!(expr.source(), "2 * (1 + 2) * x");
        assert_eq!(expr.ast().to_string(), "(6 * x)");
        assert!(!expr.is_constant());
        assert_eq!(expr.eval_scope(&Scope::from(2.0)), 12.0);
        assert_eq!(expr.eval_many(&[0.0, 1.0, -1.0]), [0.0, 6.0, -6.0]);
    }

    #[test]
    fn long_chains() {
        let sum = compile(&format!("{}x", "x+".repeat(200))).unwrap();
        assert_eq!(sum.eval(1.0), 201.0);
        let product = compile(&format!("{}x", "2*".repeat(200))).unwrap();
        assert_eq!(product.eval(1.0), 2f64.powi(200));

        let error = compile(&format!("{}x", "x-".repeat(100_000))).unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::Parse);
    }

    #[test]
    fn errors() {
        let result = super::eval("2 * z", 1.0);
        assert_eq!(
            result.err().unwrap().to_string(),
            "ParseError at position 4: unknown identifier 'z'"
        );
    }

    #[test]
    fn send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Expr>();
    }

    #[test]
    fn shared_between_threads() {
        let expr = std::sync::Arc::new(compile("x^2 - 1").unwrap());
        let handles: Vec<_> = (0..4_i32)
            .map(|i| {
                let expr = expr.clone();
                std::thread::spawn(move || expr.eval(f64::from(i)))
            })
            .collect();
        let results: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, [-1.0, 0.0, 3.0, 8.0]);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn par_eval_many() {
        let expr = compile("2 * x + 1").unwrap();
        let xs: Vec<f64> = (0..1000_i32).map(f64::from).collect();
        assert_eq!(expr.par_eval_many(&xs), expr.eval_many(&xs));
    }
}

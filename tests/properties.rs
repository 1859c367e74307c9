use plotexpr::{compile, compile_with, evaluate, ErrorKind, Options};
use proptest::prelude::*;
use test_case::test_case;

#[test_case("2+3*4", 14.0 ; "multiplication before addition")]
#[test_case("2^3^2", 512.0 ; "right associative exponent")]
#[test_case("10-3-2", 5.0 ; "left associative subtraction")]
#[test_case("(2+3)*4", 20.0 ; "parenthesis override precedence")]
#[test_case("-2^2", -4.0 ; "sign applies after exponentiation")]
#[test_case("2 + 3 * 4", 14.0 ; "whitespace is ignored")]
fn constant_expressions(input: &str, expected: f64) {
    let expr = compile(input).unwrap();
    for &x in &[-10.0, -1.0, 0.0, 0.5, 42.0] {
        assert_eq!(evaluate(&expr, x), expected);
    }
}

#[test_case(3.0 => 9.0 ; "positive")]
#[test_case(-3.0 => 9.0 ; "negative")]
#[test_case(0.0 => 0.0 ; "zero")]
fn variable_substitution(x: f64) -> f64 {
    evaluate(&compile("x^2").unwrap(), x)
}

#[test]
fn functions_and_constants() {
    let value = evaluate(&compile("sin(pi/2)").unwrap(), 0.0);
    assert!((value - 1.0).abs() < 1e-9);

    assert!(evaluate(&compile("sqrt(x)").unwrap(), -1.0).is_nan());
    assert_eq!(evaluate(&compile("1/0").unwrap(), 0.0), f64::INFINITY);
    assert_eq!(evaluate(&compile("log(0)").unwrap(), 0.0), f64::NEG_INFINITY);
}

#[test_case("2+", 2 ; "dangling operator")]
#[test_case("2+*3", 2 ; "consecutive operators")]
#[test_case("(2+3", 4 ; "unbalanced parenthesis")]
#[test_case("foo(2)", 0 ; "unknown identifier")]
#[test_case("sin()", 4 ; "empty argument")]
#[test_case("2 3", 2 ; "trailing tokens")]
fn malformed_input(input: &str, position: usize) {
    let error = compile(input).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Parse);
    assert_eq!(error.position(), Some(position));
}

#[test]
fn unknown_identifier_is_cited() {
    let error = compile("foo(2)").unwrap_err();
    assert!(error.to_string().contains("'foo'"), "{}", error);
}

#[test_case("1.2.3", 0 ; "malformed number")]
#[test_case("2 # 3", 2 ; "invalid character")]
fn lexical_errors(input: &str, position: usize) {
    let error = compile(input).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Lex);
    assert_eq!(error.position(), Some(position));
}

#[test]
fn implicit_multiplication_is_opt_in() {
    assert!(compile("2x").is_err());

    let options = Options::default().implicit_multiplication(true);
    let expr = compile_with("2x(x + 1)", &options).unwrap();
    assert_eq!(expr.eval(3.0), 24.0);
}

#[test_case(100 => Ok(101.0) ; "short sum")]
#[test_case(256 => Ok(257.0) ; "longest accepted sum")]
#[test_case(2_000 => Err(ErrorKind::Parse) ; "long sum")]
#[test_case(100_000 => Err(ErrorKind::Parse) ; "very long sum")]
fn long_sums_never_overflow(terms: usize) -> Result<f64, ErrorKind> {
    let input = format!("{}x", "x+".repeat(terms));
    compile(&input)
        .map(|expr| expr.eval(1.0))
        .map_err(|error| error.kind())
}

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..100).prop_map(|n| n.to_string()),
        (0u32..100, 0u32..1000).prop_map(|(a, b)| format!("{}.{}", a, b)),
        Just("x".to_string()),
        Just("pi".to_string()),
        Just("e".to_string()),
    ]
}

/// Random well-formed expressions, with a space around each binary operator
fn expression() -> impl Strategy<Value = String> {
    leaf().prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop::sample::select(vec!["+", "-", "*", "/", "^"]),
                inner.clone()
            )
                .prop_map(|(left, op, right)| format!("{} {} {}", left, op, right)),
            inner.clone().prop_map(|e| format!("({})", e)),
            inner.clone().prop_map(|e| format!("-{}", e)),
            (
                prop::sample::select(vec!["sin", "cos", "tan", "sqrt", "log", "abs", "exp"]),
                inner
            )
                .prop_map(|(name, arg)| format!("{}({})", name, arg)),
        ]
    })
}

fn same_bits(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits()
}

proptest! {
    #[test]
    fn compiling_twice_gives_identical_results(input in expression(), x in -100.0..100.0f64) {
        let first = compile(&input).unwrap();
        let second = compile(&input).unwrap();
        prop_assert!(same_bits(first.eval(x), second.eval(x)));
        prop_assert!(same_bits(first.eval(x), first.eval(x)));
    }

    #[test]
    fn whitespace_is_insignificant(input in expression(), x in -100.0..100.0f64) {
        let spaced = compile(&input).unwrap();
        let compact = compile(&input.replace(' ', "")).unwrap();
        let wide = compile(&input.replace(' ', " \t\n ")).unwrap();
        prop_assert!(same_bits(spaced.eval(x), compact.eval(x)));
        prop_assert!(same_bits(spaced.eval(x), wide.eval(x)));
    }

    #[test]
    fn constant_folding_preserves_results(input in expression(), x in -100.0..100.0f64) {
        let folded = compile(&input).unwrap();
        let unfolded = compile_with(&input, &Options::default().fold_constants(false)).unwrap();
        prop_assert!(same_bits(folded.eval(x), unfolded.eval(x)));
    }

    #[test]
    fn printed_tree_parses_back(input in expression(), x in -100.0..100.0f64) {
        let options = Options::default().fold_constants(false);
        let expr = compile_with(&input, &options).unwrap();
        let printed = expr.ast().to_string();
        let reparsed = compile_with(&printed, &options).unwrap();
        prop_assert_eq!(expr.ast(), reparsed.ast());
        prop_assert!(same_bits(expr.eval(x), reparsed.eval(x)));
    }
}

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::needless_return,
    clippy::missing_docs_in_private_items,
    clippy::non_ascii_literal,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation
)]

//! plotexpr, the expression engine of a function plotter.
//!
//! This crate compiles a formula in one free variable `x`, given as a string,
//! into a value that can be evaluated many times, typically once per pixel
//! column of a plot. The easiest way to use this crate is with the
//! [`eval`](fn.eval.html) function:
//!
//! ```
//! assert_eq!(plotexpr::eval("3 + 5 * 2", 0.0), Ok(13.0));
//! assert_eq!(plotexpr::eval("2 * x", 3.5), Ok(7.0));
//! ```
//!
//! Parsing is separated from evaluation with [`compile`](fn.compile.html),
//! which returns an [`Expr`](struct.Expr.html). Evaluating an `Expr` does no
//! parsing work and never fails:
//!
//! ```
//! use plotexpr::compile;
//!
//! let expr = compile("sin(x)^2 + 2*x - 1").unwrap();
//! assert_eq!(expr.eval(0.0), -1.0);
//!
//! let expr = compile("1 / x").unwrap();
//! assert_eq!(expr.eval(0.0), f64::INFINITY);
//! assert_eq!(expr.eval(4.0), 0.25);
//! ```
//!
//! Malformed input is reported with the character offset of the problem:
//!
//! ```
//! use plotexpr::{compile, ErrorKind};
//!
//! let error = compile("2 * foo(x)").unwrap_err();
//! assert_eq!(error.kind(), ErrorKind::Parse);
//! assert_eq!(error.position(), Some(4));
//! assert_eq!(error.to_string(), "ParseError at position 4: unknown identifier 'foo'");
//! ```
//!
//! # Language definition
//!
//! The language implemented by plotexpr can contain the following elements:
//!
//! - number literals: `12`, `0.5`. A literal is digits optionally followed by
//!   a dot and more digits, there is no exponent notation;
//! - the variable `x`;
//! - the constants `e` and `pi`;
//! - left and right parenthesis;
//! - mathematical operators: `+` for addition, `-` for subtraction,
//!   `*` for multiplication, `/` for division and `^` for exponentiation;
//! - signs: `-x`, `+x`;
//! - function call: `sin(x)`, `sqrt(2)`. The functions `sin`, `cos`, `tan`,
//!   `sqrt`, `log` (natural logarithm), `abs` and `exp` take one argument.
//!
//! Names are case sensitive and any other name or symbol is an error.
//!
//! `+` and `-` have the lowest precedence, then `*` and `/`, then signs, then
//! `^`. All binary operators associate to the left except `^`: `2^3^2` is
//! `2^(3^2)`. A sign applies to the whole power on its right, so `-2^2` is
//! `-4`, and an exponent may carry a sign: `2^-1` is `0.5`.
//!
//! Computations follow IEEE double precision, `NaN` and infinities included:
//! `1/0`, `sqrt(-1)` and `log(0)` evaluate to `inf`, `NaN` and `-inf`.
//!
//! Implicit multiplication (`2x`, `2(x + 1)`) is off by default and can be
//! enabled with [`Options`](struct.Options.html).
//!
//! # Technical details
//!
//! plotexpr is based on an AST interpreter, with a recursive descent parser.
//! Sub-expressions that do not depend on `x` are folded at compile time. An
//! optional Cranelift backend (feature `jit`) compiles expressions to native
//! code, and the [`plot`](plot/index.html) module samples an expression over
//! a pixel grid.

#[macro_use]
extern crate lazy_static;

mod ast;
mod error;
mod expr;
#[cfg(feature = "jit")]
mod jit;
mod lexer;
mod options;
mod parser;
pub mod plot;
mod token;
mod util;

pub use ast::Ast;
pub use error::{Error, ErrorKind};
pub use expr::{compile, compile_with, eval, evaluate, Expr, Scope};
#[cfg(feature = "jit")]
pub use jit::{Jit, JitFunction};
pub use lexer::tokenize;
pub use options::Options;
pub use token::{Op, Token, TokenKind};
pub use util::{is_builtin, CONSTANTS, FUNCTIONS, VARIABLE};

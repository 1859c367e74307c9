//! Native code generation for compiled expressions, with Cranelift.
//!
//! The tree of an [`Expr`](../struct.Expr.html) is lowered to a function
//! `extern "C" fn(f64) -> f64`. Built-in functions and `^` are calls to the
//! same `libm` routines the interpreter uses, so both backends agree bit for
//! bit.

use crate::ast::Ast;
use crate::error::Error;
use crate::expr::Expr;
use crate::token::Op;
use cranelift_codegen::ir::{types, AbiParam, FuncRef, InstBuilder, Value};
use cranelift_frontend::{FunctionBuilder, FunctionBuilderContext};
use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::{default_libcall_names, FuncId, Linkage, Module};
use hashbrown::HashMap;
use std::fmt::Display;
use std::mem;

const POW: &str = "plotexpr_pow";

extern "C" fn jit_pow(base: f64, exponent: f64) -> f64 {
    libm::pow(base, exponent)
}
extern "C" fn jit_sin(x: f64) -> f64 {
    libm::sin(x)
}
extern "C" fn jit_cos(x: f64) -> f64 {
    libm::cos(x)
}
extern "C" fn jit_tan(x: f64) -> f64 {
    libm::tan(x)
}
extern "C" fn jit_sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}
extern "C" fn jit_log(x: f64) -> f64 {
    libm::log(x)
}
extern "C" fn jit_abs(x: f64) -> f64 {
    libm::fabs(x)
}
extern "C" fn jit_exp(x: f64) -> f64 {
    libm::exp(x)
}

/// A symbol exported to the generated code
struct MathSymbol {
    /// Name of the built-in function in expressions, or `None` for `^`
    builtin: Option<&'static str>,
    symbol: &'static str,
    ptr: *const u8,
    arity: usize,
}

fn math_symbols() -> Vec<MathSymbol> {
    let unary = |builtin: &'static str, symbol: &'static str, ptr: *const u8| MathSymbol {
        builtin: Some(builtin),
        symbol,
        ptr,
        arity: 1,
    };
    vec![
        MathSymbol {
            builtin: None,
            symbol: POW,
            ptr: jit_pow as *const u8,
            arity: 2,
        },
        unary("sin", "plotexpr_sin", jit_sin as *const u8),
        unary("cos", "plotexpr_cos", jit_cos as *const u8),
        unary("tan", "plotexpr_tan", jit_tan as *const u8),
        unary("sqrt", "plotexpr_sqrt", jit_sqrt as *const u8),
        unary("log", "plotexpr_log", jit_log as *const u8),
        unary("abs", "plotexpr_abs", jit_abs as *const u8),
        unary("exp", "plotexpr_exp", jit_exp as *const u8),
    ]
}

fn jit_error(error: impl Display) -> Error {
    Error::JitError(error.to_string())
}

/// The JIT compiler. Each call to [`compile`](#method.compile) produces an
/// independent [`JitFunction`](struct.JitFunction.html).
pub struct Jit {
    builder: JITBuilder,
}

impl Jit {
    /// Create a new `Jit` targeting the host machine.
    pub fn new() -> Result<Self, Error> {
        let mut builder = JITBuilder::new(default_libcall_names()).map_err(jit_error)?;
        for sym in math_symbols() {
            builder.symbol(sym.symbol, sym.ptr);
        }
        Ok(Self { builder })
    }

    /// Compile `expr` into machine code.
    ///
    /// # Examples
    ///
    /// ```
    /// # use plotexpr::{compile, Jit};
    /// let expr = compile("x^2 + 1").unwrap();
    /// let function = Jit::new().unwrap().compile(&expr).unwrap();
    /// assert_eq!(function.call(3.0), 10.0);
    /// ```
    pub fn compile(self, expr: &Expr) -> Result<JitFunction, Error> {
        let mut module = JITModule::new(self.builder);
        let mut ctx = module.make_context();
        let mut builder_context = FunctionBuilderContext::new();

        let declared = declare_math_funcs(&mut module)?;

        let mut sig = module.make_signature();
        sig.params.push(AbiParam::new(types::F64));
        sig.returns.push(AbiParam::new(types::F64));
        let id = module
            .declare_function("expression", Linkage::Export, &sig)
            .map_err(jit_error)?;
        ctx.func.signature = sig;

        {
            let mut builder = FunctionBuilder::new(&mut ctx.func, &mut builder_context);
            let entry_block = builder.create_block();
            builder.append_block_params_for_function_params(entry_block);
            builder.switch_to_block(entry_block);
            builder.seal_block(entry_block);

            let mut funcs = HashMap::new();
            for (name, func_id) in &declared {
                let func_ref = module.declare_func_in_func(*func_id, builder.func);
                funcs.insert(*name, func_ref);
            }

            let x = builder.block_params(entry_block)[0];
            let mut trans = FunctionTranslator { builder, funcs, x };
            let result = trans.translate_expr(expr.ast())?;
            trans.builder.ins().return_(&[result]);
            trans.builder.finalize();
        }

        module.define_function(id, &mut ctx).map_err(jit_error)?;
        module.clear_context(&mut ctx);
        module.finalize_definitions().map_err(jit_error)?;

        let code = module.get_finalized_function(id);
        // SAFETY: the function was declared above with a single f64
        // parameter and an f64 return value, using the default host calling
        // convention.
        let function = unsafe { mem::transmute::<*const u8, extern "C" fn(f64) -> f64>(code) };
        log::debug!("generated native code for '{}'", expr.source());

        Ok(JitFunction {
            _module: module,
            function,
        })
    }
}

/// Declare every math symbol as an import, keyed by built-in name (`^` is
/// keyed by its symbol name)
fn declare_math_funcs(module: &mut JITModule) -> Result<Vec<(&'static str, FuncId)>, Error> {
    let mut declared = Vec::new();
    for sym in math_symbols() {
        let mut sig = module.make_signature();
        for _ in 0..sym.arity {
            sig.params.push(AbiParam::new(types::F64));
        }
        sig.returns.push(AbiParam::new(types::F64));
        let id = module
            .declare_function(sym.symbol, Linkage::Import, &sig)
            .map_err(jit_error)?;
        declared.push((sym.builtin.unwrap_or(sym.symbol), id));
    }
    Ok(declared)
}

/// A collection of state used for translating from AST nodes into Cranelift
/// IR.
struct FunctionTranslator<'a> {
    builder: FunctionBuilder<'a>,
    funcs: HashMap<&'static str, FuncRef>,
    /// The function parameter
    x: Value,
}

impl<'a> FunctionTranslator<'a> {
    fn translate_expr(&mut self, ast: &Ast) -> Result<Value, Error> {
        let value = match *ast {
            Ast::Value(val) => self.builder.ins().f64const(val),
            Ast::Variable => self.x,
            Ast::Neg(ref operand) => {
                let operand = self.translate_expr(operand)?;
                self.builder.ins().fneg(operand)
            }
            Ast::Binary(op, ref left, ref right) => {
                let lhs = self.translate_expr(left)?;
                let rhs = self.translate_expr(right)?;
                match op {
                    Op::Plus => self.builder.ins().fadd(lhs, rhs),
                    Op::Minus => self.builder.ins().fsub(lhs, rhs),
                    Op::Mul => self.builder.ins().fmul(lhs, rhs),
                    Op::Div => self.builder.ins().fdiv(lhs, rhs),
                    Op::Exp => self.translate_call(POW, &[lhs, rhs])?,
                }
            }
            Ast::Function(name, _, ref arg) => {
                let arg = self.translate_expr(arg)?;
                self.translate_call(name, &[arg])?
            }
        };
        Ok(value)
    }

    fn translate_call(&mut self, name: &str, args: &[Value]) -> Result<Value, Error> {
        let func_ref = *self
            .funcs
            .get(name)
            .ok_or_else(|| Error::JitError(format!("no native symbol for '{}'", name)))?;
        let call = self.builder.ins().call(func_ref, args);
        Ok(self.builder.inst_results(call)[0])
    }
}

/// An expression compiled to machine code.
///
/// The generated code only reads its argument, so a `JitFunction` can be
/// called concurrently from several threads.
pub struct JitFunction {
    /// Owns the executable memory `function` points into
    _module: JITModule,
    function: extern "C" fn(f64) -> f64,
}

// SAFETY: the generated code has no state of its own and the module is
// never modified after finalization.
unsafe impl Send for JitFunction {}
unsafe impl Sync for JitFunction {}

impl JitFunction {
    /// Compile `expr` with a fresh [`Jit`](struct.Jit.html)
    pub fn new(expr: &Expr) -> Result<Self, Error> {
        Jit::new()?.compile(expr)
    }

    /// Evaluate the compiled expression at `x`
    #[must_use]
    pub fn call(&self, x: f64) -> f64 {
        (self.function)(x)
    }

    /// Evaluate the compiled expression once for each value in `xs`
    #[must_use]
    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.call(x)).collect()
    }

    /// Evaluate the compiled expression for each value in `xs`, writing the
    /// results to the corresponding slot of `output`.
    ///
    /// Fails with `EvalError` if the slices have different lengths; `output`
    /// is left untouched in that case.
    pub fn eval_into(&self, xs: &[f64], output: &mut [f64]) -> Result<(), Error> {
        if xs.len() != output.len() {
            return Err(Error::EvalError(format!(
                "got {} inputs for {} outputs",
                xs.len(),
                output.len()
            )));
        }
        for (out, &x) in output.iter_mut().zip(xs) {
            *out = self.call(x);
        }
        Ok(())
    }
}

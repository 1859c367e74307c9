use crate::token::Op;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Ast nodes for the expressions
///
/// The tree is built once by the parser and never modified afterwards. Each
/// node owns its children.
#[derive(Debug, Clone)]
pub enum Ast {
    /// The free variable `x`
    Variable,
    /// A constant value
    Value(f64),
    /// <left> op <right>
    Binary(Op, Box<Ast>, Box<Ast>),
    /// -<operand>
    Neg(Box<Ast>),
    /// fn(<arg>), with the name kept for display
    Function(&'static str, fn(f64) -> f64, Box<Ast>),
}

impl PartialEq<Self> for Ast {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Ast::Variable, Ast::Variable) => true,
            (Ast::Value(v), Ast::Value(v2)) => v.to_le_bytes() == v2.to_le_bytes(),
            (Ast::Binary(op, a, b), Ast::Binary(op2, a2, b2)) => op == op2 && a == a2 && b == b2,
            (Ast::Neg(a), Ast::Neg(a2)) => a == a2,
            (Ast::Function(name, _, a), Ast::Function(name2, _, a2)) => name == name2 && a == a2,
            _ => false,
        }
    }
}
impl Eq for Ast {}

impl Hash for Ast {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Ast::Variable => state.write_u8(0),
            Ast::Value(v) => {
                state.write_u8(1);
                v.to_le_bytes().hash(state);
            }
            Ast::Binary(op, a, b) => {
                state.write_u8(2);
                op.hash(state);
                a.hash(state);
                b.hash(state);
            }
            Ast::Neg(a) => {
                state.write_u8(3);
                a.hash(state);
            }
            Ast::Function(name, _, a) => {
                state.write_u8(4);
                name.hash(state);
                a.hash(state);
            }
        }
    }
}

impl Display for Ast {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match self {
            Ast::Variable => write!(fmt, "x"),
            Ast::Value(value) => write!(fmt, "{}", value),
            Ast::Binary(op, left, right) => write!(fmt, "({} {} {})", left, op, right),
            Ast::Neg(operand) => write!(fmt, "(-{})", operand),
            Ast::Function(name, _, arg) => write!(fmt, "{}({})", name, arg),
        }
    }
}

impl Ast {
    /// If the AST node correspond to a constant, get `Some(constant)`. Else,
    /// get `None`
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        if let Self::Value(value) = *self {
            Some(value)
        } else {
            None
        }
    }

    /// Check if the variable `x` appears anywhere in this tree
    #[must_use]
    pub fn contains_variable(&self) -> bool {
        match self {
            Self::Variable => true,
            Self::Value(_) => false,
            Self::Binary(_, left, right) => left.contains_variable() || right.contains_variable(),
            Self::Neg(operand) | Self::Function(_, _, operand) => operand.contains_variable(),
        }
    }

    /// Optimize the AST by doing constants propagation.
    ///
    /// Folding uses the same operations as evaluation, so an optimized tree
    /// evaluates to exactly the same bits as the original one.
    #[must_use]
    pub fn optimize(self) -> Self {
        match self {
            Self::Variable | Self::Value(_) => self,
            Self::Function(name, func, arg) => {
                let arg = arg.optimize();
                if let Some(arg) = arg.value() {
                    return Self::Value(func(arg));
                }
                Self::Function(name, func, Box::new(arg))
            }
            Self::Neg(operand) => {
                let operand = operand.optimize();
                if let Some(operand) = operand.value() {
                    return Self::Value(-operand);
                }
                Self::Neg(Box::new(operand))
            }
            Self::Binary(op, left, right) => {
                let left = left.optimize();
                let right = right.optimize();
                if let (Some(left), Some(right)) = (left.value(), right.value()) {
                    return Self::Value(op.apply(left, right));
                }
                Self::Binary(op, Box::new(left), Box::new(right))
            }
        }
    }
}

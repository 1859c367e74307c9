use std::fmt::{self, Display, Formatter};

/// Possible tokens to find in the input string
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A numeric literal
    Number(f64),
    /// The free variable `x`
    Variable,
    /// Any other run of letters: function or constant name, resolved by the
    /// parser
    Identifier(String),
    /// A binary operator, or a sign when in prefix position
    Op(Op),
    /// Left parenthesis
    LParen,
    /// Right parenthesis
    RParen,
}

/// A token together with the character offset where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What was read
    pub kind: TokenKind,
    /// Character offset of the first character of the token
    pub position: usize,
}

impl Token {
    /// Create a token of the given `kind` starting at `position`
    pub fn new(kind: TokenKind, position: usize) -> Self {
        Self { kind, position }
    }

    /// Check if this token can be the first token of a primary expression
    pub fn starts_primary(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Number(_) | TokenKind::Variable | TokenKind::Identifier(_) | TokenKind::LParen
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match *self {
            Self::Number(value) => write!(fmt, "number {}", value),
            Self::Variable => write!(fmt, "'x'"),
            Self::Identifier(ref name) => write!(fmt, "'{}'", name),
            Self::Op(op) => write!(fmt, "'{}'", op),
            Self::LParen => write!(fmt, "'('"),
            Self::RParen => write!(fmt, "')'"),
        }
    }
}

/// Allowed operators in the algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `^`
    Exp,
}

impl Op {
    /// Apply the operator to two values, with plain IEEE semantics
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Plus => left + right,
            Self::Minus => left - right,
            Self::Mul => left * right,
            Self::Div => left / right,
            Self::Exp => libm::pow(left, right),
        }
    }

    /// The character for this operator in expressions
    pub fn symbol(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Exp => '^',
        }
    }
}

impl Display for Op {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        write!(fmt, "{}", self.symbol())
    }
}

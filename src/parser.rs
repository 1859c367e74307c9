use crate::ast::Ast;
use crate::error::Error;
use crate::lexer::Lexer;
use crate::options::Options;
use crate::token::{Op, Token, TokenKind};
use crate::util::{CONSTANTS, FUNCTIONS};

/// Maximal nesting of parenthesis, signs and exponents, and maximal height
/// of the resulting tree. Deeper inputs are rejected instead of overflowing
/// the stack of the parser or of the tree walkers.
const MAX_DEPTH: usize = 256;

/// Tokenize and parse `input` into an unoptimized tree
pub fn parse(input: &str, options: &Options) -> Result<Ast, Error> {
    let tokens = Lexer::new(input).tokenize()?;
    Parser::new(&tokens, input.chars().count(), options).parse()
}

/// A parsed subtree and the number of edges on its longest path
struct Node {
    ast: Ast,
    height: usize,
}

impl Node {
    fn leaf(ast: Ast) -> Self {
        Node { ast, height: 0 }
    }
}

/// Recursive descent parser over a token slice.
///
/// ```text
/// expression := term (('+' | '-') term)*
/// term       := unary (('*' | '/') unary)*
/// unary      := ('-' | '+') unary | power
/// power      := primary ('^' unary)?
/// primary    := number | 'x' | constant | function '(' expression ')' | '(' expression ')'
/// ```
///
/// Signs bind looser than `^` on their right, so `-2^2` is `-(2^2)`, while
/// the exponent may carry its own sign: `2^-1`.
pub struct Parser<'a> {
    tokens: &'a [Token],
    index: usize,
    /// Position reported for errors at end of input
    end: usize,
    depth: usize,
    implicit_multiplication: bool,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], end: usize, options: &Options) -> Parser<'a> {
        Parser {
            tokens,
            index: 0,
            end,
            depth: 0,
            implicit_multiplication: options.implicit_multiplication_enabled(),
        }
    }

    /// Parse the whole token stream as one expression
    pub fn parse(&mut self) -> Result<Ast, Error> {
        if self.tokens.is_empty() {
            return Err(Error::parse(self.end, "empty expression"));
        }
        let node = self.expression()?;
        match self.peek() {
            None => Ok(node.ast),
            Some(token) => Err(Error::parse(
                token.position,
                format!("unexpected {} after a complete expression", token.kind),
            )),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    fn peek_op(&self) -> Option<Op> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Op(op),
                ..
            }) => Some(*op),
            _ => None,
        }
    }

    /// Position of the next token, or the end of input
    fn position(&self) -> usize {
        self.peek().map_or(self.end, |token| token.position)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.index);
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    /// Wrap `ast` into a node of the given `height`, unless the tree would
    /// be too tall
    fn node(&self, ast: Ast, height: usize, position: usize) -> Result<Node, Error> {
        if height > MAX_DEPTH {
            return Err(Error::parse(position, "expression is nested too deeply"));
        }
        Ok(Node { ast, height })
    }

    fn binary(&self, op: Op, left: Node, right: Node, position: usize) -> Result<Node, Error> {
        let height = left.height.max(right.height) + 1;
        self.node(
            Ast::Binary(op, Box::new(left.ast), Box::new(right.ast)),
            height,
            position,
        )
    }

    fn expression(&mut self) -> Result<Node, Error> {
        let mut left = self.term()?;
        while let Some(op @ (Op::Plus | Op::Minus)) = self.peek_op() {
            let position = self.position();
            self.next();
            let right = self.term()?;
            left = self.binary(op, left, right, position)?;
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Node, Error> {
        let mut left = self.unary()?;
        loop {
            let position = self.position();
            let op = match self.peek() {
                Some(Token {
                    kind: TokenKind::Op(op @ (Op::Mul | Op::Div)),
                    ..
                }) => {
                    self.next();
                    *op
                }
                Some(token) if self.implicit_multiplication && token.starts_primary() => Op::Mul,
                _ => return Ok(left),
            };
            let right = self.unary()?;
            left = self.binary(op, left, right, position)?;
        }
    }

    fn unary(&mut self) -> Result<Node, Error> {
        let position = self.position();
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::parse(position, "expression is nested too deeply"));
        }

        let node = match self.peek_op() {
            Some(Op::Minus) => {
                self.next();
                self.unary().and_then(|operand| {
                    self.node(
                        Ast::Neg(Box::new(operand.ast)),
                        operand.height + 1,
                        position,
                    )
                })
            }
            Some(Op::Plus) => {
                self.next();
                self.unary()
            }
            _ => self.power(),
        };

        self.depth -= 1;
        node
    }

    fn power(&mut self) -> Result<Node, Error> {
        let base = self.primary()?;
        if let Some(Op::Exp) = self.peek_op() {
            let position = self.position();
            self.next();
            let exponent = self.unary()?;
            return self.binary(Op::Exp, base, exponent, position);
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Node, Error> {
        let token = match self.next() {
            Some(token) => token,
            None => {
                return Err(Error::parse(
                    self.end,
                    "expected an operand, found end of input",
                ))
            }
        };

        match token.kind {
            TokenKind::Number(value) => Ok(Node::leaf(Ast::Value(value))),
            TokenKind::Variable => Ok(Node::leaf(Ast::Variable)),
            TokenKind::Identifier(ref name) => {
                if let Some((&name, &func)) = FUNCTIONS.get_key_value(name.as_str()) {
                    let arg = self.call_argument(name)?;
                    self.node(
                        Ast::Function(name, func, Box::new(arg.ast)),
                        arg.height + 1,
                        token.position,
                    )
                } else if let Some(&value) = CONSTANTS.get(name.as_str()) {
                    Ok(Node::leaf(Ast::Value(value)))
                } else {
                    Err(Error::parse(
                        token.position,
                        format!("unknown identifier '{}'", name),
                    ))
                }
            }
            TokenKind::LParen => {
                if let Some(Token {
                    kind: TokenKind::RParen,
                    position,
                }) = self.peek()
                {
                    return Err(Error::parse(*position, "empty parenthesis"));
                }
                let inner = self.expression()?;
                self.close(token.position)?;
                Ok(inner)
            }
            TokenKind::RParen | TokenKind::Op(_) => Err(Error::parse(
                token.position,
                format!("expected an operand, found {}", token.kind),
            )),
        }
    }

    /// Parse `'(' expression ')'` after the function `name`
    fn call_argument(&mut self, name: &str) -> Result<Node, Error> {
        let open = match self.next() {
            Some(Token {
                kind: TokenKind::LParen,
                position,
            }) => *position,
            Some(token) => {
                return Err(Error::parse(
                    token.position,
                    format!("expected '(' after function '{}', found {}", name, token.kind),
                ))
            }
            None => {
                return Err(Error::parse(
                    self.end,
                    format!("expected '(' after function '{}', found end of input", name),
                ))
            }
        };

        if let Some(Token {
            kind: TokenKind::RParen,
            position,
        }) = self.peek()
        {
            return Err(Error::parse(
                *position,
                format!("missing argument to function '{}'", name),
            ));
        }

        let arg = self.expression()?;
        self.close(open)?;
        Ok(arg)
    }

    /// Consume the `)` matching the `(` at `open`
    fn close(&mut self, open: usize) -> Result<(), Error> {
        match self.next() {
            Some(Token {
                kind: TokenKind::RParen,
                ..
            }) => Ok(()),
            Some(token) => Err(Error::parse(
                token.position,
                format!(
                    "expected ')' to close '(' at position {}, found {}",
                    open, token.kind
                ),
            )),
            None => Err(Error::parse(
                self.end,
                format!("unbalanced parenthesis: '(' at position {} is never closed", open),
            )),
        }
    }
}

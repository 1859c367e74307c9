use crate::error::Error;
use crate::token::{Op, Token, TokenKind};
use std::iter::{Enumerate, Peekable};
use std::str::Chars;

/// Split `input` into tokens.
///
/// Whitespace between tokens is skipped. Positions in the tokens and in the
/// returned errors are character offsets.
///
/// # Examples
///
/// ```
/// # use plotexpr::{tokenize, Op, TokenKind};
/// let tokens = tokenize("2 * x").unwrap();
/// let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
/// assert_eq!(kinds, [TokenKind::Number(2.0), TokenKind::Op(Op::Mul), TokenKind::Variable]);
///
/// assert!(tokenize("1.2.3").is_err());
/// ```
pub fn tokenize(input: &str) -> Result<Vec<Token>, Error> {
    Lexer::new(input).tokenize()
}

/// An helper struct for lexing the input
pub struct Lexer<'a> {
    input: Peekable<Enumerate<Chars<'a>>>,
}

impl<'a> Lexer<'a> {
    pub fn new(string: &'a str) -> Lexer<'a> {
        Lexer {
            input: string.chars().enumerate().peekable(),
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, Error> {
        let mut output = Vec::new();
        while let Some(token) = self.next_token()? {
            output.push(token);
        }
        log::trace!("tokens: {:?}", output);
        Ok(output)
    }

    fn next_token(&mut self) -> Result<Option<Token>, Error> {
        while let Some(&(_, c)) = self.input.peek() {
            if c.is_whitespace() {
                self.input.next();
            } else {
                break;
            }
        }

        let (position, c) = match self.input.next() {
            Some(next) => next,
            None => return Ok(None),
        };

        let kind = match c {
            c if c.is_ascii_digit() => self.number(position, c)?,
            c if c.is_alphabetic() => {
                let name = self.take_while(c, char::is_alphabetic);
                if name == "x" {
                    TokenKind::Variable
                } else {
                    TokenKind::Identifier(name)
                }
            }
            '+' => TokenKind::Op(Op::Plus),
            '-' => TokenKind::Op(Op::Minus),
            '*' => TokenKind::Op(Op::Mul),
            '/' => TokenKind::Op(Op::Div),
            '^' => TokenKind::Op(Op::Exp),
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            other => {
                return Err(Error::LexError {
                    position,
                    excerpt: other.to_string(),
                });
            }
        };
        Ok(Some(Token::new(kind, position)))
    }

    /// Lex a number literal starting with `first`. The whole run of digits
    /// and dots is consumed, so `1.2.3` is rejected instead of being split.
    fn number(&mut self, position: usize, first: char) -> Result<TokenKind, Error> {
        let literal = self.take_while(first, |c| c.is_ascii_digit() || c == '.');
        if !is_number_literal(&literal) {
            return Err(Error::LexError {
                position,
                excerpt: literal,
            });
        }
        match literal.parse() {
            Ok(value) => Ok(TokenKind::Number(value)),
            Err(_) => Err(Error::LexError {
                position,
                excerpt: literal,
            }),
        }
    }

    fn take_while(&mut self, first: char, accept: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        text.push(first);
        while let Some(&(_, c)) = self.input.peek() {
            if accept(c) {
                self.input.next();
                text.push(c);
            } else {
                break;
            }
        }
        text
    }
}

/// Check that `literal` is digits, optionally followed by a dot and more
/// digits
fn is_number_literal(literal: &str) -> bool {
    let mut parts = literal.splitn(2, '.');
    let integer = parts.next().unwrap_or("");
    let digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
    match parts.next() {
        None => digits(integer),
        Some(fraction) => digits(integer) && digits(fraction),
    }
}

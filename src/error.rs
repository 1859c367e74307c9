use thiserror::Error;

/// The category of an [`Error`](enum.Error.html), for callers that only need
/// to branch on where a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Tokenization failed
    Lex,
    /// The token stream did not match the grammar
    Parse,
    /// Evaluation failed
    Eval,
    /// Invalid plotting bounds or canvas size
    Viewport,
    /// Native code generation failed
    Jit,
}

/// Error type for the plotexpr crate
///
/// Positions are 0-based character offsets into the source text, so they can
/// be used directly to underline the faulty part of the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Some characters in the input do not form any known token
    #[error("LexError at position {position}: unexpected input '{excerpt}'")]
    LexError {
        /// Offset of the first offending character
        position: usize,
        /// The offending characters
        excerpt: String,
    },
    /// The tokens do not form a valid expression
    #[error("ParseError at position {position}: {message}")]
    ParseError {
        /// Offset of the offending token, or the input length at end of input
        position: usize,
        /// Human readable description
        message: String,
    },
    /// Error while evaluating an already compiled expression
    #[error("EvalError: {0}")]
    EvalError(String),
    /// Invalid viewport or canvas given to the plotting helpers
    #[error("ViewportError: {0}")]
    ViewportError(String),
    /// Native code generation failed
    #[error("JitError: {0}")]
    JitError(String),
}

impl Error {
    pub(crate) fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            position,
            message: message.into(),
        }
    }

    /// Get the category of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match *self {
            Self::LexError { .. } => ErrorKind::Lex,
            Self::ParseError { .. } => ErrorKind::Parse,
            Self::EvalError(_) => ErrorKind::Eval,
            Self::ViewportError(_) => ErrorKind::Viewport,
            Self::JitError(_) => ErrorKind::Jit,
        }
    }

    /// Get the character offset this error points to, if any
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match *self {
            Self::LexError { position, .. } | Self::ParseError { position, .. } => Some(position),
            Self::EvalError(_) | Self::ViewportError(_) | Self::JitError(_) => None,
        }
    }
}

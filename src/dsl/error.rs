//! Error types for the ARGBEX compiler.
//!
//! Every error is fatal to the compilation run and carries the source
//! line it originated from. The kind lets callers discriminate failures
//! without matching on message text.

use std::fmt;

/// An error that occurred while compiling an ARGBEX preset.
#[derive(Debug, Clone)]
pub struct CompileError {
    pub message: String,
    pub line: usize,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed source text: illegal name characters, unbalanced
    /// parentheses, missing braces, bad timestamps.
    Syntax,
    /// Wrong number of arguments to a built-in or a sequence.
    Arity,
    /// An argument could not be coerced to the declared kind, or a
    /// value appeared where it is not allowed.
    Type,
    /// A call name not found among built-ins or declared sequences.
    Registry,
    /// Sequence expansion exceeded the depth limit.
    Recursion,
}

impl CompileError {
    pub fn syntax(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
            kind: ErrorKind::Syntax,
        }
    }

    pub fn arity(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
            kind: ErrorKind::Arity,
        }
    }

    pub fn type_mismatch(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
            kind: ErrorKind::Type,
        }
    }

    pub fn registry(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
            kind: ErrorKind::Registry,
        }
    }

    pub fn recursion(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
            kind: ErrorKind::Recursion,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] {:?}: {}", self.line, self.kind, self.message)
    }
}

impl std::error::Error for CompileError {}

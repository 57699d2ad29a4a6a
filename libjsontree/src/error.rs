//! Error types for JSON parsing and document tree access.

use std::fmt;

use thiserror::Error;

use crate::node::{Kind, Position};
use crate::scanner::Symbol;

/// Result type for JSON parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// One-based source location used in diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl From<Position> for Location {
    fn from(position: Position) -> Self {
        Self {
            line: position.line + 1,
            column: position.column + 1,
        }
    }
}

/// Renders as a message suffix, e.g. ` at line 1 position 1`.
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " at line {} position {}", self.line, self.column)
    }
}

/// Broad classification of a [`ParseError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed token at the character level.
    Lexical,
    /// Well-formed tokens in an order the grammar does not allow.
    Syntax,
    /// Misuse of the document tree API.
    InvalidOperation,
}

/// Error type for JSON parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Character that cannot start any token.
    #[error("Unexpected character '{0}'{1}")]
    UnexpectedChar(char, Location),

    /// Mismatch inside `null`, `true` or `false`.
    #[error("Unexpected character '{found}'{at}. Keyword '{keyword}' was expected.")]
    UnexpectedKeywordChar {
        found: char,
        keyword: &'static str,
        at: Location,
    },

    /// Input ended inside a token.
    #[error("Unexpected EOI{0}")]
    UnexpectedEoi(Location),

    /// Fewer than four characters left after `\u`.
    #[error("Unexpected EOI, \\uXXXX escape expected.")]
    UnterminatedUnicodeEscape,

    /// Unknown character after a backslash.
    #[error("Unexpected escape sequence \\{0}")]
    UnexpectedEscape(char),

    /// `\u` followed by something other than four hex digits.
    #[error("Unexpected unicode escape sequence \\u{0}{1}")]
    InvalidUnicodeEscape(String, Location),

    /// Misplaced `-` or `.` in a number.
    #[error("Unexpected number format: Unexpected '{0}'{1}")]
    UnexpectedNumberChar(char, Location),

    /// Any other malformed number shape (misplaced `+`, empty parts).
    #[error("Unexpected number format{0}")]
    NumberFormat(Location),

    /// Missing or unparsable exponent digits.
    #[error("Unexpected number exponent format: {0}{1}")]
    ExponentFormat(String, Location),

    /// Integer literal that does not fit the integer payload.
    #[error("Number out of range: {0}{1}")]
    NumberOutOfRange(String, Location),

    /// Grammar violation.
    #[error("{expected} expected, but {found} found.")]
    Unexpected {
        expected: &'static str,
        found: Symbol,
        at: Location,
    },

    /// Container nesting beyond the configured limit.
    #[error("Maximum nesting depth of {limit} exceeded{at}")]
    NestingTooDeep { limit: usize, at: Location },

    /// Document tree misuse surfaced while building the tree.
    #[error(transparent)]
    InvalidOperation(#[from] InvalidOperation),
}

impl ParseError {
    /// Which part of the taxonomy this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ParseError::Unexpected { .. } | ParseError::NestingTooDeep { .. } => {
                ErrorCategory::Syntax
            }
            ParseError::InvalidOperation(_) => ErrorCategory::InvalidOperation,
            _ => ErrorCategory::Lexical,
        }
    }

    /// Source location of the offending token, when known.
    pub fn location(&self) -> Option<Location> {
        match self {
            ParseError::UnexpectedChar(_, at)
            | ParseError::UnexpectedEoi(at)
            | ParseError::InvalidUnicodeEscape(_, at)
            | ParseError::UnexpectedNumberChar(_, at)
            | ParseError::NumberFormat(at)
            | ParseError::ExponentFormat(_, at)
            | ParseError::NumberOutOfRange(_, at)
            | ParseError::UnexpectedKeywordChar { at, .. }
            | ParseError::Unexpected { at, .. }
            | ParseError::NestingTooDeep { at, .. } => Some(*at),
            ParseError::UnterminatedUnicodeEscape
            | ParseError::UnexpectedEscape(_)
            | ParseError::InvalidOperation(_) => None,
        }
    }
}

/// Contract violation on a [`crate::Node`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidOperation {
    /// Operation restricted to another variant.
    #[error("Operation '{operation}' is not valid. Json kind is {kind}")]
    WrongKind {
        operation: &'static str,
        kind: Kind,
    },

    /// End position may only be set once.
    #[error("End position is already set")]
    EndAlreadySet,
}

//! JSON parser producing a position-annotated document tree.
//!
//! Every node of the tree records where it starts in the source text, and
//! numbers keep the shape they were written in: integers, exact decimals and
//! exponent-form doubles are distinct payloads.
//!
//! # Parsing Pipeline
//!
//! 1. **Scanner**: Converts source text into symbols, decoding string escapes,
//!    classifying numbers and tracking line/column positions.
//!
//! 2. **Analyzer**: A one-symbol-lookahead recursive-descent parser that
//!    drives the scanner and assembles the document tree, failing at the first
//!    grammar violation.

mod analyzer;
mod decimal;
mod error;
mod node;
mod options;
mod scanner;

pub use analyzer::Analyzer;
pub use decimal::{Decimal, ParseDecimalError};
pub use error::{ErrorCategory, InvalidOperation, Location, ParseError, Result};
pub use node::{Kind, Node, Position, Scalar};
pub use options::ParseOptions;
pub use scanner::{Scanner, Symbol};

/// Parse a JSON document from a string.
///
/// # Example
///
/// ```
/// use libjsontree::{parse, Kind};
///
/// let root = parse("[42]").unwrap();
/// assert_eq!(root.kind(), Kind::List);
/// ```
pub fn parse(input: &str) -> Result<Node> {
    Analyzer::new(input).parse()
}

/// Parse a JSON document with explicit options.
pub fn parse_with_options(input: &str, options: ParseOptions) -> Result<Node> {
    Analyzer::with_options(input, options).parse()
}

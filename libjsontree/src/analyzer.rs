//! Syntactic analyzer.
//!
//! A recursive-descent parser with one symbol of lookahead. Each production
//! advances the scanner explicitly before inspecting the current symbol:
//!
//! ```text
//! document    := '{' object_body | '[' list_body
//! object_body := '}' | keyvalue (',' keyvalue)* '}'
//! keyvalue    := STRING ':' value
//! list_body   := ']' | value (',' value)* ']'
//! value       := '{' object_body | '[' list_body | VALUE
//! ```

use tracing::{debug, trace};

use crate::error::{Location, ParseError, Result};
use crate::node::{Node, Position, Scalar};
use crate::options::ParseOptions;
use crate::scanner::{Scanner, Symbol};

const EXPECTED_DOCUMENT: &str = "{ or [";
const EXPECTED_KEY: &str = "String Value";
const EXPECTED_VALUE: &str = "{, [ or Value (true, false, null, String, Number)";

/// Builds a document tree from source text.
pub struct Analyzer {
    scanner: Scanner,
    symbol: Symbol,
    options: ParseOptions,
    depth: usize,
}

impl Analyzer {
    /// Create an analyzer over `source` with default options.
    pub fn new(source: &str) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    pub fn with_options(source: &str, options: ParseOptions) -> Self {
        Self {
            scanner: Scanner::new(source),
            symbol: Symbol::Eoi,
            options,
            depth: 0,
        }
    }

    /// Parse the whole document and return its root.
    pub fn parse(mut self) -> Result<Node> {
        debug!(max_depth = ?self.options.max_depth, "parsing document");
        let root = match self.read_next()? {
            Symbol::OpenCurlyBracket => self.parse_object()?,
            Symbol::OpenSquareBracket => self.parse_list()?,
            _ => return Err(self.unexpected(EXPECTED_DOCUMENT)),
        };
        if self.read_next()? != Symbol::Eoi {
            return Err(self.unexpected("EOI"));
        }
        debug!(kind = %root.kind(), "parsed document");
        Ok(root)
    }

    /// Advance to the next symbol and make it current.
    fn read_next(&mut self) -> Result<Symbol> {
        self.symbol = self.scanner.next_symbol()?;
        Ok(self.symbol)
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::Unexpected {
            expected,
            found: self.symbol,
            at: Location::from(self.scanner.start()),
        }
    }

    /// Enter a container whose opening bracket is the current symbol.
    fn open(&mut self, make: fn(Position) -> Node) -> Result<Node> {
        self.depth += 1;
        let start = self.scanner.start();
        if let Some(limit) = self.options.max_depth.filter(|&limit| self.depth > limit) {
            return Err(ParseError::NestingTooDeep {
                limit,
                at: Location::from(start),
            });
        }
        let node = make(start);
        trace!(kind = %node.kind(), depth = self.depth, %start, "open");
        Ok(node)
    }

    /// Leave a container whose closing bracket is the current symbol.
    fn close(&mut self, mut node: Node) -> Result<Node> {
        node.set_end(self.scanner.end())?;
        self.depth -= 1;
        Ok(node)
    }

    // ========================================================================
    // Productions
    // ========================================================================

    fn parse_object(&mut self) -> Result<Node> {
        let mut node = self.open(Node::object)?;
        if self.read_next()? != Symbol::CloseCurlyBracket {
            self.parse_key_value(&mut node)?;
            while self.read_next()? == Symbol::Comma {
                self.read_next()?;
                self.parse_key_value(&mut node)?;
            }
            if self.symbol != Symbol::CloseCurlyBracket {
                return Err(self.unexpected("}"));
            }
        }
        self.close(node)
    }

    fn parse_key_value(&mut self, target: &mut Node) -> Result<()> {
        let key = match (self.symbol, self.scanner.take_value()) {
            (Symbol::Value, Some(Scalar::String(key))) => key,
            _ => return Err(self.unexpected(EXPECTED_KEY)),
        };
        if self.read_next()? != Symbol::Colon {
            return Err(self.unexpected(":"));
        }
        self.read_next()?;
        let value = self.parse_value()?;
        target.insert(key, value)?;
        Ok(())
    }

    fn parse_list(&mut self) -> Result<Node> {
        let mut node = self.open(Node::list)?;
        if self.read_next()? != Symbol::CloseSquareBracket {
            node.push(self.parse_value()?)?;
            while self.read_next()? == Symbol::Comma {
                self.read_next()?;
                node.push(self.parse_value()?)?;
            }
            if self.symbol != Symbol::CloseSquareBracket {
                return Err(self.unexpected("]"));
            }
        }
        self.close(node)
    }

    /// Parse the value starting at the current symbol.
    fn parse_value(&mut self) -> Result<Node> {
        match self.symbol {
            Symbol::OpenCurlyBracket => self.parse_object(),
            Symbol::OpenSquareBracket => self.parse_list(),
            Symbol::Value => match self.scanner.take_value() {
                Some(scalar) => Ok(Node::value(
                    self.scanner.start(),
                    self.scanner.position(),
                    scalar,
                )),
                None => Err(self.unexpected(EXPECTED_VALUE)),
            },
            _ => Err(self.unexpected(EXPECTED_VALUE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Kind;

    fn parse_err(source: &str) -> String {
        Analyzer::new(source).parse().unwrap_err().to_string()
    }

    #[test]
    fn test_empty_containers() {
        for source in ["{}", "{ }", " { \t\n\r } "] {
            let root = Analyzer::new(source).parse().unwrap();
            assert_eq!(root.kind(), Kind::Object);
            assert_eq!(root.len().unwrap(), 0);
        }
        for source in ["[]", "[ ]", " [ \t\n\r ] "] {
            let root = Analyzer::new(source).parse().unwrap();
            assert_eq!(root.kind(), Kind::List);
            assert_eq!(root.len().unwrap(), 0);
        }
    }

    #[test]
    fn test_container_spans() {
        let root = Analyzer::new("[\n  {\"a\": 1}\n]").parse().unwrap();
        assert_eq!(root.start(), Position::new(0, 0));
        assert_eq!(root.end(), Some(Position::new(2, 1)));

        let object = root.get(0).unwrap().unwrap();
        assert_eq!(object.start(), Position::new(1, 2));
        assert_eq!(object.end(), Some(Position::new(1, 10)));

        let value = object.get_key("a").unwrap().unwrap();
        assert_eq!(value.start(), Position::new(1, 8));
        assert_eq!(value.end(), Some(Position::new(1, 9)));
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(parse_err(""), "{ or [ expected, but EOI found.");
        assert_eq!(parse_err("42"), "{ or [ expected, but Value found.");
        assert_eq!(
            parse_err("{42: 1}"),
            "String Value expected, but Value found."
        );
        assert_eq!(
            parse_err("{\"a\" 1}"),
            ": expected, but Value found."
        );
        assert_eq!(parse_err("[1 2]"), "] expected, but Value found.");
        assert_eq!(parse_err("{\"a\": 1"), "} expected, but EOI found.");
        assert_eq!(
            parse_err("[1,]"),
            "{, [ or Value (true, false, null, String, Number) expected, but CloseSquareBracket found."
        );
        assert_eq!(parse_err("[] []"), "EOI expected, but OpenSquareBracket found.");
    }

    #[test]
    fn test_depth_limit() {
        let options = ParseOptions::bounded(2);
        assert!(Analyzer::with_options("[[1]]", options).parse().is_ok());
        let err = Analyzer::with_options("[[{}]]", options)
            .parse()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Maximum nesting depth of 2 exceeded at line 1 position 3"
        );
    }

    #[test]
    fn test_depth_limit_counts_nesting_not_siblings() {
        let options = ParseOptions::bounded(2);
        let root = Analyzer::with_options("[[1],[2],{\"a\":[]}]", options)
            .parse()
            .unwrap();
        assert_eq!(root.len().unwrap(), 3);
        assert!(Analyzer::with_options("[[1],[[2]]]", options)
            .parse()
            .is_err());
    }
}

//! Lexical scanner.
//!
//! The scanner turns source text into a stream of [`Symbol`]s, one per call to
//! [`Scanner::next_symbol`]. Value symbols carry a decoded [`Scalar`] that
//! stays available until the next call. It performs:
//! - Whitespace skipping with line/column tracking (CR LF is one line break,
//!   as are U+2028 and U+2029)
//! - String escape decoding
//! - Number classification into integer, decimal or double
//! - Keyword matching for `null`, `true` and `false`

use std::fmt;

use crate::decimal::Decimal;
use crate::error::{Location, ParseError, Result};
use crate::node::{Position, Scalar};

/// Token class produced by the scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// End of input.
    Eoi,
    OpenCurlyBracket,
    CloseCurlyBracket,
    OpenSquareBracket,
    CloseSquareBracket,
    Comma,
    Colon,
    /// String, number, `null`, `true` or `false`.
    Value,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Symbol::Eoi => "EOI",
            Symbol::OpenCurlyBracket => "OpenCurlyBracket",
            Symbol::CloseCurlyBracket => "CloseCurlyBracket",
            Symbol::OpenSquareBracket => "OpenSquareBracket",
            Symbol::CloseSquareBracket => "CloseSquareBracket",
            Symbol::Comma => "Comma",
            Symbol::Colon => "Colon",
            Symbol::Value => "Value",
        };
        f.write_str(name)
    }
}

/// Which number buffer digits currently go to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Part {
    Integer,
    Fraction,
    Exponent,
}

/// Digits of a number literal split into its three parts.
struct NumberParts {
    integer: String,
    fraction: String,
    exponent: String,
    has_fraction: bool,
    has_exponent: bool,
    current: Part,
}

impl NumberParts {
    fn new() -> Self {
        Self {
            integer: String::new(),
            fraction: String::new(),
            exponent: String::new(),
            has_fraction: false,
            has_exponent: false,
            current: Part::Integer,
        }
    }

    fn current_mut(&mut self) -> &mut String {
        match self.current {
            Part::Integer => &mut self.integer,
            Part::Fraction => &mut self.fraction,
            Part::Exponent => &mut self.exponent,
        }
    }

    /// Integer digits with any leading sign removed.
    fn integer_digits(&self) -> &str {
        self.integer.trim_start_matches('-')
    }
}

/// Streaming JSON tokenizer with position tracking.
pub struct Scanner {
    chars: Vec<char>,
    offset: usize,
    line: usize,
    column: usize,
    start: Position,
    value: Option<Scalar>,
}

impl Scanner {
    /// Create a scanner over `source`.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            offset: 0,
            line: 0,
            column: 0,
            start: Position::ZERO,
            value: None,
        }
    }

    /// Position of the first character of the last symbol.
    pub fn start(&self) -> Position {
        self.start
    }

    /// One column past [`Scanner::start`].
    pub fn end(&self) -> Position {
        Position::new(self.start.line, self.start.column + 1)
    }

    /// Current cursor, i.e. one past the last consumed character.
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Literal of the last [`Symbol::Value`].
    pub fn value(&self) -> Option<&Scalar> {
        self.value.as_ref()
    }

    /// Move the literal of the last [`Symbol::Value`] out of the scanner.
    pub fn take_value(&mut self) -> Option<Scalar> {
        self.value.take()
    }

    /// Scan the next symbol.
    pub fn next_symbol(&mut self) -> Result<Symbol> {
        self.value = None;
        self.skip_whitespace();
        self.start = self.position();

        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(Symbol::Eoi),
        };

        let symbol = match c {
            '{' => Symbol::OpenCurlyBracket,
            '}' => Symbol::CloseCurlyBracket,
            '[' => Symbol::OpenSquareBracket,
            ']' => Symbol::CloseSquareBracket,
            ',' => Symbol::Comma,
            ':' => Symbol::Colon,
            _ => {
                let value = match c {
                    '"' => Scalar::String(self.read_string()?),
                    '-' | '0'..='9' => self.read_number()?,
                    'n' => {
                        self.read_keyword("null")?;
                        Scalar::Null
                    }
                    't' => {
                        self.read_keyword("true")?;
                        Scalar::Bool(true)
                    }
                    'f' => {
                        self.read_keyword("false")?;
                        Scalar::Bool(false)
                    }
                    _ => return Err(ParseError::UnexpectedChar(c, self.at())),
                };
                self.value = Some(value);
                return Ok(Symbol::Value);
            }
        };
        self.bump();
        Ok(symbol)
    }

    // ========================================================================
    // Cursor
    // ========================================================================

    fn peek(&self) -> Option<char> {
        self.chars.get(self.offset).copied()
    }

    /// Consume one character, advancing line and column.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += 1;
        match c {
            // The LF of a CR LF pair does the line break.
            '\r' if self.peek() == Some('\n') => {}
            '\n' | '\r' | '\u{2028}' | '\u{2029}' => {
                self.line += 1;
                self.column = 0;
            }
            _ => self.column += 1,
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.bump();
        }
    }

    /// Location of the current token for diagnostics.
    fn at(&self) -> Location {
        Location::from(self.start)
    }

    // ========================================================================
    // Keywords
    // ========================================================================

    fn read_keyword(&mut self, keyword: &'static str) -> Result<()> {
        for expected in keyword.chars() {
            match self.peek() {
                None => return Err(ParseError::UnexpectedEoi(self.at())),
                Some(c) if c == expected => {
                    self.bump();
                }
                Some(found) => {
                    return Err(ParseError::UnexpectedKeywordChar {
                        found,
                        keyword,
                        at: self.at(),
                    })
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Strings
    // ========================================================================

    fn read_string(&mut self) -> Result<String> {
        self.bump(); // opening quote
        let mut result = String::new();
        loop {
            match self.bump() {
                None => return Err(ParseError::UnexpectedEoi(self.at())),
                Some('"') => return Ok(result),
                Some('\\') => {
                    let decoded = self.read_escape()?;
                    result.push(decoded);
                }
                Some(c) => result.push(c),
            }
        }
    }

    /// Decode the character following a backslash.
    fn read_escape(&mut self) -> Result<char> {
        let c = self
            .bump()
            .ok_or_else(|| ParseError::UnexpectedEoi(self.at()))?;
        match c {
            '"' => Ok('"'),
            '\\' => Ok('\\'),
            '/' => Ok('/'),
            'b' => Ok('\u{8}'),
            'f' => Ok('\u{c}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'u' => self.read_unicode_escape(),
            other => Err(ParseError::UnexpectedEscape(other)),
        }
    }

    /// Decode the four hex digits after `\u` as a single code unit.
    ///
    /// Surrogate pairs are not combined; a lone surrogate code unit has no
    /// `char` representation and decodes to U+FFFD.
    fn read_unicode_escape(&mut self) -> Result<char> {
        if self.offset + 4 > self.chars.len() {
            return Err(ParseError::UnterminatedUnicodeEscape);
        }
        let hex: String = self.chars[self.offset..self.offset + 4].iter().collect();
        let invalid = || ParseError::InvalidUnicodeEscape(hex.clone(), self.at());
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let code = u32::from_str_radix(&hex, 16).map_err(|_| invalid())?;
        for _ in 0..4 {
            self.bump();
        }
        Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    // ========================================================================
    // Numbers
    // ========================================================================

    /// Scan a number literal. The character that ends it is left unconsumed.
    fn read_number(&mut self) -> Result<Scalar> {
        let mut parts = NumberParts::new();

        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => parts.current_mut().push(c),
                '-' => {
                    if parts.current == Part::Fraction || !parts.current_mut().is_empty() {
                        return Err(ParseError::UnexpectedNumberChar('-', self.at()));
                    }
                    parts.current_mut().push('-');
                }
                '.' => {
                    if parts.current != Part::Integer
                        || parts.has_fraction
                        || parts.integer_digits().is_empty()
                    {
                        return Err(ParseError::UnexpectedNumberChar('.', self.at()));
                    }
                    parts.has_fraction = true;
                    parts.current = Part::Fraction;
                }
                '+' => {
                    if parts.current != Part::Exponent || !parts.exponent.is_empty() {
                        return Err(ParseError::NumberFormat(self.at()));
                    }
                }
                'e' | 'E' => {
                    parts.has_exponent = true;
                    parts.exponent.clear();
                    parts.current = Part::Exponent;
                }
                _ => break,
            }
            self.bump();
        }

        self.build_number(&parts)
    }

    /// Classify scanned digits: integer, decimal, or double when an exponent is present.
    fn build_number(&self, parts: &NumberParts) -> Result<Scalar> {
        let at = self.at();
        if parts.integer_digits().is_empty() || (parts.has_fraction && parts.fraction.is_empty())
        {
            return Err(ParseError::NumberFormat(at));
        }

        let mantissa = if parts.has_fraction {
            format!("{}.{}", parts.integer, parts.fraction)
        } else {
            parts.integer.clone()
        };

        if !parts.has_exponent {
            if parts.has_fraction {
                return mantissa
                    .parse::<Decimal>()
                    .map(Scalar::Decimal)
                    .map_err(|_| ParseError::NumberFormat(at));
            }
            return mantissa
                .parse::<i64>()
                .map(Scalar::Integer)
                .map_err(|_| ParseError::NumberOutOfRange(mantissa, at));
        }

        if parts.exponent.is_empty() || parts.exponent == "-" {
            return Err(ParseError::ExponentFormat(parts.exponent.clone(), at));
        }
        parts
            .exponent
            .parse::<i32>()
            .map_err(|_| ParseError::ExponentFormat(parts.exponent.clone(), at))?;

        // Round the whole literal once so long mantissas and large exponents
        // neither overflow nor lose precision in intermediate steps.
        format!("{}e{}", mantissa, parts.exponent)
            .parse::<f64>()
            .map(Scalar::Double)
            .map_err(|_| ParseError::NumberFormat(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scan a single value symbol and check that nothing follows it.
    fn scan_value(source: &str) -> Scalar {
        let mut scanner = Scanner::new(source);
        assert_eq!(scanner.next_symbol().unwrap(), Symbol::Value, "{}", source);
        let value = scanner.take_value().unwrap();
        assert_eq!(scanner.next_symbol().unwrap(), Symbol::Eoi, "{}", source);
        value
    }

    fn scan_error(source: &str) -> String {
        let mut scanner = Scanner::new(source);
        loop {
            match scanner.next_symbol() {
                Ok(Symbol::Eoi) => panic!("expected an error for {:?}", source),
                Ok(_) => {}
                Err(e) => return e.to_string(),
            }
        }
    }

    #[test]
    fn test_ignores_whitespace() {
        let mut scanner = Scanner::new("   \t\n\r [ \n \r ] \r\n");
        assert_eq!(scanner.next_symbol().unwrap(), Symbol::OpenSquareBracket);
        assert_eq!(scanner.next_symbol().unwrap(), Symbol::CloseSquareBracket);
        assert_eq!(scanner.next_symbol().unwrap(), Symbol::Eoi);
        assert_eq!(scanner.next_symbol().unwrap(), Symbol::Eoi);
    }

    #[test]
    fn test_special_characters() {
        let mut scanner = Scanner::new("{{[[,,]]}}::");
        let expected = [
            Symbol::OpenCurlyBracket,
            Symbol::OpenCurlyBracket,
            Symbol::OpenSquareBracket,
            Symbol::OpenSquareBracket,
            Symbol::Comma,
            Symbol::Comma,
            Symbol::CloseSquareBracket,
            Symbol::CloseSquareBracket,
            Symbol::CloseCurlyBracket,
            Symbol::CloseCurlyBracket,
            Symbol::Colon,
            Symbol::Colon,
            Symbol::Eoi,
        ];
        for symbol in expected {
            assert_eq!(scanner.next_symbol().unwrap(), symbol);
            assert!(scanner.value().is_none());
        }
    }

    #[test]
    fn test_integers() {
        for source in [
            "0", "000", "-0", "-1", "-42", "-42424242", "1", "7", "42", "42424242",
        ] {
            let expected: i64 = source.parse().unwrap();
            assert_eq!(scan_value(source), Scalar::Integer(expected), "{}", source);
        }
        assert_eq!(
            scan_value("9223372036854775807"),
            Scalar::Integer(i64::MAX)
        );
    }

    #[test]
    fn test_decimals() {
        for source in ["0.0", "000.000", "111.111", "424242.5555555", "-0.5"] {
            let expected: Decimal = source.parse().unwrap();
            assert_eq!(scan_value(source), Scalar::Decimal(expected), "{}", source);
        }
    }

    #[test]
    fn test_doubles() {
        let cases = [
            ("0e0", 0.0),
            ("1e1", 10.0),
            ("42e0", 42.0),
            ("42e-1", 4.2),
            ("42E-1", 4.2),
            ("42e1", 420.0),
            ("42e+1", 420.0),
            ("42E+1", 420.0),
            ("8e8", 800000000.0),
            ("-42e1", -420.0),
            ("-42e-1", -4.2),
            ("-42e+1", -420.0),
            ("4.2e1", 42.0),
            ("44.22e2", 4422.0),
        ];
        for (source, expected) in cases {
            assert_eq!(scan_value(source), Scalar::Double(expected), "{}", source);
        }
    }

    #[test]
    fn test_doubles_with_long_mantissa() {
        let padded = format!("1.{}e0", "0".repeat(320));
        assert_eq!(scan_value(&padded), Scalar::Double(1.0));

        let tiny = format!("0.{}1e330", "0".repeat(329));
        assert_eq!(scan_value(&tiny), Scalar::Double(1.0));

        assert_eq!(
            scan_value("9007199254740993.0e0"),
            Scalar::Double(9007199254740992.0)
        );
        assert_eq!(scan_value("1e400"), Scalar::Double(f64::INFINITY));
    }

    #[test]
    fn test_number_stops_at_delimiter() {
        let mut scanner = Scanner::new("[42,-1]");
        assert_eq!(scanner.next_symbol().unwrap(), Symbol::OpenSquareBracket);
        assert_eq!(scanner.next_symbol().unwrap(), Symbol::Value);
        assert_eq!(scanner.value(), Some(&Scalar::Integer(42)));
        assert_eq!(scanner.next_symbol().unwrap(), Symbol::Comma);
        assert_eq!(scanner.next_symbol().unwrap(), Symbol::Value);
        assert_eq!(scanner.value(), Some(&Scalar::Integer(-1)));
        assert_eq!(scanner.next_symbol().unwrap(), Symbol::CloseSquareBracket);
    }

    #[test]
    fn test_strings() {
        let cases = [
            (" \"\" ", ""),
            (" \"Lorem Ipsum\" ", "Lorem Ipsum"),
            (" \"Quote\\\"Quote\" ", "Quote\"Quote"),
            (" \"Slash\\/ Backslash\\\\\" ", "Slash/ Backslash\\"),
            (
                " \"Special B\\b F\\f N\\n R\\r T\\t\" ",
                "Special B\u{8} F\u{c} N\n R\r T\t",
            ),
            (" \"Unicode\\u0158\\u0159\" ", "Unicode\u{158}\u{159}"),
            (" \"Raw \u{158}\" ", "Raw \u{158}"),
        ];
        for (source, expected) in cases {
            assert_eq!(scan_value(source), Scalar::from(expected), "{}", source);
        }
    }

    #[test]
    fn test_surrogate_halves_are_not_combined() {
        assert_eq!(
            scan_value("\"\\uD83D\\uDE00\""),
            Scalar::from("\u{FFFD}\u{FFFD}")
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(scan_value("null"), Scalar::Null);
        assert_eq!(scan_value("true"), Scalar::Bool(true));
        assert_eq!(scan_value("false"), Scalar::Bool(false));
    }

    #[test]
    fn test_invalid_input_messages() {
        let cases = [
            (".", "Unexpected character '.' at line 1 position 1"),
            (
                "tx",
                "Unexpected character 'x' at line 1 position 1. Keyword 'true' was expected.",
            ),
            ("\"\\u", "Unexpected EOI, \\uXXXX escape expected."),
            ("\"\\u12", "Unexpected EOI, \\uXXXX escape expected."),
            ("\"\\x", "Unexpected escape sequence \\x"),
            ("\"\\", "Unexpected EOI at line 1 position 1"),
            ("0-", "Unexpected number format: Unexpected '-' at line 1 position 1"),
            ("-.", "Unexpected number format: Unexpected '.' at line 1 position 1"),
            ("0..", "Unexpected number format: Unexpected '.' at line 1 position 1"),
            ("0.0.", "Unexpected number format: Unexpected '.' at line 1 position 1"),
            ("0e0.0", "Unexpected number format: Unexpected '.' at line 1 position 1"),
            ("0+", "Unexpected number format at line 1 position 1"),
            ("0.0+", "Unexpected number format at line 1 position 1"),
            ("0e0+0", "Unexpected number format at line 1 position 1"),
            ("0e", "Unexpected number exponent format:  at line 1 position 1"),
            ("0e-", "Unexpected number exponent format: - at line 1 position 1"),
        ];
        for (source, expected) in cases {
            assert_eq!(scan_error(source), expected, "{}", source);
        }
    }

    #[test]
    fn test_more_invalid_input() {
        assert_eq!(scan_error("-"), "Unexpected number format at line 1 position 1");
        assert_eq!(scan_error("1."), "Unexpected number format at line 1 position 1");
        assert_eq!(
            scan_error("1.-5"),
            "Unexpected number format: Unexpected '-' at line 1 position 1"
        );
        assert_eq!(
            scan_error("99999999999999999999"),
            "Number out of range: 99999999999999999999 at line 1 position 1"
        );
        assert_eq!(
            scan_error("\"\\u12G4\""),
            "Unexpected unicode escape sequence \\u12G4 at line 1 position 1"
        );
        assert_eq!(scan_error("\"open"), "Unexpected EOI at line 1 position 1");
        assert_eq!(scan_error("nul"), "Unexpected EOI at line 1 position 1");
        assert_eq!(
            scan_error("  \n  @"),
            "Unexpected character '@' at line 2 position 3"
        );
    }

    #[test]
    fn test_positions() {
        let mut scanner = Scanner::new("{\r\n  \"key\": true,\n\u{2028}[12]}");
        assert_eq!(scanner.next_symbol().unwrap(), Symbol::OpenCurlyBracket);
        assert_eq!(scanner.start(), Position::new(0, 0));
        assert_eq!(scanner.end(), Position::new(0, 1));

        assert_eq!(scanner.next_symbol().unwrap(), Symbol::Value);
        assert_eq!(scanner.start(), Position::new(1, 2));
        assert_eq!(scanner.end(), Position::new(1, 3));
        assert_eq!(scanner.position(), Position::new(1, 7));

        assert_eq!(scanner.next_symbol().unwrap(), Symbol::Colon);
        assert_eq!(scanner.next_symbol().unwrap(), Symbol::Value);
        assert_eq!(scanner.start(), Position::new(1, 9));
        assert_eq!(scanner.position(), Position::new(1, 13));

        assert_eq!(scanner.next_symbol().unwrap(), Symbol::Comma);
        assert_eq!(scanner.next_symbol().unwrap(), Symbol::OpenSquareBracket);
        assert_eq!(scanner.start(), Position::new(3, 0));

        assert_eq!(scanner.next_symbol().unwrap(), Symbol::Value);
        assert_eq!(scanner.start(), Position::new(3, 1));
        assert_eq!(scanner.position(), Position::new(3, 3));
    }

    #[test]
    fn test_lone_carriage_return_breaks_line() {
        let mut scanner = Scanner::new("[\r  1,\r\r2]");
        assert_eq!(scanner.next_symbol().unwrap(), Symbol::OpenSquareBracket);
        assert_eq!(scanner.start(), Position::new(0, 0));

        assert_eq!(scanner.next_symbol().unwrap(), Symbol::Value);
        assert_eq!(scanner.start(), Position::new(1, 2));

        assert_eq!(scanner.next_symbol().unwrap(), Symbol::Comma);
        assert_eq!(scanner.start(), Position::new(1, 3));

        assert_eq!(scanner.next_symbol().unwrap(), Symbol::Value);
        assert_eq!(scanner.start(), Position::new(3, 0));
        assert_eq!(scanner.position(), Position::new(3, 1));

        assert_eq!(scanner.next_symbol().unwrap(), Symbol::CloseSquareBracket);
        assert_eq!(scanner.end(), Position::new(3, 2));
    }
}

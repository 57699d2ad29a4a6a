//! Document tree.
//!
//! A parsed document is a strict tree of [`Node`]s. Every node is one of three
//! kinds (object, list or scalar value) and carries the source position it
//! was built from. Kind-specific operations report an [`InvalidOperation`]
//! when called on a node of another kind.

use std::collections::{hash_map, HashMap};
use std::fmt;
use std::slice;

use crate::decimal::Decimal;
use crate::error::InvalidOperation;

/// Zero-based line and column in the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const ZERO: Position = Position { line: 0, column: 0 };

    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The variant of a [`Node`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Object,
    List,
    Value,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Object => "Object",
            Kind::List => "List",
            Kind::Value => "Value",
        };
        f.write_str(name)
    }
}

/// Payload of a value node.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// `null`.
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// Number without fraction or exponent.
    Integer(i64),
    /// Number with a fraction and no exponent.
    Decimal(Decimal),
    /// Number with an exponent.
    Double(f64),
    /// String literal with escapes decoded.
    String(String),
}

impl Scalar {
    /// Returns `true` if this is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Scalar::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            Scalar::Decimal(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Scalar::Double(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Decimal(d) => write!(f, "{}m", d),
            Scalar::Double(n) => write!(f, "{:?}", n),
            Scalar::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Integer(n)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Double(f)
    }
}

impl From<Decimal> for Scalar {
    fn from(d: Decimal) -> Self {
        Scalar::Decimal(d)
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Content {
    Object(HashMap<String, Node>),
    List(Vec<Node>),
    Value(Scalar),
}

/// A node of the document tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    start: Position,
    end: Option<Position>,
    content: Content,
}

impl Node {
    /// Empty object starting at `start`. The end is set once the closing brace is read.
    pub fn object(start: Position) -> Self {
        Self {
            start,
            end: None,
            content: Content::Object(HashMap::new()),
        }
    }

    /// Empty list starting at `start`.
    pub fn list(start: Position) -> Self {
        Self {
            start,
            end: None,
            content: Content::List(Vec::new()),
        }
    }

    /// Scalar value spanning `start..end`.
    pub fn value(start: Position, end: Position, value: impl Into<Scalar>) -> Self {
        Self {
            start,
            end: Some(end),
            content: Content::Value(value.into()),
        }
    }

    pub fn kind(&self) -> Kind {
        match self.content {
            Content::Object(_) => Kind::Object,
            Content::List(_) => Kind::List,
            Content::Value(_) => Kind::Value,
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    /// `None` until [`Node::set_end`] has been called on a container.
    pub fn end(&self) -> Option<Position> {
        self.end
    }

    /// Set the end position. Fails if it is already set.
    pub fn set_end(&mut self, end: Position) -> Result<(), InvalidOperation> {
        if self.end.is_some() {
            return Err(InvalidOperation::EndAlreadySet);
        }
        self.end = Some(end);
        Ok(())
    }

    fn wrong_kind(&self, operation: &'static str) -> InvalidOperation {
        InvalidOperation::WrongKind {
            operation,
            kind: self.kind(),
        }
    }

    // ========================================================================
    // Value
    // ========================================================================

    /// Scalar payload of a value node.
    pub fn scalar(&self) -> Result<&Scalar, InvalidOperation> {
        match &self.content {
            Content::Value(v) => Ok(v),
            _ => Err(self.wrong_kind("scalar")),
        }
    }

    // ========================================================================
    // Object and list
    // ========================================================================

    /// Number of children of an object or list.
    pub fn len(&self) -> Result<usize, InvalidOperation> {
        match &self.content {
            Content::Object(map) => Ok(map.len()),
            Content::List(list) => Ok(list.len()),
            Content::Value(_) => Err(self.wrong_kind("len")),
        }
    }

    pub fn is_empty(&self) -> Result<bool, InvalidOperation> {
        self.len().map(|n| n == 0)
    }

    // ========================================================================
    // List
    // ========================================================================

    /// Child at `index` of a list, `None` when out of range.
    pub fn get(&self, index: usize) -> Result<Option<&Node>, InvalidOperation> {
        match &self.content {
            Content::List(list) => Ok(list.get(index)),
            _ => Err(self.wrong_kind("get")),
        }
    }

    /// Children of a list in insertion order.
    pub fn iter(&self) -> Result<slice::Iter<'_, Node>, InvalidOperation> {
        match &self.content {
            Content::List(list) => Ok(list.iter()),
            _ => Err(self.wrong_kind("iter")),
        }
    }

    /// Append a child to a list.
    pub fn push(&mut self, child: Node) -> Result<(), InvalidOperation> {
        if let Content::List(list) = &mut self.content {
            list.push(child);
            return Ok(());
        }
        Err(self.wrong_kind("push"))
    }

    // ========================================================================
    // Object
    // ========================================================================

    /// Child stored under `key` in an object, `None` when absent.
    pub fn get_key(&self, key: &str) -> Result<Option<&Node>, InvalidOperation> {
        match &self.content {
            Content::Object(map) => Ok(map.get(key)),
            _ => Err(self.wrong_kind("get_key")),
        }
    }

    pub fn contains_key(&self, key: &str) -> Result<bool, InvalidOperation> {
        match &self.content {
            Content::Object(map) => Ok(map.contains_key(key)),
            _ => Err(self.wrong_kind("contains_key")),
        }
    }

    /// Keys of an object, in no particular order.
    pub fn keys(&self) -> Result<hash_map::Keys<'_, String, Node>, InvalidOperation> {
        match &self.content {
            Content::Object(map) => Ok(map.keys()),
            _ => Err(self.wrong_kind("keys")),
        }
    }

    /// Key/child pairs of an object, in no particular order.
    pub fn entries(&self) -> Result<hash_map::Iter<'_, String, Node>, InvalidOperation> {
        match &self.content {
            Content::Object(map) => Ok(map.iter()),
            _ => Err(self.wrong_kind("entries")),
        }
    }

    /// Insert `child` under `key`, replacing any previous child for that key.
    pub fn insert(&mut self, key: impl Into<String>, child: Node) -> Result<(), InvalidOperation> {
        if let Content::Object(map) = &mut self.content {
            map.insert(key.into(), child);
            return Ok(());
        }
        Err(self.wrong_kind("insert"))
    }
}

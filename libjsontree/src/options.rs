//! Parser configuration.

/// Options controlling a parse.
///
/// The default imposes no nesting limit: every nesting level of the input
/// costs one stack frame, so adversarial input can exhaust the stack. Use
/// [`ParseOptions::bounded`] when parsing untrusted documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of nested objects/lists, counting the root as 1.
    pub max_depth: Option<usize>,
}

impl ParseOptions {
    /// Options with a nesting limit of `max_depth`.
    pub const fn bounded(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }

    /// Options without a nesting limit.
    pub const fn unbounded() -> Self {
        Self { max_depth: None }
    }
}

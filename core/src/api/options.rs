//! Configuration options for parsing and evaluation.

/// Configuration options for parsing.
///
/// # Example
///
/// ```
/// use jel_core::api::ParseOptions;
///
/// let options = ParseOptions {
///     require_end: true,
///     ..Default::default()
/// };
/// assert_eq!(options.max_depth, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of sub-expressions (parentheses, unary chains,
    /// brackets, right-recursive products).
    ///
    /// Default: 256
    pub max_depth: usize,

    /// Reject input left over after the root expression.
    ///
    /// By default trailing tokens are ignored, so `a b` parses as `a`.
    ///
    /// Default: false
    pub require_end: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: 256,
            require_end: false,
        }
    }
}

/// Configuration options for expression evaluation.
///
/// These options control resource limits during evaluation.
///
/// # Example
///
/// ```
/// use jel_core::api::EvaluationOptions;
///
/// let options = EvaluationOptions { max_depth: 500 };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// Maximum evaluation stack depth (for recursion protection).
    ///
    /// Default: 1000
    pub max_depth: usize,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self { max_depth: 1000 }
    }
}

//! Core of the Jel expression language.
//!
//! Jel queries and transforms JSON documents with expressions such as
//! `orders.?[#this.total > 100].![id]` or `#join(names, ', ')`. An expression
//! is parsed once into an immutable AST and evaluated any number of times
//! against different documents.
//!
//! # Example
//!
//! ```
//! use jel_core::api::Expression;
//! use serde_json::json;
//!
//! let expr = Expression::parse("items.?[#this > 2]").unwrap();
//! let result = expr.evaluate(&json!({ "items": [1, 2, 3, 4] })).unwrap();
//! assert_eq!(result, json!([3, 4]));
//! ```

pub mod api;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod scope_stack;
pub mod stdlib;
pub mod values;

pub use api::{
    Diagnostic, Error, EvaluationOptions, Expression, ParseOptions, RelatedInfo, Severity,
};
pub use evaluator::EvaluationContext;
pub use functions::{FunctionError, FunctionRegistry, MethodRegistry};
pub use serde_json::Value;
pub use values::ValueKind;

/// Parse `source` into a reusable [`Expression`] with default options.
pub fn parse(source: &str) -> Result<Expression, Error> {
    Expression::parse(source)
}

/// Parse `source` into a reusable [`Expression`].
pub fn parse_with_options(source: &str, options: &ParseOptions) -> Result<Expression, Error> {
    Expression::parse_with_options(source, options)
}

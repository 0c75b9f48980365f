//! Jel - an embeddable expression language for JSON documents
//!
//! # Overview
//!
//! Jel evaluates short expressions against `serde_json::Value` documents.
//! Typical uses are configuration-driven data extraction, filtering rules and
//! small transformations supplied by users at runtime:
//!
//! - Property navigation: `order.customer?.name`
//! - Projection and selection: `items.?[price > 10].![name]`
//! - Inline collections: `{1, 2, 3}`, `{'key': value}`
//! - Operators: arithmetic, comparison, boolean, ternary and elvis (`?:`)
//! - Host functions: `#join(names, ', ')`
//!
//! # Quick Start
//!
//! ```
//! use jel::{Expression, Value};
//! use serde_json::json;
//!
//! let expr = Expression::parse("items.?[#this > 2].![#this * 10]").unwrap();
//! let result = expr.evaluate(&json!({ "items": [1, 2, 3, 4] })).unwrap();
//! assert_eq!(result, json!([30, 40]));
//! ```
//!
//! # Host Functions
//!
//! Register native functions on an [`EvaluationContext`]; they are called as
//! `#name(args)` and resolved by name and argument count:
//!
//! ```
//! use jel::{EvaluationContext, Expression, FunctionError, Value};
//! use serde_json::json;
//!
//! let doc = json!({ "a": 2, "b": 5 });
//! let mut ctx = EvaluationContext::new(&doc);
//! ctx.register_function("max", 2, |args| {
//!     match (args[0].as_i64(), args[1].as_i64()) {
//!         (Some(a), Some(b)) => Ok(Value::from(a.max(b))),
//!         _ => Err(FunctionError::message("max expects integers")),
//!     }
//! });
//!
//! let expr = Expression::parse("#max(a, b)").unwrap();
//! assert_eq!(expr.evaluate_in(&mut ctx).unwrap(), json!(5));
//! ```

mod error_renderer;

// Re-export public API from jel_core
pub use jel_core::api::{
    Diagnostic, Error, EvaluationOptions, Expression, ParseOptions, RelatedInfo, Severity,
};
pub use jel_core::{parse, parse_with_options};

// Re-export evaluation context, registries and values
pub use jel_core::evaluator::{EvalError, EvalErrorKind, EvaluationContext};
pub use jel_core::functions::{FunctionError, FunctionRegistry, MethodRegistry};
pub use jel_core::parser::{ParseError, ParseErrorKind};
pub use jel_core::stdlib;
pub use jel_core::values::ValueKind;
pub use serde_json::Value;

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

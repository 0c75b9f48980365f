//! Tree-walking AST evaluator for Jel expressions.
//!
//! The evaluator interprets parsed AST nodes (`Node`) against an
//! [`EvaluationContext`] and produces owned `serde_json::Value` results.
//!
//! ## Design Principles
//!
//! - **Never panic**: All adversarial inputs must be handled gracefully
//! - **Stack-safe**: Depth tracking prevents stack overflow from deeply nested expressions
//! - **Balanced scopes**: Navigation pushes the active value through
//!   `with_scope`, which always pops, so the scope stack is empty again after
//!   every evaluation, failed or not
//!
//! ## Example
//!
//! ```
//! use jel_core::{EvaluationContext, parser};
//! use serde_json::json;
//!
//! let node = parser::parse("items.?[#this > 1]").unwrap();
//! let doc = json!({ "items": [1, 2, 3] });
//! let mut ctx = EvaluationContext::new(&doc);
//! assert_eq!(ctx.evaluate(&node).unwrap(), json!([2, 3]));
//! ```

mod context;
mod error;
mod eval;
mod operators;


pub use context::EvaluationContext;
pub use error::{EvalError, EvalErrorKind};

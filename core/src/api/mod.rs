//! Public API for the Jel expression language.
//!
//! Parse text once into an [`Expression`], then evaluate it against any
//! number of JSON documents. Failures surface as [`Error`], which keeps the
//! expression text and converts to a [`Diagnostic`] for rendering.
//!
//! # Example
//!
//! ```
//! use jel_core::api::{EvaluationOptions, Expression};
//! use jel_core::EvaluationContext;
//! use serde_json::json;
//!
//! let expr = Expression::parse("orders.?[total > 100].![id]").unwrap();
//! let doc = json!({
//!     "orders": [
//!         { "id": 1, "total": 250 },
//!         { "id": 2, "total": 40 },
//!     ]
//! });
//!
//! let mut ctx = EvaluationContext::new(&doc)
//!     .with_options(EvaluationOptions { max_depth: 100 });
//! assert_eq!(expr.evaluate_in(&mut ctx).unwrap(), json!([1]));
//! ```

pub mod error;
pub mod expression;
pub mod options;

pub use error::{Diagnostic, Error, RelatedInfo, Severity};
pub use expression::Expression;
pub use options::{EvaluationOptions, ParseOptions};

//! Parsed Jel expressions.

use core::str::FromStr;

use serde_json::Value;
use tracing::debug;

use super::{Error, ParseOptions};
use crate::evaluator::EvaluationContext;
use crate::parser::{self, Node};

/// A parsed expression ready for evaluation.
///
/// The AST is owned and never mutated, so one `Expression` can be cloned
/// cheaply into worker threads or shared behind an `Arc` and evaluated
/// concurrently, each evaluation using its own [`EvaluationContext`].
///
/// # Example
///
/// ```
/// use jel_core::Expression;
/// use serde_json::json;
///
/// let expr: Expression = "price * quantity".parse().unwrap();
/// assert_eq!(expr.evaluate(&json!({ "price": 3, "quantity": 4 })).unwrap(), json!(12));
/// assert_eq!(expr.evaluate(&json!({ "price": 2.5, "quantity": 2 })).unwrap(), json!(5.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Node,
}

impl Expression {
    /// Parse `source` with default [`ParseOptions`].
    pub fn parse(source: &str) -> Result<Self, Error> {
        Self::parse_with_options(source, &ParseOptions::default())
    }

    pub fn parse_with_options(source: &str, options: &ParseOptions) -> Result<Self, Error> {
        let root = parser::parse_with_options(source, options).map_err(|error| Error::Parse {
            error,
            text: source.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    /// Evaluate against `document` with the standard library and default
    /// [`EvaluationOptions`](super::EvaluationOptions).
    pub fn evaluate(&self, document: &Value) -> Result<Value, Error> {
        self.evaluate_in(&mut EvaluationContext::new(document))
    }

    /// Evaluate with a caller-configured context.
    ///
    /// The context's scope stack is empty again when this returns, so the
    /// same context can be reused for further evaluations.
    pub fn evaluate_in(&self, ctx: &mut EvaluationContext<'_>) -> Result<Value, Error> {
        debug!(source = %self.source, "evaluating expression");
        ctx.evaluate(&self.root).map_err(|error| Error::Evaluation {
            error,
            text: self.source.clone(),
        })
    }

    /// The text this expression was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root of the parsed AST.
    pub fn root(&self) -> &Node {
        &self.root
    }
}

impl FromStr for Expression {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::parse(source)
    }
}

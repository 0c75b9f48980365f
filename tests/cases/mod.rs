//! Shared harness for the integration tests.
//!
//! ```ignore
//! test_case! {
//!     name: selection_first,
//!     input: "items.^[#this > 2]",
//!     doc: json!({ "items": [1, 2, 3] }),
//!     value: json!(3),
//! }
//! ```
//!
//! `doc` defaults to `null`. Use `error: "E006"` instead of `value` to expect
//! a failure with that diagnostic code.
#![allow(dead_code)]

use jel::{Error, EvaluationContext, Expression, Value};

/// Parse and evaluate `input` against `doc`, checking that the context's
/// scope stack is empty afterwards.
pub fn evaluate(input: &str, doc: &Value) -> Result<Value, Error> {
    let expr = Expression::parse(input)?;
    let mut ctx = EvaluationContext::new(doc);
    let result = expr.evaluate_in(&mut ctx);
    assert_eq!(ctx.depth(), 0, "scope stack not empty after `{input}`");
    result
}

/// Diagnostic code of a failing evaluation.
pub fn error_code(input: &str, doc: &Value) -> String {
    match evaluate(input, doc) {
        Ok(value) => panic!("`{input}` should fail, got {value}"),
        Err(err) => err.to_diagnostic().code.unwrap_or_default(),
    }
}

/// Parse a multi-line JSON document.
pub fn document(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

macro_rules! test_case {
    (
        name: $name:ident,
        input: $input:expr,
        $(doc: $doc:expr,)?
        value: $value:expr $(,)?
    ) => {
        #[test]
        fn $name() {
            let doc: jel::Value = test_case!(@doc $($doc)?);
            match $crate::cases::evaluate($input, &doc) {
                Ok(actual) => pretty_assertions::assert_eq!(actual, $value),
                Err(err) => panic!("`{}` failed: {}", $input, err),
            }
        }
    };
    (
        name: $name:ident,
        input: $input:expr,
        $(doc: $doc:expr,)?
        error: $code:expr $(,)?
    ) => {
        #[test]
        fn $name() {
            let doc: jel::Value = test_case!(@doc $($doc)?);
            pretty_assertions::assert_eq!($crate::cases::error_code($input, &doc), $code);
        }
    };
    (@doc) => {
        jel::Value::Null
    };
    (@doc $doc:expr) => {
        $doc
    };
}

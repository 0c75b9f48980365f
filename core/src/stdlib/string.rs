//! String functions.
//!
//! Design notes:
//! - `split` keeps empty segments, so `#split(',a,,b,', ',')` has five parts
//! - `upper`/`lower` are ASCII-only, matching the rest of the string handling
//! - Strings have no escapes at the syntax level; these functions never
//!   interpret backslashes either

use serde_json::Value;

use crate::functions::{FunctionError, FunctionRegistry, array_arg, str_arg};
use crate::values::ValueKind;

// ============================================================================
// Joining and splitting
// ============================================================================

/// Concatenate the string elements of a list, placing the separator strictly
/// between adjacent elements.
fn join(args: &[Value]) -> Result<Value, FunctionError> {
    let items = array_arg(args, 0)?;
    let separator = str_arg(args, 1)?;
    let parts = items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.as_str()),
            other => Err(FunctionError::message(format!(
                "join expects a list of strings, found {} element",
                ValueKind::of(other)
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::String(parts.join(separator)))
}

/// Split on every occurrence of a (possibly multi-character) separator.
fn split(args: &[Value]) -> Result<Value, FunctionError> {
    let text = str_arg(args, 0)?;
    let separator = str_arg(args, 1)?;
    if separator.is_empty() {
        return Err(FunctionError::message("split separator must not be empty"));
    }
    Ok(Value::Array(
        text.split(separator)
            .map(|part| Value::String(part.to_string()))
            .collect(),
    ))
}

// ============================================================================
// Transformation Functions (ASCII-only)
// ============================================================================

fn upper(args: &[Value]) -> Result<Value, FunctionError> {
    Ok(Value::String(str_arg(args, 0)?.to_ascii_uppercase()))
}

fn lower(args: &[Value]) -> Result<Value, FunctionError> {
    Ok(Value::String(str_arg(args, 0)?.to_ascii_lowercase()))
}

/// Trim whitespace from both ends
fn trim(args: &[Value]) -> Result<Value, FunctionError> {
    Ok(Value::String(str_arg(args, 0)?.trim().to_string()))
}

pub fn register_string_functions(registry: &mut FunctionRegistry) {
    registry
        .register("join", 2, join)
        .register("split", 2, split)
        .register("upper", 1, upper)
        .register("lower", 1, lower)
        .register("trim", 1, trim);
}

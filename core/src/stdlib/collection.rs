//! Collection functions.

use serde_json::Value;

use crate::functions::{FunctionError, FunctionRegistry, type_error};

/// Length of a string (in chars), array or object.
fn size(args: &[Value]) -> Result<Value, FunctionError> {
    let len = match &args[0] {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        other => return Err(type_error(0, "a string, array or object", other)),
    };
    Ok(Value::from(len))
}

/// Keys of an object in insertion order.
fn keys(args: &[Value]) -> Result<Value, FunctionError> {
    match &args[0] {
        Value::Object(map) => Ok(Value::Array(
            map.keys().map(|key| Value::String(key.clone())).collect(),
        )),
        other => Err(type_error(0, "an object", other)),
    }
}

pub fn register_collection_functions(registry: &mut FunctionRegistry) {
    registry.register("size", 1, size).register("keys", 1, keys);
}

#[cfg(test)]
#[path = "collection_test.rs"]
mod collection_test;

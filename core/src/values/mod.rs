//! Helpers over `serde_json::Value`: kind tags, truthiness, numeric views,
//! equality and ordering.
//!
//! The evaluator never inspects values directly for these questions; every
//! rule lives here so it is applied the same way everywhere.

mod compare;

use core::fmt;

use serde_json::{Number, Value};

pub use compare::{compare, loose_eq};

/// Runtime type tag of a value. Integers and floats are distinct kinds even
/// though both are JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> ValueKind {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(n) => match Numeric::from_number(n) {
                Numeric::Int(_) => ValueKind::Int,
                Numeric::Float(_) => ValueKind::Float,
            },
            Value::String(_) => ValueKind::Str,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Truthiness: null is false, booleans are themselves, numbers are true when
/// non-zero, strings and collections are true when non-empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => match Numeric::from_number(n) {
            Numeric::Int(i) => i != 0,
            Numeric::Float(f) => f != 0.0,
        },
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// A JSON number viewed for arithmetic.
///
/// Unsigned values above `i64::MAX` only occur in input documents and are
/// treated as floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub fn from_number(n: &Number) -> Numeric {
        if let Some(i) = n.as_i64() {
            Numeric::Int(i)
        } else {
            Numeric::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }

    pub fn from_value(value: &Value) -> Option<Numeric> {
        match value {
            Value::Number(n) => Some(Numeric::from_number(n)),
            _ => None,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Int(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }

    /// `None` when the float is not finite and so has no JSON form.
    pub fn to_value(self) -> Option<Value> {
        match self {
            Numeric::Int(i) => Some(Value::from(i)),
            Numeric::Float(f) => Number::from_f64(f).map(Value::Number),
        }
    }
}

/// Collection elements in iteration order: array elements, or object values
/// in insertion order.
pub fn elements(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        Value::Object(map) => Some(map.values().cloned().collect()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds_distinguish_int_and_float() {
        assert_eq!(ValueKind::of(&json!(1)), ValueKind::Int);
        assert_eq!(ValueKind::of(&json!(i64::MAX as u64)), ValueKind::Int);
        // Above `i64::MAX` arithmetic sees a float, and so does the kind.
        assert_eq!(ValueKind::of(&json!(u64::MAX)), ValueKind::Float);
        assert_eq!(ValueKind::of(&json!(1.0)), ValueKind::Float);
        assert_eq!(ValueKind::of(&json!("x")), ValueKind::Str);
        assert_eq!(ValueKind::of(&json!(null)).to_string(), "null");
    }

    #[test]
    fn truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(-1), json!(0.5), json!("0"), json!([0]), json!({"a": null})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn numeric_view() {
        assert_eq!(Numeric::from_value(&json!(3)), Some(Numeric::Int(3)));
        assert_eq!(Numeric::from_value(&json!(2.5)), Some(Numeric::Float(2.5)));
        assert_eq!(
            Numeric::from_value(&json!(u64::MAX)),
            Some(Numeric::Float(u64::MAX as f64))
        );
        assert_eq!(Numeric::from_value(&json!("3")), None);
        assert_eq!(Numeric::Float(f64::INFINITY).to_value(), None);
    }

    #[test]
    fn object_elements_keep_insertion_order() {
        let value: Value = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        assert_eq!(elements(&value), Some(vec![json!(1), json!(2), json!(3)]));
        assert_eq!(elements(&json!("abc")), None);
    }
}

use core::cmp::Ordering;

use serde_json::{Map, Value};

use super::Numeric;

/// Equality where numbers compare by value across int and float
/// (`1 == 1.0`). Collections compare element-wise with the same rule.
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            numeric_cmp(Numeric::from_number(a), Numeric::from_number(b)) == Ordering::Equal
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| loose_eq(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| loose_eq(x, y)))
        }
        _ => left == right,
    }
}

/// Total order over all values.
///
/// Values of different kinds order as null < bool < number < object < array
/// < string. Within a kind: numbers by value, strings by bytes, arrays
/// lexicographically, objects by their entries sorted by key.
pub fn compare(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            numeric_cmp(Numeric::from_number(a), Numeric::from_number(b))
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => a
            .iter()
            .zip(b)
            .map(|(x, y)| compare(x, y))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        (Value::Object(a), Value::Object(b)) => compare_objects(a, b),
        _ => rank(left).cmp(&rank(right)),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::String(_) => 5,
    }
}

fn numeric_cmp(a: Numeric, b: Numeric) -> Ordering {
    match (a, b) {
        (Numeric::Int(x), Numeric::Int(y)) => x.cmp(&y),
        (a, b) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
    }
}

fn compare_objects(a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
    let mut left: Vec<_> = a.iter().collect();
    let mut right: Vec<_> = b.iter().collect();
    left.sort_by(|x, y| x.0.cmp(y.0));
    right.sort_by(|x, y| x.0.cmp(y.0));
    left.iter()
        .zip(&right)
        .map(|((ka, va), (kb, vb))| ka.cmp(kb).then_with(|| compare(va, vb)))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| left.len().cmp(&right.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_are_loosely_equal_across_int_and_float() {
        assert!(loose_eq(&json!(1), &json!(1.0)));
        assert!(loose_eq(&json!([1, {"a": 2}]), &json!([1.0, {"a": 2.0}])));
        assert!(!loose_eq(&json!(1), &json!("1")));
        assert!(!loose_eq(&json!(null), &json!(false)));
        assert!(!loose_eq(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }

    #[test]
    fn object_equality_ignores_key_order() {
        let a: Value = serde_json::from_str(r#"{"a": 1, "b": 2}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"b": 2, "a": 1}"#).unwrap();
        assert!(loose_eq(&a, &b));
        assert_eq!(compare(&a, &b), Ordering::Equal);
    }

    #[test]
    fn numbers_order_by_value() {
        assert_eq!(compare(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(compare(&json!(2.5), &json!(2)), Ordering::Greater);
        assert_eq!(compare(&json!(-1), &json!(-1.0)), Ordering::Equal);
    }

    #[test]
    fn kinds_order_across_types() {
        let ascending = [
            json!(null),
            json!(true),
            json!(100),
            json!({"a": 1}),
            json!([1]),
            json!(""),
        ];
        for pair in ascending.windows(2) {
            assert_eq!(compare(&pair[0], &pair[1]), Ordering::Less, "{} < {}", pair[0], pair[1]);
            assert_eq!(compare(&pair[1], &pair[0]), Ordering::Greater);
        }
    }

    #[test]
    fn strings_and_arrays_order_lexicographically() {
        assert_eq!(compare(&json!("Jack"), &json!("Rose")), Ordering::Less);
        assert_eq!(compare(&json!("ab"), &json!("a")), Ordering::Greater);
        assert_eq!(compare(&json!([1, 2]), &json!([1, 3])), Ordering::Less);
        assert_eq!(compare(&json!([1, 2]), &json!([1])), Ordering::Greater);
    }
}

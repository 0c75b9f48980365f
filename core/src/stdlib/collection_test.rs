use super::*;
use crate::values::ValueKind;
use serde_json::json;

#[test]
fn test_size_of_each_kind() {
    assert_eq!(size(&[json!("héllo")]), Ok(json!(5)));
    assert_eq!(size(&[json!([1, 2, 3])]), Ok(json!(3)));
    assert_eq!(size(&[json!({"a": 1, "b": 2})]), Ok(json!(2)));
    assert_eq!(size(&[json!([])]), Ok(json!(0)));
}

#[test]
fn test_size_rejects_scalars() {
    assert_eq!(
        size(&[json!(42)]),
        Err(FunctionError::ArgumentType {
            index: 0,
            expected: "a string, array or object",
            found: ValueKind::Int,
        })
    );
    assert!(size(&[json!(null)]).is_err());
}

#[test]
fn test_keys_keep_insertion_order() {
    let object: Value = serde_json::from_str(r#"{"zeta": 1, "alpha": 2}"#).unwrap();
    assert_eq!(keys(&[object]), Ok(json!(["zeta", "alpha"])));
    assert_eq!(keys(&[json!({})]), Ok(json!([])));
}

#[test]
fn test_keys_requires_object() {
    assert!(keys(&[json!(["a"])]).is_err());
}

#[test]
fn test_registration() {
    let mut registry = FunctionRegistry::new();
    register_collection_functions(&mut registry);
    assert!(registry.contains("size", 1));
    assert!(registry.contains("keys", 1));
    assert!(!registry.contains("size", 2));
}

//! Structural checks used by candidate validators.
//!
//! Required fields must be present with the right JSON type. Optional fields
//! may be absent or `null`, but if set they must have the right type.

use serde_json::{Map, Value};

pub type Object = Map<String, Value>;

pub fn object(v: &Value) -> Option<&Object> {
    v.as_object()
}

fn required(obj: &Object, key: &str, check: fn(&Value) -> bool) -> bool {
    obj.get(key).is_some_and(check)
}

fn optional(obj: &Object, key: &str, check: fn(&Value) -> bool) -> bool {
    match obj.get(key) {
        None | Some(Value::Null) => true,
        Some(v) => check(v),
    }
}

pub fn string(obj: &Object, key: &str) -> bool {
    required(obj, key, Value::is_string)
}

pub fn number(obj: &Object, key: &str) -> bool {
    required(obj, key, Value::is_number)
}

pub fn unsigned(obj: &Object, key: &str) -> bool {
    required(obj, key, Value::is_u64)
}

pub fn boolean(obj: &Object, key: &str) -> bool {
    required(obj, key, Value::is_boolean)
}

pub fn array(obj: &Object, key: &str) -> bool {
    required(obj, key, Value::is_array)
}

pub fn nested(obj: &Object, key: &str) -> bool {
    required(obj, key, Value::is_object)
}

pub fn optional_string(obj: &Object, key: &str) -> bool {
    optional(obj, key, Value::is_string)
}

pub fn optional_number(obj: &Object, key: &str) -> bool {
    optional(obj, key, Value::is_number)
}

/// Field is a string equal to `expected`.
pub fn literal(obj: &Object, key: &str, expected: &str) -> bool {
    obj.get(key).and_then(Value::as_str) == Some(expected)
}

/// Field is an array whose every element passes `item`.
pub fn array_of(obj: &Object, key: &str, item: fn(&Value) -> bool) -> bool {
    obj.get(key)
        .and_then(Value::as_array)
        .is_some_and(|items| items.iter().all(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn optional_fields_accept_null_and_absent() {
        let v = json!({"a": null});
        let obj = object(&v).unwrap();
        assert!(optional_string(obj, "a"));
        assert!(optional_string(obj, "missing"));
        assert!(!string(obj, "a"));
    }

    #[test]
    fn typed_checks() {
        let v = json!({"s": "x", "n": 1.5, "u": 3, "b": true, "arr": [1, 2], "o": {}});
        let obj = object(&v).unwrap();
        assert!(string(obj, "s"));
        assert!(number(obj, "n"));
        assert!(!unsigned(obj, "n"));
        assert!(unsigned(obj, "u"));
        assert!(boolean(obj, "b"));
        assert!(array(obj, "arr"));
        assert!(nested(obj, "o"));
        assert!(literal(obj, "s", "x"));
        assert!(!literal(obj, "s", "y"));
        assert!(array_of(obj, "arr", Value::is_u64));
        assert!(!optional_number(obj, "s"));
    }
}

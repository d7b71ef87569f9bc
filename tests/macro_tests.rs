use serde_rapid::{rapid, Array, Object, RapidMap, Value};

#[test]
fn test_rapid_macro_booleans() {
    assert_eq!(rapid!(true), Value::Bool(true));
    assert_eq!(rapid!(false), Value::Bool(false));
}

#[test]
fn test_rapid_macro_numbers() {
    assert_eq!(rapid!(42), Value::Int(42));
    assert_eq!(rapid!(3.5), Value::Float(3.5));
    assert_eq!(rapid!(-123), Value::Int(-123));
    assert_eq!(rapid!(u32::MAX), Value::Int(i64::from(u32::MAX)));
}

#[test]
fn test_rapid_macro_strings() {
    assert_eq!(rapid!("hello world"), Value::String("hello world".to_string()));
    assert_eq!(rapid!(""), Value::String(String::new()));

    let owned = String::from("owned");
    assert_eq!(rapid!(owned), Value::from("owned"));
}

#[test]
fn test_rapid_macro_arrays() {
    assert_eq!(rapid!([]), Value::Array(Array::Values(vec![])));
    assert_eq!(rapid!([1, 2, 3]), Value::Array(Array::Ints(vec![1, 2, 3])));
    assert_eq!(
        rapid!(["a", "b"]),
        Value::Array(Array::Strings(vec!["a".to_string(), "b".to_string()]))
    );
    assert_eq!(
        rapid!([true, false]),
        Value::Array(Array::Bools(vec![true, false]))
    );
    assert_eq!(rapid!([0.5, -1.0]), Value::Array(Array::Floats(vec![0.5, -1.0])));

    let mixed = rapid!([1, "hello", true, 2.5]);
    assert_eq!(
        mixed,
        Value::Array(Array::Values(vec![
            Value::Int(1),
            Value::String("hello".to_string()),
            Value::Bool(true),
            Value::Float(2.5),
        ]))
    );
}

#[test]
fn test_rapid_macro_objects() {
    assert_eq!(rapid!({}), Value::Object(Object::Values(RapidMap::new())));

    let simple_object = rapid!({
        "name": "Alice",
        "age": 30
    });
    let obj = simple_object.as_object().unwrap();
    assert_eq!(obj.len(), 2);
    assert_eq!(obj.get("name"), Some(Value::String("Alice".to_string())));
    assert_eq!(obj.get("age"), Some(Value::Int(30)));

    assert!(matches!(
        rapid!({ "a": "x", "b": "y" }),
        Value::Object(Object::Strings(_))
    ));
    assert!(matches!(
        rapid!({ "a": 1, "b": 1000 }),
        Value::Object(Object::Ints(_))
    ));
}

#[test]
fn test_rapid_macro_nested() {
    let nested = rapid!({
        "user": {
            "id": 123,
            "name": "Bob",
            "active": true
        },
        "tags": ["admin", "developer"],
        "count": 42
    });

    let obj = nested.as_object().unwrap();
    assert_eq!(obj.len(), 3);

    match obj.get("user") {
        Some(Value::Object(user)) => {
            assert_eq!(user.get("id"), Some(Value::Int(123)));
            assert_eq!(user.get("name"), Some(Value::from("Bob")));
            assert_eq!(user.get("active"), Some(Value::Bool(true)));
        }
        other => panic!("expected user to be an object, got {other:?}"),
    }

    match obj.get("tags") {
        Some(Value::Array(tags)) => {
            assert_eq!(tags.len(), 2);
            assert_eq!(tags.get(0), Some(Value::from("admin")));
            assert_eq!(tags.get(1), Some(Value::from("developer")));
        }
        other => panic!("expected tags to be an array, got {other:?}"),
    }

    assert_eq!(obj.get("count"), Some(Value::Int(42)));
}

#[test]
fn test_rapid_value_methods() {
    let bool_val = rapid!(true);
    assert!(bool_val.is_bool());
    assert!(!bool_val.is_int());
    assert_eq!(bool_val.as_bool(), Some(true));

    let int_val = rapid!(7);
    assert_eq!(int_val.as_i64(), Some(7));
    assert_eq!(int_val.as_f64(), Some(7.0));

    let str_val = rapid!("hello");
    assert!(str_val.is_string());
    assert_eq!(str_val.as_str(), Some("hello"));

    let array_val = rapid!([1, 2, 3]);
    assert!(array_val.is_array());
    assert_eq!(array_val.as_array().unwrap().len(), 3);

    let obj_val = rapid!({"key": "value"});
    assert!(obj_val.is_object());
    assert_eq!(obj_val.as_object().unwrap().len(), 1);
}

#[test]
fn test_rapid_macro_matches_serialization() {
    let from_macro = rapid!({ "xs": [1, 2], "name": "n" });
    let from_serde = serde_rapid::to_value(&serde_json::json!({ "xs": [1, 2], "name": "n" }))
        .unwrap();
    assert_eq!(from_macro, from_serde);
}

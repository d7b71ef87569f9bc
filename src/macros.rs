/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Arrays and objects are narrowed the same way serialized containers are:
/// `rapid!([1, 2])` is an array of ints and `rapid!({ "a": "x" })` a map of
/// strings. Scalars go through `Value::from`, so any expression with a
/// `From` conversion can appear as a leaf.
///
/// ```rust
/// use serde_rapid::{rapid, Value};
///
/// let limit = 10;
/// let value = rapid!({
///     "name": "rapid",
///     "limit": limit,
///     "ratio": -0.5,
///     "tags": ["fast", "binary"],
///     "nested": { "ok": true, "items": [1, "two", [3.0]] }
/// });
///
/// let object = value.as_object().unwrap();
/// assert_eq!(object.get("limit"), Some(Value::Int(10)));
/// assert_eq!(object.len(), 5);
/// ```
#[macro_export]
macro_rules! rapid {
    // Array elements, accumulated one at a time.
    (@array [$($elems:expr),*]) => {
        ::std::vec![$($elems),*]
    };
    (@array [$($elems:expr,)*]) => {
        ::std::vec![$($elems,)*]
    };
    (@array [$($elems:expr,)*] [$($array:tt)*] $($rest:tt)*) => {
        $crate::rapid!(@array [$($elems,)* $crate::rapid!([$($array)*])] $($rest)*)
    };
    (@array [$($elems:expr,)*] {$($map:tt)*} $($rest:tt)*) => {
        $crate::rapid!(@array [$($elems,)* $crate::rapid!({$($map)*})] $($rest)*)
    };
    (@array [$($elems:expr,)*] $next:expr, $($rest:tt)*) => {
        $crate::rapid!(@array [$($elems,)* $crate::rapid!($next),] $($rest)*)
    };
    (@array [$($elems:expr,)*] $last:expr) => {
        $crate::rapid!(@array [$($elems,)* $crate::rapid!($last)])
    };
    (@array [$($elems:expr),*] , $($rest:tt)*) => {
        $crate::rapid!(@array [$($elems,)*] $($rest)*)
    };

    // Object entries, inserted one at a time.
    (@object $object:ident) => {};
    (@object $object:ident , $($rest:tt)*) => {
        $crate::rapid!(@object $object $($rest)*);
    };
    (@object $object:ident $key:literal : [$($array:tt)*] $($rest:tt)*) => {
        $object.insert(::std::string::String::from($key), $crate::rapid!([$($array)*]));
        $crate::rapid!(@object $object $($rest)*);
    };
    (@object $object:ident $key:literal : {$($map:tt)*} $($rest:tt)*) => {
        $object.insert(::std::string::String::from($key), $crate::rapid!({$($map)*}));
        $crate::rapid!(@object $object $($rest)*);
    };
    (@object $object:ident $key:literal : $value:expr , $($rest:tt)*) => {
        $object.insert(::std::string::String::from($key), $crate::rapid!($value));
        $crate::rapid!(@object $object $($rest)*);
    };
    (@object $object:ident $key:literal : $value:expr) => {
        $object.insert(::std::string::String::from($key), $crate::rapid!($value));
    };

    ([]) => {
        $crate::Value::array(::std::vec::Vec::new())
    };
    ([ $($tt:tt)+ ]) => {
        $crate::Value::array($crate::rapid!(@array [] $($tt)+))
    };
    ({}) => {
        $crate::Value::object($crate::RapidMap::new())
    };
    ({ $($tt:tt)+ }) => {{
        let mut object = $crate::RapidMap::new();
        $crate::rapid!(@object object $($tt)+);
        $crate::Value::object(object)
    }};
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::value::{Array, Object};
    use crate::{RapidMap, Value};

    #[test]
    fn test_rapid_macro_scalars() {
        assert_eq!(rapid!(true), Value::Bool(true));
        assert_eq!(rapid!(42), Value::Int(42));
        assert_eq!(rapid!(-7), Value::Int(-7));
        assert_eq!(rapid!(3.5), Value::Float(3.5));
        assert_eq!(rapid!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_rapid_macro_arrays() {
        assert_eq!(rapid!([]), Value::Array(Array::Values(vec![])));
        assert_eq!(rapid!([1, 2, 3]), Value::Array(Array::Ints(vec![1, 2, 3])));
        assert_eq!(
            rapid!(["a", 1,]),
            Value::Array(Array::Values(vec![Value::from("a"), Value::Int(1)]))
        );

        match rapid!([[1], { "k": "v" }]) {
            Value::Array(Array::Values(values)) => {
                assert_eq!(values.len(), 2);
                assert_eq!(values[0], Value::Array(Array::Ints(vec![1])));
            }
            other => panic!("expected a dynamic array, got {other:?}"),
        }
    }

    #[test]
    fn test_rapid_macro_objects() {
        assert_eq!(rapid!({}), Value::Object(Object::Values(RapidMap::new())));

        let obj = rapid!({
            "name": "Alice",
            "age": 30,
        });
        match obj {
            Value::Object(Object::Values(map)) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map.get("name"), Some(&Value::from("Alice")));
                assert_eq!(map.get("age"), Some(&Value::Int(30)));
            }
            other => panic!("expected a dynamic object, got {other:?}"),
        }

        assert!(matches!(
            rapid!({ "a": 1, "b": 2 }),
            Value::Object(Object::Ints(_))
        ));
    }
}

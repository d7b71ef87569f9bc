use serde::{Deserialize, Serialize};
use serde_rapid::{
    from_reader, from_slice, from_value, rapid, to_value, to_vec, to_writer, Array, Decoder,
    Encoder, Error, Object, Value,
};
use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
enum Command {
    Stop,
    Move { x: i32, y: i32 },
    Say(String),
    Batch(Vec<Command>),
}

mod bytes_as_seq {
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_bytes(bytes)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        struct Visitor;
        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = Vec<u8>;
            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("bytes")
            }
            fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Vec<u8>, E> {
                Ok(v)
            }
        }
        d.deserialize_byte_buf(Visitor)
    }
}

fn assert_roundtrip<T>(original: &T)
where
    T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug,
{
    let bytes = to_vec(original).unwrap();
    let deserialized: T = from_slice(&bytes).unwrap();
    assert_eq!(*original, deserialized);
}

fn alice() -> User {
    User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    }
}

#[test]
fn test_simple_struct() {
    assert_roundtrip(&alice());
}

#[test]
fn test_nested_struct() {
    let order = Order {
        order_id: 12345,
        customer: User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["vip".to_string()],
        },
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-002".to_string(),
                price: 49.99,
                quantity: 1,
            },
        ],
        total: 109.97,
    };
    assert_roundtrip(&order);
}

#[test]
fn test_array_of_objects() {
    let products = vec![
        Product {
            sku: "A001".to_string(),
            price: 10.99,
            quantity: 5,
        },
        Product {
            sku: "B002".to_string(),
            price: 15.99,
            quantity: 3,
        },
    ];
    assert_roundtrip(&products);
}

#[test]
fn test_primitives() {
    assert_roundtrip(&42i32);
    assert_roundtrip(&3.5f64);
    assert_roundtrip(&true);
    assert_roundtrip(&false);
    assert_roundtrip(&'x');
    assert_roundtrip(&"hello world".to_string());
    assert_roundtrip(&vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_numbers() {
    assert_roundtrip(&0i8);
    assert_roundtrip(&127i8);
    assert_roundtrip(&-128i8);
    assert_roundtrip(&32767i16);
    assert_roundtrip(&-32768i16);
    assert_roundtrip(&2147483647i32);
    assert_roundtrip(&-2147483648i32);
    assert_roundtrip(&9223372036854775807i64);
    assert_roundtrip(&-9223372036854775808i64);

    assert_roundtrip(&255u8);
    assert_roundtrip(&65535u16);
    assert_roundtrip(&4294967295u32);
    assert_roundtrip(&(i64::MAX as u64));
    assert_roundtrip(&(i64::MIN as i128));

    assert_roundtrip(&3.5f32);
    assert_roundtrip(&-2.5f32);
    assert_roundtrip(&0.0f64);
    assert_roundtrip(&f64::INFINITY);
    assert_roundtrip(&-5.75f64);
}

#[test]
fn test_out_of_range_integers() {
    assert!(matches!(to_vec(&u64::MAX), Err(Error::IntegerOverflow(_))));
    assert!(matches!(to_vec(&i128::MIN), Err(Error::IntegerOverflow(_))));

    // In range on the wire, out of range for the destination.
    let bytes = to_vec(&300).unwrap();
    assert!(from_slice::<u8>(&bytes).is_err());
    let bytes = to_vec(&-1).unwrap();
    assert!(from_slice::<u64>(&bytes).is_err());
}

#[test]
fn test_special_strings() {
    let special_strings = [
        "",
        "hello, world",
        "line1\nline2",
        "\n\n",
        "tab\there",
        "unicode: ünïcödé ✓",
        "\"quoted\"",
    ];

    for s in special_strings {
        assert_roundtrip(&s.to_string());
    }
}

#[test]
fn test_enums() {
    assert_roundtrip(&Command::Stop);
    assert_roundtrip(&Command::Move { x: -1, y: 300 });
    assert_roundtrip(&Command::Say("hi".to_string()));
    assert_roundtrip(&Command::Batch(vec![
        Command::Stop,
        Command::Say("nested".to_string()),
    ]));
}

#[test]
fn test_collections() {
    let mut scores = HashMap::new();
    scores.insert("alice".to_string(), 10u32);
    scores.insert("bob".to_string(), 100_000u32);
    assert_roundtrip(&scores);

    let mut groups = BTreeMap::new();
    groups.insert("a".to_string(), vec!["x".to_string()]);
    groups.insert("b".to_string(), vec![]);
    assert_roundtrip(&groups);

    assert_roundtrip(&(1u8, "two".to_string(), 3.0f64, false));
    assert_roundtrip(&vec![vec![1, 2], vec![], vec![1000]]);
    assert_roundtrip(&Some(5));
}

#[test]
fn test_empty_collections() {
    let empty_vec: Vec<i32> = vec![];
    assert_roundtrip(&empty_vec);

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Empty {}

    assert_roundtrip(&Empty {});
}

#[test]
fn test_bytes() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Blob {
        #[serde(with = "bytes_as_seq")]
        data: Vec<u8>,
    }

    assert_roundtrip(&Blob {
        data: vec![0, 1, 255],
    });
    let value = to_value(&Blob { data: vec![7] }).unwrap();
    assert_eq!(value, rapid!({ "data": [7] }));
}

#[test]
fn test_missing_and_unknown_fields() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Partial {
        id: u32,
        #[serde(default)]
        nickname: Option<String>,
    }

    let bytes = to_vec(&rapid!({ "id": 1, "extra": [1, 2, { "deep": true }] })).unwrap();
    let partial: Partial = from_slice(&bytes).unwrap();
    assert_eq!(
        partial,
        Partial {
            id: 1,
            nickname: None
        }
    );

    let bytes = to_vec(&rapid!({ "name": "x" })).unwrap();
    assert!(from_slice::<User>(&bytes).is_err());
}

#[test]
fn test_skip_none_fields() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Profile {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        email: Option<String>,
    }

    assert_roundtrip(&Profile {
        name: "a".into(),
        email: None,
    });
    assert_roundtrip(&Profile {
        name: "a".into(),
        email: Some("a@example.com".into()),
    });

    let unskipped = vec![None::<String>];
    assert!(matches!(to_vec(&unskipped), Err(Error::UnsupportedType(_))));
}

#[test]
fn test_to_value() {
    let value = to_value(&alice()).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.get("id"), Some(Value::Int(123)));
    assert_eq!(obj.get("name"), Some(Value::String("Alice".to_string())));
    assert_eq!(obj.get("active"), Some(Value::Bool(true)));
    assert_eq!(
        obj.get("tags"),
        Some(Value::Array(Array::Strings(vec![
            "admin".to_string(),
            "developer".to_string()
        ])))
    );

    let back: User = from_value(value).unwrap();
    assert_eq!(back, alice());
}

#[test]
fn test_value_through_serde() {
    let value = rapid!({
        "ints": [1, 2, 3],
        "mixed": [1, "a", [true]],
        "labels": { "k": "v" },
    });
    let bytes = to_vec(&value).unwrap();
    let back: Value = from_slice(&bytes).unwrap();
    assert_eq!(back, value);

    match back.as_object().unwrap().get("labels") {
        Some(Value::Object(Object::Strings(_))) => {}
        other => panic!("expected a map of strings, got {other:?}"),
    }
}

#[test]
fn test_value_to_json_interop() {
    let value = rapid!({ "a": [1, 2], "b": "text", "c": 1.5 });
    let json = serde_json::to_value(&value).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "a": [1, 2], "b": "text", "c": 1.5 })
    );

    let back: Value = serde_json::from_value(json).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_writer_and_reader() {
    let mut buf = Vec::new();
    to_writer(&mut buf, &alice()).unwrap();
    to_writer(&mut buf, &Command::Stop).unwrap();

    let mut cursor = Cursor::new(buf);
    let user: User = from_reader(&mut cursor).unwrap();
    let command: Command = from_reader(&mut cursor).unwrap();
    assert_eq!(user, alice());
    assert_eq!(command, Command::Stop);
}

#[test]
fn test_encoder_decoder_pair() {
    let mut encoder = Encoder::new(Vec::new());
    encoder.serialize(&alice()).unwrap();
    encoder.encode(&rapid!([1.5, 2.5])).unwrap();
    encoder.flush().unwrap();
    let written = encoder.bytes_written();
    let bytes = encoder.into_inner();
    assert_eq!(written, bytes.len() as u64);

    let mut decoder = Decoder::new(&bytes[..]);
    assert_eq!(decoder.decode::<User>().unwrap(), alice());
    assert_eq!(decoder.decode::<Vec<f64>>().unwrap(), vec![1.5, 2.5]);
    assert!(decoder.decode::<User>().unwrap_err().is_eof());
}

#[test]
fn test_type_mismatch_reports_offset() {
    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Strict {
        count: u32,
    }

    let bytes = to_vec(&rapid!({ "count": "many" })).unwrap();
    match from_slice::<Strict>(&bytes) {
        Err(Error::UnexpectedType { offset, .. }) => {
            // Header (2), count (2), key "count\0" (6): the value's tag is next.
            assert_eq!(offset, 10);
        }
        other => panic!("expected a tag mismatch, got {other:?}"),
    }
}

//! Working with Value for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use serde_rapid::{decode_value, encode_value, from_value, rapid, to_value, Array, Value};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = rapid!({
        "host": "localhost",
        "port": 8080,
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    let mut bytes = Vec::new();
    encode_value(&mut bytes, &config)?;
    println!("Config encoded in {} bytes: {:02x?}\n", bytes.len(), bytes);

    let decoded = decode_value(&bytes[..])?;
    assert_eq!(decoded, config);

    if let Value::Object(obj) = &decoded {
        if let Some(Value::String(host)) = obj.get("host") {
            println!("Accessing field 'host': {}", host);
        }

        if let Some(port) = obj.get("port").and_then(|v| v.as_i64()) {
            println!("Accessing field 'port': {}", port);
        }

        if let Some(Value::Array(Array::Strings(features))) = obj.get("features") {
            println!("Accessing field 'features': {:?}\n", features);
        }
    }

    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };

    let user_value = to_value(&user)?;
    println!("User as Value: {}", user_value);
    println!("Tag: {:?}\n", user_value.tag());

    println!("Type checks:");
    println!("  is_object: {}", user_value.is_object());
    println!("  is_array:  {}", user_value.is_array());
    println!("  is_string: {}", user_value.is_string());

    let back: User = from_value(user_value)?;
    assert_eq!(back, user);

    Ok(())
}

//! Using the rapid! macro for dynamic value construction.
//!
//! Run with: cargo run --example macro

use serde_rapid::{rapid, to_vec, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let bool_val = rapid!(true);
    let small = rapid!(42);
    let large = rapid!(4200);
    let text = rapid!("Hello, rapid!");

    println!("Primitives:");
    println!("  bool:  {} -> {:02x?}", bool_val, to_vec(&bool_val)?);
    println!("  small: {} -> {:02x?}", small, to_vec(&small)?);
    println!("  large: {} -> {:02x?}", large, to_vec(&large)?);
    println!("  text:  {} -> {:02x?}\n", text, to_vec(&text)?);

    let numbers = rapid!([1, 2, 3, 4, 5]);
    let mixed = rapid!([1, "two", true, 4.0]);

    println!("Arrays:");
    println!("  Numbers: {} tagged {:?}", numbers, numbers.tag());
    println!("  Mixed:   {} tagged {:?}\n", mixed, mixed.tag());

    let config = rapid!({
        "app": {
            "name": "MyApp",
            "version": "1.0.0"
        },
        "database": {
            "host": "localhost",
            "port": 5432,
            "name": "mydb"
        },
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    println!("Nested structures:");
    println!("{}\n", config);

    let items = vec![
        rapid!({"id": 1, "status": "active"}),
        rapid!({"id": 2, "status": "pending"}),
        rapid!({"id": 3, "status": "completed"}),
    ];

    let summary = rapid!({
        "total": 3,
        "items": items
    });

    println!("Dynamic construction:");
    println!("{}\n", summary);

    if let Value::Object(obj) = &config {
        if let Some(Value::Object(app)) = obj.get("app") {
            if let Some(Value::String(name)) = app.get("name") {
                println!("Accessing values:");
                println!("  App name: {}", name);
            }
        }

        if let Some(Value::Array(features)) = obj.get("features") {
            println!("  Features: {}", features.len());
        }
    }

    Ok(())
}

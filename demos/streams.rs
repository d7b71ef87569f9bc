//! Writing and reading a signed stream of values.
//!
//! Run with: cargo run --example streams

use serde::{Deserialize, Serialize};
use serde_rapid::{RapidOptions, StreamReader, StreamWriter};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct Reading {
    sensor: String,
    celsius: f64,
    samples: Vec<i64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let readings = (0..4).map(|i| Reading {
        sensor: format!("probe-{i}"),
        celsius: 20.0 + f64::from(i) * 0.5,
        samples: vec![i64::from(i), 300 * i64::from(i)],
    });

    let mut writer = StreamWriter::new(Vec::new());
    let written = writer.write_all(readings)?;
    println!("Wrote {} values in {} bytes", written, writer.bytes_written());
    let bytes = writer.into_inner();

    let mut reader = StreamReader::new(&bytes[..]);
    while let Some(reading) = reader.next_as::<Reading>() {
        println!("  {:?}", reading?);
    }

    // Only the first two values are taken from the same bytes.
    let limited = StreamReader::with_options(&bytes[..], RapidOptions::new().with_limit(2));
    for value in limited {
        println!("  dynamic: {}", value?);
    }

    Ok(())
}

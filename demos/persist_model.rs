//! Example: Persisting a Trained Model
//!
//! Encodes a small model with each container format, inspects the header,
//! and shows how tampering and schema drift are reported.
//!
//! Run with: `cargo run --example persist_model`

#![allow(clippy::uninlined_format_args)]

use persist_codec::config::{CodecConfig, LoggingConfig};
use persist_codec::utils::logging::init_logging;
use persist_codec::{
    Codec, ContainerFormat, Encoding, PersistError, Persistable, Result,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LogisticRegression {
    coefficients: Vec<f64>,
    intercept: f64,
    classes: Vec<String>,
}

impl Persistable for LogisticRegression {
    const CLASS_NAME: &'static str = "LogisticRegression";

    fn revision(&self) -> u32 {
        1
    }
}

/// The same model after a schema change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LogisticRegressionV2 {
    coefficients: Vec<f64>,
    intercept: f64,
    classes: Vec<String>,
}

impl Persistable for LogisticRegressionV2 {
    const CLASS_NAME: &'static str = "LogisticRegression";

    fn revision(&self) -> u32 {
        2
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::default())?;

    println!("=== Model Persistence Demo ===\n");

    let model = LogisticRegression {
        coefficients: vec![0.42, -1.37, 2.05, 0.0, 0.0, 0.0, 0.0, 0.0],
        intercept: -0.25,
        classes: vec!["spam".to_string(), "ham".to_string()],
    };

    for format in ContainerFormat::ALL {
        let config = CodecConfig {
            format,
            ..CodecConfig::default()
        };
        let codec = config.build("correct horse battery staple")?;

        let encoding = codec.encode(&model)?;
        let info = codec.inspect(&encoding)?;
        let restored: LogisticRegression = codec.decode(&encoding)?;

        println!("{}", format.name().to_uppercase());
        println!("   - Size: {} bytes", encoding.len());
        println!(
            "   - Header: class={} revision={} payload={} bytes",
            info.class_name, info.revision, info.length
        );
        println!(
            "   - Detected: {:?}",
            ContainerFormat::detect(&encoding).map(ContainerFormat::name)
        );
        println!(
            "   - Roundtrip: {}",
            if restored == model { "✓ Success" } else { "✗ Failed" }
        );

        let tampered = flip_last_byte(&encoding);
        let outcome: Result<LogisticRegression> = codec.decode(&tampered);
        println!("   - Last byte flipped: {}", describe(outcome));

        let drifted: Result<LogisticRegressionV2> = codec.decode(&encoding);
        println!("   - Read as revision 2: {}", describe(drifted));
        println!();
    }

    Ok(())
}

fn flip_last_byte(encoding: &Encoding) -> Encoding {
    let mut bytes = encoding.as_bytes().to_vec();
    if let Some(last) = bytes.last_mut() {
        *last ^= 0x01;
    }
    Encoding::from(bytes)
}

fn describe<T>(result: Result<T>) -> String {
    match result {
        Ok(_) => "decoded (not detected)".to_string(),
        Err(PersistError::Authentication(reason)) => format!("rejected, {reason}"),
        Err(err) => format!("rejected, {err}"),
    }
}

//! # Error Types
//!
//! Error handling for every stage of the persistence codec stack.
//!
//! Each variant corresponds to one class of failure a caller may want to react
//! to differently, from a malformed envelope to a schema revision mismatch.
//!
//! ## Error Categories
//! - **Format Errors**: Bad magic bytes, malformed envelopes or headers
//! - **Authentication Errors**: Header or payload HMAC mismatch
//! - **Corruption Errors**: Length mismatch, decompression or decryption failure
//! - **Incompatibility Errors**: Class name or schema revision mismatch
//! - **Unsupported Algorithm Errors**: Unknown version, hash or cipher in a header
//! - **Unavailable Errors**: Optional codec capability not compiled in
//!
//! Decoding halts at the first failing stage, so the variant returned also
//! tells the caller how far verification got.
//!
//! ## Example Usage
//! ```rust
//! use persist_codec::error::PersistError;
//! use persist_codec::{Codec, Encoding, PortableSigned, Persistable};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Model { weights: Vec<f32> }
//!
//! impl Persistable for Model {
//!     const CLASS_NAME: &'static str = "Model";
//!     fn revision(&self) -> u32 { 1 }
//! }
//!
//! let codec = PortableSigned::new("secret");
//! let garbage = Encoding::from(b"not an envelope".to_vec());
//!
//! match codec.decode::<Model>(&garbage) {
//!     Err(PersistError::Format(reason)) => println!("rejected: {reason}"),
//!     other => panic!("unexpected: {:?}", other.map(|_| ())),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Envelope errors
    pub const ERR_BAD_MAGIC: &str = "Magic bytes do not match the container format";
    pub const ERR_MISSING_HMAC_LINE: &str = "Envelope is missing the header signature line";
    pub const ERR_MISSING_HEADER: &str = "Envelope is missing the header block";

    /// Authentication errors
    pub const ERR_HEADER_VERIFICATION: &str = "header verification failed";
    pub const ERR_DATA_VERIFICATION: &str = "data verification failed";

    /// Corruption errors
    pub const ERR_COMPRESSION_FAILED: &str = "Compression failed";
    pub const ERR_DECOMPRESSION_FAILED: &str = "Decompression failed";
    pub const ERR_DECOMPRESSION_LIMIT: &str = "Decompressed payload exceeds size limit";
    pub const ERR_DECRYPTION_FAILED: &str = "Decryption failed";

    /// Capability errors
    pub const ERR_COMPACT_UNAVAILABLE: &str =
        "Compact codec requires the `compact` feature to be enabled";

    /// Construction errors
    pub const ERR_NESTED_COMPRESSION: &str = "Compression codec cannot wrap another compression codec";
    pub const ERR_KEY_DERIVATION: &str = "Key derivation failed";
    pub const ERR_RANDOM_SOURCE: &str = "Failed to read from the system random source";
}

// PersistError is the primary error type for all codec operations
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Format error: {0}")]
    Format(String),

    #[error("Authentication error: {0}")]
    Authentication(&'static str),

    #[error("Corruption error: {0}")]
    Corruption(String),

    #[error(
        "Incompatible object: expected {expected_class} revision {expected_revision}, \
         found {found_class} revision {found_revision}"
    )]
    Incompatibility {
        expected_class: String,
        expected_revision: u32,
        found_class: String,
        found_revision: u32,
    },

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Unavailable: {0}")]
    Unavailable(&'static str),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Type alias for Results using PersistError
pub type Result<T> = std::result::Result<T, PersistError>;

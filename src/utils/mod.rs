//! # Utility Modules
//!
//! Supporting utilities for compression, cryptography and logging.
//!
//! ## Components
//! - **Compression**: zlib decorator with a decompression size limit
//! - **Crypto**: HMAC, password-derived keys and AES-256-CBC
//! - **Logging**: Structured logging configuration
//!
//! ## Security
//! - Cryptographically secure RNG (getrandom)
//! - Decompression bomb protection (256MB limit by default)
//! - Memory zeroing for derived keys (zeroize crate)

pub mod compression;
pub mod crypto;
pub mod logging;

pub use compression::Compression;

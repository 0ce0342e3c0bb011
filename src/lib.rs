//! # persist-codec
//!
//! Authenticated, optionally encrypted persistence codecs for trained model
//! objects.
//!
//! A model type implements [`Persistable`] (a stable class name, a schema
//! revision and serde state). A codec stack turns it into an immutable
//! [`Encoding`] that a storage driver can write anywhere, and back again,
//! rejecting tampered, corrupted or schema-incompatible input with a typed
//! [`PersistError`].
//!
//! ## Stack
//! ```text
//! Signed | PortableSigned | Encrypted     container envelope + HMAC
//!   └── Compression                        zlib, level 0-9
//!         └── Native | Compact             bincode | MessagePack
//! ```
//!
//! ## Example
//! ```rust
//! use persist_codec::{Codec, Persistable, Signed};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Perceptron {
//!     weights: Vec<f64>,
//!     bias: f64,
//! }
//!
//! impl Persistable for Perceptron {
//!     const CLASS_NAME: &'static str = "Perceptron";
//!     fn revision(&self) -> u32 { 1 }
//! }
//!
//! # fn main() -> persist_codec::Result<()> {
//! let model = Perceptron { weights: vec![0.1, -0.4, 2.0], bias: 0.5 };
//!
//! let codec = Signed::new("correct horse battery staple")?;
//! let encoding = codec.encode(&model)?;
//! let restored: Perceptron = codec.decode(&encoding)?;
//!
//! assert_eq!(model, restored);
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread Safety
//! Codecs are immutable after construction and can be shared across threads
//! (e.g. behind an `Arc`) for concurrent `encode`/`decode` without locking.

pub mod config;
pub mod container;
pub mod core;
pub mod error;
pub mod utils;

pub use crate::container::{
    AnyContainer, ContainerFormat, Encrypted, HeaderInfo, PortableSigned, Signed,
};
pub use crate::core::codec::{Codec, CodecKind, Persistable};
pub use crate::core::encoding::Encoding;
pub use crate::core::serialization::{BaseCodec, BaseCodecKind, Compact, Native};
pub use crate::error::{PersistError, Result};
pub use crate::utils::compression::Compression;

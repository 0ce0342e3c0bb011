//! # Core Codec Components
//!
//! The value type, traits and base serializers every other layer builds on.
//!
//! ## Components
//! - **Encoding**: Immutable byte buffer passed to and from persisters
//! - **Codec**: The encode/decode contract and the `Persistable` capability
//! - **Serialization**: Native (bincode) and Compact (MessagePack) base codecs
//!
//! ## Layering
//! ```text
//! Container (Signed | PortableSigned | Encrypted)
//!   └── Compression (zlib, level 0-9)
//!         └── Base codec (Native | Compact)
//! ```

pub mod codec;
pub mod encoding;
pub mod serialization;

//! # Base Object-Graph Codecs
//!
//! The innermost layer of the stack: turning a persistable object graph into
//! bytes and back using generic structural (serde) serialization.
//!
//! ## Codecs
//! - **Native**: Bincode, always available (default)
//! - **Compact**: MessagePack with positional fields, denser for sparse state;
//!   requires the `compact` feature
//! - **BaseCodec**: Runtime choice between the two, driven by configuration
//!
//! Both codecs are drop-in replacements for each other. Neither carries any
//! framing of its own; type and revision checks belong to the container layer.
//!
//! ## Usage
//! ```rust
//! use persist_codec::core::serialization::Native;
//! use persist_codec::{Codec, Persistable};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Centroids(Vec<[f64; 2]>);
//!
//! impl Persistable for Centroids {
//!     const CLASS_NAME: &'static str = "Centroids";
//!     fn revision(&self) -> u32 { 1 }
//! }
//!
//! let model = Centroids(vec![[0.5, 1.5], [2.0, -1.0]]);
//! let encoding = Native.encode(&model).unwrap();
//! let restored: Centroids = Native.decode(&encoding).unwrap();
//! assert_eq!(model, restored);
//! ```

use crate::core::codec::{Codec, CodecKind, Persistable};
use crate::core::encoding::Encoding;
use crate::error::{PersistError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported base codecs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseCodecKind {
    /// Bincode (default, always available)
    #[default]
    Native,
    /// MessagePack (compact, optional)
    Compact,
}

impl BaseCodecKind {
    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            BaseCodecKind::Native => "native",
            BaseCodecKind::Compact => "compact",
        }
    }
}

impl FromStr for BaseCodecKind {
    type Err = PersistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(BaseCodecKind::Native),
            "compact" => Ok(BaseCodecKind::Compact),
            other => Err(PersistError::Config(format!("Unknown base codec: {other}"))),
        }
    }
}

/// Baseline structural codec backed by bincode
#[derive(Debug, Clone, Copy, Default)]
pub struct Native;

impl Codec for Native {
    fn kind(&self) -> CodecKind {
        CodecKind::Native
    }

    fn encode<P: Persistable>(&self, persistable: &P) -> Result<Encoding> {
        bincode::serialize(persistable)
            .map(Encoding::from)
            .map_err(|e| PersistError::Serialization(e.to_string()))
    }

    fn decode<P: Persistable>(&self, encoding: &Encoding) -> Result<P> {
        bincode::deserialize(encoding.as_bytes()).map_err(|e| {
            PersistError::Format(format!("Not a valid {} instance: {e}", P::CLASS_NAME))
        })
    }
}

/// Dense structural codec backed by MessagePack.
///
/// Construct with [`Compact::new`], which fails with
/// [`PersistError::Unavailable`] when the `compact` feature is disabled.
#[derive(Debug, Clone, Copy)]
pub struct Compact {
    _private: (),
}

impl Compact {
    /// Create the compact codec if MessagePack support is compiled in
    pub fn new() -> Result<Self> {
        if cfg!(feature = "compact") {
            Ok(Self { _private: () })
        } else {
            Err(PersistError::Unavailable(
                crate::error::constants::ERR_COMPACT_UNAVAILABLE,
            ))
        }
    }

    /// Whether the compact codec can be constructed in this build
    pub fn is_available() -> bool {
        cfg!(feature = "compact")
    }
}

#[cfg(feature = "compact")]
impl Codec for Compact {
    fn kind(&self) -> CodecKind {
        CodecKind::Compact
    }

    fn encode<P: Persistable>(&self, persistable: &P) -> Result<Encoding> {
        rmp_serde::to_vec(persistable)
            .map(Encoding::from)
            .map_err(|e| PersistError::Serialization(e.to_string()))
    }

    fn decode<P: Persistable>(&self, encoding: &Encoding) -> Result<P> {
        rmp_serde::from_slice(encoding.as_bytes()).map_err(|e| {
            PersistError::Format(format!("Not a valid {} instance: {e}", P::CLASS_NAME))
        })
    }
}

#[cfg(not(feature = "compact"))]
impl Codec for Compact {
    fn kind(&self) -> CodecKind {
        CodecKind::Compact
    }

    fn encode<P: Persistable>(&self, _persistable: &P) -> Result<Encoding> {
        Err(PersistError::Unavailable(
            crate::error::constants::ERR_COMPACT_UNAVAILABLE,
        ))
    }

    fn decode<P: Persistable>(&self, _encoding: &Encoding) -> Result<P> {
        Err(PersistError::Unavailable(
            crate::error::constants::ERR_COMPACT_UNAVAILABLE,
        ))
    }
}

/// Base codec selected at runtime
#[derive(Debug, Clone, Copy)]
pub enum BaseCodec {
    Native(Native),
    Compact(Compact),
}

impl BaseCodec {
    /// Construct the base codec for `kind`
    pub fn from_kind(kind: BaseCodecKind) -> Result<Self> {
        match kind {
            BaseCodecKind::Native => Ok(BaseCodec::Native(Native)),
            BaseCodecKind::Compact => Compact::new().map(BaseCodec::Compact),
        }
    }
}

impl Default for BaseCodec {
    fn default() -> Self {
        BaseCodec::Native(Native)
    }
}

impl Codec for BaseCodec {
    fn kind(&self) -> CodecKind {
        match self {
            BaseCodec::Native(codec) => codec.kind(),
            BaseCodec::Compact(codec) => codec.kind(),
        }
    }

    fn encode<P: Persistable>(&self, persistable: &P) -> Result<Encoding> {
        match self {
            BaseCodec::Native(codec) => codec.encode(persistable),
            BaseCodec::Compact(codec) => codec.encode(persistable),
        }
    }

    fn decode<P: Persistable>(&self, encoding: &Encoding) -> Result<P> {
        match self {
            BaseCodec::Native(codec) => codec.decode(encoding),
            BaseCodec::Compact(codec) => codec.decode(encoding),
        }
    }
}

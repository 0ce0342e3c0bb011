//! # Codec Capability
//!
//! The two-method contract shared by every layer of the stack, plus the
//! [`Persistable`] capability that model types implement.
//!
//! Codecs compose by decoration: a [`Compression`](crate::utils::compression::Compression)
//! wraps a base codec, and a container wraps the compression codec. Each
//! layer is generic over the [`Codec`] it decorates.

use crate::core::encoding::Encoding;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A type that can be durably serialized by the codec stack.
///
/// `CLASS_NAME` must stay stable across builds; it is recorded in container
/// headers and compared on decode. `revision` is the schema revision of the
/// object's state layout and should change whenever the serialized shape does.
pub trait Persistable: Serialize + DeserializeOwned {
    /// Stable type identifier
    const CLASS_NAME: &'static str;

    /// Schema revision of this object
    fn revision(&self) -> u32;
}

/// Identifies the concrete layer behind a codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecKind {
    Native,
    Compact,
    Compression,
    Signed,
    PortableSigned,
    Encrypted,
}

impl CodecKind {
    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            CodecKind::Native => "native",
            CodecKind::Compact => "compact",
            CodecKind::Compression => "compression",
            CodecKind::Signed => "signed",
            CodecKind::PortableSigned => "portable-signed",
            CodecKind::Encrypted => "encrypted",
        }
    }
}

/// Encode/decode contract implemented by every codec
pub trait Codec {
    /// Which layer this codec is
    fn kind(&self) -> CodecKind;

    /// Serialize a persistable object into an encoding
    fn encode<P: Persistable>(&self, persistable: &P) -> Result<Encoding>;

    /// Reconstruct a persistable object from an encoding
    fn decode<P: Persistable>(&self, encoding: &Encoding) -> Result<P>;
}

impl<C: Codec> Codec for &C {
    fn kind(&self) -> CodecKind {
        (**self).kind()
    }

    fn encode<P: Persistable>(&self, persistable: &P) -> Result<Encoding> {
        (**self).encode(persistable)
    }

    fn decode<P: Persistable>(&self, encoding: &Encoding) -> Result<P> {
        (**self).decode(encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(CodecKind::Native.name(), "native");
        assert_eq!(CodecKind::PortableSigned.name(), "portable-signed");
        assert_eq!(CodecKind::Encrypted.name(), "encrypted");
    }
}

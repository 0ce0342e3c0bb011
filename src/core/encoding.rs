//! # Encoding
//!
//! Immutable byte buffer produced by [`Codec::encode`](crate::core::codec::Codec::encode)
//! and consumed by [`Codec::decode`](crate::core::codec::Codec::decode).
//!
//! Backed by [`bytes::Bytes`], so clones share the same allocation and the
//! value is `Send + Sync` without any interior state.

use bytes::Bytes;
use std::borrow::Cow;
use std::fmt;

/// An immutable serialized artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Encoding {
    data: Bytes,
}

impl Encoding {
    /// Wrap an existing buffer
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Number of bytes in the encoding
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the encoding holds zero bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Strict UTF-8 view of the bytes, `None` if they are not valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }

    /// Lossy string view, replacing invalid sequences with U+FFFD
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// Whether the encoding begins with `prefix`
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.data.starts_with(prefix)
    }

    /// Consume the encoding and return the shared buffer
    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

impl From<Vec<u8>> for Encoding {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<Bytes> for Encoding {
    fn from(data: Bytes) -> Self {
        Self { data }
    }
}

impl From<&'static [u8]> for Encoding {
    fn from(data: &'static [u8]) -> Self {
        Self::new(Bytes::from_static(data))
    }
}

impl AsRef<[u8]> for Encoding {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

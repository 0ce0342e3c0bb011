//! # Container Formats
//!
//! Authenticated envelopes wrapping a codec payload with header metadata.
//!
//! ## Wire Format
//! ```text
//! MAGIC || <hashtype>:<hex hmac> || \n || <header json> || \n || <payload>
//! ```
//!
//! The header is a single-line JSON object:
//! ```text
//! {"version":1,"class":{"name":..,"revision":..},"data":{..,"length":..}}
//! ```
//!
//! ## Formats
//! - **Signed**: Argon2-stretched key, HMAC over header and payload
//! - **PortableSigned**: raw password as HMAC key, reproducible across processes
//! - **Encrypted**: AES-256-CBC payload, HMAC over the header only
//!
//! ## Decode Order
//! magic → envelope split → header HMAC → header parse → length →
//! payload HMAC (signed formats only) → base decode → class/revision.
//! The first failing stage ends the call.

pub mod encrypted;
pub(crate) mod envelope;
pub mod portable;
pub mod signed;

use crate::core::codec::{Codec, CodecKind, Persistable};
use crate::core::encoding::Encoding;
use crate::core::serialization::BaseCodec;
use crate::error::{PersistError, Result};
use crate::utils::compression::Compression;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use encrypted::Encrypted;
pub use portable::PortableSigned;
pub use signed::Signed;

/// Current header version
pub const FORMAT_VERSION: u32 = 1;

/// Magic bytes identifying the signed format
pub const MAGIC_SIGNED: &[u8] = b"\xA1PCS\r\n\x1A\n";

/// Magic bytes identifying the portable signed format
pub const MAGIC_PORTABLE: &[u8] = b"\xA1PCP\r\n\x1A\n";

/// Magic bytes identifying the encrypted format
pub const MAGIC_ENCRYPTED: &[u8] = b"\xA1PCE\r\n\x1A\n";

/// Supported container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerFormat {
    /// Password-stretched HMAC over header and payload (default)
    #[default]
    Signed,
    /// Raw-password HMAC over header and payload
    PortableSigned,
    /// AES-256 encrypted payload, HMAC over header
    Encrypted,
}

impl ContainerFormat {
    /// All formats, in detection order
    pub const ALL: [ContainerFormat; 3] = [
        ContainerFormat::Signed,
        ContainerFormat::PortableSigned,
        ContainerFormat::Encrypted,
    ];

    /// Magic prefix of this format
    pub fn magic(self) -> &'static [u8] {
        match self {
            ContainerFormat::Signed => MAGIC_SIGNED,
            ContainerFormat::PortableSigned => MAGIC_PORTABLE,
            ContainerFormat::Encrypted => MAGIC_ENCRYPTED,
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            ContainerFormat::Signed => "signed",
            ContainerFormat::PortableSigned => "portable-signed",
            ContainerFormat::Encrypted => "encrypted",
        }
    }

    /// Identify the format of an encoding by its magic prefix
    pub fn detect(encoding: &Encoding) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| encoding.starts_with(format.magic()))
    }
}

impl FromStr for ContainerFormat {
    type Err = PersistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "signed" => Ok(ContainerFormat::Signed),
            "portable-signed" | "portable" => Ok(ContainerFormat::PortableSigned),
            "encrypted" => Ok(ContainerFormat::Encrypted),
            other => Err(PersistError::Config(format!(
                "Unknown container format: {other}"
            ))),
        }
    }
}

/// Verified header metadata, readable without decoding the payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub format: ContainerFormat,
    pub version: u32,
    pub class_name: String,
    pub revision: u32,
    /// Payload length in bytes
    pub length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Header<D> {
    pub version: u32,
    pub class: ClassInfo,
    pub data: D,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ClassInfo {
    pub name: String,
    pub revision: u32,
}

/// Access to the payload length carried by every header variant
pub(crate) trait HeaderData {
    fn length(&self) -> usize;
}

impl<D: HeaderData> Header<D> {
    pub(crate) fn new<P: Persistable>(persistable: &P, data: D) -> Self {
        Self {
            version: FORMAT_VERSION,
            class: ClassInfo {
                name: P::CLASS_NAME.to_string(),
                revision: persistable.revision(),
            },
            data,
        }
    }

    pub(crate) fn to_json(&self) -> Result<Vec<u8>>
    where
        D: Serialize,
    {
        serde_json::to_vec(self).map_err(|e| PersistError::Serialization(e.to_string()))
    }

    /// Parse an authenticated header block
    ///
    /// The version is checked before the data descriptor is interpreted, so a
    /// header from a newer layout reports as unsupported rather than malformed.
    pub(crate) fn parse(bytes: &[u8]) -> Result<Self>
    where
        D: DeserializeOwned,
    {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| PersistError::Format(format!("Malformed header: {e}")))?;

        let version = value
            .get("version")
            .ok_or_else(|| PersistError::Format("Header is missing a version".to_string()))?;

        match version.as_u64() {
            Some(version) if version == u64::from(FORMAT_VERSION) => {}
            Some(version) => {
                return Err(PersistError::UnsupportedAlgorithm(format!(
                    "Unsupported header version: {version}"
                )))
            }
            None => {
                return Err(PersistError::Format(format!(
                    "Header version must be an unsigned integer, found {version}"
                )))
            }
        }

        serde_json::from_value(value)
            .map_err(|e| PersistError::Format(format!("Malformed header: {e}")))
    }

    /// Fail with `Corruption` unless the payload length matches the header
    pub(crate) fn check_length(&self, payload: &[u8]) -> Result<()> {
        let expected = self.data.length();
        if payload.len() != expected {
            return Err(PersistError::Corruption(format!(
                "Payload length mismatch: header declares {expected} bytes, found {}",
                payload.len()
            )));
        }
        Ok(())
    }

    /// Fail with `Incompatibility` unless `persistable` matches the recorded class
    pub(crate) fn check_class<P: Persistable>(&self, persistable: &P) -> Result<()> {
        let found_revision = persistable.revision();
        if P::CLASS_NAME != self.class.name || found_revision != self.class.revision {
            return Err(PersistError::Incompatibility {
                expected_class: self.class.name.clone(),
                expected_revision: self.class.revision,
                found_class: P::CLASS_NAME.to_string(),
                found_revision,
            });
        }
        Ok(())
    }

    pub(crate) fn info(&self, format: ContainerFormat) -> HeaderInfo {
        HeaderInfo {
            format,
            version: self.version,
            class_name: self.class.name.clone(),
            revision: self.class.revision,
            length: self.data.length(),
        }
    }
}

/// A container over the configurable base stack, chosen at runtime
#[derive(Debug, Clone)]
pub enum AnyContainer {
    Signed(Signed<Compression<BaseCodec>>),
    PortableSigned(PortableSigned<Compression<BaseCodec>>),
    Encrypted(Encrypted<Compression<BaseCodec>>),
}

impl AnyContainer {
    /// The container format in use
    pub fn format(&self) -> ContainerFormat {
        match self {
            AnyContainer::Signed(_) => ContainerFormat::Signed,
            AnyContainer::PortableSigned(_) => ContainerFormat::PortableSigned,
            AnyContainer::Encrypted(_) => ContainerFormat::Encrypted,
        }
    }

    /// Verify and read the header without decoding the payload
    pub fn inspect(&self, encoding: &Encoding) -> Result<HeaderInfo> {
        match self {
            AnyContainer::Signed(codec) => codec.inspect(encoding),
            AnyContainer::PortableSigned(codec) => codec.inspect(encoding),
            AnyContainer::Encrypted(codec) => codec.inspect(encoding),
        }
    }
}

impl Codec for AnyContainer {
    fn kind(&self) -> CodecKind {
        match self {
            AnyContainer::Signed(codec) => codec.kind(),
            AnyContainer::PortableSigned(codec) => codec.kind(),
            AnyContainer::Encrypted(codec) => codec.kind(),
        }
    }

    fn encode<P: Persistable>(&self, persistable: &P) -> Result<Encoding> {
        match self {
            AnyContainer::Signed(codec) => codec.encode(persistable),
            AnyContainer::PortableSigned(codec) => codec.encode(persistable),
            AnyContainer::Encrypted(codec) => codec.encode(persistable),
        }
    }

    fn decode<P: Persistable>(&self, encoding: &Encoding) -> Result<P> {
        match self {
            AnyContainer::Signed(codec) => codec.decode(encoding),
            AnyContainer::PortableSigned(codec) => codec.decode(encoding),
            AnyContainer::Encrypted(codec) => codec.decode(encoding),
        }
    }
}

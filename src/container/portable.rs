//! # Portable Signed Container
//!
//! Same envelope as [`Signed`](crate::container::Signed), keyed directly by
//! the raw password bytes with HMAC-SHA256 for both tokens.
//!
//! No key stretching is applied, so any instance built from the same password
//! can read what another wrote. The trade-off is weaker resistance to offline
//! brute force of the password.

use crate::container::signed::MacScheme;
use crate::container::{ContainerFormat, HeaderInfo, MAGIC_PORTABLE};
use crate::core::codec::{Codec, CodecKind, Persistable};
use crate::core::encoding::Encoding;
use crate::core::serialization::Native;
use crate::error::Result;
use crate::utils::compression::Compression;
use crate::utils::crypto::HashType;
use std::fmt;
use tracing::instrument;
use zeroize::Zeroizing;

const ACCEPTED: &[HashType] = &[HashType::Sha256];

/// Signed container keyed by the raw password
#[derive(Clone)]
pub struct PortableSigned<C = Compression<Native>> {
    password: Zeroizing<Vec<u8>>,
    base: C,
}

impl PortableSigned<Compression<Native>> {
    /// Portable container over the default stack (Native compressed at level 9)
    pub fn new(password: impl AsRef<[u8]>) -> Self {
        Self::with_base(password, Compression::default_stack())
    }
}

impl<C: Codec> PortableSigned<C> {
    /// Portable container over a custom base codec
    pub fn with_base(password: impl AsRef<[u8]>, base: C) -> Self {
        Self {
            password: Zeroizing::new(password.as_ref().to_vec()),
            base,
        }
    }

    /// The wrapped codec
    pub fn base(&self) -> &C {
        &self.base
    }

    /// Verify and read the header without decoding the payload
    pub fn inspect(&self, encoding: &Encoding) -> Result<HeaderInfo> {
        let (header, _) = self.scheme().open_header(encoding)?;
        Ok(header.info(ContainerFormat::PortableSigned))
    }

    fn scheme(&self) -> MacScheme<'_> {
        MacScheme {
            format: ContainerFormat::PortableSigned,
            magic: MAGIC_PORTABLE,
            key: &self.password,
            header_hash: HashType::Sha256,
            payload_hash: HashType::Sha256,
            accepted: ACCEPTED,
        }
    }
}

impl<C: Codec> Codec for PortableSigned<C> {
    fn kind(&self) -> CodecKind {
        CodecKind::PortableSigned
    }

    #[instrument(level = "debug", skip_all)]
    fn encode<P: Persistable>(&self, persistable: &P) -> Result<Encoding> {
        self.scheme().seal(&self.base, persistable)
    }

    #[instrument(level = "debug", skip_all, fields(len = encoding.len()))]
    fn decode<P: Persistable>(&self, encoding: &Encoding) -> Result<P> {
        self.scheme().open(&self.base, encoding)
    }
}

impl<C: fmt::Debug> fmt::Debug for PortableSigned<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortableSigned")
            .field("password", &"<redacted>")
            .field("base", &self.base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::envelope::Envelope;
    use crate::error::PersistError;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Scaler {
        means: Vec<f64>,
        stddevs: Vec<f64>,
    }

    impl Persistable for Scaler {
        const CLASS_NAME: &'static str = "Scaler";

        fn revision(&self) -> u32 {
            1
        }
    }

    fn scaler() -> Scaler {
        Scaler {
            means: vec![0.0, 1.5, -3.25],
            stddevs: vec![1.0, 0.5, 2.0],
        }
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_independent_instances_interoperate() {
        let writer = PortableSigned::new("hunter2");
        let reader = PortableSigned::new("hunter2");
        let encoding = writer.encode(&scaler()).unwrap();
        assert!(encoding.starts_with(MAGIC_PORTABLE));
        let restored: Scaler = reader.decode(&encoding).unwrap();
        assert_eq!(restored, scaler());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_deterministic_output() {
        let codec = PortableSigned::new("hunter2");
        let first = codec.encode(&scaler()).unwrap();
        let second = PortableSigned::new("hunter2").encode(&scaler()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_wrong_password_rejected() {
        let encoding = PortableSigned::new("hunter2").encode(&scaler()).unwrap();
        let result: Result<Scaler> = PortableSigned::new("hunter3").decode(&encoding);
        assert!(matches!(result, Err(PersistError::Authentication(_))));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_tokens_use_sha256() {
        let encoding = PortableSigned::new("hunter2").encode(&scaler()).unwrap();
        let envelope = Envelope::split(MAGIC_PORTABLE, encoding.as_bytes()).unwrap();
        assert!(envelope.signature.starts_with(b"sha256:"));
        let header: serde_json::Value = serde_json::from_slice(envelope.header).unwrap();
        assert_eq!(header["data"]["hmac"]["type"], "sha256");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_signed_magic_rejected() {
        let encoding = PortableSigned::new("hunter2").encode(&scaler()).unwrap();
        let mut bytes = encoding.as_bytes().to_vec();
        bytes[..crate::container::MAGIC_SIGNED.len()]
            .copy_from_slice(crate::container::MAGIC_SIGNED);
        let result: Result<Scaler> =
            PortableSigned::new("hunter2").decode(&Encoding::from(bytes));
        assert!(matches!(result, Err(PersistError::Format(_))));
    }
}

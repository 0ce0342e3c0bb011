//! # Signed Container
//!
//! Envelope authenticated end to end with a key stretched from a password.
//!
//! ## Key Material
//! At construction the password is run through Argon2id with a fresh random
//! salt and the 32-byte output becomes the only key this instance uses. The
//! salt is not stored anywhere, so two instances built from the same password
//! hold different keys: an encoding produced by one instance does not
//! authenticate under another, including across process restarts. Use
//! [`PortableSigned`](crate::container::PortableSigned) when encodings must be
//! readable by a separately constructed codec.
//!
//! ## Tokens
//! - Header: `HMAC-SHA256(header, key)` on the signature line
//! - Payload: `HMAC-SHA512(payload, key)` in `data.hmac`

use crate::container::envelope::{self, Envelope};
use crate::container::{ContainerFormat, Header, HeaderData, HeaderInfo, MAGIC_SIGNED};
use crate::core::codec::{Codec, CodecKind, Persistable};
use crate::core::encoding::Encoding;
use crate::core::serialization::Native;
use crate::error::{constants, PersistError, Result};
use crate::utils::compression::Compression;
use crate::utils::crypto::{self, HashType, SecretKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument, warn};

/// Integrity descriptor in signed headers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SignedData {
    pub hmac: HmacInfo,
    pub length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct HmacInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub token: String,
}

impl HeaderData for SignedData {
    fn length(&self) -> usize {
        self.length
    }
}

/// Parameters distinguishing the signed envelope variants
pub(crate) struct MacScheme<'a> {
    pub format: ContainerFormat,
    pub magic: &'static [u8],
    pub key: &'a [u8],
    pub header_hash: HashType,
    pub payload_hash: HashType,
    /// Hash types a decoder will honour, for both tokens
    pub accepted: &'static [HashType],
}

impl MacScheme<'_> {
    /// Encode `persistable` with `base` and wrap it in a signed envelope
    pub(crate) fn seal<C: Codec, P: Persistable>(
        &self,
        base: &C,
        persistable: &P,
    ) -> Result<Encoding> {
        let payload = base.encode(persistable)?;
        let token = self.payload_hash.mac(self.key, payload.as_bytes())?;

        let header = Header::new(
            persistable,
            SignedData {
                hmac: HmacInfo {
                    kind: self.payload_hash.name().to_string(),
                    token: hex::encode(token),
                },
                length: payload.len(),
            },
        );

        let encoding = envelope::assemble(
            self.magic,
            self.header_hash,
            self.key,
            &header.to_json()?,
            payload.as_bytes(),
        )?;

        debug!(
            format = self.format.name(),
            class = P::CLASS_NAME,
            payload = payload.len(),
            total = encoding.len(),
            "Encoded signed container"
        );
        Ok(encoding)
    }

    /// Run every check up to and including the length check
    pub(crate) fn open_header<'e>(
        &self,
        encoding: &'e Encoding,
    ) -> Result<(Header<SignedData>, &'e [u8])> {
        let envelope = Envelope::split(self.magic, encoding.as_bytes())?;
        envelope.verify_header(self.key, self.accepted)?;

        let header = Header::<SignedData>::parse(envelope.header)?;
        let hash = header.data.hmac.kind.parse::<HashType>()?;
        if !self.accepted.contains(&hash) {
            return Err(PersistError::UnsupportedAlgorithm(format!(
                "Hash type {} is not supported by the {} format",
                hash.name(),
                self.format.name()
            )));
        }

        header.check_length(envelope.payload)?;
        Ok((header, envelope.payload))
    }

    /// Verify the envelope fully and decode the payload with `base`
    pub(crate) fn open<C: Codec, P: Persistable>(
        &self,
        base: &C,
        encoding: &Encoding,
    ) -> Result<P> {
        let (header, payload) = self.open_header(encoding)?;

        let hash = header.data.hmac.kind.parse::<HashType>()?;
        let authentic = envelope::decode_token(&header.data.hmac.token)
            .is_some_and(|token| hash.verify(self.key, payload, &token));
        if !authentic {
            warn!(format = self.format.name(), "Container payload failed authentication");
            return Err(PersistError::Authentication(
                constants::ERR_DATA_VERIFICATION,
            ));
        }

        let persistable: P = base.decode(&Encoding::from(payload.to_vec()))?;
        header.check_class(&persistable)?;

        debug!(
            format = self.format.name(),
            class = P::CLASS_NAME,
            revision = header.class.revision,
            "Decoded signed container"
        );
        Ok(persistable)
    }
}

const ACCEPTED: &[HashType] = &[HashType::Sha256, HashType::Sha512];

/// Signed container with a password-stretched key
#[derive(Clone)]
pub struct Signed<C = Compression<Native>> {
    digest: SecretKey,
    base: C,
}

impl Signed<Compression<Native>> {
    /// Signed container over the default stack (Native compressed at level 9)
    ///
    /// # Errors
    /// Returns `PersistError::Crypto` if key derivation fails
    pub fn new(password: impl AsRef<[u8]>) -> Result<Self> {
        Self::with_base(password, Compression::default_stack())
    }
}

impl<C: Codec> Signed<C> {
    /// Signed container over a custom base codec
    ///
    /// # Errors
    /// Returns `PersistError::Crypto` if key derivation fails
    pub fn with_base(password: impl AsRef<[u8]>, base: C) -> Result<Self> {
        let digest = crypto::derive_stretched_key(password.as_ref())?;
        Ok(Self { digest, base })
    }

    /// The wrapped codec
    pub fn base(&self) -> &C {
        &self.base
    }

    /// Verify and read the header without decoding the payload
    pub fn inspect(&self, encoding: &Encoding) -> Result<HeaderInfo> {
        let (header, _) = self.scheme().open_header(encoding)?;
        Ok(header.info(ContainerFormat::Signed))
    }

    fn scheme(&self) -> MacScheme<'_> {
        MacScheme {
            format: ContainerFormat::Signed,
            magic: MAGIC_SIGNED,
            key: &self.digest[..],
            header_hash: HashType::Sha256,
            payload_hash: HashType::Sha512,
            accepted: ACCEPTED,
        }
    }
}

impl<C: Codec> Codec for Signed<C> {
    fn kind(&self) -> CodecKind {
        CodecKind::Signed
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

impl<C: fmt::Debug> fmt::Debug for Signed<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signed")
            .field("digest", &"<redacted>")
            .field("base", &self.base)
            .finish()
    }
}

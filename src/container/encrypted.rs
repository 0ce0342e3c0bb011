//! # Encrypted Container
//!
//! Confidentiality for the payload with AES-256-CBC, plus an HMAC over the
//! header.
//!
//! ## Keys
//! - Cipher key: unsalted SHA-256 of the password
//! - Header HMAC key: the raw password
//!
//! ## Limitations
//! The ciphertext itself carries no MAC, so this is not an authenticated
//! encryption scheme. A modified ciphertext usually fails at unpadding,
//! decompression or base decoding, but a modification that survives all three
//! decodes to whatever the altered plaintext describes. Wrap the encrypted
//! container's output with a signed container when payload integrity matters.

use crate::container::envelope::{self, Envelope};
use crate::container::{ContainerFormat, Header, HeaderData, HeaderInfo, MAGIC_ENCRYPTED};
use crate::core::codec::{Codec, CodecKind, Persistable};
use crate::core::encoding::Encoding;
use crate::core::serialization::Native;
use crate::error::{PersistError, Result};
use crate::utils::compression::Compression;
use crate::utils::crypto::{self, HashType, SecretKey, IV_LENGTH};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};
use zeroize::Zeroizing;

/// Cipher identifier written into headers
pub const METHOD_AES256: &str = "aes256";

const ACCEPTED: &[HashType] = &[HashType::Sha256];

/// Encryption descriptor in encrypted headers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct EncryptedData {
    pub encryption: EncryptionInfo,
    pub length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct EncryptionInfo {
    pub method: String,
    pub iv: String,
}

impl HeaderData for EncryptedData {
    fn length(&self) -> usize {
        self.length
    }
}

/// Container encrypting its payload with a password-derived key
#[derive(Clone)]
pub struct Encrypted<C = Compression<Native>> {
    password: Zeroizing<Vec<u8>>,
    digest: SecretKey,
    base: C,
}

impl Encrypted<Compression<Native>> {
    /// Encrypted container over the default stack (Native compressed at level 9)
    pub fn new(password: impl AsRef<[u8]>) -> Self {
        Self::with_base(password, Compression::default_stack())
    }
}

impl<C: Codec> Encrypted<C> {
    /// Encrypted container over a custom base codec
    pub fn with_base(password: impl AsRef<[u8]>, base: C) -> Self {
        let password = password.as_ref();
        Self {
            password: Zeroizing::new(password.to_vec()),
            digest: crypto::derive_hashed_key(password),
            base,
        }
    }

    /// The wrapped codec
    pub fn base(&self) -> &C {
        &self.base
    }

    /// Verify and read the header without decrypting the payload
    pub fn inspect(&self, encoding: &Encoding) -> Result<HeaderInfo> {
        let (header, _) = self.open_header(encoding)?;
        Ok(header.info(ContainerFormat::Encrypted))
    }

    fn open_header<'e>(&self, encoding: &'e Encoding) -> Result<(Header<EncryptedData>, &'e [u8])> {
        let envelope = Envelope::split(MAGIC_ENCRYPTED, encoding.as_bytes())?;
        envelope.verify_header(&self.password, ACCEPTED)?;

        let header = Header::<EncryptedData>::parse(envelope.header)?;
        if header.data.encryption.method != METHOD_AES256 {
            return Err(PersistError::UnsupportedAlgorithm(format!(
                "Unknown encryption method: {}",
                header.data.encryption.method
            )));
        }

        header.check_length(envelope.payload)?;
        Ok((header, envelope.payload))
    }
}

fn decode_iv(encoded: &str) -> Result<[u8; IV_LENGTH]> {
    let raw = STANDARD
        .decode(encoded)
        .map_err(|e| PersistError::Format(format!("Invalid initialization vector: {e}")))?;
    raw.try_into().map_err(|raw: Vec<u8>| {
        PersistError::Format(format!(
            "Initialization vector must be {IV_LENGTH} bytes, found {}",
            raw.len()
        ))
    })
}

impl<C: Codec> Codec for Encrypted<C> {
    fn kind(&self) -> CodecKind {
        CodecKind::Encrypted
    }

    #[instrument(level = "debug", skip_all)]
    fn encode<P: Persistable>(&self, persistable: &P) -> Result<Encoding> {
        let payload = self.base.encode(persistable)?;
        let iv = crypto::random_bytes::<IV_LENGTH>()?;
        let ciphertext = crypto::encrypt_aes256(payload.as_bytes(), &self.digest[..], &iv)?;

        let header = Header::new(
            persistable,
            EncryptedData {
                encryption: EncryptionInfo {
                    method: METHOD_AES256.to_string(),
                    iv: STANDARD.encode(iv),
                },
                length: ciphertext.len(),
            },
        );

        let encoding = envelope::assemble(
            MAGIC_ENCRYPTED,
            HashType::Sha256,
            &self.password,
            &header.to_json()?,
            &ciphertext,
        )?;

        debug!(
            class = P::CLASS_NAME,
            plaintext = payload.len(),
            ciphertext = ciphertext.len(),
            "Encoded encrypted container"
        );
        Ok(encoding)
    }

    #[instrument(level = "debug", skip_all, fields(len = encoding.len()))]
    fn decode<P: Persistable>(&self, encoding: &Encoding) -> Result<P> {
        let (header, ciphertext) = self.open_header(encoding)?;

        let iv = decode_iv(&header.data.encryption.iv)?;
        let plaintext = crypto::decrypt_aes256(ciphertext, &self.digest[..], &iv)?;

        let persistable: P = self.base.decode(&Encoding::from(plaintext))?;
        header.check_class(&persistable)?;

        debug!(
            class = P::CLASS_NAME,
            revision = header.class.revision,
            "Decoded encrypted container"
        );
        Ok(persistable)
    }
}

impl<C: fmt::Debug> fmt::Debug for Encrypted<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encrypted")
            .field("password", &"<redacted>")
            .field("digest", &"<redacted>")
            .field("base", &self.base)
            .finish()
    }
}

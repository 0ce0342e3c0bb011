//! # Cryptographic Primitives
//!
//! Keyed hashing, password-derived key material and symmetric encryption used
//! by the container formats.
//!
//! ## Primitives
//! - **HMAC**: SHA-256 and SHA-512, verified in constant time
//! - **Stretched keys**: Argon2id over the password with a random salt
//! - **Hashed keys**: Plain SHA-256 of the password, deterministic
//! - **Encryption**: AES-256-CBC with PKCS#7 padding
//!
//! Derived keys are wrapped in [`Zeroizing`] so they are wiped on drop.

use crate::error::{constants, PersistError, Result};
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use argon2::Argon2;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use std::str::FromStr;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Length in bytes of every derived key
pub const KEY_LENGTH: usize = 32;

/// Length in bytes of the Argon2 salt
pub const SALT_LENGTH: usize = 16;

/// Length in bytes of the AES-CBC initialization vector
pub const IV_LENGTH: usize = 16;

/// Secret key material, wiped on drop
pub type SecretKey = Zeroizing<[u8; KEY_LENGTH]>;

/// Hash functions usable for HMAC tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    Sha256,
    Sha512,
}

impl HashType {
    /// Identifier written into envelopes
    pub fn name(self) -> &'static str {
        match self {
            HashType::Sha256 => "sha256",
            HashType::Sha512 => "sha512",
        }
    }

    /// Compute `HMAC(data, key)`
    pub fn mac(self, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        match self {
            HashType::Sha256 => {
                let mut mac = HmacSha256::new_from_slice(key)
                    .map_err(|e| PersistError::Crypto(e.to_string()))?;
                mac.update(data);
                Ok(mac.finalize().into_bytes().to_vec())
            }
            HashType::Sha512 => {
                let mut mac = HmacSha512::new_from_slice(key)
                    .map_err(|e| PersistError::Crypto(e.to_string()))?;
                mac.update(data);
                Ok(mac.finalize().into_bytes().to_vec())
            }
        }
    }

    /// Check `tag` against `HMAC(data, key)` in constant time
    pub fn verify(self, key: &[u8], data: &[u8], tag: &[u8]) -> bool {
        match self {
            HashType::Sha256 => HmacSha256::new_from_slice(key)
                .map(|mut mac| {
                    mac.update(data);
                    mac.verify_slice(tag).is_ok()
                })
                .unwrap_or(false),
            HashType::Sha512 => HmacSha512::new_from_slice(key)
                .map(|mut mac| {
                    mac.update(data);
                    mac.verify_slice(tag).is_ok()
                })
                .unwrap_or(false),
        }
    }
}

impl FromStr for HashType {
    type Err = PersistError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sha256" => Ok(HashType::Sha256),
            "sha512" => Ok(HashType::Sha512),
            other => Err(PersistError::UnsupportedAlgorithm(format!(
                "Unknown hash type: {other}"
            ))),
        }
    }
}

/// Fill a fixed-size array from the operating system RNG
pub fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    getrandom::fill(&mut buf)
        .map_err(|e| PersistError::Crypto(format!("{}: {e}", constants::ERR_RANDOM_SOURCE)))?;
    Ok(buf)
}

/// Derive a key by stretching `password` with Argon2id and a fresh random salt.
///
/// The salt is discarded, so two calls with the same password return
/// different keys.
pub fn derive_stretched_key(password: &[u8]) -> Result<SecretKey> {
    let salt = random_bytes::<SALT_LENGTH>()?;
    let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
    Argon2::default()
        .hash_password_into(password, &salt, &mut key[..])
        .map_err(|e| PersistError::Crypto(format!("{}: {e}", constants::ERR_KEY_DERIVATION)))?;
    Ok(key)
}

/// Derive a key as the unsalted SHA-256 digest of `password`
pub fn derive_hashed_key(password: &[u8]) -> SecretKey {
    Zeroizing::new(Sha256::digest(password).into())
}

/// Encrypt with AES-256-CBC and PKCS#7 padding
pub fn encrypt_aes256(plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256CbcEnc::new_from_slices(key, iv)
        .map_err(|e| PersistError::Crypto(e.to_string()))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt AES-256-CBC ciphertext and strip PKCS#7 padding
///
/// # Errors
/// Returns `PersistError::Corruption` if the ciphertext is not block aligned
/// or the padding is invalid
pub fn decrypt_aes256(ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|e| PersistError::Crypto(e.to_string()))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| PersistError::Corruption(constants::ERR_DECRYPTION_FAILED.into()))
}

//! Envelope framing shared by every container format.
//!
//! Only the signature line and the header are delimiter-sensitive; the payload
//! is whatever follows the second newline and is never scanned.

use crate::core::encoding::Encoding;
use crate::error::{constants, PersistError, Result};
use crate::utils::crypto::HashType;
use tracing::warn;

const DELIMITER: u8 = b'\n';

/// The three segments following the magic prefix
#[derive(Debug, Clone, Copy)]
pub(crate) struct Envelope<'a> {
    pub signature: &'a [u8],
    pub header: &'a [u8],
    pub payload: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Strip `magic` and split the remainder on the first two newlines
    pub(crate) fn split(magic: &[u8], bytes: &'a [u8]) -> Result<Self> {
        let rest = bytes
            .strip_prefix(magic)
            .ok_or_else(|| PersistError::Format(constants::ERR_BAD_MAGIC.into()))?;

        let (signature, rest) = split_once(rest)
            .ok_or_else(|| PersistError::Format(constants::ERR_MISSING_HMAC_LINE.into()))?;

        let (header, payload) = split_once(rest)
            .ok_or_else(|| PersistError::Format(constants::ERR_MISSING_HEADER.into()))?;

        Ok(Self {
            signature,
            header,
            payload,
        })
    }

    /// Verify the header signature line with `key`.
    ///
    /// Anything short of a valid `<type>:<hex>` line whose type is in
    /// `accepted` and whose lowercase token matches fails as unauthenticated.
    pub(crate) fn verify_header(&self, key: &[u8], accepted: &[HashType]) -> Result<()> {
        let verified = std::str::from_utf8(self.signature)
            .ok()
            .and_then(|line| line.split_once(':'))
            .and_then(|(kind, token)| {
                let hash = kind.parse::<HashType>().ok()?;
                let token = decode_token(token)?;
                Some((hash, token))
            })
            .filter(|(hash, _)| accepted.contains(hash))
            .is_some_and(|(hash, token)| hash.verify(key, self.header, &token));

        if verified {
            Ok(())
        } else {
            warn!("Container header failed authentication");
            Err(PersistError::Authentication(
                constants::ERR_HEADER_VERIFICATION,
            ))
        }
    }
}

/// Decode a MAC token written by [`assemble`] or a container header.
///
/// Only lowercase hex is accepted, so every token has exactly one spelling
/// and a flipped case bit cannot decode to the same MAC.
pub(crate) fn decode_token(token: &str) -> Option<Vec<u8>> {
    if !token
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    {
        return None;
    }
    hex::decode(token).ok()
}

fn split_once(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let at = bytes.iter().position(|&b| b == DELIMITER)?;
    Some((&bytes[..at], &bytes[at + 1..]))
}

/// Sign `header` with `key` and lay out the full envelope
pub(crate) fn assemble(
    magic: &[u8],
    hash: HashType,
    key: &[u8],
    header: &[u8],
    payload: &[u8],
) -> Result<Encoding> {
    let line = format!("{}:{}", hash.name(), hex::encode(hash.mac(key, header)?));

    let mut out =
        Vec::with_capacity(magic.len() + line.len() + header.len() + payload.len() + 2);
    out.extend_from_slice(magic);
    out.extend_from_slice(line.as_bytes());
    out.push(DELIMITER);
    out.extend_from_slice(header);
    out.push(DELIMITER);
    out.extend_from_slice(payload);

    Ok(Encoding::from(out))
}

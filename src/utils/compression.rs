//! # Compression Decorator
//!
//! Wraps any [`Codec`] and applies zlib (DEFLATE) compression to its output.
//!
//! `encode` = compress(base.encode(p)), `decode` = base.decode(decompress(bytes)).
//!
//! ## Security
//! Decompression enforces a maximum output size (default [`MAX_PAYLOAD_SIZE`])
//! to prevent decompression bombs. Truncated streams and trailing garbage are
//! reported as corruption rather than silently accepted.

use crate::config::MAX_PAYLOAD_SIZE;
use crate::core::codec::{Codec, CodecKind, Persistable};
use crate::core::encoding::Encoding;
use crate::core::serialization::Native;
use crate::error::{constants, PersistError, Result};
use flate2::write::ZlibEncoder;
use flate2::{Decompress, FlushDecompress, Status};
use std::io::Write;
use tracing::trace;

/// Highest supported compression level
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Level used by the default container stack
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

/// Inflate buffer size
const CHUNK_SIZE: usize = 8192;

/// Compresses data with zlib at `level` (0 = stored blocks, no compression)
///
/// # Errors
/// Returns `PersistError::Serialization` if the encoder fails
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(data.len() / 2 + 16),
        flate2::Compression::new(level.min(MAX_COMPRESSION_LEVEL)),
    );
    encoder
        .write_all(data)
        .map_err(|_| PersistError::Serialization(constants::ERR_COMPRESSION_FAILED.into()))?;
    encoder
        .finish()
        .map_err(|_| PersistError::Serialization(constants::ERR_COMPRESSION_FAILED.into()))
}

/// Decompresses a zlib stream, refusing to produce more than `limit` bytes
///
/// # Errors
/// Returns `PersistError::Corruption` if:
/// - The stream is malformed or truncated
/// - Bytes follow the end of the stream
/// - Output size exceeds `limit`
pub fn decompress(data: &[u8], limit: usize) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(data.len().saturating_mul(2).min(limit));
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out();

        let status = inflater
            .decompress(&data[consumed..], &mut buffer, FlushDecompress::None)
            .map_err(|_| PersistError::Corruption(constants::ERR_DECOMPRESSION_FAILED.into()))?;

        let written = (inflater.total_out() - produced) as usize;
        out.extend_from_slice(&buffer[..written]);

        // Check size limit on each chunk
        if out.len() > limit {
            return Err(PersistError::Corruption(
                constants::ERR_DECOMPRESSION_LIMIT.into(),
            ));
        }

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                if written == 0 && inflater.total_in() as usize == consumed {
                    // Input ran out before the end-of-stream marker
                    return Err(PersistError::Corruption(
                        constants::ERR_DECOMPRESSION_FAILED.into(),
                    ));
                }
            }
        }
    }

    if inflater.total_in() as usize != data.len() {
        return Err(PersistError::Corruption(
            constants::ERR_DECOMPRESSION_FAILED.into(),
        ));
    }

    Ok(out)
}

/// Codec decorator that compresses the output of a base codec
#[derive(Debug, Clone)]
pub struct Compression<C = Native> {
    base: C,
    level: u32,
    max_decompressed_size: usize,
}

impl<C: Codec> Compression<C> {
    /// Wrap `base` with compression at `level` (0-9)
    ///
    /// # Errors
    /// Returns `PersistError::Config` if the level is out of range or `base`
    /// is itself a compression codec. Only the immediate base is checked.
    pub fn new(base: C, level: u32) -> Result<Self> {
        if level > MAX_COMPRESSION_LEVEL {
            return Err(PersistError::Config(format!(
                "Invalid compression level: {level} (valid range: 0-{MAX_COMPRESSION_LEVEL})"
            )));
        }

        if base.kind() == CodecKind::Compression {
            return Err(PersistError::Config(
                constants::ERR_NESTED_COMPRESSION.into(),
            ));
        }

        Ok(Self {
            base,
            level,
            max_decompressed_size: MAX_PAYLOAD_SIZE,
        })
    }

    /// Override the decompressed size limit
    pub fn with_limit(mut self, max_decompressed_size: usize) -> Self {
        self.max_decompressed_size = max_decompressed_size;
        self
    }

    /// Compression level
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Maximum number of bytes `decode` will inflate
    pub fn limit(&self) -> usize {
        self.max_decompressed_size
    }

    /// The wrapped codec
    pub fn base(&self) -> &C {
        &self.base
    }
}

impl Compression<Native> {
    /// Native codec compressed at the highest level
    pub fn default_stack() -> Self {
        Self {
            base: Native,
            level: DEFAULT_COMPRESSION_LEVEL,
            max_decompressed_size: MAX_PAYLOAD_SIZE,
        }
    }
}

impl Default for Compression<Native> {
    fn default() -> Self {
        Self::default_stack()
    }
}

impl<C: Codec> Codec for Compression<C> {
    fn kind(&self) -> CodecKind {
        CodecKind::Compression
    }

    fn encode<P: Persistable>(&self, persistable: &P) -> Result<Encoding> {
        let raw = self.base.encode(persistable)?;
        let compressed = compress(raw.as_bytes(), self.level)?;
        trace!(
            level = self.level,
            raw = raw.len(),
            compressed = compressed.len(),
            "Compressed payload"
        );
        Ok(Encoding::from(compressed))
    }

    fn decode<P: Persistable>(&self, encoding: &Encoding) -> Result<P> {
        let raw = decompress(encoding.as_bytes(), self.max_decompressed_size)?;
        self.base.decode(&Encoding::from(raw))
    }
}

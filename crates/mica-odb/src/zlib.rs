//! Zlib compression for at-rest object storage.
//!
//! Compression is a storage-size optimization only; it carries no
//! information. A corrupt compressed stream is store-level corruption and
//! surfaces as [`OdbError::Compression`].

use crate::{OdbError, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Compresses bytes with zlib at the default level.
pub fn compress(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(bytes)
        .map_err(|e| OdbError::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| OdbError::Compression(e.to_string()))
}

/// Decompresses a zlib stream.
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(compressed);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| OdbError::Compression(e.to_string()))?;
    Ok(decompressed)
}

//! Compression layer for packet payloads
//!
//! Every frame payload travels gzip-compressed.

use bancho_core::{BanchoError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Default gzip level used when none is configured
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Compress a payload with gzip at the given level (0-9)
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level.min(9)));
    encoder
        .write_all(data)
        .map_err(|e| BanchoError::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| BanchoError::Compression(e.to_string()))
}

/// Decompress a gzip payload
///
/// An empty input is treated as an empty payload.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    decompress_limited(data, usize::MAX)
}

/// Decompress a gzip payload, failing with [`BanchoError::PayloadTooLarge`]
/// once the output exceeds `max` bytes
pub fn decompress_limited(data: &[u8], max: usize) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let limit = (max as u64).saturating_add(1);
    let mut decoder = GzDecoder::new(data).take(limit);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| BanchoError::Decompression(e.to_string()))?;

    if decompressed.len() > max {
        return Err(BanchoError::PayloadTooLarge {
            length: decompressed.len(),
            max,
        });
    }
    Ok(decompressed)
}

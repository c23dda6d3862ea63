use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Gzip a cache payload
pub fn compress_data(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .context("Failed to write data to compressor")?;

    let compressed = encoder.finish().context("Failed to finish compression")?;

    debug!("Compressed {} bytes to {} bytes", data.len(), compressed.len());
    Ok(compressed)
}

/// Whether a stored payload is gzip data
pub fn is_compressed(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Decode a stored payload, inflating it only when it carries the gzip header.
///
/// Entries written before compression was toggled stay readable.
pub fn decode_data(data: Vec<u8>) -> Result<Vec<u8>> {
    if !is_compressed(&data) {
        return Ok(data);
    }

    let mut decompressed = Vec::new();
    GzDecoder::new(data.as_slice())
        .read_to_end(&mut decompressed)
        .context("Failed to decompress cache entry")?;

    Ok(decompressed)
}

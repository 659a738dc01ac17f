//! Binary dump codec.
//!
//! Layout: 4 magic bytes `ABID`, little-endian `u32` format version,
//! little-endian `u64` xxh3 checksum of the payload, bincode payload.

use super::document::DumpDocument;
use super::format::BINARY_MAGIC;
use super::SUPPORTED_DUMP_VERSIONS;
use crate::error::{AbiToolsError, Result};
use xxhash_rust::xxh3::xxh3_64;

const HEADER_LEN: usize = 4 + 4 + 8;

pub(crate) fn encode(doc: &DumpDocument) -> Result<Vec<u8>> {
    let payload = bincode::serde::encode_to_vec(doc, bincode::config::standard())
        .map_err(|e| AbiToolsError::malformed("encoding binary dump", e.to_string()))?;

    let mut output = Vec::with_capacity(HEADER_LEN + payload.len());
    output.extend_from_slice(&BINARY_MAGIC);
    output.extend_from_slice(&doc.format_version.to_le_bytes());
    output.extend_from_slice(&xxh3_64(&payload).to_le_bytes());
    output.extend_from_slice(&payload);
    Ok(output)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<DumpDocument> {
    const CTX: &str = "decoding binary dump";

    if bytes.len() < HEADER_LEN {
        return Err(AbiToolsError::malformed(
            CTX,
            format!("truncated header ({} bytes)", bytes.len()),
        ));
    }
    if bytes[..4] != BINARY_MAGIC {
        return Err(AbiToolsError::malformed(CTX, "bad magic bytes"));
    }

    let mut version = [0u8; 4];
    version.copy_from_slice(&bytes[4..8]);
    let version = u32::from_le_bytes(version);
    if !SUPPORTED_DUMP_VERSIONS.contains(&version) {
        return Err(AbiToolsError::unsupported_version(version, SUPPORTED_DUMP_VERSIONS));
    }

    let mut checksum = [0u8; 8];
    checksum.copy_from_slice(&bytes[8..HEADER_LEN]);
    let checksum = u64::from_le_bytes(checksum);

    let payload = &bytes[HEADER_LEN..];
    if xxh3_64(payload) != checksum {
        return Err(AbiToolsError::malformed(CTX, "checksum mismatch"));
    }

    let (doc, read): (DumpDocument, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())
            .map_err(|e| AbiToolsError::malformed(CTX, e.to_string()))?;
    if read != payload.len() {
        return Err(AbiToolsError::malformed(
            CTX,
            format!("{} trailing bytes after payload", payload.len() - read),
        ));
    }
    if doc.format_version != version {
        return Err(AbiToolsError::malformed(
            CTX,
            format!(
                "header version {version} disagrees with payload version {}",
                doc.format_version
            ),
        ));
    }
    Ok(doc)
}

//! Stream framing: the container that wraps compressed blocks.
//!
//! Layout:
//!
//! ```text
//! magic "KMPA" | version u16 LE | varint total uncompressed length
//! repeated:  varint compressed payload length | block payload
//! trailer:   XXH32 of the uncompressed payload, u32 LE
//! ```
//!
//! A block payload is a varint uncompressed length followed by the token
//! stream. Blocks are self-contained, so a reader can skip any block from
//! its recorded compressed length alone. Decoding is tier-agnostic: tag
//! widths self-describe per token, not per stream.

pub mod format;


use std::io::Cursor;

use crate::block::{decode_block, encode_block, MAX_BLOCK_SIZE};
use crate::config::EffortProfile;
use crate::dict::Dictionary;
use crate::error::KempaError;
use crate::kernels::{checksum, varint};

fn corrupt(msg: impl Into<String>) -> KempaError {
    KempaError::CorruptStream(msg.into())
}

/// Reads one container length field, folding varint-level failures into the
/// stream-corruption taxonomy the caller reports.
fn read_length<T>(cursor: &mut Cursor<&[u8]>) -> Result<T, KempaError>
where
    T: num_traits::PrimInt + num_traits::Unsigned,
{
    varint::decode_one(cursor).map_err(|e| corrupt(e.to_string()))
}

/// Compresses `input` into a self-contained stream.
///
/// Never fails: empty input produces a minimal valid stream, and input with
/// no profitable matches degrades to literal runs. The output is owned by
/// the caller; nothing is retained.
pub fn compress(profile: EffortProfile, dict: Option<&Dictionary>, input: &[u8]) -> Vec<u8> {
    let params = profile.search_params();

    let mut out = Vec::with_capacity(input.len() / 2 + format::MIN_STREAM_SIZE);
    out.extend_from_slice(format::STREAM_MAGIC);
    out.extend_from_slice(&format::STREAM_FORMAT_VERSION.to_le_bytes());
    varint::encode_one(input.len() as u64, &mut out);

    let mut block_buf = Vec::new();
    let mut blocks = 0usize;
    for chunk in input.chunks(MAX_BLOCK_SIZE) {
        block_buf.clear();
        varint::encode_one(chunk.len() as u64, &mut block_buf);
        encode_block(chunk, dict, params, &mut block_buf);
        varint::encode_one(block_buf.len() as u64, &mut out);
        out.extend_from_slice(&block_buf);
        blocks += 1;
    }

    out.extend_from_slice(&checksum::payload_checksum(input).to_le_bytes());

    log::debug!(
        "compressed {} bytes into {} ({} blocks, profile {:?})",
        input.len(),
        out.len(),
        blocks,
        profile
    );
    out
}

/// Decompresses a stream produced by [`compress`].
///
/// The same dictionary (or none) used at encode time must be supplied.
/// Fails with `CorruptStream` on any structural violation and with
/// `ChecksumMismatch` when the replayed payload disagrees with the recorded
/// digest; both are terminal and never retried internally.
pub fn decompress(dict: Option<&Dictionary>, stream: &[u8]) -> Result<Vec<u8>, KempaError> {
    if stream.len() < format::MIN_STREAM_SIZE {
        return Err(corrupt(format!(
            "stream is {} bytes, minimum is {}",
            stream.len(),
            format::MIN_STREAM_SIZE
        )));
    }
    if &stream[..4] != format::STREAM_MAGIC {
        return Err(corrupt("invalid stream magic number"));
    }
    let version = u16::from_le_bytes([stream[4], stream[5]]);
    if version != format::STREAM_FORMAT_VERSION {
        return Err(corrupt(format!(
            "unsupported stream version: expected {}, got {}",
            format::STREAM_FORMAT_VERSION,
            version
        )));
    }

    // The trailer is fixed-width; everything before it is header and blocks.
    let body = &stream[..stream.len() - format::CHECKSUM_SIZE];
    let mut cursor = Cursor::new(body);
    cursor.set_position(6);

    let total_len = read_length::<u64>(&mut cursor)? as usize;
    let mut out = Vec::with_capacity(total_len.min(format::MAX_PREALLOC));

    while (cursor.position() as usize) < body.len() {
        let payload_len = read_length::<u64>(&mut cursor)? as usize;
        let start = cursor.position() as usize;
        let payload = body
            .get(start..start.saturating_add(payload_len))
            .ok_or_else(|| corrupt("block payload exceeds stream size"))?;
        cursor.set_position((start + payload_len) as u64);

        let mut block_cursor = Cursor::new(payload);
        let expected = read_length::<u32>(&mut block_cursor)? as usize;
        if out.len() + expected > total_len {
            return Err(corrupt("blocks exceed the declared total length"));
        }
        let tokens = &payload[block_cursor.position() as usize..];
        let decoded = decode_block(tokens, expected, dict)?;
        out.extend_from_slice(&decoded);
    }

    if out.len() != total_len {
        return Err(corrupt(format!(
            "stream declares {} bytes but blocks produced {}",
            total_len,
            out.len()
        )));
    }

    let mut recorded_bytes = [0u8; format::CHECKSUM_SIZE];
    recorded_bytes.copy_from_slice(&stream[stream.len() - format::CHECKSUM_SIZE..]);
    let recorded = u32::from_le_bytes(recorded_bytes);
    let actual = checksum::payload_checksum(&out);
    if recorded != actual {
        return Err(KempaError::ChecksumMismatch {
            expected: recorded,
            actual,
        });
    }

    log::debug!("decompressed {} bytes from {}", out.len(), stream.len());
    Ok(out)
}

//! Single-pass block decoding.
//!
//! A small state machine over the token stream: read a tag, replay a literal
//! run or resolve a copy against the bytes produced so far (with the
//! dictionary as a virtual backward extension), repeat until the declared
//! uncompressed length is reached. Every structural violation fails with
//! `CorruptStream`; nothing is retried.

use crate::dict::Dictionary;
use crate::error::KempaError;

use super::{MAX_BLOCK_SIZE, MIN_MATCH_LEN, TAG_COPY1, TAG_COPY2, TAG_COPY3, TAG_LITERAL};

fn corrupt(msg: impl Into<String>) -> KempaError {
    KempaError::CorruptStream(msg.into())
}

/// Decodes one block's token stream into exactly `expected_len` bytes.
///
/// The token stream must account for the declared length precisely: ending
/// early, overshooting, or leaving trailing bytes are all corruption.
pub fn decode_block(
    tokens: &[u8],
    expected_len: usize,
    dict: Option<&Dictionary>,
) -> Result<Vec<u8>, KempaError> {
    if expected_len > MAX_BLOCK_SIZE {
        return Err(corrupt(format!(
            "block declares {} uncompressed bytes, limit is {}",
            expected_len, MAX_BLOCK_SIZE
        )));
    }

    let mut out = Vec::with_capacity(expected_len);
    let mut pos = 0;

    while out.len() < expected_len {
        let &tag = tokens
            .get(pos)
            .ok_or_else(|| corrupt("token stream ends before declared block length"))?;
        pos += 1;

        match tag & 0b11 {
            TAG_LITERAL => {
                let code = (tag >> 2) as usize;
                let len = if code < 60 {
                    code + 1
                } else if code == 63 {
                    return Err(corrupt("reserved literal tag"));
                } else {
                    let extra = code - 59;
                    let bytes = tokens
                        .get(pos..pos + extra)
                        .ok_or_else(|| corrupt("truncated literal length"))?;
                    pos += extra;
                    let mut n = 0usize;
                    for (i, &b) in bytes.iter().enumerate() {
                        n |= (b as usize) << (8 * i);
                    }
                    n + 1
                };
                if out.len() + len > expected_len {
                    return Err(corrupt("literal run exceeds declared block length"));
                }
                let lit = tokens
                    .get(pos..pos + len)
                    .ok_or_else(|| corrupt("truncated literal bytes"))?;
                pos += len;
                out.extend_from_slice(lit);
            }
            TAG_COPY1 => {
                let len = ((tag >> 2) & 0b111) as usize + MIN_MATCH_LEN;
                let &low = tokens
                    .get(pos)
                    .ok_or_else(|| corrupt("truncated copy1 offset"))?;
                pos += 1;
                let offset = (((tag >> 5) as usize) << 8) | low as usize;
                emit_copy(&mut out, offset, len, expected_len, dict)?;
            }
            TAG_COPY2 => {
                let len = (tag >> 2) as usize + 1;
                let bytes = tokens
                    .get(pos..pos + 2)
                    .ok_or_else(|| corrupt("truncated copy2 offset"))?;
                pos += 2;
                let offset = u16::from_le_bytes([bytes[0], bytes[1]]) as usize;
                emit_copy(&mut out, offset, len, expected_len, dict)?;
            }
            TAG_COPY3 => {
                let len = (tag >> 2) as usize + 1;
                let bytes = tokens
                    .get(pos..pos + 3)
                    .ok_or_else(|| corrupt("truncated copy3 offset"))?;
                pos += 3;
                let offset =
                    bytes[0] as usize | (bytes[1] as usize) << 8 | (bytes[2] as usize) << 16;
                emit_copy(&mut out, offset, len, expected_len, dict)?;
            }
            _ => unreachable!("two-bit tag"),
        }
    }

    if pos != tokens.len() {
        return Err(corrupt("trailing bytes after declared block length"));
    }
    Ok(out)
}

/// Resolves one copy token against the produced bytes and the dictionary.
fn emit_copy(
    out: &mut Vec<u8>,
    offset: usize,
    len: usize,
    expected_len: usize,
    dict: Option<&Dictionary>,
) -> Result<(), KempaError> {
    if offset == 0 {
        return Err(corrupt("copy offset 0 is self-referential"));
    }
    let produced = out.len();
    let dict_len = dict.map_or(0, |d| d.len());
    if offset > produced + dict_len {
        return Err(corrupt(format!(
            "copy offset {} exceeds the {} reachable bytes",
            offset,
            produced + dict_len
        )));
    }
    if produced + len > expected_len {
        return Err(corrupt("copy length exceeds declared block length"));
    }

    let mut remaining = len;

    // Leading leg inside the dictionary, when the offset reaches behind the
    // block start. The offset check above guarantees it fits.
    if offset > produced {
        let dict_bytes = dict.map_or(&[][..], |d| d.as_bytes());
        let back = offset - produced;
        let start = dict_len - back;
        let take = remaining.min(back);
        out.extend_from_slice(&dict_bytes[start..start + take]);
        remaining -= take;
        // Any remainder now starts exactly at the block's first byte and
        // falls through to the self-referential leg below.
    }

    if remaining == 0 {
        return Ok(());
    }

    if offset >= remaining {
        // Disjoint source and destination.
        let start = out.len() - offset;
        out.extend_from_within(start..start + remaining);
    } else {
        // Overlapping copy: replay forward one byte at a time so each byte
        // may read bytes produced earlier in this same token.
        for _ in 0..remaining {
            let b = out[out.len() - offset];
            out.push(b);
        }
    }
    Ok(())
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::Dictionary;

    fn literal_token(bytes: &[u8]) -> Vec<u8> {
        let mut t = vec![((bytes.len() as u8 - 1) << 2) | TAG_LITERAL];
        t.extend_from_slice(bytes);
        t
    }

    fn copy2_token(offset: u16, len: u8) -> Vec<u8> {
        vec![((len - 1) << 2) | TAG_COPY2, offset as u8, (offset >> 8) as u8]
    }

    #[test]
    fn test_literal_only_stream_decodes() {
        let tokens = literal_token(b"hello");
        assert_eq!(decode_block(&tokens, 5, None).unwrap(), b"hello");
    }

    #[test]
    fn test_overlapping_copy_expands_one_byte_at_a_time() {
        // offset 1, length 50: the canonical run-length pattern. One seed
        // byte then fifty copies of it.
        let mut tokens = literal_token(b"a");
        tokens.extend_from_slice(&copy2_token(1, 50));
        let decoded = decode_block(&tokens, 51, None).unwrap();
        assert_eq!(decoded, vec![b'a'; 51]);
    }

    #[test]
    fn test_overlapping_copy_with_period_two() {
        let mut tokens = literal_token(b"ab");
        tokens.extend_from_slice(&copy2_token(2, 10));
        let decoded = decode_block(&tokens, 12, None).unwrap();
        assert_eq!(decoded, b"abababababab");
    }

    #[test]
    fn test_copy_offset_zero_is_rejected() {
        let mut tokens = literal_token(b"abcd");
        tokens.extend_from_slice(&copy2_token(0, 4));
        assert!(matches!(
            decode_block(&tokens, 8, None),
            Err(KempaError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_copy_offset_beyond_produced_bytes_is_rejected() {
        let mut tokens = literal_token(b"ab");
        tokens.extend_from_slice(&copy2_token(40, 4));
        assert!(matches!(
            decode_block(&tokens, 6, None),
            Err(KempaError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_dictionary_extends_the_reachable_window() {
        let dict = Dictionary::new(b"0123456789").unwrap();
        // Copy 4 bytes from 4 back: the whole copy resolves inside the
        // dictionary tail "6789".
        let tokens = copy2_token(4, 4);
        let decoded = decode_block(&tokens, 4, Some(&dict)).unwrap();
        assert_eq!(decoded, b"6789");

        // The farthest reachable byte is the dictionary's first one.
        let tokens = copy2_token(10, 4);
        let decoded = decode_block(&tokens, 4, Some(&dict)).unwrap();
        assert_eq!(decoded, b"0123");
    }

    #[test]
    fn test_copy_crossing_the_dictionary_boundary() {
        let dict = Dictionary::new(b"0123456789").unwrap();
        // One literal byte, then a copy that starts 3 bytes inside the
        // dictionary tail and continues over the block's own first byte.
        let mut tokens = literal_token(b"X");
        tokens.extend_from_slice(&copy2_token(4, 6));
        let decoded = decode_block(&tokens, 7, Some(&dict)).unwrap();
        assert_eq!(decoded, b"X789X78");
    }

    #[test]
    fn test_reserved_literal_tag_is_rejected() {
        let tokens = vec![(63 << 2) | TAG_LITERAL, 0, 0, 0, 0];
        assert!(matches!(
            decode_block(&tokens, 1, None),
            Err(KempaError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_truncated_literal_bytes_are_rejected() {
        let tokens = vec![(9 << 2) | TAG_LITERAL, b'a', b'b'];
        assert!(matches!(
            decode_block(&tokens, 10, None),
            Err(KempaError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_truncated_copy_offset_is_rejected() {
        let mut tokens = literal_token(b"abcd");
        tokens.push((3 << 2) | TAG_COPY2);
        tokens.push(4); // second offset byte missing
        assert!(matches!(
            decode_block(&tokens, 8, None),
            Err(KempaError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_stream_ending_before_declared_length_is_rejected() {
        let tokens = literal_token(b"abc");
        assert!(matches!(
            decode_block(&tokens, 10, None),
            Err(KempaError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_literal_overshooting_declared_length_is_rejected() {
        let tokens = literal_token(b"abcdef");
        assert!(matches!(
            decode_block(&tokens, 3, None),
            Err(KempaError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_copy_overshooting_declared_length_is_rejected() {
        let mut tokens = literal_token(b"abcd");
        tokens.extend_from_slice(&copy2_token(4, 20));
        assert!(matches!(
            decode_block(&tokens, 8, None),
            Err(KempaError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_trailing_bytes_after_declared_length_are_rejected() {
        let mut tokens = literal_token(b"abc");
        tokens.push(0xAA);
        assert!(matches!(
            decode_block(&tokens, 3, None),
            Err(KempaError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_oversized_declared_length_is_rejected() {
        assert!(matches!(
            decode_block(&[], MAX_BLOCK_SIZE + 1, None),
            Err(KempaError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_empty_block_decodes_to_nothing() {
        assert_eq!(decode_block(&[], 0, None).unwrap(), Vec::<u8>::new());
    }
}

//! This module contains the pure, stateless kernels for LEB128
//! (Little-Endian Base 128) variable-length integer encoding and decoding.
//!
//! Every length field in the stream container and the block headers is
//! framed with LEB128, so the common case of small values costs one byte.
//! Decoding is fully panic-free.

use num_traits::{PrimInt, Unsigned};
use std::io::Cursor;

use crate::error::KempaError;

/// Encodes a single unsigned integer into a LEB128 byte sequence, appending
/// it to `buffer`. Encoding cannot fail.
pub fn encode_one(value: u64, buffer: &mut Vec<u8>) {
    let mut current = value;
    loop {
        let mut byte = (current & 0x7F) as u8;
        current >>= 7;
        if current != 0 {
            byte |= 0x80;
        }
        buffer.push(byte);
        if current == 0 {
            break;
        }
    }
}

/// Decodes a single unsigned integer from a LEB128 byte stream cursor.
pub fn decode_one<T>(cursor: &mut Cursor<&[u8]>) -> Result<T, KempaError>
where
    T: PrimInt + Unsigned,
{
    let mut result = T::zero();
    let mut shift = 0;
    let total_bits = std::mem::size_of::<T>() * 8;

    loop {
        let pos = cursor.position() as usize;
        let byte = *cursor
            .get_ref()
            .get(pos)
            .ok_or_else(|| KempaError::VarintDecodeError("unexpected end of buffer".to_string()))?;
        cursor.set_position((pos + 1) as u64);

        let payload = T::from(byte & 0x7F)
            .ok_or_else(|| KempaError::VarintDecodeError("failed to widen 7-bit payload".to_string()))?;

        // Adding another 7-bit group past the type's capacity is an overflow.
        if shift >= total_bits {
            return Err(KempaError::VarintDecodeError(
                "integer overflow during decoding".to_string(),
            ));
        }

        result = result | (payload << shift);

        if byte & 0x80 == 0 {
            // The final group may set bits beyond the type's width when the
            // width is not a multiple of 7.
            if shift + 7 > total_bits && (byte >> (total_bits - shift)) > 0 {
                return Err(KempaError::VarintDecodeError(
                    "integer overflow during decoding".to_string(),
                ));
            }
            return Ok(result);
        }

        shift += 7;
    }
}

//! Stream integrity checksum.
//!
//! The container trailer records an XXH32 digest of the full uncompressed
//! payload. The digest covers the payload, not the compressed bytes, so a
//! stream that parses cleanly but replays to the wrong bytes is still caught.

use xxhash_rust::xxh32::xxh32;

/// Seed for the payload digest. Part of the wire format.
const CHECKSUM_SEED: u32 = 0;

/// Digest of the uncompressed payload, as recorded in the stream trailer.
pub fn payload_checksum(payload: &[u8]) -> u32 {
    xxh32(payload, CHECKSUM_SEED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_stable_across_calls() {
        let payload = b"the same bytes must always hash the same";
        assert_eq!(payload_checksum(payload), payload_checksum(payload));
    }

    #[test]
    fn test_checksum_detects_a_single_flipped_byte() {
        let payload = b"sensitive payload".to_vec();
        let mut tampered = payload.clone();
        tampered[3] ^= 0x01;
        assert_ne!(payload_checksum(&payload), payload_checksum(&tampered));
    }

    #[test]
    fn test_empty_payload_has_a_digest() {
        // The empty stream still carries a trailer; pin its value so the
        // wire format cannot drift silently.
        assert_eq!(payload_checksum(&[]), xxh32(&[], 0));
    }
}

// In: src/frame/format.rs

//! Defines the on-wire constants for the kempa stream container. This is the
//! single source of truth for the container layout; the block-level token
//! shapes live in `crate::block`.

/// The magic number identifying a kempa stream.
pub const STREAM_MAGIC: &[u8; 4] = b"KMPA";
/// The current version of the stream container format.
pub const STREAM_FORMAT_VERSION: u16 = 1;

/// Width of the checksum trailer (XXH32 of the uncompressed payload).
pub const CHECKSUM_SIZE: usize = 4;

/// The minimum possible size of a valid stream in bytes:
/// magic(4) + version(2) + total-length varint(>=1) + checksum(4).
pub const MIN_STREAM_SIZE: usize = 4 + 2 + 1 + CHECKSUM_SIZE;

/// Cap on upfront output allocation from a declared total length, so a
/// malformed header cannot force an enormous allocation before any block
/// has been validated. (64MB)
pub const MAX_PREALLOC: usize = 64 * 1024 * 1024;

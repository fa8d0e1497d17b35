//! Block-level encoding and decoding.
//!
//! A block is a bounded slice of the input encoded as a self-contained token
//! stream: literal runs interleaved with back-reference copies. Every
//! back-reference resolves within the block itself or the optional preset
//! dictionary, never into a neighboring block, so blocks decode
//! independently.
//!
//! Token wire shapes (the low two bits of the tag byte select one):
//!
//! - `literal`: upper six bits hold `len - 1` for runs up to 60 bytes;
//!   values 60..=62 announce 1..=3 explicit little-endian length bytes.
//!   Value 63 is reserved. The raw bytes follow.
//! - `copy1`: bits 2..=4 hold `len - 4` (lengths 4..=11), bits 5..=7 the
//!   high bits of an 11-bit offset whose low byte follows.
//! - `copy2`: upper six bits hold `len - 1` (lengths up to 64); a 16-bit
//!   little-endian offset follows.
//! - `copy3`: like `copy2` with a 24-bit offset, bounding the window.

pub mod decode;
pub mod encode;
pub mod match_finder;

pub use decode::decode_block;
pub use encode::encode_block;

/// Tag for a literal run.
pub const TAG_LITERAL: u8 = 0b00;
/// Tag for a copy with an 11-bit offset.
pub const TAG_COPY1: u8 = 0b01;
/// Tag for a copy with a 16-bit offset.
pub const TAG_COPY2: u8 = 0b10;
/// Tag for a copy with a 24-bit offset.
pub const TAG_COPY3: u8 = 0b11;

/// Shortest back-reference worth encoding; anything shorter stays literal.
pub const MIN_MATCH_LEN: usize = 4;
/// Longest length a single copy token can carry.
pub const MAX_COPY_LEN: usize = 64;
/// Largest representable back-reference distance (24-bit offset field).
pub const MAX_OFFSET: usize = (1 << 24) - 1;
/// Upper bound on the uncompressed size of one block.
pub const MAX_BLOCK_SIZE: usize = 4 << 20;

/// Literal runs up to this length keep their length inside the tag byte.
pub(crate) const MAX_INLINE_LITERAL_LEN: usize = 60;
/// copy1 offsets fit in 11 bits.
pub(crate) const MAX_COPY1_OFFSET: usize = (1 << 11) - 1;
/// copy1 lengths stop at 11.
pub(crate) const MAX_COPY1_LEN: usize = 11;
/// copy2 offsets fit in 16 bits.
pub(crate) const MAX_COPY2_OFFSET: usize = (1 << 16) - 1;

//! Greedy block encoding.
//!
//! Drives the match finder over one block and serializes its decisions into
//! the token wire format. Encoding never fails: input that yields no
//! profitable matches degrades to one long literal run.

use crate::config::SearchParams;
use crate::dict::Dictionary;

use super::match_finder::MatchFinder;
use super::{
    MAX_BLOCK_SIZE, MAX_COPY1_LEN, MAX_COPY1_OFFSET, MAX_COPY2_OFFSET, MAX_COPY_LEN,
    MAX_INLINE_LITERAL_LEN, MAX_OFFSET, MIN_MATCH_LEN, TAG_COPY1, TAG_COPY2, TAG_COPY3,
    TAG_LITERAL,
};

/// Probe-stride seed for skip acceleration. The stride is `skip >> 5`, so
/// the first 32 misses advance one byte at a time before widening.
const INITIAL_SKIP: usize = 32;

/// Encodes one block (at most `MAX_BLOCK_SIZE` bytes) into `out`.
///
/// The output is deterministic for a fixed (input, dictionary, params)
/// triple: the search has no randomness and no time-based heuristics.
pub fn encode_block(src: &[u8], dict: Option<&Dictionary>, params: SearchParams, out: &mut Vec<u8>) {
    debug_assert!(src.len() <= MAX_BLOCK_SIZE);

    let mut finder = MatchFinder::new(src, dict, params);
    let mut pos = 0;
    let mut literal_start = 0;
    let mut skip = INITIAL_SKIP;

    while pos < src.len() {
        match finder.find(pos) {
            None => {
                finder.insert(pos);
                let stride = if params.skip_acceleration {
                    let s = skip >> 5;
                    skip += 1;
                    s
                } else {
                    1
                };
                pos += stride;
            }
            Some(mut m) => {
                finder.insert(pos);
                if params.lazy {
                    // Defer the match while the next position keeps yielding
                    // a strictly longer one; deferred bytes join the run.
                    while pos + 1 < src.len() {
                        let Some(next) = finder.find(pos + 1) else {
                            break;
                        };
                        if next.len <= m.len {
                            break;
                        }
                        pos += 1;
                        finder.insert(pos);
                        m = next;
                    }
                }
                emit_literal(&src[literal_start..pos], out);
                emit_copy(m.offset, m.len, out);
                finder.insert_range(pos + 1, pos + m.len);
                pos += m.len;
                literal_start = pos;
                skip = INITIAL_SKIP;
            }
        }
    }

    emit_literal(&src[literal_start..], out);
}

/// Emits one literal run.
fn emit_literal(lit: &[u8], out: &mut Vec<u8>) {
    if lit.is_empty() {
        return;
    }
    let n = lit.len() - 1;
    if n < MAX_INLINE_LITERAL_LEN {
        out.push(((n as u8) << 2) | TAG_LITERAL);
    } else if n < (1 << 8) {
        out.push((60 << 2) | TAG_LITERAL);
        out.push(n as u8);
    } else if n < (1 << 16) {
        out.push((61 << 2) | TAG_LITERAL);
        out.extend_from_slice(&(n as u16).to_le_bytes());
    } else {
        // Block sizing keeps n below 2^24; three length bytes always fit.
        out.push((62 << 2) | TAG_LITERAL);
        out.extend_from_slice(&(n as u32).to_le_bytes()[..3]);
    }
    out.extend_from_slice(lit);
}

/// Emits one copy decision, splitting lengths beyond `MAX_COPY_LEN` into
/// chained tokens that reuse the same offset. Every emitted token keeps its
/// length within `MIN_MATCH_LEN..=MAX_COPY_LEN`.
fn emit_copy(offset: usize, mut len: usize, out: &mut Vec<u8>) {
    debug_assert!(offset >= 1 && offset <= MAX_OFFSET);
    debug_assert!(len >= MIN_MATCH_LEN);

    while len > MAX_COPY_LEN {
        // Keep at least MIN_MATCH_LEN for the final token.
        let take = if len - MAX_COPY_LEN < MIN_MATCH_LEN {
            MAX_COPY_LEN - MIN_MATCH_LEN
        } else {
            MAX_COPY_LEN
        };
        emit_copy_token(offset, take, out);
        len -= take;
    }
    emit_copy_token(offset, len, out);
}

/// Emits a single copy token, choosing the narrowest tag that fits.
fn emit_copy_token(offset: usize, len: usize, out: &mut Vec<u8>) {
    debug_assert!((MIN_MATCH_LEN..=MAX_COPY_LEN).contains(&len));

    if offset <= MAX_COPY1_OFFSET && len <= MAX_COPY1_LEN {
        out.push((((offset >> 8) as u8) << 5) | (((len - MIN_MATCH_LEN) as u8) << 2) | TAG_COPY1);
        out.push(offset as u8);
    } else if offset <= MAX_COPY2_OFFSET {
        out.push((((len - 1) as u8) << 2) | TAG_COPY2);
        out.extend_from_slice(&(offset as u16).to_le_bytes());
    } else {
        out.push((((len - 1) as u8) << 2) | TAG_COPY3);
        out.extend_from_slice(&(offset as u32).to_le_bytes()[..3]);
    }
}

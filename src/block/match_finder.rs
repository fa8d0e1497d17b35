//! Hash-chain match finding over one block plus an optional dictionary.
//!
//! The finder maps a 4-byte fingerprint to the most recent positions that
//! carried it, using flat `u32` arenas indexed by position instead of
//! pointer-chained nodes. All state is scoped to a single encode call and
//! owned exclusively by that call; the dictionary contributes candidates
//! through its own precomputed index and is never mutated.

use crate::config::SearchParams;
use crate::dict::Dictionary;

use super::{MAX_OFFSET, MIN_MATCH_LEN};

/// Hash table size. Power of two; indices are masked, never reduced modulo.
const HASH_BITS: u32 = 16;
const HASH_SIZE: usize = 1 << HASH_BITS;

/// Multiplicative hash constant (golden-ratio derived).
const HASH_MUL: u32 = 0x9E37_79B1;

/// Sentinel for an empty head slot or the end of a chain.
const NO_POS: u32 = u32::MAX;

/// Fingerprint of the four bytes starting at `window[0]`.
///
/// Callers guarantee `window.len() >= MIN_MATCH_LEN`.
#[inline]
pub(crate) fn fingerprint(window: &[u8]) -> usize {
    let v = u32::from_le_bytes([window[0], window[1], window[2], window[3]]);
    (v.wrapping_mul(HASH_MUL) >> (32 - HASH_BITS)) as usize
}

/// A candidate back-reference: `len` bytes reachable `offset` bytes back
/// from the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCandidate {
    pub offset: usize,
    pub len: usize,
}

//==================================================================================
// Hash Index
//==================================================================================

/// A position-indexed hash chain over one byte sequence.
///
/// `head[fingerprint]` holds the most recent position with that fingerprint;
/// `prev[pos]` holds the next older position with the same fingerprint.
/// Walking `head` then `prev` therefore visits candidates newest-first,
/// which is also smallest-offset-first.
#[derive(Debug, Clone)]
pub(crate) struct HashIndex {
    head: Vec<u32>,
    prev: Vec<u32>,
}

impl HashIndex {
    pub(crate) fn for_len(len: usize) -> Self {
        HashIndex {
            head: vec![NO_POS; HASH_SIZE],
            prev: vec![NO_POS; len],
        }
    }

    /// Records `pos` as the newest occurrence of its fingerprint. Positions
    /// too close to the end to carry a full fingerprint are skipped.
    pub(crate) fn insert(&mut self, bytes: &[u8], pos: usize) {
        if pos + MIN_MATCH_LEN > bytes.len() {
            return;
        }
        let h = fingerprint(&bytes[pos..]);
        self.prev[pos] = self.head[h];
        self.head[h] = pos as u32;
    }

    pub(crate) fn newest(&self, fingerprint: usize) -> Option<usize> {
        Self::position(self.head[fingerprint])
    }

    pub(crate) fn older(&self, pos: usize) -> Option<usize> {
        Self::position(self.prev[pos])
    }

    fn position(raw: u32) -> Option<usize> {
        (raw != NO_POS).then_some(raw as usize)
    }
}

//==================================================================================
// Match Finder
//==================================================================================

/// Call-scoped match finder for a single block.
pub struct MatchFinder<'a> {
    src: &'a [u8],
    dict: Option<&'a Dictionary>,
    index: HashIndex,
    params: SearchParams,
}

impl<'a> MatchFinder<'a> {
    pub fn new(src: &'a [u8], dict: Option<&'a Dictionary>, params: SearchParams) -> Self {
        MatchFinder {
            src,
            dict,
            index: HashIndex::for_len(src.len()),
            params,
        }
    }

    /// Records the fingerprint at `pos` so later probes can reference it.
    pub fn insert(&mut self, pos: usize) {
        self.index.insert(self.src, pos);
    }

    /// Records every position in `start..end`.
    pub fn insert_range(&mut self, start: usize, end: usize) {
        for pos in start..end {
            self.index.insert(self.src, pos);
        }
    }

    /// Finds the best prior occurrence of the bytes at `pos`: the longest
    /// verified match, ties broken toward the smaller offset. Returns `None`
    /// when nothing of at least `MIN_MATCH_LEN` bytes exists.
    ///
    /// Only positions inserted before the call are candidates, so the finder
    /// never proposes a self-referential match.
    pub fn find(&self, pos: usize) -> Option<MatchCandidate> {
        if pos + MIN_MATCH_LEN > self.src.len() {
            return None;
        }
        let h = fingerprint(&self.src[pos..]);
        let mut best: Option<MatchCandidate> = None;
        let mut budget = self.params.chain_limit;

        // Block-local chain, newest (smallest offset) first. Hash collisions
        // are expected; verification rejects them.
        let mut cand = self.index.newest(h);
        while let Some(c) = cand {
            if budget == 0 {
                break;
            }
            budget -= 1;
            let offset = pos - c;
            if offset > MAX_OFFSET {
                // Chains are position-ordered; older entries only get farther.
                break;
            }
            let len = self.local_match_len(c, pos);
            if len >= MIN_MATCH_LEN && best.map_or(true, |b| len > b.len) {
                best = Some(MatchCandidate { offset, len });
            }
            cand = self.index.older(c);
        }

        // Dictionary chain. Every dictionary offset exceeds every block-local
        // offset at the same position, so a strictly-longer test preserves
        // the smaller-offset tie-break.
        if let Some(dict) = self.dict {
            let mut cand = dict.index().newest(h);
            while let Some(c) = cand {
                if budget == 0 {
                    break;
                }
                budget -= 1;
                let offset = pos + (dict.len() - c);
                if offset > MAX_OFFSET {
                    break;
                }
                let len = self.dict_match_len(dict, c, pos);
                if len >= MIN_MATCH_LEN && best.map_or(true, |b| len > b.len) {
                    best = Some(MatchCandidate { offset, len });
                }
                cand = dict.index().older(c);
            }
        }

        best
    }

    /// Length of the common run between `src[cand..]` and `src[pos..]`,
    /// truncated at the end of the block.
    fn local_match_len(&self, cand: usize, pos: usize) -> usize {
        let src = self.src;
        let limit = src.len() - pos;
        let mut n = 0;
        while n < limit && src[cand + n] == src[pos + n] {
            n += 1;
        }
        n
    }

    /// Length of the common run between the virtual text starting at
    /// dictionary position `dpos` and `src[pos..]`. A match that reaches the
    /// end of the dictionary continues into the block's first bytes, because
    /// the dictionary behaves as a virtual prefix of the block.
    fn dict_match_len(&self, dict: &Dictionary, dpos: usize, pos: usize) -> usize {
        let src = self.src;
        let dict_bytes = dict.as_bytes();
        let limit = src.len() - pos;
        let mut n = 0;
        while n < limit && dpos + n < dict_bytes.len() && dict_bytes[dpos + n] == src[pos + n] {
            n += 1;
        }
        if dpos + n == dict_bytes.len() {
            let mut k = 0;
            while n < limit && src[k] == src[pos + n] {
                n += 1;
                k += 1;
            }
        }
        n
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EffortProfile;

    fn finder_with_all_inserted<'a>(
        src: &'a [u8],
        dict: Option<&'a Dictionary>,
        upto: usize,
    ) -> MatchFinder<'a> {
        let params = EffortProfile::Balanced.search_params();
        let mut finder = MatchFinder::new(src, dict, params);
        finder.insert_range(0, upto);
        finder
    }

    #[test]
    fn test_finds_a_simple_repeat() {
        let src = b"abcdefgh_abcdefgh";
        let finder = finder_with_all_inserted(src, None, 9);
        let m = finder.find(9).unwrap();
        assert_eq!(m.offset, 9);
        assert_eq!(m.len, 8);
    }

    #[test]
    fn test_no_match_below_minimum_length() {
        // "abc" repeats but never 4 bytes worth.
        let src = b"abcxabcy";
        let finder = finder_with_all_inserted(src, None, 4);
        assert!(finder.find(4).is_none());
    }

    #[test]
    fn test_ties_prefer_the_smaller_offset() {
        // The same 4-byte run appears twice before the probe position.
        let src = b"wxyz__wxyz__wxyz";
        let finder = finder_with_all_inserted(src, None, 12);
        let m = finder.find(12).unwrap();
        assert_eq!(m.len, 4);
        assert_eq!(m.offset, 6);
    }

    #[test]
    fn test_matches_truncate_at_end_of_block() {
        let src = b"abcdefabcd";
        let finder = finder_with_all_inserted(src, None, 6);
        let m = finder.find(6).unwrap();
        assert_eq!(m.offset, 6);
        assert_eq!(m.len, 4);
    }

    #[test]
    fn test_dictionary_candidates_are_found() {
        let dict = Dictionary::new(b"the quick brown fox").unwrap();
        let src = b"quick brown";
        let params = EffortProfile::Balanced.search_params();
        let finder = MatchFinder::new(src, Some(&dict), params);
        let m = finder.find(0).unwrap();
        // "quick brown" starts 15 bytes before the dictionary end.
        assert_eq!(m.offset, 15);
        assert_eq!(m.len, 11);
    }

    #[test]
    fn test_dictionary_match_extends_across_the_boundary() {
        // The dictionary tail "abab" matches the block head, and the virtual
        // text continues seamlessly into the block, so the match runs past
        // the dictionary end.
        let dict = Dictionary::new(b"xxabab").unwrap();
        let src = b"ababab";
        let params = EffortProfile::Balanced.search_params();
        let finder = MatchFinder::new(src, Some(&dict), params);
        let m = finder.find(0).unwrap();
        assert_eq!(m.offset, 4);
        assert_eq!(m.len, 6);
    }

    #[test]
    fn test_chain_limit_bounds_the_search() {
        let src = b"aaaa_aaaa_aaaa_aaaa";
        let params = SearchParams {
            chain_limit: 1,
            lazy: false,
            skip_acceleration: false,
        };
        let mut finder = MatchFinder::new(src, None, params);
        finder.insert_range(0, 15);
        // Only the newest candidate may be probed; the result is still valid.
        let m = finder.find(15).unwrap();
        assert!(m.len >= MIN_MATCH_LEN);
        assert_eq!(m.offset, 5);
    }
}

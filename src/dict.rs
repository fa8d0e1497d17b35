//! Preset dictionary support.
//!
//! A dictionary primes the match window: its bytes behave as a virtual
//! prefix of every block, so back-references may reach into it without the
//! dictionary ever appearing in the output. Compressing small inputs that
//! share vocabulary with the dictionary is the intended use.
//!
//! The dictionary is immutable after construction and carries its own hash
//! index, built once, so encode calls never rehash it. Any number of
//! concurrent encode/decode calls may share one `&Dictionary` with no
//! synchronization.

use crate::block::match_finder::HashIndex;
use crate::error::KempaError;

/// An immutable preset dictionary plus its precomputed hash index.
#[derive(Clone)]
pub struct Dictionary {
    bytes: Vec<u8>,
    index: HashIndex,
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary").field("len", &self.bytes.len()).finish()
    }
}

impl Dictionary {
    /// Builds a dictionary from raw bytes. Indexing costs O(len), paid once.
    ///
    /// Fails with `InvalidDictionary` when `raw` is empty. Oversized
    /// dictionaries are accepted; candidates whose offset would overflow the
    /// representable window are skipped at search time instead.
    pub fn new(raw: &[u8]) -> Result<Self, KempaError> {
        if raw.is_empty() {
            return Err(KempaError::InvalidDictionary(
                "dictionary must contain at least one byte".to_string(),
            ));
        }
        let bytes = raw.to_vec();
        let mut index = HashIndex::for_len(bytes.len());
        for pos in 0..bytes.len() {
            index.insert(&bytes, pos);
        }
        Ok(Dictionary { bytes, index })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn index(&self) -> &HashIndex {
        &self.index
    }
}

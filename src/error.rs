// In: src/error.rs

//! This module defines the single, unified error type for the entire kempa library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KempaError {
    // =========================================================================
    // === Construction-Time Errors
    // =========================================================================
    /// The caller supplied unusable dictionary bytes. Non-recoverable; the
    /// caller must fix its input.
    #[error("invalid dictionary: {0}")]
    InvalidDictionary(String),

    // =========================================================================
    // === Decode-Time Errors
    // =========================================================================
    /// A structural violation in a compressed stream: truncated data, a
    /// malformed tag, an out-of-range offset or length, or bad container
    /// framing. Terminal for the call that raised it.
    #[error("corrupt stream: {0}")]
    CorruptStream(String),

    /// The stream parsed cleanly but its payload disagrees with the recorded
    /// checksum. Reported distinctly from `CorruptStream` so callers can tell
    /// framing damage from payload damage.
    #[error("checksum mismatch: stream records {expected:#010x}, payload hashes to {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    // =========================================================================
    // === Low-Level Kernel Errors
    // =========================================================================
    #[error("LEB128 decoding error: {0}")]
    VarintDecodeError(String),

    // =========================================================================
    // === External Error Wrappers
    // =========================================================================
    /// An error from the underlying I/O subsystem, raised only at the CLI
    /// boundary (dictionary file reads, stdin/stdout).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

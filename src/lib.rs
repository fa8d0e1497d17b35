//! This file is the root of the `kempa` Rust crate.
//!
//! kempa is a lossless LZ-family byte-stream compressor with three effort
//! tiers (fast, balanced, maximum) and optional preset-dictionary support.
//! The library surface is three calls: [`compress`], [`decompress`], and
//! [`Dictionary::new`]; everything else is the machinery behind them.
//!
//! Calls are synchronous and buffer-in/buffer-out. Each call owns its own
//! search state, so any number of calls may run concurrently as long as each
//! supplies its own buffers; a [`Dictionary`] is the only shared resource
//! and is immutable after construction.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod block;
pub mod config;
pub mod dict;
pub mod error;
pub mod frame;
pub mod kernels;

//==================================================================================
// 2. Public API
//==================================================================================
pub use config::EffortProfile;
pub use dict::Dictionary;
pub use error::KempaError;
pub use frame::{compress, decompress};

// In: src/config.rs

//! The single source of truth for all kempa compression configuration.
//!
//! This module defines the `EffortProfile` enum, which is created once at the
//! application boundary (e.g., from CLI flags) and passed down into the
//! encoder by value. The profile resolves into a small `SearchParams` struct
//! so the three tiers stay one algorithm with different knobs rather than
//! three divergent implementations.

use serde::{Deserialize, Serialize};

//==================================================================================
// I. Core Configuration Enums & Structs
//==================================================================================

/// Defines the trade-off between compression speed and final output size.
///
/// This enum is the primary input to the match finder. It allows the user to
/// guide the search effort toward their desired outcome without needing to
/// know the specifics of the underlying hash-chain machinery.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EffortProfile {
    /// Prioritizes speed over size. Probes a single candidate per position
    /// and strides over incompressible regions.
    Fast,

    /// A balance between speed and size. This is the recommended default.
    #[default]
    Balanced,

    /// Prioritizes the smallest possible output at the cost of CPU time.
    /// Walks long hash chains and defers a found match by one position when
    /// the next position yields a strictly longer one.
    MaxCompression,
}

/// Resolved search-effort knobs for one encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Maximum number of hash-chain candidates examined per position, across
    /// the block-local chain and the dictionary chain combined.
    pub chain_limit: usize,

    /// Enables lazy matching: a found match is held back one position and
    /// dropped in favor of a strictly longer match starting one byte later.
    pub lazy: bool,

    /// Widens the probe stride after repeated misses so runs of
    /// incompressible data are crossed quickly.
    pub skip_acceleration: bool,
}

impl EffortProfile {
    /// Resolves the tier into concrete search parameters.
    pub fn search_params(self) -> SearchParams {
        match self {
            EffortProfile::Fast => SearchParams {
                chain_limit: 1,
                lazy: false,
                skip_acceleration: true,
            },
            EffortProfile::Balanced => SearchParams {
                chain_limit: 16,
                lazy: false,
                skip_acceleration: false,
            },
            EffortProfile::MaxCompression => SearchParams {
                chain_limit: 64,
                lazy: true,
                skip_acceleration: false,
            },
        }
    }
}

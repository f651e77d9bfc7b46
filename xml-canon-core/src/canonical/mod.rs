//! Order-insensitive canonical text rendering.

pub mod render;
pub mod round;

use serde::{Deserialize, Serialize};

pub use render::{attribute_string, canonicalize, node_key, opening_tag, write_canonical};
pub use round::round_value;

/// Decimal places used when none is configured.
pub const DEFAULT_DECIMALS: usize = 2;

/// Settings applied uniformly to one canonicalization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanonicalOptions {
    /// Fractional digits kept when rounding numeric values.
    pub decimals: usize,
}

impl CanonicalOptions {
    pub fn with_decimals(decimals: usize) -> Self {
        Self { decimals }
    }
}

impl Default for CanonicalOptions {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
        }
    }
}

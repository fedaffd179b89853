//! Block-height clock for the fee-burn gate.

use core::fmt;

/// A block height, used only to gate fee burning by elapsed blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BlockNumber(u64);

impl BlockNumber {
    /// Creates a `BlockNumber` from a raw height.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying height.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Height advanced by `blocks`, `None` past `u64::MAX`.
    #[must_use]
    pub const fn checked_add(&self, blocks: u64) -> Option<Self> {
        match self.0.checked_add(blocks) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {}", self.0)
    }
}

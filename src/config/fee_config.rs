//! Configuration for the fee handler.

use crate::error::{DexError, Result};

/// Configuration for [`FeeHandler`](crate::fees::FeeHandler).
///
/// Defines the immutable parameters of fee custody: how many blocks must
/// separate two consecutive burns of the unallocated fee remainder.
///
/// # Validation
///
/// - The burn interval must be non-zero; a zero interval would allow the
///   remainder to be burned on every block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeConfig {
    burn_interval_blocks: u64,
}

impl FeeConfig {
    /// Creates a new `FeeConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidConfiguration`] if the burn interval is
    /// zero.
    pub fn new(burn_interval_blocks: u64) -> Result<Self> {
        let config = Self {
            burn_interval_blocks,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidConfiguration`] if the burn interval is
    /// zero.
    pub fn validate(&self) -> Result<()> {
        if self.burn_interval_blocks == 0 {
            return Err(DexError::InvalidConfiguration("zero burn block interval"));
        }
        Ok(())
    }

    /// Returns the minimum number of blocks between two burns.
    #[must_use]
    pub const fn burn_interval_blocks(&self) -> u64 {
        self.burn_interval_blocks
    }
}

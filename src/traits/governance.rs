//! Governance parameter source.
//!
//! [`Governance`] supplies the three parameters the engine refuses to
//! hard-code: the network fee level, the reward/rebate split of that
//! fee, and the current epoch for fee bucketing.
//!
//! # Failure Semantics
//!
//! Every method is fallible.  When the governance source cannot answer,
//! implementations return [`DexError::GovernanceUnavailable`] and the
//! caller aborts the operation — there is no cached fallback and no
//! retry at this layer.
//!
//! # Split Invariant
//!
//! The reward and rebate fractions returned by
//! [`Governance::reward_rebate_split`] must satisfy
//!
//! ```text
//! reward_bps + rebate_bps <= 10_000
//! ```
//!
//! with the remainder of the fee pool becoming burnable.

use crate::domain::{BasisPoints, Epoch};
use crate::error::DexError;

/// Reward/rebate fractions of the network fee pool, in basis points.
///
/// Named fields rather than a tuple so the two same-typed values cannot
/// be swapped silently at a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardRebateSplit {
    /// Fraction of collected network fees paid to epoch reward claims.
    pub reward_bps: BasisPoints,
    /// Fraction of collected network fees rebated to reserves.
    pub rebate_bps: BasisPoints,
}

impl RewardRebateSplit {
    /// Creates a split from reward and rebate fractions.
    #[must_use]
    pub const fn new(reward_bps: BasisPoints, rebate_bps: BasisPoints) -> Self {
        Self {
            reward_bps,
            rebate_bps,
        }
    }

    /// Returns `true` if the two fractions exceed the whole.
    ///
    /// The sum is taken in `u64` so fractions near `u32::MAX` cannot
    /// wrap past the comparison.
    #[must_use]
    pub const fn is_overcommitted(&self) -> bool {
        self.reward_bps.get() as u64 + self.rebate_bps.get() as u64
            > BasisPoints::MAX_PERCENT.get() as u64
    }
}

/// Trait for the authority deciding fee levels and epoch time.
///
/// # Errors
///
/// All methods return [`Result<T, DexError>`] and fail with
/// [`DexError::GovernanceUnavailable`] when the underlying source cannot
/// be consulted.
pub trait Governance {
    /// Returns the network fee charged per fee-accounted leg.
    ///
    /// # Errors
    ///
    /// [`DexError::GovernanceUnavailable`] if the fee level cannot be read.
    fn network_fee_bps(&self) -> Result<BasisPoints, DexError>;

    /// Returns the reward/rebate split of the network fee pool.
    ///
    /// # Errors
    ///
    /// [`DexError::GovernanceUnavailable`] if the split cannot be read.
    fn reward_rebate_split(&self) -> Result<RewardRebateSplit, DexError>;

    /// Returns the epoch fees accrue into right now.
    ///
    /// # Errors
    ///
    /// [`DexError::GovernanceUnavailable`] if epoch time cannot be read.
    fn current_epoch(&self) -> Result<Epoch, DexError>;
}

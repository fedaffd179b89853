//! Per-token transfer fee policy.
//!
//! Some tokens skim a fee on every transfer.  The policy captures the
//! fee level, the account collecting the skim, and the set of senders
//! the token exempts.  The fee applies when the *sender* is not exempt;
//! the recipient plays no part in the decision.

use std::collections::BTreeSet;

use crate::domain::{AccountId, Amount, BasisPoints, Rounding};
use crate::error::{DexError, Result};

/// Transfer fee rule attached to a registered token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferFeePolicy {
    fee_bps: BasisPoints,
    collector: AccountId,
    exempt: BTreeSet<AccountId>,
}

impl TransferFeePolicy {
    /// Policy for tokens that transfer in full.
    #[must_use]
    pub fn none() -> Self {
        Self {
            fee_bps: BasisPoints::ZERO,
            collector: AccountId::zero(),
            exempt: BTreeSet::new(),
        }
    }

    /// Creates a fee-charging policy.
    ///
    /// # Errors
    ///
    /// - [`DexError::InvalidFee`] if `fee_bps` is not below 100%.
    /// - [`DexError::InvalidConfiguration`] if a nonzero fee has no
    ///   collector account.
    pub fn new(fee_bps: BasisPoints, collector: AccountId) -> Result<Self> {
        if !fee_bps.is_valid_percent() || fee_bps == BasisPoints::MAX_PERCENT {
            return Err(DexError::InvalidFee("transfer fee must be below 100%"));
        }
        if !fee_bps.is_zero() && collector.is_zero() {
            return Err(DexError::InvalidConfiguration(
                "transfer fee without collector account",
            ));
        }
        Ok(Self {
            fee_bps,
            collector,
            exempt: BTreeSet::new(),
        })
    }

    /// Adds a sender the token does not charge.
    #[must_use]
    pub fn exempt(mut self, account: AccountId) -> Self {
        self.exempt.insert(account);
        self
    }

    /// Returns the fee level in basis points.
    #[must_use]
    pub const fn fee_bps(&self) -> BasisPoints {
        self.fee_bps
    }

    /// Returns the account receiving skimmed fees.
    #[must_use]
    pub const fn collector(&self) -> AccountId {
        self.collector
    }

    /// Returns `true` if `sender` transfers without fee.
    #[must_use]
    pub fn is_exempt(&self, sender: &AccountId) -> bool {
        self.exempt.contains(sender)
    }

    /// Fee skimmed when `sender` transfers `amount`, rounded down.
    ///
    /// # Errors
    ///
    /// [`DexError::Overflow`] if the fee product overflows.
    pub fn fee_on(&self, amount: Amount, sender: &AccountId) -> Result<Amount> {
        if self.fee_bps.is_zero() || self.is_exempt(sender) {
            return Ok(Amount::ZERO);
        }
        self.fee_bps.apply(amount, Rounding::Down)
    }
}

impl Default for TransferFeePolicy {
    fn default() -> Self {
        Self::none()
    }
}

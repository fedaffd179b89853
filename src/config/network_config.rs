//! Configuration for the trade orchestrator.

use crate::domain::AccountId;
use crate::error::{DexError, Result};

/// Configuration for [`TradeOrchestrator`](crate::settlement::TradeOrchestrator).
///
/// Names the two ledger accounts the orchestrator operates:
///
/// - the *settlement account*, which holds funds in flight during a trade
///   and absorbs transfer-fee skims on intermediate hops, and
/// - the *fee account*, where network and platform fees accumulate until
///   the fee handler distributes them.
///
/// # Validation
///
/// - Neither account may be the zero account.
/// - The two accounts must differ; fee accrual is verified by balance
///   delta on the fee account, which a shared account would distort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    settlement_account: AccountId,
    fee_account: AccountId,
}

impl NetworkConfig {
    /// Creates a new `NetworkConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidConfiguration`] if either account is the
    /// zero account or the two accounts coincide.
    pub fn new(settlement_account: AccountId, fee_account: AccountId) -> Result<Self> {
        let config = Self {
            settlement_account,
            fee_account,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidConfiguration`] if either account is the
    /// zero account or the two accounts coincide.
    pub fn validate(&self) -> Result<()> {
        if self.settlement_account.is_zero() {
            return Err(DexError::InvalidConfiguration("zero settlement account"));
        }
        if self.fee_account.is_zero() {
            return Err(DexError::InvalidConfiguration("zero fee account"));
        }
        if self.settlement_account == self.fee_account {
            return Err(DexError::InvalidConfiguration(
                "settlement and fee accounts must differ",
            ));
        }
        Ok(())
    }

    /// Returns the account holding funds in flight during settlement.
    #[must_use]
    pub const fn settlement_account(&self) -> AccountId {
        self.settlement_account
    }

    /// Returns the account where collected fees accumulate.
    #[must_use]
    pub const fn fee_account(&self) -> AccountId {
        self.fee_account
    }
}

//! Token balance book with transfer-fee accounting and checkpoints.
//!
//! The [`Ledger`] owns every balance the engine settles against: trader
//! accounts, reserve inventories, the settlement account, and the fee
//! handler account all live in one book.  This is what makes
//! delta-based verification possible — settlement measures what a
//! transfer actually credited instead of trusting the nominal amount.
//!
//! # Conservation Invariant
//!
//! For any token, [`Ledger::transfer`] conserves total supply:
//!
//! ```text
//! debit(sender) = credit(recipient) + credit(fee collector)
//! ```
//!
//! Fees are never minted or destroyed here, only redirected.
//!
//! # Checkpoints
//!
//! [`Ledger::checkpoint`] snapshots all balances; [`Ledger::rollback`]
//! restores the latest snapshot and [`Ledger::commit`] discards it.
//! Checkpoints nest.  Token registrations are deliberately outside the
//! snapshot — registration is configuration, not trade state.

use std::collections::BTreeMap;

use tracing::trace;

use crate::domain::{AccountId, Amount, Token, TokenAddress};
use crate::error::{DexError, Result};

use super::TransferFeePolicy;

#[derive(Debug, Clone)]
struct TokenEntry {
    token: Token,
    policy: TransferFeePolicy,
}

/// In-memory balance book for all engine accounts.
#[derive(Debug, Default)]
pub struct Ledger {
    tokens: BTreeMap<TokenAddress, TokenEntry>,
    balances: BTreeMap<(TokenAddress, AccountId), Amount>,
    snapshots: Vec<BTreeMap<(TokenAddress, AccountId), Amount>>,
}

impl Ledger {
    /// Creates an empty ledger with the reference asset pre-registered.
    #[must_use]
    pub fn new() -> Self {
        let mut tokens = BTreeMap::new();
        let reference = Token::reference();
        tokens.insert(
            reference.address(),
            TokenEntry {
                token: reference,
                policy: TransferFeePolicy::none(),
            },
        );
        Self {
            tokens,
            balances: BTreeMap::new(),
            snapshots: Vec::new(),
        }
    }

    /// Registers a token and its transfer fee policy.
    ///
    /// # Errors
    ///
    /// [`DexError::InvalidToken`] if the address is already registered,
    /// including the pre-registered reference asset.
    pub fn register_token(&mut self, token: Token, policy: TransferFeePolicy) -> Result<()> {
        if self.tokens.contains_key(&token.address()) {
            return Err(DexError::InvalidToken("token already registered"));
        }
        self.tokens.insert(token.address(), TokenEntry { token, policy });
        Ok(())
    }

    /// Returns the registered token for an address, if any.
    #[must_use]
    pub fn registered(&self, address: TokenAddress) -> Option<Token> {
        self.tokens.get(&address).map(|entry| entry.token)
    }

    /// Returns the transfer fee policy for a registered token.
    #[must_use]
    pub fn transfer_fee(&self, address: TokenAddress) -> Option<&TransferFeePolicy> {
        self.tokens.get(&address).map(|entry| &entry.policy)
    }

    /// Returns an account's balance, zero if no entry exists.
    #[must_use]
    pub fn balance_of(&self, token: TokenAddress, account: AccountId) -> Amount {
        self.balances
            .get(&(token, account))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Credits `amount` to an account from outside the book.
    ///
    /// Deposits model funds arriving from beyond the engine's view and
    /// do not charge transfer fees.
    ///
    /// # Errors
    ///
    /// - [`DexError::InvalidToken`] if the token is not registered.
    /// - [`DexError::Overflow`] if the balance would overflow.
    pub fn deposit(&mut self, token: TokenAddress, account: AccountId, amount: Amount) -> Result<()> {
        self.require_registered(token)?;
        self.credit(token, account, amount)
    }

    /// Debits `amount` from an account, leaving the book.
    ///
    /// # Errors
    ///
    /// - [`DexError::InvalidToken`] if the token is not registered.
    /// - [`DexError::InsufficientBalance`] if the balance cannot cover it.
    pub fn withdraw(&mut self, token: TokenAddress, account: AccountId, amount: Amount) -> Result<()> {
        self.require_registered(token)?;
        self.debit(token, account, amount)
    }

    /// Moves `amount` between accounts, applying the token's transfer fee.
    ///
    /// The sender is debited the full `amount`; the recipient receives
    /// `amount` minus the skim, which goes to the policy's collector.
    /// Returns the amount actually credited to `to`.
    ///
    /// # Errors
    ///
    /// - [`DexError::InvalidQuantity`] if `amount` is zero.
    /// - [`DexError::InvalidInput`] if `from` and `to` are the same account.
    /// - [`DexError::InvalidToken`] if the token is not registered.
    /// - [`DexError::InsufficientBalance`] if `from` cannot cover `amount`.
    /// - [`DexError::Overflow`] on balance or fee arithmetic overflow.
    pub fn transfer(
        &mut self,
        token: TokenAddress,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<Amount> {
        if amount.is_zero() {
            return Err(DexError::InvalidQuantity("zero transfer amount"));
        }
        if from == to {
            return Err(DexError::InvalidInput("self transfer"));
        }
        let entry = self
            .tokens
            .get(&token)
            .ok_or(DexError::InvalidToken("token not registered"))?;
        let fee = entry.policy.fee_on(amount, &from)?;
        let collector = entry.policy.collector();
        let credited = amount
            .checked_sub(&fee)
            .ok_or(DexError::Underflow("transfer fee exceeds amount"))?;

        self.debit(token, from, amount)?;
        self.credit(token, to, credited)?;
        if !fee.is_zero() {
            trace!(token = %token, fee = %fee, "transfer fee skimmed");
            self.credit(token, collector, fee)?;
        }
        Ok(credited)
    }

    /// Snapshots all balances for a later [`Ledger::rollback`].
    pub fn checkpoint(&mut self) {
        self.snapshots.push(self.balances.clone());
    }

    /// Discards the latest snapshot, keeping current balances.
    ///
    /// # Errors
    ///
    /// [`DexError::InvalidInput`] if no checkpoint is active.
    pub fn commit(&mut self) -> Result<()> {
        self.snapshots
            .pop()
            .map(|_| ())
            .ok_or(DexError::InvalidInput("no active checkpoint"))
    }

    /// Restores balances to the latest snapshot.
    ///
    /// # Errors
    ///
    /// [`DexError::InvalidInput`] if no checkpoint is active.
    pub fn rollback(&mut self) -> Result<()> {
        match self.snapshots.pop() {
            Some(snapshot) => {
                self.balances = snapshot;
                Ok(())
            }
            None => Err(DexError::InvalidInput("no active checkpoint")),
        }
    }

    fn require_registered(&self, token: TokenAddress) -> Result<()> {
        if self.tokens.contains_key(&token) {
            Ok(())
        } else {
            Err(DexError::InvalidToken("token not registered"))
        }
    }

    fn credit(&mut self, token: TokenAddress, account: AccountId, amount: Amount) -> Result<()> {
        let slot = self.balances.entry((token, account)).or_insert(Amount::ZERO);
        *slot = slot
            .checked_add(&amount)
            .ok_or(DexError::Overflow("balance credit"))?;
        Ok(())
    }

    fn debit(&mut self, token: TokenAddress, account: AccountId, amount: Amount) -> Result<()> {
        let slot = self.balances.entry((token, account)).or_insert(Amount::ZERO);
        *slot = slot
            .checked_sub(&amount)
            .ok_or(DexError::InsufficientBalance(
                "account balance below debit amount",
            ))?;
        Ok(())
    }
}

//! Custody and distribution of collected fees.
//!
//! [`FeeHandler`] owns one reference-asset ledger account into which the
//! orchestrator moves every fee it collects. Each accrual splits the
//! network fee by the governance split read once at construction:
//!
//! ```text
//! reward      = ⌊network_fee · reward_bps / 10_000⌋     (bucketed by epoch)
//! rebate_pool = ⌊network_fee · rebate_bps / 10_000⌋     (split across wallets)
//! burnable    = network_fee - reward - allocated rebates
//! ```
//!
//! Rounding dust from the floor divisions is never allocated to a payout
//! bucket; it stays in the account as burnable remainder. The same holds
//! for rebate shares of legs that reported no rebate wallet.
//!
//! # Solvency Invariant
//!
//! At all times the handler's ledger balance covers everything promised:
//!
//! ```text
//! balance(fee account) >= total_payout_balance
//! ```
//!
//! [`FeeHandler::handle_fees`] refuses to allocate when the caller has
//! not funded the account first, and [`FeeHandler::burn`] only ever
//! removes the excess above `total_payout_balance`.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::config::FeeConfig;
use crate::domain::{
    AccountId, Amount, BasisPoints, BlockNumber, Epoch, Rounding, TokenAddress,
};
use crate::error::{DexError, Result};
use crate::ledger::Ledger;
use crate::math::CheckedArithmetic;
use crate::traits::Governance;

/// Custodian of collected fees in a dedicated ledger account.
///
/// The handler never touches any token but the reference asset; by the
/// time fees reach it they have already been expressed in reference
/// units by the matching engine.
#[derive(Debug)]
pub struct FeeHandler {
    account: AccountId,
    config: FeeConfig,
    reward_bps: BasisPoints,
    rebate_bps: BasisPoints,
    rewards_per_epoch: BTreeMap<Epoch, Amount>,
    rewards_paid_per_epoch: BTreeMap<Epoch, Amount>,
    claimed_rewards: BTreeSet<(Epoch, AccountId)>,
    rebates_per_wallet: BTreeMap<AccountId, Amount>,
    platform_fees_per_wallet: BTreeMap<AccountId, Amount>,
    total_payout_balance: Amount,
    last_burn_block: Option<BlockNumber>,
}

impl FeeHandler {
    /// Creates a fee handler over `account`, reading the reward/rebate
    /// split from `governance` exactly once.
    ///
    /// Trades settled after a governance split change keep distributing
    /// by the split captured here; replacing the handler is the upgrade
    /// path.
    ///
    /// # Errors
    ///
    /// - [`DexError::InvalidConfiguration`] if `account` is the zero
    ///   account or the split promises more than 100% of the pool.
    /// - [`DexError::GovernanceUnavailable`] if the split cannot be read.
    pub fn new<G: Governance>(
        governance: &G,
        config: FeeConfig,
        account: AccountId,
    ) -> Result<Self> {
        if account.is_zero() {
            return Err(DexError::InvalidConfiguration("zero fee handler account"));
        }
        let split = governance.reward_rebate_split()?;
        if split.is_overcommitted() {
            return Err(DexError::InvalidConfiguration(
                "reward and rebate split exceeds 100%",
            ));
        }
        Ok(Self {
            account,
            config,
            reward_bps: split.reward_bps,
            rebate_bps: split.rebate_bps,
            rewards_per_epoch: BTreeMap::new(),
            rewards_paid_per_epoch: BTreeMap::new(),
            claimed_rewards: BTreeSet::new(),
            rebates_per_wallet: BTreeMap::new(),
            platform_fees_per_wallet: BTreeMap::new(),
            total_payout_balance: Amount::ZERO,
            last_burn_block: None,
        })
    }

    /// Splits one settlement's fees into payout buckets.
    ///
    /// The caller must have transferred `network_fee + platform_fee` of
    /// the reference asset into the handler's account before calling;
    /// the handler verifies funding against its solvency invariant
    /// rather than trusting the amounts.
    ///
    /// `rebate_recipients` carries the rebate wallets of the trade's
    /// rebate-entitled legs with each wallet's share of the rebate pool.
    /// Shares must sum to at most 100%; any unallocated share stays
    /// burnable.
    ///
    /// # Errors
    ///
    /// - [`DexError::InvalidInput`] on a zero wallet or shares above 100%.
    /// - [`DexError::AccountingMismatch`] if the account has not been
    ///   funded with the full fee amount.
    /// - [`DexError::Overflow`] on bucket or payout arithmetic overflow.
    pub fn handle_fees(
        &mut self,
        ledger: &mut Ledger,
        epoch: Epoch,
        network_fee: Amount,
        platform_fee: Amount,
        platform_wallet: Option<AccountId>,
        rebate_recipients: &[(AccountId, BasisPoints)],
    ) -> Result<()> {
        if network_fee.is_zero() && platform_fee.is_zero() {
            return Ok(());
        }

        let mut share_sum = BasisPoints::ZERO;
        for (wallet, share) in rebate_recipients {
            if wallet.is_zero() {
                return Err(DexError::InvalidInput("zero rebate wallet"));
            }
            share_sum = share_sum
                .checked_add(share)
                .ok_or(DexError::Overflow("rebate share sum"))?;
        }
        if !share_sum.is_valid_percent() {
            return Err(DexError::InvalidInput("rebate shares exceed 100%"));
        }
        if let Some(wallet) = platform_wallet {
            if wallet.is_zero() && !platform_fee.is_zero() {
                return Err(DexError::InvalidInput("zero platform wallet"));
            }
        }

        let incoming = network_fee.safe_add(&platform_fee)?;
        let required = self.total_payout_balance.safe_add(&incoming)?;
        if ledger.balance_of(TokenAddress::REFERENCE, self.account) < required {
            return Err(DexError::AccountingMismatch("fee accrual not funded"));
        }

        let reward = self.reward_bps.apply(network_fee, Rounding::Down)?;
        if !reward.is_zero() {
            let pool = self.rewards_per_epoch.entry(epoch).or_insert(Amount::ZERO);
            *pool = pool.safe_add(&reward)?;
            self.promise(reward)?;
        }

        let rebate_pool = self.rebate_bps.apply(network_fee, Rounding::Down)?;
        for (wallet, share) in rebate_recipients {
            let portion = share.apply(rebate_pool, Rounding::Down)?;
            if portion.is_zero() {
                continue;
            }
            credit_bucket(&mut self.rebates_per_wallet, *wallet, portion)?;
            self.promise(portion)?;
        }

        if let Some(wallet) = platform_wallet {
            if !platform_fee.is_zero() {
                credit_bucket(&mut self.platform_fees_per_wallet, wallet, platform_fee)?;
                self.promise(platform_fee)?;
            }
        }

        debug!(
            epoch = %epoch,
            network_fee = %network_fee,
            platform_fee = %platform_fee,
            reward = %reward,
            rebate_pool = %rebate_pool,
            "fees accrued"
        );
        Ok(())
    }

    /// Pays out a platform wallet's accumulated fees in full.
    ///
    /// # Errors
    ///
    /// [`DexError::InvalidInput`] if the wallet has nothing to claim.
    pub fn claim_platform_fee(&mut self, ledger: &mut Ledger, wallet: AccountId) -> Result<Amount> {
        let amount = self
            .platform_fees_per_wallet
            .get(&wallet)
            .copied()
            .unwrap_or(Amount::ZERO);
        if amount.is_zero() {
            return Err(DexError::InvalidInput("no platform fee to claim"));
        }
        ledger.transfer(TokenAddress::REFERENCE, self.account, wallet, amount)?;
        self.platform_fees_per_wallet.remove(&wallet);
        self.release(amount)?;
        debug!(wallet = %wallet, amount = %amount, "platform fee claimed");
        Ok(amount)
    }

    /// Pays out a rebate wallet's accumulated rebates in full.
    ///
    /// # Errors
    ///
    /// [`DexError::InvalidInput`] if the wallet has nothing to claim.
    pub fn claim_rebate(&mut self, ledger: &mut Ledger, wallet: AccountId) -> Result<Amount> {
        let amount = self
            .rebates_per_wallet
            .get(&wallet)
            .copied()
            .unwrap_or(Amount::ZERO);
        if amount.is_zero() {
            return Err(DexError::InvalidInput("no rebate to claim"));
        }
        ledger.transfer(TokenAddress::REFERENCE, self.account, wallet, amount)?;
        self.rebates_per_wallet.remove(&wallet);
        self.release(amount)?;
        debug!(wallet = %wallet, amount = %amount, "rebate claimed");
        Ok(amount)
    }

    /// Pays `staker` its share of one epoch's reward pool.
    ///
    /// The share is decided by the staking layer, not recomputed here;
    /// the handler enforces only that each staker claims an epoch once
    /// and that claims never exceed the pool.
    ///
    /// # Errors
    ///
    /// - [`DexError::InvalidInput`] if the share exceeds 100% or the
    ///   staker already claimed this epoch.
    /// - [`DexError::AccountingMismatch`] if the claim would overdraw
    ///   the epoch's pool.
    pub fn claim_reward(
        &mut self,
        ledger: &mut Ledger,
        epoch: Epoch,
        staker: AccountId,
        share: BasisPoints,
    ) -> Result<Amount> {
        if !share.is_valid_percent() {
            return Err(DexError::InvalidInput("reward share above 100%"));
        }
        if self.claimed_rewards.contains(&(epoch, staker)) {
            return Err(DexError::InvalidInput("reward already claimed for epoch"));
        }
        let pool = self
            .rewards_per_epoch
            .get(&epoch)
            .copied()
            .unwrap_or(Amount::ZERO);
        let amount = share.apply(pool, Rounding::Down)?;
        let paid = self
            .rewards_paid_per_epoch
            .get(&epoch)
            .copied()
            .unwrap_or(Amount::ZERO);
        let new_paid = paid.safe_add(&amount)?;
        if new_paid > pool {
            return Err(DexError::AccountingMismatch("epoch reward pool exhausted"));
        }
        if amount.is_zero() {
            self.claimed_rewards.insert((epoch, staker));
            return Ok(Amount::ZERO);
        }
        ledger.transfer(TokenAddress::REFERENCE, self.account, staker, amount)?;
        self.claimed_rewards.insert((epoch, staker));
        self.rewards_paid_per_epoch.insert(epoch, new_paid);
        self.release(amount)?;
        debug!(epoch = %epoch, staker = %staker, amount = %amount, "reward claimed");
        Ok(amount)
    }

    /// Burns everything in the account above the promised payouts.
    ///
    /// Burning removes the amount from the ledger entirely. Consecutive
    /// burns must be at least the configured interval apart; the first
    /// burn is always allowed.
    ///
    /// # Errors
    ///
    /// - [`DexError::BurnIntervalNotElapsed`] if called too soon after
    ///   the previous burn.
    /// - [`DexError::InvalidQuantity`] if nothing is burnable.
    /// - [`DexError::AccountingMismatch`] if promised payouts exceed the
    ///   held balance.
    pub fn burn(&mut self, ledger: &mut Ledger, current_block: BlockNumber) -> Result<Amount> {
        if let Some(last) = self.last_burn_block {
            let Some(next_allowed) = last.checked_add(self.config.burn_interval_blocks()) else {
                return Err(DexError::BurnIntervalNotElapsed);
            };
            if current_block < next_allowed {
                return Err(DexError::BurnIntervalNotElapsed);
            }
        }
        let balance = ledger.balance_of(TokenAddress::REFERENCE, self.account);
        let burnable = balance
            .checked_sub(&self.total_payout_balance)
            .ok_or(DexError::AccountingMismatch(
                "promised payouts exceed held balance",
            ))?;
        if burnable.is_zero() {
            return Err(DexError::InvalidQuantity("nothing to burn"));
        }
        ledger.withdraw(TokenAddress::REFERENCE, self.account, burnable)?;
        self.last_burn_block = Some(current_block);
        debug!(block = %current_block, burned = %burnable, "unallocated fees burned");
        Ok(burnable)
    }

    /// Returns the ledger account fees accumulate in.
    #[must_use]
    pub const fn account(&self) -> AccountId {
        self.account
    }

    /// Returns the reward fraction captured at construction.
    #[must_use]
    pub const fn reward_bps(&self) -> BasisPoints {
        self.reward_bps
    }

    /// Returns the rebate fraction captured at construction.
    #[must_use]
    pub const fn rebate_bps(&self) -> BasisPoints {
        self.rebate_bps
    }

    /// Returns the total the handler still owes across all buckets.
    #[must_use]
    pub const fn total_payout_balance(&self) -> Amount {
        self.total_payout_balance
    }

    /// Returns the block of the most recent burn, if any.
    #[must_use]
    pub const fn last_burn_block(&self) -> Option<BlockNumber> {
        self.last_burn_block
    }

    /// Returns the unclaimed reward pool accrued for an epoch.
    #[must_use]
    pub fn reward_pool(&self, epoch: Epoch) -> Amount {
        let accrued = self
            .rewards_per_epoch
            .get(&epoch)
            .copied()
            .unwrap_or(Amount::ZERO);
        let paid = self
            .rewards_paid_per_epoch
            .get(&epoch)
            .copied()
            .unwrap_or(Amount::ZERO);
        accrued.checked_sub(&paid).unwrap_or(Amount::ZERO)
    }

    /// Returns a wallet's unclaimed rebate balance.
    #[must_use]
    pub fn rebate_balance(&self, wallet: AccountId) -> Amount {
        self.rebates_per_wallet
            .get(&wallet)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Returns a wallet's unclaimed platform fee balance.
    #[must_use]
    pub fn platform_fee_balance(&self, wallet: AccountId) -> Amount {
        self.platform_fees_per_wallet
            .get(&wallet)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn promise(&mut self, amount: Amount) -> Result<()> {
        self.total_payout_balance = self.total_payout_balance.safe_add(&amount)?;
        Ok(())
    }

    fn release(&mut self, amount: Amount) -> Result<()> {
        self.total_payout_balance =
            self.total_payout_balance
                .checked_sub(&amount)
                .ok_or(DexError::AccountingMismatch(
                    "payout release exceeds promised total",
                ))?;
        Ok(())
    }
}

fn credit_bucket(
    bucket: &mut BTreeMap<AccountId, Amount>,
    wallet: AccountId,
    amount: Amount,
) -> Result<()> {
    let slot = bucket.entry(wallet).or_insert(Amount::ZERO);
    *slot = slot.safe_add(&amount)?;
    Ok(())
}

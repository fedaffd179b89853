//! Shared fixtures for in-crate tests.
//!
//! Deterministic implementations of the engine's trait seams: a reserve
//! quoting from a fixed rate table, a registry backed by static maps,
//! and a governance source with interior-mutable epoch and availability
//! so tests can advance time and simulate outages.

use std::cell::Cell;
use std::collections::BTreeMap;

use crate::domain::{
    AccountId, Amount, BasisPoints, Decimals, Epoch, Rate, ReserveFlags, ReserveId, Token,
    TokenAddress,
};
use crate::error::{DexError, Result};
use crate::ledger::Ledger;
use crate::math::calc_dest_amount;
use crate::traits::{Governance, Reserve, ReserveRegistry, RewardRebateSplit};

pub(crate) fn account(tag: u8) -> AccountId {
    AccountId::from_bytes([tag; 32])
}

pub(crate) fn token(tag: u8, decimals: u8) -> Token {
    let Ok(d) = Decimals::new(decimals) else {
        panic!("invalid decimals in fixture: {decimals}");
    };
    Token::new(TokenAddress::from_bytes([tag; 32]), d)
}

pub(crate) fn native() -> Token {
    Token::reference()
}

/// Reserve quoting from a fixed `(src, dest) -> rate` table.
///
/// [`Reserve::trade`] converts at the committed rate unless a delivery
/// rate override is set, which lets tests exercise reserves that pay
/// less than they quoted.
pub(crate) struct FixedRateReserve {
    address: AccountId,
    rates: BTreeMap<(TokenAddress, TokenAddress), Rate>,
    delivery_rate: Option<Rate>,
}

impl FixedRateReserve {
    pub(crate) fn new(address: AccountId) -> Self {
        Self {
            address,
            rates: BTreeMap::new(),
            delivery_rate: None,
        }
    }

    pub(crate) fn with_rate(mut self, src: &Token, dest: &Token, rate: Rate) -> Self {
        self.rates.insert((src.address(), dest.address()), rate);
        self
    }

    /// Makes `trade` settle at `rate` regardless of the committed rate.
    pub(crate) fn delivering_at(mut self, rate: Rate) -> Self {
        self.delivery_rate = Some(rate);
        self
    }
}

impl Reserve for FixedRateReserve {
    fn address(&self) -> AccountId {
        self.address
    }

    fn conversion_rate(&self, src: &Token, dest: &Token, _src_qty: Amount) -> Option<Rate> {
        self.rates.get(&(src.address(), dest.address())).copied()
    }

    fn trade(
        &mut self,
        ledger: &mut Ledger,
        src: &Token,
        src_amount: Amount,
        dest: &Token,
        rate: Rate,
        dest_account: AccountId,
    ) -> Result<Amount> {
        let effective = self.delivery_rate.unwrap_or(rate);
        let dest_amount =
            calc_dest_amount(src_amount, src.decimals(), dest.decimals(), effective)?;
        let _credited = ledger.transfer(dest.address(), self.address, dest_account, dest_amount)?;
        Ok(dest_amount)
    }
}

/// Registry backed by static listing, flag, and rebate wallet maps.
#[derive(Default)]
pub(crate) struct StaticRegistry {
    listings: BTreeMap<(TokenAddress, TokenAddress), Vec<ReserveId>>,
    flags: BTreeMap<ReserveId, ReserveFlags>,
    rebate_wallets: BTreeMap<ReserveId, AccountId>,
}

impl StaticRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn list(mut self, src: &Token, dest: &Token, id: ReserveId) -> Self {
        self.listings
            .entry((src.address(), dest.address()))
            .or_default()
            .push(id);
        self
    }

    pub(crate) fn with_flags(mut self, id: ReserveId, flags: ReserveFlags) -> Self {
        self.flags.insert(id, flags);
        self
    }

    pub(crate) fn with_rebate_wallet(mut self, id: ReserveId, wallet: AccountId) -> Self {
        self.rebate_wallets.insert(id, wallet);
        self
    }
}

impl ReserveRegistry for StaticRegistry {
    fn reserves_for(&self, src: TokenAddress, dest: TokenAddress) -> Vec<ReserveId> {
        self.listings.get(&(src, dest)).cloned().unwrap_or_default()
    }

    fn flags(&self, reserve: ReserveId) -> Option<ReserveFlags> {
        self.flags.get(&reserve).copied()
    }

    fn rebate_wallet(&self, reserve: ReserveId) -> Option<AccountId> {
        self.rebate_wallets.get(&reserve).copied()
    }
}

/// Governance source with settable epoch and availability.
pub(crate) struct StaticGovernance {
    network_fee_bps: BasisPoints,
    split: RewardRebateSplit,
    epoch: Cell<Epoch>,
    available: Cell<bool>,
}

impl StaticGovernance {
    pub(crate) fn new(
        network_fee_bps: BasisPoints,
        reward_bps: BasisPoints,
        rebate_bps: BasisPoints,
    ) -> Self {
        Self {
            network_fee_bps,
            split: RewardRebateSplit::new(reward_bps, rebate_bps),
            epoch: Cell::new(Epoch::new(0)),
            available: Cell::new(true),
        }
    }

    pub(crate) fn set_epoch(&self, epoch: Epoch) {
        self.epoch.set(epoch);
    }

    pub(crate) fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    fn check(&self) -> Result<()> {
        if self.available.get() {
            Ok(())
        } else {
            Err(DexError::GovernanceUnavailable("governance offline"))
        }
    }
}

impl Governance for StaticGovernance {
    fn network_fee_bps(&self) -> Result<BasisPoints> {
        self.check()?;
        Ok(self.network_fee_bps)
    }

    fn reward_rebate_split(&self) -> Result<RewardRebateSplit> {
        self.check()?;
        Ok(self.split)
    }

    fn current_epoch(&self) -> Result<Epoch> {
        self.check()?;
        Ok(self.epoch.get())
    }
}

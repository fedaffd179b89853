//! Matched trade plans produced by the engine.

use crate::domain::{AccountId, Amount, BasisPoints, Rate, ReserveFlags, ReserveId, TradePair};

/// One selected reserve executing one conversion leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegPlan {
    pub(crate) reserve: ReserveId,
    pub(crate) flags: ReserveFlags,
    pub(crate) rebate_wallet: Option<AccountId>,
    pub(crate) src_amount: Amount,
    pub(crate) rate: Rate,
    pub(crate) dest_amount: Amount,
}

impl LegPlan {
    /// Returns the selected reserve's id.
    #[must_use]
    pub const fn reserve(&self) -> ReserveId {
        self.reserve
    }

    /// Returns the reserve's fee treatment flags.
    #[must_use]
    pub const fn flags(&self) -> ReserveFlags {
        self.flags
    }

    /// Returns the reserve's rebate wallet, if one is on file.
    #[must_use]
    pub const fn rebate_wallet(&self) -> Option<AccountId> {
        self.rebate_wallet
    }

    /// Returns the leg input amount, in leg source units.
    #[must_use]
    pub const fn src_amount(&self) -> Amount {
        self.src_amount
    }

    /// Returns the committed conversion rate.
    #[must_use]
    pub const fn rate(&self) -> Rate {
        self.rate
    }

    /// Returns the leg output amount, in leg destination units.
    #[must_use]
    pub const fn dest_amount(&self) -> Amount {
        self.dest_amount
    }
}

/// A fully priced trade plan: selected legs, fees, and net amounts.
///
/// Produced by matching and consumed by settlement.  Amount fields obey
///
/// ```text
/// trade_wei >= network_fee_wei + platform_fee_wei
/// ```
///
/// and the destination side of each leg is the floor conversion of its
/// source side at the committed rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub(crate) pair: TradePair,
    pub(crate) src_amount: Amount,
    pub(crate) trade_wei: Amount,
    pub(crate) network_fee_wei: Amount,
    pub(crate) platform_fee_wei: Amount,
    pub(crate) network_fee_bps: BasisPoints,
    pub(crate) platform_fee_bps: BasisPoints,
    pub(crate) fee_accounted_bps: BasisPoints,
    pub(crate) t2e: Option<LegPlan>,
    pub(crate) e2t: Option<LegPlan>,
    pub(crate) dest_amount: Amount,
    pub(crate) rate_after_fees: Rate,
}

impl MatchOutcome {
    /// Returns the traded pair.
    #[must_use]
    pub const fn pair(&self) -> TradePair {
        self.pair
    }

    /// Returns the source amount the plan actually spends.
    ///
    /// Equal to the requested quantity unless a destination cap shrank
    /// the trade.
    #[must_use]
    pub const fn src_amount(&self) -> Amount {
        self.src_amount
    }

    /// Returns the trade value in reference-asset units.
    #[must_use]
    pub const fn trade_wei(&self) -> Amount {
        self.trade_wei
    }

    /// Returns the network fee, in reference-asset units.
    #[must_use]
    pub const fn network_fee_wei(&self) -> Amount {
        self.network_fee_wei
    }

    /// Returns the platform fee, in reference-asset units.
    #[must_use]
    pub const fn platform_fee_wei(&self) -> Amount {
        self.platform_fee_wei
    }

    /// Returns the network fee rate per fee-accounted leg.
    #[must_use]
    pub const fn network_fee_bps(&self) -> BasisPoints {
        self.network_fee_bps
    }

    /// Returns the caller's platform fee rate.
    #[must_use]
    pub const fn platform_fee_bps(&self) -> BasisPoints {
        self.platform_fee_bps
    }

    /// Returns the accumulated fee weight: 10 000 per fee-accounted leg.
    #[must_use]
    pub const fn fee_accounted_bps(&self) -> BasisPoints {
        self.fee_accounted_bps
    }

    /// Returns the token-to-reference leg, absent when the source is the
    /// reference asset.
    #[must_use]
    pub const fn token_to_reference(&self) -> Option<&LegPlan> {
        self.t2e.as_ref()
    }

    /// Returns the reference-to-token leg, absent when the destination is
    /// the reference asset.
    #[must_use]
    pub const fn reference_to_token(&self) -> Option<&LegPlan> {
        self.e2t.as_ref()
    }

    /// Returns the destination amount delivered to the taker, net of all
    /// fees.
    #[must_use]
    pub const fn dest_amount(&self) -> Amount {
        self.dest_amount
    }

    /// Returns the effective source-to-destination rate net of all fees.
    #[must_use]
    pub const fn rate_after_fees(&self) -> Rate {
        self.rate_after_fees
    }
}

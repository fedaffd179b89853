//! Best-of-all trade matching and destination capping.
//!
//! Matching resolves a trade into at most two conversion legs through
//! the reference asset, prices the fees, and selects one reserve per
//! leg:
//!
//! 1. The source leg (token to reference) is quoted with the full
//!    source quantity; its output is the trade value `trade_wei`.
//! 2. Network and platform fees are priced against `trade_wei`.  The
//!    network fee applies once per fee-accounted leg.
//! 3. The destination leg (reference to token) is quoted per candidate
//!    with the value that candidate would actually convert: candidates
//!    paying the network fee quote on less, so a fee-exempt reserve can
//!    win with an equal or even slightly worse rate.
//!
//! # Fee Arithmetic
//!
//! With `n` fee-accounted legs selected:
//!
//! ```text
//! per_leg_fee_wei = trade_wei * network_fee_bps / 10_000     (floor)
//! network_fee_wei = n * per_leg_fee_wei
//! platform_fee_wei = trade_wei * platform_fee_bps / 10_000   (floor)
//! ```
//!
//! Requests are rejected up front unless
//! `2 * network_fee_bps + platform_fee_bps < 10_000`, so fees can never
//! consume the whole trade value even when both legs are fee-accounted.
//!
//! # Destination Caps
//!
//! [`MatchingEngine::cap_to_max_dest`] shrinks an outcome so it delivers
//! at most `max_dest`, keeping the already-selected reserves and rates.
//! The inverse runs against the same fee formula, the forward recompute
//! is clamped to `max_dest`, and reapplying the same cap is a no-op, so
//! settlement dust from ceiling rounding stays on the source side.

use tracing::debug;

use crate::domain::{
    Amount, BasisPoints, Decimals, Quote, Rate, ReserveFlags, Rounding, Token, TradePair,
};
use crate::error::{DexError, Result};
use crate::math::{calc_dest_amount, calc_rate_from_amounts, calc_src_amount, mul_div, MAX_QTY};
use crate::traits::{Governance, ReserveRegistry};

use super::outcome::{LegPlan, MatchOutcome};
use super::quoter::{better, LegQuoter};
use super::{Hint, ReserveBook};

/// Matches trades against the reserve book under governance fee rates.
///
/// The engine owns the registry and governance handles; the reserve
/// book is borrowed per call because settlement needs mutable access to
/// the same book between matches.
#[derive(Debug)]
pub struct MatchingEngine<R, G> {
    registry: R,
    governance: G,
}

impl<R: ReserveRegistry, G: Governance> MatchingEngine<R, G> {
    /// Creates an engine over a registry and governance source.
    pub const fn new(registry: R, governance: G) -> Self {
        Self {
            registry,
            governance,
        }
    }

    /// Returns the listing registry.
    #[must_use]
    pub const fn registry(&self) -> &R {
        &self.registry
    }

    /// Returns the governance handle.
    #[must_use]
    pub const fn governance(&self) -> &G {
        &self.governance
    }

    /// Prices a trade and selects one reserve per required leg.
    ///
    /// # Errors
    ///
    /// - [`DexError::InvalidQuantity`] for a zero or over-cap source
    ///   quantity, or a trade value beyond the tradable cap.
    /// - [`DexError::InvalidFee`] if combined fee rates reach 100%.
    /// - [`DexError::NoEligibleReserve`] if a required leg has no usable
    ///   quote.
    /// - [`DexError::GovernanceUnavailable`] if the network fee rate
    ///   cannot be read.
    pub fn match_trade(
        &self,
        book: &ReserveBook,
        pair: &TradePair,
        src_qty: Amount,
        platform_fee_bps: BasisPoints,
        hint: Hint,
    ) -> Result<MatchOutcome> {
        // Single strategy today; the hint stays in the signature so new
        // strategies slot in without an API break.
        match hint {
            Hint::BestOfAll => {}
        }
        if src_qty.is_zero() {
            return Err(DexError::InvalidQuantity("zero source quantity"));
        }
        if src_qty.get() > MAX_QTY {
            return Err(DexError::InvalidQuantity("source quantity above tradable cap"));
        }
        let network_fee_bps = self.governance.network_fee_bps()?;
        validate_fee_rates(network_fee_bps, platform_fee_bps)?;

        let quoter = LegQuoter::new(book, &self.registry);
        let native = Token::reference();
        let src = pair.src();
        let dest = pair.dest();

        let (t2e, trade_wei) = if src.is_reference() {
            (None, src_qty)
        } else {
            let (quote, flags) = quoter
                .best(&src, &native, src_qty)
                .ok_or(DexError::NoEligibleReserve("no quote for source leg"))?;
            let leg = self.leg_from_quote(&quote, flags);
            let wei = quote.dest_amount();
            (Some(leg), wei)
        };
        if trade_wei.get() > MAX_QTY {
            return Err(DexError::InvalidQuantity("trade value above tradable cap"));
        }

        let per_leg_fee = network_fee_bps.apply(trade_wei, Rounding::Down)?;
        let platform_fee_wei = platform_fee_bps.apply(trade_wei, Rounding::Down)?;
        let t2e_fee = leg_fee(t2e.as_ref(), per_leg_fee);
        let committed = platform_fee_wei
            .checked_add(&t2e_fee)
            .ok_or(DexError::Overflow("fee total"))?;
        let base_wei = trade_wei
            .checked_sub(&committed)
            .ok_or(DexError::Underflow("fees exceed trade value"))?;

        let (e2t, dest_amount) = if dest.is_reference() {
            (None, base_wei)
        } else {
            let mut selected: Option<(Quote, ReserveFlags)> = None;
            for (id, flags) in quoter.eligible(&native, &dest) {
                let leg_wei = if flags.fee_accounted {
                    match base_wei.checked_sub(&per_leg_fee) {
                        Some(wei) => wei,
                        None => continue,
                    }
                } else {
                    base_wei
                };
                if leg_wei.is_zero() {
                    continue;
                }
                let Some(quote) = quoter.quote_one(id, &native, &dest, leg_wei) else {
                    continue;
                };
                let replace = match &selected {
                    Some((incumbent, _)) => better(&quote, incumbent),
                    None => true,
                };
                if replace {
                    selected = Some((quote, flags));
                }
            }
            let (quote, flags) = selected
                .ok_or(DexError::NoEligibleReserve("no quote for destination leg"))?;
            let leg = self.leg_from_quote(&quote, flags);
            (Some(leg), quote.dest_amount())
        };
        let e2t_fee = leg_fee(e2t.as_ref(), per_leg_fee);

        let network_fee_wei = t2e_fee
            .checked_add(&e2t_fee)
            .ok_or(DexError::Overflow("network fee total"))?;
        let fee_accounted_bps = accounted_bps(t2e.as_ref(), e2t.as_ref());
        let rate_after_fees =
            calc_rate_from_amounts(src_qty, dest_amount, src.decimals(), dest.decimals())?;

        debug!(
            pair = %pair,
            trade_wei = %trade_wei,
            network_fee_wei = %network_fee_wei,
            platform_fee_wei = %platform_fee_wei,
            dest_amount = %dest_amount,
            "trade matched"
        );

        Ok(MatchOutcome {
            pair: *pair,
            src_amount: src_qty,
            trade_wei,
            network_fee_wei,
            platform_fee_wei,
            network_fee_bps,
            platform_fee_bps,
            fee_accounted_bps,
            t2e,
            e2t,
            dest_amount,
            rate_after_fees,
        })
    }

    /// Shrinks an outcome so it delivers at most `max_dest`.
    ///
    /// Keeps the selected reserves and committed rates.  The trade value
    /// is re-derived by inverting the fee formula, amounts are recomputed
    /// forward at the committed rates, and the destination is clamped to
    /// `max_dest` exactly, so applying the same cap twice changes
    /// nothing.  Outcomes already inside the cap are returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`DexError::InvalidQuantity`] if the cap collapses the trade to
    ///   a zero destination.
    /// - [`DexError::Overflow`] if inverse arithmetic overflows.
    pub fn cap_to_max_dest(&self, outcome: &MatchOutcome, max_dest: Amount) -> Result<MatchOutcome> {
        if outcome.dest_amount <= max_dest {
            return Ok(outcome.clone());
        }
        let pair = outcome.pair;
        let native_dec = Decimals::NATIVE;

        let fees = outcome
            .network_fee_wei
            .checked_add(&outcome.platform_fee_wei)
            .ok_or(DexError::Overflow("fee total"))?;
        let current_after_fees = outcome
            .trade_wei
            .checked_sub(&fees)
            .ok_or(DexError::Underflow("fees exceed trade value"))?;

        let wei_after_fees = match &outcome.e2t {
            Some(leg) => {
                calc_src_amount(max_dest, native_dec, pair.dest().decimals(), leg.rate)?
            }
            None => max_dest,
        };
        let wei_after_fees = wei_after_fees.min(current_after_fees);

        // wei_after_fees = trade_wei * keep / BPS^2, solved for trade_wei.
        let bps = u128::from(BasisPoints::MAX_PERCENT.get());
        let keep = (bps * bps)
            .checked_sub(
                u128::from(outcome.network_fee_bps.get())
                    * u128::from(outcome.fee_accounted_bps.get()),
            )
            .and_then(|k| k.checked_sub(u128::from(outcome.platform_fee_bps.get()) * bps))
            .ok_or(DexError::InvalidFee("combined fees reach 100%"))?;
        let trade_wei = mul_div(wei_after_fees.get(), bps * bps, keep, Rounding::Down)
            .map(Amount::new)
            .ok_or(DexError::Overflow("capped trade value"))?;
        let trade_wei = trade_wei.min(outcome.trade_wei);

        let per_leg_fee = outcome.network_fee_bps.apply(trade_wei, Rounding::Down)?;
        let platform_fee_wei = outcome.platform_fee_bps.apply(trade_wei, Rounding::Down)?;
        let t2e_fee = leg_fee(outcome.t2e.as_ref(), per_leg_fee);
        let e2t_fee = leg_fee(outcome.e2t.as_ref(), per_leg_fee);
        let network_fee_wei = t2e_fee
            .checked_add(&e2t_fee)
            .ok_or(DexError::Overflow("network fee total"))?;
        let total_fees = network_fee_wei
            .checked_add(&platform_fee_wei)
            .ok_or(DexError::Overflow("fee total"))?;
        let wei_spend = trade_wei
            .checked_sub(&total_fees)
            .ok_or(DexError::Underflow("fees exceed trade value"))?;

        let (t2e, src_amount) = match &outcome.t2e {
            Some(leg) => {
                let derived =
                    calc_src_amount(trade_wei, pair.src().decimals(), native_dec, leg.rate)?;
                let src_amount = derived.min(leg.src_amount);
                let capped = LegPlan {
                    src_amount,
                    dest_amount: trade_wei,
                    ..*leg
                };
                (Some(capped), src_amount)
            }
            None => (None, trade_wei),
        };
        let (e2t, dest_amount) = match &outcome.e2t {
            Some(leg) => {
                let forward =
                    calc_dest_amount(wei_spend, native_dec, pair.dest().decimals(), leg.rate)?;
                let dest = forward.min(max_dest);
                let capped = LegPlan {
                    src_amount: wei_spend,
                    dest_amount: dest,
                    ..*leg
                };
                (Some(capped), dest)
            }
            None => (None, wei_spend.min(max_dest)),
        };
        if dest_amount.is_zero() {
            return Err(DexError::InvalidQuantity("destination cap collapses trade"));
        }
        let rate_after_fees = calc_rate_from_amounts(
            src_amount,
            dest_amount,
            pair.src().decimals(),
            pair.dest().decimals(),
        )?;

        debug!(
            pair = %pair,
            max_dest = %max_dest,
            trade_wei = %trade_wei,
            src_amount = %src_amount,
            "destination cap applied"
        );

        Ok(MatchOutcome {
            pair,
            src_amount,
            trade_wei,
            network_fee_wei,
            platform_fee_wei,
            network_fee_bps: outcome.network_fee_bps,
            platform_fee_bps: outcome.platform_fee_bps,
            fee_accounted_bps: outcome.fee_accounted_bps,
            t2e,
            e2t,
            dest_amount,
            rate_after_fees,
        })
    }

    fn leg_from_quote(&self, quote: &Quote, flags: ReserveFlags) -> LegPlan {
        LegPlan {
            reserve: quote.reserve(),
            flags,
            rebate_wallet: self.registry.rebate_wallet(quote.reserve()),
            src_amount: quote.src_amount(),
            rate: quote.rate(),
            dest_amount: quote.dest_amount(),
        }
    }
}

fn leg_fee(leg: Option<&LegPlan>, per_leg_fee: Amount) -> Amount {
    match leg {
        Some(leg) if leg.flags.fee_accounted => per_leg_fee,
        _ => Amount::ZERO,
    }
}

fn accounted_bps(t2e: Option<&LegPlan>, e2t: Option<&LegPlan>) -> BasisPoints {
    let mut total = BasisPoints::ZERO;
    for leg in [t2e, e2t].into_iter().flatten() {
        if leg.flags.fee_accounted {
            total = total
                .checked_add(&BasisPoints::MAX_PERCENT)
                .unwrap_or(BasisPoints::MAX_PERCENT);
        }
    }
    total
}

fn validate_fee_rates(network: BasisPoints, platform: BasisPoints) -> Result<()> {
    let combined = network
        .checked_add(&network)
        .and_then(|doubled| doubled.checked_add(&platform))
        .ok_or(DexError::InvalidFee("fee rate overflow"))?;
    if combined >= BasisPoints::MAX_PERCENT {
        return Err(DexError::InvalidFee("combined fees reach 100%"));
    }
    Ok(())
}

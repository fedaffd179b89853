//! Trade settlement against the balance ledger.
//!
//! [`TradeOrchestrator`] turns a priced [`MatchOutcome`] into balance
//! movements. Pricing is advisory; settlement trusts only measured
//! balance deltas:
//!
//! 1. Validate the request, match, apply the destination cap, and check
//!    the minimum rate against the plan. All of this is read-only.
//! 2. Checkpoint the ledger.
//! 3. Pull the full offered source quantity from the trader, refund the
//!    part the plan does not spend.
//! 4. Run the source leg and verify the received trade value by the
//!    settlement account's balance delta.
//! 5. Move fees aside, run the destination leg, verify its delta.
//! 6. Deliver the planned destination amount and re-check the minimum
//!    rate against what was actually credited.
//! 7. Accrue fees into the fee handler and commit. Any error instead
//!    rolls the ledger back to the checkpoint.
//!
//! Fee accrual runs last so a failed settlement never leaves promised
//! payouts behind; the fee handler's bookkeeping is not covered by the
//! ledger checkpoint.
//!
//! # Transfer-Fee Tokens
//!
//! Reserves are always funded with the nominal leg amount. When the
//! source token skims a transfer fee on the trader's hop, the shortfall
//! comes out of the settlement account's standing buffer for that token;
//! without a sufficient buffer the trade fails cleanly and rolls back.
//! Exempting the settlement and reserve accounts from a token's fee
//! keeps the internal hops whole.

use tracing::{debug, trace};

use crate::config::NetworkConfig;
use crate::domain::{
    AccountId, Amount, BasisPoints, BlockNumber, Epoch, Rate, ReserveId, Token, TokenAddress,
    TradePair,
};
use crate::engine::{Hint, LegPlan, MatchOutcome, MatchingEngine, ReserveBook};
use crate::error::{DexError, Result};
use crate::fees::FeeHandler;
use crate::ledger::Ledger;
use crate::math::{calc_rate_from_amounts, CheckedArithmetic};
use crate::traits::{Governance, Reserve, ReserveRegistry};

/// Parameters of one trade submission.
#[derive(Debug, Clone, Copy)]
pub struct TradeRequest {
    /// Account paying the source side.
    pub trader: AccountId,
    /// Source and destination tokens.
    pub pair: TradePair,
    /// Source quantity offered, in source token units.
    pub src_qty: Amount,
    /// Account receiving the destination side.
    pub dest_account: AccountId,
    /// Ceiling on the delivered destination amount, if any.
    pub max_dest_amount: Option<Amount>,
    /// Minimum acceptable rate net of fees; zero disables both checks.
    pub min_conversion_rate: Rate,
    /// Platform fee charged on top of the network fee.
    pub platform_fee_bps: BasisPoints,
    /// Wallet credited with the platform fee.
    pub platform_wallet: Option<AccountId>,
    /// Reserve selection strategy.
    pub hint: Hint,
}

/// What a settled trade actually moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeReceipt {
    dest_delivered: Amount,
    src_spent: Amount,
    trade_wei: Amount,
    network_fee_wei: Amount,
    platform_fee_wei: Amount,
    t2e_reserve: Option<ReserveId>,
    e2t_reserve: Option<ReserveId>,
}

impl TradeReceipt {
    /// Returns the destination amount credited to the recipient.
    #[must_use]
    pub const fn dest_delivered(&self) -> Amount {
        self.dest_delivered
    }

    /// Returns the source amount the trader spent after refunds.
    #[must_use]
    pub const fn src_spent(&self) -> Amount {
        self.src_spent
    }

    /// Returns the trade value in reference-asset units.
    #[must_use]
    pub const fn trade_wei(&self) -> Amount {
        self.trade_wei
    }

    /// Returns the collected network fee.
    #[must_use]
    pub const fn network_fee_wei(&self) -> Amount {
        self.network_fee_wei
    }

    /// Returns the collected platform fee.
    #[must_use]
    pub const fn platform_fee_wei(&self) -> Amount {
        self.platform_fee_wei
    }

    /// Returns the reserve that served the source leg, if one ran.
    #[must_use]
    pub const fn t2e_reserve(&self) -> Option<ReserveId> {
        self.t2e_reserve
    }

    /// Returns the reserve that served the destination leg, if one ran.
    #[must_use]
    pub const fn e2t_reserve(&self) -> Option<ReserveId> {
        self.e2t_reserve
    }
}

/// Owns the matching engine, the live reserves, the balance ledger, and
/// the fee handler, and drives trades through all of them.
#[derive(Debug)]
pub struct TradeOrchestrator<R, G> {
    engine: MatchingEngine<R, G>,
    book: ReserveBook,
    ledger: Ledger,
    fee_handler: FeeHandler,
    config: NetworkConfig,
}

impl<R: ReserveRegistry, G: Governance> TradeOrchestrator<R, G> {
    /// Creates an orchestrator with an empty reserve book and ledger.
    ///
    /// # Errors
    ///
    /// [`DexError::InvalidConfiguration`] if the fee handler's account
    /// differs from the configured fee account.
    pub fn new(
        engine: MatchingEngine<R, G>,
        fee_handler: FeeHandler,
        config: NetworkConfig,
    ) -> Result<Self> {
        if fee_handler.account() != config.fee_account() {
            return Err(DexError::InvalidConfiguration(
                "fee handler account does not match network configuration",
            ));
        }
        Ok(Self {
            engine,
            book: ReserveBook::new(),
            ledger: Ledger::new(),
            fee_handler,
            config,
        })
    }

    /// Returns the matching engine.
    #[must_use]
    pub const fn engine(&self) -> &MatchingEngine<R, G> {
        &self.engine
    }

    /// Returns the balance ledger.
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Returns the ledger for token registration and deposits.
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    /// Returns the fee handler's read surface.
    #[must_use]
    pub const fn fee_handler(&self) -> &FeeHandler {
        &self.fee_handler
    }

    /// Returns the live reserve book.
    #[must_use]
    pub const fn book(&self) -> &ReserveBook {
        &self.book
    }

    /// Adds a live reserve under `id`.
    ///
    /// # Errors
    ///
    /// - [`DexError::UnknownReserve`] if the registry has no flags for
    ///   the id.
    /// - [`DexError::InvalidConfiguration`] if the flags claim rebates
    ///   without fee accounting.
    /// - [`DexError::InvalidInput`] if the id is already in the book.
    pub fn add_reserve(&mut self, id: ReserveId, reserve: Box<dyn Reserve>) -> Result<()> {
        let Some(flags) = self.engine.registry().flags(id) else {
            return Err(DexError::UnknownReserve("reserve has no registry flags"));
        };
        if flags.is_inconsistent() {
            return Err(DexError::InvalidConfiguration(
                "rebate entitlement requires fee accounting",
            ));
        }
        self.book.insert(id, reserve)
    }

    /// Removes and returns the reserve under `id`.
    ///
    /// # Errors
    ///
    /// [`DexError::UnknownReserve`] if the id is not in the book.
    pub fn remove_reserve(&mut self, id: ReserveId) -> Result<Box<dyn Reserve>> {
        self.book.remove(id)
    }

    /// Prices and settles one trade atomically.
    ///
    /// On success every movement is committed; on any settlement error
    /// the ledger is restored to its pre-trade state and the error is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Validation, matching, and capping errors propagate from their
    /// layers. Settlement itself adds:
    ///
    /// - [`DexError::AccountingMismatch`] when a measured balance delta
    ///   falls short of the plan.
    /// - [`DexError::RateBelowMinimum`] when the planned or delivered
    ///   rate is below the requested minimum.
    /// - [`DexError::InsufficientBalance`] when the trader or the
    ///   settlement buffer cannot cover a movement.
    pub fn trade(&mut self, request: &TradeRequest) -> Result<TradeReceipt> {
        self.validate_request(request)?;

        let outcome = self.engine.match_trade(
            &self.book,
            &request.pair,
            request.src_qty,
            request.platform_fee_bps,
            request.hint,
        )?;
        let outcome = match request.max_dest_amount {
            Some(cap) => self.engine.cap_to_max_dest(&outcome, cap)?,
            None => outcome,
        };
        if !request.min_conversion_rate.is_zero()
            && outcome.rate_after_fees() < request.min_conversion_rate
        {
            return Err(DexError::RateBelowMinimum(
                "planned rate below requested minimum",
            ));
        }

        self.ledger.checkpoint();
        match self.settle(request, &outcome) {
            Ok(receipt) => {
                self.ledger.commit()?;
                debug!(
                    pair = %request.pair,
                    src_spent = %receipt.src_spent(),
                    dest_delivered = %receipt.dest_delivered(),
                    trade_wei = %receipt.trade_wei(),
                    "trade settled"
                );
                Ok(receipt)
            }
            Err(err) => {
                self.ledger.rollback()?;
                Err(err)
            }
        }
    }

    /// Pays out a platform wallet's accumulated fees.
    ///
    /// # Errors
    ///
    /// See [`FeeHandler::claim_platform_fee`].
    pub fn claim_platform_fee(&mut self, wallet: AccountId) -> Result<Amount> {
        self.fee_handler.claim_platform_fee(&mut self.ledger, wallet)
    }

    /// Pays out a rebate wallet's accumulated rebates.
    ///
    /// # Errors
    ///
    /// See [`FeeHandler::claim_rebate`].
    pub fn claim_rebate(&mut self, wallet: AccountId) -> Result<Amount> {
        self.fee_handler.claim_rebate(&mut self.ledger, wallet)
    }

    /// Pays a staker its share of an epoch's reward pool.
    ///
    /// # Errors
    ///
    /// See [`FeeHandler::claim_reward`].
    pub fn claim_reward(
        &mut self,
        epoch: Epoch,
        staker: AccountId,
        share: BasisPoints,
    ) -> Result<Amount> {
        self.fee_handler
            .claim_reward(&mut self.ledger, epoch, staker, share)
    }

    /// Burns unallocated fees, gated by the configured block interval.
    ///
    /// # Errors
    ///
    /// See [`FeeHandler::burn`].
    pub fn burn_fees(&mut self, current_block: BlockNumber) -> Result<Amount> {
        self.fee_handler.burn(&mut self.ledger, current_block)
    }

    fn validate_request(&self, request: &TradeRequest) -> Result<()> {
        if request.trader.is_zero() {
            return Err(DexError::InvalidInput("zero trader account"));
        }
        if request.dest_account.is_zero() {
            return Err(DexError::InvalidInput("zero destination account"));
        }
        if request.src_qty.is_zero() {
            return Err(DexError::InvalidQuantity("zero source quantity"));
        }
        if let Some(cap) = request.max_dest_amount {
            if cap.is_zero() {
                return Err(DexError::InvalidQuantity("zero destination cap"));
            }
        }
        if !request.platform_fee_bps.is_valid_percent() {
            return Err(DexError::InvalidFee("platform fee above 100%"));
        }
        match request.platform_wallet {
            Some(wallet) if wallet.is_zero() => {
                return Err(DexError::InvalidInput("zero platform wallet"));
            }
            None if !request.platform_fee_bps.is_zero() => {
                return Err(DexError::InvalidInput("platform fee without platform wallet"));
            }
            _ => {}
        }
        self.require_registered(&request.pair.src())?;
        self.require_registered(&request.pair.dest())?;
        Ok(())
    }

    fn require_registered(&self, token: &Token) -> Result<()> {
        match self.ledger.registered(token.address()) {
            Some(registered) if registered.decimals() == token.decimals() => Ok(()),
            Some(_) => Err(DexError::InvalidToken(
                "token decimals differ from registration",
            )),
            None => Err(DexError::InvalidToken("token not registered")),
        }
    }

    fn settle(&mut self, request: &TradeRequest, outcome: &MatchOutcome) -> Result<TradeReceipt> {
        let settlement = self.config.settlement_account();
        let src = request.pair.src();
        let dest = request.pair.dest();

        let _pulled =
            self.ledger
                .transfer(src.address(), request.trader, settlement, request.src_qty)?;
        let refund = request
            .src_qty
            .checked_sub(&outcome.src_amount())
            .ok_or(DexError::AccountingMismatch("plan exceeds offered quantity"))?;
        if !refund.is_zero() {
            let _returned =
                self.ledger
                    .transfer(src.address(), settlement, request.trader, refund)?;
        }

        let wei_received = match outcome.token_to_reference() {
            Some(leg) => self.run_leg(leg, &src, &Token::reference(), settlement)?,
            None => outcome.trade_wei(),
        };
        if wei_received < outcome.trade_wei() {
            return Err(DexError::AccountingMismatch("source leg under-delivered"));
        }

        let total_fees = outcome
            .network_fee_wei()
            .safe_add(&outcome.platform_fee_wei())?;
        if !total_fees.is_zero() {
            let _collected = self.ledger.transfer(
                TokenAddress::REFERENCE,
                settlement,
                self.config.fee_account(),
                total_fees,
            )?;
        }

        let dest_received = match outcome.reference_to_token() {
            Some(leg) => self.run_leg(leg, &Token::reference(), &dest, settlement)?,
            None => outcome.dest_amount(),
        };
        if dest_received < outcome.dest_amount() {
            return Err(DexError::AccountingMismatch(
                "destination leg under-delivered",
            ));
        }

        let delivered = self.ledger.transfer(
            dest.address(),
            settlement,
            request.dest_account,
            outcome.dest_amount(),
        )?;
        if !request.min_conversion_rate.is_zero() {
            let achieved = calc_rate_from_amounts(
                outcome.src_amount(),
                delivered,
                src.decimals(),
                dest.decimals(),
            )?;
            if achieved < request.min_conversion_rate {
                return Err(DexError::RateBelowMinimum(
                    "delivered rate below requested minimum",
                ));
            }
        }

        let epoch = self.engine.governance().current_epoch()?;
        self.fee_handler.handle_fees(
            &mut self.ledger,
            epoch,
            outcome.network_fee_wei(),
            outcome.platform_fee_wei(),
            request.platform_wallet,
            &rebate_recipients(outcome),
        )?;

        Ok(TradeReceipt {
            dest_delivered: delivered,
            src_spent: outcome.src_amount(),
            trade_wei: outcome.trade_wei(),
            network_fee_wei: outcome.network_fee_wei(),
            platform_fee_wei: outcome.platform_fee_wei(),
            t2e_reserve: outcome.token_to_reference().map(LegPlan::reserve),
            e2t_reserve: outcome.reference_to_token().map(LegPlan::reserve),
        })
    }

    /// Funds the selected reserve with the nominal leg input, lets it
    /// trade, and returns what actually landed back at the settlement
    /// account.
    fn run_leg(
        &mut self,
        leg: &LegPlan,
        leg_src: &Token,
        leg_dest: &Token,
        settlement: AccountId,
    ) -> Result<Amount> {
        let reserve = self
            .book
            .get_mut(leg.reserve())
            .ok_or(DexError::UnknownReserve("selected reserve left the book"))?;
        let reserve_account = reserve.address();

        let before = self.ledger.balance_of(leg_dest.address(), settlement);
        let _funded = self.ledger.transfer(
            leg_src.address(),
            settlement,
            reserve_account,
            leg.src_amount(),
        )?;
        let _nominal = reserve.trade(
            &mut self.ledger,
            leg_src,
            leg.src_amount(),
            leg_dest,
            leg.rate(),
            settlement,
        )?;
        let after = self.ledger.balance_of(leg_dest.address(), settlement);
        let received = after.checked_sub(&before).ok_or(DexError::AccountingMismatch(
            "leg output decreased settlement balance",
        ))?;
        trace!(reserve = %leg.reserve(), received = %received, "leg settled");
        Ok(received)
    }
}

/// Rebate wallets of the outcome's rebate-entitled legs, with equal
/// shares of the rebate pool. An entitled leg without a wallet on file
/// leaves its share unallocated.
fn rebate_recipients(outcome: &MatchOutcome) -> Vec<(AccountId, BasisPoints)> {
    let entitled: Vec<&LegPlan> = [outcome.token_to_reference(), outcome.reference_to_token()]
        .into_iter()
        .flatten()
        .filter(|leg| leg.flags().rebate_entitled)
        .collect();
    if entitled.is_empty() {
        return Vec::new();
    }
    let share = BasisPoints::new(BasisPoints::MAX_PERCENT.get() / entitled.len() as u32);
    entitled
        .into_iter()
        .filter_map(|leg| leg.rebate_wallet().map(|wallet| (wallet, share)))
        .collect()
}

//! Integration tests exercising the full system from the public API.
//!
//! These tests verify end-to-end flows: reserve selection, fee pricing
//! and accrual, transfer-fee token settlement, destination capping,
//! burn gating, and failure atomicity — all through self-contained mock
//! collaborators implementing the crate's trait seams.

#![allow(clippy::panic)]

use std::cell::Cell;
use std::collections::BTreeMap;

use argus_dex::config::{FeeConfig, NetworkConfig};
use argus_dex::domain::{
    AccountId, Amount, BasisPoints, BlockNumber, Decimals, Epoch, Rate, ReserveFlags, ReserveId,
    Token, TokenAddress, TradePair,
};
use argus_dex::engine::{Hint, MatchingEngine};
use argus_dex::error::{DexError, Result};
use argus_dex::fees::FeeHandler;
use argus_dex::ledger::{Ledger, TransferFeePolicy};
use argus_dex::math::calc_dest_amount;
use argus_dex::settlement::{TradeOrchestrator, TradeRequest};
use argus_dex::traits::{Governance, Reserve, ReserveRegistry, RewardRebateSplit};

// ---------------------------------------------------------------------------
// Mock collaborators
// ---------------------------------------------------------------------------

const WEI: u128 = 1_000_000_000_000_000_000;

fn account(tag: u8) -> AccountId {
    AccountId::from_bytes([tag; 32])
}

fn token(tag: u8, decimals: u8) -> Token {
    let Ok(d) = Decimals::new(decimals) else {
        panic!("invalid decimals in fixture: {decimals}");
    };
    Token::new(TokenAddress::from_bytes([tag; 32]), d)
}

fn native() -> Token {
    Token::reference()
}

fn pair(src: Token, dest: Token) -> TradePair {
    let Ok(p) = TradePair::new(src, dest) else {
        panic!("expected distinct pair");
    };
    p
}

/// Reserve quoting from a fixed `(src, dest) -> rate` table and settling
/// at exactly the committed rate.
struct TableReserve {
    address: AccountId,
    rates: BTreeMap<(TokenAddress, TokenAddress), Rate>,
}

impl TableReserve {
    fn new(address: AccountId) -> Self {
        Self {
            address,
            rates: BTreeMap::new(),
        }
    }

    fn with_rate(mut self, src: &Token, dest: &Token, rate: Rate) -> Self {
        self.rates.insert((src.address(), dest.address()), rate);
        self
    }
}

impl Reserve for TableReserve {
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
        let dest_amount = calc_dest_amount(src_amount, src.decimals(), dest.decimals(), rate)?;
        ledger.transfer(dest.address(), self.address, dest_account, dest_amount)
    }
}

/// Registry backed by static listing, flag, and rebate wallet maps.
#[derive(Default)]
struct ListingRegistry {
    listings: BTreeMap<(TokenAddress, TokenAddress), Vec<ReserveId>>,
    flags: BTreeMap<ReserveId, ReserveFlags>,
    rebate_wallets: BTreeMap<ReserveId, AccountId>,
}

impl ListingRegistry {
    fn new() -> Self {
        Self::default()
    }

    fn list(mut self, src: &Token, dest: &Token, id: ReserveId) -> Self {
        self.listings
            .entry((src.address(), dest.address()))
            .or_default()
            .push(id);
        self
    }

    fn with_flags(mut self, id: ReserveId, flags: ReserveFlags) -> Self {
        self.flags.insert(id, flags);
        self
    }

    fn with_rebate_wallet(mut self, id: ReserveId, wallet: AccountId) -> Self {
        self.rebate_wallets.insert(id, wallet);
        self
    }
}

impl ReserveRegistry for ListingRegistry {
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

/// Governance source with a settable epoch.
struct FixedGovernance {
    network_fee_bps: BasisPoints,
    split: RewardRebateSplit,
    epoch: Cell<Epoch>,
}

impl FixedGovernance {
    fn new(network_fee_bps: u32) -> Self {
        Self {
            network_fee_bps: BasisPoints::new(network_fee_bps),
            split: RewardRebateSplit::new(BasisPoints::new(7_000), BasisPoints::new(2_000)),
            epoch: Cell::new(Epoch::new(0)),
        }
    }

    fn set_epoch(&self, epoch: Epoch) {
        self.epoch.set(epoch);
    }
}

impl Governance for FixedGovernance {
    fn network_fee_bps(&self) -> Result<BasisPoints> {
        Ok(self.network_fee_bps)
    }

    fn reward_rebate_split(&self) -> Result<RewardRebateSplit> {
        Ok(self.split)
    }

    fn current_epoch(&self) -> Result<Epoch> {
        Ok(self.epoch.get())
    }
}

// ---------------------------------------------------------------------------
// Shared fixtures
// ---------------------------------------------------------------------------

fn settlement() -> AccountId {
    account(0xA0)
}

fn fee_account() -> AccountId {
    account(0xFE)
}

fn trader() -> AccountId {
    account(0x01)
}

fn recipient() -> AccountId {
    account(0x02)
}

fn rebate_wallet() -> AccountId {
    account(0x21)
}

fn orchestrator(
    registry: ListingRegistry,
    governance: FixedGovernance,
) -> TradeOrchestrator<ListingRegistry, FixedGovernance> {
    let Ok(fee_config) = FeeConfig::new(30) else {
        panic!("valid fee config");
    };
    let Ok(handler) = FeeHandler::new(&governance, fee_config, fee_account()) else {
        panic!("valid fee handler");
    };
    let Ok(network_config) = NetworkConfig::new(settlement(), fee_account()) else {
        panic!("valid network config");
    };
    let engine = MatchingEngine::new(registry, governance);
    let Ok(orch) = TradeOrchestrator::new(engine, handler, network_config) else {
        panic!("valid orchestrator");
    };
    orch
}

fn request(pair: TradePair, src_qty: u128) -> TradeRequest {
    TradeRequest {
        trader: trader(),
        pair,
        src_qty: Amount::new(src_qty),
        dest_account: recipient(),
        max_dest_amount: None,
        min_conversion_rate: Rate::ZERO,
        platform_fee_bps: BasisPoints::ZERO,
        platform_wallet: None,
        hint: Hint::BestOfAll,
    }
}

fn register(
    orch: &mut TradeOrchestrator<ListingRegistry, FixedGovernance>,
    token: Token,
    policy: TransferFeePolicy,
) {
    let Ok(()) = orch.ledger_mut().register_token(token, policy) else {
        panic!("register failed");
    };
}

fn deposit(
    orch: &mut TradeOrchestrator<ListingRegistry, FixedGovernance>,
    token: TokenAddress,
    account: AccountId,
    amount: u128,
) {
    let Ok(()) = orch.ledger_mut().deposit(token, account, Amount::new(amount)) else {
        panic!("deposit failed");
    };
}

fn add_reserve(
    orch: &mut TradeOrchestrator<ListingRegistry, FixedGovernance>,
    id: ReserveId,
    reserve: TableReserve,
) {
    let Ok(()) = orch.add_reserve(id, Box::new(reserve)) else {
        panic!("add_reserve failed");
    };
}

// ---------------------------------------------------------------------------
// End-to-end settlement
// ---------------------------------------------------------------------------

/// 10^18 native units into a 9-decimal token carrying its own 13bp
/// transfer fee, through one fee-paying reserve at parity, with both
/// internal accounts on the token's exemption list. The settlement
/// account's balance of the destination token must not move, and the
/// recipient must receive the quoted amount minus the 20bp network fee.
#[test]
fn whitelisted_path_leaves_settlement_balance_flat() {
    let tkn = token(0x10, 9);
    let collector = account(0x77);
    let id = ReserveId::new(1);
    let reserve_account = account(0x51);
    let registry = ListingRegistry::new()
        .list(&native(), &tkn, id)
        .with_flags(id, ReserveFlags::FEE_PAYING)
        .with_rebate_wallet(id, rebate_wallet());
    let mut orch = orchestrator(registry, FixedGovernance::new(20));

    let Ok(policy) = TransferFeePolicy::new(BasisPoints::new(13), collector) else {
        panic!("valid policy");
    };
    let policy = policy.exempt(settlement()).exempt(reserve_account);
    register(&mut orch, tkn, policy);
    deposit(&mut orch, tkn.address(), reserve_account, 10_000_000_000);
    deposit(&mut orch, TokenAddress::REFERENCE, trader(), WEI);
    add_reserve(
        &mut orch,
        id,
        TableReserve::new(reserve_account).with_rate(&native(), &tkn, Rate::ONE),
    );

    let Ok(receipt) = orch.trade(&request(pair(native(), tkn), WEI)) else {
        panic!("trade should settle");
    };

    // 20bp of 10^18 wei withheld, remainder converts at parity into
    // 9-decimal units; every internal hop ran on the exemption list.
    assert_eq!(receipt.network_fee_wei(), Amount::new(2_000_000_000_000_000));
    assert_eq!(receipt.dest_delivered(), Amount::new(998_000_000));

    let ledger = orch.ledger();
    assert_eq!(ledger.balance_of(tkn.address(), settlement()), Amount::ZERO);
    assert_eq!(ledger.balance_of(tkn.address(), collector), Amount::ZERO);
    assert_eq!(
        ledger.balance_of(tkn.address(), recipient()),
        Amount::new(998_000_000)
    );
    assert_eq!(
        ledger.balance_of(TokenAddress::REFERENCE, fee_account()),
        Amount::new(2_000_000_000_000_000)
    );
}

/// The reference transfer-fee scenario: trading 10^9 units of a 13bp
/// demurrage token through a non-whitelisted trader skims exactly
/// `src_qty * 13 / 10000` out of the settlement account's buffer.
#[test]
fn transfer_fee_source_costs_exactly_thirteen_bps() {
    let dgx = token(0x30, 9);
    let collector = account(0x77);
    let id = ReserveId::new(1);
    let reserve_account = account(0x51);
    let registry = ListingRegistry::new()
        .list(&dgx, &native(), id)
        .with_flags(id, ReserveFlags::FEE_PAYING)
        .with_rebate_wallet(id, rebate_wallet());
    let mut orch = orchestrator(registry, FixedGovernance::new(20));

    let Ok(policy) = TransferFeePolicy::new(BasisPoints::new(13), collector) else {
        panic!("valid policy");
    };
    let policy = policy.exempt(settlement()).exempt(reserve_account);
    register(&mut orch, dgx, policy);
    deposit(&mut orch, dgx.address(), trader(), 1_000_000_000);
    deposit(&mut orch, dgx.address(), settlement(), 1_000_000_000);
    deposit(&mut orch, TokenAddress::REFERENCE, reserve_account, WEI);
    add_reserve(
        &mut orch,
        id,
        TableReserve::new(reserve_account).with_rate(&dgx, &native(), Rate::ONE),
    );

    let Ok(_receipt) = orch.trade(&request(pair(dgx, native()), 1_000_000_000)) else {
        panic!("trade should settle");
    };

    let skim = 1_000_000_000 * 13 / 10_000;
    let ledger = orch.ledger();
    assert_eq!(ledger.balance_of(dgx.address(), collector), Amount::new(skim));
    assert_eq!(
        ledger.balance_of(dgx.address(), settlement()),
        Amount::new(1_000_000_000 - skim)
    );
    // The reserve was still funded the full nominal leg amount.
    assert_eq!(
        ledger.balance_of(dgx.address(), reserve_account),
        Amount::new(1_000_000_000)
    );
}

/// Same trade through a whitelisted trader: no skim anywhere, no buffer
/// consumed.
#[test]
fn whitelisted_trader_pays_no_transfer_fee() {
    let dgx = token(0x30, 9);
    let collector = account(0x77);
    let id = ReserveId::new(1);
    let reserve_account = account(0x51);
    let registry = ListingRegistry::new()
        .list(&dgx, &native(), id)
        .with_flags(id, ReserveFlags::FEE_PAYING)
        .with_rebate_wallet(id, rebate_wallet());
    let mut orch = orchestrator(registry, FixedGovernance::new(20));

    let Ok(policy) = TransferFeePolicy::new(BasisPoints::new(13), collector) else {
        panic!("valid policy");
    };
    let policy = policy
        .exempt(settlement())
        .exempt(reserve_account)
        .exempt(trader());
    register(&mut orch, dgx, policy);
    deposit(&mut orch, dgx.address(), trader(), 1_000_000_000);
    deposit(&mut orch, TokenAddress::REFERENCE, reserve_account, WEI);
    add_reserve(
        &mut orch,
        id,
        TableReserve::new(reserve_account).with_rate(&dgx, &native(), Rate::ONE),
    );

    let Ok(_receipt) = orch.trade(&request(pair(dgx, native()), 1_000_000_000)) else {
        panic!("trade should settle");
    };

    let ledger = orch.ledger();
    assert_eq!(ledger.balance_of(dgx.address(), collector), Amount::ZERO);
    assert_eq!(ledger.balance_of(dgx.address(), settlement()), Amount::ZERO);
}

// ---------------------------------------------------------------------------
// Reserve selection
// ---------------------------------------------------------------------------

#[test]
fn best_of_all_selects_higher_output() {
    let tkn = token(0x10, 18);
    let slow = ReserveId::new(1);
    let fast = ReserveId::new(2);
    let slow_account = account(0x51);
    let fast_account = account(0x52);
    let registry = ListingRegistry::new()
        .list(&native(), &tkn, slow)
        .list(&native(), &tkn, fast)
        .with_flags(slow, ReserveFlags::FEE_PAYING)
        .with_flags(fast, ReserveFlags::FEE_PAYING)
        .with_rebate_wallet(slow, rebate_wallet())
        .with_rebate_wallet(fast, account(0x22));
    let mut orch = orchestrator(registry, FixedGovernance::new(20));

    register(&mut orch, tkn, TransferFeePolicy::none());
    deposit(&mut orch, tkn.address(), slow_account, 10 * WEI);
    deposit(&mut orch, tkn.address(), fast_account, 10 * WEI);
    deposit(&mut orch, TokenAddress::REFERENCE, trader(), WEI);
    add_reserve(
        &mut orch,
        slow,
        TableReserve::new(slow_account).with_rate(&native(), &tkn, Rate::ONE),
    );
    add_reserve(
        &mut orch,
        fast,
        TableReserve::new(fast_account)
            .with_rate(&native(), &tkn, Rate::new(11 * Rate::PRECISION / 10)),
    );

    let Ok(receipt) = orch.trade(&request(pair(native(), tkn), WEI)) else {
        panic!("trade should settle");
    };

    assert_eq!(receipt.e2t_reserve(), Some(fast));
    // 1.1 * (10^18 - 20bp) at parity decimals.
    assert_eq!(
        receipt.dest_delivered(),
        Amount::new(11 * (WEI - 2_000_000_000_000_000) / 10)
    );
}

#[test]
fn exact_tie_selects_lowest_reserve_id() {
    let tkn = token(0x10, 18);
    let low = ReserveId::new(3);
    let high = ReserveId::new(7);
    let low_account = account(0x53);
    let high_account = account(0x57);
    let registry = ListingRegistry::new()
        .list(&native(), &tkn, high)
        .list(&native(), &tkn, low)
        .with_flags(low, ReserveFlags::FEE_PAYING)
        .with_flags(high, ReserveFlags::FEE_PAYING)
        .with_rebate_wallet(low, rebate_wallet())
        .with_rebate_wallet(high, account(0x22));
    let mut orch = orchestrator(registry, FixedGovernance::new(20));

    register(&mut orch, tkn, TransferFeePolicy::none());
    deposit(&mut orch, tkn.address(), low_account, 10 * WEI);
    deposit(&mut orch, tkn.address(), high_account, 10 * WEI);
    deposit(&mut orch, TokenAddress::REFERENCE, trader(), WEI);
    add_reserve(
        &mut orch,
        low,
        TableReserve::new(low_account).with_rate(&native(), &tkn, Rate::ONE),
    );
    add_reserve(
        &mut orch,
        high,
        TableReserve::new(high_account).with_rate(&native(), &tkn, Rate::ONE),
    );

    let Ok(receipt) = orch.trade(&request(pair(native(), tkn), WEI)) else {
        panic!("trade should settle");
    };
    assert_eq!(receipt.e2t_reserve(), Some(low));
}

// ---------------------------------------------------------------------------
// Conservation
// ---------------------------------------------------------------------------

/// One whole token into native across the decimal grid: the wei pulled
/// out of the reserve splits exactly into the recipient's payout and
/// the collected fee, and the settlement account ends flat.
#[test]
fn value_is_conserved_across_decimal_precisions() {
    for decimals in [9u8, 15, 16, 17, 18, 19] {
        let tkn = token(0x10, decimals);
        let id = ReserveId::new(1);
        let reserve_account = account(0x51);
        let registry = ListingRegistry::new()
            .list(&tkn, &native(), id)
            .with_flags(id, ReserveFlags::FEE_PAYING)
            .with_rebate_wallet(id, rebate_wallet());
        let mut orch = orchestrator(registry, FixedGovernance::new(20));

        let one_token = 10u128.pow(u32::from(decimals));
        register(&mut orch, tkn, TransferFeePolicy::none());
        deposit(&mut orch, tkn.address(), trader(), one_token);
        deposit(&mut orch, TokenAddress::REFERENCE, reserve_account, 10 * WEI);
        add_reserve(
            &mut orch,
            id,
            TableReserve::new(reserve_account).with_rate(&tkn, &native(), Rate::ONE),
        );

        let Ok(receipt) = orch.trade(&request(pair(tkn, native()), one_token)) else {
            panic!("trade should settle at {decimals} decimals");
        };

        let ledger = orch.ledger();
        let reserve_outflow = Amount::new(10 * WEI)
            .checked_sub(&ledger.balance_of(TokenAddress::REFERENCE, reserve_account));
        let Some(reserve_outflow) = reserve_outflow else {
            panic!("reserve balance grew");
        };
        let recipient_inflow = ledger.balance_of(TokenAddress::REFERENCE, recipient());
        let fee_inflow = ledger.balance_of(TokenAddress::REFERENCE, fee_account());

        assert_eq!(reserve_outflow, receipt.trade_wei());
        assert_eq!(
            recipient_inflow.checked_add(&fee_inflow),
            Some(receipt.trade_wei()),
            "value leaked at {decimals} decimals"
        );
        assert_eq!(recipient_inflow, receipt.dest_delivered());
        assert_eq!(
            ledger.balance_of(TokenAddress::REFERENCE, settlement()),
            Amount::ZERO
        );
        assert_eq!(ledger.balance_of(tkn.address(), trader()), Amount::ZERO);
        assert_eq!(
            ledger.balance_of(tkn.address(), reserve_account),
            Amount::new(one_token)
        );
    }
}

// ---------------------------------------------------------------------------
// Destination caps and platform fees
// ---------------------------------------------------------------------------

#[test]
fn capped_token_to_token_trade_refunds_and_pays_platform() {
    let src = token(0x10, 18);
    let dst = token(0x20, 18);
    let t2e_id = ReserveId::new(1);
    let e2t_id = ReserveId::new(2);
    let t2e_account = account(0x51);
    let e2t_account = account(0x52);
    let platform = account(0x31);
    let registry = ListingRegistry::new()
        .list(&src, &native(), t2e_id)
        .list(&native(), &dst, e2t_id)
        .with_flags(t2e_id, ReserveFlags::FEE_PAYING)
        .with_flags(e2t_id, ReserveFlags::FEE_PAYING)
        .with_rebate_wallet(t2e_id, rebate_wallet())
        .with_rebate_wallet(e2t_id, account(0x22));
    let mut orch = orchestrator(registry, FixedGovernance::new(20));

    register(&mut orch, src, TransferFeePolicy::none());
    register(&mut orch, dst, TransferFeePolicy::none());
    deposit(&mut orch, src.address(), trader(), WEI);
    deposit(&mut orch, TokenAddress::REFERENCE, t2e_account, WEI);
    deposit(&mut orch, dst.address(), e2t_account, WEI);
    add_reserve(
        &mut orch,
        t2e_id,
        TableReserve::new(t2e_account).with_rate(&src, &native(), Rate::ONE),
    );
    add_reserve(
        &mut orch,
        e2t_id,
        TableReserve::new(e2t_account).with_rate(&native(), &dst, Rate::ONE),
    );

    // Uncapped output would be 10^18 - (4*10^15 + 2.5*10^15); cap at half.
    let mut req = request(pair(src, dst), WEI);
    req.platform_fee_bps = BasisPoints::new(25);
    req.platform_wallet = Some(platform);
    req.max_dest_amount = Some(Amount::new(496_750 * 10u128.pow(12)));

    let Ok(receipt) = orch.trade(&req) else {
        panic!("trade should settle");
    };

    assert_eq!(receipt.dest_delivered(), Amount::new(496_750 * 10u128.pow(12)));
    assert_eq!(receipt.src_spent(), Amount::new(WEI / 2));
    assert_eq!(receipt.network_fee_wei(), Amount::new(2 * 10u128.pow(15)));
    assert_eq!(receipt.platform_fee_wei(), Amount::new(125 * 10u128.pow(13)));

    let ledger = orch.ledger();
    // The unspent half went back to the trader.
    assert_eq!(ledger.balance_of(src.address(), trader()), Amount::new(WEI / 2));
    assert_eq!(
        ledger.balance_of(dst.address(), recipient()),
        Amount::new(496_750 * 10u128.pow(12))
    );

    // The platform's cut is claimable afterwards.
    assert_eq!(
        orch.fee_handler().platform_fee_balance(platform),
        Amount::new(125 * 10u128.pow(13))
    );
    let Ok(paid) = orch.claim_platform_fee(platform) else {
        panic!("claim should succeed");
    };
    assert_eq!(paid, Amount::new(125 * 10u128.pow(13)));
    assert_eq!(
        orch.ledger().balance_of(TokenAddress::REFERENCE, platform),
        Amount::new(125 * 10u128.pow(13))
    );
}

/// With both legs fee-accounted at 4000bp plus a 1900bp platform fee,
/// 99% of the trade value goes to fees and the last percent still
/// reaches the recipient, never more than the uncapped output.
#[test]
fn extreme_fee_rates_never_overdraw_the_trade() {
    let src = token(0x10, 18);
    let dst = token(0x20, 18);
    let t2e_id = ReserveId::new(1);
    let e2t_id = ReserveId::new(2);
    let t2e_account = account(0x51);
    let e2t_account = account(0x52);
    let platform = account(0x31);
    let registry = ListingRegistry::new()
        .list(&src, &native(), t2e_id)
        .list(&native(), &dst, e2t_id)
        .with_flags(t2e_id, ReserveFlags::FEE_PAYING)
        .with_flags(e2t_id, ReserveFlags::FEE_PAYING)
        .with_rebate_wallet(t2e_id, rebate_wallet())
        .with_rebate_wallet(e2t_id, account(0x22));
    let mut orch = orchestrator(registry, FixedGovernance::new(4_000));

    register(&mut orch, src, TransferFeePolicy::none());
    register(&mut orch, dst, TransferFeePolicy::none());
    deposit(&mut orch, src.address(), trader(), WEI);
    deposit(&mut orch, TokenAddress::REFERENCE, t2e_account, WEI);
    deposit(&mut orch, dst.address(), e2t_account, WEI);
    add_reserve(
        &mut orch,
        t2e_id,
        TableReserve::new(t2e_account).with_rate(&src, &native(), Rate::ONE),
    );
    add_reserve(
        &mut orch,
        e2t_id,
        TableReserve::new(e2t_account).with_rate(&native(), &dst, Rate::ONE),
    );

    let mut req = request(pair(src, dst), WEI);
    req.platform_fee_bps = BasisPoints::new(1_900);
    req.platform_wallet = Some(platform);

    let Ok(receipt) = orch.trade(&req) else {
        panic!("trade should settle");
    };

    assert_eq!(receipt.network_fee_wei(), Amount::new(8 * WEI / 10));
    assert_eq!(receipt.platform_fee_wei(), Amount::new(19 * WEI / 100));
    assert_eq!(receipt.dest_delivered(), Amount::new(WEI / 100));
    assert!(receipt.dest_delivered() <= Amount::new(WEI));
}

// ---------------------------------------------------------------------------
// Fee accrual, epochs, and burning
// ---------------------------------------------------------------------------

/// The final fee-handler bookkeeping must not depend on which of two
/// independent trades settles first.
#[test]
fn fee_accrual_commutes_over_trade_order() {
    let run = |first_big: bool| {
        let tkn = token(0x10, 18);
        let id = ReserveId::new(1);
        let reserve_account = account(0x51);
        let registry = ListingRegistry::new()
            .list(&native(), &tkn, id)
            .with_flags(id, ReserveFlags::FEE_PAYING)
            .with_rebate_wallet(id, rebate_wallet());
        let mut orch = orchestrator(registry, FixedGovernance::new(20));

        register(&mut orch, tkn, TransferFeePolicy::none());
        deposit(&mut orch, tkn.address(), reserve_account, 10 * WEI);
        deposit(&mut orch, TokenAddress::REFERENCE, trader(), 3 * WEI);
        add_reserve(
            &mut orch,
            id,
            TableReserve::new(reserve_account).with_rate(&native(), &tkn, Rate::ONE),
        );

        let pair = pair(native(), tkn);
        let quantities = if first_big { [2 * WEI, WEI] } else { [WEI, 2 * WEI] };
        for qty in quantities {
            let Ok(_receipt) = orch.trade(&request(pair, qty)) else {
                panic!("trade should settle");
            };
        }
        (
            orch.fee_handler().reward_pool(Epoch::new(0)),
            orch.fee_handler().rebate_balance(rebate_wallet()),
            orch.fee_handler().total_payout_balance(),
            orch.ledger()
                .balance_of(TokenAddress::REFERENCE, fee_account()),
        )
    };

    assert_eq!(run(true), run(false));
}

#[test]
fn rewards_bucket_by_epoch() {
    let tkn = token(0x10, 18);
    let id = ReserveId::new(1);
    let reserve_account = account(0x51);
    let registry = ListingRegistry::new()
        .list(&native(), &tkn, id)
        .with_flags(id, ReserveFlags::FEE_PAYING)
        .with_rebate_wallet(id, rebate_wallet());
    let mut orch = orchestrator(registry, FixedGovernance::new(20));

    register(&mut orch, tkn, TransferFeePolicy::none());
    deposit(&mut orch, tkn.address(), reserve_account, 10 * WEI);
    deposit(&mut orch, TokenAddress::REFERENCE, trader(), 2 * WEI);
    add_reserve(
        &mut orch,
        id,
        TableReserve::new(reserve_account).with_rate(&native(), &tkn, Rate::ONE),
    );
    let pair = pair(native(), tkn);

    orch.engine().governance().set_epoch(Epoch::new(1));
    let Ok(_receipt) = orch.trade(&request(pair, WEI)) else {
        panic!("trade should settle");
    };
    orch.engine().governance().set_epoch(Epoch::new(2));
    let Ok(_receipt) = orch.trade(&request(pair, WEI)) else {
        panic!("trade should settle");
    };

    // 70% of each trade's 2*10^15 wei network fee, per epoch.
    let handler = orch.fee_handler();
    assert_eq!(handler.reward_pool(Epoch::new(1)), Amount::new(14 * 10u128.pow(14)));
    assert_eq!(handler.reward_pool(Epoch::new(2)), Amount::new(14 * 10u128.pow(14)));
    assert_eq!(handler.reward_pool(Epoch::new(3)), Amount::ZERO);
}

#[test]
fn burn_respects_the_block_interval() {
    let tkn = token(0x10, 18);
    let id = ReserveId::new(1);
    let reserve_account = account(0x51);
    let registry = ListingRegistry::new()
        .list(&native(), &tkn, id)
        .with_flags(id, ReserveFlags::FEE_PAYING)
        .with_rebate_wallet(id, rebate_wallet());
    let mut orch = orchestrator(registry, FixedGovernance::new(20));

    register(&mut orch, tkn, TransferFeePolicy::none());
    deposit(&mut orch, tkn.address(), reserve_account, 10 * WEI);
    deposit(&mut orch, TokenAddress::REFERENCE, trader(), 2 * WEI);
    add_reserve(
        &mut orch,
        id,
        TableReserve::new(reserve_account).with_rate(&native(), &tkn, Rate::ONE),
    );
    let pair = pair(native(), tkn);

    let Ok(_receipt) = orch.trade(&request(pair, WEI)) else {
        panic!("trade should settle");
    };
    // Fee 2*10^15: 70% rewards, 20% rebates, 10% burnable.
    let Ok(first) = orch.burn_fees(BlockNumber::new(10)) else {
        panic!("first burn is always allowed");
    };
    assert_eq!(first, Amount::new(2 * 10u128.pow(14)));

    let Ok(_receipt) = orch.trade(&request(pair, WEI)) else {
        panic!("trade should settle");
    };
    // Interval is 30 blocks; 39 is one short of the gate.
    assert_eq!(
        orch.burn_fees(BlockNumber::new(39)),
        Err(DexError::BurnIntervalNotElapsed)
    );
    let Ok(second) = orch.burn_fees(BlockNumber::new(40)) else {
        panic!("burn past the gate should succeed");
    };
    assert_eq!(second, Amount::new(2 * 10u128.pow(14)));
}

// ---------------------------------------------------------------------------
// Failure atomicity
// ---------------------------------------------------------------------------

/// A reserve whose inventory cannot cover its own quote fails the leg
/// mid-settlement; the rollback must leave every balance and every fee
/// bucket untouched.
#[test]
fn underfunded_reserve_rolls_back_cleanly() {
    let tkn = token(0x10, 18);
    let id = ReserveId::new(1);
    let reserve_account = account(0x51);
    let registry = ListingRegistry::new()
        .list(&native(), &tkn, id)
        .with_flags(id, ReserveFlags::FEE_PAYING)
        .with_rebate_wallet(id, rebate_wallet());
    let mut orch = orchestrator(registry, FixedGovernance::new(20));

    register(&mut orch, tkn, TransferFeePolicy::none());
    // Inventory covers half the quoted payout.
    deposit(&mut orch, tkn.address(), reserve_account, WEI / 2);
    deposit(&mut orch, TokenAddress::REFERENCE, trader(), WEI);
    add_reserve(
        &mut orch,
        id,
        TableReserve::new(reserve_account).with_rate(&native(), &tkn, Rate::ONE),
    );

    let result = orch.trade(&request(pair(native(), tkn), WEI));
    assert!(matches!(result, Err(DexError::InsufficientBalance(_))));

    let ledger = orch.ledger();
    assert_eq!(
        ledger.balance_of(TokenAddress::REFERENCE, trader()),
        Amount::new(WEI)
    );
    assert_eq!(
        ledger.balance_of(tkn.address(), reserve_account),
        Amount::new(WEI / 2)
    );
    assert_eq!(
        ledger.balance_of(TokenAddress::REFERENCE, fee_account()),
        Amount::ZERO
    );
    assert_eq!(
        ledger.balance_of(TokenAddress::REFERENCE, settlement()),
        Amount::ZERO
    );
    assert_eq!(orch.fee_handler().total_payout_balance(), Amount::ZERO);
}

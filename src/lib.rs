//! # Argus DEX
//!
//! Liquidity aggregation core: quote many reserves, match each trade to
//! the best ones, and settle it atomically against a balance ledger.
//!
//! Every trade routes through a native reference asset in at most two
//! legs (`token -> reference -> token`). Reserves are external quote
//! sources behind the [`Reserve`](traits::Reserve) trait; the engine
//! compares their quotes per leg, prices network and platform fees
//! against the reference-asset value, and settlement trusts measured
//! balance deltas over anything a reserve claims. Collected fees accrue
//! into epoch-bucketed reward, rebate, and burn pools.
//!
//! # Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! argus-dex = "0.1"
//! ```
//!
//! ## Wire up one reserve and settle a trade
//!
//! ```rust
//! use argus_dex::config::{FeeConfig, NetworkConfig};
//! use argus_dex::domain::{
//!     AccountId, Amount, BasisPoints, Decimals, Epoch, Rate, ReserveFlags, ReserveId, Token,
//!     TokenAddress, TradePair,
//! };
//! use argus_dex::engine::{Hint, MatchingEngine};
//! use argus_dex::error::Result;
//! use argus_dex::fees::FeeHandler;
//! use argus_dex::ledger::{Ledger, TransferFeePolicy};
//! use argus_dex::settlement::{TradeOrchestrator, TradeRequest};
//! use argus_dex::traits::{Governance, Reserve, ReserveRegistry, RewardRebateSplit};
//!
//! // A reserve quoting 1:1 for everything it is asked about.
//! struct Parity {
//!     account: AccountId,
//! }
//!
//! impl Reserve for Parity {
//!     fn address(&self) -> AccountId {
//!         self.account
//!     }
//!
//!     fn conversion_rate(&self, _src: &Token, _dest: &Token, _src_qty: Amount) -> Option<Rate> {
//!         Some(Rate::ONE)
//!     }
//!
//!     fn trade(
//!         &mut self,
//!         ledger: &mut Ledger,
//!         _src: &Token,
//!         src_amount: Amount,
//!         dest: &Token,
//!         _rate: Rate,
//!         dest_account: AccountId,
//!     ) -> Result<Amount> {
//!         // Parity between equal-precision tokens: pay out what came in.
//!         ledger.transfer(dest.address(), self.account, dest_account, src_amount)
//!     }
//! }
//!
//! // A registry listing a single fee-paying reserve for every pair.
//! struct OneListing {
//!     id: ReserveId,
//! }
//!
//! impl ReserveRegistry for OneListing {
//!     fn reserves_for(&self, _src: TokenAddress, _dest: TokenAddress) -> Vec<ReserveId> {
//!         vec![self.id]
//!     }
//!
//!     fn flags(&self, _reserve: ReserveId) -> Option<ReserveFlags> {
//!         Some(ReserveFlags::FEE_PAYING)
//!     }
//!
//!     fn rebate_wallet(&self, _reserve: ReserveId) -> Option<AccountId> {
//!         Some(AccountId::from_bytes([9u8; 32]))
//!     }
//! }
//!
//! // Fixed fee levels: 20bp per fee-accounted leg, 70/20 reward/rebate.
//! struct FlatGovernance;
//!
//! impl Governance for FlatGovernance {
//!     fn network_fee_bps(&self) -> Result<BasisPoints> {
//!         Ok(BasisPoints::new(20))
//!     }
//!
//!     fn reward_rebate_split(&self) -> Result<RewardRebateSplit> {
//!         Ok(RewardRebateSplit::new(
//!             BasisPoints::new(7_000),
//!             BasisPoints::new(2_000),
//!         ))
//!     }
//!
//!     fn current_epoch(&self) -> Result<Epoch> {
//!         Ok(Epoch::new(0))
//!     }
//! }
//!
//! let token = Token::new(
//!     TokenAddress::from_bytes([1u8; 32]),
//!     Decimals::new(18).expect("valid decimals"),
//! );
//! let settlement = AccountId::from_bytes([0xA0; 32]);
//! let fee_account = AccountId::from_bytes([0xFE; 32]);
//! let trader = AccountId::from_bytes([2u8; 32]);
//! let reserve_account = AccountId::from_bytes([3u8; 32]);
//!
//! let governance = FlatGovernance;
//! let handler = FeeHandler::new(
//!     &governance,
//!     FeeConfig::new(30).expect("valid config"),
//!     fee_account,
//! )
//! .expect("valid handler");
//! let engine = MatchingEngine::new(OneListing { id: ReserveId::new(1) }, governance);
//! let mut orchestrator = TradeOrchestrator::new(
//!     engine,
//!     handler,
//!     NetworkConfig::new(settlement, fee_account).expect("valid config"),
//! )
//! .expect("accounts agree");
//!
//! // Fund the book: the trader brings native, the reserve holds inventory.
//! let ledger = orchestrator.ledger_mut();
//! ledger
//!     .register_token(token, TransferFeePolicy::none())
//!     .expect("fresh token");
//! ledger
//!     .deposit(TokenAddress::REFERENCE, trader, Amount::new(10u128.pow(18)))
//!     .expect("deposit");
//! ledger
//!     .deposit(token.address(), reserve_account, Amount::new(10u128.pow(18)))
//!     .expect("deposit");
//! orchestrator
//!     .add_reserve(
//!         ReserveId::new(1),
//!         Box::new(Parity { account: reserve_account }),
//!     )
//!     .expect("flags on file");
//!
//! let receipt = orchestrator
//!     .trade(&TradeRequest {
//!         trader,
//!         pair: TradePair::new(Token::reference(), token).expect("distinct tokens"),
//!         src_qty: Amount::new(10u128.pow(18)),
//!         dest_account: trader,
//!         max_dest_amount: None,
//!         min_conversion_rate: Rate::ZERO,
//!         platform_fee_bps: BasisPoints::ZERO,
//!         platform_wallet: None,
//!         hint: Hint::BestOfAll,
//!     })
//!     .expect("trade settles");
//!
//! // The 20bp network fee is withheld from the native value.
//! assert_eq!(receipt.network_fee_wei(), Amount::new(2 * 10u128.pow(15)));
//! assert_eq!(receipt.dest_delivered(), Amount::new(998 * 10u128.pow(15)));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ Orchestrator │  validates, checkpoints, settles, accrues fees
//! └──────┬───────┘
//!        │ match_trade / cap_to_max_dest
//!        ▼
//! ┌──────────────┐
//! │    Engine    │  best-of-all selection, fee pricing, destination caps
//! └──────┬───────┘
//!        │ conversion_rate / trade
//!        ▼
//! ┌──────────────┐
//! │   Reserves   │  external quote sources behind the Reserve trait
//! └──────┬───────┘
//!        │ transfers
//!        ▼
//! ┌──────────────┐
//! │    Ledger    │  balances, transfer-fee skims, checkpoints
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`Rate`](domain::Rate), [`Token`](domain::Token), [`TradePair`](domain::TradePair), … |
//! | [`traits`] | Integration seams: [`Reserve`](traits::Reserve), [`ReserveRegistry`](traits::ReserveRegistry), [`Governance`](traits::Governance) |
//! | [`engine`] | [`MatchingEngine`](engine::MatchingEngine), [`ReserveBook`](engine::ReserveBook), and match outcomes |
//! | [`ledger`] | [`Ledger`](ledger::Ledger) balance book and [`TransferFeePolicy`](ledger::TransferFeePolicy) |
//! | [`fees`] | [`FeeHandler`](fees::FeeHandler): accrual buckets, claims, burning |
//! | [`settlement`] | [`TradeOrchestrator`](settlement::TradeOrchestrator) atomic trade execution |
//! | [`config`] | Validated [`NetworkConfig`](config::NetworkConfig) and [`FeeConfig`](config::FeeConfig) |
//! | [`math`] | Checked arithmetic, widened mul-div, decimal-aware conversions |
//! | [`error`] | [`DexError`](error::DexError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fees;
pub mod ledger;
pub mod math;
pub mod prelude;
pub mod settlement;
pub mod traits;

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod testkit;

//! Fundamental domain value types used throughout the aggregation core.
//!
//! This module contains the value types that model the trading domain:
//! tokens, quantities, rates, fee rates, reserve identities, and the
//! epoch/block clocks of the fee system. All types are newtypes with
//! validated constructors where an invariant exists.

mod account;
mod amount;
mod basis_points;
mod block;
mod decimals;
mod epoch;
mod quote;
mod rate;
mod reserve_id;
mod rounding;
mod token;
mod token_address;
mod trade_pair;

pub use account::AccountId;
pub use amount::Amount;
pub use basis_points::BasisPoints;
pub use block::BlockNumber;
pub use decimals::Decimals;
pub use epoch::Epoch;
pub use quote::Quote;
pub use rate::Rate;
pub use reserve_id::{ReserveFlags, ReserveId};
pub use rounding::Rounding;
pub use token::Token;
pub use token_address::TokenAddress;
pub use trade_pair::TradePair;

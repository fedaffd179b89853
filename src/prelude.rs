//! Convenience re-exports for common types and traits.
//!
//! The prelude provides a single import to bring all commonly used items
//! into scope:
//!
//! ```rust
//! use argus_dex::prelude::*;
//! ```
//!
//! This re-exports the most frequently used domain types, core traits,
//! configuration types, and error types so that consumers don't need to
//! import from individual submodules.

// Re-export domain types
pub use crate::domain::{
    AccountId, Amount, BasisPoints, BlockNumber, Decimals, Epoch, Quote, Rate, ReserveFlags,
    ReserveId, Rounding, Token, TokenAddress, TradePair,
};

// Re-export integration seams
pub use crate::traits::{Governance, Reserve, ReserveRegistry, RewardRebateSplit};

// Re-export math utilities
pub use crate::math::CheckedArithmetic;

// Re-export configuration
pub use crate::config::{FeeConfig, NetworkConfig};

// Re-export error types
pub use crate::error::{DexError, Result};

// Re-export the engine, ledger, fee, and settlement surfaces
pub use crate::engine::{Hint, MatchingEngine, ReserveBook};
pub use crate::fees::FeeHandler;
pub use crate::ledger::{Ledger, TransferFeePolicy};
pub use crate::settlement::{TradeOrchestrator, TradeReceipt, TradeRequest};

//! Balance book, transfer fees, and settlement checkpoints.
//!
//! The ledger is the engine's single source of truth for who holds what.
//! [`Ledger`] keeps per-token, per-account balances and applies each
//! token's [`TransferFeePolicy`] on transfer, which is what the
//! settlement layer's delta verification measures against.

mod book;
mod transfer_fee;

pub use book::Ledger;
pub use transfer_fee::TransferFeePolicy;

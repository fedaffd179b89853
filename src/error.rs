//! Unified error type for quoting, matching, settlement, and fee accrual.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, DexError>;

/// All errors the aggregation core can produce.
///
/// Most variants carry a `&'static str` naming the exact check that failed,
/// so call sites stay allocation-free while logs remain precise.
///
/// Variants group into failure classes:
///
/// | Class | Variants |
/// |-------|----------|
/// | input validation | `InvalidInput`, `InvalidQuantity`, `InvalidToken`, `InvalidFee`, `InvalidPrecision`, `InvalidConfiguration` |
/// | quoting | `NoEligibleReserve`, `UnknownReserve` |
/// | slippage | `RateBelowMinimum` |
/// | accounting | `AccountingMismatch`, `InsufficientBalance` |
/// | governance | `GovernanceUnavailable` |
/// | arithmetic | `Overflow`, `Underflow`, `DivisionByZero` |
/// | fee burning | `BurnIntervalNotElapsed` |
///
/// No operation in this crate retries internally; every failure propagates
/// to the caller unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DexError {
    /// A trade request field failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A quantity is zero, exceeds the tradable cap, or is otherwise unusable.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(&'static str),

    /// A token is unregistered, duplicated, or used where another was expected.
    #[error("invalid token: {0}")]
    InvalidToken(&'static str),

    /// A fee rate is out of range or combined fee rates reach 100%.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),

    /// Token decimal precision outside the supported range.
    #[error("invalid precision: {0}")]
    InvalidPrecision(&'static str),

    /// A configuration value failed validation at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// No reserve produced a usable quote for a required trade leg.
    #[error("no eligible reserve: {0}")]
    NoEligibleReserve(&'static str),

    /// A reserve id listed by the registry has no live reserve behind it.
    #[error("unknown reserve: {0}")]
    UnknownReserve(&'static str),

    /// The conversion rate fell below the caller's declared minimum.
    #[error("rate below minimum conversion rate: {0}")]
    RateBelowMinimum(&'static str),

    /// A measured balance delta disagreed with the settlement plan.
    #[error("accounting mismatch: {0}")]
    AccountingMismatch(&'static str),

    /// An account balance cannot cover a requested debit.
    #[error("insufficient balance: {0}")]
    InsufficientBalance(&'static str),

    /// The fee-rate or epoch source could not be read.
    #[error("governance unavailable: {0}")]
    GovernanceUnavailable(&'static str),

    /// Too few blocks have elapsed since the previous burn.
    #[error("burn interval not elapsed")]
    BurnIntervalNotElapsed,

    /// Arithmetic overflow.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero: {0}")]
    DivisionByZero(&'static str),
}

//! Core reserve trait for quoting and executing single-leg conversions.
//!
//! [`Reserve`] is the abstraction over external liquidity sources.  The
//! engine never looks inside a reserve: it asks for a rate, and if the
//! reserve is selected, instructs it to convert at exactly that rate.
//!
//! # Quote-Then-Trade Contract
//!
//! A reserve that returns `Some(rate)` from [`Reserve::conversion_rate`]
//! commits to honoring that rate in a subsequent [`Reserve::trade`] call
//! with the same token pair and source quantity:
//!
//! ```text
//! delivered = src_amount × rate × 10^dest_decimals
//!             / (10^src_decimals × PRECISION)      (floor)
//! ```
//!
//! Settlement verifies delivery by ledger balance delta, not by the
//! reserve's return value, so a misbehaving reserve fails the trade
//! rather than corrupting accounting.
//!
//! # Declining To Quote
//!
//! Reserves decline by returning `None`.  A `Some(Rate::ZERO)` is also
//! treated as a decline by the quoting layer, as are rates above the
//! plausible cap.

use crate::domain::{AccountId, Amount, Rate, Token};
use crate::error::DexError;
use crate::ledger::Ledger;

/// Trait for external liquidity sources quoting one conversion leg.
///
/// Implementations hold their inventory as ledger balances under their
/// own [`AccountId`]; the engine funds the source side of a trade before
/// calling [`Reserve::trade`], and the reserve pays the destination side
/// out of its own account.
///
/// # Errors
///
/// [`Reserve::trade`] returns [`Result<Amount, DexError>`].  Typical
/// variants:
///
/// - [`DexError::InsufficientBalance`] — reserve inventory cannot cover
///   the destination leg
/// - [`DexError::Overflow`] — conversion arithmetic overflows
pub trait Reserve {
    /// Returns the ledger account holding this reserve's inventory.
    #[must_use]
    fn address(&self) -> AccountId;

    /// Quotes a conversion rate for selling `src_qty` of `src` into `dest`.
    ///
    /// Returns `None` to decline the quote.  The returned rate is scaled
    /// by [`crate::domain::Rate::PRECISION`] and is independent of token
    /// decimals, which the conversion math normalizes separately.
    #[must_use]
    fn conversion_rate(&self, src: &Token, dest: &Token, src_qty: Amount) -> Option<Rate>;

    /// Executes one conversion leg at a previously quoted rate.
    ///
    /// The engine has already credited `src_amount` of `src` to this
    /// reserve's account.  The reserve computes the destination amount at
    /// `rate`, transfers it from its own account to `dest_account`, and
    /// returns the amount it sent.
    ///
    /// # Arguments
    ///
    /// - `ledger` — balance book to settle against.
    /// - `src` / `src_amount` — the leg input, already in the reserve's
    ///   account.
    /// - `dest` / `rate` — the leg output token and committed rate.
    /// - `dest_account` — recipient of the destination amount.
    ///
    /// # Errors
    ///
    /// - [`DexError::InsufficientBalance`] if the reserve cannot pay the
    ///   destination leg.
    /// - [`DexError::Overflow`] if the conversion overflows.
    fn trade(
        &mut self,
        ledger: &mut Ledger,
        src: &Token,
        src_amount: Amount,
        dest: &Token,
        rate: Rate,
        dest_account: AccountId,
    ) -> Result<Amount, DexError>;
}

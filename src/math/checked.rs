//! Checked arithmetic trait for domain wrapper types.
//!
//! [`CheckedArithmetic`] lifts the fallible `checked_*` operations of the
//! domain newtypes into [`Result`](crate::error::Result) so settlement and
//! fee-accounting code can chain arithmetic with `?` instead of matching
//! `Option` at every step.
//!
//! # Examples
//!
//! ```
//! use argus_dex::domain::Amount;
//! use argus_dex::math::CheckedArithmetic;
//!
//! let balance = Amount::new(1_000);
//! let owed = Amount::new(250);
//! assert_eq!(balance.safe_sub(&owed), Ok(Amount::new(750)));
//! ```

use crate::domain::{Amount, Rounding};
use crate::error::DexError;

/// Fallible arithmetic for domain wrapper types.
///
/// # Contract
///
/// - **No panics** — all error conditions produce `Err`.
/// - **No saturation** — saturation hides accounting bugs; errors propagate.
/// - Implementations delegate to the inner type's checked operations.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_add(&self, other: &Self) -> Result<Self, DexError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, DexError>;

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_mul(&self, other: &Self) -> Result<Self, DexError>;

    /// Checked division with explicit [`Rounding`] direction.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::DivisionByZero`] if `other` is zero.
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, DexError>;
}

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, DexError> {
        self.checked_add(other)
            .ok_or(DexError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, DexError> {
        self.checked_sub(other)
            .ok_or(DexError::Underflow("amount subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, DexError> {
        self.checked_mul(other)
            .ok_or(DexError::Overflow("amount multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, DexError> {
        self.checked_div(other, rounding)
            .ok_or(DexError::DivisionByZero("amount division"))
    }
}

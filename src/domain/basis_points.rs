//! Basis-point fee rates.

use core::fmt;

use super::{Amount, Rounding};
use crate::error::DexError;

/// Denominator representing 100%.
const MAX_BPS: u32 = 10_000;

/// A rate expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// Construction is infallible; range enforcement happens where a rate is
/// USED as a percentage (request validation, config validation) via
/// [`is_valid_percent`](Self::is_valid_percent). Network and platform fees,
/// governance reward/rebate splits, and token transfer fees are all carried
/// as `BasisPoints`.
///
/// # Examples
///
/// ```
/// use argus_dex::domain::{Amount, BasisPoints, Rounding};
///
/// let network_fee = BasisPoints::new(20);
/// let cut = network_fee
///     .apply(Amount::new(1_000_000), Rounding::Down)
///     .expect("no overflow");
/// assert_eq!(cut, Amount::new(2_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(MAX_BPS);

    /// Creates a `BasisPoints` from a raw `u32` value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the rate is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the value is in the valid percentage range (`0..=10_000`).
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= MAX_BPS
    }

    /// Checked addition, for combining independent fee rates.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Computes `amount * (self / 10_000)` with explicit rounding.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Overflow`] if the intermediate multiplication
    /// overflows.
    pub const fn apply(&self, amount: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        let product = match amount.get().checked_mul(self.0 as u128) {
            Some(v) => v,
            None => return Err(DexError::Overflow("basis points apply overflow")),
        };
        let divisor = MAX_BPS as u128;

        match rounding {
            Rounding::Down => Ok(Amount::new(product / divisor)),
            Rounding::Up => {
                // The +9_999 numerator can only overflow when product is
                // within 10^4 of u128::MAX; inspect the quotient instead.
                match product.checked_add(divisor - 1) {
                    Some(n) => Ok(Amount::new(n / divisor)),
                    None => {
                        let q = product / divisor;
                        if product % divisor != 0 {
                            Ok(Amount::new(q + 1))
                        } else {
                            Ok(Amount::new(q))
                        }
                    }
                }
            }
        }
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}

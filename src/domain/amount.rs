//! Raw token quantity with checked arithmetic.

use core::fmt;

use super::Rounding;

/// A token quantity in the smallest indivisible unit of its token.
///
/// `Amount` carries no decimal information; pairing a quantity with its
/// precision is the job of [`Token`](super::Token). All `u128` values are
/// representable, though the engine additionally caps tradable quantities
/// at [`MAX_QTY`](crate::math::MAX_QTY).
///
/// Arithmetic is checked: methods return `None` on overflow, underflow, or
/// division by zero instead of panicking.
///
/// # Examples
///
/// ```
/// use argus_dex::domain::{Amount, Rounding};
///
/// let pulled = Amount::new(1_000);
/// let fee = Amount::new(13);
/// assert_eq!(pulled.checked_sub(&fee), Some(Amount::new(987)));
/// assert_eq!(
///     pulled.checked_div(&Amount::new(3), Rounding::Up),
///     Some(Amount::new(334)),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// Zero quantity.
    pub const ZERO: Self = Self(0);

    /// Maximum representable quantity.
    pub const MAX: Self = Self(u128::MAX);

    /// Creates an `Amount` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the quantity is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the smaller of `self` and `other`.
    pub const fn min(&self, other: &Self) -> Self {
        if self.0 <= other.0 {
            *self
        } else {
            *other
        }
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked multiplication. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_mul(&self, other: &Self) -> Option<Self> {
        match self.0.checked_mul(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked division with an explicit rounding direction.
    ///
    /// Returns `None` if `divisor` is zero.
    #[must_use]
    pub const fn checked_div(&self, divisor: &Self, rounding: Rounding) -> Option<Self> {
        if divisor.0 == 0 {
            return None;
        }
        match rounding {
            Rounding::Down => Some(Self(self.0 / divisor.0)),
            Rounding::Up => {
                // (n + d - 1) / d, falling back to quotient inspection when
                // the adjusted numerator would not fit.
                match self.0.checked_add(divisor.0 - 1) {
                    Some(n) => Some(Self(n / divisor.0)),
                    None => {
                        let q = self.0 / divisor.0;
                        if self.0 % divisor.0 != 0 {
                            Some(Self(q + 1))
                        } else {
                            Some(Self(q))
                        }
                    }
                }
            }
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

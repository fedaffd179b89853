//! Fixed-precision conversion rate.

use core::fmt;

/// A conversion rate between two tokens, scaled by [`Rate::PRECISION`].
///
/// A rate of `PRECISION` (`10^18`) means one smallest unit of source buys
/// one smallest unit of destination once decimal factors are normalized
/// away. Reserves quote rates; the engine never averages or interpolates
/// them. A zero rate means the reserve cannot serve the requested trade.
///
/// Quotes above [`MAX_RATE`](crate::math::MAX_RATE) are discarded as
/// implausible at the quoting layer.
///
/// # Examples
///
/// ```
/// use argus_dex::domain::Rate;
///
/// let parity = Rate::ONE;
/// let better = Rate::new(2 * Rate::PRECISION);
/// assert!(better > parity);
/// assert!(!better.is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[must_use]
pub struct Rate(u128);

impl Rate {
    /// Scaling factor: rates carry 18 decimal places of precision.
    pub const PRECISION: u128 = 1_000_000_000_000_000_000;

    /// The zero rate ("cannot serve").
    pub const ZERO: Self = Self(0);

    /// The identity rate.
    pub const ONE: Self = Self(Self::PRECISION);

    /// Creates a `Rate` from a raw `PRECISION`-scaled value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `PRECISION`-scaled value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the rate is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::PRECISION;
        let frac = self.0 % Self::PRECISION;
        write!(f, "{whole}.{frac:018}")
    }
}

//! Token decimal precision.

use crate::error::DexError;

/// Upper bound on decimal places. `10^27` leaves enough `u128` headroom for
/// every intermediate this crate computes before widening to 256 bits.
const MAX_DECIMALS: u8 = 27;

/// Number of decimal places a token uses.
///
/// Valid range is `0..=27`. Mainstream tokens sit between 0 and 19 places;
/// the conversion math additionally rejects token pairs whose precision
/// differs by more than 18 places.
///
/// # Examples
///
/// ```
/// use argus_dex::domain::Decimals;
///
/// let d = Decimals::new(9).expect("9 is valid");
/// assert_eq!(d.get(), 9);
/// assert_eq!(d.factor(), 1_000_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimals(u8);

impl Decimals {
    /// Zero decimal places.
    pub const ZERO: Self = Self(0);

    /// Precision of the native reference asset (18 places).
    pub const NATIVE: Self = Self(18);

    /// Creates a `Decimals` value after validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidPrecision`] if `value` exceeds 27.
    pub const fn new(value: u8) -> Result<Self, DexError> {
        if value > MAX_DECIMALS {
            return Err(DexError::InvalidPrecision("decimals must be 0..=27"));
        }
        Ok(Self(value))
    }

    /// Returns the raw decimal count.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Returns `10^decimals` as `u128`.
    #[must_use]
    pub const fn factor(&self) -> u128 {
        10u128.pow(self.0 as u32)
    }

    /// Absolute difference in decimal places between two precisions.
    #[must_use]
    pub const fn abs_diff(&self, other: &Self) -> u8 {
        if self.0 >= other.0 {
            self.0 - other.0
        } else {
            other.0 - self.0
        }
    }
}

//! Widening multiply-divide for rate math.
//!
//! Quote conversion multiplies quantities as large as `10^28` by rates as
//! large as `10^25` before dividing the precision factor back out. The
//! product needs 256 bits, so [`mul_div`] widens into two `u128` limbs and
//! divides back down with an explicit [`Rounding`].

use crate::domain::Rounding;

const LIMB_MASK: u128 = (1u128 << 64) - 1;

/// Computes `a * b / denominator` with a 256-bit intermediate product.
///
/// Returns `None` when `denominator` is zero or the quotient does not fit
/// in `u128`. [`Rounding::Up`] adds one whenever the division discards a
/// nonzero remainder.
///
/// # Examples
///
/// ```
/// use argus_dex::domain::Rounding;
/// use argus_dex::math::mul_div;
///
/// // 10^28 * 10^25 / 10^18 overflows u128 midway but not at the end.
/// let q = mul_div(10u128.pow(28), 10u128.pow(25), 10u128.pow(18), Rounding::Down);
/// assert_eq!(q, Some(10u128.pow(35)));
/// ```
#[must_use]
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let (hi, lo) = full_mul(a, b);
    // hi >= denominator would force a quotient of 2^128 or more.
    if hi >= denominator {
        return None;
    }
    let (quotient, remainder) = div_rem_wide(hi, lo, denominator);
    match rounding {
        Rounding::Down => Some(quotient),
        Rounding::Up => {
            if remainder == 0 {
                Some(quotient)
            } else {
                quotient.checked_add(1)
            }
        }
    }
}

/// 128 x 128 -> 256 bit multiplication as (hi, lo) limbs.
fn full_mul(a: u128, b: u128) -> (u128, u128) {
    let (a_hi, a_lo) = (a >> 64, a & LIMB_MASK);
    let (b_hi, b_lo) = (b >> 64, b & LIMB_MASK);

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    // Middle column; at most three 64-bit terms, cannot overflow.
    let mid = (ll >> 64) + (lh & LIMB_MASK) + (hl & LIMB_MASK);

    let lo = (mid << 64) | (ll & LIMB_MASK);
    let hi = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);
    (hi, lo)
}

/// Divides the 256-bit value `(hi, lo)` by `divisor`.
///
/// Caller guarantees `divisor != 0` and `hi < divisor`, which bounds the
/// quotient to 128 bits.
fn div_rem_wide(hi: u128, lo: u128, divisor: u128) -> (u128, u128) {
    if hi == 0 {
        return (lo / divisor, lo % divisor);
    }

    // Binary long division over the low limb; `hi` seeds the remainder.
    // Invariant at the top of each step: remainder < divisor.
    let mut remainder = hi;
    let mut quotient = 0u128;
    let mut i = 128u32;
    while i > 0 {
        i -= 1;
        let bit = (lo >> i) & 1;
        let overflowed = remainder >> 127;
        let shifted = (remainder << 1) | bit;
        // The doubled remainder spans 129 bits; the dropped top bit alone
        // guarantees it exceeds the divisor.
        if overflowed == 1 || shifted >= divisor {
            remainder = shifted.wrapping_sub(divisor);
            quotient |= 1 << i;
        } else {
            remainder = shifted;
        }
    }
    (quotient, remainder)
}

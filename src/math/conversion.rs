//! Decimal-normalized conversion between token quantities and rates.
//!
//! All three functions express the same identity
//!
//! ```text
//! dest = src * rate * 10^dest_decimals / (10^src_decimals * PRECISION)
//! ```
//!
//! solved for the destination amount (floor), the source amount (ceiling,
//! so a derived source always covers its target destination), or the rate
//! (floor). Factors of ten are folded into whichever side keeps every
//! divisor inside `u128`; the remaining product widens to 256 bits in
//! [`mul_div`].

use crate::domain::{Amount, Decimals, Rate, Rounding};
use crate::error::{DexError, Result};

use super::mul_div;

/// Largest quantity the engine will quote or trade, in smallest units.
pub const MAX_QTY: u128 = 10u128.pow(28);

/// Largest plausible conversion rate. Quotes above this are discarded.
pub const MAX_RATE: u128 = 10u128.pow(25);

/// Largest supported decimal-place difference between conversion sides.
pub const MAX_DECIMAL_DIFF: u8 = 18;

const fn pow10(exp: u8) -> u128 {
    10u128.pow(exp as u32)
}

fn check_qty(amount: Amount, detail: &'static str) -> Result<()> {
    if amount.get() > MAX_QTY {
        return Err(DexError::InvalidQuantity(detail));
    }
    Ok(())
}

fn check_rate(rate: Rate) -> Result<()> {
    if rate.get() > MAX_RATE {
        return Err(DexError::InvalidInput("rate above plausible cap"));
    }
    Ok(())
}

fn check_diff(a: Decimals, b: Decimals) -> Result<u8> {
    let diff = a.abs_diff(&b);
    if diff > MAX_DECIMAL_DIFF {
        return Err(DexError::InvalidPrecision(
            "decimal difference exceeds 18 places",
        ));
    }
    Ok(diff)
}

/// Destination amount bought by `src_amount` at `rate`, rounded down.
///
/// # Errors
///
/// Rejects quantities above [`MAX_QTY`], rates above [`MAX_RATE`], and
/// decimal differences above [`MAX_DECIMAL_DIFF`]; returns
/// [`DexError::Overflow`] if the result does not fit `u128`.
pub fn calc_dest_amount(
    src_amount: Amount,
    src_decimals: Decimals,
    dest_decimals: Decimals,
    rate: Rate,
) -> Result<Amount> {
    check_qty(src_amount, "source quantity above tradable cap")?;
    check_rate(rate)?;
    let diff = check_diff(src_decimals, dest_decimals)?;

    // dest >= src decimals: src * rate * 10^diff / P == src * rate / 10^(18-diff)
    // dest <  src decimals: src * rate / (P * 10^diff)
    let divisor = if dest_decimals >= src_decimals {
        pow10(MAX_DECIMAL_DIFF - diff)
    } else {
        Rate::PRECISION * pow10(diff)
    };
    mul_div(src_amount.get(), rate.get(), divisor, Rounding::Down)
        .map(Amount::new)
        .ok_or(DexError::Overflow("destination amount"))
}

/// Source amount needed to buy `dest_amount` at `rate`, rounded up.
///
/// The ceiling guarantees that converting the returned source forward at
/// the same rate yields at least `dest_amount`.
///
/// # Errors
///
/// Rejects quantities above [`MAX_QTY`], rates above [`MAX_RATE`], zero
/// rates, and decimal differences above [`MAX_DECIMAL_DIFF`]; returns
/// [`DexError::Overflow`] if the result does not fit `u128`.
pub fn calc_src_amount(
    dest_amount: Amount,
    src_decimals: Decimals,
    dest_decimals: Decimals,
    rate: Rate,
) -> Result<Amount> {
    check_qty(dest_amount, "destination quantity above tradable cap")?;
    check_rate(rate)?;
    if rate.is_zero() {
        return Err(DexError::DivisionByZero("source derivation at zero rate"));
    }
    let diff = check_diff(src_decimals, dest_decimals)?;

    // src >= dest decimals: dest * P * 10^diff / rate
    // src <  dest decimals: dest * P / (rate * 10^diff) == dest * 10^(18-diff) / rate
    let factor = if src_decimals >= dest_decimals {
        Rate::PRECISION * pow10(diff)
    } else {
        pow10(MAX_DECIMAL_DIFF - diff)
    };
    mul_div(dest_amount.get(), factor, rate.get(), Rounding::Up)
        .map(Amount::new)
        .ok_or(DexError::Overflow("source amount"))
}

/// Rate realized by an executed conversion, rounded down.
///
/// Used for slippage checks against actual settled amounts; the result is
/// deliberately NOT capped by [`MAX_RATE`] since it only feeds comparisons.
///
/// # Errors
///
/// Rejects quantities above [`MAX_QTY`], a zero source quantity, and
/// decimal differences above [`MAX_DECIMAL_DIFF`].
pub fn calc_rate_from_amounts(
    src_amount: Amount,
    dest_amount: Amount,
    src_decimals: Decimals,
    dest_decimals: Decimals,
) -> Result<Rate> {
    check_qty(src_amount, "source quantity above tradable cap")?;
    check_qty(dest_amount, "destination quantity above tradable cap")?;
    if src_amount.is_zero() {
        return Err(DexError::InvalidQuantity("zero source quantity"));
    }
    let diff = check_diff(src_decimals, dest_decimals)?;

    // dest >= src decimals: dest * P / (10^diff * src) == dest * 10^(18-diff) / src
    // dest <  src decimals: dest * P * 10^diff / src
    let factor = if dest_decimals >= src_decimals {
        pow10(MAX_DECIMAL_DIFF - diff)
    } else {
        Rate::PRECISION * pow10(diff)
    };
    mul_div(dest_amount.get(), factor, src_amount.get(), Rounding::Down)
        .map(Rate::new)
        .ok_or(DexError::Overflow("realized rate"))
}

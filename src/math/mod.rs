//! Arithmetic utilities for quote conversion and settlement accounting.
//!
//! This module provides [`CheckedArithmetic`] for overflow-safe amount
//! operations, [`mul_div`] for 256-bit-widened multiply-then-divide, and
//! the decimal-normalized conversion functions relating source amounts,
//! destination amounts, and rates.

mod checked;
mod conversion;
mod mul_div;

pub use checked::CheckedArithmetic;
pub use conversion::{
    calc_dest_amount, calc_rate_from_amounts, calc_src_amount, MAX_DECIMAL_DIFF, MAX_QTY,
    MAX_RATE,
};
pub use mul_div::mul_div;

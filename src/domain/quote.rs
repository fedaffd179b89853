//! A single reserve's answer to a rate survey.

use super::{Amount, Rate, ReserveId};

/// One reserve's quote for converting a concrete source quantity.
///
/// Quotes are a function of the FULL requested quantity — not a marginal
/// price — and are gathered fresh for every trade, never cached. The
/// destination amount is pre-computed with the decimal-normalizing
/// conversion so selection can compare outputs directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    reserve: ReserveId,
    src_amount: Amount,
    rate: Rate,
    dest_amount: Amount,
}

impl Quote {
    /// Assembles a quote record.
    #[must_use]
    pub const fn new(
        reserve: ReserveId,
        src_amount: Amount,
        rate: Rate,
        dest_amount: Amount,
    ) -> Self {
        Self {
            reserve,
            src_amount,
            rate,
            dest_amount,
        }
    }

    /// The quoting reserve.
    #[must_use]
    pub const fn reserve(&self) -> ReserveId {
        self.reserve
    }

    /// The source quantity the quote was computed for.
    #[must_use]
    pub const fn src_amount(&self) -> Amount {
        self.src_amount
    }

    /// The quoted conversion rate.
    #[must_use]
    pub const fn rate(&self) -> Rate {
        self.rate
    }

    /// The destination amount this quote would deliver.
    #[must_use]
    pub const fn dest_amount(&self) -> Amount {
        self.dest_amount
    }
}

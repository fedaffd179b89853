//! Per-leg quote collection and selection.
//!
//! The quoter turns the registry's listings into usable [`Quote`]s for
//! one conversion leg.  A listed reserve is excluded when:
//!
//! - the registry has no flags for it (unknown reserve),
//! - it has no live implementation in the [`ReserveBook`],
//! - it declines to quote or quotes a zero rate,
//! - its rate exceeds the plausible cap, or
//! - the conversion overflows or floors to a zero destination.
//!
//! Exclusion is silent with respect to the trade: a leg fails only when
//! *no* candidate survives.
//!
//! # Selection
//!
//! [`best`](LegQuoter::best) maximizes destination amount; exact ties
//! break toward the lowest [`crate::domain::ReserveId`], making
//! selection fully deterministic for a given set of quotes.

use tracing::trace;

use crate::domain::{Amount, Quote, ReserveFlags, ReserveId, Token};
use crate::math::{calc_dest_amount, MAX_RATE};
use crate::traits::ReserveRegistry;

use super::ReserveBook;

/// Returns `true` if `candidate` beats `incumbent` under the
/// deterministic ordering: larger output wins, equal output goes to the
/// lower reserve id.
pub(crate) fn better(candidate: &Quote, incumbent: &Quote) -> bool {
    candidate.dest_amount() > incumbent.dest_amount()
        || (candidate.dest_amount() == incumbent.dest_amount()
            && candidate.reserve() < incumbent.reserve())
}

/// Borrowed view quoting one leg against the book and registry.
pub(crate) struct LegQuoter<'a, R> {
    book: &'a ReserveBook,
    registry: &'a R,
}

impl<'a, R: ReserveRegistry> LegQuoter<'a, R> {
    pub(crate) fn new(book: &'a ReserveBook, registry: &'a R) -> Self {
        Self { book, registry }
    }

    /// Listed candidates that are known to the registry and live in the
    /// book, with their fee treatment flags.
    pub(crate) fn eligible(&self, src: &Token, dest: &Token) -> Vec<(ReserveId, ReserveFlags)> {
        self.registry
            .reserves_for(src.address(), dest.address())
            .into_iter()
            .filter_map(|id| {
                let Some(flags) = self.registry.flags(id) else {
                    trace!(reserve = %id, "listed reserve has no flags, skipped");
                    return None;
                };
                if self.book.get(id).is_none() {
                    trace!(reserve = %id, "listed reserve not live, skipped");
                    return None;
                }
                Some((id, flags))
            })
            .collect()
    }

    /// Quotes one candidate, applying every exclusion rule.
    pub(crate) fn quote_one(
        &self,
        id: ReserveId,
        src: &Token,
        dest: &Token,
        src_qty: Amount,
    ) -> Option<Quote> {
        let reserve = self.book.get(id)?;
        let rate = reserve.conversion_rate(src, dest, src_qty)?;
        if rate.is_zero() {
            return None;
        }
        if rate.get() > MAX_RATE {
            trace!(reserve = %id, rate = %rate, "rate above plausible cap, skipped");
            return None;
        }
        let dest_amount =
            calc_dest_amount(src_qty, src.decimals(), dest.decimals(), rate).ok()?;
        if dest_amount.is_zero() {
            return None;
        }
        Some(Quote::new(id, src_qty, rate, dest_amount))
    }

    /// Best quote for a leg where every candidate converts the same
    /// quantity.
    pub(crate) fn best(
        &self,
        src: &Token,
        dest: &Token,
        src_qty: Amount,
    ) -> Option<(Quote, ReserveFlags)> {
        let mut selected: Option<(Quote, ReserveFlags)> = None;
        for (id, flags) in self.eligible(src, dest) {
            let Some(quote) = self.quote_one(id, src, dest, src_qty) else {
                continue;
            };
            let replace = match &selected {
                Some((incumbent, _)) => better(&quote, incumbent),
                None => true,
            };
            if replace {
                selected = Some((quote, flags));
            }
        }
        selected
    }
}

//! Quote collection, best-of-all matching, and destination capping.
//!
//! The engine turns a trade request into a [`MatchOutcome`]: it quotes
//! every listed reserve per leg through the internal quoter, selects
//! deterministically, prices network and platform fees against the
//! reference-asset trade value, and can shrink a matched outcome to a
//! destination cap without re-quoting.

mod hint;
mod matching;
mod outcome;
mod quoter;
mod reserve_book;

#[cfg(test)]
mod proptest_properties;

pub use hint::Hint;
pub use matching::MatchingEngine;
pub use outcome::{LegPlan, MatchOutcome};
pub use reserve_book::ReserveBook;

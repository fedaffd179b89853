//! Matching strategy hints.

/// Caller-supplied matching strategy for a trade.
///
/// Marked `#[non_exhaustive]` so new strategies (splits, inclusion or
/// exclusion masks) can be added without breaking callers; matching on a
/// `Hint` outside this crate requires a wildcard arm.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Hint {
    /// Quote every listed reserve per leg and take the best output,
    /// breaking exact ties toward the lowest reserve id.
    #[default]
    BestOfAll,
}

//! Reserve listing and metadata lookup.
//!
//! [`ReserveRegistry`] answers three questions the matching engine asks
//! on every trade: which reserves serve a directed pair, what fee
//! treatment a reserve gets, and where its rebates go.
//!
//! # Listing Model
//!
//! Listings are per *directed* pair.  A reserve listed for selling a
//! token (token → reference asset) is not automatically listed for
//! buying it, and the two legs of a token-to-token trade are resolved
//! independently.
//!
//! # Consistency
//!
//! The registry is the single source of truth for reserve metadata.  A
//! reserve id returned by [`ReserveRegistry::reserves_for`] must also
//! answer [`ReserveRegistry::flags`]; ids that fail the flags lookup
//! are treated as unknown and excluded from matching.

use crate::domain::{AccountId, ReserveFlags, ReserveId, TokenAddress};

/// Trait for the reserve listing authority.
///
/// # Implementors
///
/// Production registries mirror an external listing service; tests use
/// static in-memory maps.  Lookups are infallible by design — an id the
/// registry does not know simply yields `None`.
pub trait ReserveRegistry {
    /// Returns the reserves listed for converting `src` into `dest`.
    ///
    /// Order is not significant; the matching engine re-sorts candidates
    /// by quoted output.  An empty list means no reserve serves the pair.
    #[must_use]
    fn reserves_for(&self, src: TokenAddress, dest: TokenAddress) -> Vec<ReserveId>;

    /// Returns the fee treatment flags for a reserve.
    ///
    /// `None` marks the reserve as unknown; the engine excludes unknown
    /// reserves from matching entirely.
    #[must_use]
    fn flags(&self, reserve: ReserveId) -> Option<ReserveFlags>;

    /// Returns the wallet entitled to a reserve's rebates.
    ///
    /// `None` for reserves with no rebate wallet on file; their rebate
    /// share is redirected into the burnable remainder at fee time.
    #[must_use]
    fn rebate_wallet(&self, reserve: ReserveId) -> Option<AccountId>;
}

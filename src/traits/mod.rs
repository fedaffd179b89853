//! Core trait abstractions at the engine's trust boundaries.
//!
//! This module defines the seams to everything the engine does not own:
//! [`Reserve`] for external liquidity sources, [`ReserveRegistry`] for
//! the listing authority, and [`Governance`] for fee levels and epoch
//! time.

mod governance;
mod registry;
mod reserve;

pub use governance::{Governance, RewardRebateSplit};
pub use registry::ReserveRegistry;
pub use reserve::Reserve;

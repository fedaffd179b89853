//! Owned collection of live reserve implementations.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::ReserveId;
use crate::error::{DexError, Result};
use crate::traits::Reserve;

/// The reserves currently available to the matching engine, keyed by id.
///
/// The book owns the boxed implementations; listing metadata (flags,
/// rebate wallets, served pairs) stays with the registry.  A reserve in
/// the book but not listed for a pair is never quoted, and a listed id
/// missing from the book is skipped.
#[derive(Default)]
pub struct ReserveBook {
    reserves: BTreeMap<ReserveId, Box<dyn Reserve>>,
}

impl ReserveBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reserves: BTreeMap::new(),
        }
    }

    /// Adds a reserve under `id`.
    ///
    /// # Errors
    ///
    /// [`DexError::InvalidInput`] if the id is already present.
    pub fn insert(&mut self, id: ReserveId, reserve: Box<dyn Reserve>) -> Result<()> {
        if self.reserves.contains_key(&id) {
            return Err(DexError::InvalidInput("reserve id already in book"));
        }
        self.reserves.insert(id, reserve);
        Ok(())
    }

    /// Removes and returns the reserve under `id`.
    ///
    /// # Errors
    ///
    /// [`DexError::UnknownReserve`] if the id is not present.
    pub fn remove(&mut self, id: ReserveId) -> Result<Box<dyn Reserve>> {
        self.reserves
            .remove(&id)
            .ok_or(DexError::UnknownReserve("reserve not in book"))
    }

    /// Returns the reserve under `id`, if present.
    #[must_use]
    pub fn get(&self, id: ReserveId) -> Option<&dyn Reserve> {
        self.reserves.get(&id).map(AsRef::as_ref)
    }

    /// Returns the reserve under `id` for trading.
    #[must_use]
    pub fn get_mut(&mut self, id: ReserveId) -> Option<&mut (dyn Reserve + 'static)> {
        self.reserves.get_mut(&id).map(AsMut::as_mut)
    }

    /// Returns the number of reserves in the book.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reserves.len()
    }

    /// Returns `true` if the book holds no reserves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reserves.is_empty()
    }

    /// Iterates over the ids in the book in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ReserveId> + '_ {
        self.reserves.keys().copied()
    }
}

impl fmt::Debug for ReserveBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReserveBook")
            .field("reserves", &self.ids().collect::<Vec<_>>())
            .finish()
    }
}

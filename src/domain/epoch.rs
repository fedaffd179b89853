//! Fee-accrual epoch.

use core::fmt;

/// Index of a fee-accrual period.
///
/// Governance defines epoch boundaries; this crate only buckets accrued
/// rewards by the epoch governance reports at settlement time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(u64);

impl Epoch {
    /// Creates an `Epoch` from a raw index.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying index.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_and_display() {
        let e = Epoch::new(3);
        assert_eq!(e.get(), 3);
        assert_eq!(format!("{e}"), "epoch 3");
    }

    #[test]
    fn ordering() {
        assert!(Epoch::new(2) < Epoch::new(3));
        assert_eq!(Epoch::default(), Epoch::new(0));
    }

    #[test]
    fn copy_semantics() {
        let e = Epoch::new(1);
        let copy = e;
        assert_eq!(e, copy);
    }
}

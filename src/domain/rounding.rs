//! Explicit rounding direction for integer division.

/// Specifies how a division discards its remainder.
///
/// Every division in the engine names its rounding explicitly. Destination
/// amounts round down so a trade can never overpay; inverse source-quantity
/// derivations round up so the derived source always covers the requested
/// destination.
///
/// # Examples
///
/// ```
/// use argus_dex::domain::Rounding;
///
/// let r = Rounding::Down;
/// assert!(r.is_down());
/// assert!(!r.is_up());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round away from zero when a remainder exists (ceiling).
    Up,
    /// Truncate toward zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Returns `true` if this is [`Rounding::Down`].
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }
}

//! Reserve identity and fee-participation flags.

use core::fmt;

/// Identifier of a listed reserve.
///
/// Ids are assigned by the external registry. Their total order is
/// load-bearing: when two reserves quote the exact same destination amount,
/// the engine deterministically selects the LOWEST id.
///
/// # Examples
///
/// ```
/// use argus_dex::domain::ReserveId;
///
/// let a = ReserveId::new(1);
/// let b = ReserveId::new(2);
/// assert!(a < b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReserveId(u64);

impl ReserveId {
    /// Creates a `ReserveId` from a raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReserveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reserve#{}", self.0)
    }
}

/// Per-reserve fee participation, as recorded by the registry.
///
/// `fee_accounted` decides whether trades through the reserve contribute
/// network fee revenue; `rebate_entitled` decides whether the reserve's
/// rebate wallet earns a share of that revenue. A reserve can be fee
/// accounted without being rebate entitled, but never the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReserveFlags {
    /// Trades through this reserve pay the network fee.
    pub fee_accounted: bool,
    /// The reserve's rebate wallet earns a rebate share.
    pub rebate_entitled: bool,
}

impl ReserveFlags {
    /// Flags for a reserve that pays fees and earns rebates.
    pub const FEE_PAYING: Self = Self {
        fee_accounted: true,
        rebate_entitled: true,
    };

    /// Flags for a reserve outside the fee system entirely.
    pub const EXEMPT: Self = Self {
        fee_accounted: false,
        rebate_entitled: false,
    };

    /// Returns `true` for the one inconsistent combination: rebates without
    /// fee accounting.
    #[must_use]
    pub const fn is_inconsistent(&self) -> bool {
        self.rebate_entitled && !self.fee_accounted
    }
}

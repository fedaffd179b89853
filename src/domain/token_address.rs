//! Chain-agnostic token address.

use core::fmt;

/// A generic, chain-agnostic address identifying a token.
///
/// Wraps a fixed-size `[u8; 32]` byte array. All 32-byte sequences are
/// valid addresses, so construction is infallible. The native reference
/// asset is identified by the dedicated sentinel
/// [`REFERENCE`](Self::REFERENCE) rather than a real deployment address.
///
/// # Examples
///
/// ```
/// use argus_dex::domain::TokenAddress;
///
/// let addr = TokenAddress::from_bytes([7u8; 32]);
/// assert_eq!(addr.as_bytes(), [7u8; 32]);
/// assert_ne!(addr, TokenAddress::REFERENCE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAddress([u8; 32]);

impl TokenAddress {
    /// Sentinel address of the native reference asset.
    pub const REFERENCE: Self = Self([0xEE; 32]);

    /// Creates a `TokenAddress` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns `true` if this is the reference-asset sentinel.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        let mut i = 0;
        while i < 32 {
            if self.0[i] != 0xEE {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_reference() {
            return write!(f, "native");
        }
        write!(
            f,
            "0x{:02x}{:02x}{:02x}{:02x}..",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

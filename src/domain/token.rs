//! Token identity type.

use super::{Decimals, TokenAddress};

/// The canonical identity of a tradable token.
///
/// Combines a [`TokenAddress`] with its [`Decimals`]. Two tokens are equal
/// only if both match. The native reference asset — the hub every routed
/// trade passes through — is [`Token::reference()`].
///
/// # Examples
///
/// ```
/// use argus_dex::domain::{Decimals, Token, TokenAddress};
///
/// let dgx = Token::new(
///     TokenAddress::from_bytes([1u8; 32]),
///     Decimals::new(9).expect("valid"),
/// );
/// assert!(!dgx.is_reference());
/// assert!(Token::reference().is_reference());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    address: TokenAddress,
    decimals: Decimals,
}

impl Token {
    /// Creates a new `Token`.
    ///
    /// Infallible: both components are validated at their own construction
    /// sites.
    #[must_use]
    pub const fn new(address: TokenAddress, decimals: Decimals) -> Self {
        Self { address, decimals }
    }

    /// The native reference asset (18 decimal places, sentinel address).
    #[must_use]
    pub const fn reference() -> Self {
        Self {
            address: TokenAddress::REFERENCE,
            decimals: Decimals::NATIVE,
        }
    }

    /// Returns the token address.
    #[must_use]
    pub const fn address(&self) -> TokenAddress {
        self.address
    }

    /// Returns the token decimals.
    #[must_use]
    pub const fn decimals(&self) -> Decimals {
        self.decimals
    }

    /// Returns `true` if this token is the native reference asset.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        self.address.is_reference()
    }
}

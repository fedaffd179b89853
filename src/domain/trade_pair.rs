//! Directional trade pair.

use core::fmt;

use super::Token;
use crate::error::DexError;

/// An ordered (source, destination) token pair.
///
/// Unlike a canonical pool pair, direction matters here: reserves are
/// listed per direction and a `src -> dest` listing says nothing about
/// `dest -> src`. Construction rejects identical endpoints.
///
/// # Examples
///
/// ```
/// use argus_dex::domain::{Decimals, Token, TokenAddress, TradePair};
///
/// let usd = Token::new(
///     TokenAddress::from_bytes([1u8; 32]),
///     Decimals::new(6).expect("valid"),
/// );
/// let pair = TradePair::new(usd, Token::reference()).expect("distinct");
/// assert_eq!(pair.src(), usd);
/// assert!(pair.dest().is_reference());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TradePair {
    src: Token,
    dest: Token,
}

impl TradePair {
    /// Creates a directional pair.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidToken`] if source and destination share
    /// an address.
    pub fn new(src: Token, dest: Token) -> crate::error::Result<Self> {
        if src.address() == dest.address() {
            return Err(DexError::InvalidToken("source equals destination"));
        }
        Ok(Self { src, dest })
    }

    /// Returns the source token.
    #[must_use]
    pub const fn src(&self) -> Token {
        self.src
    }

    /// Returns the destination token.
    #[must_use]
    pub const fn dest(&self) -> Token {
        self.dest
    }

    /// Returns `true` if either endpoint is the reference asset, i.e. the
    /// trade is a single leg rather than a routed two-leg composition.
    #[must_use]
    pub const fn touches_reference(&self) -> bool {
        self.src.is_reference() || self.dest.is_reference()
    }
}

impl fmt::Display for TradePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |t: &Token| {
            if t.is_reference() {
                "native"
            } else {
                "token"
            }
        };
        write!(f, "{}->{}", side(&self.src), side(&self.dest))
    }
}

//! Interoperability with code that expects `core::error::Error`.
//!
//! [`Chain`] does not implement [`Error`] itself, which is what allows
//! `?` to convert any error into a chain. When a chain has to cross an API
//! that takes `Box<dyn Error + Send + Sync>`, convert it with
//! [`Chain::into_error`] or [`IntoBoxedError`]. The resulting [`ChainError`]
//! displays the outermost message and exposes the rest of the chain through
//! [`Error::source`]. Converting it back with [`Chain::from_boxed_error`] or
//! [`IntoChain`](crate::IntoChain) restores the original chain, node for node.
//!
//! ```
//! use std::error::Error;
//!
//! use errtrail::{Chain, Code, compat::IntoBoxedError};
//!
//! fn legacy() -> Result<(), Box<dyn Error + Send + Sync>> {
//!     let chain = Chain::new("socket closed").wrap(Code::UNKNOWN, "sync failed");
//!     Err(chain).into_boxed_error()
//! }
//!
//! let error = legacy().unwrap_err();
//! assert_eq!(error.to_string(), "sync failed");
//! assert_eq!(error.source().unwrap().to_string(), "socket closed");
//!
//! let chain = Chain::from_boxed_error(error);
//! assert_eq!(chain.len(), 2);
//! ```

use alloc::boxed::Box;
use core::{error::Error, fmt};

use crate::{Chain, Frame, into_chain};

/// A [`Chain`] viewed as a [`core::error::Error`].
///
/// Each level displays one node, outermost first. The last level's source is
/// the source of the root cause's foreign error, if there is one.
pub struct ChainError {
    chain: Chain,
    next: Option<Box<ChainError>>,
}

impl ChainError {
    fn new(chain: Chain) -> Self {
        let next = chain.unwrap().map(|rest| Box::new(Self::new(rest)));
        Self { chain, next }
    }

    /// The chain this error was created from.
    #[must_use]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub(crate) fn into_chain_inner(self) -> Chain {
        self.chain
    }
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.chain.outermost(), f)
    }
}

impl fmt::Debug for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.chain, f)
    }
}

impl Error for ChainError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.next {
            Some(next) => Some(&**next),
            None => self.chain.cause().source_error().and_then(Error::source),
        }
    }
}

impl Chain {
    /// Converts the chain into a value implementing [`core::error::Error`].
    #[must_use]
    pub fn into_error(self) -> ChainError {
        ChainError::new(self)
    }

    /// Converts a boxed error into a chain.
    ///
    /// A boxed [`ChainError`] is unpacked into the chain it was created from.
    /// Any other error becomes a chain with a single node located at the
    /// caller.
    #[track_caller]
    #[must_use]
    pub fn from_boxed_error(error: Box<dyn Error + Send + Sync + 'static>) -> Self {
        into_chain::from_boxed(error, Frame::capture())
    }
}

/// Converts chains, and results holding them, into boxed errors.
pub trait IntoBoxedError {
    /// The type produced by the conversion.
    type Output;

    /// Performs the conversion.
    fn into_boxed_error(self) -> Self::Output;
}

impl IntoBoxedError for Chain {
    type Output = Box<dyn Error + Send + Sync>;

    fn into_boxed_error(self) -> Self::Output {
        Box::new(self.into_error())
    }
}

impl<T> IntoBoxedError for Result<T, Chain> {
    type Output = Result<T, Box<dyn Error + Send + Sync>>;

    fn into_boxed_error(self) -> Self::Output {
        self.map_err(Chain::into_boxed_error)
    }
}

impl From<Chain> for Box<dyn Error + Send + Sync> {
    fn from(chain: Chain) -> Self {
        chain.into_boxed_error()
    }
}

impl From<Chain> for Box<dyn Error> {
    fn from(chain: Chain) -> Self {
        Box::new(chain.into_error())
    }
}

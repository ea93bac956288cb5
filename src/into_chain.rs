use alloc::boxed::Box;
use core::error::Error;

use crate::{Chain, Code, Frame, Node, compat::ChainError};

/// Converts errors and chains into a [`Chain`].
///
/// This trait is the bound of the operations that absorb another error, such
/// as [`Chain::with`] and [`Chain::from_error`]. It is implemented for:
/// - [`Chain`], which is returned unchanged;
/// - every `core::error::Error + Send + Sync + 'static`, which becomes a
///   chain with a single node located at the caller. A [`ChainError`] is
///   unpacked into the chain it was created from instead.
///
/// ```
/// use std::io;
///
/// use errtrail::{Chain, IntoChain};
///
/// let chain = io::Error::other("connection refused").into_chain();
/// assert_eq!(chain.len(), 1);
/// assert!(chain.downcast_ref::<io::Error>().is_some());
///
/// let error = Chain::new("a").wrap(errtrail::Code::UNKNOWN, "b").into_error();
/// assert_eq!(error.into_chain().len(), 2);
/// ```
pub trait IntoChain {
    /// Converts `self` into a [`Chain`].
    #[track_caller]
    #[must_use]
    fn into_chain(self) -> Chain;
}

impl IntoChain for Chain {
    #[inline(always)]
    fn into_chain(self) -> Chain {
        self
    }
}

impl<E> IntoChain for E
where
    E: Error + Send + Sync + 'static,
{
    fn into_chain(self) -> Chain {
        from_boxed(Box::new(self), Frame::capture())
    }
}

/// Unpacks a [`ChainError`], or absorbs any other error as a new node.
pub(crate) fn from_boxed(error: Box<dyn Error + Send + Sync + 'static>, frame: Frame) -> Chain {
    match error.downcast::<ChainError>() {
        Ok(wrapper) => wrapper.into_chain_inner(),
        Err(error) => Chain::from_node(Node::from_error(error, Code::UNKNOWN, frame)),
    }
}

impl<E> From<E> for Chain
where
    E: Error + Send + Sync + 'static,
{
    #[track_caller]
    fn from(error: E) -> Self {
        error.into_chain()
    }
}

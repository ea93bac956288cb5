//! A chain that several threads extend together.
//!
//! [`Chain`] itself is an immutable value: extending it produces a new chain
//! and leaves every other copy untouched. When several threads contribute to
//! what is logically one error, for example workers reporting partial
//! failures of a batch, they share a [`SharedChain`] instead. Each update
//! takes a short lock, replaces the stored chain and hands back an
//! independently owned snapshot, so no lock is ever held across calls.
//!
//! ```
//! use std::thread;
//!
//! use errtrail::{Chain, chain::shared::SharedChain};
//!
//! let shared = SharedChain::new(Chain::new("batch failed"));
//! thread::scope(|scope| {
//!     for item in 0..4 {
//!         let shared = &shared;
//!         scope.spawn(move || shared.add(format!("item {item} rejected")));
//!     }
//! });
//!
//! let chain = shared.snapshot();
//! assert_eq!(chain.len(), 5);
//! assert_eq!(chain.message(), "batch failed");
//! ```

use alloc::{borrow::Cow, vec};
use core::fmt;

use triomphe::Arc;

use super::lock::ChainLock;
use crate::{Chain, Code, Frame, IntoChain, Node};

/// A lock protected [`Chain`] that is extended in place.
pub struct SharedChain {
    inner: ChainLock<Chain>,
}

impl SharedChain {
    /// Creates a shared cell holding `chain`.
    #[must_use]
    pub fn new(chain: Chain) -> Self {
        Self {
            inner: ChainLock::new(chain),
        }
    }

    /// Returns a copy of the current chain.
    #[must_use]
    pub fn snapshot(&self) -> Chain {
        self.inner.lock().get().clone()
    }

    /// Inserts a new node carrying `message` behind the outermost node and
    /// returns the resulting chain. See [`Chain::add`].
    #[track_caller]
    pub fn add(&self, message: impl Into<Cow<'static, str>>) -> Chain {
        let node = Node::from_message(message.into(), Code::UNKNOWN, Frame::capture());
        self.update(|chain| chain.splice_behind(vec![Arc::new(node)]))
    }

    /// Adds a new outermost node and returns the resulting chain. See
    /// [`Chain::wrap`].
    #[track_caller]
    pub fn wrap(&self, code: Code, message: impl Into<Cow<'static, str>>) -> Chain {
        let node = Node::from_message(message.into(), code, Frame::capture());
        self.update(|chain| chain.wrap_node(node))
    }

    /// Inserts `error` behind the outermost node and returns the resulting
    /// chain. See [`Chain::with`].
    #[track_caller]
    pub fn with(&self, error: impl IntoChain) -> Chain {
        let other = error.into_chain();
        self.update(|chain| chain.splice_behind(other.into_nodes()))
    }

    /// Records that the outermost error passed through the caller and returns
    /// the resulting chain. See [`Chain::track`].
    #[track_caller]
    pub fn track(&self) -> Chain {
        let frame = Frame::capture();
        self.update(|chain| chain.track_at(frame))
    }

    /// Consumes the cell and returns the chain it holds.
    #[must_use]
    pub fn into_inner(self) -> Chain {
        self.snapshot()
    }

    fn update(&self, f: impl FnOnce(Chain) -> Chain) -> Chain {
        let mut guard = self.inner.lock();
        let next = f(guard.get().clone());
        guard.replace(next.clone());
        next
    }
}

impl From<Chain> for SharedChain {
    fn from(chain: Chain) -> Self {
        Self::new(chain)
    }
}

impl fmt::Debug for SharedChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedChain").field(&self.snapshot()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returned_chains_are_independent() {
        let shared = SharedChain::new(Chain::new("root"));
        let first = shared.add("one");
        let second = shared.wrap(Code::FATAL, "two");

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 3);
        assert_eq!(second.message(), "two");
        assert_eq!(shared.snapshot().len(), 3);
    }

    #[test]
    fn test_track_records_caller() {
        let shared = SharedChain::from(Chain::new("root"));
        let (chain, line) = (shared.track(), line!());
        assert_eq!(chain.caller().line(), line);
        assert!(chain.cause().is_tracked());
        assert_eq!(chain.message(), "root");
    }

    #[test]
    fn test_with() {
        let shared = SharedChain::new(Chain::new("root").wrap(Code::UNKNOWN, "top"));
        let chain = shared.with(Chain::new("extra"));
        let messages: alloc::vec::Vec<_> = chain.nodes().map(|node| node.message()).collect();
        assert_eq!(messages, ["top", "extra", "root"]);
    }
}

//! Comparing and unwrapping chains.
//!
//! Two nodes stand for the same error when they share their payload: a node
//! produced by [`Chain::track`] or [`Chain::with_code`] is the same error as
//! the node it was derived from, while two chains created from equal
//! messages are not.
//!
//! The [`Target`] trait describes what a chain can be compared against:
//!
//! | target          | matches                                            |
//! |-----------------|----------------------------------------------------|
//! | [`Chain`]       | a node sharing the outermost error of that chain   |
//! | [`Node`]        | a node sharing that node's error                   |
//! | [`Code`]        | a node carrying that code                          |
//! | [`ErrorEq`]     | a foreign error of that type comparing equal       |
//! | [`Matches`]     | a node for which the predicate returns `true`      |
//!
//! ```
//! use errtrail::{Chain, Code, traverse::Matches};
//!
//! let root = Chain::coded(Code::new(102), "unexpected eof");
//! let chain = root.clone().wrap(Code::new(201), "invalid json");
//!
//! assert!(chain.has(&root));
//! assert!(!chain.is(&root));
//! assert!(chain.unwrap().unwrap().is(&root));
//! assert!(chain.has(&Code::new(102)));
//! assert!(chain.is(&Matches(|node: &errtrail::Node| node.code() == Code::new(102))));
//! ```

use core::error::Error;

use crate::{Chain, Code, Node};

/// Something a [`Chain`] can be compared against.
pub trait Target {
    /// Returns `true` if `node` stands for the same error as `self`.
    fn is_same(&self, node: &Node) -> bool;

    /// A custom match that [`Chain::is`] applies to every node, not only to
    /// the outermost one.
    fn satisfied_by(&self, node: &Node) -> bool {
        let _ = node;
        false
    }
}

impl Target for Chain {
    fn is_same(&self, node: &Node) -> bool {
        self.outermost().same_error(node)
    }
}

impl Target for Node {
    fn is_same(&self, node: &Node) -> bool {
        self.same_error(node)
    }
}

impl Target for Code {
    fn is_same(&self, node: &Node) -> bool {
        node.code() == *self
    }
}

impl<T: Target + ?Sized> Target for &T {
    fn is_same(&self, node: &Node) -> bool {
        (**self).is_same(node)
    }

    fn satisfied_by(&self, node: &Node) -> bool {
        (**self).satisfied_by(node)
    }
}

/// `None` matches nothing.
impl<T: Target> Target for Option<T> {
    fn is_same(&self, node: &Node) -> bool {
        self.as_ref().is_some_and(|target| target.is_same(node))
    }

    fn satisfied_by(&self, node: &Node) -> bool {
        self.as_ref().is_some_and(|target| target.satisfied_by(node))
    }
}

/// Matches nodes whose foreign error, or any error in its source chain, has
/// type `E` and compares equal to the wrapped value.
#[derive(Clone, Copy, Debug)]
pub struct ErrorEq<'a, E>(pub &'a E);

impl<E: Error + PartialEq + 'static> Target for ErrorEq<'_, E> {
    fn is_same(&self, node: &Node) -> bool {
        let mut current = node.source_error();
        while let Some(error) = current {
            if error.downcast_ref::<E>() == Some(self.0) {
                return true;
            }
            current = error.source();
        }
        false
    }
}

/// Matches nodes for which the predicate returns `true`.
///
/// The predicate is a custom match: [`Chain::is`] applies it to every node.
#[derive(Clone, Copy, Debug)]
pub struct Matches<F>(pub F);

impl<F: Fn(&Node) -> bool> Target for Matches<F> {
    fn is_same(&self, node: &Node) -> bool {
        (self.0)(node)
    }

    fn satisfied_by(&self, node: &Node) -> bool {
        (self.0)(node)
    }
}

impl Chain {
    /// Returns `true` if the outermost node is `target`, or if `target` is a
    /// custom match satisfied by any node.
    #[must_use]
    pub fn is<T: Target + ?Sized>(&self, target: &T) -> bool {
        target.is_same(self.outermost()) || self.nodes().any(|node| target.satisfied_by(node))
    }

    /// Returns `true` if any node is `target`.
    #[must_use]
    pub fn has<T: Target + ?Sized>(&self, target: &T) -> bool {
        self.nodes()
            .any(|node| target.is_same(node) || target.satisfied_by(node))
    }

    /// Returns the chain without its outermost node, or `None` for the root
    /// cause.
    #[must_use]
    pub fn unwrap(&self) -> Option<Chain> {
        if self.len() == 1 {
            return None;
        }
        let mut nodes = self.clone().into_nodes();
        nodes.remove(0);
        Some(Chain::from_nodes(nodes))
    }

    /// Returns the first foreign error of type `E`, outermost node first.
    ///
    /// The source chain of every foreign error is searched as well.
    ///
    /// ```
    /// use std::io;
    ///
    /// use errtrail::{Chain, Code};
    ///
    /// let chain = Chain::from_error(io::Error::from(io::ErrorKind::UnexpectedEof), None)
    ///     .wrap(Code::UNKNOWN, "reading header");
    ///
    /// let io = chain.downcast_ref::<io::Error>().unwrap();
    /// assert_eq!(io.kind(), io::ErrorKind::UnexpectedEof);
    /// ```
    #[must_use]
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.nodes().find_map(|node| {
            let mut current = node.source_error();
            while let Some(error) = current {
                if let Some(found) = error.downcast_ref::<E>() {
                    return Some(found);
                }
                current = error.source();
            }
            None
        })
    }
}

/// [`Chain::is`] for an optional chain. `None` is nothing.
#[must_use]
pub fn is<T: Target + ?Sized>(chain: Option<&Chain>, target: &T) -> bool {
    chain.is_some_and(|chain| chain.is(target))
}

/// [`Chain::has`] for an optional chain. `None` has nothing.
#[must_use]
pub fn has<T: Target + ?Sized>(chain: Option<&Chain>, target: &T) -> bool {
    chain.is_some_and(|chain| chain.has(target))
}

/// [`Chain::unwrap`] for an optional chain.
#[must_use]
pub fn unwrap(chain: Option<&Chain>) -> Option<Chain> {
    chain.and_then(Chain::unwrap)
}

/// The cause of a foreign error.
#[must_use]
pub fn unwrap_error<'a>(error: &'a (dyn Error + 'static)) -> Option<&'a (dyn Error + 'static)> {
    error.source()
}

use core::{iter::FusedIterator, slice};

use triomphe::Arc;

use crate::Node;

/// An iterator over the nodes of a [`Chain`](crate::Chain), outermost first.
///
/// Created by [`Chain::nodes`](crate::Chain::nodes).
#[must_use]
#[derive(Clone)]
pub struct Nodes<'a> {
    inner: slice::Iter<'a, Arc<Node>>,
}

impl<'a> Nodes<'a> {
    pub(super) fn new(nodes: &'a [Arc<Node>]) -> Self {
        Self {
            inner: nodes.iter(),
        }
    }
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|node| &**node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Nodes<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|node| &**node)
    }
}

impl ExactSizeIterator for Nodes<'_> {}

impl FusedIterator for Nodes<'_> {}

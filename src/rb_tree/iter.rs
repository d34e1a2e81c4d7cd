use core::fmt;
use core::iter::FusedIterator;

use crate::raw::{Arena, Handle, Node, Side};

/// Follows `side` links from `node` until there is none.
pub(super) fn extreme<T>(nodes: &Arena<Node<T>>, mut node: Handle, side: Side) -> Handle {
    while let Some(child) = nodes.get(node).child(side) {
        node = child;
    }
    node
}

/// Returns the in-order neighbour of `node` towards `side`, walking only child and parent links.
pub(super) fn neighbour<T>(nodes: &Arena<Node<T>>, node: Handle, side: Side) -> Option<Handle> {
    if let Some(child) = nodes.get(node).child(side) {
        return Some(extreme(nodes, child, side.opposite()));
    }
    let mut current = node;
    while let Some(parent) = nodes.get(current).parent() {
        if nodes.get(parent).child(side.opposite()) == Some(current) {
            return Some(parent);
        }
        current = parent;
    }
    None
}

#[inline]
pub(super) fn successor<T>(nodes: &Arena<Node<T>>, node: Handle) -> Option<Handle> {
    neighbour(nodes, node, Side::Right)
}

/// An iterator over the values of an [`RbTree`](crate::RbTree) in ascending order.
///
/// This `struct` is created by the [`iter`](crate::RbTree::iter) method on
/// [`RbTree`](crate::RbTree). It steps through the tree structurally, like
/// [`advance`](crate::RbTree::advance), and keeps no stack.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    nodes: &'a Arena<Node<T>>,
    next: Option<Handle>,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(nodes: &'a Arena<Node<T>>, first: Option<Handle>) -> Self {
        Self { nodes, next: first }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let current = self.next?;
        self.next = successor(self.nodes, current);
        Some(self.nodes.get(current).value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            Some(_) => (1, None),
            None => (0, Some(0)),
        }
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            next: self.next,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

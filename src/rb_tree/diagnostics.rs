use core::fmt;

use smallvec::SmallVec;

use super::{RbTree, iter};
use crate::compare::Comparator;
use crate::error::{Error, Violation};
use crate::raw::{Handle, Side};

/// Work stack for depth-first walks; the inline part covers any tree a `u32` handle can address.
type Stack = SmallVec<[(Handle, usize); 64]>;

/// A textual rendering of a tree's shape, created by [`RbTree::dump`].
///
/// Each node prints as `[left R value right]` or `[left B value right]`, omitting absent
/// children; an empty tree prints as `[]`.
#[must_use = "a dump does nothing unless formatted"]
pub struct Dump<'a, T, C> {
    tree: &'a RbTree<T, C>,
}

impl<T: fmt::Debug, C> fmt::Display for Dump<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tree.root {
            Some(root) => self.write_node(f, root),
            None => f.write_str("[]"),
        }
    }
}

impl<T: fmt::Debug, C> Dump<'_, T, C> {
    fn write_node(&self, f: &mut fmt::Formatter<'_>, handle: Handle) -> fmt::Result {
        let node = self.tree.nodes.get(handle);
        f.write_str("[")?;
        if let Some(left) = node.left() {
            self.write_node(f, left)?;
            f.write_str(" ")?;
        }
        let color = if node.is_red() { "R" } else { "B" };
        write!(f, "{color} {:?}", node.value())?;
        if let Some(right) = node.right() {
            f.write_str(" ")?;
            self.write_node(f, right)?;
        }
        f.write_str("]")
    }
}

impl<T, C> RbTree<T, C> {
    /// Renders the tree's shape and colors for debugging.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbTree;
    ///
    /// let mut tree: RbTree<i32> = RbTree::new();
    /// for value in [1, 2, 3] {
    ///     tree.insert(value);
    /// }
    /// assert_eq!(tree.dump().to_string(), "[[R 1] B 2 [R 3]]");
    /// ```
    pub fn dump(&self) -> Dump<'_, T, C> {
        Dump { tree: self }
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut stack = Stack::new();
        stack.extend(self.root.map(|root| (root, 1)));
        let mut height = 0;
        while let Some((handle, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.nodes.get(handle);
            stack.extend(node.left().map(|left| (left, depth + 1)));
            stack.extend(node.right().map(|right| (right, depth + 1)));
        }
        height
    }
}

impl<T, C: Comparator<T>> RbTree<T, C> {
    /// Verifies every red-black rule and returns the tree's black height: the number of black
    /// nodes on each path from the root to an absent child.
    ///
    /// Also checks the ordering, that parent links mirror child links, and that every
    /// allocated node is reachable. This walks the whole tree and is meant for tests and
    /// debugging.
    ///
    /// # Errors
    ///
    /// [`Error::InvariantViolation`] naming the first rule found broken.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbTree;
    ///
    /// let mut tree: RbTree<i32> = RbTree::new();
    /// tree.insert(1);
    /// tree.insert(2);
    /// assert_eq!(tree.check_invariants(), Ok(1));
    /// ```
    pub fn check_invariants(&self) -> Result<usize, Error> {
        let Some(root) = self.root else {
            return if self.nodes.is_empty() {
                Ok(0)
            } else {
                Err(Violation::LeakedNodes.into())
            };
        };
        let root_node = self.nodes.get(root);
        if root_node.is_red() {
            return Err(Violation::RedRoot.into());
        }
        if root_node.parent().is_some() {
            return Err(Violation::BrokenParentLink.into());
        }

        let mut black_height = None;
        let mut reachable = 0;
        let mut stack = Stack::new();
        stack.push((root, 1));
        while let Some((handle, blacks)) = stack.pop() {
            reachable += 1;
            let node = self.nodes.get(handle);
            for side in [Side::Left, Side::Right] {
                match node.child(side) {
                    Some(child) => {
                        let child_node = self.nodes.get(child);
                        if child_node.parent() != Some(handle) {
                            return Err(Violation::BrokenParentLink.into());
                        }
                        if node.is_red() && child_node.is_red() {
                            return Err(Violation::RedRedEdge.into());
                        }
                        stack.push((child, blacks + usize::from(!child_node.is_red())));
                    }
                    None => match black_height {
                        None => black_height = Some(blacks),
                        Some(expected) if expected != blacks => {
                            return Err(Violation::BlackHeightMismatch.into());
                        }
                        Some(_) => {}
                    },
                }
            }
        }
        if reachable != self.nodes.len() {
            return Err(Violation::LeakedNodes.into());
        }

        let mut previous = iter::extreme(&self.nodes, root, Side::Left);
        while let Some(next) = iter::successor(&self.nodes, previous) {
            let a = self.comparator.key(self.nodes.get(previous).value());
            let b = self.comparator.key(self.nodes.get(next).value());
            if !self.comparator.less(a, b) {
                return Err(Violation::OutOfOrder.into());
            }
            previous = next;
        }

        Ok(black_height.unwrap_or(0))
    }
}

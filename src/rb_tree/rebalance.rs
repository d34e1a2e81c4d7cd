//! Rotations and the recolor/rotate fixups that restore the red-black rules after an edit.
//!
//! Both fixups are written once for a node on either side; `Side` mirrors the cases.

use tracing::{error, trace};

use super::RbTree;
use crate::raw::{Handle, Side};

impl<T, C> RbTree<T, C> {
    /// Absent nodes count as black.
    #[inline]
    pub(super) fn is_red(&self, node: Option<Handle>) -> bool {
        node.is_some_and(|node| self.nodes.get(node).is_red())
    }

    #[inline]
    fn paint(&mut self, node: Handle, red: bool) {
        self.nodes.get_mut(node).set_red(red);
    }

    /// Which child of `parent` `child` is.
    #[inline]
    fn side_of(&self, child: Handle, parent: Handle) -> Side {
        if self.nodes.get(parent).left() == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Puts `new` in the slot `old` occupies under `parent`, or at the root.
    pub(super) fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            Some(parent) => {
                let side = self.side_of(old, parent);
                self.nodes.get_mut(parent).set_child(side, new);
            }
            None => self.root = new,
        }
        if let Some(new) = new {
            self.nodes.get_mut(new).set_parent(parent);
        }
    }

    /// Rotates `node` down towards `side`.
    ///
    /// `rotate(node, Side::Left)` is the classic left rotation: the right child takes `node`'s
    /// place, `node` becomes its left child, and the pivot's old left subtree moves under `node`.
    fn rotate(&mut self, node: Handle, side: Side) {
        let Some(pivot) = self.nodes.get(node).child(side.opposite()) else {
            corrupted("rotation without a pivot child");
        };
        let top = self.nodes.get(node).parent();
        self.replace_child(top, node, Some(pivot));

        let inner = self.nodes.get(pivot).child(side);
        self.nodes.get_mut(node).set_child(side.opposite(), inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).set_parent(Some(node));
        }

        self.nodes.get_mut(pivot).set_child(side, Some(node));
        self.nodes.get_mut(node).set_parent(Some(pivot));
    }

    /// Restores the rules after linking the red node `node`.
    pub(super) fn insert_fixup(&mut self, mut node: Handle) {
        loop {
            // Case 1: the node is the root.
            let Some(parent) = self.nodes.get(node).parent() else {
                self.paint(node, false);
                return;
            };
            // Case 2: a black parent absorbs a red child.
            if !self.nodes.get(parent).is_red() {
                return;
            }
            let Some(grandparent) = self.nodes.get(parent).parent() else {
                corrupted("red root during insertion");
            };
            let parent_side = self.side_of(parent, grandparent);
            let uncle = self.nodes.get(grandparent).child(parent_side.opposite());

            // Case 3: red uncle; push the red up and retry from the grandparent.
            if let Some(uncle) = uncle.filter(|&uncle| self.nodes.get(uncle).is_red()) {
                trace!("insert fixup: recoloring under a red uncle");
                self.paint(parent, false);
                self.paint(uncle, false);
                self.paint(grandparent, true);
                node = grandparent;
                continue;
            }

            // Case 4: inner grandchild; turn it into an outer one.
            let mut parent = parent;
            if self.side_of(node, parent) != parent_side {
                self.rotate(parent, parent_side);
                parent = node;
            }

            // Case 5: outer grandchild.
            self.paint(grandparent, true);
            self.paint(parent, false);
            self.rotate(grandparent, parent_side.opposite());
            return;
        }
    }

    /// Restores the black height after a black node was unlinked.
    ///
    /// `current` is the subtree that took the unlinked node's place (possibly absent) and
    /// `parent` the node it hangs from. The subtree rooted at `current` is one black short.
    pub(super) fn remove_fixup(&mut self, mut current: Option<Handle>, mut parent: Option<Handle>) {
        loop {
            if let Some(node) = current {
                parent = self.nodes.get(node).parent();
            }
            // Case 1: the deficit reached the root, where it is harmless.
            let Some(top) = parent else {
                return;
            };
            let side = if self.nodes.get(top).left() == current {
                Side::Left
            } else {
                Side::Right
            };
            let Some(mut sibling) = self.nodes.get(top).child(side.opposite()) else {
                corrupted("black-height deficit without a sibling");
            };

            // Case 2: red sibling; rotate it above the parent so the sibling becomes black.
            if self.nodes.get(sibling).is_red() {
                self.paint(top, true);
                self.paint(sibling, false);
                self.rotate(top, side);
                sibling = match self.nodes.get(top).child(side.opposite()) {
                    Some(sibling) => sibling,
                    None => corrupted("red sibling without children"),
                };
            }

            let sibling_red = self.nodes.get(sibling).is_red();
            let near = self.nodes.get(sibling).child(side);
            let far = self.nodes.get(sibling).child(side.opposite());

            if !sibling_red && !self.is_red(near) && !self.is_red(far) {
                if self.nodes.get(top).is_red() {
                    // Case 4: trade the parent's red for the sibling's black.
                    self.paint(top, false);
                    self.paint(sibling, true);
                    return;
                }
                // Case 3: everything black; shorten the sibling's side and move up.
                self.paint(sibling, true);
                current = Some(top);
                continue;
            }

            // Case 5: only the near nephew is red; rotate it into the sibling's place.
            let mut far = far;
            if !sibling_red && !self.is_red(far) {
                if let Some(nephew) = near.filter(|&near| self.nodes.get(near).is_red()) {
                    self.paint(sibling, true);
                    self.paint(nephew, false);
                    self.rotate(sibling, side.opposite());
                    far = Some(sibling);
                    sibling = nephew;
                }
            }

            // Case 6: red far nephew; rotate the sibling above the parent.
            if !self.nodes.get(sibling).is_red() {
                if let Some(far) = far.filter(|&far| self.nodes.get(far).is_red()) {
                    let parent_red = self.nodes.get(top).is_red();
                    self.rotate(top, side);
                    self.paint(sibling, parent_red);
                    self.paint(top, false);
                    self.paint(far, false);
                    return;
                }
            }

            corrupted("no deletion case applies");
        }
    }
}

/// Reports a broken tree found while rebalancing. Unreachable for any legal operation sequence.
#[cold]
#[track_caller]
fn corrupted(what: &'static str) -> ! {
    error!(what, "red-black invariant violated while rebalancing");
    panic!("`RbTree` - red-black invariant violated: {what}")
}

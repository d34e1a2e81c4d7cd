use crate::raw::{Handle, Side};

/// Where a searched-for key sits relative to the node a [`Cursor`] refers to.
///
/// Only meaningful for cursors returned by [`RbTree::find`](crate::RbTree::find); every other
/// cursor-producing operation reports [`Direction::Match`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(i8)]
pub enum Direction {
    /// The key is absent and would become this node's left child.
    Left = -1,
    /// The node holds the key.
    Match = 0,
    /// The key is absent and would become this node's right child.
    Right = 1,
}

impl Direction {
    pub(crate) const fn side(self) -> Option<Side> {
        match self {
            Direction::Left => Some(Side::Left),
            Direction::Match => None,
            Direction::Right => Some(Side::Right),
        }
    }
}

/// A detached position in an [`RbTree`](crate::RbTree).
///
/// A cursor is a plain value: it does not borrow the tree, so a caller can search, then mutate
/// through the cursor it got back. It refers either to a node or to the end of the tree, and
/// carries the [`Direction`] of the search that produced it.
///
/// Any structural change to the tree (inserting a new node, removing one, clearing) invalidates
/// every cursor obtained before it. Stale cursors are detected: the tree refuses to dereference,
/// advance, or remove through them.
///
/// A cursor also remembers which tree produced it; handing it to another tree (a clone
/// included) is refused as well.
///
/// Two cursors compare equal when they refer to the same position, whatever their direction.
///
/// # Examples
///
/// ```
/// use redblack::{Direction, RbTree};
///
/// let mut tree: RbTree<i32> = RbTree::new();
/// tree.insert(10);
///
/// let hit = tree.find(&10);
/// assert!(hit.is_match());
/// assert_eq!(hit.match_direction(), 0);
///
/// let miss = tree.find(&15);
/// assert!(miss.is_valid());
/// assert_eq!(miss.direction(), Direction::Right);
///
/// assert_eq!(tree.find(&10), tree.begin());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Cursor {
    pub(super) node: Option<Handle>,
    pub(super) direction: Direction,
    /// Identity of the producing tree; `0` for the end cursor of a tree that never held a node.
    pub(super) tree: usize,
    pub(super) generation: u64,
}

impl Cursor {
    pub(super) const fn new(node: Option<Handle>, direction: Direction, tree: usize, generation: u64) -> Self {
        Self {
            node,
            direction,
            tree,
            generation,
        }
    }

    /// Returns `true` if the cursor refers to a node rather than the end of the tree.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.node.is_some()
    }

    /// Returns `true` if the cursor is the end sentinel.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Returns `true` if the cursor refers to a node holding the searched-for key.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        self.node.is_some() && matches!(self.direction, Direction::Match)
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the direction as `-1`, `0` or `1`.
    #[must_use]
    pub const fn match_direction(&self) -> i8 {
        self.direction as i8
    }
}

impl PartialEq for Cursor {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for Cursor {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_everything_but_the_node() {
        let node = Some(Handle::from_index(4));
        assert_eq!(Cursor::new(node, Direction::Left, 3, 1), Cursor::new(node, Direction::Match, 5, 9));
        assert_ne!(Cursor::new(node, Direction::Match, 3, 1), Cursor::new(None, Direction::Match, 3, 1));
    }

    #[test]
    fn direction_maps_to_sides() {
        assert_eq!(Direction::Left.side(), Some(Side::Left));
        assert_eq!(Direction::Match.side(), None);
        assert_eq!(Direction::Right.side(), Some(Side::Right));
        assert_eq!(Cursor::new(None, Direction::Right, 0, 0).match_direction(), 1);
        assert_eq!(Cursor::new(None, Direction::Left, 0, 0).match_direction(), -1);
    }

    #[test]
    fn end_cursor_is_never_a_match() {
        let end = Cursor::new(None, Direction::Match, 0, 0);
        assert!(end.is_end());
        assert!(!end.is_valid());
        assert!(!end.is_match());
    }
}

use core::cmp::Ordering;
use core::fmt;
use core::sync::atomic::{self, AtomicUsize};

use tracing::trace;

use crate::Error;
use crate::compare::{Comparator, NaturalOrder};
use crate::raw::{Arena, Handle, Node, Side};

mod cursor;
mod diagnostics;
mod iter;
mod rebalance;

pub use cursor::{Cursor, Direction};
pub use diagnostics::Dump;
pub use iter::Iter;

/// A red-black tree ordered by an injectable [`Comparator`].
///
/// This is the bare ordered container the [`RbSet`](crate::RbSet) and
/// [`RbMap`](crate::RbMap) collections are built on. It exposes the tree through detached
/// [`Cursor`]s: [`find`](RbTree::find) reports either the node holding a key or the node under
/// which the key would be linked, and [`insert_at`](RbTree::insert_at),
/// [`get_mut`](RbTree::get_mut) and [`remove_at`](RbTree::remove_at) act on that position
/// without searching again.
///
/// The tree holds no element count; callers that need one track it across inserts, removals
/// and [`clear`](RbTree::clear), as the collections do.
///
/// Nodes live in an arena owned by the tree. Child links own their subtrees; parent links are
/// plain back-references used for rotations and for stepping cursors, so iteration needs no
/// stack.
///
/// It is a logic error for a value's key to change, through [`get_mut`](RbTree::get_mut),
/// interior mutability or a comparator whose answers change, while the value is in the tree.
/// The behavior resulting from such a logic error is not specified, but will be encapsulated to
/// the `RbTree` that observed it and not result in undefined behavior.
///
/// # Examples
///
/// ```
/// use redblack::RbTree;
///
/// let mut tree: RbTree<i32> = RbTree::new();
/// for value in [5, 3, 8, 1, 4, 7, 9] {
///     tree.insert(value);
/// }
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 7, 8, 9]);
///
/// // Pop the minimum through a cursor.
/// let first = tree.begin();
/// assert_eq!(tree.remove_at(first), Some(1));
/// assert_eq!(tree.remove(&8), Some(8));
/// assert_eq!(tree.remove(&8), None);
/// ```
pub struct RbTree<T, C = NaturalOrder> {
    nodes: Arena<Node<T>>,
    root: Option<Handle>,
    comparator: C,
    /// Drawn from [`NEXT_ID`] when the first node is linked; `0` until then.
    id: usize,
    /// Advanced by every structural change; cursors from older generations are stale.
    generation: u64,
}

/// Source of tree identities. `0` is never handed out.
static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

fn fresh_id() -> usize {
    loop {
        let id = NEXT_ID.fetch_add(1, atomic::Ordering::Relaxed);
        if id != 0 {
            return id;
        }
    }
}

impl<T, C: Default> RbTree<T, C> {
    /// Makes a new, empty tree with the comparator's default configuration.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbTree;
    ///
    /// let tree: RbTree<u32> = RbTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(C::default())
    }

    /// Makes a new, empty tree with room for at least `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            comparator: C::default(),
            id: 0,
            generation: 0,
        }
    }
}

impl<T, C> RbTree<T, C> {
    /// Makes a new, empty tree ordered by `comparator`.
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            comparator,
            id: 0,
            generation: 0,
        }
    }

    /// Returns the comparator ordering this tree.
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the number of nodes the tree can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Returns `true` if the tree holds no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns a cursor to the smallest value, or the end cursor if the tree is empty.
    #[must_use]
    pub fn begin(&self) -> Cursor {
        let first = self.root.map(|root| iter::extreme(&self.nodes, root, Side::Left));
        self.cursor(first, Direction::Match)
    }

    /// Returns the end cursor, which refers to no value.
    #[must_use]
    pub fn end(&self) -> Cursor {
        self.cursor(None, Direction::Match)
    }

    /// Returns a cursor to the value following `cursor` in order, or the end cursor after the
    /// largest value.
    ///
    /// # Errors
    ///
    /// [`Error::EndCursor`] if `cursor` is the end cursor, [`Error::ForeignCursor`] if another
    /// tree produced it, and [`Error::StaleCursor`] if the tree changed structurally since
    /// `cursor` was obtained.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::{Error, RbTree};
    ///
    /// let mut tree: RbTree<char> = RbTree::new();
    /// tree.insert('b');
    /// tree.insert('a');
    ///
    /// let mut cursor = tree.begin();
    /// let mut seen = Vec::new();
    /// while cursor != tree.end() {
    ///     seen.push(*tree.get(cursor)?);
    ///     cursor = tree.advance(cursor)?;
    /// }
    /// assert_eq!(seen, ['a', 'b']);
    /// assert_eq!(tree.advance(cursor), Err(Error::EndCursor));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn advance(&self, cursor: Cursor) -> Result<Cursor, Error> {
        let node = self.resolve(cursor)?;
        Ok(self.cursor(iter::successor(&self.nodes, node), Direction::Match))
    }

    /// Returns the value `cursor` refers to.
    ///
    /// For a cursor from a missed [`find`](RbTree::find) this is the would-be parent of the
    /// searched-for key.
    ///
    /// # Errors
    ///
    /// [`Error::EndCursor`] for the end cursor, [`Error::ForeignCursor`] for a cursor of
    /// another tree, [`Error::StaleCursor`] for a cursor that predates a structural change.
    pub fn get(&self, cursor: Cursor) -> Result<&T, Error> {
        let node = self.resolve(cursor)?;
        Ok(self.nodes.get(node).value())
    }

    /// Returns the value `cursor` refers to, mutably.
    ///
    /// This is how a payload is overwritten in place after [`insert`](RbTree::insert) reports
    /// that an equivalent value was already present. Changing the part of the value the
    /// comparator looks at is a logic error.
    ///
    /// # Errors
    ///
    /// As for [`get`](RbTree::get).
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::{KeyOrder, RbTree};
    ///
    /// let mut tree: RbTree<(u8, &str), KeyOrder> = RbTree::new();
    /// tree.insert((1, "one"));
    ///
    /// let (inserted, at) = tree.insert((1, "uno"));
    /// assert!(!inserted);
    /// tree.get_mut(at)?.1 = "uno";
    ///
    /// assert_eq!(tree.get(tree.find(&1))?, &(1, "uno"));
    /// # Ok::<(), redblack::Error>(())
    /// ```
    pub fn get_mut(&mut self, cursor: Cursor) -> Result<&mut T, Error> {
        let node = self.resolve(cursor)?;
        Ok(self.nodes.get_mut(node).value_mut())
    }

    /// Returns the smallest value, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(self.begin()).ok()
    }

    /// Gets an iterator over the values in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.begin().node)
    }

    /// Links `value` at the position `cursor` describes without checking that it belongs there.
    ///
    /// Callers pass a cursor that [`find`](RbTree::find) just produced for `value`'s key.
    pub(crate) fn link_at(&mut self, cursor: Cursor, value: T) -> Result<(bool, Cursor), Error> {
        if cursor.tree != self.id {
            return Err(Error::ForeignCursor);
        }
        if cursor.generation != self.generation {
            return Err(Error::StaleCursor);
        }
        let Some(parent) = cursor.node else {
            if self.root.is_some() {
                return Err(Error::EndCursor);
            }
            self.nodes.try_reserve()?;
            if self.id == 0 {
                self.id = fresh_id();
            }
            let root = self.nodes.alloc(Node::new(value));
            self.nodes.get_mut(root).set_red(false);
            self.root = Some(root);
            self.bump_generation();
            return Ok((true, self.cursor(Some(root), Direction::Match)));
        };
        let Some(parent_node) = self.nodes.try_get(parent) else {
            return Err(Error::StaleCursor);
        };
        let Some(side) = cursor.direction.side() else {
            trace!("value already present, keeping the existing node");
            return Ok((false, cursor));
        };
        if parent_node.child(side).is_some() {
            return Err(Error::StaleCursor);
        }

        self.nodes.try_reserve()?;
        let node = self.nodes.alloc(Node::new(value));
        self.nodes.get_mut(node).set_parent(Some(parent));
        self.nodes.get_mut(parent).set_child(side, Some(node));
        self.insert_fixup(node);
        self.bump_generation();
        Ok((true, self.cursor(Some(node), Direction::Match)))
    }

    /// Removes the value `cursor` refers to and returns it.
    ///
    /// Returns `None`, leaving the tree unchanged, for the end cursor, for a cursor from a
    /// missed [`find`](RbTree::find), and for a stale or foreign cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbTree;
    ///
    /// let mut tree: RbTree<i32> = RbTree::new();
    /// for value in [5, 1, 9, 3] {
    ///     tree.insert(value);
    /// }
    ///
    /// let mut popped = Vec::new();
    /// while let Some(value) = tree.remove_at(tree.begin()) {
    ///     popped.push(value);
    /// }
    /// assert_eq!(popped, [1, 3, 5, 9]);
    /// assert!(tree.is_empty());
    /// ```
    pub fn remove_at(&mut self, cursor: Cursor) -> Option<T> {
        if self.root.is_none() || cursor.direction != Direction::Match {
            return None;
        }
        let found = self.resolve(cursor).ok()?;

        // Unlink a node with at most one child: the found node itself, or its in-order
        // neighbour after trading values with it.
        let found_node = self.nodes.get(found);
        let unlinked = match (found_node.left(), found_node.right()) {
            (Some(left), _) => iter::extreme(&self.nodes, left, Side::Right),
            (None, Some(right)) => iter::extreme(&self.nodes, right, Side::Left),
            (None, None) => found,
        };
        if unlinked != found {
            let (a, b) = self.nodes.pair_mut(found, unlinked);
            core::mem::swap(a.value_mut(), b.value_mut());
        }

        let unlinked_node = self.nodes.get(unlinked);
        let parent = unlinked_node.parent();
        let child = unlinked_node.left().or(unlinked_node.right());
        if !unlinked_node.is_red() && self.is_red(child) {
            // A black node over a red child: hand the child the black and remove a red node.
            if let Some(child) = child {
                self.nodes.get_mut(child).set_red(false);
            }
            self.nodes.get_mut(unlinked).set_red(true);
        }

        self.replace_child(parent, unlinked, child);
        let removed = self.nodes.take(unlinked);
        if !removed.is_red() {
            self.remove_fixup(child, parent);
        }
        self.bump_generation();
        Some(removed.into_value())
    }

    /// Clears the tree, dropping every value.
    ///
    /// All nodes are released at once; no rebalancing takes place.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbTree;
    ///
    /// let mut tree: RbTree<i32> = RbTree::new();
    /// tree.insert(1);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.begin(), tree.end());
    /// ```
    pub fn clear(&mut self) {
        trace!(nodes = self.nodes.len(), "clearing tree");
        self.nodes.clear();
        self.root = None;
        self.bump_generation();
    }

    /// Searches with a comparison function that orders each visited value against the target,
    /// in the manner of [`slice::binary_search_by`]: `Less` means the value sorts before the
    /// target.
    ///
    /// The function must agree with the tree's ordering. This is how lookups by a borrowed form of
    /// the key are done; the resulting cursor behaves exactly like one from
    /// [`find`](RbTree::find).
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbTree;
    ///
    /// let mut tree: RbTree<String> = RbTree::new();
    /// tree.insert(String::from("pear"));
    ///
    /// let at = tree.search_by(|value| value.as_str().cmp("pear"));
    /// assert!(at.is_match());
    /// ```
    pub fn search_by<F>(&self, mut f: F) -> Cursor
    where
        F: FnMut(&T) -> Ordering,
    {
        let Some(mut current) = self.root else {
            return self.end();
        };
        loop {
            let node = self.nodes.get(current);
            let (side, direction) = match f(node.value()) {
                Ordering::Greater => (Side::Left, Direction::Left),
                Ordering::Less => (Side::Right, Direction::Right),
                Ordering::Equal => return self.cursor(Some(current), Direction::Match),
            };
            match node.child(side) {
                Some(child) => current = child,
                None => return self.cursor(Some(current), direction),
            }
        }
    }

    fn cursor(&self, node: Option<Handle>, direction: Direction) -> Cursor {
        Cursor::new(node, direction, self.id, self.generation)
    }

    /// Checks that `cursor` refers to a live node of this tree's current generation.
    fn resolve(&self, cursor: Cursor) -> Result<Handle, Error> {
        let node = cursor.node.ok_or(Error::EndCursor)?;
        if cursor.tree != self.id {
            return Err(Error::ForeignCursor);
        }
        if cursor.generation != self.generation || self.nodes.try_get(node).is_none() {
            return Err(Error::StaleCursor);
        }
        Ok(node)
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

impl<T, C: Comparator<T>> RbTree<T, C> {
    /// Searches for `key`.
    ///
    /// On a hit the returned cursor refers to the node holding `key` and
    /// [`is_match`](Cursor::is_match) is `true`. On a miss it refers to the node under which
    /// `key` would be linked, with a [`Direction`] telling on which side. An empty tree yields
    /// the end cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::{Direction, RbTree};
    ///
    /// let mut tree: RbTree<i32> = RbTree::new();
    /// tree.insert(5);
    /// tree.insert(3);
    ///
    /// assert!(tree.find(&3).is_match());
    ///
    /// let miss = tree.find(&4);
    /// assert_eq!(miss.direction(), Direction::Right);
    /// assert_eq!(tree.get(miss), Ok(&3));
    /// ```
    pub fn find(&self, key: &C::Key) -> Cursor {
        let comparator = &self.comparator;
        self.search_by(|value| {
            let here = comparator.key(value);
            if comparator.less(key, here) {
                Ordering::Greater
            } else if comparator.less(here, key) {
                Ordering::Less
            } else {
                Ordering::Equal
            }
        })
    }

    /// Returns `true` if a value equivalent to `key` is present.
    #[must_use]
    pub fn contains(&self, key: &C::Key) -> bool {
        self.find(key).is_match()
    }

    /// Links `value` at the position described by `cursor`, normally one a
    /// [`find`](RbTree::find) for `value`'s key just returned.
    ///
    /// Returns `(true, cursor to the new node)` when a node was linked. A matching cursor means
    /// an equivalent value is already present: `value` is dropped and `(false, cursor)` is
    /// returned, exactly like a duplicate [`insert`](RbTree::insert). The end cursor of an
    /// empty tree makes `value` the root.
    ///
    /// The position is checked before anything is linked: `value` must order strictly between
    /// the cursor's node and that node's in-order neighbour on the open side, or be equivalent
    /// to the node for a matching cursor.
    ///
    /// # Errors
    ///
    /// - [`Error::ForeignCursor`] if another tree produced `cursor`.
    /// - [`Error::StaleCursor`] if the tree changed since `cursor` was obtained.
    /// - [`Error::EndCursor`] for the end cursor of a non-empty tree.
    /// - [`Error::MisplacedValue`] if `value` does not belong at `cursor`.
    /// - [`Error::CapacityExhausted`] if no node could be allocated.
    ///
    /// On error `value` is dropped and the tree is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbTree;
    ///
    /// let mut tree: RbTree<i32> = RbTree::new();
    /// tree.insert(20);
    ///
    /// let slot = tree.find(&10);
    /// assert!(!slot.is_match());
    /// let (inserted, at) = tree.insert_at(slot, 10)?;
    /// assert!(inserted);
    /// assert_eq!(tree.begin(), at);
    /// # Ok::<(), redblack::Error>(())
    /// ```
    pub fn insert_at(&mut self, cursor: Cursor, value: T) -> Result<(bool, Cursor), Error> {
        if cursor.node.is_some() {
            let node = self.resolve(cursor)?;
            if !self.fits_at(node, cursor.direction, &value) {
                return Err(Error::MisplacedValue);
            }
        }
        self.link_at(cursor, value)
    }

    /// Whether `value` is equivalent to `node` (for a match) or orders strictly between `node`
    /// and its in-order neighbour on the `direction` side.
    fn fits_at(&self, node: Handle, direction: Direction, value: &T) -> bool {
        let key = self.comparator.key(value);
        let key_of = |handle: Handle| self.comparator.key(self.nodes.get(handle).value());
        let Some(side) = direction.side() else {
            return self.comparator.equivalent(key, key_of(node));
        };
        let beyond = iter::neighbour(&self.nodes, node, side);
        let (low, high) = match side {
            Side::Left => (beyond, Some(node)),
            Side::Right => (Some(node), beyond),
        };
        low.is_none_or(|low| self.comparator.less(key_of(low), key))
            && high.is_none_or(|high| self.comparator.less(key, key_of(high)))
    }

    /// Inserts `value`, keeping the tree balanced.
    ///
    /// Returns `(true, cursor to the new node)`, or `(false, cursor to the existing node)` if an
    /// equivalent value was already present. In the latter case `value` is dropped and the tree
    /// is left untouched, so the caller can update the existing value through
    /// [`get_mut`](RbTree::get_mut).
    ///
    /// # Panics
    ///
    /// Panics if no node can be allocated. See [`try_insert`](RbTree::try_insert).
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbTree;
    ///
    /// let mut tree: RbTree<i32> = RbTree::new();
    /// let (inserted, first) = tree.insert(37);
    /// assert!(inserted);
    ///
    /// let (inserted, again) = tree.insert(37);
    /// assert!(!inserted);
    /// assert_eq!(first, again);
    /// ```
    pub fn insert(&mut self, value: T) -> (bool, Cursor) {
        match self.try_insert(value) {
            Ok(result) => result,
            Err(err) => panic!("`RbTree::insert()` - {err}"),
        }
    }

    /// Inserts `value`, reporting allocation failure instead of panicking.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExhausted`] if no node could be allocated. Nothing is linked in that
    /// case and the tree keeps its previous, valid state.
    pub fn try_insert(&mut self, value: T) -> Result<(bool, Cursor), Error> {
        let cursor = self.find(self.comparator.key(&value));
        self.link_at(cursor, value)
    }

    /// Removes the value equivalent to `key` and returns it.
    ///
    /// Returns `None`, leaving the tree unchanged, if no such value is present.
    pub fn remove(&mut self, key: &C::Key) -> Option<T> {
        let cursor = self.find(key);
        self.remove_at(cursor)
    }
}

impl<T: Clone, C: Clone> Clone for RbTree<T, C> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            comparator: self.comparator.clone(),
            id: fresh_id(),
            generation: self.generation,
        }
    }
}

impl<T, C: Default> Default for RbTree<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, C> fmt::Debug for RbTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, C> IntoIterator for &'a RbTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

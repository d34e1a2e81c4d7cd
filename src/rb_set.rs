use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::{FusedIterator, Peekable};
use core::ops::{BitAnd, BitOr, BitXor, Sub};

use tracing::trace;

use crate::rb_tree::{self, Cursor, RbTree};

/// An ordered set based on a red-black tree.
///
/// Elements are kept in ascending [`Ord`] order. The underlying [`RbTree`] keeps no count, so
/// the set tracks its length itself across every insert, removal and clear.
///
/// It is a logic error for an item to be modified in such a way that the item's ordering relative
/// to any other item, as determined by the [`Ord`] trait, changes while it is in the set. The
/// behavior resulting from such a logic error is not specified, but will be encapsulated to the
/// `RbSet` that observed the logic error and not result in undefined behavior.
///
/// # Examples
///
/// ```
/// use redblack::RbSet;
///
/// let mut books = RbSet::new();
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
///
/// assert!(books.contains(&"The Odyssey"));
/// assert!(books.remove(&"The Odyssey"));
/// assert_eq!(books.len(), 2);
///
/// for book in &books {
///     println!("{book}");
/// }
/// ```
pub struct RbSet<T> {
    tree: RbTree<T>,
    len: usize,
}

/// An iterator over the items of an `RbSet`, in ascending order.
///
/// This `struct` is created by the [`iter`](RbSet::iter) method on [`RbSet`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    inner: rb_tree::Iter<'a, T>,
    remaining: usize,
}

/// An owning iterator over the items of an `RbSet`, in ascending order.
///
/// This `struct` is created by the `into_iter` method on [`RbSet`] (provided by the
/// [`IntoIterator`] trait).
pub struct IntoIter<T> {
    set: RbSet<T>,
}

/// Walks two sorted iterators side by side, yielding matching items together.
struct MergeIter<'a, T> {
    a: Peekable<Iter<'a, T>>,
    b: Peekable<Iter<'a, T>>,
}

impl<'a, T: Ord> MergeIter<'a, T> {
    fn new(a: &'a RbSet<T>, b: &'a RbSet<T>) -> Self {
        Self {
            a: a.iter().peekable(),
            b: b.iter().peekable(),
        }
    }

    fn nexts(&mut self) -> (Option<&'a T>, Option<&'a T>) {
        let ordering = match (self.a.peek(), self.b.peek()) {
            (None, None) => return (None, None),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(a), Some(b)) => a.cmp(b),
        };
        match ordering {
            Ordering::Less => (self.a.next(), None),
            Ordering::Greater => (None, self.b.next()),
            Ordering::Equal => (self.a.next(), self.b.next()),
        }
    }
}

impl<T> Clone for MergeIter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            a: self.a.clone(),
            b: self.b.clone(),
        }
    }
}

macro_rules! merge_iterator {
    ($(#[$meta:meta])* $name:ident, |$merge:ident| $next:block) => {
        $(#[$meta])*
        #[must_use = "this returns the result as an iterator, without modifying either input set"]
        pub struct $name<'a, T> {
            inner: MergeIter<'a, T>,
        }

        impl<'a, T: Ord> Iterator for $name<'a, T> {
            type Item = &'a T;

            fn next(&mut self) -> Option<&'a T> {
                let $merge = &mut self.inner;
                $next
            }
        }

        impl<T: Ord> FusedIterator for $name<'_, T> {}

        impl<T> Clone for $name<'_, T> {
            fn clone(&self) -> Self {
                Self {
                    inner: self.inner.clone(),
                }
            }
        }

        impl<T: fmt::Debug + Ord> fmt::Debug for $name<'_, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_list().entries(self.clone()).finish()
            }
        }
    };
}

merge_iterator!(
    /// A lazy iterator producing elements in the union of `RbSet`s.
    ///
    /// This `struct` is created by the [`union`](RbSet::union) method on [`RbSet`].
    Union,
    |merge| {
        let (a, b) = merge.nexts();
        a.or(b)
    }
);

merge_iterator!(
    /// A lazy iterator producing elements in the intersection of `RbSet`s.
    ///
    /// This `struct` is created by the [`intersection`](RbSet::intersection) method on
    /// [`RbSet`].
    Intersection,
    |merge| {
        loop {
            match merge.nexts() {
                (Some(a), Some(_)) => return Some(a),
                (Some(_), None) | (None, Some(_)) => {}
                (None, None) => return None,
            }
        }
    }
);

merge_iterator!(
    /// A lazy iterator producing elements in the difference of `RbSet`s.
    ///
    /// This `struct` is created by the [`difference`](RbSet::difference) method on [`RbSet`].
    Difference,
    |merge| {
        loop {
            match merge.nexts() {
                (Some(a), None) => return Some(a),
                (Some(_), Some(_)) | (None, Some(_)) => {}
                (None, None) => return None,
            }
        }
    }
);

merge_iterator!(
    /// A lazy iterator producing elements in the symmetric difference of `RbSet`s.
    ///
    /// This `struct` is created by the [`symmetric_difference`](RbSet::symmetric_difference)
    /// method on [`RbSet`].
    SymmetricDifference,
    |merge| {
        loop {
            match merge.nexts() {
                (Some(a), None) => return Some(a),
                (None, Some(b)) => return Some(b),
                (Some(_), Some(_)) => {}
                (None, None) => return None,
            }
        }
    }
);

impl<T> RbSet<T> {
    /// Makes a new, empty `RbSet`.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> RbSet<T> {
        RbSet {
            tree: RbTree::with_comparator(crate::NaturalOrder),
            len: 0,
        }
    }

    /// Clears the set, removing all elements.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.len = 0;
    }

    /// Gets an iterator that visits the elements in the `RbSet` in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbSet;
    ///
    /// let set = RbSet::from([3, 1, 2]);
    /// let mut iter = set.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), Some(&3));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.tree.iter(),
            remaining: self.len,
        }
    }

    /// Returns the number of elements in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a reference to the first (smallest) element, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    /// Removes the first element from the set and returns it, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbSet;
    ///
    /// let mut set = RbSet::from([5, 1, 9, 3]);
    /// let mut popped = Vec::new();
    /// while let Some(n) = set.pop_first() {
    ///     popped.push(n);
    /// }
    /// assert_eq!(popped, [1, 3, 5, 9]);
    /// assert!(set.is_empty());
    /// ```
    pub fn pop_first(&mut self) -> Option<T> {
        let value = self.tree.remove_at(self.tree.begin())?;
        self.len -= 1;
        Some(value)
    }
}

impl<T: Ord> RbSet<T> {
    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. An equal value already in the set is kept
    /// and `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbSet;
    ///
    /// let mut set = RbSet::new();
    /// assert!(set.insert(2));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let (inserted, _) = self.tree.insert(value);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Adds a value to the set, replacing and returning the existing equal value, if any.
    pub fn replace(&mut self, value: T) -> Option<T> {
        let cursor = self.tree.find(&value);
        let result = if cursor.is_match() {
            trace!("replacing an equal element in place");
            self.tree.get_mut(cursor).map(|slot| Some(core::mem::replace(slot, value)))
        } else {
            self.tree.link_at(cursor, value).map(|_| {
                self.len += 1;
                None
            })
        };
        match result {
            Ok(previous) => previous,
            Err(err) => panic!("`RbSet::replace()` - {err}"),
        }
    }

    /// Finds `value` through any borrowed form of the element type.
    fn locate<Q>(&self, value: &Q) -> Cursor
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.search_by(|stored| {
            let stored: &Q = stored.borrow();
            stored.cmp(value)
        })
    }

    /// Returns `true` if the set contains an element equal to the value.
    ///
    /// The value may be any borrowed form of the set's element type, but the ordering on the
    /// borrowed form *must* match the ordering on the element type.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbSet;
    ///
    /// let set = RbSet::from([String::from("fig"), String::from("pear")]);
    /// assert!(set.contains("fig"));
    /// assert!(!set.contains("plum"));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.locate(value).is_match()
    }

    /// Returns a reference to the element in the set, if any, that is equal to the value.
    #[must_use]
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let cursor = self.locate(value);
        if cursor.is_match() { self.tree.get(cursor).ok() } else { None }
    }

    /// If the set contains an element equal to the value, removes it from the set and drops
    /// it. Returns whether such an element was present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.take(value).is_some()
    }

    /// Removes and returns the element in the set, if any, that is equal to the value.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let taken = self.tree.remove_at(self.locate(value))?;
        self.len -= 1;
        Some(taken)
    }

    /// Visits the elements representing the union, i.e., all the elements in `self` or
    /// `other`, without duplicates, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbSet;
    ///
    /// let a = RbSet::from([1, 2]);
    /// let b = RbSet::from([2, 3]);
    /// assert_eq!(a.union(&b).copied().collect::<Vec<_>>(), [1, 2, 3]);
    /// ```
    pub fn union<'a>(&'a self, other: &'a RbSet<T>) -> Union<'a, T> {
        Union {
            inner: MergeIter::new(self, other),
        }
    }

    /// Visits the elements representing the intersection, i.e., the elements that are both in
    /// `self` and `other`, in ascending order.
    pub fn intersection<'a>(&'a self, other: &'a RbSet<T>) -> Intersection<'a, T> {
        Intersection {
            inner: MergeIter::new(self, other),
        }
    }

    /// Visits the elements representing the difference, i.e., the elements that are in `self`
    /// but not in `other`, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbSet;
    ///
    /// let a = RbSet::from([1, 2, 3]);
    /// let b = RbSet::from([2]);
    /// assert_eq!(a.difference(&b).copied().collect::<Vec<_>>(), [1, 3]);
    /// ```
    pub fn difference<'a>(&'a self, other: &'a RbSet<T>) -> Difference<'a, T> {
        Difference {
            inner: MergeIter::new(self, other),
        }
    }

    /// Visits the elements representing the symmetric difference, i.e., the elements that are
    /// in `self` or in `other` but not in both, in ascending order.
    pub fn symmetric_difference<'a>(&'a self, other: &'a RbSet<T>) -> SymmetricDifference<'a, T> {
        SymmetricDifference {
            inner: MergeIter::new(self, other),
        }
    }

    /// Returns `true` if `self` has no elements in common with `other`.
    #[must_use]
    pub fn is_disjoint(&self, other: &RbSet<T>) -> bool {
        self.intersection(other).next().is_none()
    }

    /// Returns `true` if every element of `self` is also in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbSet;
    ///
    /// let sup = RbSet::from([1, 2, 3]);
    /// let mut set = RbSet::new();
    /// assert!(set.is_subset(&sup));
    /// set.insert(2);
    /// assert!(set.is_subset(&sup));
    /// set.insert(4);
    /// assert!(!set.is_subset(&sup));
    /// ```
    #[must_use]
    pub fn is_subset(&self, other: &RbSet<T>) -> bool {
        self.len <= other.len && self.difference(other).next().is_none()
    }

    /// Returns `true` if every element of `other` is also in `self`.
    #[must_use]
    pub fn is_superset(&self, other: &RbSet<T>) -> bool {
        other.is_subset(self)
    }
}

impl<T: PartialEq> PartialEq for RbSet<T> {
    fn eq(&self, other: &RbSet<T>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RbSet<T> {}

impl<T: PartialOrd> PartialOrd for RbSet<T> {
    fn partial_cmp(&self, other: &RbSet<T>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for RbSet<T> {
    fn cmp(&self, other: &RbSet<T>) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash> Hash for RbSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for value in self {
            value.hash(state);
        }
    }
}

impl<T: Clone> Clone for RbSet<T> {
    fn clone(&self) -> Self {
        RbSet {
            tree: self.tree.clone(),
            len: self.len,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RbSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Default for RbSet<T> {
    fn default() -> Self {
        RbSet::new()
    }
}

impl<T: Ord> FromIterator<T> for RbSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = RbSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for RbSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for RbSet<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RbSet<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T: Ord + Clone> Sub<&RbSet<T>> for &RbSet<T> {
    type Output = RbSet<T>;

    /// Returns the difference of `self` and `rhs` as a new `RbSet<T>`.
    fn sub(self, rhs: &RbSet<T>) -> RbSet<T> {
        self.difference(rhs).cloned().collect()
    }
}

impl<T: Ord + Clone> BitXor<&RbSet<T>> for &RbSet<T> {
    type Output = RbSet<T>;

    /// Returns the symmetric difference of `self` and `rhs` as a new `RbSet<T>`.
    fn bitxor(self, rhs: &RbSet<T>) -> RbSet<T> {
        self.symmetric_difference(rhs).cloned().collect()
    }
}

impl<T: Ord + Clone> BitAnd<&RbSet<T>> for &RbSet<T> {
    type Output = RbSet<T>;

    /// Returns the intersection of `self` and `rhs` as a new `RbSet<T>`.
    fn bitand(self, rhs: &RbSet<T>) -> RbSet<T> {
        self.intersection(rhs).cloned().collect()
    }
}

impl<T: Ord + Clone> BitOr<&RbSet<T>> for &RbSet<T> {
    type Output = RbSet<T>;

    /// Returns the union of `self` and `rhs` as a new `RbSet<T>`.
    fn bitor(self, rhs: &RbSet<T>) -> RbSet<T> {
        self.union(rhs).cloned().collect()
    }
}

impl<T> IntoIterator for RbSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the `RbSet`'s contents in ascending order.
    fn into_iter(self) -> IntoIter<T> {
        IntoIter { set: self }
    }
}

impl<'a, T> IntoIterator for &'a RbSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let value = self.inner.next()?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.set.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.set.len, Some(self.set.len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.set.len
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.set).finish()
    }
}

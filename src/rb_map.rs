use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::mem;
use core::ops::Index;

use tracing::trace;

use crate::compare::KeyOrder;
use crate::error::Error;
use crate::rb_tree::{self, Cursor, RbTree};

/// An ordered map based on a red-black tree.
///
/// Entries are stored as `(K, V)` pairs ordered by key alone, so inserting an existing key
/// overwrites its value in place without touching the tree's shape.
///
/// It is a logic error for a key to be modified in such a way that the key's ordering relative to
/// any other key, as determined by the [`Ord`] trait, changes while it is in the map. The behavior
/// resulting from such a logic error is not specified, but will be encapsulated to the `RbMap`
/// that observed the logic error and not result in undefined behavior.
///
/// # Examples
///
/// ```
/// use redblack::RbMap;
///
/// let mut reviews = RbMap::new();
/// reviews.insert("Office Space", "Deals with real issues in the workplace.");
/// reviews.insert("Pulp Fiction", "Masterpiece.");
/// reviews.insert("The Godfather", "Very enjoyable.");
///
/// assert_eq!(reviews.insert("Pulp Fiction", "Still a masterpiece."), Some("Masterpiece."));
/// assert!(reviews.contains_key(&"Office Space"));
/// assert_eq!(reviews.remove(&"The Godfather"), Some("Very enjoyable."));
///
/// for (movie, review) in &reviews {
///     println!("{movie}: \"{review}\"");
/// }
/// assert_eq!(reviews[&"Pulp Fiction"], "Still a masterpiece.");
/// ```
pub struct RbMap<K, V> {
    tree: RbTree<(K, V), KeyOrder>,
    len: usize,
}

/// An iterator over the entries of an `RbMap`, in ascending key order.
///
/// This `struct` is created by the [`iter`](RbMap::iter) method on [`RbMap`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: rb_tree::Iter<'a, (K, V)>,
    remaining: usize,
}

/// An iterator over the keys of an `RbMap`.
///
/// This `struct` is created by the [`keys`](RbMap::keys) method on [`RbMap`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of an `RbMap`, in key order.
///
/// This `struct` is created by the [`values`](RbMap::values) method on [`RbMap`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An owning iterator over the entries of an `RbMap`, in ascending key order.
pub struct IntoIter<K, V> {
    map: RbMap<K, V>,
}

impl<K, V> RbMap<K, V> {
    /// Makes a new, empty `RbMap`.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> RbMap<K, V> {
        RbMap {
            tree: RbTree::with_comparator(KeyOrder),
            len: 0,
        }
    }

    /// Clears the map, removing all entries.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.len = 0;
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.tree.iter(),
            remaining: self.len,
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbMap;
    ///
    /// let map = RbMap::from([(2, "b"), (1, "a")]);
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns the first entry in the map, the one with the smallest key.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|(k, v)| (k, v))
    }

    /// Removes and returns the entry with the smallest key, if any.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let entry = self.tree.remove_at(self.tree.begin())?;
        self.len -= 1;
        Some(entry)
    }
}

impl<K: Ord, V> RbMap<K, V> {
    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned. If it did, the value is
    /// updated and the old value returned; the key itself is not updated.
    ///
    /// # Panics
    ///
    /// Panics if no node can be allocated. See [`try_insert`](RbMap::try_insert).
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbMap;
    ///
    /// let mut map = RbMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map[&37], "b");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.try_insert(key, value) {
            Ok(previous) => previous,
            Err(err) => panic!("`RbMap::insert()` - {err}"),
        }
    }

    /// Inserts a key-value pair, reporting allocation failure instead of panicking.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExhausted`] if a new entry was needed and no node could be allocated.
    /// The map is unchanged in that case.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        let cursor = self.tree.find(&key);
        if cursor.is_match() {
            trace!("overwriting the value of an existing key");
            let (_, slot) = self.tree.get_mut(cursor)?;
            return Ok(Some(mem::replace(slot, value)));
        }
        self.tree.link_at(cursor, (key, value))?;
        self.len += 1;
        Ok(None)
    }

    /// Finds `key` through any borrowed form of the key type.
    fn locate<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.search_by(|(stored, _)| {
            let stored: &Q = stored.borrow();
            stored.cmp(key)
        })
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering on the borrowed
    /// form *must* match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbMap;
    ///
    /// let mut map = RbMap::new();
    /// map.insert(String::from("a"), 1);
    /// assert_eq!(map.get("a"), Some(&1));
    /// assert_eq!(map.get("b"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let cursor = self.locate(key);
        if !cursor.is_match() {
            return None;
        }
        self.tree.get(cursor).ok().map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack::RbMap;
    ///
    /// let mut map = RbMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let cursor = self.locate(key);
        if !cursor.is_match() {
            return None;
        }
        self.tree.get_mut(cursor).ok().map(|(_, v)| v)
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.locate(key).is_match()
    }

    /// Removes a key from the map, returning the value at the key if the key was previously in
    /// the map.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the key was previously
    /// in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let entry = self.tree.remove_at(self.locate(key))?;
        self.len -= 1;
        Some(entry)
    }
}

impl<K, Q, V> Index<&Q> for RbMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `RbMap`.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RbMap<K, V> {
    fn eq(&self, other: &RbMap<K, V>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for RbMap<K, V> {}

impl<K: PartialOrd, V: PartialOrd> PartialOrd for RbMap<K, V> {
    fn partial_cmp(&self, other: &RbMap<K, V>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord> Ord for RbMap<K, V> {
    fn cmp(&self, other: &RbMap<K, V>) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: Hash, V: Hash> Hash for RbMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: Clone, V: Clone> Clone for RbMap<K, V> {
    fn clone(&self) -> Self {
        RbMap {
            tree: self.tree.clone(),
            len: self.len,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RbMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for RbMap<K, V> {
    fn default() -> Self {
        RbMap::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RbMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = RbMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for RbMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Ord + Copy, V: Copy> Extend<(&'a K, &'a V)> for RbMap<K, V> {
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|(&k, &v)| (k, v)));
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RbMap<K, V> {
    /// Converts a `[(K, V); N]` into an `RbMap<K, V>`. Later duplicates overwrite earlier ones.
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<K, V> IntoIterator for RbMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter { map: self }
    }
}

impl<'a, K, V> IntoIterator for &'a RbMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        let (k, v) = self.inner.next()?;
        self.remaining -= 1;
        Some((k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.map.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.map.len, Some(self.map.len))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.map).finish()
    }
}

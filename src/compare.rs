//! Ordering policies for [`RbTree`](crate::RbTree).
//!
//! A tree never compares stored values directly. It asks its [`Comparator`] for a key projection
//! of each value and for a strict less-than relation over those keys. Two keys are equivalent
//! when neither is less than the other, and the tree never holds two equivalent values.

use core::marker::PhantomData;

/// A strict weak ordering over (a projection of) the values stored in a tree.
///
/// Implementations should be stateless or at least behave identically for the lifetime of the
/// tree: changing the answer of `less` for keys already stored is a logic error. The behavior
/// resulting from such a logic error is not specified, but will not result in undefined
/// behavior.
///
/// # Examples
///
/// Ordering records by a single field:
///
/// ```
/// use redblack::{Comparator, RbTree};
///
/// struct Job {
///     priority: u8,
///     name: &'static str,
/// }
///
/// #[derive(Default)]
/// struct ByPriority;
///
/// impl Comparator<Job> for ByPriority {
///     type Key = u8;
///
///     fn key<'a>(&self, value: &'a Job) -> &'a u8 {
///         &value.priority
///     }
///
///     fn less(&self, a: &u8, b: &u8) -> bool {
///         a < b
///     }
/// }
///
/// let mut jobs: RbTree<Job, ByPriority> = RbTree::new();
/// jobs.insert(Job { priority: 3, name: "backup" });
/// jobs.insert(Job { priority: 1, name: "deploy" });
///
/// assert_eq!(jobs.iter().next().map(|job| job.name), Some("deploy"));
/// assert!(jobs.find(&3).is_match());
/// ```
pub trait Comparator<T> {
    /// The part of a stored value that determines its position.
    type Key: ?Sized;

    /// Projects the ordering key out of a stored value.
    fn key<'a>(&self, value: &'a T) -> &'a Self::Key;

    /// Returns `true` if `a` orders strictly before `b`.
    fn less(&self, a: &Self::Key, b: &Self::Key) -> bool;

    /// Returns `true` if neither key orders before the other.
    fn equivalent(&self, a: &Self::Key, b: &Self::Key) -> bool {
        !self.less(a, b) && !self.less(b, a)
    }
}

/// Orders whole values by their [`Ord`] implementation.
///
/// This is the ordered-set configuration and the default comparator of
/// [`RbTree`](crate::RbTree).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct NaturalOrder;

impl<T: Ord> Comparator<T> for NaturalOrder {
    type Key = T;

    #[inline]
    fn key<'a>(&self, value: &'a T) -> &'a T {
        value
    }

    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Orders `(key, payload)` pairs by the key alone.
///
/// This is the ordered-map configuration: the payload travels with its key through rotations
/// and deletion swaps but never takes part in ordering, so it can be replaced in place.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct KeyOrder;

impl<K: Ord, V> Comparator<(K, V)> for KeyOrder {
    type Key = K;

    #[inline]
    fn key<'a>(&self, value: &'a (K, V)) -> &'a K {
        &value.0
    }

    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

/// Wraps a less-than closure as a whole-value comparator.
///
/// # Examples
///
/// ```
/// use redblack::{ByLess, RbTree};
///
/// let mut descending = RbTree::with_comparator(ByLess::new(|a: &i32, b: &i32| a > b));
/// for value in [2, 9, 4] {
///     descending.insert(value);
/// }
/// assert_eq!(descending.iter().copied().collect::<Vec<_>>(), [9, 4, 2]);
/// ```
pub struct ByLess<T, F> {
    less: F,
    _marker: PhantomData<fn(&T, &T) -> bool>,
}

impl<T, F> ByLess<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    pub const fn new(less: F) -> Self {
        Self {
            less,
            _marker: PhantomData,
        }
    }
}

impl<T, F: Clone> Clone for ByLess<T, F> {
    fn clone(&self) -> Self {
        Self {
            less: self.less.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, F> Comparator<T> for ByLess<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    type Key = T;

    #[inline]
    fn key<'a>(&self, value: &'a T) -> &'a T {
        value
    }

    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        (self.less)(a, b)
    }
}

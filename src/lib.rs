//! A red-black tree with detachable cursors, and the ordered set and map built on it.
//!
//! [`RbTree`] is a self-balancing binary search tree ordered by a pluggable [`Comparator`].
//! Searching yields a [`Cursor`]: either the node holding the key, or the node under which the
//! key would be linked together with a [`Direction`]. The same cursor drives
//! [`insert_at`](RbTree::insert_at), [`get_mut`](RbTree::get_mut) and
//! [`remove_at`](RbTree::remove_at), so a lookup followed by an edit searches only once.
//!
//! [`RbSet`] and [`RbMap`] wrap the tree with the familiar `BTreeSet`/`BTreeMap` style API and
//! keep the element count the tree itself does not track.
//!
//! # Example
//!
//! ```
//! use redblack::{RbMap, RbTree};
//!
//! let mut tree: RbTree<i32> = RbTree::new();
//! for value in [5, 3, 8, 1, 4, 7, 9] {
//!     tree.insert(value);
//! }
//! assert_eq!(tree.dump().to_string(), "[[[R 1] B 3 [R 4]] B 5 [[R 7] B 8 [R 9]]]");
//! assert!(tree.check_invariants().is_ok());
//!
//! let mut scores = RbMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! assert_eq!(scores.insert("Bob", 90), Some(85));
//! assert_eq!(scores.first_key_value(), Some((&"Alice", &100)));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Arena storage** - Nodes live in one growable buffer addressed by compact handles
//! - **Stack-free iteration** - Parent links let cursors step in order without recursion
//! - **Checked cursors** - Cursors outliving a structural change are reported as stale

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod compare;
mod error;
mod raw;

pub mod rb_map;
pub mod rb_set;
pub mod rb_tree;

pub use compare::{ByLess, Comparator, KeyOrder, NaturalOrder};
pub use error::{Error, Violation};
pub use rb_map::RbMap;
pub use rb_set::RbSet;
pub use rb_tree::{Cursor, Direction, RbTree};

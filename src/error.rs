//! Error types reported by the tree and its cursors.
//!
//! Cursor misuse and allocation failure are ordinary, recoverable conditions and come back as
//! [`Error`]. A broken red-black invariant is never produced by a legal sequence of operations;
//! the mutating paths panic when they meet one, and only the diagnostic checker
//! ([`RbTree::check_invariants`](crate::RbTree::check_invariants)) reports it as a value.

use thiserror::Error;

/// Errors returned by [`RbTree`](crate::RbTree) operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The cursor is the end sentinel and refers to no element.
    #[error("cursor is past the end of the tree")]
    EndCursor,

    /// The cursor was obtained before a later structural change to the tree.
    #[error("cursor was invalidated by a later structural change to the tree")]
    StaleCursor,

    /// The cursor was produced by a different tree.
    #[error("cursor belongs to a different tree")]
    ForeignCursor,

    /// The value does not order between the cursor's node and its in-order neighbour, so
    /// linking it there would break the tree's ordering.
    #[error("value does not belong at the cursor's position")]
    MisplacedValue,

    /// No node slot could be allocated for a new element.
    #[error("node storage is exhausted")]
    CapacityExhausted,

    /// The tree does not satisfy the red-black rules.
    #[error("red-black invariant violated: {0}")]
    InvariantViolation(Violation),
}

/// The rule a tree broke, as found by the invariant checker.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum Violation {
    #[error("the root is red")]
    RedRoot,
    #[error("a red node has a red child")]
    RedRedEdge,
    #[error("root-to-leaf paths have different black heights")]
    BlackHeightMismatch,
    #[error("in-order traversal is not strictly increasing")]
    OutOfOrder,
    #[error("a child does not point back at its parent")]
    BrokenParentLink,
    #[error("allocated nodes are unreachable from the root")]
    LeakedNodes,
}

impl From<Violation> for Error {
    fn from(violation: Violation) -> Self {
        Error::InvariantViolation(violation)
    }
}

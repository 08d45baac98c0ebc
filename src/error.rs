//! Error types returned from the tree's public API.
//!
//! Modeled as a small `thiserror`-derived enum rather than panics, so that
//! callers driving the tree directly (including property tests) receive a
//! catchable signal instead of an abort.

use thiserror::Error;

/// Errors the tree can return.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A query was made with a negative version number.
    #[error("version must be non-negative, got {0}")]
    NegativeVersion(i64),

    /// Internal invariant violation: attempted to retire a node at a
    /// version earlier than one it was already retired at. This should
    /// never happen through the public API; if it does, it is a bug in
    /// the tree, not a recoverable caller error.
    #[error("node already retired at version {existing}, cannot retire again at {attempted}")]
    AlreadyRetired { existing: u64, attempted: u64 },
}

pub type TreeResult<T> = Result<T, TreeError>;

//! Introspection surface: a snapshot of a tree's size and shape, useful
//! for diagnostics and tests but no part of the ordered-set contract
//! itself.

use crate::node::Color;
use crate::tree::PersistentRbTree;
use crate::version::Version;

/// A point-in-time snapshot of tree size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Total nodes ever allocated, alive or retired, across all versions.
    pub total_nodes: usize,
    /// Nodes alive at the queried version.
    pub alive_nodes: usize,
    /// Alive nodes colored red at the queried version.
    pub red_nodes: usize,
    /// How many versions the tree has recorded so far (`current_version + 1`).
    pub version_count: u64,
}

pub trait TreeStatsTrait {
    /// Compute stats as of version `v`, clamped the same way queries are
    /// (out-of-range versions below zero are treated as version 0 rather
    /// than erroring, since this is a diagnostic, not a query).
    fn stats_at(&self, v: i64) -> TreeStats;
}

impl TreeStatsTrait for PersistentRbTree {
    fn stats_at(&self, v: i64) -> TreeStats {
        let version: Version = if v < 0 {
            0
        } else {
            (v as u64).min(self.current_version())
        };
        let mut alive_nodes = 0;
        let mut red_nodes = 0;
        let mut total_nodes = 0;
        for (_, node) in self.arena().iter() {
            total_nodes += 1;
            if node.alive(version) {
                alive_nodes += 1;
                if node.color(version) == Color::Red {
                    red_nodes += 1;
                }
            }
        }
        TreeStats {
            total_nodes,
            alive_nodes,
            red_nodes,
            version_count: self.current_version() + 1,
        }
    }
}

//! The versioned node: the unit the tree rebalances and queries against.
//!
//! A node's identity (its arena slot) is fixed for as long as the tree
//! lives. What changes across versions is not the node itself but the
//! history recorded in its fields -- color, left child, right child,
//! parent -- each of which is readable "as of" any version independently
//! of the others.

use crate::arena::NodeId;
use crate::error::{TreeError, TreeResult};
use crate::version::{History, Version};

/// Red-black color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// The single-character code used by the in-order dump (`R` or `N`,
    /// matching the external command grammar).
    pub fn code(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Black => 'N',
        }
    }
}

/// A node living in the tree's arena.
///
/// `key` is mutable exactly once, in the two-children removal case (see
/// [`crate::tree::PersistentRbTree::remove`]), where the in-order
/// successor's key is copied into the victim's identity rather than
/// splicing the victim out. Every other field is append-only history.
#[derive(Debug, Clone)]
pub struct VersionedNode {
    key: i64,
    birth: Version,
    death: Option<Version>,
    color_history: History<Color>,
    left_history: History<Option<NodeId>>,
    right_history: History<Option<NodeId>>,
    parent_history: History<Option<NodeId>>,
}

impl VersionedNode {
    /// Create a new node, born red at `birth`, with no children or parent
    /// recorded yet (callers stamp those separately at the same version).
    pub fn new(key: i64, birth: Version) -> Self {
        Self {
            key,
            birth,
            death: None,
            color_history: History::with_initial(birth, Color::Red),
            left_history: History::new(),
            right_history: History::new(),
            parent_history: History::new(),
        }
    }

    pub fn key(&self) -> i64 {
        self.key
    }

    /// Overwrite this node's key. Used only by two-children removal; see
    /// the module doc comment and `DESIGN.md` for why this one field is
    /// not modeled as a history.
    pub(crate) fn overwrite_key(&mut self, key: i64) {
        self.key = key;
    }

    pub fn birth(&self) -> Version {
        self.birth
    }

    pub fn death(&self) -> Option<Version> {
        self.death
    }

    /// A node is alive at `v` iff it was born at or before `v` and has not
    /// been retired at or before `v`.
    pub fn alive(&self, v: Version) -> bool {
        self.birth <= v
            && match self.death {
                Some(d) => v < d,
                None => true,
            }
    }

    /// Logically delete this node as of `v`. Idempotent if already retired
    /// at exactly `v`; an error if it would move an existing retirement
    /// earlier, since death is monotone non-decreasing.
    pub(crate) fn retire(&mut self, v: Version) -> TreeResult<()> {
        match self.death {
            Some(existing) if existing == v => Ok(()),
            Some(existing) if v < existing => Err(TreeError::AlreadyRetired {
                existing,
                attempted: v,
            }),
            Some(_) | None => {
                self.death = Some(v);
                Ok(())
            }
        }
    }

    pub fn color(&self, v: Version) -> Color {
        self.color_history.get(v, Color::Black)
    }

    pub fn set_color(&mut self, color: Color, v: Version) {
        self.color_history.set(v, color);
    }

    pub fn left(&self, v: Version) -> Option<NodeId> {
        self.left_history.get(v, None)
    }

    pub fn set_left(&mut self, child: Option<NodeId>, v: Version) {
        self.left_history.set(v, child);
    }

    pub fn right(&self, v: Version) -> Option<NodeId> {
        self.right_history.get(v, None)
    }

    pub fn set_right(&mut self, child: Option<NodeId>, v: Version) {
        self.right_history.set(v, child);
    }

    /// Read the child on `side`.
    pub fn child(&self, side: Side, v: Version) -> Option<NodeId> {
        match side {
            Side::Left => self.left(v),
            Side::Right => self.right(v),
        }
    }

    /// Set the child on `side`.
    pub fn set_child(&mut self, side: Side, child: Option<NodeId>, v: Version) {
        match side {
            Side::Left => self.set_left(child, v),
            Side::Right => self.set_right(child, v),
        }
    }

    pub fn parent(&self, v: Version) -> Option<NodeId> {
        self.parent_history.get(v, None)
    }

    pub fn set_parent(&mut self, parent: Option<NodeId>, v: Version) {
        self.parent_history.set(v, parent);
    }
}

/// Which child link a reference occupies; used to generalize rotation and
/// splice code over left/right without duplicating it per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}


#[cfg(test)]
impl NodeId {
    pub(crate) fn from_index_for_test(i: usize) -> Self {
        Self::from_index(i)
    }
}

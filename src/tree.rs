//! The persistent red-black tree: ordered-set operations over the
//! versioned node pool in [`crate::node`].
//!
//! Every mutation (`insert`, `remove`) stamps a new version and installs a
//! new entry in the root table; every read (`successor`, `in_order`)
//! accepts a version and resolves purely against history entries at or
//! before it. No node is ever copied to produce a new version -- only its
//! field histories gain entries -- so old versions stay valid without any
//! path copying.

use crate::arena::{Arena, NodeId};
use crate::error::{TreeError, TreeResult};
use crate::node::{Color, Side, VersionedNode};
use crate::version::Version;

/// A partially persistent red-black tree keyed by `i64`.
#[derive(Debug)]
pub struct PersistentRbTree {
    arena: Arena<VersionedNode>,
    roots: Vec<Option<NodeId>>,
    current_version: Version,
}

impl PersistentRbTree {
    /// An empty tree at version 0.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: vec![None],
            current_version: 0,
        }
    }

    /// The most recently produced version.
    pub fn current_version(&self) -> Version {
        self.current_version
    }

    fn node_ref(&self, id: NodeId) -> &VersionedNode {
        self.arena.get(id)
    }

    fn node_mut(&mut self, id: NodeId) -> &mut VersionedNode {
        self.arena.get_mut(id)
    }

    /// Reject negative versions; clamp anything past the latest down to it.
    fn clamp_version(&self, v: i64) -> TreeResult<Version> {
        if v < 0 {
            return Err(TreeError::NegativeVersion(v));
        }
        Ok((v as u64).min(self.current_version))
    }

    fn root_at(&self, v: Version) -> Option<NodeId> {
        self.roots[v as usize]
    }

    // ---- insertion -----------------------------------------------------

    /// Insert `key`. Returns `false` without producing a new version if
    /// `key` is already alive in the current version.
    pub fn insert(&mut self, key: i64) -> bool {
        let v = self.current_version;
        let root = self.root_at(v);

        let mut cur = root;
        let mut parent = None;
        let mut side = Side::Left;
        while let Some(n) = cur {
            let node_key = self.node_ref(n).key();
            if key == node_key {
                return false;
            }
            parent = Some(n);
            if key < node_key {
                side = Side::Left;
                cur = self.node_ref(n).left(v);
            } else {
                side = Side::Right;
                cur = self.node_ref(n).right(v);
            }
        }

        let v_new = v + 1;
        let leaf = self.arena.insert(VersionedNode::new(key, v_new));
        self.node_mut(leaf).set_parent(parent, v_new);

        let mut root_candidate = root;
        match parent {
            None => root_candidate = Some(leaf),
            Some(p) => self.node_mut(p).set_child(side, Some(leaf), v_new),
        }

        self.insert_fixup(leaf, v_new, &mut root_candidate);

        if let Some(r) = root_candidate {
            self.node_mut(r).set_color(Color::Black, v_new);
        }
        self.roots.push(root_candidate);
        self.current_version = v_new;
        true
    }

    /// Restore the red rule after inserting a red leaf. Walks from the
    /// leaf's parent up to the root, and at every ancestor checks whether
    /// it has a red child that itself has a red child (on either side,
    /// independent of the other child's color); whenever that pattern is
    /// found, the triangle is rewritten into its canonical shape and the
    /// walk continues upward, since the rewrite's new (red) subtree top
    /// can itself form a fresh violation with a red great-grandparent.
    fn insert_fixup(&mut self, leaf: NodeId, v: Version, root: &mut Option<NodeId>) {
        let mut cur = self.node_ref(leaf).parent(v);
        while let Some(g) = cur {
            let next = self.node_ref(g).parent(v);
            if let Some((p, n, gp_side, pn_side)) = self.find_insert_violation(g, v) {
                let g_was_root = next.is_none();
                let y = self.rebalance_insert_triangle(g, p, n, gp_side, pn_side, v);
                if g_was_root {
                    *root = Some(y);
                }
            }
            cur = next;
        }
    }

    /// Look for a red child of `g` that itself has a red child, checking
    /// left before right and, within a side, the near grandchild before
    /// the far one -- no uncle/sibling color is consulted.
    fn find_insert_violation(
        &self,
        g: NodeId,
        v: Version,
    ) -> Option<(NodeId, NodeId, Side, Side)> {
        for gp_side in [Side::Left, Side::Right] {
            let Some(p) = self.node_ref(g).child(gp_side, v) else {
                continue;
            };
            if self.node_ref(p).color(v) != Color::Red {
                continue;
            }
            for pn_side in [Side::Left, Side::Right] {
                if let Some(n) = self.node_ref(p).child(pn_side, v) {
                    if self.node_ref(n).color(v) == Color::Red {
                        return Some((p, n, gp_side, pn_side));
                    }
                }
            }
        }
        None
    }

    /// The direct four-case triangle rewrite: given grandparent `g`,
    /// parent `p`, child `n` forming a double-red chain, sort the three
    /// nodes and their four outer subtrees by key and rebuild the
    /// canonical shape -- middle node on top (red), the other two as its
    /// children (black) -- without going through the generic rotation
    /// helper used by deletion.
    fn rebalance_insert_triangle(
        &mut self,
        g: NodeId,
        p: NodeId,
        n: NodeId,
        gp_side: Side,
        pn_side: Side,
        v: Version,
    ) -> NodeId {
        let (x, y, z, a, b, c, d) = match (gp_side, pn_side) {
            (Side::Left, Side::Left) => (
                n,
                p,
                g,
                self.node_ref(n).left(v),
                self.node_ref(n).right(v),
                self.node_ref(p).right(v),
                self.node_ref(g).right(v),
            ),
            (Side::Left, Side::Right) => (
                p,
                n,
                g,
                self.node_ref(p).left(v),
                self.node_ref(n).left(v),
                self.node_ref(n).right(v),
                self.node_ref(g).right(v),
            ),
            (Side::Right, Side::Left) => (
                g,
                n,
                p,
                self.node_ref(g).left(v),
                self.node_ref(n).left(v),
                self.node_ref(n).right(v),
                self.node_ref(p).right(v),
            ),
            (Side::Right, Side::Right) => (
                g,
                p,
                n,
                self.node_ref(g).left(v),
                self.node_ref(p).left(v),
                self.node_ref(n).left(v),
                self.node_ref(n).right(v),
            ),
        };

        let g_parent = self.node_ref(g).parent(v);
        let g_side_under_parent = g_parent.map(|gp| {
            if self.node_ref(gp).left(v) == Some(g) {
                Side::Left
            } else {
                Side::Right
            }
        });

        self.node_mut(x).set_left(a, v);
        self.node_mut(x).set_right(b, v);
        self.node_mut(z).set_left(c, v);
        self.node_mut(z).set_right(d, v);
        for (child, new_parent) in [(a, x), (b, x), (c, z), (d, z)] {
            if let Some(child) = child {
                self.node_mut(child).set_parent(Some(new_parent), v);
            }
        }
        self.node_mut(x).set_color(Color::Black, v);
        self.node_mut(z).set_color(Color::Black, v);

        self.node_mut(y).set_left(Some(x), v);
        self.node_mut(y).set_right(Some(z), v);
        self.node_mut(x).set_parent(Some(y), v);
        self.node_mut(z).set_parent(Some(y), v);
        self.node_mut(y).set_color(Color::Red, v);
        self.node_mut(y).set_parent(g_parent, v);
        if let Some(gp) = g_parent {
            self.node_mut(gp)
                .set_child(g_side_under_parent.unwrap(), Some(y), v);
        }
        y
    }

    // ---- removal ---------------------------------------------------

    /// Remove `key`. Returns `Ok(false)` without producing a new version
    /// if `key` is not alive in the current version.
    pub fn remove(&mut self, key: i64) -> TreeResult<bool> {
        let v = self.current_version;
        let root = self.root_at(v);

        let mut cur = root;
        let mut t = None;
        while let Some(n) = cur {
            let node_key = self.node_ref(n).key();
            if key == node_key {
                t = Some(n);
                break;
            }
            cur = if key < node_key {
                self.node_ref(n).left(v)
            } else {
                self.node_ref(n).right(v)
            };
        }
        let Some(t) = t else {
            return Ok(false);
        };

        let v_new = v + 1;
        let mut root_candidate = root;

        let left_t = self.node_ref(t).left(v);
        let right_t = self.node_ref(t).right(v);

        // Two children: splice out the in-order successor instead of `t`,
        // copying its key into `t`. This keeps `t`'s identity alive, which
        // departs from strict persistence for `t`'s key field (see
        // DESIGN.md), but avoids juggling two node identities mid-splice.
        let y = if left_t.is_some() && right_t.is_some() {
            let mut s = right_t.unwrap();
            while let Some(l) = self.node_ref(s).left(v) {
                s = l;
            }
            let s_key = self.node_ref(s).key();
            self.node_mut(t).overwrite_key(s_key);
            s
        } else {
            t
        };

        let y_original_color = self.node_ref(y).color(v);
        let y_left = self.node_ref(y).left(v);
        let y_right = self.node_ref(y).right(v);
        // `y` has at most one child by construction (either `t` with <=1
        // child, or the successor, which never has a left child).
        let x = y_left.or(y_right);
        let y_parent = self.node_ref(y).parent(v);
        let y_side = y_parent.map(|yp| {
            if self.node_ref(yp).left(v) == Some(y) {
                Side::Left
            } else {
                Side::Right
            }
        });

        if let Some(x_id) = x {
            self.node_mut(x_id).set_parent(y_parent, v_new);
        }
        match y_parent {
            None => root_candidate = x,
            Some(yp) => self.node_mut(yp).set_child(y_side.unwrap(), x, v_new),
        }
        self.node_mut(y).retire(v_new)?;

        if y_original_color == Color::Black {
            let x_side = y_side.unwrap_or(Side::Left);
            self.delete_fixup(x, y_parent, x_side, v_new, &mut root_candidate);
        }

        if let Some(r) = root_candidate {
            self.node_mut(r).set_color(Color::Black, v_new);
        }
        self.roots.push(root_candidate);
        self.current_version = v_new;
        Ok(true)
    }

    /// Restore the black-height and red-rule invariants after splicing out
    /// a black node, propagating the resulting "double-black" deficiency
    /// at `x` (which may be nil, hence `x_parent`/`x_side` are passed
    /// explicitly rather than read off `x` itself) up toward the root. The
    /// four cases mirror CLRS: red sibling, black sibling with both
    /// nephews black (propagate up), black sibling with a red near nephew
    /// (reduces to the next case), black sibling with a red far nephew
    /// (terminal).
    fn delete_fixup(
        &mut self,
        mut x: Option<NodeId>,
        mut x_parent: Option<NodeId>,
        mut x_side: Side,
        v: Version,
        root: &mut Option<NodeId>,
    ) {
        loop {
            let Some(p) = x_parent else { break };
            let x_is_red = x.is_some_and(|n| self.node_ref(n).color(v) == Color::Red);
            if x_is_red {
                break;
            }

            let sibling_side = x_side.opposite();
            let mut w = self
                .node_ref(p)
                .child(sibling_side, v)
                .expect("x carries a black deficiency, so its sibling subtree must exist");

            if self.node_ref(w).color(v) == Color::Red {
                // Case 1: red sibling. Recolor and rotate toward x so the
                // sibling becomes black, then fall through to cases 2-4.
                self.node_mut(w).set_color(Color::Black, v);
                self.node_mut(p).set_color(Color::Red, v);
                self.rotate(p, x_side, v, root);
                w = self
                    .node_ref(p)
                    .child(sibling_side, v)
                    .expect("rotation preserves the sibling's existence");
            }

            let near = self.node_ref(w).child(x_side, v);
            let far = self.node_ref(w).child(sibling_side, v);
            let near_red = near.is_some_and(|n| self.node_ref(n).color(v) == Color::Red);
            let far_red = far.is_some_and(|n| self.node_ref(n).color(v) == Color::Red);

            if !near_red && !far_red {
                // Case 2: both nephews black. Recolor the sibling red and
                // move the deficiency up to the parent.
                self.node_mut(w).set_color(Color::Red, v);
                x_side = if let Some(pp) = self.node_ref(p).parent(v) {
                    let side = if self.node_ref(pp).left(v) == Some(p) {
                        Side::Left
                    } else {
                        Side::Right
                    };
                    x_parent = Some(pp);
                    side
                } else {
                    x_parent = None;
                    x_side
                };
                x = Some(p);
                continue;
            }

            if !far_red {
                // Case 3: near nephew red, far black. Recolor and rotate
                // the sibling away from x so the red nephew becomes the
                // far one, reducing to case 4.
                if let Some(nc) = near {
                    self.node_mut(nc).set_color(Color::Black, v);
                }
                self.node_mut(w).set_color(Color::Red, v);
                self.rotate(w, sibling_side, v, root);
                w = self
                    .node_ref(p)
                    .child(sibling_side, v)
                    .expect("rotation preserves the sibling's existence");
            }

            // Case 4: far nephew red. Terminal: one rotation at `p`
            // restores both invariants.
            let p_color = self.node_ref(p).color(v);
            self.node_mut(w).set_color(p_color, v);
            self.node_mut(p).set_color(Color::Black, v);
            if let Some(fc) = self.node_ref(w).child(sibling_side, v) {
                self.node_mut(fc).set_color(Color::Black, v);
            }
            self.rotate(p, x_side, v, root);
            break;
        }

        if let Some(n) = x {
            self.node_mut(n).set_color(Color::Black, v);
        }
    }

    /// Rotate at `n` in `side`'s direction: `Left` promotes `n`'s right
    /// child (a left rotation), `Right` promotes its left child.
    fn rotate(&mut self, n: NodeId, side: Side, v: Version, root: &mut Option<NodeId>) {
        match side {
            Side::Left => self.rotate_left(n, v, root),
            Side::Right => self.rotate_right(n, v, root),
        }
    }

    fn rotate_left(&mut self, n: NodeId, v: Version, root: &mut Option<NodeId>) {
        let r = self
            .node_ref(n)
            .right(v)
            .expect("left rotation requires a right child");
        let moved = self.node_ref(r).left(v);

        self.node_mut(n).set_right(moved, v);
        if let Some(moved) = moved {
            self.node_mut(moved).set_parent(Some(n), v);
        }
        self.relink_parent(n, r, v, root);
        self.node_mut(r).set_left(Some(n), v);
        self.node_mut(n).set_parent(Some(r), v);
    }

    fn rotate_right(&mut self, n: NodeId, v: Version, root: &mut Option<NodeId>) {
        let l = self
            .node_ref(n)
            .left(v)
            .expect("right rotation requires a left child");
        let moved = self.node_ref(l).right(v);

        self.node_mut(n).set_left(moved, v);
        if let Some(moved) = moved {
            self.node_mut(moved).set_parent(Some(n), v);
        }
        self.relink_parent(n, l, v, root);
        self.node_mut(l).set_right(Some(n), v);
        self.node_mut(n).set_parent(Some(l), v);
    }

    /// Common tail of both rotations: attach the promoted node (`new_top`)
    /// where `old_top` used to sit, under `old_top`'s former parent (or as
    /// the tree root if it had none).
    fn relink_parent(&mut self, old_top: NodeId, new_top: NodeId, v: Version, root: &mut Option<NodeId>) {
        let parent = self.node_ref(old_top).parent(v);
        self.node_mut(new_top).set_parent(parent, v);
        match parent {
            None => *root = Some(new_top),
            Some(p) => {
                let side = if self.node_ref(p).left(v) == Some(old_top) {
                    Side::Left
                } else {
                    Side::Right
                };
                self.node_mut(p).set_child(side, Some(new_top), v);
            }
        }
    }

    // ---- queries ---------------------------------------------------

    /// The least alive key strictly greater than `key` as of `v`, or
    /// `None` (the external contract's "infinito") if no such key exists.
    /// `v` beyond the latest version clamps down to it; negative `v` is an
    /// error.
    pub fn successor(&self, key: i64, v: i64) -> TreeResult<Option<i64>> {
        let v = self.clamp_version(v)?;
        let mut cur = self.root_at(v);
        let mut best = None;
        while let Some(n) = cur {
            let node_key = self.node_ref(n).key();
            if node_key > key {
                best = Some(node_key);
                cur = self.node_ref(n).left(v);
            } else {
                cur = self.node_ref(n).right(v);
            }
        }
        Ok(best)
    }

    /// All alive keys as of `v`, ascending, as `(key, depth, color)`
    /// triples; `color` is `'R'` or `'N'` (matching the external dump
    /// format). See also [`crate::iter::InOrderIter`] for a lazy version
    /// of the same traversal.
    pub fn in_order(&self, v: i64) -> TreeResult<Vec<(i64, usize, char)>> {
        let v = self.clamp_version(v)?;
        let mut out = Vec::new();
        self.in_order_walk(self.root_at(v), v, 0, &mut out);
        Ok(out)
    }

    fn in_order_walk(
        &self,
        cur: Option<NodeId>,
        v: Version,
        depth: usize,
        out: &mut Vec<(i64, usize, char)>,
    ) {
        let Some(n) = cur else { return };
        self.in_order_walk(self.node_ref(n).left(v), v, depth + 1, out);
        out.push((
            self.node_ref(n).key(),
            depth,
            self.node_ref(n).color(v).code(),
        ));
        self.in_order_walk(self.node_ref(n).right(v), v, depth + 1, out);
    }

    /// Whether `key` is alive as of `v`.
    pub fn contains(&self, key: i64, v: i64) -> TreeResult<bool> {
        let v = self.clamp_version(v)?;
        let mut cur = self.root_at(v);
        while let Some(n) = cur {
            let node_key = self.node_ref(n).key();
            if key == node_key {
                return Ok(true);
            }
            cur = if key < node_key {
                self.node_ref(n).left(v)
            } else {
                self.node_ref(n).right(v)
            };
        }
        Ok(false)
    }

    pub(crate) fn arena(&self) -> &Arena<VersionedNode> {
        &self.arena
    }

    pub(crate) fn root_for(&self, v: Version) -> Option<NodeId> {
        self.root_at(v)
    }
}

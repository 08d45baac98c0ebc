//! A partially persistent red-black tree keyed by `i64`.
//!
//! Every insertion or deletion stamps a new *version*; every earlier
//! version remains fully queryable afterward. The persistence is achieved
//! not by copying paths of nodes on each mutation, but by recording each
//! node's color, child links, and parent link as independent append-only
//! histories (see [`node::VersionedNode`]) -- a node's identity in the
//! arena never changes across a mutation, only the history entries its
//! fields accumulate.
//!
//! ```
//! use prbtree::PersistentRbTree;
//!
//! let mut tree = PersistentRbTree::new();
//! tree.insert(10);
//! tree.insert(5);
//! tree.insert(15);
//! let v3 = tree.current_version() as i64;
//!
//! tree.remove(5).unwrap();
//!
//! // Version 3 (before the removal) still shows all three keys.
//! assert_eq!(
//!     tree.in_order(v3).unwrap(),
//!     vec![(5, 1, 'R'), (10, 0, 'N'), (15, 1, 'R')]
//! );
//! // The latest version reflects the removal.
//! assert_eq!(
//!     tree.in_order(tree.current_version() as i64).unwrap(),
//!     vec![(10, 0, 'N'), (15, 1, 'R')]
//! );
//! ```

mod arena;
mod node;
mod tree;
mod version;

pub mod error;
pub mod iter;
pub mod stats;

pub use error::{TreeError, TreeResult};
pub use node::Color;
pub use tree::PersistentRbTree;
pub use version::Version;

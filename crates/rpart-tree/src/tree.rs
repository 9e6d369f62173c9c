//! Persistent partition tree and its path-addressed operations.
//!
//! Every operation returns a new [`PartitionTree`] and leaves the input
//! untouched. The descent from the root to the target rebuilds each ancestor
//! on the path; every subtree off the path is reused through [`Arc`], so the
//! old and new revisions share all unchanged nodes. An operation that turns
//! out to be a no-op returns a tree sharing the original root.
//!
//! ```text
//! split(/0, Vertical)
//!
//!      S1                 S1'
//!     /  \               /   \
//!   L2    L3    ==>    S2     L3   (L3 shared)
//!                     /  \
//!                   L4    L5
//! ```

use std::sync::Arc;

use rpart_core::{ColorSource, Rgb};
use tracing::{debug, debug_span};

use crate::alloc::IdSource;
use crate::error::{PartitionError, Result};
use crate::node::{Leaf, MAX_TREE_DEPTH, Node, NodeId, Split, SplitDirection, SplitRatio};
use crate::path::{FIRST, NodePath, SECOND};

/// Immutable binary tree of partition regions.
///
/// Cloning is O(1): clones share the root.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionTree {
    root: Arc<Node>,
}

impl PartitionTree {
    /// Build a tree with a single root leaf.
    #[must_use]
    pub fn singleton(id: NodeId, color: Rgb) -> Self {
        Self {
            root: Arc::new(Node::Leaf(Leaf { id, color })),
        }
    }

    /// Build a single-leaf tree drawing its ID and color from the given sources.
    pub fn new(ids: &mut impl IdSource, colors: &mut impl ColorSource) -> Result<Self> {
        Ok(Self::singleton(ids.next_id()?, colors.next_color()))
    }

    pub(crate) fn from_root(root: Arc<Node>) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    /// Node at `path`, if the path exists.
    #[must_use]
    pub fn node_at(&self, path: &NodePath) -> Option<&Arc<Node>> {
        let mut node = &self.root;
        for &index in path.indices() {
            node = node.as_split()?.child(index)?;
        }
        Some(node)
    }

    /// Split the leaf at `path` into two leaves along `direction`.
    ///
    /// The new split keeps the leaf's ID and gets ratio 0.5. Its first child
    /// inherits the leaf's color, the second takes a fresh color; both get
    /// fresh IDs. Splitting a node that is already a split is a no-op.
    ///
    /// A leaf at [`MAX_TREE_DEPTH`] cannot be split further.
    pub fn split(
        &self,
        path: &NodePath,
        direction: SplitDirection,
        ids: &mut impl IdSource,
        colors: &mut impl ColorSource,
    ) -> Result<Self> {
        let _span = debug_span!("partition.split", %path, direction = direction.as_str()).entered();
        let root = rebuild_at(&self.root, path.indices(), path, |target| {
            let leaf = match target.as_ref() {
                Node::Leaf(leaf) => *leaf,
                Node::Split(split) => {
                    debug!(node_id = split.id.get(), "node already split; ignoring");
                    return Ok(Arc::clone(target));
                }
            };
            if path.depth() >= MAX_TREE_DEPTH {
                return Err(PartitionError::DepthLimitExceeded {
                    path: path.child(FIRST),
                    limit: MAX_TREE_DEPTH,
                });
            }
            let first = Leaf {
                id: ids.next_id()?,
                color: leaf.color,
            };
            let second = Leaf {
                id: ids.next_id()?,
                color: colors.next_color(),
            };
            debug!(
                node_id = leaf.id.get(),
                first_id = first.id.get(),
                second_id = second.id.get(),
                "leaf split"
            );
            Ok(Arc::new(Node::Split(Split {
                id: leaf.id,
                direction,
                ratio: SplitRatio::HALF,
                first: Arc::new(Node::Leaf(first)),
                second: Arc::new(Node::Leaf(second)),
            })))
        })?;
        Ok(Self { root })
    }

    /// Remove the node at `path` and promote its sibling into the parent's place.
    ///
    /// The root cannot be removed.
    pub fn remove(&self, path: &NodePath) -> Result<Self> {
        let _span = debug_span!("partition.remove", %path).entered();
        let Some((&index, parent)) = path.indices().split_last() else {
            return Err(PartitionError::InvalidPath { path: path.clone() });
        };
        let sibling_index = match index {
            FIRST => SECOND,
            SECOND => FIRST,
            _ => return Err(PartitionError::path_not_found(path)),
        };
        let root = rebuild_at(&self.root, parent, path, |target| {
            let Node::Split(split) = target.as_ref() else {
                return Err(PartitionError::path_not_found(path));
            };
            let survivor = if sibling_index == FIRST {
                &split.first
            } else {
                &split.second
            };
            debug!(
                parent_id = split.id.get(),
                survivor_id = survivor.id().get(),
                "sibling promoted"
            );
            Ok(Arc::clone(survivor))
        })?;
        Ok(Self { root })
    }

    /// Set the ratio of the split at `path`, clamped into the valid range.
    ///
    /// Setting the ratio a split already holds returns a tree sharing the
    /// original root.
    pub fn set_ratio(&self, path: &NodePath, ratio: f64) -> Result<Self> {
        let ratio = SplitRatio::new(ratio);
        let root = rebuild_at(&self.root, path.indices(), path, |target| {
            let Node::Split(split) = target.as_ref() else {
                return Err(PartitionError::path_not_found(path));
            };
            if split.ratio == ratio {
                return Ok(Arc::clone(target));
            }
            Ok(Arc::new(Node::Split(split.with_ratio(ratio))))
        })?;
        Ok(Self { root })
    }

    /// Leaves in render order (first child before second), with their paths.
    #[must_use]
    pub fn leaves(&self) -> Vec<(NodePath, Leaf)> {
        let mut out = Vec::new();
        self.visit(|path, node| {
            if let Node::Leaf(leaf) = node {
                out.push((path.clone(), *leaf));
            }
        });
        out
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.visit(|_, node| count += usize::from(node.is_leaf()));
        count
    }

    /// Total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut count = 0;
        self.visit(|_, _| count += 1);
        count
    }

    /// Always false: a tree holds at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Length of the longest root-to-leaf path (a lone root leaf has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        self.visit(|path, _| depth = depth.max(path.depth()));
        depth
    }

    /// Path of the node with `id`.
    #[must_use]
    pub fn find(&self, id: NodeId) -> Option<NodePath> {
        let mut found = None;
        self.visit(|path, node| {
            if found.is_none() && node.id() == id {
                found = Some(path.clone());
            }
        });
        found
    }

    /// Largest node ID present in the tree.
    #[must_use]
    pub fn max_id(&self) -> NodeId {
        let mut max = self.root.id();
        self.visit(|_, node| max = max.max(node.id()));
        max
    }

    /// Pre-order walk over every node with its path.
    pub fn visit(&self, mut f: impl FnMut(&NodePath, &Node)) {
        let mut stack = vec![(NodePath::root(), &self.root)];
        while let Some((path, node)) = stack.pop() {
            f(&path, node);
            if let Node::Split(split) = node.as_ref() {
                stack.push((path.child(SECOND), &split.second));
                stack.push((path.child(FIRST), &split.first));
            }
        }
    }

    /// Deterministic structural hash (FNV-1a over a pre-order walk).
    ///
    /// Equal trees hash equal regardless of how much structure they share.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0001_0000_01b3;

        fn mix(hash: &mut u64, byte: u8) {
            *hash ^= u64::from(byte);
            *hash = hash.wrapping_mul(PRIME);
        }

        fn mix_bytes(hash: &mut u64, bytes: &[u8]) {
            for byte in bytes {
                mix(hash, *byte);
            }
        }

        let mut hash = OFFSET_BASIS;
        self.visit(|_, node| match node {
            Node::Leaf(leaf) => {
                mix(&mut hash, 0);
                mix_bytes(&mut hash, &leaf.id.get().to_le_bytes());
                mix_bytes(&mut hash, &[leaf.color.r, leaf.color.g, leaf.color.b]);
            }
            Node::Split(split) => {
                mix(&mut hash, 1);
                mix_bytes(&mut hash, &split.id.get().to_le_bytes());
                mix(
                    &mut hash,
                    match split.direction {
                        SplitDirection::Horizontal => 0,
                        SplitDirection::Vertical => 1,
                    },
                );
                mix_bytes(&mut hash, &split.ratio.get().to_bits().to_le_bytes());
            }
        });
        hash
    }
}

/// Rebuild the spine from `node` down to `remaining`, replacing the target
/// with the result of `f`.
///
/// `full` is the caller's path, reported in errors. When `f` hands back the
/// target unchanged the original `node` is returned, so no-ops allocate
/// nothing.
fn rebuild_at<F>(node: &Arc<Node>, remaining: &[usize], full: &NodePath, f: F) -> Result<Arc<Node>>
where
    F: FnOnce(&Arc<Node>) -> Result<Arc<Node>>,
{
    let Some((&index, rest)) = remaining.split_first() else {
        return f(node);
    };
    let Node::Split(split) = node.as_ref() else {
        return Err(PartitionError::path_not_found(full));
    };
    let child = split
        .child(index)
        .ok_or_else(|| PartitionError::path_not_found(full))?;
    let rebuilt = rebuild_at(child, rest, full, f)?;
    if Arc::ptr_eq(&rebuilt, child) {
        return Ok(Arc::clone(node));
    }
    Ok(Arc::new(Node::Split(split.with_child(index, rebuilt))))
}

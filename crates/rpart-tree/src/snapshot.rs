//! Serializable tree snapshots.
//!
//! A snapshot is the nested, versioned wire form of a [`PartitionTree`]:
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "root": {
//!     "kind": "split", "id": 1, "direction": "horizontal", "ratio": 0.5,
//!     "first":  { "kind": "leaf", "id": 2, "color": "#c80a0a" },
//!     "second": { "kind": "leaf", "id": 3, "color": "#0ac80a" }
//!   }
//! }
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use rpart_core::Rgb;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PartitionError, Result};
use crate::node::{Leaf, MAX_TREE_DEPTH, Node, NodeId, Split, SplitDirection, SplitRatio};
use crate::path::{FIRST, NodePath, SECOND};
use crate::tree::PartitionTree;

/// Current snapshot schema version.
pub const TREE_SNAPSHOT_SCHEMA_VERSION: u16 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    pub root: NodeSnapshot,
}

fn default_schema_version() -> u16 {
    TREE_SNAPSHOT_SCHEMA_VERSION
}

/// One node in a snapshot. IDs are raw so that invalid input can be reported
/// instead of failing inside the deserializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSnapshot {
    Leaf {
        id: u64,
        color: Rgb,
    },
    Split {
        id: u64,
        direction: SplitDirection,
        ratio: f64,
        first: Box<NodeSnapshot>,
        second: Box<NodeSnapshot>,
    },
}

impl NodeSnapshot {
    fn capture(node: &Node) -> Self {
        match node {
            Node::Leaf(leaf) => Self::Leaf {
                id: leaf.id.get(),
                color: leaf.color,
            },
            Node::Split(split) => Self::Split {
                id: split.id.get(),
                direction: split.direction,
                ratio: split.ratio.get(),
                first: Box::new(Self::capture(&split.first)),
                second: Box::new(Self::capture(&split.second)),
            },
        }
    }

    fn restore(&self, path: &NodePath, seen: &mut BTreeSet<NodeId>) -> Result<Arc<Node>> {
        if path.depth() > MAX_TREE_DEPTH {
            return Err(PartitionError::DepthLimitExceeded {
                path: path.clone(),
                limit: MAX_TREE_DEPTH,
            });
        }
        let node = match self {
            Self::Leaf { id, color } => Node::Leaf(Leaf {
                id: claim(*id, seen)?,
                color: *color,
            }),
            Self::Split {
                id,
                direction,
                ratio,
                first,
                second,
            } => Node::Split(Split {
                id: claim(*id, seen)?,
                direction: *direction,
                ratio: SplitRatio::new(*ratio),
                first: first.restore(&path.child(FIRST), seen)?,
                second: second.restore(&path.child(SECOND), seen)?,
            }),
        };
        Ok(Arc::new(node))
    }
}

fn claim(raw: u64, seen: &mut BTreeSet<NodeId>) -> Result<NodeId> {
    let id = NodeId::new(raw)?;
    if !seen.insert(id) {
        return Err(PartitionError::DuplicateNodeId { id });
    }
    Ok(id)
}

impl PartitionTree {
    /// Export to snapshot form.
    #[must_use]
    pub fn to_snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            schema_version: TREE_SNAPSHOT_SCHEMA_VERSION,
            root: NodeSnapshot::capture(self.root()),
        }
    }

    /// Construct and validate from a snapshot.
    ///
    /// Rejects unknown schema versions, zero IDs, duplicate IDs and nodes
    /// below [`MAX_TREE_DEPTH`].
    /// Out-of-range ratios are clamped rather than rejected.
    pub fn from_snapshot(snapshot: &TreeSnapshot) -> Result<Self> {
        if snapshot.schema_version != TREE_SNAPSHOT_SCHEMA_VERSION {
            return Err(PartitionError::UnsupportedSchemaVersion {
                version: snapshot.schema_version,
            });
        }
        let mut seen = BTreeSet::new();
        let root = snapshot.root.restore(&NodePath::root(), &mut seen)?;
        debug!(nodes = seen.len(), "tree restored from snapshot");
        Ok(Self::from_root(root))
    }
}

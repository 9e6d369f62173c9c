//! Node ID allocation.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::node::NodeId;
use crate::tree::PartitionTree;

/// Producer of fresh node IDs, injected into tree operations that create nodes.
pub trait IdSource {
    /// Allocate a fresh ID never returned before.
    fn next_id(&mut self) -> Result<NodeId>;
}

impl<T: IdSource + ?Sized> IdSource for &mut T {
    fn next_id(&mut self) -> Result<NodeId> {
        (**self).next_id()
    }
}

/// Deterministic monotonic allocator for node IDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: NodeId,
}

impl IdAllocator {
    /// Start allocating from a known ID.
    #[must_use]
    pub const fn with_next(next: NodeId) -> Self {
        Self { next }
    }

    /// Create an allocator that continues past every ID in `tree`.
    pub fn from_tree(tree: &PartitionTree) -> Result<Self> {
        Ok(Self {
            next: tree.max_id().checked_next()?,
        })
    }

    /// Peek at the next ID without consuming.
    #[must_use]
    pub const fn peek(&self) -> NodeId {
        self.next
    }

    /// Allocate the next ID and advance.
    pub fn allocate(&mut self) -> Result<NodeId> {
        let current = self.next;
        self.next = self.next.checked_next()?;
        Ok(current)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: NodeId::MIN }
    }
}

impl IdSource for IdAllocator {
    fn next_id(&mut self) -> Result<NodeId> {
        self.allocate()
    }
}

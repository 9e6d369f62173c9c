use thiserror::Error;

use crate::node::NodeId;
use crate::path::NodePath;

pub type Result<T> = std::result::Result<T, PartitionError>;

/// Contract violations and model errors for partition-tree operations.
///
/// Path errors indicate the caller addressed a node that is not in the
/// current tree. Hosts that only emit paths taken from the current layout
/// never see them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    #[error("no node at path {path}")]
    PathNotFound { path: NodePath },

    #[error("path {path} cannot be removed")]
    InvalidPath { path: NodePath },

    #[error("node at {path} is deeper than the {limit}-level limit")]
    DepthLimitExceeded { path: NodePath, limit: usize },

    #[error("node id space exhausted")]
    IdOverflow,

    #[error("node id 0 is reserved")]
    ZeroNodeId,

    #[error("duplicate node id {id}")]
    DuplicateNodeId { id: NodeId },

    #[error("unsupported snapshot schema version {version}")]
    UnsupportedSchemaVersion { version: u16 },

    #[error("invalid snap policy: {reason}")]
    InvalidSnapPolicy { reason: String },

    #[error("invalid canvas {width}x{height}")]
    InvalidCanvas { width: u16, height: u16 },
}

impl PartitionError {
    pub(crate) fn path_not_found(path: &NodePath) -> Self {
        Self::PathNotFound { path: path.clone() }
    }

    /// Whether the error comes from a stale or malformed path.
    #[must_use]
    pub const fn is_path_error(&self) -> bool {
        matches!(self, Self::PathNotFound { .. } | Self::InvalidPath { .. })
    }
}

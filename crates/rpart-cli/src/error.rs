use std::path::PathBuf;

use rpart_tree::PartitionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot parse {path}: {source}")]
    InvalidInput {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error(transparent)]
    Partition(#[from] PartitionError),

    #[error("required path does not exist: {path}")]
    MissingPath { path: PathBuf },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("event {index} ({op}) rejected: {source}")]
    EventRejected {
        index: usize,
        op: &'static str,
        source: PartitionError,
    },
}

impl CliError {
    /// Process exit code: 2 for bad input, 3 for rejected script events.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. }
            | Self::MissingPath { .. }
            | Self::InvalidInput { .. }
            | Self::ConfigParse(_)
            | Self::Partition(
                PartitionError::InvalidCanvas { .. }
                | PartitionError::InvalidSnapPolicy { .. }
                | PartitionError::ZeroNodeId
                | PartitionError::DuplicateNodeId { .. }
                | PartitionError::UnsupportedSchemaVersion { .. }
                | PartitionError::DepthLimitExceeded { .. },
            ) => 2,
            Self::EventRejected { .. } => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

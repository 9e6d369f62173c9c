//! Editor configuration.
//!
//! Loaded by hosts from TOML or JSON; every field has a default so partial
//! files are accepted.
//!
//! ```toml
//! [canvas]
//! width = 120
//! height = 40
//!
//! [snap]
//! threshold = 0.03
//! targets = [
//!     { ratio = 0.333, label = "1/3" },
//!     { ratio = 0.5, label = "1/2" },
//! ]
//! ```

use rpart_core::Rect;
use serde::{Deserialize, Serialize};

use crate::error::{PartitionError, Result};
use crate::snap::SnapPolicy;

pub const DEFAULT_CANVAS_WIDTH: u16 = 80;
pub const DEFAULT_CANVAS_HEIGHT: u16 = 24;

/// Canvas dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u16,
    pub height: u16,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

impl CanvasConfig {
    #[must_use]
    pub const fn area(self) -> Rect {
        Rect::from_size(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas: CanvasConfig,
    pub snap: SnapPolicy,
}

impl EditorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(PartitionError::InvalidCanvas {
                width: self.canvas.width,
                height: self.canvas.height,
            });
        }
        self.snap.validate()
    }
}

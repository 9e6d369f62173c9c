#![forbid(unsafe_code)]

//! Persistent partition tree, layout, and drag/snap controller.
//!
//! A canvas is divided recursively into a binary tree of regions. Leaves are
//! colored regions; splits divide their rectangle along one axis at a ratio
//! in `[0.1, 0.9]`. Nodes are addressed by [`NodePath`], the list of child
//! indices walked from the root.
//!
//! [`PartitionTree`] operations are persistent: each returns a new tree that
//! shares every untouched subtree with its input. [`Editor`] wraps a tree in
//! a stateful session that also tracks ID allocation, colors, the canvas, and
//! divider drags with snap-to-fraction assistance.
//!
//! ```
//! use rpart_core::{PaletteColors, Rgb};
//! use rpart_tree::{EditorConfig, Editor, NodePath, SplitDirection};
//!
//! let colors = PaletteColors::new(vec![Rgb::new(200, 40, 40), Rgb::new(40, 40, 200)]);
//! let mut editor = Editor::new(EditorConfig::default(), colors)?;
//! editor.split(&NodePath::root(), SplitDirection::Horizontal)?;
//! editor.split(&NodePath::from([0]), SplitDirection::Vertical)?;
//! editor.remove(&NodePath::from([0, 1]))?;
//! assert!(editor.tree().node_at(&NodePath::from([0])).is_some_and(|n| n.is_leaf()));
//! # Ok::<(), rpart_tree::PartitionError>(())
//! ```

pub use rpart_core::geometry::{PointerPosition, Rect};

pub mod alloc;
pub mod config;
pub mod drag;
pub mod editor;
pub mod error;
pub mod layout;
pub mod node;
pub mod path;
pub mod snap;
pub mod snapshot;
pub mod tree;

pub use alloc::{IdAllocator, IdSource};
pub use config::{CanvasConfig, EditorConfig};
pub use drag::{
    CursorHint, DragController, DragEnd, DragGrip, DragState, DragUpdate, SnapIndicator,
};
pub use editor::{Editor, EditorEffect, EditorEvent};
pub use error::{PartitionError, Result};
pub use layout::{Divider, PartitionLayout, Region};
pub use node::{
    DEFAULT_SPLIT_RATIO, Leaf, MAX_TREE_DEPTH, Node, NodeId, RATIO_MAX, RATIO_MIN, Split,
    SplitDirection, SplitRatio,
};
pub use path::{NodePath, ParseNodePathError};
pub use snap::{DEFAULT_SNAP_THRESHOLD, SnapOutcome, SnapPolicy, SnapTarget};
pub use snapshot::{NodeSnapshot, TREE_SNAPSHOT_SCHEMA_VERSION, TreeSnapshot};
pub use tree::PartitionTree;

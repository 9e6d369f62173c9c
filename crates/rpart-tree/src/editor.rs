//! Editor session: the boundary between a host and the partition model.
//!
//! An [`Editor`] owns the current tree revision, the ID allocator, the color
//! source and the drag controller. Hosts feed it [`EditorEvent`]s (semantic
//! commands or raw pointer input) and receive an [`EditorEffect`] describing
//! what changed. Layouts are solved on demand from the current tree and
//! canvas, so pointer hit-testing always sees the latest revision.

use std::sync::Arc;

use rpart_core::{ColorSource, PointerPosition, RandomColors, Rect};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::alloc::IdAllocator;
use crate::config::EditorConfig;
use crate::drag::{CursorHint, DragController, DragEnd, DragGrip, DragUpdate};
use crate::error::{PartitionError, Result};
use crate::layout::PartitionLayout;
use crate::node::SplitDirection;
use crate::path::NodePath;
use crate::tree::PartitionTree;

/// Input accepted by [`Editor::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditorEvent {
    Split {
        path: NodePath,
        direction: SplitDirection,
    },
    Remove {
        path: NodePath,
    },
    SetRatio {
        path: NodePath,
        ratio: f64,
    },
    PointerDown {
        x: i32,
        y: i32,
    },
    PointerMove {
        x: i32,
        y: i32,
    },
    PointerUp {
        x: i32,
        y: i32,
    },
    Resize {
        width: u16,
        height: u16,
    },
}

impl EditorEvent {
    #[must_use]
    pub const fn op(&self) -> &'static str {
        match self {
            Self::Split { .. } => "split",
            Self::Remove { .. } => "remove",
            Self::SetRatio { .. } => "set_ratio",
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp { .. } => "pointer_up",
            Self::Resize { .. } => "resize",
        }
    }
}

/// Outcome of one applied event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum EditorEffect {
    /// A new tree revision replaced the previous one.
    TreeChanged { revision: u64 },
    /// Nothing observable changed.
    Unchanged,
    DragStarted {
        path: NodePath,
        cursor: CursorHint,
    },
    DragUpdated(DragUpdate),
    DragEnded(DragEnd),
    Resized { area: Rect },
}

/// Stateful editing session over a [`PartitionTree`].
#[derive(Debug)]
pub struct Editor<C: ColorSource = RandomColors> {
    tree: PartitionTree,
    ids: IdAllocator,
    colors: C,
    drag: DragController,
    config: EditorConfig,
    canvas: Rect,
    revision: u64,
}

impl<C: ColorSource> Editor<C> {
    /// Start a session with a single root leaf.
    pub fn new(config: EditorConfig, mut colors: C) -> Result<Self> {
        config.validate()?;
        let mut ids = IdAllocator::default();
        let tree = PartitionTree::new(&mut ids, &mut colors)?;
        Ok(Self::assemble(tree, ids, colors, config))
    }

    /// Resume a session on an existing tree; new IDs continue past its largest.
    pub fn from_tree(tree: PartitionTree, config: EditorConfig, colors: C) -> Result<Self> {
        config.validate()?;
        let ids = IdAllocator::from_tree(&tree)?;
        Ok(Self::assemble(tree, ids, colors, config))
    }

    fn assemble(tree: PartitionTree, ids: IdAllocator, colors: C, config: EditorConfig) -> Self {
        Self {
            tree,
            ids,
            colors,
            drag: DragController::new(config.snap.clone()),
            canvas: config.canvas.area(),
            config,
            revision: 0,
        }
    }

    #[must_use]
    pub fn tree(&self) -> &PartitionTree {
        &self.tree
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub const fn canvas(&self) -> Rect {
        self.canvas
    }

    #[must_use]
    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Number of tree revisions committed since the session started.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Layout of the current tree on the current canvas.
    #[must_use]
    pub fn layout(&self) -> PartitionLayout {
        self.tree.solve_layout(self.canvas)
    }

    /// Apply one event. Rejected events leave the session untouched.
    pub fn apply(&mut self, event: EditorEvent) -> Result<EditorEffect> {
        let op = event.op();
        let result = match event {
            EditorEvent::Split { path, direction } => self.split(&path, direction),
            EditorEvent::Remove { path } => self.remove(&path),
            EditorEvent::SetRatio { path, ratio } => self.set_ratio(&path, ratio),
            EditorEvent::PointerDown { x, y } => Ok(self.pointer_down(PointerPosition::new(x, y))),
            EditorEvent::PointerMove { x, y } => self.pointer_move(PointerPosition::new(x, y)),
            EditorEvent::PointerUp { x, y } => Ok(self.pointer_up(PointerPosition::new(x, y))),
            EditorEvent::Resize { width, height } => self.resize(width, height),
        };
        if let Err(err) = &result {
            warn!(op, error = %err, "editor event rejected");
        }
        result
    }

    pub fn split(&mut self, path: &NodePath, direction: SplitDirection) -> Result<EditorEffect> {
        let next = self
            .tree
            .split(path, direction, &mut self.ids, &mut self.colors)?;
        Ok(self.commit_structural(next))
    }

    pub fn remove(&mut self, path: &NodePath) -> Result<EditorEffect> {
        let next = self.tree.remove(path)?;
        Ok(self.commit_structural(next))
    }

    /// Set a ratio directly; no snapping is applied.
    pub fn set_ratio(&mut self, path: &NodePath, ratio: f64) -> Result<EditorEffect> {
        let next = self.tree.set_ratio(path, ratio)?;
        Ok(self.commit(next))
    }

    /// Begin a drag if the pointer is on a divider.
    pub fn pointer_down(&mut self, pointer: PointerPosition) -> EditorEffect {
        if self.drag.is_dragging() {
            return EditorEffect::Unchanged;
        }
        let layout = self.layout();
        let Some(divider) = layout.divider_at(pointer) else {
            return EditorEffect::Unchanged;
        };
        let grip = DragGrip {
            path: divider.path.clone(),
            direction: divider.direction,
            start_ratio: divider.ratio,
            start: pointer,
            container: divider.container,
        };
        if !self.drag.begin(grip) {
            return EditorEffect::Unchanged;
        }
        EditorEffect::DragStarted {
            path: divider.path.clone(),
            cursor: CursorHint::for_direction(divider.direction),
        }
    }

    /// Recompute the dragged ratio and commit it to the tree.
    pub fn pointer_move(&mut self, pointer: PointerPosition) -> Result<EditorEffect> {
        let Some(update) = self.drag.update(pointer) else {
            return Ok(EditorEffect::Unchanged);
        };
        match self.tree.set_ratio(&update.path, update.ratio.get()) {
            Ok(next) => {
                self.commit(next);
                Ok(EditorEffect::DragUpdated(update))
            }
            Err(err) => {
                self.drag.cancel();
                Err(err)
            }
        }
    }

    pub fn pointer_up(&mut self, pointer: PointerPosition) -> EditorEffect {
        match self.drag.end() {
            Some(end) => {
                debug!(x = pointer.x, y = pointer.y, path = %end.path, "pointer released");
                EditorEffect::DragEnded(end)
            }
            None => EditorEffect::Unchanged,
        }
    }

    /// Change the canvas size. An active drag is cancelled.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<EditorEffect> {
        if width == 0 || height == 0 {
            return Err(PartitionError::InvalidCanvas { width, height });
        }
        let area = Rect::from_size(width, height);
        if area == self.canvas {
            return Ok(EditorEffect::Unchanged);
        }
        self.cancel_drag("canvas resized");
        self.canvas = area;
        Ok(EditorEffect::Resized { area })
    }

    fn commit_structural(&mut self, next: PartitionTree) -> EditorEffect {
        if !Arc::ptr_eq(next.root(), self.tree.root()) {
            self.cancel_drag("tree structure changed");
        }
        self.commit(next)
    }

    fn commit(&mut self, next: PartitionTree) -> EditorEffect {
        if Arc::ptr_eq(next.root(), self.tree.root()) {
            return EditorEffect::Unchanged;
        }
        self.tree = next;
        self.revision += 1;
        debug!(
            revision = self.revision,
            leaves = self.tree.leaf_count(),
            "tree revision committed"
        );
        EditorEffect::TreeChanged {
            revision: self.revision,
        }
    }

    fn cancel_drag(&mut self, reason: &'static str) {
        if let Some(end) = self.drag.cancel() {
            debug!(path = %end.path, reason, "drag cancelled");
        }
    }
}

//! Divider drag controller.
//!
//! Converts a pointer gesture on a divider into a sequence of ratio updates
//! for one split, with snap-to-fraction assistance.
//!
//! ```text
//! Idle --begin--> Dragging --update--> Dragging --end--> Idle
//! ```
//!
//! Every update is computed from the ratio and pointer position captured at
//! `begin`, never from the previous update, so high-frequency move events do
//! not accumulate error and replaying the same position yields the same
//! ratio.

use rpart_core::{PointerPosition, Rect};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::node::{SplitDirection, SplitRatio};
use crate::path::NodePath;
use crate::snap::{SnapOutcome, SnapPolicy};

/// Offset of the snap indicator from the pointer, in cells.
pub const SNAP_INDICATOR_OFFSET: (i32, i32) = (1, 1);

/// Pointer-cursor override requested while a drag is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorHint {
    /// Horizontal resize (dragging a column divider).
    ColResize,
    /// Vertical resize (dragging a row divider).
    RowResize,
}

impl CursorHint {
    #[must_use]
    pub const fn for_direction(direction: SplitDirection) -> Self {
        match direction {
            SplitDirection::Horizontal => Self::ColResize,
            SplitDirection::Vertical => Self::RowResize,
        }
    }
}

/// What the pointer went down on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragGrip {
    /// Path of the split whose divider is dragged.
    pub path: NodePath,
    pub direction: SplitDirection,
    /// Ratio of the split when the drag starts.
    pub start_ratio: SplitRatio,
    /// Pointer position at pointer-down.
    pub start: PointerPosition,
    /// Rectangle of the whole split.
    pub container: Rect,
}

/// Transient label shown while the ratio is snapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapIndicator {
    pub label: String,
    pub target: f64,
    /// Where to draw the label, relative to the current pointer.
    pub anchor: PointerPosition,
}

/// Ratio update produced by one pointer move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragUpdate {
    pub path: NodePath,
    /// `start_ratio + delta / extent`, before clamping.
    pub raw_ratio: f64,
    /// Ratio to store on the split.
    pub ratio: SplitRatio,
    pub indicator: Option<SnapIndicator>,
}

/// Summary of a finished drag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragEnd {
    pub path: NodePath,
    /// Last ratio emitted, if the pointer moved at all.
    pub final_ratio: Option<SplitRatio>,
    /// Cursor override being released.
    pub released_cursor: CursorHint,
}

/// Active drag session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragSession {
    pub grip: DragGrip,
    /// Length of the container along the split axis, at least 1.
    pub extent: u16,
    pub last_ratio: Option<SplitRatio>,
}

/// Drag lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    Idle,
    Dragging(DragSession),
}

/// Per-instance drag state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct DragController {
    state: DragState,
    policy: SnapPolicy,
    indicator: Option<SnapIndicator>,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(SnapPolicy::default())
    }
}

impl DragController {
    #[must_use]
    pub fn new(policy: SnapPolicy) -> Self {
        Self {
            state: DragState::Idle,
            policy,
            indicator: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub fn policy(&self) -> &SnapPolicy {
        &self.policy
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Current snap indicator, present only while snapped.
    #[must_use]
    pub fn indicator(&self) -> Option<&SnapIndicator> {
        self.indicator.as_ref()
    }

    /// Cursor override to apply while dragging.
    #[must_use]
    pub fn cursor(&self) -> Option<CursorHint> {
        match &self.state {
            DragState::Dragging(session) => Some(CursorHint::for_direction(session.grip.direction)),
            DragState::Idle => None,
        }
    }

    /// Start dragging. Ignored (returns `false`) while a drag is already active.
    pub fn begin(&mut self, grip: DragGrip) -> bool {
        if let DragState::Dragging(active) = &self.state {
            debug!(active = %active.grip.path, requested = %grip.path, "drag already in progress");
            return false;
        }
        let extent = grip.direction.extent(grip.container).max(1);
        debug!(
            path = %grip.path,
            direction = grip.direction.as_str(),
            start_ratio = grip.start_ratio.get(),
            extent,
            "drag started"
        );
        self.indicator = None;
        self.state = DragState::Dragging(DragSession {
            grip,
            extent,
            last_ratio: None,
        });
        true
    }

    /// Compute the ratio for a pointer move; `None` while idle.
    pub fn update(&mut self, current: PointerPosition) -> Option<DragUpdate> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        let grip = &session.grip;
        let delta = i64::from(grip.direction.coordinate(current))
            - i64::from(grip.direction.coordinate(grip.start));
        let raw_ratio = grip.start_ratio.get() + delta as f64 / f64::from(session.extent);
        let SnapOutcome { ratio, target, .. } = self.policy.evaluate(raw_ratio);
        let indicator = target.map(|target| SnapIndicator {
            label: target.label,
            target: target.ratio,
            anchor: current.offset(SNAP_INDICATOR_OFFSET.0, SNAP_INDICATOR_OFFSET.1),
        });

        session.last_ratio = Some(ratio);
        self.indicator.clone_from(&indicator);
        Some(DragUpdate {
            path: grip.path.clone(),
            raw_ratio,
            ratio,
            indicator,
        })
    }

    /// Finish the drag: clear the indicator, release the cursor, return to idle.
    pub fn end(&mut self) -> Option<DragEnd> {
        let DragState::Dragging(session) = std::mem::replace(&mut self.state, DragState::Idle)
        else {
            return None;
        };
        self.indicator = None;
        debug!(
            path = %session.grip.path,
            final_ratio = ?session.last_ratio.map(SplitRatio::get),
            "drag ended"
        );
        Some(DragEnd {
            released_cursor: CursorHint::for_direction(session.grip.direction),
            path: session.grip.path,
            final_ratio: session.last_ratio,
        })
    }

    /// Abort any active drag; used when the tree changes under the gesture.
    pub fn cancel(&mut self) -> Option<DragEnd> {
        self.end()
    }
}

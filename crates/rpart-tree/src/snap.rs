//! Snap-to-fraction policy for drag-computed ratios.

use serde::{Deserialize, Serialize};

use crate::error::{PartitionError, Result};
use crate::node::{RATIO_MAX, RATIO_MIN, SplitRatio, clamp_ratio};

/// Default snap window, as an absolute ratio distance.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 0.02;

/// Slack added to the threshold so that ratios exactly on the window edge
/// (e.g. `0.52` against `0.5`) snap despite float rounding.
const SNAP_EPSILON: f64 = 1e-9;

/// One canonical fraction a ratio can snap to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapTarget {
    pub ratio: f64,
    pub label: String,
}

impl SnapTarget {
    #[must_use]
    pub fn new(ratio: f64, label: impl Into<String>) -> Self {
        Self {
            ratio,
            label: label.into(),
        }
    }
}

/// Ordered snap targets plus the distance within which they attract.
///
/// Targets are checked in list order and the first one within `threshold`
/// wins, even if a later target is closer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapPolicy {
    pub threshold: f64,
    pub targets: Vec<SnapTarget>,
}

impl Default for SnapPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SNAP_THRESHOLD,
            targets: vec![
                SnapTarget::new(0.25, "1/4"),
                SnapTarget::new(0.5, "1/2"),
                SnapTarget::new(0.75, "3/4"),
            ],
        }
    }
}

/// Result of evaluating a ratio against a [`SnapPolicy`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapOutcome {
    /// Ratio before clamping.
    pub input: f64,
    /// Ratio after clamping into the valid range.
    pub clamped: f64,
    /// Ratio to store: the snap target if one matched, else `clamped`.
    pub ratio: SplitRatio,
    /// Matched target, if any.
    pub target: Option<SnapTarget>,
}

impl SnapOutcome {
    #[must_use]
    pub fn snapped(&self) -> bool {
        self.target.is_some()
    }
}

impl SnapPolicy {
    /// A policy that never snaps.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            threshold: DEFAULT_SNAP_THRESHOLD,
            targets: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(PartitionError::InvalidSnapPolicy { reason });
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return invalid(format!(
                "threshold {} must be a positive number",
                self.threshold
            ));
        }
        let mut previous: Option<f64> = None;
        for target in &self.targets {
            if !(RATIO_MIN..=RATIO_MAX).contains(&target.ratio) {
                return invalid(format!(
                    "target {} ({}) outside [{RATIO_MIN}, {RATIO_MAX}]",
                    target.label, target.ratio
                ));
            }
            if previous.is_some_and(|prev| target.ratio <= prev) {
                return invalid(format!(
                    "target {} ({}) is not in ascending order",
                    target.label, target.ratio
                ));
            }
            previous = Some(target.ratio);
        }
        Ok(())
    }

    /// Clamp `raw` and snap it to the first target within the threshold.
    /// The window is inclusive on both sides of each target.
    #[must_use]
    pub fn evaluate(&self, raw: f64) -> SnapOutcome {
        let clamped = clamp_ratio(raw);
        let target = self
            .targets
            .iter()
            .find(|target| (clamped - target.ratio).abs() <= self.threshold + SNAP_EPSILON)
            .cloned();
        let ratio = SplitRatio::new(target.as_ref().map_or(clamped, |target| target.ratio));
        SnapOutcome {
            input: raw,
            clamped,
            ratio,
            target,
        }
    }
}

//! Node model for the partition tree.
//!
//! A node is either a [`Leaf`] (an undivided colored region) or a [`Split`]
//! (a region divided in two along one axis). Split children are held in
//! [`Arc`]s so that every tree revision shares untouched subtrees with the
//! revision it was derived from.

use std::fmt;
use std::sync::Arc;

use rpart_core::{PointerPosition, Rect, Rgb};
use serde::{Deserialize, Serialize};

use crate::error::{PartitionError, Result};
use crate::path::{FIRST, SECOND};

/// Smallest ratio a split may hold.
pub const RATIO_MIN: f64 = 0.1;

/// Largest ratio a split may hold.
pub const RATIO_MAX: f64 = 0.9;

/// Ratio assigned to freshly created splits.
pub const DEFAULT_SPLIT_RATIO: f64 = 0.5;

/// Deepest level a node may sit at (the root is level 0).
///
/// Keeps the nested snapshot form well inside `serde_json`'s default
/// nesting limit so every tree can be written and read back.
pub const MAX_TREE_DEPTH: usize = 64;

/// Stable identifier for tree nodes.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Lowest valid node ID.
    pub const MIN: Self = Self(1);

    /// Create a node ID, rejecting 0.
    pub fn new(raw: u64) -> Result<Self> {
        if raw == 0 {
            return Err(PartitionError::ZeroNodeId);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next ID, or an error on overflow.
    pub fn checked_next(self) -> Result<Self> {
        let next = self.0.checked_add(1).ok_or(PartitionError::IdOverflow)?;
        Self::new(next)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Axis a split divides its region along.
///
/// `Horizontal` places the children side by side (the divider is a column);
/// `Vertical` stacks them (the divider is a row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitDirection {
    Horizontal,
    Vertical,
}

impl SplitDirection {
    /// Length of `rect` along the divided axis.
    #[must_use]
    pub const fn extent(self, rect: Rect) -> u16 {
        match self {
            Self::Horizontal => rect.width,
            Self::Vertical => rect.height,
        }
    }

    /// Pointer coordinate along the divided axis.
    #[must_use]
    pub const fn coordinate(self, pointer: PointerPosition) -> i32 {
        match self {
            Self::Horizontal => pointer.x,
            Self::Vertical => pointer.y,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// Clamp a raw ratio into `[RATIO_MIN, RATIO_MAX]`.
///
/// Infinities clamp to the nearest bound; NaN maps to the default ratio.
#[must_use]
pub fn clamp_ratio(raw: f64) -> f64 {
    if raw.is_nan() {
        return DEFAULT_SPLIT_RATIO;
    }
    raw.clamp(RATIO_MIN, RATIO_MAX)
}

/// Fraction of a split's extent given to its first child.
///
/// Always within `[RATIO_MIN, RATIO_MAX]`; construction clamps and never fails.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct SplitRatio(f64);

impl SplitRatio {
    /// The even split.
    pub const HALF: Self = Self(DEFAULT_SPLIT_RATIO);

    #[must_use]
    pub fn new(raw: f64) -> Self {
        Self(clamp_ratio(raw))
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Share of `available` cells given to the first child, rounded down.
    #[must_use]
    pub fn first_share(self, available: u16) -> u16 {
        let share = (f64::from(available) * self.0).floor();
        (share as u16).min(available)
    }
}

impl Default for SplitRatio {
    fn default() -> Self {
        Self::HALF
    }
}

impl From<f64> for SplitRatio {
    fn from(raw: f64) -> Self {
        Self::new(raw)
    }
}

impl From<SplitRatio> for f64 {
    fn from(ratio: SplitRatio) -> Self {
        ratio.0
    }
}

/// An undivided colored region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf {
    pub id: NodeId,
    pub color: Rgb,
}

/// A region divided into two children.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub id: NodeId,
    pub direction: SplitDirection,
    pub ratio: SplitRatio,
    pub first: Arc<Node>,
    pub second: Arc<Node>,
}

impl Split {
    /// Child at `index` (0 = first, 1 = second).
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&Arc<Node>> {
        match index {
            FIRST => Some(&self.first),
            SECOND => Some(&self.second),
            _ => None,
        }
    }

    /// Copy of this split with child `index` replaced; the other child is shared.
    ///
    /// `index` must be 0 or 1; any other value replaces the second child.
    #[must_use]
    pub(crate) fn with_child(&self, index: usize, child: Arc<Node>) -> Self {
        let (first, second) = if index == FIRST {
            (child, Arc::clone(&self.second))
        } else {
            (Arc::clone(&self.first), child)
        };
        Self {
            id: self.id,
            direction: self.direction,
            ratio: self.ratio,
            first,
            second,
        }
    }

    #[must_use]
    pub(crate) fn with_ratio(&self, ratio: SplitRatio) -> Self {
        Self {
            ratio,
            first: Arc::clone(&self.first),
            second: Arc::clone(&self.second),
            ..*self
        }
    }
}

/// Tree node: a leaf region or a split.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Leaf),
    Split(Split),
}

impl Node {
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::Leaf(leaf) => leaf.id,
            Self::Split(split) => split.id,
        }
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    #[must_use]
    pub const fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Split(_) => None,
        }
    }

    #[must_use]
    pub const fn as_split(&self) -> Option<&Split> {
        match self {
            Self::Split(split) => Some(split),
            Self::Leaf(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(raw: u64) -> Arc<Node> {
        Arc::new(Node::Leaf(Leaf {
            id: NodeId::new(raw).expect("non-zero"),
            color: Rgb::new(raw as u8, 0, 0),
        }))
    }

    #[test]
    fn zero_id_is_rejected() {
        assert_eq!(NodeId::new(0), Err(PartitionError::ZeroNodeId));
        assert_eq!(NodeId::MIN.get(), 1);
        assert_eq!(
            NodeId::new(u64::MAX).and_then(NodeId::checked_next),
            Err(PartitionError::IdOverflow)
        );
    }

    #[test]
    fn ratio_clamps_instead_of_failing() {
        assert_eq!(SplitRatio::new(0.0).get(), RATIO_MIN);
        assert_eq!(SplitRatio::new(1.5).get(), RATIO_MAX);
        assert_eq!(SplitRatio::new(0.37).get(), 0.37);
        assert_eq!(SplitRatio::new(f64::INFINITY).get(), RATIO_MAX);
        assert_eq!(SplitRatio::new(f64::NEG_INFINITY).get(), RATIO_MIN);
        assert_eq!(SplitRatio::new(f64::NAN), SplitRatio::HALF);
    }

    #[test]
    fn ratio_deserialization_clamps() {
        let ratio: SplitRatio = serde_json::from_str("0.95").expect("deserialize");
        assert_eq!(ratio.get(), RATIO_MAX);
        assert_eq!(serde_json::to_string(&SplitRatio::HALF).expect("serialize"), "0.5");
    }

    #[test]
    fn first_share_rounds_down() {
        assert_eq!(SplitRatio::new(0.5).first_share(81), 40);
        assert_eq!(SplitRatio::new(0.25).first_share(10), 2);
        assert_eq!(SplitRatio::new(0.9).first_share(0), 0);
    }

    #[test]
    fn with_child_shares_the_other_side() {
        let split = Split {
            id: NodeId::MIN,
            direction: SplitDirection::Horizontal,
            ratio: SplitRatio::HALF,
            first: leaf(2),
            second: leaf(3),
        };
        let replaced = split.with_child(FIRST, leaf(4));
        assert!(Arc::ptr_eq(&replaced.second, &split.second));
        assert_eq!(replaced.first.id().get(), 4);

        let reratioed = split.with_ratio(SplitRatio::new(0.3));
        assert!(Arc::ptr_eq(&reratioed.first, &split.first));
        assert!(Arc::ptr_eq(&reratioed.second, &split.second));
        assert_eq!(reratioed.ratio.get(), 0.3);
    }

    #[test]
    fn direction_selects_axis() {
        let rect = Rect::new(0, 0, 30, 12);
        let pointer = PointerPosition::new(7, 9);
        assert_eq!(SplitDirection::Horizontal.extent(rect), 30);
        assert_eq!(SplitDirection::Vertical.extent(rect), 12);
        assert_eq!(SplitDirection::Horizontal.coordinate(pointer), 7);
        assert_eq!(SplitDirection::Vertical.coordinate(pointer), 9);
    }
}

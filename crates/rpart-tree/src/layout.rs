//! Layout solving: map a tree onto a cell rectangle.
//!
//! A leaf fills its rectangle. A horizontal split lays its children side by
//! side, a vertical split stacks them; the first child receives
//! `floor(extent * ratio)` cells along the split axis and the second child
//! the remainder. Each split also yields a [`Divider`]: a one-cell hit zone
//! on the first row/column of the second child, where a drag can start.

use rpart_core::{PointerPosition, Rect, Rgb};
use serde::Serialize;

use crate::node::{Node, NodeId, SplitDirection, SplitRatio};
use crate::path::{FIRST, NodePath, SECOND};
use crate::tree::PartitionTree;

/// Solved rectangle for one leaf region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub path: NodePath,
    pub id: NodeId,
    pub color: Rgb,
    pub rect: Rect,
}

/// Draggable boundary between the two children of a split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Divider {
    /// Path of the split this divider belongs to.
    pub path: NodePath,
    pub id: NodeId,
    pub direction: SplitDirection,
    pub ratio: SplitRatio,
    /// Rectangle occupied by the whole split.
    pub container: Rect,
    /// Hit zone; empty when the second child got no cells.
    pub rect: Rect,
}

/// Solved layout of a tree for one canvas rectangle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionLayout {
    pub area: Rect,
    regions: Vec<Region>,
    dividers: Vec<Divider>,
}

impl PartitionLayout {
    /// Leaf regions in render order.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Dividers in pre-order (outer splits before the splits they contain).
    #[must_use]
    pub fn dividers(&self) -> &[Divider] {
        &self.dividers
    }

    #[must_use]
    pub fn region(&self, path: &NodePath) -> Option<&Region> {
        self.regions.iter().find(|region| &region.path == path)
    }

    #[must_use]
    pub fn divider(&self, path: &NodePath) -> Option<&Divider> {
        self.dividers.iter().find(|divider| &divider.path == path)
    }

    /// Leaf region under a pointer.
    #[must_use]
    pub fn leaf_at(&self, pointer: PointerPosition) -> Option<&Region> {
        self.regions
            .iter()
            .find(|region| region.rect.contains_pointer(pointer))
    }

    /// Divider under a pointer; the innermost split wins where hit zones overlap.
    #[must_use]
    pub fn divider_at(&self, pointer: PointerPosition) -> Option<&Divider> {
        self.dividers
            .iter()
            .rev()
            .find(|divider| divider.rect.contains_pointer(pointer))
    }
}

impl PartitionTree {
    /// Solve rectangles for every leaf and divider inside `area`.
    #[must_use]
    pub fn solve_layout(&self, area: Rect) -> PartitionLayout {
        let mut layout = PartitionLayout {
            area,
            regions: Vec::new(),
            dividers: Vec::new(),
        };
        solve_node(self.root(), NodePath::root(), area, &mut layout);
        layout
    }
}

fn solve_node(node: &Node, path: NodePath, area: Rect, layout: &mut PartitionLayout) {
    let split = match node {
        Node::Leaf(leaf) => {
            layout.regions.push(Region {
                path,
                id: leaf.id,
                color: leaf.color,
                rect: area,
            });
            return;
        }
        Node::Split(split) => split,
    };

    let available = split.direction.extent(area);
    let first_size = split.ratio.first_share(available);
    let second_size = available - first_size;
    let divider_thickness = u16::from(second_size > 0);

    let (first_rect, second_rect, divider_rect) = match split.direction {
        SplitDirection::Horizontal => {
            let second_x = area.x.saturating_add(first_size);
            (
                Rect::new(area.x, area.y, first_size, area.height),
                Rect::new(second_x, area.y, second_size, area.height),
                Rect::new(second_x, area.y, divider_thickness, area.height),
            )
        }
        SplitDirection::Vertical => {
            let second_y = area.y.saturating_add(first_size);
            (
                Rect::new(area.x, area.y, area.width, first_size),
                Rect::new(area.x, second_y, area.width, second_size),
                Rect::new(area.x, second_y, area.width, divider_thickness),
            )
        }
    };

    layout.dividers.push(Divider {
        path: path.clone(),
        id: split.id,
        direction: split.direction,
        ratio: split.ratio,
        container: area,
        rect: divider_rect,
    });
    solve_node(&split.first, path.child(FIRST), first_rect, layout);
    solve_node(&split.second, path.child(SECOND), second_rect, layout);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::IdAllocator;
    use rpart_core::PaletteColors;

    fn sample() -> PartitionTree {
        let mut ids = IdAllocator::default();
        let mut colors = PaletteColors::new(vec![Rgb::new(1, 1, 1), Rgb::new(2, 2, 2)]);
        let tree = PartitionTree::new(&mut ids, &mut colors).expect("root");
        let tree = tree
            .split(&NodePath::root(), SplitDirection::Horizontal, &mut ids, &mut colors)
            .expect("split root");
        tree.split(&NodePath::from([1]), SplitDirection::Vertical, &mut ids, &mut colors)
            .expect("split right")
    }

    #[test]
    fn horizontal_then_vertical_tiles_the_canvas() {
        let layout = sample().solve_layout(Rect::new(0, 0, 81, 20));
        let rects: Vec<Rect> = layout.regions().iter().map(|r| r.rect).collect();
        assert_eq!(
            rects,
            vec![
                Rect::new(0, 0, 40, 20),
                Rect::new(40, 0, 41, 10),
                Rect::new(40, 10, 41, 10),
            ]
        );
        let area: u32 = rects.iter().map(Rect::area).sum();
        assert_eq!(area, 81 * 20);
    }

    #[test]
    fn dividers_sit_on_the_second_child_edge() {
        let layout = sample().solve_layout(Rect::new(0, 0, 81, 20));
        let root = layout.divider(&NodePath::root()).expect("root divider");
        assert_eq!(root.rect, Rect::new(40, 0, 1, 20));
        assert_eq!(root.container, Rect::new(0, 0, 81, 20));

        let right = layout.divider(&NodePath::from([1])).expect("nested divider");
        assert_eq!(right.rect, Rect::new(40, 10, 41, 1));
        assert_eq!(right.container, Rect::new(40, 0, 41, 20));
    }

    #[test]
    fn innermost_divider_wins_on_overlap() {
        let layout = sample().solve_layout(Rect::new(0, 0, 81, 20));
        let hit = layout
            .divider_at(PointerPosition::new(40, 10))
            .expect("overlapping cell");
        assert_eq!(hit.path, NodePath::from([1]));
        let hit = layout
            .divider_at(PointerPosition::new(40, 3))
            .expect("root divider only");
        assert!(hit.path.is_root());
        assert!(layout.divider_at(PointerPosition::new(10, 3)).is_none());
    }

    #[test]
    fn leaf_hit_testing() {
        let layout = sample().solve_layout(Rect::new(0, 0, 81, 20));
        let region = layout.leaf_at(PointerPosition::new(60, 15)).expect("hit");
        assert_eq!(region.path, NodePath::from([1, 1]));
        assert!(layout.leaf_at(PointerPosition::new(-1, 0)).is_none());
        assert!(layout.leaf_at(PointerPosition::new(81, 0)).is_none());
    }

    #[test]
    fn degenerate_area_yields_empty_dividers() {
        let layout = sample().solve_layout(Rect::new(0, 0, 1, 1));
        let root = layout.divider(&NodePath::root()).expect("root divider");
        assert!(root.rect.is_empty() || root.rect.area() == 1);
        for region in layout.regions() {
            assert!(region.rect.right() <= 1 && region.rect.bottom() <= 1);
        }
    }
}

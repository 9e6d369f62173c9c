//! Plain-text rendering of a solved layout.
//!
//! Each leaf region is filled with one glyph; a legend below the grid maps
//! glyphs to paths, IDs, and colors. Divider hit zones can be overlaid with
//! `|` (column dividers) and `-` (row dividers).

use std::fmt::Write as _;

use rpart_core::Rect;
use rpart_tree::{PartitionLayout, SplitDirection};

const GLYPHS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Glyph for the `index`-th region; wraps after 62 regions.
#[must_use]
pub fn glyph(index: usize) -> char {
    char::from(GLYPHS[index % GLYPHS.len()])
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub dividers: bool,
    pub legend: bool,
}

/// Render `layout` as rows of glyphs, one line per canvas row.
#[must_use]
pub fn render_text(layout: &PartitionLayout, options: RenderOptions) -> String {
    let area = layout.area;
    let mut grid = vec![vec![' '; usize::from(area.width)]; usize::from(area.height)];

    for (index, region) in layout.regions().iter().enumerate() {
        fill(&mut grid, area, region.rect, glyph(index));
    }
    if options.dividers {
        for divider in layout.dividers() {
            let mark = match divider.direction {
                SplitDirection::Horizontal => '|',
                SplitDirection::Vertical => '-',
            };
            fill(&mut grid, area, divider.rect, mark);
        }
    }

    let mut out = String::with_capacity(grid.len() * (usize::from(area.width) + 1));
    for row in &grid {
        out.extend(row.iter());
        out.push('\n');
    }
    if options.legend {
        out.push('\n');
        for (index, region) in layout.regions().iter().enumerate() {
            let rect = region.rect;
            let _ = writeln!(
                out,
                "{}  {:<10} id={:<4} {}  {}x{} at ({},{})",
                glyph(index),
                region.path.to_string(),
                region.id.get(),
                region.color,
                rect.width,
                rect.height,
                rect.x,
                rect.y
            );
        }
    }
    out
}

fn fill(grid: &mut [Vec<char>], area: Rect, rect: Rect, glyph: char) {
    let Some(clipped) = area.intersection_opt(&rect) else {
        return;
    };
    for y in clipped.y..clipped.bottom() {
        let row = &mut grid[usize::from(y - area.y)];
        for x in clipped.x..clipped.right() {
            row[usize::from(x - area.x)] = glyph;
        }
    }
}
